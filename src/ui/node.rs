//! src/ui/node.rs
//!
//! Recursive layout Node + Panel trait used across the UI.
//!
//! The view is locked once per frame and lent to every panel in the tree.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::graph::MeterView;

/// Panel trait: any renderable surface implements this.
pub trait Panel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect, view: &MeterView);
}

/// Node tree used to compose the UI each frame.
pub enum Node {
    Group {
        direction: Direction,
        constraints: Vec<Constraint>,
        children: Vec<Node>,
    },
    Leaf {
        panel: Box<dyn Panel>,
    },
}

impl Node {
    pub fn draw(&self, f: &mut Frame<'_>, area: Rect, view: &MeterView) {
        match self {
            Node::Group {
                direction,
                constraints,
                children,
            } => {
                let chunks = Layout::default()
                    .direction(*direction)
                    .constraints(constraints.iter().copied())
                    .split(area);
                for (child, chunk) in children.iter().zip(chunks.iter()) {
                    child.draw(f, *chunk, view);
                }
            }
            Node::Leaf { panel } => panel.draw(f, area, view),
        }
    }
}

pub fn group(direction: Direction, constraints: Vec<Constraint>, children: Vec<Node>) -> Node {
    Node::Group {
        direction,
        constraints,
        children,
    }
}

pub fn leaf(panel: impl Panel + 'static) -> Node {
    Node::Leaf {
        panel: Box::new(panel),
    }
}
