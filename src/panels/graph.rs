//! src/panels/graph.rs
//!
//! Rate chart: stats row plus a line chart of recent measured rates.
//!
//! The y axis runs from zero to the info host's max value, so a full-height
//! line means the link is saturated. With autoscale on (or before the max
//! value is known) the ceiling follows the data with 10% headroom instead.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::graph::MeterView;
use crate::meter::format::format_rate;

pub struct GraphPanel;

impl GraphPanel {
    /// Five evenly spaced y labels from zero to `ceiling`.
    fn y_labels(ceiling: f64, low_precision: bool) -> Vec<String> {
        (0..5)
            .map(|i| format_rate(ceiling * f64::from(i) / 4.0, low_precision))
            .collect()
    }
}

impl crate::ui::Panel for GraphPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect, view: &MeterView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let lp = view.low_precision;
        let stats_text = match view.series.stats() {
            Some((mn, mx, last)) => format!(
                "Min: {}  Max: {}  Last: {}  (B/s)",
                format_rate(mn, lp),
                format_rate(mx, lp),
                format_rate(last, lp)
            ),
            None => "no rate measured yet".to_string(),
        };
        f.render_widget(
            Paragraph::new(stats_text).block(Block::default().title("Stats").borders(Borders::ALL)),
            chunks[0],
        );

        let ceiling = view.ceiling().max(1.0);
        let (xmin, xmax) = view.series.x_bounds();

        // points above the ceiling are clipped by the chart; flag them
        let over: Vec<(f64, f64)> = view
            .series
            .data_vec
            .iter()
            .filter(|&&(_, y)| y > ceiling)
            .map(|&(x, _)| (x, ceiling))
            .collect();

        let mut datasets = vec![
            Dataset::default()
                .name("rate")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(view.color))
                .data(view.series.data_vec.as_slice()),
        ];

        if !over.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("over max")
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(Color::Red))
                    .data(over.as_slice()),
            );
        }

        let title = if view.autoscale {
            "Throughput (autoscale)"
        } else {
            "Throughput"
        };
        let chart = Chart::new(datasets)
            .block(Block::default().title(title).borders(Borders::ALL))
            .x_axis(Axis::default().bounds([xmin, xmax]))
            .y_axis(
                Axis::default()
                    .bounds([0.0, ceiling])
                    .labels(GraphPanel::y_labels(ceiling, lp)),
            );

        f.render_widget(chart, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_span_zero_to_ceiling() {
        assert_eq!(
            GraphPanel::y_labels(8000.0, false),
            vec!["0", "2000", "4000", "6000", "8000"]
        );
        assert_eq!(
            GraphPanel::y_labels(8000.0, true),
            vec!["0", "2___", "4___", "6___", "8___"]
        );
    }
}
