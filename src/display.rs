//! src/display.rs
//!
//! Where readouts go once a cycle finishes.
//!
//! A plain line display (stdout, or a small display hanging off a serial
//! port) gets one text line per cycle. The terminal UI is fed through the
//! shared view instead.

use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;
use tracing::info;

use crate::error::DisplayError;
use crate::graph::SharedView;
use crate::meter::Readout;
use crate::meter::format::render_lines;

pub trait ReadoutSink {
    fn name(&self) -> &str;
    fn show(&mut self, readout: &Readout) -> Result<(), DisplayError>;
}

/// Writes each readout as a single line, fields separated by ` | `.
pub struct LineSink<W: Write> {
    name: String,
    out: W,
    low_precision: bool,
}

impl<W: Write> LineSink<W> {
    pub fn new(name: &str, out: W, low_precision: bool) -> Self {
        Self {
            name: name.to_string(),
            out,
            low_precision,
        }
    }
}

impl<W: Write> ReadoutSink for LineSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn show(&mut self, readout: &Readout) -> Result<(), DisplayError> {
        let line = render_lines(readout, self.low_precision).join(" | ");
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\r\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Open a serial-attached line display.
pub fn open_serial(
    port_name: &str,
    baud_rate: u32,
    low_precision: bool,
) -> Result<LineSink<Box<dyn SerialPort>>, DisplayError> {
    let port = serialport::new(port_name, baud_rate)
        .timeout(Duration::from_millis(100))
        .open()?;
    info!("serial display on {} @ {} baud", port_name, baud_rate);
    Ok(LineSink::new(port_name, port, low_precision))
}

/// Feeds the terminal UI.
pub struct ViewSink {
    view: SharedView,
}

impl ViewSink {
    pub fn new(view: SharedView) -> Self {
        Self { view }
    }
}

impl ReadoutSink for ViewSink {
    fn name(&self) -> &str {
        "terminal"
    }

    fn show(&mut self, readout: &Readout) -> Result<(), DisplayError> {
        let mut view = self.view.write().map_err(|_| DisplayError::Poisoned)?;
        view.record(readout);
        Ok(())
    }
}
