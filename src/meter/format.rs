//! src/meter/format.rs
//!
//! Text rendering of throughput numbers and readouts.
//!
//! Low-precision mode keeps the most significant digit and replaces every
//! other digit with `_`. It only changes the text; the values stay exact.

use super::{MaxReading, RateReading, Readout};
use crate::net::{Family, Reachability};

const BLANK: char = '_';

/// Render a whole number, blanking all but the leading digit if requested.
pub fn format_count(value: u64, low_precision: bool) -> String {
    let digits = value.to_string();
    if !low_precision {
        return digits;
    }
    blank_tail(&digits)
}

fn blank_tail(digits: &str) -> String {
    let mut chars = digits.chars();
    let mut out = String::with_capacity(digits.len());
    if let Some(first) = chars.next() {
        out.push(first);
    }
    out.extend(chars.map(|c| if c.is_ascii_digit() { BLANK } else { c }));
    out
}

/// Rates are displayed as whole Bytes/sec.
pub fn format_rate(rate: f64, low_precision: bool) -> String {
    format_count(rate.max(0.0).round() as u64, low_precision)
}

/// Scaled rendering such as `12.3 MB/s` (decimal units).
pub fn human_rate(rate: f64, low_precision: bool) -> String {
    const UNITS: [&str; 5] = ["B/s", "kB/s", "MB/s", "GB/s", "TB/s"];
    let mut value = rate.max(0.0);
    let mut unit = 0;
    // round at the shown precision first so 999.96 kB/s becomes 1.0 MB/s
    loop {
        let scale = if unit == 0 { 1.0 } else { 10.0 };
        let rounded = (value * scale).round() / scale;
        if rounded < 1000.0 || unit == UNITS.len() - 1 {
            value = rounded;
            break;
        }
        value /= 1000.0;
        unit += 1;
    }
    let number = if unit == 0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    };
    if low_precision {
        format!("{} {}", blank_tail(&number), UNITS[unit])
    } else {
        format!("{} {}", number, UNITS[unit])
    }
}

pub fn reachability_label(r: Reachability) -> &'static str {
    match r {
        Reachability::Unknown => "?",
        Reachability::Reachable => "up",
        Reachability::Unreachable => "down",
    }
}

pub fn rate_text(rate: &RateReading, low_precision: bool) -> String {
    match rate {
        RateReading::Measured(r) => format_rate(*r, low_precision),
        RateReading::Warmup => "....".into(),
        RateReading::Reset => "RST".into(),
        RateReading::Unavailable => "----".into(),
    }
}

pub fn max_text(max: &MaxReading, low_precision: bool) -> String {
    match max {
        MaxReading::Fresh(v) => format_count(*v, low_precision),
        MaxReading::Stale(v) => format!("{}?", format_count(*v, low_precision)),
        MaxReading::Missing => "----".into(),
    }
}

/// The lines a plain display shows for one readout.
pub fn render_lines(readout: &Readout, low_precision: bool) -> Vec<String> {
    let net = [Family::V4, Family::V6]
        .iter()
        .map(|f| {
            format!(
                "{}:{}",
                f,
                reachability_label(readout.connectivity.get(*f).reachability)
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    vec![
        format!("NET {net}"),
        format!("RATE {} B/s", rate_text(&readout.rate, low_precision)),
        format!("MAX {} B/s", max_text(&readout.max, low_precision)),
    ]
}
