//! src/app.rs
//!
//! Live throughput meter.
//!
//! # Overview
//!
//! A meter thread runs the display cycle: every `cycle_interval_ms` it reads
//! the byte counter (and max value) from the info host, derives the current
//! rate, and every `connection_test_interval_ms` checks internet
//! reachability over IPv4 and IPv6. Each cycle's readout goes to the
//! configured displays:
//!
//! - the terminal UI (default), drawn on the main thread from a shared view;
//! - stdout, one line per cycle, with `--headless`;
//! - a serial-attached line display with `--serial <port>`.
//!
//! # Keyboard Controls
//!
//! - **p**: Toggle low-precision rendering (leading digit only).
//! - **a**: Toggle chart autoscale; off scales the chart to the max value.
//! - **q**: Quit and restore terminal state.
//!
//! # Info Host Protocol
//!
//! Two TCP ports on the info host. On connect each writes one ASCII decimal
//! number and closes:
//!
//! ```text
//! $ nc 2001:db8::1 17460      # max throughput, Bytes/sec
//! 125000000
//! $ nc 2001:db8::1 17461      # absolute byte counter
//! 918273645
//! ```
//!
//! A matching server is a one-liner per port, e.g.
//! `socat TCP6-LISTEN:17461,fork SYSTEM:'cat /sys/class/net/eth0/statistics/rx_bytes'`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr, eyre};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::info;

use crate::config::MeterConfig;
use crate::display::{LineSink, ReadoutSink, ViewSink, open_serial};
use crate::graph::{GraphConfig, MeterView, SharedView};
use crate::meter::{Meter, Pacer, run_meter};
use crate::net::TcpTransport;
use crate::ui::meter_layout;

#[derive(Debug, Default)]
pub struct RunOptions {
    pub headless: bool,
    pub serial: Option<String>,
    pub baud: u32,
}

pub fn run(cfg: MeterConfig, opts: RunOptions) -> Result<()> {
    let mut sinks: Vec<Box<dyn ReadoutSink + Send>> = Vec::new();
    if let Some(port) = &opts.serial {
        let serial = open_serial(port, opts.baud, cfg.low_precision)
            .wrap_err_with(|| format!("opening serial display {port}"))?;
        sinks.push(Box::new(serial));
    }

    let meter = Meter::from_config(&cfg);
    let pacer = Pacer::new(cfg.cycle_interval);

    if opts.headless {
        sinks.push(Box::new(LineSink::new(
            "stdout",
            std::io::stdout(),
            cfg.low_precision,
        )));
        // runs until the process is killed
        run_meter(
            meter,
            &TcpTransport,
            pacer,
            &mut sinks,
            Arc::new(AtomicBool::new(false)),
        );
        return Ok(());
    }

    let view: SharedView = Arc::new(RwLock::new(MeterView::new(
        GraphConfig::for_cycle(cfg.cycle_interval, Duration::from_secs(120)),
        &cfg.info_curval.host,
        cfg.low_precision,
    )));
    sinks.push(Box::new(ViewSink::new(view.clone())));

    let stop = Arc::new(AtomicBool::new(false));
    let meter_thread = {
        let stop = stop.clone();
        thread::Builder::new()
            .name("meter".into())
            .spawn(move || run_meter(meter, &TcpTransport, pacer, &mut sinks, stop))
            .wrap_err("spawning meter thread")?
    };

    let mut terminal = ratatui::init();
    let result = ui_loop(&mut terminal, &view);
    ratatui::restore();

    stop.store(true, Ordering::Relaxed);
    info!("waiting for meter thread");
    if meter_thread.join().is_err() {
        return Err(eyre!("meter thread panicked"));
    }
    result
}

fn ui_loop(terminal: &mut DefaultTerminal, view: &SharedView) -> Result<()> {
    let root = meter_layout();
    let frame_time = Duration::from_millis(100);

    loop {
        let frame_start = Instant::now();

        {
            let v = view.read().map_err(|_| eyre!("view lock poisoned"))?;
            terminal.draw(|f| {
                let area = f.area();
                root.draw(f, area, &v);
            })?;
        }

        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('p') => {
                    let mut v = view.write().map_err(|_| eyre!("view lock poisoned"))?;
                    v.low_precision = !v.low_precision;
                    info!("low precision {}", v.low_precision);
                }
                KeyCode::Char('a') => {
                    let mut v = view.write().map_err(|_| eyre!("view lock poisoned"))?;
                    v.autoscale = !v.autoscale;
                }
                _ => {}
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
