//! src/meter.rs
//!
//! The measuring side: rate calculation, the display cycle and its pacing,
//! plus the loop that drives it on a dedicated thread.

pub mod cycle;
pub mod format;
pub mod pacer;
pub mod rate;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::display::ReadoutSink;
use crate::net::Transport;

pub use cycle::{MaxReading, Meter, RateReading, Readout};
pub use pacer::Pacer;

/// Run cycles until `stop` is set, handing every readout to each sink.
///
/// All network work happens here, sequentially; a sink that fails is logged
/// and skipped for that cycle.
pub fn run_meter(
    mut meter: Meter,
    transport: &dyn Transport,
    mut pacer: Pacer,
    sinks: &mut [Box<dyn ReadoutSink + Send>],
    stop: Arc<AtomicBool>,
) {
    info!("meter loop started");
    while !stop.load(Ordering::Relaxed) {
        let now = pacer.wait();
        if stop.load(Ordering::Relaxed) {
            break;
        }
        let readout = meter.cycle(now, transport);
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.show(&readout) {
                warn!("{} display: {}", sink.name(), e);
            }
        }
    }
    info!("meter loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::LineSink;
    use crate::net::fake::{FakeTransport, Reply};
    use crate::net::{ConnectivityChecker, InfoClient, Target};
    use crate::error::DisplayError;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct StopAfter {
        seen: Arc<Mutex<Vec<Instant>>>,
        limit: usize,
        stop: Arc<AtomicBool>,
    }

    impl ReadoutSink for StopAfter {
        fn name(&self) -> &str {
            "probe"
        }

        fn show(&mut self, readout: &Readout) -> Result<(), DisplayError> {
            let mut seen = self.seen.lock().unwrap();
            seen.push(readout.at);
            if seen.len() >= self.limit {
                self.stop.store(true, Ordering::Relaxed);
            }
            Ok(())
        }
    }

    #[test]
    fn refreshes_are_spaced_and_reach_every_sink() {
        let fake = FakeTransport::new();
        fake.script("info", 2, [Reply::Value("100")]);
        fake.script("info", 1, [Reply::Value("1000")]);
        let timeout = Duration::from_millis(10);
        let meter = Meter::new(
            InfoClient::new(Target::new("info", 2), Target::new("info", 1), timeout),
            ConnectivityChecker::new(
                Target::new("v4", 80),
                Target::new("v6", 80),
                Duration::from_secs(10),
                timeout,
            ),
        );

        let stop = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let interval = Duration::from_millis(20);
        let mut sinks: Vec<Box<dyn ReadoutSink + Send>> = vec![
            Box::new(LineSink::new("buffer", Vec::new(), false)),
            Box::new(StopAfter {
                seen: seen.clone(),
                limit: 3,
                stop: stop.clone(),
            }),
        ];

        run_meter(meter, &fake, Pacer::new(interval), &mut sinks, stop);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        for pair in seen.windows(2) {
            assert!(pair[1] - pair[0] >= interval);
        }
    }
}
