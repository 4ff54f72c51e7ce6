//! src/main.rs
//!
//! Entrypoint: CLI parsing, file-based tracing, configuration, then
//! `app::run()`.
//!
//! Logs never go to the terminal: the UI owns it, and headless mode writes
//! readouts to stdout.

mod app;
mod config;
mod display;
mod error;
mod graph;
mod meter;
mod net;
mod panels;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::ExposeSecret;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::RunOptions;
use crate::config::Overrides;

/// Network throughput and connectivity meter.
#[derive(Parser, Debug)]
#[command(name = "throughput-meter", version, about)]
struct Cli {
    /// Configuration file (TOML); defaults to the platform config directory
    #[arg(short, long, env = "THROUGHPUT_METER_CONFIG")]
    config: Option<PathBuf>,

    /// Info host to read throughput values from
    #[arg(long)]
    info_host: Option<String>,

    /// Show only the most significant digit of throughput numbers
    #[arg(long)]
    low_precision: bool,

    /// Print one line per cycle to stdout instead of the terminal UI
    #[arg(long)]
    headless: bool,

    /// Also write readouts to a serial-attached display
    #[arg(long, value_name = "PORT")]
    serial: Option<String>,

    /// Baud rate for --serial
    #[arg(long, default_value_t = 115_200)]
    baud: u32,

    /// Log file path
    #[arg(long, default_value = "/tmp/throughput-meter.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the effective configuration (PSK redacted) and exit
    #[arg(long)]
    print_config: bool,
}

/// Returns a guard that must live as long as the program so logs get flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("throughput_meter={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("throughput-meter.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true),
        )
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);

    let overrides = Overrides {
        info_host: cli.info_host.clone(),
        low_precision: cli.low_precision.then_some(true),
    };
    let path = cli.config.clone().or_else(config::default_config_path);
    let file = config::load(path.as_deref(), &overrides).wrap_err("loading configuration")?;

    if cli.print_config {
        print!("{}", file.to_redacted_toml()?);
        return Ok(());
    }

    let cfg = file.validate().wrap_err("invalid configuration")?;
    info!(
        config = ?path,
        wifi_ssid = %cfg.wifi_ssid,
        wifi_psk_set = !cfg.wifi_psk.expose_secret().is_empty(),
        info = %cfg.info_curval.host,
        cycle_ms = cfg.cycle_interval.as_millis() as u64,
        test_interval_ms = cfg.connection_test_interval.as_millis() as u64,
        timeout_ms = cfg.connect_timeout.as_millis() as u64,
        low_precision = cfg.low_precision,
        "starting throughput-meter"
    );

    app::run(
        cfg,
        RunOptions {
            headless: cli.headless,
            serial: cli.serial.clone(),
            baud: cli.baud,
        },
    )
}
