//! src/config.rs
//!
//! Meter configuration: defaults, TOML file, `TPMETER_*` environment and CLI
//! overrides, merged in that order with figment and validated once at
//! startup. The result is immutable and handed to each component.
//!
//! Keys mirror the device's configuration header:
//!
//! ```toml
//! wifi_ssid = "MyAP"
//! wifi_psk = "passw0rd"
//! low_precision = false
//! connect_timeout_ms = 200
//! cycle_interval_ms = 500
//! connection_test_interval_ms = 10000
//! connection_test_host_v4 = "1.0.0.1"
//! connection_test_host_v6 = "2606:4700:4700::1001"
//! info_host = "2001:db8::1"
//! info_maxval_port = 17460
//! info_curval_port = 17461
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::net::{Family, Target};

pub const ENV_PREFIX: &str = "TPMETER_";

/// Configuration as read from file and environment, before validation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigFile {
    pub wifi_ssid: String,
    pub wifi_psk: String,
    /// Show only the most significant digit of throughput numbers.
    pub low_precision: bool,
    /// Bound on every TCP attempt; up to three of these may elapse per cycle.
    pub connect_timeout_ms: u64,
    /// Time between display refreshes.
    pub cycle_interval_ms: u64,
    /// Time between internet connection checks.
    pub connection_test_interval_ms: u64,
    pub connection_test_host_v4: String,
    pub connection_test_host_v6: String,
    pub connection_test_port: u16,
    /// Hostname, IPv4 or (non-link-local) IPv6 address.
    pub info_host: String,
    /// Port emitting the maximum throughput value in Bytes/sec.
    pub info_maxval_port: u16,
    /// Port emitting the absolute, monotonically increasing byte counter.
    pub info_curval_port: u16,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            wifi_ssid: "MyAP".into(),
            wifi_psk: "passw0rd".into(),
            low_precision: false,
            connect_timeout_ms: 200,
            cycle_interval_ms: 500,
            connection_test_interval_ms: 10_000,
            connection_test_host_v4: "1.0.0.1".into(),
            connection_test_host_v6: "2606:4700:4700::1001".into(),
            connection_test_port: 80,
            info_host: "2001:db8::1".into(),
            info_maxval_port: 17460,
            info_curval_port: 17461,
        }
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_precision: Option<bool>,
}

/// Validated, immutable configuration.
#[derive(Debug)]
pub struct MeterConfig {
    pub wifi_ssid: String,
    pub wifi_psk: SecretString,
    pub low_precision: bool,
    pub connect_timeout: Duration,
    pub cycle_interval: Duration,
    pub connection_test_interval: Duration,
    pub connection_test_v4: Target,
    pub connection_test_v6: Target,
    pub info_curval: Target,
    pub info_maxval: Target,
}

/// Platform config location, e.g. `~/.config/throughput-meter/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "throughput-meter").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Build the provider chain. A missing file contributes nothing.
pub fn provider_chain(path: Option<&Path>, overrides: &Overrides) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(ConfigFile::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
}

pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<ConfigFile, ConfigError> {
    Ok(provider_chain(path, overrides).extract()?)
}

fn positive_ms(field: &'static str, ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::Validation {
            field,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_millis(ms))
}

fn non_empty(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Validation {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(trimmed.to_string())
}

fn port(field: &'static str, port: u16) -> Result<u16, ConfigError> {
    if port == 0 {
        return Err(ConfigError::Validation {
            field,
            reason: "port 0 is not connectable".into(),
        });
    }
    Ok(port)
}

impl ConfigFile {
    pub fn validate(self) -> Result<MeterConfig, ConfigError> {
        let connect_timeout = positive_ms("connect_timeout_ms", self.connect_timeout_ms)?;
        let cycle_interval = positive_ms("cycle_interval_ms", self.cycle_interval_ms)?;
        let connection_test_interval =
            positive_ms("connection_test_interval_ms", self.connection_test_interval_ms)?;

        let test_port = port("connection_test_port", self.connection_test_port)?;
        let v4 = non_empty("connection_test_host_v4", &self.connection_test_host_v4)?;
        let v6 = non_empty("connection_test_host_v6", &self.connection_test_host_v6)?;

        let info_host = non_empty("info_host", &self.info_host)?;
        let maxval = port("info_maxval_port", self.info_maxval_port)?;
        let curval = port("info_curval_port", self.info_curval_port)?;
        if maxval == curval {
            return Err(ConfigError::Validation {
                field: "info_curval_port",
                reason: format!("must differ from info_maxval_port ({maxval})"),
            });
        }

        Ok(MeterConfig {
            wifi_ssid: self.wifi_ssid,
            wifi_psk: SecretString::from(self.wifi_psk),
            low_precision: self.low_precision,
            connect_timeout,
            cycle_interval,
            connection_test_interval,
            connection_test_v4: Target::new(v4, test_port).with_family(Family::V4),
            connection_test_v6: Target::new(v6, test_port).with_family(Family::V6),
            info_curval: Target::new(info_host.clone(), curval),
            info_maxval: Target::new(info_host, maxval),
        })
    }

    /// Effective configuration as TOML with the PSK blanked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if !shown.wifi_psk.is_empty() {
            shown.wifi_psk = "********".into();
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn defaults_match_device_header() {
        let cfg = ConfigFile::default().validate().unwrap();
        assert_eq!(cfg.connect_timeout, Duration::from_millis(200));
        assert_eq!(cfg.cycle_interval, Duration::from_millis(500));
        assert_eq!(cfg.connection_test_interval, Duration::from_secs(10));
        assert_eq!(
            cfg.connection_test_v4,
            Target::new("1.0.0.1", 80).with_family(Family::V4)
        );
        assert_eq!(
            cfg.connection_test_v6,
            Target::new("2606:4700:4700::1001", 80).with_family(Family::V6)
        );
        assert_eq!(cfg.info_maxval, Target::new("2001:db8::1", 17460));
        assert_eq!(cfg.info_curval, Target::new("2001:db8::1", 17461));
        assert!(!cfg.low_precision);
        assert_eq!(cfg.wifi_psk.expose_secret(), "passw0rd");
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "info_host = \"meter.example.net\"\nlow_precision = true\ncycle_interval_ms = 1000"
        )
        .unwrap();

        let loaded = provider_chain(Some(file.path()), &Overrides::default())
            .extract::<ConfigFile>()
            .unwrap();
        assert_eq!(loaded.info_host, "meter.example.net");
        assert!(loaded.low_precision);
        assert_eq!(loaded.cycle_interval_ms, 1000);
        assert_eq!(loaded.connect_timeout_ms, 200);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = provider_chain(Some(&dir.path().join("absent.toml")), &Overrides::default())
            .extract::<ConfigFile>()
            .unwrap();
        assert_eq!(loaded.info_curval_port, 17461);
    }

    #[test]
    fn cli_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "info_host = \"from-file\"").unwrap();
        let overrides = Overrides {
            info_host: Some("from-cli".into()),
            low_precision: Some(true),
        };
        let loaded = provider_chain(Some(file.path()), &overrides)
            .extract::<ConfigFile>()
            .unwrap();
        assert_eq!(loaded.info_host, "from-cli");
        assert!(loaded.low_precision);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let file = ConfigFile {
            connect_timeout_ms: 0,
            ..ConfigFile::default()
        };
        let err = file.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation {
                field: "connect_timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn identical_info_ports_are_rejected() {
        let file = ConfigFile {
            info_curval_port: 17460,
            ..ConfigFile::default()
        };
        assert!(file.validate().is_err());
    }

    #[test]
    fn blank_host_is_rejected() {
        let file = ConfigFile {
            info_host: "  ".into(),
            ..ConfigFile::default()
        };
        assert!(matches!(
            file.validate(),
            Err(ConfigError::Validation {
                field: "info_host",
                ..
            })
        ));
    }

    #[test]
    fn redacted_toml_hides_psk() {
        let text = ConfigFile::default().to_redacted_toml().unwrap();
        assert!(!text.contains("passw0rd"));
        assert!(text.contains("wifi_psk = \"********\""));
        assert!(text.contains("info_curval_port = 17461"));
    }

    #[test]
    fn debug_output_never_shows_psk() {
        let cfg = ConfigFile::default().validate().unwrap();
        assert!(!format!("{cfg:?}").contains("passw0rd"));
    }
}
