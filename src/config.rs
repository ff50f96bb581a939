//! Layered settings.
//!
//! Sources, lowest priority first: built-in defaults, an optional config
//! file, `DBWATCH_*` environment variables, explicit command-line flags.
//!
//! ```toml
//! port = "/dev/ttyACM0"
//! baud = 9600
//! read_timeout = "500ms"
//! refresh = "1s"
//! unit = "dBA"
//! loud_db = 60.0
//! harmful_db = 80.0
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::display::{DisplaySettings, LevelThresholds};
use crate::duration::parse_duration;
use crate::feed::{default_port, SerialSettings};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DBWATCH";

/// Values given explicitly on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub read_timeout: Option<String>,
    pub refresh: Option<String>,
    pub initial_delay: Option<String>,
    pub retry_pause: Option<String>,
    pub unit: Option<String>,
    pub loud_db: Option<f64>,
    pub harmful_db: Option<f64>,
}

/// Flat shape shared by every source.
#[derive(Debug, Deserialize)]
struct RawSettings {
    port: String,
    baud: u32,
    read_timeout: String,
    refresh: String,
    initial_delay: String,
    retry_pause: String,
    unit: String,
    loud_db: f64,
    harmful_db: f64,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub serial: SerialSettings,
    pub display: DisplaySettings,
    /// Pause after a transient read failure.
    pub retry_pause: Duration,
}

impl Settings {
    /// Resolve settings from all sources.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(overrides, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn load_with_env(overrides: &Overrides, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("port", default_port())?
            .set_default("baud", 115_200_i64)?
            .set_default("read_timeout", "1s")?
            .set_default("refresh", "1000ms")?
            .set_default("initial_delay", "100ms")?
            .set_default("retry_pause", "100ms")?
            .set_default("unit", "dB")?
            .set_default("loud_db", 60.0)?
            .set_default("harmful_db", 80.0)?;

        if let Some(ref path) = overrides.config_file {
            builder = builder.add_source(File::from(path.as_path()));
        }

        let raw: RawSettings = builder
            .add_source(env)
            .set_override_option("port", overrides.port.clone())?
            .set_override_option("baud", overrides.baud.map(i64::from))?
            .set_override_option("read_timeout", overrides.read_timeout.clone())?
            .set_override_option("refresh", overrides.refresh.clone())?
            .set_override_option("initial_delay", overrides.initial_delay.clone())?
            .set_override_option("retry_pause", overrides.retry_pause.clone())?
            .set_override_option("unit", overrides.unit.clone())?
            .set_override_option("loud_db", overrides.loud_db)?
            .set_override_option("harmful_db", overrides.harmful_db)?
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let read_timeout = parse_duration(&raw.read_timeout).context("read_timeout")?;
        let refresh_interval = parse_duration(&raw.refresh).context("refresh")?;
        let initial_delay = parse_duration(&raw.initial_delay).context("initial_delay")?;
        let retry_pause = parse_duration(&raw.retry_pause).context("retry_pause")?;

        ensure!(!raw.port.trim().is_empty(), "port must not be empty");
        ensure!(!read_timeout.is_zero(), "read_timeout must be greater than zero");
        ensure!(!refresh_interval.is_zero(), "refresh must be greater than zero");
        ensure!(
            raw.loud_db <= raw.harmful_db,
            "loud_db ({}) must not exceed harmful_db ({})",
            raw.loud_db,
            raw.harmful_db
        );

        Ok(Self {
            serial: SerialSettings {
                port: raw.port,
                baud: raw.baud,
                read_timeout,
            },
            display: DisplaySettings {
                unit: raw.unit,
                refresh_interval,
                initial_delay,
                thresholds: LevelThresholds {
                    loud_db: raw.loud_db,
                    harmful_db: raw.harmful_db,
                },
            },
            retry_pause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    /// Environment source that ignores the real process environment.
    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Environment::with_prefix(ENV_PREFIX).try_parsing(true).source(Some(map))
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(&Overrides::default(), env(&[])).unwrap();
        assert_eq!(settings.serial.port, default_port());
        assert_eq!(settings.serial.baud, 115_200);
        assert_eq!(settings.serial.read_timeout, Duration::from_secs(1));
        assert_eq!(settings.display, DisplaySettings::default());
        assert_eq!(settings.retry_pause, Duration::from_millis(100));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config("port = \"/dev/ttyACM0\"\nbaud = 9600\nunit = \"dBA\"\n");
        let overrides = Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let settings = Settings::load_with_env(&overrides, env(&[])).unwrap();
        assert_eq!(settings.serial.port, "/dev/ttyACM0");
        assert_eq!(settings.serial.baud, 9600);
        assert_eq!(settings.display.unit, "dBA");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("baud = 9600\n");
        let overrides = Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let settings =
            Settings::load_with_env(&overrides, env(&[("DBWATCH_BAUD", "57600")])).unwrap();
        assert_eq!(settings.serial.baud, 57600);
    }

    #[test]
    fn test_cli_overrides_everything() {
        let file = write_config("port = \"/dev/ttyACM0\"\nrefresh = \"2s\"\n");
        let overrides = Overrides {
            config_file: Some(file.path().to_path_buf()),
            port: Some("COM7".to_string()),
            refresh: Some("250ms".to_string()),
            loud_db: Some(50.0),
            ..Default::default()
        };

        let settings =
            Settings::load_with_env(&overrides, env(&[("DBWATCH_PORT", "/dev/ttyS0")])).unwrap();
        assert_eq!(settings.serial.port, "COM7");
        assert_eq!(settings.display.refresh_interval, Duration::from_millis(250));
        assert_eq!(settings.display.thresholds.loud_db, 50.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let overrides = Overrides {
            read_timeout: Some("0ms".to_string()),
            ..Default::default()
        };
        assert!(Settings::load_with_env(&overrides, env(&[])).is_err());

        let overrides = Overrides {
            loud_db: Some(90.0),
            ..Default::default()
        };
        assert!(Settings::load_with_env(&overrides, env(&[])).is_err());

        let overrides = Overrides {
            refresh: Some("often".to_string()),
            ..Default::default()
        };
        assert!(Settings::load_with_env(&overrides, env(&[])).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let overrides = Overrides {
            config_file: Some(PathBuf::from("/nonexistent/dbwatch.toml")),
            ..Default::default()
        };
        assert!(Settings::load_with_env(&overrides, env(&[])).is_err());
    }
}
