// src/config.rs
//! Runtime settings for the demo binary.
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. `vclock.toml` in the working directory (optional)
//! 3. `VCLOCK_*` environment variables, after `.env` is loaded
//!
//! ## Environment Variables
//! - `VCLOCK_LOG_LEVEL`: `env_logger` filter (default: `info`)
//! - `VCLOCK_LOCK_LABEL`: label of the demo lock (default: `Front Door`)
//! - `VCLOCK_HOLDER_EMAIL`: holder metadata to hash (default: `a@b.com`)
//! - `VCLOCK_BULK_LOCKS`: extra locks registered in parallel (default: 4)

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub log_level: String,
    pub lock_label: String,
    pub holder_email: String,
    pub bulk_locks: usize,
}

impl Settings {
    /// Loads `.env`, then layers defaults, `vclock.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let config = Self::defaults()?
            .add_source(File::with_name("vclock").required(false))
            .add_source(Environment::with_prefix("VCLOCK").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("lock_label", "Front Door")?
            .set_default("holder_email", "a@b.com")?
            .set_default("bulk_locks", 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(
            settings,
            Settings {
                log_level: "info".into(),
                lock_label: "Front Door".into(),
                holder_email: "a@b.com".into(),
                bulk_locks: 4,
            }
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .add_source(File::from_str(
                "lock_label = \"Garage\"\nbulk_locks = 0\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.lock_label, "Garage");
        assert_eq!(settings.bulk_locks, 0);
        assert_eq!(settings.log_level, "info");
    }
}
