//! Binder configuration.
//!
//! Defaults can be overridden programmatically or from the environment
//! (a `.env` file is loaded first when present):
//!
//! | Variable | Meaning |
//! |---|---|
//! | `FORMBIND_TIME_FORMAT` | Default `strftime` layout for time fields (RFC 3339 when unset) |
//! | `FORMBIND_TIME_ZONE` | Default zone: `Local`, `UTC` or an IANA name |

use std::collections::HashMap;
use std::env;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::time::Zone;

/// Environment variable holding the default time layout.
pub const ENV_TIME_FORMAT: &str = "FORMBIND_TIME_FORMAT";

/// Environment variable holding the default time zone.
pub const ENV_TIME_ZONE: &str = "FORMBIND_TIME_ZONE";

/// Settings shared by every bind call of a [`crate::Binder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinderConfig {
    /// Layout used by time fields without a `time_format` directive.
    pub time_format: Option<String>,
    /// Zone used by time fields without `time_utc` or `time_location`.
    pub time_zone: Zone,
}

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `FORMBIND_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from a dotenv-style file without touching the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let vars = dotenvy::from_path_iter(path.as_ref())?
            .collect::<Result<HashMap<String, String>, _>>()?;

        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(layout) = lookup(ENV_TIME_FORMAT).filter(|v| !v.is_empty()) {
            config.time_format = Some(layout);
        }

        if let Some(name) = lookup(ENV_TIME_ZONE).filter(|v| !v.is_empty()) {
            config.time_zone = Zone::resolve(&name)
                .map_err(|reason| ConfigError::UnknownZone { name, reason })?;
        }

        Ok(config)
    }

    /// Set the default time layout.
    pub fn with_time_format(mut self, layout: impl Into<String>) -> Self {
        self.time_format = Some(layout.into());
        self
    }

    /// Set the default time zone.
    pub fn with_time_zone(mut self, zone: Zone) -> Self {
        self.time_zone = zone;
        self
    }
}
