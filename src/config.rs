//! Runtime settings.
//!
//! Values come from an optional TOML file, overridden by `LPFORM_`-prefixed
//! environment variables where `__` separates sections, e.g.
//! `LPFORM_SOLVER__URL=http://solver:5000/solve`.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG: &str = "lpform";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000/solve".to_string(),
            timeout_secs: 30,
            user_agent: concat!("lpform/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SolverSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub solver: SolverSettings,
    pub server: ServerSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Reads `path` if given (it must then exist), else `lpform.toml` if present,
    /// then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("LPFORM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
