use chrono::NaiveDate;
use thiserror::Error;

use crate::dates::{parse_day, DateError};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("usage: boat-reallocator web [port] | plan <manifest.csv> <boat> <first_day> <last_day> [client]")]
    Usage,
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("{name}: {source}")]
    Date { name: &'static str, source: DateError },
}

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Serve the HTTP API
    Web { port: u16 },
    /// Insert one reservation into a boat from a manifest and print the result
    Plan {
        manifest: String,
        boat: String,
        first_day: NaiveDate,
        last_day: NaiveDate,
        client: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    /// Manifest loaded at startup in web mode
    pub manifest: Option<String>,
    /// Overrides the current day (useful for replaying a manifest)
    pub today: Option<NaiveDate>,
    pub log_filter: String,
}

impl Config {
    /// Reads the configuration from the process arguments and environment
    pub fn from_env() -> Result<Config, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Config::from_parts(&args, |key| std::env::var(key).ok())
    }

    /// Builds a configuration from arguments (without the program name) and an env lookup
    pub fn from_parts<F>(args: &[String], env: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match args.first().map(String::as_str) {
            Some("web") => {
                let port = match args.get(1).cloned().or_else(|| env("PORT")) {
                    Some(p) => p.parse::<u16>().map_err(|_| ConfigError::InvalidPort(p))?,
                    None => DEFAULT_PORT,
                };
                Mode::Web { port }
            }
            Some("plan") if args.len() >= 5 => Mode::Plan {
                manifest: args[1].clone(),
                boat: args[2].clone(),
                first_day: parse_day(&args[3])
                    .map_err(|source| ConfigError::Date { name: "first_day", source })?,
                last_day: parse_day(&args[4])
                    .map_err(|source| ConfigError::Date { name: "last_day", source })?,
                client: args.get(5).cloned().unwrap_or_default(),
            },
            _ => return Err(ConfigError::Usage),
        };

        let today = env("REALLOC_TODAY")
            .map(|value| parse_day(&value))
            .transpose()
            .map_err(|source| ConfigError::Date { name: "REALLOC_TODAY", source })?;

        Ok(Config {
            mode,
            manifest: env("BOAT_MANIFEST"),
            today,
            log_filter: env("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
