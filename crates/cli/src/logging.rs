//! Logging setup
//!
//! Logs go to stderr so command output on stdout stays pipeable.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `feedcycle=warn`)
//! - `FEEDCYCLE_LOG_FORMAT`: `json` for structured output, anything else for pretty

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "FEEDCYCLE_LOG_FORMAT";
const DEFAULT_FILTER: &str = "feedcycle=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber; `verbose` raises the default level to debug
pub fn init_logging(verbose: bool) -> Result<()> {
    let format = LogFormat::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref());

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::try_new("feedcycle=debug")?,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}
