use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const SERVICE_NAME: &str = "founder-scout";

/// Directives appended to the configured level so Harvest round-trips don't flood the log.
const QUIET_HTTP_DIRECTIVES: &[&str] = &["hyper=warn", "reqwest=warn", "rustls=warn"];

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directives: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directives, .. } => {
                write!(f, "APP_LOG_LEVEL '{directives}' is not a valid tracing filter")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "{SERVICE_NAME} log subscriber could not be installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `APP_LOG_LEVEL` and is used verbatim.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let (env_filter, origin) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, "RUST_LOG"),
        Err(_) => (scout_filter(&config.log_level)?, "APP_LOG_LEVEL"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)?;

    tracing::info!(
        service = SERVICE_NAME,
        version = env!("CARGO_PKG_VERSION"),
        filter_from = origin,
        "logging ready"
    );
    Ok(())
}

/// Configured level plus HTTP-client quieting, unless the caller already set those targets.
fn filter_directives(log_level: &str) -> String {
    let level = log_level.trim();
    let mut directives = vec![if level.is_empty() { "info" } else { level }.to_string()];
    for quiet in QUIET_HTTP_DIRECTIVES {
        let target = quiet.split('=').next().unwrap_or_default();
        if !level.contains(target) {
            directives.push((*quiet).to_string());
        }
    }
    directives.join(",")
}

fn scout_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter_directives(log_level)).map_err(|source| TelemetryError::Filter {
        directives: log_level.to_string(),
        source,
    })
}
