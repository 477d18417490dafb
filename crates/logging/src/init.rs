//! Subscriber installation.

use std::fmt;

use tracing_subscriber::EnvFilter;

use super::config::VerbosityConfig;

/// Error returned when a global subscriber is already installed.
#[derive(Debug)]
pub struct InitError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.0)
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// Builds the filter for `config`, preferring `RUST_LOG` when it is set.
#[must_use]
pub fn env_filter(config: &VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()))
}

/// Installs a stderr formatting subscriber filtered by `config`.
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(InitError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_installation_fails() {
        let config = VerbosityConfig::default();
        let _ = init_tracing(&config);
        let err = init_tracing(&config).expect_err("subscriber already set");
        assert!(err.to_string().contains("tracing subscriber"));
    }
}
