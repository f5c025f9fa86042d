//! Structured logging through `tracing`.
//!
//! Everything goes to stderr: the MCP server owns stdout for its protocol
//! stream, and the CLI keeps stdout for rendered output.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub with_ansi: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: Level::WARN,
            with_ansi: true,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// 0 is warnings only, then info, debug, trace.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        LogConfig {
            level,
            ..LogConfig::default()
        }
    }

    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// `RUST_LOG` wins over the configured level when set.
pub fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pokedex_explorer={level},pokedex_mcp={level},warn",
            level = level.as_str().to_lowercase()
        ))
    })
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, Level::WARN)]
    #[case(1, Level::INFO)]
    #[case(2, Level::DEBUG)]
    #[case(7, Level::TRACE)]
    fn test_from_verbosity(#[case] verbosity: u8, #[case] expected: Level) {
        assert_eq!(LogConfig::from_verbosity(verbosity).level, expected);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default().with_ansi(false);
        init_logging(&config);
        init_logging(&config);
    }
}
