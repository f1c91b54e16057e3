//! Logging setup for the CLI.
//!
//! Logs go to stderr so stdout stays machine-readable JSON.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Quiet,
            1 => Self::Normal,
            _ => Self::Verbose,
        }
    }

    fn level(self) -> Level {
        match self {
            Self::Quiet => Level::WARN,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the verbosity.
pub fn init_logging(verbosity: Verbosity) {
    let level = verbosity.level();
    let default_filter = format!("shoresafe={level},shoresafe_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flag_count() {
        assert_eq!(Verbosity::from_count(0), Verbosity::Quiet);
        assert_eq!(Verbosity::from_count(1), Verbosity::Normal);
        assert_eq!(Verbosity::from_count(5), Verbosity::Verbose);
        assert_eq!(Verbosity::Verbose.level(), Level::DEBUG);
    }
}
