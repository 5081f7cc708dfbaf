//! Tracing subscriber setup for hosts embedding the engine

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins over the configured level when set. Returns `false` when a
/// global subscriber was already installed, which leaves the existing one in place.
pub fn init(settings: &LoggingSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let result = if settings.format == "pretty" {
        builder.pretty().try_init()
    } else {
        builder.compact().try_init()
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let settings = LoggingSettings::default();
        let _ = init(&settings);
        assert!(!init(&settings));
    }
}
