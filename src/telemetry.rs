//! Dev-only tracing setup.
//!
//! Activation requires BOTH:
//!   - dev environment (debug build OR SCORING_ENV in {local, development, dev})
//!   - SCORING_DEV_LOG=1

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "SCORING_DEV_LOG";
pub const ENV_SCORING_ENV: &str = "SCORING_ENV";

/// Whether dev logging is switched on for this process.
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var(ENV_SCORING_ENV)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Install a compact subscriber when dev logging is enabled.
/// Returns `true` if this call installed it. Safe to call more than once.
pub fn init_tracing() -> bool {
    if !dev_logging_enabled() {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("circular_scores=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[serial_test::serial]
    #[test]
    fn disabled_without_flag() {
        std::env::remove_var(ENV_DEV_LOG);
        assert!(!dev_logging_enabled());
        assert!(!init_tracing());
    }

    #[serial_test::serial]
    #[test]
    fn flag_enables_in_dev_env() {
        std::env::set_var(ENV_DEV_LOG, "1");
        std::env::set_var(ENV_SCORING_ENV, "local");
        assert!(dev_logging_enabled());
        std::env::remove_var(ENV_DEV_LOG);
        std::env::remove_var(ENV_SCORING_ENV);
    }
}
