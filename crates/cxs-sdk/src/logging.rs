//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "cxs_sdk=info,cxs_runtime=info";

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `level`; without either the crates log at `info`.
/// Returns false when a global subscriber was already installed, so calling
/// this more than once is harmless.
pub fn init_tracing(level: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::try_new(format!("cxs_sdk={0},cxs_runtime={0}", level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES)),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(Some("debug"));
        assert!(!init_tracing(None));
    }
}
