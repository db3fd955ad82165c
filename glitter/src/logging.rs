use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` names one.
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// An `env_logger` filter such as `"glitter=debug"`. Takes precedence
    /// over `RUST_LOG`.
    pub filter: Option<String>,
}

impl LoggingConfig {
    fn resolve_filter(&self, env: Option<String>) -> String {
        self.filter
            .clone()
            .or(env)
            .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
    }
}

static INIT: Once = Once::new();

/// Installs the global stderr logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());
        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .target(env_logger::Target::Stderr)
            .try_init();
        if installed.is_ok() {
            log::debug!("logging to stderr with filter {filter:?}");
        }
    });
}
