use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set when logs should be emitted as JSON lines
pub const LOG_JSON_ENV: &str = "EMP_LOG_JSON";

/// Logs go to stderr so stdout only carries the plan.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let layer = fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var_os(LOG_JSON_ENV).is_some() {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.compact()).init();
    }
}
