/*!
 * Tracing Setup
 * Diagnostics go to stderr so supervised commands own stdout
 */

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Filter directives, same syntax as RUST_LOG
pub const LOG_ENV: &str = "PROCWARDEN_LOG";

/// Set to `1` or `true` for JSON lines
pub const LOG_JSON_ENV: &str = "PROCWARDEN_LOG_JSON";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Initialize structured tracing.
///
/// Quiet by default (warnings and errors only). Safe to call more than
/// once; later calls are no-ops.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let use_json = std::env::var(LOG_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(json = use_json, "tracing initialized");
    }
}
