use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{AppConfig, LogFormat};

/// Initialize tracing: stdout (compact or JSON), optional daily log files, and Sentry.
///
/// - Default level: `info,autoreply=debug`, override via `RUST_LOG`
/// - Sentry: ERROR events become issues, WARN become breadcrumbs; no-op without a DSN
///
/// Keep the returned guard alive for the life of the process so buffered
/// file output is flushed.
pub fn init(config: &AppConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,autoreply=debug,tower_http=debug"));

    let (pretty_layer, json_layer) = match config.log_format {
        LogFormat::Pretty => (
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_current_span(true).flatten_event(true)),
        ),
    };

    let (file_layer, guard) = match config.log_dir {
        Some(ref dir) => {
            let appender = tracing_appender::rolling::daily(dir, "autoreply.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(file_layer)
        .with(sentry_layer)
        .init();

    tracing::debug!(
        log_format = ?config.log_format,
        file_logging = guard.is_some(),
        "Tracing initialized"
    );
    guard
}
