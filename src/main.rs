use std::process::ExitCode;

use autoreply::config::AppConfig;

fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("autoreply-server: {e}");
            return ExitCode::from(2);
        }
    };

    // Initialize Sentry before anything else so panics during startup are captured.
    // Returns a no-op guard when no DSN is configured (local dev).
    let _sentry_guard = sentry::init(sentry_options(&config));
    let _log_guard = autoreply::logging::init(&config);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(autoreply::run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), "autoreply-server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn sentry_options(config: &AppConfig) -> sentry::ClientOptions {
    sentry::ClientOptions {
        dsn: config.sentry_dsn.as_deref().and_then(|s| s.parse().ok()),
        release: Some(env!("CARGO_PKG_VERSION").into()),
        traces_sample_rate: 0.0,
        send_default_pii: false,
        before_send: Some(std::sync::Arc::new(|mut event| {
            if let Some(ref mut user) = event.user {
                user.ip_address = None;
            }
            if let Some(ref mut request) = event.request {
                // Chat messages and response texts stay out of error reports.
                request.data = None;
            }
            Some(event)
        })),
        ..Default::default()
    }
}
