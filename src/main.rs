use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use axum::http::{header, HeaderValue};
use risk_analyzer::analysis::{AnalysisConfig, AnalysisEngine};
use risk_analyzer::config::Config;
use risk_analyzer::logging::{init_tracing, LogConfig};
use risk_analyzer::routes::build_router;
use risk_analyzer::state::AppState;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig {
        log_level: config.log_level.clone(),
        enable_file_logs: config.enable_file_logs,
        log_dir: config.log_dir.clone(),
    });
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting risk-analyzer");

    let analysis_config = AnalysisConfig::from_env(&config.analysis);
    if let Err(e) = analysis_config.validate() {
        tracing::error!(error = %e, "Invalid analysis configuration from environment");
        return ExitCode::FAILURE;
    }
    let engine = Arc::new(AnalysisEngine::new(
        analysis_config,
        config.analysis.max_concurrent_videos,
    ));

    let cors_layer = match build_cors_layer(&config) {
        Ok(layer) => layer,
        Err(e) => {
            tracing::error!(cors_origin = %config.cors_origin, error = %e, "Invalid CORS_ORIGIN");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(engine, &config);
    let app = build_router(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let addr = SocketAddr::new(config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind TCP listener");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "HTTP server crashed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}

fn build_cors_layer(config: &Config) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let layer = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_methods(Any);
    if config.cors_origin.trim() == "*" {
        // wildcard origin cannot be combined with credentials
        return Ok(layer.allow_origin(Any).allow_credentials(false));
    }
    let origin = config.cors_origin.trim().parse::<HeaderValue>()?;
    Ok(layer.allow_origin(origin))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
