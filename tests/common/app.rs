use std::sync::Arc;

use axum::Router;

use risk_analyzer::analysis::{AnalysisConfig, AnalysisEngine};
use risk_analyzer::config::{AnalysisEnvConfig, Config};
use risk_analyzer::routes::build_router;
use risk_analyzer::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

/// Builds `Config` directly so parallel tests never race on `set_var`.
pub fn test_config() -> Config {
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 8000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        max_body_bytes: 8 * 1024 * 1024,
        analysis: AnalysisEnvConfig {
            frame_stride: 3,
            ear_threshold: 0.21,
            default_fps: 30.0,
            high_risk_cutoff: 0.45,
            medium_risk_cutoff: 0.20,
            max_concurrent_videos: 2,
        },
    }
}

pub fn spawn_with_config(config: Config) -> TestApp {
    let engine = Arc::new(AnalysisEngine::new(
        AnalysisConfig::from_env(&config.analysis),
        config.analysis.max_concurrent_videos,
    ));
    let state = AppState::new(engine, &config);
    let app = build_router(state.clone());

    TestApp { app, state, config }
}

pub fn spawn_test_app() -> TestApp {
    spawn_with_config(test_config())
}
