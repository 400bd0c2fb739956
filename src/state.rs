use std::sync::Arc;
use std::time::Instant;

use crate::analysis::AnalysisEngine;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<AnalysisEngine>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(engine: Arc<AnalysisEngine>, config: &Config) -> Self {
        Self {
            engine,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
