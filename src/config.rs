use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub max_body_bytes: usize,
    pub analysis: AnalysisEnvConfig,
}

/// Env overrides for the analysis policy; everything else keeps its default.
#[derive(Debug, Clone)]
pub struct AnalysisEnvConfig {
    pub frame_stride: u32,
    pub ear_threshold: f64,
    pub default_fps: f64,
    pub high_risk_cutoff: f64,
    pub medium_risk_cutoff: f64,
    pub max_concurrent_videos: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 8000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            max_body_bytes: env_or_parse("MAX_BODY_BYTES", 8 * 1024 * 1024_usize),
            analysis: AnalysisEnvConfig {
                frame_stride: env_or_parse("ANALYSIS_FRAME_STRIDE", 3_u32),
                ear_threshold: env_or_parse("ANALYSIS_EAR_THRESHOLD", 0.21_f64),
                default_fps: env_or_parse("ANALYSIS_DEFAULT_FPS", 30.0_f64),
                high_risk_cutoff: env_or_parse("ANALYSIS_HIGH_RISK_CUTOFF", 0.45_f64),
                medium_risk_cutoff: env_or_parse("ANALYSIS_MEDIUM_RISK_CUTOFF", 0.20_f64),
                max_concurrent_videos: env_or_parse("ANALYSIS_MAX_CONCURRENT_VIDEOS", 4_usize),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Unparseable env var, keeping default");
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
