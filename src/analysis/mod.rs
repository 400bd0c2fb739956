pub mod blink;
pub mod config;
pub mod deviation;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod geometry;
pub mod metrics;
pub mod types;
pub mod video;

pub use config::AnalysisConfig;
pub use engine::{AnalysisEngine, AnalysisReport};
pub use error::AnalysisError;
pub use types::{
    AudioMetrics, Baseline, FusionResult, Indicator, Landmarks, Point, RiskLevel, VideoMetrics,
    VideoStatus,
};
pub use video::{FrameSource, LandmarkDetector, LandmarkTrack};
