use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::analysis::video::{PreAnnotated, TrackSource};
use crate::analysis::{
    AnalysisConfig, AnalysisError, AudioMetrics, Baseline, Indicator, LandmarkTrack, VideoMetrics,
};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/audio", post(analyze_audio))
        .route("/video", post(analyze_video))
        .route("/combined", post(analyze_combined))
        .route("/videos", post(analyze_videos))
        .route("/fuse", post(fuse_metrics))
        .route("/indicator", post(score_indicator))
        .route("/config", get(get_config).put(update_config))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioRequest {
    audio: AudioMetrics,
    #[serde(default)]
    baseline: Baseline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRequest {
    track: LandmarkTrack,
    #[serde(default)]
    baseline: Baseline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CombinedRequest {
    audio: AudioMetrics,
    track: LandmarkTrack,
    #[serde(default)]
    baseline: Baseline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest {
    tracks: Vec<LandmarkTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuseRequest {
    #[serde(default)]
    audio: Option<AudioMetrics>,
    #[serde(default)]
    video: Option<VideoMetrics>,
    #[serde(default)]
    baseline: Baseline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndicatorRequest {
    indicator: Indicator,
    value: f64,
    #[serde(default)]
    baseline: Option<f64>,
}

/// One entry of a batch response, in submission order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchItem {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<VideoMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<BatchItemError>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchItemError {
    code: String,
    message: String,
}

impl BatchItem {
    fn from_outcome(index: usize, outcome: Result<VideoMetrics, AnalysisError>) -> Self {
        match outcome {
            Ok(metrics) => Self {
                index,
                metrics: Some(metrics),
                error: None,
            },
            Err(e) => {
                let app: AppError = e.into();
                let message = if app.is_operational {
                    app.message
                } else {
                    "Internal server error".to_string()
                };
                Self {
                    index,
                    metrics: None,
                    error: Some(BatchItemError {
                        code: app.code,
                        message,
                    }),
                }
            }
        }
    }
}

async fn analyze_audio(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AudioRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_audio(&req.audio)?;
    validation::validate_baseline(&req.baseline)?;

    let report = state
        .engine()
        .analyze(Some(req.audio), None, &req.baseline)
        .await?;
    Ok(ok(report))
}

async fn analyze_video(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<VideoRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_track(&req.track)?;
    validation::validate_baseline(&req.baseline)?;

    let report = state
        .engine()
        .analyze(None, Some(req.track), &req.baseline)
        .await?;
    Ok(ok(report))
}

async fn analyze_combined(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CombinedRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_audio(&req.audio)?;
    validation::validate_track(&req.track)?;
    validation::validate_baseline(&req.baseline)?;

    let report = state
        .engine()
        .analyze(Some(req.audio), Some(req.track), &req.baseline)
        .await?;
    Ok(ok(report))
}

async fn analyze_videos(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_batch_size(req.tracks.len())?;
    for track in &req.tracks {
        validation::validate_track(track)?;
    }

    let jobs: Vec<(TrackSource, PreAnnotated)> = req
        .tracks
        .into_iter()
        .map(|track| (track.into_source(), PreAnnotated))
        .collect();
    let outcomes = state.engine().extract_videos(jobs).await;

    let items: Vec<BatchItem> = outcomes
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| BatchItem::from_outcome(index, outcome))
        .collect();
    Ok(ok(serde_json::json!({"count": items.len(), "items": items})))
}

async fn fuse_metrics(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<FuseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(audio) = &req.audio {
        validation::validate_audio(audio)?;
    }
    if let Some(video) = &req.video {
        validation::validate_video_metrics(video)?;
    }
    validation::validate_baseline(&req.baseline)?;

    let result = state
        .engine()
        .fuse(req.audio.as_ref(), req.video.as_ref(), &req.baseline)
        .await;
    Ok(ok(result))
}

async fn score_indicator(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<IndicatorRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !req.value.is_finite() || req.baseline.is_some_and(|b| !b.is_finite()) {
        return Err(AnalysisError::InvalidInput("value and baseline must be finite".into()).into());
    }
    let deviation = state
        .engine()
        .score_indicator(req.indicator, req.value, req.baseline)
        .await;
    Ok(ok(serde_json::json!({
        "indicator": req.indicator,
        "deviation": deviation,
    })))
}

async fn get_config(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.engine().get_config().await))
}

async fn update_config(
    State(state): State<AppState>,
    JsonBody(cfg): JsonBody<AnalysisConfig>,
) -> Result<impl IntoResponse, AppError> {
    state.engine().reload_config(cfg).await?;
    tracing::info!(action = "update_analysis_config", "analysis config replaced over HTTP");
    Ok(ok(serde_json::json!({"updated": true})))
}
