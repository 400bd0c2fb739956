use serde_json::Value;

use risk_analyzer::analysis::config::FaceLayout;
use risk_analyzer::analysis::{AudioMetrics, LandmarkTrack, Landmarks, Point};

pub const OPEN_EAR: f64 = 0.30;
pub const CLOSED_EAR: f64 = 0.10;

/// Synthetic face with averaged EAR `ear` and lip tension `lip`, laid out on
/// the default mesh indices.
pub fn face(ear: f64, lip: f64) -> Landmarks {
    let layout = FaceLayout::default();
    let width = 0.1;
    let opening = ear * width;
    let eye = |x0: f64| {
        [
            Point::new(x0, 0.4),
            Point::new(x0 + width / 3.0, 0.4 - opening / 2.0),
            Point::new(x0 + 2.0 * width / 3.0, 0.4 - opening / 2.0),
            Point::new(x0 + width, 0.4),
            Point::new(x0 + 2.0 * width / 3.0, 0.4 + opening / 2.0),
            Point::new(x0 + width / 3.0, 0.4 + opening / 2.0),
        ]
    };

    let mut lm = Landmarks::new();
    for (i, p) in layout.right_eye.iter().zip(eye(0.3)) {
        lm.insert(*i, p);
    }
    for (i, p) in layout.left_eye.iter().zip(eye(0.6)) {
        lm.insert(*i, p);
    }
    lm.insert(layout.upper_lip_top, Point::new(0.5, 0.7));
    lm.insert(layout.lower_lip_bottom, Point::new(0.5, 0.7 + lip * 0.1));
    lm.insert(layout.lip_left_corner, Point::new(0.45, 0.72));
    lm.insert(layout.lip_right_corner, Point::new(0.55, 0.72));
    lm
}

/// `seconds` of video at `fps` with one 6-frame blink every `period` frames
/// (`period == 0` means the eyes never close).
pub fn blinking_track(seconds: u32, fps: u32, period: usize, lip: f64) -> LandmarkTrack {
    let total = (seconds * fps) as usize;
    let frames = (0..total)
        .map(|i| {
            let closed = period > 0 && i % period >= period / 2 && i % period < period / 2 + 6;
            let ear = if closed { CLOSED_EAR } else { OPEN_EAR };
            Some(face(ear, lip))
        })
        .collect();
    LandmarkTrack {
        fps: fps as f64,
        frame_count: None,
        frames,
    }
}

pub fn faceless_track(seconds: u32, fps: u32) -> LandmarkTrack {
    LandmarkTrack {
        fps: fps as f64,
        frame_count: None,
        frames: vec![None; (seconds * fps) as usize],
    }
}

pub fn stressed_audio() -> AudioMetrics {
    AudioMetrics {
        jitter_percent: Some(4.0),
        shimmer_percent: Some(13.0),
        pitch_sd_hz: Some(45.0),
        mean_pitch_hz: Some(210.0),
        hnr_db: Some(3.0),
        duration_s: Some(20.0),
        noise_only: false,
    }
}

pub fn calm_audio() -> AudioMetrics {
    AudioMetrics {
        jitter_percent: Some(0.8),
        shimmer_percent: Some(2.0),
        pitch_sd_hz: Some(15.0),
        mean_pitch_hz: Some(180.0),
        hnr_db: Some(20.0),
        duration_s: Some(20.0),
        noise_only: false,
    }
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("serialize fixture")
}
