//! Per-frame geometric features.
//!
//! - EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|)
//! - lip tension = |upper_top - lower_bottom| / |left_corner - right_corner|
//!
//! Zero-width geometry yields 0.0, never an error.

use crate::analysis::config::FaceLayout;
use crate::analysis::types::{Landmarks, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LipPoints {
    pub upper_top: Point,
    pub lower_bottom: Point,
    pub left_corner: Point,
    pub right_corner: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFeatures {
    pub left_ear: f64,
    pub right_ear: f64,
    pub lip_tension: f64,
}

impl FrameFeatures {
    pub fn avg_ear(&self) -> f64 {
        (self.left_ear + self.right_ear) / 2.0
    }
}

/// Eye aspect ratio for six contour points ordered outer corner, two upper
/// lid, inner corner, two lower lid.
pub fn eye_openness(eye: &[Point; 6]) -> f64 {
    let [p1, p2, p3, p4, p5, p6] = eye;
    let horizontal = p1.distance(p4);
    if horizontal == 0.0 {
        return 0.0;
    }
    (p2.distance(p6) + p3.distance(p5)) / (2.0 * horizontal)
}

/// Lower value means more compressed lips.
pub fn lip_tension(lips: &LipPoints) -> f64 {
    let horizontal = lips.left_corner.distance(&lips.right_corner);
    if horizontal == 0.0 {
        return 0.0;
    }
    lips.upper_top.distance(&lips.lower_bottom) / horizontal
}

fn eye_points(landmarks: &Landmarks, indices: &[u16; 6]) -> Option<[Point; 6]> {
    let mut points = [Point::new(0.0, 0.0); 6];
    for (slot, idx) in points.iter_mut().zip(indices) {
        *slot = landmarks.get(*idx)?;
    }
    Some(points)
}

fn lip_points(landmarks: &Landmarks, layout: &FaceLayout) -> Option<LipPoints> {
    Some(LipPoints {
        upper_top: landmarks.get(layout.upper_lip_top)?,
        lower_bottom: landmarks.get(layout.lower_lip_bottom)?,
        left_corner: landmarks.get(layout.lip_left_corner)?,
        right_corner: landmarks.get(layout.lip_right_corner)?,
    })
}

/// Resolves the layout against one frame. `None` when any required landmark
/// is missing; callers treat that frame as having no face.
pub fn frame_features(landmarks: &Landmarks, layout: &FaceLayout) -> Option<FrameFeatures> {
    let left = eye_points(landmarks, &layout.left_eye)?;
    let right = eye_points(landmarks, &layout.right_eye)?;
    let lips = lip_points(landmarks, layout)?;

    Some(FrameFeatures {
        left_ear: eye_openness(&left),
        right_ear: eye_openness(&right),
        lip_tension: lip_tension(&lips),
    })
}
