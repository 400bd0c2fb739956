/// Right eye, 6 points on the 468-point face mesh: outer corner, two upper
/// lid points, inner corner, two lower lid points.
pub const RIGHT_EYE_INDICES: [u16; 6] = [33, 160, 158, 133, 153, 144];

/// Left eye, same order as the right.
pub const LEFT_EYE_INDICES: [u16; 6] = [362, 385, 387, 263, 373, 380];

/// Midpoint of the upper lip's top edge.
pub const UPPER_LIP_TOP: u16 = 13;

/// Midpoint of the lower lip's bottom edge.
pub const LOWER_LIP_BOTTOM: u16 = 14;

pub const LIP_LEFT_CORNER: u16 = 61;

pub const LIP_RIGHT_CORNER: u16 = 291;

/// Population jitter (%) used when the subject has no baseline.
pub const DEFAULT_JITTER_BASELINE: f64 = 0.8;

/// Population pitch standard deviation (Hz) used when the subject has no baseline.
pub const DEFAULT_PITCH_SD_BASELINE: f64 = 15.0;

/// Most videos accepted by one batch request.
pub const MAX_BATCH_VIDEOS: usize = 16;

/// Most frames accepted in a single track.
pub const MAX_TRACK_FRAMES: usize = 100_000;
