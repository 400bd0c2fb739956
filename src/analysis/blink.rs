//! Blink event detection.
//!
//! Two-state machine over the averaged EAR of each analyzed frame:
//! Open → Closed when EAR drops below the threshold, Closed → Open when it
//! rises back to/above it, emitting one `BlinkEvent`.
//!
//! A dip still open at end of stream is discarded; only completed
//! transitions are counted. Frames must arrive in presentation order.

use crate::analysis::types::BlinkEvent;

#[derive(Clone, Copy, PartialEq, Debug)]
enum EyeState {
    Open,
    Closed { start_frame: u64 },
}

#[derive(Debug)]
pub struct BlinkDetector {
    threshold: f64,
    fps: f64,
    state: EyeState,
    events: Vec<BlinkEvent>,
}

impl BlinkDetector {
    pub fn new(threshold: f64, fps: f64) -> Self {
        Self {
            threshold,
            fps,
            state: EyeState::Open,
            events: Vec::new(),
        }
    }

    /// Feeds one analyzed frame. Returns the blink completed on this frame,
    /// if any.
    pub fn update(&mut self, avg_ear: f64, frame_index: u64) -> Option<BlinkEvent> {
        match self.state {
            EyeState::Open => {
                if avg_ear < self.threshold {
                    self.state = EyeState::Closed {
                        start_frame: frame_index,
                    };
                }
                None
            }
            EyeState::Closed { start_frame } => {
                if avg_ear < self.threshold {
                    return None;
                }
                self.state = EyeState::Open;
                let frames = frame_index.saturating_sub(start_frame);
                let event = BlinkEvent {
                    start_frame,
                    end_frame: frame_index,
                    duration_ms: frames as f64 / self.fps * 1000.0,
                };
                self.events.push(event);
                Some(event)
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, EyeState::Closed { .. })
    }

    pub fn blink_count(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn events(&self) -> &[BlinkEvent] {
        &self.events
    }

    pub fn avg_duration_ms(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.events.iter().map(|e| e.duration_ms).sum();
        sum / self.events.len() as f64
    }

    /// Consumes the detector. An unterminated closure is dropped here.
    pub fn finish(self) -> Vec<BlinkEvent> {
        if let EyeState::Closed { start_frame } = self.state {
            tracing::debug!(start_frame, "discarding blink still open at end of stream");
        }
        self.events
    }

    pub fn reset(&mut self) {
        self.state = EyeState::Open;
        self.events.clear();
    }
}
