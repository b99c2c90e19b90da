//! Gaze ring: fill progress while the gaze rests on one target.

use gazecast_core::ObjectId;

/// Percent value at which the ring counts as full.
pub const RING_FULL: f32 = 100.0;

/// Timed fill toward [`RING_FULL`] while the target stays the same.
#[derive(Debug, Clone, PartialEq)]
pub struct GazeRing {
    time_to_gaze: f32,
    target: Option<ObjectId>,
    gaze_on_time: f32,
    percent: f32,
}

impl GazeRing {
    /// Ring that fills in `time_to_gaze` seconds.
    pub fn new(time_to_gaze: f32) -> Self {
        Self {
            time_to_gaze,
            target: None,
            gaze_on_time: 0.0,
            percent: 0.0,
        }
    }

    /// Change the fill time; progress is recomputed on the next update.
    pub fn set_time_to_gaze(&mut self, seconds: f32) {
        self.time_to_gaze = seconds;
    }

    /// Progress in `[0, 100]`.
    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// Ring is full.
    pub fn is_full(&self) -> bool {
        self.percent >= RING_FULL
    }

    /// Advance with this tick's target. A new target (or none) restarts the fill.
    pub fn update(&mut self, target: Option<ObjectId>, now: f32) {
        if target != self.target {
            self.target = target;
            self.restart(now);
            return;
        }
        if target.is_none() {
            self.percent = 0.0;
            return;
        }
        let elapsed = now - self.gaze_on_time;
        self.percent = if self.time_to_gaze > 0.0 {
            (elapsed / self.time_to_gaze * RING_FULL).clamp(0.0, RING_FULL)
        } else {
            RING_FULL
        };
    }

    /// Empty the ring and start timing from `now`.
    pub fn restart(&mut self, now: f32) {
        self.gaze_on_time = now;
        self.percent = 0.0;
    }

    /// Forget the target.
    pub fn reset(&mut self) {
        self.target = None;
        self.percent = 0.0;
    }
}
