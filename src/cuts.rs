use std::fmt::{Display, Formatter};

use crate::utils::format_milliseconds;

/// Frame rate assumed for frame stepping. 24 fps is the common encoding
/// rate alongside 25 and 30; the container's real rate is not consulted.
pub const DEFAULT_STEP_FPS: f64 = 24.0;

/// Direction for single-frame stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Backward,
    Forward,
}

/// What the Previous action should do, given how far playback has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportIntent {
    /// Move to the prior playlist item.
    Previous,
    /// Seek to the start of the current item.
    Restart,
}

/// Errors produced by cut-list operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutError {
    NotFound { timestamp_ms: u64 },
}

impl Display for CutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { timestamp_ms } => {
                write!(f, "no cut recorded at {timestamp_ms} ms")
            }
        }
    }
}

impl std::error::Error for CutError {}

/// Tracks the playhead and the recorded cut points for the loaded video.
///
/// All times are in milliseconds. The tracker is mutated only on the UI
/// thread, in response to events drained once per frame; the playback
/// engine never touches it directly.
#[derive(Debug, Default)]
pub struct CutTracker {
    position_ms: u64,
    duration_ms: u64,
    cuts: Vec<u64>,
}

impl CutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Recorded cuts, in insertion order. Duplicates are legal.
    pub fn cuts(&self) -> &[u64] {
        &self.cuts
    }

    /// Record a position reported by the playback engine. Returns the text
    /// for the current-position readout under the time slider.
    pub fn report_position(&mut self, ms: u64) -> String {
        self.position_ms = ms;
        format!(
            "{}/{} ({})",
            ms,
            self.duration_ms,
            format_milliseconds(ms)
        )
    }

    /// Record the duration of a newly loaded video. Sliders and cut bars
    /// bound to the duration re-range to `[0, ms]` on the next frame.
    pub fn report_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Drop all cuts. Called when a different video is loaded — the cut
    /// list always belongs to the current one.
    pub fn clear_cuts(&mut self) {
        self.cuts.clear();
    }

    /// Record a cut at the playhead. Returns the recorded timestamp so the
    /// caller can place a marker for it.
    pub fn add_cut(&mut self) -> u64 {
        self.cuts.push(self.position_ms);
        self.position_ms
    }

    /// Replace the cut recorded at `old_ms` with one at the playhead.
    /// Only the first matching cut is replaced when duplicates exist.
    pub fn update_cut(&mut self, old_ms: u64) -> Result<u64, CutError> {
        let index = self
            .cuts
            .iter()
            .position(|&cut| cut == old_ms)
            .ok_or(CutError::NotFound { timestamp_ms: old_ms })?;
        self.cuts.remove(index);
        self.cuts.push(self.position_ms);
        Ok(self.position_ms)
    }

    /// Compute the seek target one frame away from the playhead.
    ///
    /// The delta is `1000 / fps` milliseconds, left fractional, and the
    /// result is not clamped — it can go below zero or past the duration.
    /// The playback engine clamps to what the media allows.
    pub fn step_frame(&self, direction: StepDirection, fps: f64) -> f64 {
        let delta = 1000.0 / fps;
        let position = self.position_ms as f64;
        match direction {
            StepDirection::Backward => position - delta,
            StepDirection::Forward => position + delta,
        }
    }
}

/// Decide what Previous does: within the first five seconds of playback it
/// moves to the prior playlist item, after that it restarts the current one.
pub fn previous_or_restart(current_position_ms: u64) -> TransportIntent {
    if current_position_ms <= 5000 {
        TransportIntent::Previous
    } else {
        TransportIntent::Restart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_position_returns_the_readout_text() {
        let mut tracker = CutTracker::new();
        tracker.report_duration(10_000);
        assert_eq!(tracker.report_position(5_000), "5000/10000 (00:00:05)");
        assert_eq!(tracker.position_ms(), 5_000);
    }

    #[test]
    fn add_cut_records_the_playhead() {
        let mut tracker = CutTracker::new();
        tracker.report_position(5_000);
        assert_eq!(tracker.add_cut(), 5_000);
        assert_eq!(tracker.cuts(), &[5_000]);
    }

    #[test]
    fn update_cut_moves_to_the_playhead() {
        let mut tracker = CutTracker::new();
        tracker.report_position(5_000);
        tracker.add_cut();
        tracker.report_position(9_000);
        assert_eq!(tracker.update_cut(5_000), Ok(9_000));
        assert_eq!(tracker.cuts(), &[9_000]);
    }

    #[test]
    fn update_cut_rejects_unknown_timestamps() {
        let mut tracker = CutTracker::new();
        assert_eq!(
            tracker.update_cut(123),
            Err(CutError::NotFound { timestamp_ms: 123 })
        );
    }

    #[test]
    fn duplicate_cuts_are_kept_and_updated_one_at_a_time() {
        let mut tracker = CutTracker::new();
        tracker.report_position(2_000);
        tracker.add_cut();
        tracker.add_cut();
        assert_eq!(tracker.cuts(), &[2_000, 2_000]);

        tracker.report_position(7_000);
        tracker.update_cut(2_000).unwrap();
        assert_eq!(tracker.cuts(), &[2_000, 7_000]);
    }

    #[test]
    fn clear_cuts_empties_the_list() {
        let mut tracker = CutTracker::new();
        tracker.report_position(1_000);
        tracker.add_cut();
        tracker.clear_cuts();
        assert!(tracker.cuts().is_empty());
    }

    #[test]
    fn previous_boundary_is_inclusive_at_five_seconds() {
        assert_eq!(previous_or_restart(4_000), TransportIntent::Previous);
        assert_eq!(previous_or_restart(5_000), TransportIntent::Previous);
        assert_eq!(previous_or_restart(5_001), TransportIntent::Restart);
    }

    #[test]
    fn step_is_a_fractional_frame_at_24_fps() {
        let mut tracker = CutTracker::new();
        tracker.report_position(1_000);
        let forward = tracker.step_frame(StepDirection::Forward, 24.0);
        assert!((forward - 1_041.6667).abs() < 0.01);

        let backward = tracker.step_frame(StepDirection::Backward, 24.0);
        assert!((backward - 958.3333).abs() < 0.01);
    }

    #[test]
    fn step_is_not_clamped_at_either_end() {
        let mut tracker = CutTracker::new();
        tracker.report_duration(1_000);

        tracker.report_position(20);
        assert!(tracker.step_frame(StepDirection::Backward, 24.0) < 0.0);

        tracker.report_position(1_000);
        assert!(tracker.step_frame(StepDirection::Forward, 24.0) > 1_000.0);
    }
}
