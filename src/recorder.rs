//! Combo recording state machine.
//!
//! The GUI feeds key-downs observed while a recording is active; the recorder
//! accumulates them in first-press order, deduplicated, until the recording
//! is committed or cancelled. The recorder itself is pure state so the whole
//! contract is unit-testable without a window or a hook.

use crate::keys;
use crate::state::ComboSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording(ComboSide),
}

#[derive(Debug)]
pub struct ComboRecorder {
    state: RecorderState,
    accumulator: Vec<u32>,
}

impl Default for ComboRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ComboRecorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            accumulator: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> RecorderState {
        self.state
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    #[inline]
    pub fn recording_side(&self) -> Option<ComboSide> {
        match self.state {
            RecorderState::Recording(side) => Some(side),
            RecorderState::Idle => None,
        }
    }

    /// Begins recording for `side`.
    ///
    /// Any recording in progress for the other side is implicitly cancelled;
    /// its partial accumulator is discarded. Returns the side whose recording
    /// was cancelled, if any, so the caller can refresh that side's label.
    pub fn start(&mut self, side: ComboSide) -> Option<ComboSide> {
        let cancelled = match self.state {
            RecorderState::Recording(other) if other != side => Some(other),
            _ => None,
        };
        self.state = RecorderState::Recording(side);
        self.accumulator.clear();
        cancelled
    }

    /// Records one observed key-down.
    ///
    /// Repeats of an already-accumulated key (OS auto-repeat, or release and
    /// press again within the same recording) are ignored; first-press order
    /// is what the accumulator keeps.
    pub fn observe_key_down(&mut self, vk: u32) {
        if !self.is_recording() {
            return;
        }
        if !self.accumulator.contains(&vk) {
            self.accumulator.push(vk);
        }
    }

    /// Ends the recording and hands back the accumulated combo.
    ///
    /// An empty result is valid and means the caller should disable that
    /// direction. Returns `None` when no recording was active.
    pub fn commit(&mut self) -> Option<(ComboSide, Vec<u32>)> {
        match self.state {
            RecorderState::Recording(side) => {
                self.state = RecorderState::Idle;
                Some((side, std::mem::take(&mut self.accumulator)))
            }
            RecorderState::Idle => None,
        }
    }

    /// Discards the recording in progress, leaving the combo untouched.
    pub fn cancel(&mut self) {
        self.state = RecorderState::Idle;
        self.accumulator.clear();
    }

    /// Live feedback line: accumulated display names in first-press order.
    pub fn feedback(&self) -> String {
        keys::join_display_names(&self.accumulator)
    }

    #[inline]
    pub fn accumulated(&self) -> &[u32] {
        &self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let rec = ComboRecorder::new();
        assert_eq!(rec.state(), RecorderState::Idle);
        assert!(!rec.is_recording());
        assert!(rec.accumulated().is_empty());
    }

    #[test]
    fn test_keys_ignored_while_idle() {
        let mut rec = ComboRecorder::new();
        rec.observe_key_down(0x41);
        assert!(rec.accumulated().is_empty());
        assert_eq!(rec.commit(), None);
    }

    #[test]
    fn test_accumulates_in_first_press_order() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Up);
        rec.observe_key_down(0xA2); // LCtrl
        rec.observe_key_down(0x41); // A
        rec.observe_key_down(0x42); // B
        assert_eq!(rec.accumulated(), &[0xA2, 0x41, 0x42]);
        assert_eq!(rec.feedback(), "LCtrl + A + B");
    }

    #[test]
    fn test_auto_repeat_is_deduplicated() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Down);
        rec.observe_key_down(0x41);
        rec.observe_key_down(0x41);
        rec.observe_key_down(0x41);
        rec.observe_key_down(0x42);
        // Re-press after an intervening key keeps the original position
        rec.observe_key_down(0x41);
        assert_eq!(rec.accumulated(), &[0x41, 0x42]);
    }

    #[test]
    fn test_commit_returns_side_and_keys_and_resets() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Up);
        rec.observe_key_down(0x91);
        let (side, combo) = rec.commit().unwrap();
        assert_eq!(side, ComboSide::Up);
        assert_eq!(combo, vec![0x91]);
        assert_eq!(rec.state(), RecorderState::Idle);
        assert!(rec.accumulated().is_empty());
    }

    #[test]
    fn test_empty_commit_is_valid() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Down);
        let (side, combo) = rec.commit().unwrap();
        assert_eq!(side, ComboSide::Down);
        assert!(combo.is_empty());
    }

    #[test]
    fn test_cancel_discards_accumulator() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Up);
        rec.observe_key_down(0x41);
        rec.cancel();
        assert_eq!(rec.state(), RecorderState::Idle);
        assert!(rec.accumulated().is_empty());
        assert_eq!(rec.commit(), None);
    }

    #[test]
    fn test_starting_other_side_cancels_in_progress() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Up);
        rec.observe_key_down(0x41);
        let cancelled = rec.start(ComboSide::Down);
        assert_eq!(cancelled, Some(ComboSide::Up));
        assert!(rec.accumulated().is_empty());
        assert_eq!(rec.recording_side(), Some(ComboSide::Down));
    }

    #[test]
    fn test_restarting_same_side_clears_accumulator() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Up);
        rec.observe_key_down(0x41);
        let cancelled = rec.start(ComboSide::Up);
        assert_eq!(cancelled, None);
        assert!(rec.accumulated().is_empty());
    }

    #[test]
    fn test_feedback_empty_while_nothing_recorded() {
        let mut rec = ComboRecorder::new();
        rec.start(ComboSide::Up);
        assert_eq!(rec.feedback(), "");
    }
}
