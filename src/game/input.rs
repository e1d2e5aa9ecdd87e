//! Input Capture and Recording
//!
//! One `InputFrame` is the set of keys held during a tick. Keys are
//! level-triggered: holding attack re-requests an attack every tick and
//! the player's own gates decide whether anything happens.
//!
//! `InputRecording` stores only the ticks where the held set changed, and
//! replays them tick by tick.

use serde::{Serialize, Deserialize};

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Keys held during a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct InputFrame {
    /// Packed key bits, see the `FLAG_*` constants
    pub flags: u8,
}

impl InputFrame {
    /// Size in bytes
    pub const SIZE: usize = 1;

    /// Move up
    pub const FLAG_UP: u8 = 0x01;
    /// Move down
    pub const FLAG_DOWN: u8 = 0x02;
    /// Move left
    pub const FLAG_LEFT: u8 = 0x04;
    /// Move right
    pub const FLAG_RIGHT: u8 = 0x08;
    /// Swing the weapon
    pub const FLAG_ATTACK: u8 = 0x10;
    /// Cast the selected spell
    pub const FLAG_MAGIC: u8 = 0x20;
    /// Cycle to the next weapon
    pub const FLAG_SWITCH_WEAPON: u8 = 0x40;
    /// Cycle to the next spell
    pub const FLAG_SWITCH_MAGIC: u8 = 0x80;

    /// No keys held.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Frame with exactly the given bits held.
    pub const fn from_flags(flags: u8) -> Self {
        Self { flags }
    }

    /// Copy with one more key held.
    pub const fn with(self, flag: u8) -> Self {
        Self { flags: self.flags | flag }
    }

    /// True if `flag` is held.
    #[inline]
    pub fn pressed(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Set or clear one key.
    #[inline]
    pub fn set(&mut self, flag: u8, pressed: bool) {
        if pressed {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    /// Horizontal axis: -1 (left), 0, +1 (right). Opposing keys cancel.
    #[inline]
    pub fn horizontal(&self) -> i32 {
        self.pressed(Self::FLAG_RIGHT) as i32 - self.pressed(Self::FLAG_LEFT) as i32
    }

    /// Vertical axis in screen space: -1 (up), 0, +1 (down). Opposing keys cancel.
    #[inline]
    pub fn vertical(&self) -> i32 {
        self.pressed(Self::FLAG_DOWN) as i32 - self.pressed(Self::FLAG_UP) as i32
    }

    /// Attack key held.
    #[inline]
    pub fn attack_pressed(&self) -> bool {
        self.pressed(Self::FLAG_ATTACK)
    }

    /// Magic key held.
    #[inline]
    pub fn magic_pressed(&self) -> bool {
        self.pressed(Self::FLAG_MAGIC)
    }

    /// Weapon switch key held.
    #[inline]
    pub fn switch_weapon_pressed(&self) -> bool {
        self.pressed(Self::FLAG_SWITCH_WEAPON)
    }

    /// Magic switch key held.
    #[inline]
    pub fn switch_magic_pressed(&self) -> bool {
        self.pressed(Self::FLAG_SWITCH_MAGIC)
    }

    /// Check if this is an idle frame (no keys).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

/// Input change stored in a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Size in bytes (approximate)
    pub const SIZE: usize = 5;

    /// Change to `frame` at `tick`.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Complete input recording of one level run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputRecording {
    /// Starting tick (usually 0)
    pub start_tick: u32,

    /// Last recorded tick
    pub end_tick: u32,

    /// Only ticks where input CHANGED
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl Default for InputRecording {
    fn default() -> Self {
        Self::new()
    }
}

impl InputRecording {
    /// Empty recording starting at tick 0.
    pub fn new() -> Self {
        Self {
            start_tick: 0,
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    ///
    /// Only stores if input changed from previous frame.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Input held at a specific tick.
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        // Last delta at or before this tick
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Stored changes, in tick order.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Number of stored changes.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Number of ticks covered, `start_tick..=end_tick`.
    pub fn tick_count(&self) -> u32 {
        self.end_tick.saturating_sub(self.start_tick) + 1
    }

    /// Estimated size in bytes.
    pub fn estimated_size(&self) -> usize {
        8 + (self.deltas.len() * InputDelta::SIZE)
    }

    /// Finalize the recording (call when the run ends).
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Iterate over every tick's input for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.recording.end_tick {
            return None;
        }

        while self.delta_idx < self.recording.deltas.len() {
            let delta = &self.recording.deltas[self.delta_idx];
            if delta.tick <= self.current_tick {
                self.current_frame = delta.frame;
                self.delta_idx += 1;
            } else {
                break;
            }
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_frame_flags() {
        let mut frame = InputFrame::new();
        assert!(!frame.attack_pressed());
        assert!(!frame.magic_pressed());

        frame.set(InputFrame::FLAG_ATTACK, true);
        assert!(frame.attack_pressed());
        assert!(!frame.magic_pressed());

        frame.set(InputFrame::FLAG_MAGIC, true);
        frame.set(InputFrame::FLAG_ATTACK, false);
        assert!(!frame.attack_pressed());
        assert!(frame.magic_pressed());
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let frame = InputFrame::new()
            .with(InputFrame::FLAG_LEFT)
            .with(InputFrame::FLAG_RIGHT)
            .with(InputFrame::FLAG_UP);
        assert_eq!(frame.horizontal(), 0);
        assert_eq!(frame.vertical(), -1);

        let down = InputFrame::from_flags(InputFrame::FLAG_DOWN);
        assert_eq!(down.vertical(), 1);
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut rec = InputRecording::new();

        let frame = InputFrame::from_flags(InputFrame::FLAG_RIGHT);
        for tick in 0..4 {
            rec.record(tick, frame);
        }
        assert_eq!(rec.delta_count(), 1);

        rec.record(4, InputFrame::from_flags(InputFrame::FLAG_LEFT));
        assert_eq!(rec.delta_count(), 2);
    }

    #[test]
    fn test_idle_prefix_is_not_stored() {
        let mut rec = InputRecording::new();
        rec.record(0, InputFrame::new());
        rec.record(1, InputFrame::new());
        assert_eq!(rec.delta_count(), 0);
        assert_eq!(rec.tick_count(), 2);
    }

    #[test]
    fn test_recording_get_at() {
        let mut rec = InputRecording::new();

        let frame1 = InputFrame::from_flags(InputFrame::FLAG_UP);
        let frame2 = InputFrame::from_flags(InputFrame::FLAG_ATTACK);
        let frame3 = InputFrame::from_flags(InputFrame::FLAG_DOWN);

        rec.record(10, frame1);
        rec.record(20, frame2);
        rec.record(30, frame3);

        assert!(rec.get_input_at(5).is_idle());
        assert_eq!(rec.get_input_at(10), frame1);
        assert_eq!(rec.get_input_at(15), frame1);
        assert_eq!(rec.get_input_at(25), frame2);
        assert_eq!(rec.get_input_at(30), frame3);
        assert_eq!(rec.get_input_at(100), frame3);
    }

    #[test]
    fn test_replay_iterator() {
        let mut rec = InputRecording::new();

        rec.record(0, InputFrame::from_flags(InputFrame::FLAG_LEFT));
        rec.record(3, InputFrame::from_flags(InputFrame::FLAG_RIGHT));
        rec.finalize(5);

        let frames: Vec<_> = rec.replay_iter().collect();

        assert_eq!(frames.len(), 6);
        assert_eq!(frames[0].1.horizontal(), -1);
        assert_eq!(frames[2].1.horizontal(), -1);
        assert_eq!(frames[3].1.horizontal(), 1);
        assert_eq!(frames[5].1.horizontal(), 1);
        assert_eq!(frames[5].0, 5);
    }

    #[test]
    fn test_recording_serde() {
        let mut rec = InputRecording::new();
        rec.record(0, InputFrame::from_flags(InputFrame::FLAG_ATTACK));
        rec.record(7, InputFrame::new());

        let json = serde_json::to_string(&rec).unwrap();
        let back: InputRecording = serde_json::from_str(&json).unwrap();
        assert_eq!(back.deltas(), rec.deltas());
        assert_eq!(back.end_tick, 7);
    }
}
