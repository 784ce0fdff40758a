//! Input Actions and Recording
//!
//! The input source collaborator drives named actions (press/release).
//! Once per tick the host takes a snapshot of them as an [`InputFrame`],
//! which is the only input the simulation sees. Frames can be recorded
//! (delta-compressed) and replayed.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::game::player::Weapon;

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Input state for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Action flags (packed bits):
    /// - Bit 0: move left held
    /// - Bit 1: move right held
    /// - Bit 2: jump pressed
    /// - Bit 3: fire pressed
    /// - Bit 4: exit pressed
    /// - Bit 5-7: Reserved
    pub flags: u8,

    /// Weapon chosen this tick, if any
    pub select_weapon: Option<Weapon>,
}

impl InputFrame {
    /// Move left flag bit
    pub const FLAG_MOVE_LEFT: u8 = 0x01;

    /// Move right flag bit
    pub const FLAG_MOVE_RIGHT: u8 = 0x02;

    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x04;

    /// Fire flag bit
    pub const FLAG_FIRE: u8 = 0x08;

    /// Exit flag bit
    pub const FLAG_EXIT: u8 = 0x10;

    /// Create a new empty input frame.
    pub const fn new() -> Self {
        Self {
            flags: 0,
            select_weapon: None,
        }
    }

    /// Create a frame with the given flags set.
    pub const fn with_flags(flags: u8) -> Self {
        Self {
            flags,
            select_weapon: None,
        }
    }

    /// Builder: also select `weapon`.
    pub const fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.select_weapon = Some(weapon);
        self
    }

    /// Check if move left is held.
    #[inline]
    pub fn move_left(&self) -> bool {
        self.flags & Self::FLAG_MOVE_LEFT != 0
    }

    /// Check if move right is held.
    #[inline]
    pub fn move_right(&self) -> bool {
        self.flags & Self::FLAG_MOVE_RIGHT != 0
    }

    /// Check if jump was pressed.
    #[inline]
    pub fn jump(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if fire was pressed.
    #[inline]
    pub fn fire(&self) -> bool {
        self.flags & Self::FLAG_FIRE != 0
    }

    /// Check if exit was pressed.
    #[inline]
    pub fn exit(&self) -> bool {
        self.flags & Self::FLAG_EXIT != 0
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0 && self.select_weapon.is_none()
    }

    /// Set or clear a flag bit.
    #[inline]
    pub fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// How an action reports presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionBehavior {
    /// Pressed for as long as it is held down
    Held,
    /// Pressed once per physical press; must be released before the next
    InitialPressOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PressState {
    Released,
    Pressed,
    WaitingForRelease,
}

/// One named boolean action.
#[derive(Clone, Debug)]
pub struct ActionState {
    name: &'static str,
    behavior: ActionBehavior,
    state: PressState,
    amount: u32,
}

impl ActionState {
    /// Create a released action.
    pub fn new(name: &'static str, behavior: ActionBehavior) -> Self {
        Self {
            name,
            behavior,
            state: PressState::Released,
            amount: 0,
        }
    }

    /// Action name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Behavior of this action
    pub fn behavior(&self) -> ActionBehavior {
        self.behavior
    }

    /// Physical press. Ignored while waiting for release.
    pub fn press(&mut self) {
        if self.state != PressState::WaitingForRelease {
            self.amount = self.amount.saturating_add(1);
            self.state = PressState::Pressed;
        }
    }

    /// Physical release.
    pub fn release(&mut self) {
        self.state = PressState::Released;
    }

    /// Press and release within one frame.
    pub fn tap(&mut self) {
        self.press();
        self.release();
    }

    /// Clear all state.
    pub fn reset(&mut self) {
        self.state = PressState::Released;
        self.amount = 0;
    }

    /// Presses since the last query. Consumes them where the behavior says so.
    pub fn take_amount(&mut self) -> u32 {
        let amount = self.amount;
        if amount != 0 {
            if self.state == PressState::Released {
                self.amount = 0;
            } else if self.behavior == ActionBehavior::InitialPressOnly {
                self.state = PressState::WaitingForRelease;
                self.amount = 0;
            }
        }
        amount
    }

    /// Whether the action counts as pressed. Consumes like [`take_amount`].
    ///
    /// [`take_amount`]: ActionState::take_amount
    pub fn is_pressed(&mut self) -> bool {
        self.take_amount() != 0
    }
}

/// The actions the simulation understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk left
    MoveLeft,
    /// Walk right
    MoveRight,
    /// Jump
    Jump,
    /// Fire the selected weapon
    Fire,
    /// Leave the game loop
    Exit,
    /// Select a weapon
    SelectWeapon(Weapon),
}

/// All actions, ready to be snapshotted once per tick.
#[derive(Clone, Debug)]
pub struct ActionSet {
    move_left: ActionState,
    move_right: ActionState,
    jump: ActionState,
    fire: ActionState,
    exit: ActionState,
    select_weapon: [ActionState; 4],
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionSet {
    /// Movement is held; everything else is edge-triggered.
    pub fn new() -> Self {
        use ActionBehavior::{Held, InitialPressOnly};
        Self {
            move_left: ActionState::new("move_left", Held),
            move_right: ActionState::new("move_right", Held),
            jump: ActionState::new("jump", InitialPressOnly),
            fire: ActionState::new("fire", InitialPressOnly),
            exit: ActionState::new("exit", InitialPressOnly),
            select_weapon: [
                ActionState::new("select_weapon_0", InitialPressOnly),
                ActionState::new("select_weapon_1", InitialPressOnly),
                ActionState::new("select_weapon_2", InitialPressOnly),
                ActionState::new("select_weapon_3", InitialPressOnly),
            ],
        }
    }

    /// Mutable access to one action.
    pub fn action_mut(&mut self, action: Action) -> &mut ActionState {
        match action {
            Action::MoveLeft => &mut self.move_left,
            Action::MoveRight => &mut self.move_right,
            Action::Jump => &mut self.jump,
            Action::Fire => &mut self.fire,
            Action::Exit => &mut self.exit,
            Action::SelectWeapon(weapon) => &mut self.select_weapon[weapon.slot() as usize],
        }
    }

    /// Physical press of `action`.
    pub fn press(&mut self, action: Action) {
        self.action_mut(action).press();
    }

    /// Physical release of `action`.
    pub fn release(&mut self, action: Action) {
        self.action_mut(action).release();
    }

    /// Release everything and drop pending presses.
    pub fn reset(&mut self) {
        for state in self.states_mut() {
            state.reset();
        }
    }

    /// Query every action once and pack the result.
    ///
    /// When several weapon slots fire in the same tick the highest wins.
    pub fn snapshot(&mut self) -> InputFrame {
        let mut frame = InputFrame::new();
        frame.set_flag(InputFrame::FLAG_MOVE_LEFT, self.move_left.is_pressed());
        frame.set_flag(InputFrame::FLAG_MOVE_RIGHT, self.move_right.is_pressed());
        frame.set_flag(InputFrame::FLAG_JUMP, self.jump.is_pressed());
        frame.set_flag(InputFrame::FLAG_FIRE, self.fire.is_pressed());
        frame.set_flag(InputFrame::FLAG_EXIT, self.exit.is_pressed());

        for weapon in Weapon::ALL {
            if self.select_weapon[weapon.slot() as usize].is_pressed() {
                frame.select_weapon = Some(weapon);
            }
        }

        frame
    }

    fn states_mut(&mut self) -> impl Iterator<Item = &mut ActionState> {
        [
            &mut self.move_left,
            &mut self.move_right,
            &mut self.jump,
            &mut self.fire,
            &mut self.exit,
        ]
        .into_iter()
        .chain(self.select_weapon.iter_mut())
    }
}

// =============================================================================
// RECORDING
// =============================================================================

/// Delta-compressed recording entry.
///
/// Only stored when the frame or the elapsed time changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input began
    pub tick: u64,
    /// Elapsed milliseconds fed to each tick from here on
    pub elapsed_ms: u64,
    /// The new input state
    pub frame: InputFrame,
}

/// Input recording for one level attempt.
///
/// Used for replay validation: feeding the same recording into the same
/// starting grid must give the same final state hash.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Number of ticks recorded
    pub tick_count: u64,

    /// Delta-compressed input data
    deltas: Vec<InputDelta>,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the input for the next tick.
    pub fn record(&mut self, elapsed_ms: u64, frame: InputFrame) {
        let tick = self.tick_count;
        self.tick_count += 1;

        let changed = self
            .deltas
            .last()
            .map_or(true, |d| d.frame != frame || d.elapsed_ms != elapsed_ms);
        if changed {
            self.deltas.push(InputDelta { tick, elapsed_ms, frame });
        }
    }

    /// Input and elapsed time at `tick`, `None` past the end.
    pub fn get_input_at(&self, tick: u64) -> Option<(u64, InputFrame)> {
        if tick >= self.tick_count {
            return None;
        }
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        let delta = self.deltas.get(idx.checked_sub(1)?)?;
        Some((delta.elapsed_ms, delta.frame))
    }

    /// Stored deltas
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Hash of the recording, for pairing with a final state hash.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u64(self.tick_count);
        for delta in &self.deltas {
            hasher.update_u64(delta.tick);
            hasher.update_u64(delta.elapsed_ms);
            hasher.update_u8(delta.frame.flags);
            hasher.update_u8(delta.frame.select_weapon.map_or(u8::MAX, Weapon::slot));
        }
        hasher.finalize()
    }

    /// Iterate `(tick, elapsed_ms, frame)` for every recorded tick.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: 0,
            delta_idx: 0,
            current: None,
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u64,
    delta_idx: usize,
    current: Option<(u64, InputFrame)>,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u64, u64, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick >= self.recording.tick_count {
            return None;
        }

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.tick <= self.current_tick {
                self.current = Some((delta.elapsed_ms, delta.frame));
                self.delta_idx += 1;
            } else {
                break;
            }
        }

        let (elapsed_ms, frame) = self.current?;
        let tick = self.current_tick;
        self.current_tick += 1;
        Some((tick, elapsed_ms, frame))
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
        assert!(frame.is_idle());

        frame.set_flag(InputFrame::FLAG_JUMP, true);
        frame.set_flag(InputFrame::FLAG_MOVE_RIGHT, true);
        assert!(frame.jump());
        assert!(frame.move_right());
        assert!(!frame.move_left());
        assert!(!frame.fire());

        frame.set_flag(InputFrame::FLAG_JUMP, false);
        assert!(!frame.jump());
        assert!(!frame.is_idle());

        let frame = InputFrame::new().with_weapon(Weapon::Unarmed);
        assert!(!frame.is_idle());
    }

    #[test]
    fn test_held_action_repeats() {
        let mut action = ActionState::new("move_left", ActionBehavior::Held);
        action.press();
        assert!(action.is_pressed());
        assert!(action.is_pressed());

        action.release();
        // Press not yet observed after release is still reported once
        assert!(action.is_pressed());
        assert!(!action.is_pressed());
    }

    #[test]
    fn test_initial_press_only() {
        let mut action = ActionState::new("jump", ActionBehavior::InitialPressOnly);
        action.press();
        assert!(action.is_pressed());
        assert!(!action.is_pressed());

        // Key repeat while held is ignored
        action.press();
        assert!(!action.is_pressed());

        action.release();
        action.press();
        assert!(action.is_pressed());
    }

    #[test]
    fn test_tap_counts_once() {
        let mut action = ActionState::new("fire", ActionBehavior::InitialPressOnly);
        action.tap();
        assert_eq!(action.take_amount(), 1);
        assert_eq!(action.take_amount(), 0);
    }

    #[test]
    fn test_action_set_snapshot() {
        let mut actions = ActionSet::new();
        actions.press(Action::MoveRight);
        actions.press(Action::Jump);
        actions.press(Action::SelectWeapon(Weapon::MachineGun));

        let frame = actions.snapshot();
        assert!(frame.move_right());
        assert!(frame.jump());
        assert_eq!(frame.select_weapon, Some(Weapon::MachineGun));

        // Jump and weapon select are edge-triggered, movement is held
        let frame = actions.snapshot();
        assert!(frame.move_right());
        assert!(!frame.jump());
        assert_eq!(frame.select_weapon, None);

        actions.reset();
        assert!(actions.snapshot().is_idle());
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut recording = InputRecording::new();
        let walk = InputFrame::with_flags(InputFrame::FLAG_MOVE_RIGHT);

        for _ in 0..10 {
            recording.record(16, walk);
        }
        assert_eq!(recording.deltas().len(), 1);

        recording.record(17, walk);
        recording.record(17, InputFrame::new());
        assert_eq!(recording.deltas().len(), 3);
        assert_eq!(recording.tick_count, 12);
    }

    #[test]
    fn test_recording_get_at() {
        let mut recording = InputRecording::new();
        let walk = InputFrame::with_flags(InputFrame::FLAG_MOVE_RIGHT);
        let jump = InputFrame::with_flags(InputFrame::FLAG_JUMP);

        recording.record(16, walk);
        recording.record(16, walk);
        recording.record(16, jump);

        assert_eq!(recording.get_input_at(0), Some((16, walk)));
        assert_eq!(recording.get_input_at(1), Some((16, walk)));
        assert_eq!(recording.get_input_at(2), Some((16, jump)));
        assert_eq!(recording.get_input_at(3), None);
    }

    #[test]
    fn test_replay_iterator() {
        let mut recording = InputRecording::new();
        let walk = InputFrame::with_flags(InputFrame::FLAG_MOVE_LEFT);

        recording.record(16, InputFrame::new());
        recording.record(16, walk);
        recording.record(16, walk);
        recording.record(20, walk);

        let frames: Vec<_> = recording.replay_iter().collect();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], (0, 16, InputFrame::new()));
        assert_eq!(frames[1], (1, 16, walk));
        assert_eq!(frames[2], (2, 16, walk));
        assert_eq!(frames[3], (3, 20, walk));
    }

    #[test]
    fn test_recording_hash() {
        let mut a = InputRecording::new();
        let mut b = InputRecording::new();
        a.record(16, InputFrame::new());
        b.record(16, InputFrame::new());
        assert_eq!(a.compute_hash(), b.compute_hash());

        b.record(16, InputFrame::with_flags(InputFrame::FLAG_FIRE));
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
