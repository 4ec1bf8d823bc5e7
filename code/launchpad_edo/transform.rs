//! (x, y) isomorphic mapping from pad position to output note.
//!
//! Moving one pad right adds `x` steps, one pad up adds `y` steps, and the
//! bottom-left pad sounds `base_note`. Held register keys add a full period
//! to their row; held tone-shift keys move their column by a whole tone.

use crate::grid::{Control, GridPos, GRID_SIZE};
use crate::tuning::{Tuning, NOTE_RANGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
  pub x: i32,
  pub y: i32,
  pub base_note: i32,
  /// Steps added by a register key.
  pub period: i32,
  /// Steps added or removed by a tone-shift key.
  pub tone: i32,
}

impl Layout {
  /// The (tone - step, step) layout: each pad along the main diagonal
  /// ascends by a whole tone.
  pub fn isomorphic(tuning: &Tuning, base_note: i32) -> Self {
    Layout::with_steps(tuning, tuning.tone() - 1, 1, base_note) }

  pub fn with_steps(tuning: &Tuning, x: i32, y: i32, base_note: i32) -> Self {
    Layout {
      x,
      y,
      base_note,
      period: tuning.period(),
      tone: tuning.tone(),
    }
  }

  /// Note of a pad with no modifier held. Wide enough that no `i32`
  /// layout can overflow it.
  pub fn unmodified(&self, pos: GridPos) -> i64 {
    self.base_note as i64
      + (pos.col as i64 - 1) * self.x as i64
      + (pos.row as i64 - 1) * self.y as i64
  }
}

/// Activation counters for the register and tone-shift keys.
///
/// Counters rather than flags, so a repeated press or a lost release
/// cannot leave a modifier stuck in the wrong state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
  register: [u32; GRID_SIZE as usize],
  shift_up: [u32; GRID_SIZE as usize],
  shift_down: [u32; GRID_SIZE as usize],
}

impl Modifiers {
  pub fn new() -> Self {
    Self::default() }

  fn counter(&self, control: Control) -> u32 {
    match control {
      Control::Register { row } => self.register[row as usize],
      Control::ToneShiftUp { col } => self.shift_up[col as usize],
      Control::ToneShiftDown { col } => self.shift_down[col as usize],
    }
  }

  fn counter_mut(&mut self, control: Control) -> &mut u32 {
    match control {
      Control::Register { row } => &mut self.register[row as usize],
      Control::ToneShiftUp { col } => &mut self.shift_up[col as usize],
      Control::ToneShiftDown { col } => &mut self.shift_down[col as usize],
    }
  }

  pub fn is_active(&self, control: Control) -> bool {
    self.counter(control) > 0 }

  /// Counts a press or a release. Releases never go below zero.
  pub fn apply(&mut self, control: Control, pressed: bool) {
    let counter: &mut u32 = self.counter_mut(control);
    *counter = if pressed { counter.saturating_add(1) }
               else { counter.saturating_sub(1) }; }
}

/// Output note for a pad under the current modifiers.
///
/// If the modified note leaves the MIDI range the modifiers are ignored and
/// the unmodified note is returned instead; the result is never clamped.
/// The unmodified note itself may still be out of range for extreme layouts.
pub fn transform(pos: GridPos, layout: &Layout, modifiers: &Modifiers) -> i64 {
  let base_and_offset: i64 = layout.unmodified(pos);
  let reg: i64 =
    if modifiers.is_active(Control::Register { row: pos.row }) { layout.period as i64 }
    else { 0 };
  let up: i64 =
    if modifiers.is_active(Control::ToneShiftUp { col: pos.col }) { layout.tone as i64 }
    else { 0 };
  let down: i64 =
    if modifiers.is_active(Control::ToneShiftDown { col: pos.col }) { layout.tone as i64 }
    else { 0 };
  let result: i64 = base_and_offset + reg + up - down;
  if (0..NOTE_RANGE as i64).contains(&result) { result }
  else { base_and_offset }
}

/// Like `transform`, but `None` for a pad that cannot sound at all.
pub fn note_for(pos: GridPos, layout: &Layout, modifiers: &Modifiers) -> Option<u8> {
  u8::try_from(transform(pos, layout, modifiers))
    .ok()
    .filter(|note| (*note as i32) < NOTE_RANGE) }
