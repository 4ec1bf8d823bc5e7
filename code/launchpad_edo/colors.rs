//! LED coloring for the (tone - step, step) isomorphic layout.
//!
//! Each pad along the main diagonal ascends by a whole tone, and we light
//! those pads and all their duplicates. With the bottom-left pad as Db, that
//! lights Db, Eb, F, G, A, B, C# and D#. For plain-fifth edos the chromatic
//! neighbours D, E, F#, G#, Ab, Bb, C and D are lit too:
//!
//! ```text
//! low Db  = gray      G#      = aquamarine
//! low D   = red       Ab      = capri
//! Eb      = orange    A       = azure
//! E       = yellow    Bb      = blue
//! F       = chartreuse B      = violet
//! F#      = green     C       = magenta
//! G       = spring    C#      = rose
//! high D  = red       high D# = gray
//! ```
//!
//! Factory palette: 0x00..=0x03 grayscale, 0x04..=0x3B 14 hues x 4 levels,
//! 0x3C..=0x7F other colors.

use std::fmt::Write as _;

use crate::grid::{self, GridPos, BUTTON_COUNT, GRID_SIZE};
use crate::midi::MidiMessage;
use crate::tuning::Tuning;

pub const OFF: u8 = 0x00;
/// Dimmest gray, for the lowest and highest reference pads.
pub const CORNER: u8 = 0x02;

/// Colors along the main diagonal, one per whole tone.
const RAINBOW: [u8; 6] = [0x09, 0x11, 0x19, 0x29, 0x31, 0x39];

/// Number of LED messages in a batch; covers 1..=108 so the bottom row
/// is reached on models that number it 101..108.
pub const LED_BATCH_LEN: u8 = 108;

/// Channel the surface listens to for static colors.
const LED_CHANNEL: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable([u8; BUTTON_COUNT]);

/// Moves a hue by `shift` units, wrapped into the 14-hue range.
fn shifted(color: u8, shift: i32) -> u8 {
  ((color as i32 + shift - 4).rem_euclid(0x38) + 4) as u8 }

fn rainbow(index: i32) -> u8 {
  RAINBOW[index.rem_euclid(RAINBOW.len() as i32) as usize] }

fn pad_color(pos: GridPos, tone: i32, chroma: Option<i32>) -> u8 {
  let row: i32 = pos.row as i32;
  let col: i32 = pos.col as i32;
  let diff: i32 = row - col;
  // whole tones up the diagonal from the bottom-left pad
  let steps: i32 = col + diff.div_euclid(tone);

  if (row == 1 && col == 1) || (row == 8 && col == 8) {
    return CORNER; }
  if diff.rem_euclid(tone) == 0 {
    return rainbow(steps - 2); }
  let chroma: i32 = match chroma {
    Some(c) if c > 0 => c,
    _ => return OFF,
  };
  let above: i32 = diff.rem_euclid(tone);
  let below: i32 = (-diff).rem_euclid(tone);
  // sharps: D, E, F#, G# (not A#)
  if above % chroma == 0 && above / chroma == 1 && steps <= 4 {
    return shifted(rainbow(steps - 2), 4); }
  // flats: Ab, Bb, C, D (not Gb)
  if below % chroma == 0 && below / chroma == 1 && steps >= 4 {
    return shifted(rainbow(steps - 1), -4); }
  OFF
}

impl ColorTable {
  pub fn new(tuning: &Tuning) -> Self {
    let mut table: [u8; BUTTON_COUNT] = [OFF; BUTTON_COUNT];
    for pos in grid::playable() {
      table[pos.index()] = pad_color(pos, tuning.tone(), tuning.chroma()); }
    ColorTable(table)
  }

  pub fn get(&self, id: u8) -> u8 {
    self.0[(id % 100) as usize] }

  /// Static-color note-ons for buttons 1..=108.
  pub fn led_messages(&self) -> Vec<MidiMessage> {
    (1..=LED_BATCH_LEN)
      .map(|id| MidiMessage::note_on(LED_CHANNEL, id, self.get(id)))
      .collect()
  }

  /// Top row first, as the surface is seen from above.
  pub fn render(&self) -> String {
    let mut out: String = String::new();
    for row in (0..GRID_SIZE).rev() {
      let line: Vec<String> = (0..GRID_SIZE)
        .map(|col| format!("{:02X}", self.get(grid::encode(row, col))))
        .collect();
      let _ = writeln!(out, "{}", line.join(" "));
    }
    out
  }
}

/// Every button shows its own id as color, to preview the factory palette.
pub fn palette_messages() -> Vec<MidiMessage> {
  (1..=LED_BATCH_LEN)
    .map(|id| MidiMessage::note_on(LED_CHANNEL, id, id))
    .collect()
}

/// Turns every LED off.
pub fn unlight_messages() -> Vec<MidiMessage> {
  (1..=LED_BATCH_LEN)
    .map(|id| MidiMessage::note_off(LED_CHANNEL, id))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table(edo: u32) -> ColorTable {
    ColorTable::new(&Tuning::new(edo).unwrap()) }

  #[test]
  fn control_buttons_stay_off() {
    for edo in [12, 19, 22, 31, 41, 53, 72] {
      let colors: ColorTable = table(edo);
      for id in 0..100u8 {
        if grid::decode(id).is_control() {
          assert_eq!(colors.get(id), OFF, "{}-edo button {}", edo, id);
        }
      }
    }
  }

  #[test]
  fn corners_are_gray() {
    let colors: ColorTable = table(31);
    assert_eq!(colors.get(11), CORNER);
    assert_eq!(colors.get(88), CORNER);
  }

  #[test]
  fn main_diagonal_cycles_the_rainbow() {
    let colors: ColorTable = table(31);
    assert_eq!(colors.get(22), 0x09);
    assert_eq!(colors.get(33), 0x11);
    assert_eq!(colors.get(44), 0x19);
    assert_eq!(colors.get(77), 0x39);
    // duplicates one whole tone away along the rows
    assert_eq!(colors.get(61), 0x09);
    assert_eq!(colors.get(16), 0x29);
  }

  #[test]
  fn plain_fifth_accents_in_31edo() {
    let colors: ColorTable = table(31);
    assert_eq!(colors.get(31), 0x05);
    assert_eq!(colors.get(35), 0x25);
    assert_eq!(colors.get(13), OFF);
    assert_eq!(colors.get(17), OFF);
  }

  #[test]
  fn sharps_stop_at_g_sharp() {
    let colors: ColorTable = table(31);
    // one chroma above the 4th whole tone: G#
    assert_eq!(colors.get(64), 0x1D);
    // one chroma above the 5th: A#, left dark
    assert_eq!(colors.get(75), OFF);
    assert_eq!(colors.get(86), OFF);
  }

  #[test]
  fn plain_fifth_accents_in_12edo() {
    let colors: ColorTable = table(12);
    assert_eq!(colors.get(21), 0x05);
    assert_eq!(colors.get(12), 0x05);
    assert_eq!(colors.get(31), 0x09);
  }

  #[test]
  fn no_accents_without_chroma() {
    // 13-edo: n + t is odd
    let colors: ColorTable = table(13);
    assert_eq!(colors.get(21), OFF);
    assert_eq!(colors.get(31), 0x09);
  }

  #[test]
  fn led_batch_covers_the_whole_surface() {
    let messages: Vec<MidiMessage> = table(31).led_messages();
    assert_eq!(messages.len(), 108);
    assert_eq!(messages[0], MidiMessage::note_on(0, 1, OFF));
    assert_eq!(messages[10], MidiMessage::note_on(0, 11, CORNER));
    assert_eq!(messages[100], MidiMessage::note_on(0, 101, OFF));
  }

  #[test]
  fn palette_and_unlight_batches() {
    let palette: Vec<MidiMessage> = palette_messages();
    assert_eq!(palette.len(), 108);
    assert_eq!(palette[106], MidiMessage::note_on(0, 107, 107));
    let dark: Vec<MidiMessage> = unlight_messages();
    assert_eq!(dark.len(), 108);
    assert_eq!(dark[0], MidiMessage::note_off(0, 1));
  }

  #[test]
  fn render_is_ten_rows_top_first() {
    let text: String = table(31).render();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "00 00 00 00 00 00 00 00 00 00");
    assert_eq!(lines[8], "00 02 00 00 15 00 29 00 35 00");
  }
}
