//! EDO tuning model.
//!
//! Everything here is derived once from the EDO size `n`:
//! - `tone`: approximate number of steps of the whole tone
//! - `chroma`: steps of the chromatic semitone, only for plain-fifth edos
//! - the range tier, which decides whether the grid fits into 128 MIDI notes

use std::fmt;

use thiserror::Error;

/// Size of the MIDI note range.
pub const NOTE_RANGE: i32 = 128;

/// log2(9/8), the whole tone as a fraction of the octave.
const WHOLE_TONE: f64 = 0.169925;

/// Approximate number of steps of the whole tone in n-edo.
/// Precision should be enough for n < 20,000.
pub fn tone(edo: u32) -> i32 {
  (edo as f64 * WHOLE_TONE).round() as i32 }

/// Steps of the chromatic semitone, defined only when `n + t` is even.
pub fn chroma(edo: u32, tone: i32) -> Option<i32> {
  let edo: i32 = edo as i32;
  if (edo + tone) % 2 == 0 {
    Some((7 * tone - edo) / 2)
  } else {
    None
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuningError {
  #[error("{edo}-edo has a zero-step whole tone and cannot be laid out")]
  TuningTooSmall { edo: u32 },

  #[error("{edo}-edo is too large: 9 whole tones ({tone} steps each) exceed the 128-note range")]
  TuningTooLarge { edo: u32, tone: i32 },
}

/// Non-fatal findings surfaced once at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningWarning {
  /// Some register/tone-shift combinations overflow and fall back to the
  /// unmodified note.
  RangeDegraded { edo: u32, tone: i32 },
}

impl fmt::Display for TuningWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TuningWarning::RangeDegraded { edo, tone } => write!(
        f,
        "{}-edo (whole tone = {} steps) does not leave room for every modifier; \
         some register/tone-shift combinations will be ignored",
        edo, tone),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeTier {
  Full,
  Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning {
  edo: u32,
  tone: i32,
  chroma: Option<i32>,
  tier: RangeTier,
}

impl Tuning {
  pub fn new(edo: u32) -> Result<Self, TuningError> {
    let t: i32 = tone(edo);
    if t == 0 {
      return Err(TuningError::TuningTooSmall { edo }); }
    // i64 so that no u32 edo can overflow the range check
    let reach: i64 = 9 * t as i64;
    if reach >= NOTE_RANGE as i64 {
      return Err(TuningError::TuningTooLarge { edo, tone: t }); }
    let tier: RangeTier =
      if reach + edo as i64 >= NOTE_RANGE as i64 { RangeTier::Degraded }
      else { RangeTier::Full };
    Ok(Tuning {
      edo,
      tone: t,
      chroma: chroma(edo, t),
      tier,
    })
  }

  pub fn edo(&self) -> u32 { self.edo }

  /// The period in steps, which is what a register key adds.
  pub fn period(&self) -> i32 { self.edo as i32 }

  pub fn tone(&self) -> i32 { self.tone }

  pub fn chroma(&self) -> Option<i32> { self.chroma }

  pub fn tier(&self) -> RangeTier { self.tier }

  pub fn warning(&self) -> Option<TuningWarning> {
    match self.tier {
      RangeTier::Full => None,
      RangeTier::Degraded => Some(TuningWarning::RangeDegraded {
        edo: self.edo,
        tone: self.tone,
      }),
    }
  }
}
