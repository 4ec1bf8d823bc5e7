//! Session state: held pads, sounding notes and modifier counters.
//!
//! A `Session` reacts to one incoming message at a time and returns the
//! messages to send, in order. It never touches a port itself.
//!
//! Isomorphic layouts map several pads to the same note (octave and
//! enharmonic duplicates), so a note that is already sounding is always
//! turned off before it is struck again. Otherwise the receiving instrument
//! may swallow or double-count the retrigger.

use log::{debug, info, warn};

use crate::colors::ColorTable;
use crate::error::Result;
use crate::grid::{self, Control, GridPos, BUTTON_COUNT};
use crate::midi::MidiMessage;
use crate::transform::{self, Layout, Modifiers};
use crate::tuning::Tuning;

/// Everything a session needs to know up front. Immutable once the session
/// is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
  pub edo: u32,
  pub base_note: i32,
  /// Horizontal step; defaults to one whole tone minus one step.
  pub x: Option<i32>,
  /// Vertical step; defaults to one step.
  pub y: Option<i32>,
  /// Channel the transformed notes are sent on.
  pub channel: u8,
}

impl Default for SessionConfig {
  fn default() -> Self {
    SessionConfig {
      edo: 31,
      base_note: 60,
      x: None,
      y: None,
      channel: 0,
    }
  }
}

/// An incoming message, as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
  /// A pad press (velocity > 0) or release (velocity 0).
  Note { pos: GridPos, velocity: u8 },
  /// A register or tone-shift key changed.
  Modifier { control: Control, pressed: bool },
  /// Anything else; forwarded untouched.
  Passthrough(MidiMessage),
}

impl SurfaceEvent {
  pub fn classify(message: MidiMessage) -> Self {
    match message {
      MidiMessage::NoteOn { key, velocity, .. } if grid::decode(key).is_playable() =>
        SurfaceEvent::Note { pos: grid::decode(key), velocity },
      MidiMessage::NoteOff { key, .. } if grid::decode(key).is_playable() =>
        SurfaceEvent::Note { pos: grid::decode(key), velocity: 0 },
      MidiMessage::ControlChange { control, value, .. } =>
        match grid::decode(control).control() {
          Some(role) => SurfaceEvent::Modifier { control: role, pressed: value > 0 },
          None => SurfaceEvent::Passthrough(message),
        },
      other => SurfaceEvent::Passthrough(other),
    }
  }
}

pub struct Session {
  layout: Layout,
  colors: ColorTable,
  channel: u8,
  modifiers: Modifiers,
  /// Velocity each pad is held with; 0 when released.
  keys: [u8; BUTTON_COUNT],
  /// Velocity each output note is sounding with; 0 when silent.
  notes: [u8; 128],
}

impl Session {
  /// Validates the tuning and precomputes the layout and colors.
  /// Fails before anything is sent if the tuning cannot be mapped.
  pub fn new(config: &SessionConfig) -> Result<Self> {
    let tuning: Tuning = Tuning::new(config.edo)?;
    if let Some(warning) = tuning.warning() {
      warn!("{}", warning); }

    let default_layout: Layout = Layout::isomorphic(&tuning, config.base_note);
    let layout: Layout = Layout::with_steps(
      &tuning,
      config.x.unwrap_or(default_layout.x),
      config.y.unwrap_or(default_layout.y),
      config.base_note);
    let modifiers: Modifiers = Modifiers::new();
    let unmapped: usize = grid::playable()
      .filter(|pos| transform::note_for(*pos, &layout, &modifiers).is_none())
      .count();
    if unmapped > 0 {
      warn!("{} of 64 pads fall outside the MIDI note range and stay silent", unmapped); }

    info!(
      "{}-edo: whole tone = {} steps, chroma = {:?}, layout x = {}, y = {}, base note = {}",
      tuning.edo(), tuning.tone(), tuning.chroma(), layout.x, layout.y, layout.base_note);

    Ok(Session {
      colors: ColorTable::new(&tuning),
      layout,
      channel: config.channel & 0x0F,
      modifiers,
      keys: [0; BUTTON_COUNT],
      notes: [0; 128],
    })
  }

  pub fn layout(&self) -> &Layout { &self.layout }

  pub fn colors(&self) -> &ColorTable { &self.colors }

  pub fn held_velocity(&self, pos: GridPos) -> u8 {
    self.keys[pos.index()] }

  pub fn is_sounding(&self, note: u8) -> bool {
    self.notes.get(note as usize).map_or(false, |v| *v > 0) }

  pub fn sounding_notes(&self) -> Vec<u8> {
    (0..128u8).filter(|note| self.is_sounding(*note)).collect() }

  /// Note a pad would sound right now.
  pub fn note_for(&self, pos: GridPos) -> Option<u8> {
    transform::note_for(pos, &self.layout, &self.modifiers) }

  /// Handles one incoming message and returns what to send, in order.
  pub fn handle(&mut self, message: MidiMessage) -> Vec<MidiMessage> {
    self.react(SurfaceEvent::classify(message)) }

  /// Like `handle`, for a message that is already classified.
  pub fn react(&mut self, event: SurfaceEvent) -> Vec<MidiMessage> {
    let mut out: Vec<MidiMessage> = Vec::new();
    match event {
      SurfaceEvent::Note { pos, velocity } => self.on_note(pos, velocity, &mut out),
      SurfaceEvent::Modifier { control, pressed } =>
        self.on_modifier(control, pressed, &mut out),
      SurfaceEvent::Passthrough(message) => out.push(message),
    }
    out
  }

  fn on_note(&mut self, pos: GridPos, velocity: u8, out: &mut Vec<MidiMessage>) {
    let note: Option<u8> = self.note_for(pos);
    if velocity > 0 {
      self.keys[pos.index()] = velocity;
      match note {
        Some(note) => self.strike(note, velocity, out),
        None => debug!("pad {} is unmapped, ignoring press", pos.id()),
      }
    } else {
      self.keys[pos.index()] = 0;
      if let Some(note) = note {
        self.release(note, out); }
    }
  }

  fn on_modifier(&mut self, control: Control, pressed: bool, out: &mut Vec<MidiMessage>) {
    let was_active: bool = self.modifiers.is_active(control);
    self.modifiers.apply(control, pressed);
    if self.modifiers.is_active(control) == was_active {
      debug!("{:?} counter changed without changing its effect", control);
      return; }
    // back to the old state just long enough to find the old notes
    self.modifiers.apply(control, !pressed);

    let held: Vec<(GridPos, u8)> = control.line()
      .into_iter()
      .map(|pos| (pos, self.keys[pos.index()]))
      .filter(|(_, velocity)| *velocity > 0)
      .collect();

    // silence everything before sounding anything, so a new note can never
    // be cut by the release of an old one
    for (pos, _) in &held {
      if let Some(old) = self.note_for(*pos) {
        self.release(old, out); }}

    self.modifiers.apply(control, pressed);

    for (pos, velocity) in held {
      if let Some(new) = self.note_for(pos) {
        self.strike(new, velocity, out); }}
  }

  /// Sends note-on, turning the note off first if it is already sounding.
  fn strike(&mut self, note: u8, velocity: u8, out: &mut Vec<MidiMessage>) {
    if self.is_sounding(note) {
      out.push(MidiMessage::note_off(self.channel, note)); }
    out.push(MidiMessage::note_on(self.channel, note, velocity));
    self.notes[note as usize] = velocity; }

  fn release(&mut self, note: u8, out: &mut Vec<MidiMessage>) {
    out.push(MidiMessage::note_off(self.channel, note));
    self.notes[note as usize] = 0; }

  /// Turns off every sounding note and forgets every held pad.
  pub fn silence_all(&mut self) -> Vec<MidiMessage> {
    let out: Vec<MidiMessage> = self.sounding_notes()
      .into_iter()
      .map(|note| MidiMessage::note_off(self.channel, note))
      .collect();
    self.notes = [0; 128];
    self.keys = [0; BUTTON_COUNT];
    out
  }
}
