//! MIDI wire messages and the transport seams the engine is driven through.
//!
//! Only the three channel messages the surface cares about are decoded.
//! Everything else (clock, aftertouch, sysex, ...) is kept as raw bytes so it
//! can be passed through unchanged.

use std::fmt;
use std::sync::mpsc;

use crate::error::{Error, Result};

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
  NoteOn { channel: u8, key: u8, velocity: u8 },
  NoteOff { channel: u8, key: u8, velocity: u8 },
  ControlChange { channel: u8, control: u8, value: u8 },
  Other(Vec<u8>),
}

impl MidiMessage {
  pub fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
    MidiMessage::NoteOn { channel, key, velocity } }

  pub fn note_off(channel: u8, key: u8) -> Self {
    MidiMessage::NoteOff { channel, key, velocity: 0 } }

  /// Returns `None` for an empty buffer.
  pub fn parse(data: &[u8]) -> Option<Self> {
    let (&status, rest) = data.split_first()?;
    let channel: u8 = status & 0x0F;
    let message: MidiMessage = match (status & 0xF0, rest) {
      (NOTE_OFF, &[key, velocity, ..]) =>
        MidiMessage::NoteOff { channel, key, velocity },
      (NOTE_ON, &[key, velocity, ..]) =>
        MidiMessage::NoteOn { channel, key, velocity },
      (CONTROL_CHANGE, &[control, value, ..]) =>
        MidiMessage::ControlChange { channel, control, value },
      _ => MidiMessage::Other(data.to_vec()),
    };
    Some(message)
  }

  pub fn to_bytes(&self) -> Vec<u8> {
    match *self {
      MidiMessage::NoteOn { channel, key, velocity } =>
        vec![NOTE_ON | (channel & 0x0F), key & 0x7F, velocity & 0x7F],
      MidiMessage::NoteOff { channel, key, velocity } =>
        vec![NOTE_OFF | (channel & 0x0F), key & 0x7F, velocity & 0x7F],
      MidiMessage::ControlChange { channel, control, value } =>
        vec![CONTROL_CHANGE | (channel & 0x0F), control & 0x7F, value & 0x7F],
      MidiMessage::Other(ref data) => data.clone(),
    }
  }
}

impl fmt::Display for MidiMessage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MidiMessage::NoteOn { channel, key, velocity } =>
        write!(f, "note_on channel={} note={} velocity={}", channel, key, velocity),
      MidiMessage::NoteOff { channel, key, velocity } =>
        write!(f, "note_off channel={} note={} velocity={}", channel, key, velocity),
      MidiMessage::ControlChange { channel, control, value } =>
        write!(f, "control_change channel={} control={} value={}", channel, control, value),
      MidiMessage::Other(data) => {
        write!(f, "raw")?;
        for byte in data {
          write!(f, " {:02X}", byte)?; }
        Ok(()) }
    }
  }
}

/// Blocking read of the next incoming message.
/// `None` means the stream has ended.
pub trait EventSource {
  fn next_message(&mut self) -> Option<MidiMessage>;
}

/// Fire-and-forget output.
pub trait MessageSink {
  fn send(&mut self, message: &MidiMessage) -> Result<()>;
}

impl EventSource for mpsc::Receiver<MidiMessage> {
  fn next_message(&mut self) -> Option<MidiMessage> {
    self.recv().ok() }
}

/// Replays a recorded stream, for tests and dry runs.
impl EventSource for std::vec::IntoIter<MidiMessage> {
  fn next_message(&mut self) -> Option<MidiMessage> {
    self.next() }
}

/// Records everything sent to it.
impl MessageSink for Vec<MidiMessage> {
  fn send(&mut self, message: &MidiMessage) -> Result<()> {
    self.push(message.clone());
    Ok(()) }
}

impl MessageSink for midir::MidiOutputConnection {
  fn send(&mut self, message: &MidiMessage) -> Result<()> {
    midir::MidiOutputConnection::send(self, &message.to_bytes())
      .map_err(|e| Error::Transport(e.to_string())) }
}
