//! `midir` plumbing: finding the surface, opening the note output, and
//! turning the input callback into a blocking stream of messages.

use std::sync::mpsc;

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use crate::error::{Error, Result};
use crate::midi::MidiMessage;

const CLIENT_NAME: &str = "launchpad-edo";

/// Where the notes go on systems without virtual ports.
const LOOPBACK_PATTERN: &str = "loopMIDI";

/// Index of the first name containing any of the patterns.
pub fn find_port(names: &[String], patterns: &[String]) -> Option<usize> {
  names.iter().position(|name| {
    patterns.iter().any(|pattern| name.contains(pattern.as_str())) }) }

fn input_names(midi_in: &MidiInput) -> Vec<String> {
  midi_in.ports()
    .iter()
    .map(|port| midi_in.port_name(port).unwrap_or_else(|_| "Unknown".to_string()))
    .collect()
}

fn output_names(midi_out: &MidiOutput) -> Vec<String> {
  midi_out.ports()
    .iter()
    .map(|port| midi_out.port_name(port).unwrap_or_else(|_| "Unknown".to_string()))
    .collect()
}

/// Names of all input and output ports currently visible.
pub fn list() -> Result<(Vec<String>, Vec<String>)> {
  let midi_in: MidiInput =
    MidiInput::new(CLIENT_NAME).map_err(|e| Error::Port(e.to_string()))?;
  let midi_out: MidiOutput =
    MidiOutput::new(CLIENT_NAME).map_err(|e| Error::Port(e.to_string()))?;
  Ok((input_names(&midi_in), output_names(&midi_out)))
}

/// Opens the surface's input port. Every parsed message is pushed into
/// `tx`; closing the returned connection drops `tx` and ends the stream.
pub fn open_surface_input(
  patterns: &[String],
  tx: mpsc::Sender<MidiMessage>,
) -> Result<(MidiInputConnection<()>, String)> {
  let mut midi_in: MidiInput =
    MidiInput::new(CLIENT_NAME).map_err(|e| Error::Port(e.to_string()))?;
  midi_in.ignore(Ignore::None);
  let names: Vec<String> = input_names(&midi_in);
  let index: usize = find_port(&names, patterns).ok_or_else(|| Error::Port(format!(
    "surface input port not detected (looked for {:?}). Is it plugged in?", patterns)))?;
  let ports = midi_in.ports();
  let port = ports.get(index).ok_or_else(|| Error::Port("port list changed".to_string()))?;
  let conn: MidiInputConnection<()> = midi_in
    .connect(
      port,
      "surface-in",
      move |_timestamp: u64, message: &[u8], _: &mut ()| {
        if let Some(parsed) = MidiMessage::parse(message) {
          let _ = tx.send(parsed); }},
      ())
    .map_err(|e| Error::Port(e.to_string()))?;
  Ok((conn, names[index].clone()))
}

fn connect_output(pattern_list: &[String], what: &str) -> Result<(MidiOutputConnection, String)> {
  let midi_out: MidiOutput =
    MidiOutput::new(CLIENT_NAME).map_err(|e| Error::Port(e.to_string()))?;
  let names: Vec<String> = output_names(&midi_out);
  let index: usize = find_port(&names, pattern_list).ok_or_else(|| Error::Port(format!(
    "{} output port not detected (looked for {:?})", what, pattern_list)))?;
  let ports = midi_out.ports();
  let port = ports.get(index).ok_or_else(|| Error::Port("port list changed".to_string()))?;
  let conn: MidiOutputConnection = midi_out
    .connect(port, what)
    .map_err(|e| Error::Port(e.to_string()))?;
  Ok((conn, names[index].clone()))
}

/// Opens the surface's output port, used for the LEDs.
pub fn open_surface_output(patterns: &[String]) -> Result<(MidiOutputConnection, String)> {
  connect_output(patterns, "surface") }

/// Existing port patterns for the notes, or `None` for a virtual port.
/// Without virtual ports the notes go to a loopMIDI port.
fn note_output_patterns(pattern: Option<&str>) -> Option<Vec<String>> {
  match pattern {
    Some(pattern) => Some(vec![pattern.to_string()]),
    None if cfg!(unix) => None,
    None => Some(vec![LOOPBACK_PATTERN.to_string()]),
  }
}

/// Opens where the transformed notes go: an existing port if a pattern is
/// given, otherwise a new virtual port (or a loopMIDI port on Windows).
pub fn open_note_output(
  pattern: Option<&str>,
  virtual_name: &str,
) -> Result<(MidiOutputConnection, String)> {
  match note_output_patterns(pattern) {
    Some(patterns) => connect_output(&patterns, "notes"),
    None => open_virtual_output(virtual_name),
  }
}

#[cfg(unix)]
fn open_virtual_output(virtual_name: &str) -> Result<(MidiOutputConnection, String)> {
  use midir::os::unix::VirtualOutput;

  let midi_out: MidiOutput =
    MidiOutput::new(virtual_name).map_err(|e| Error::Port(e.to_string()))?;
  let conn: MidiOutputConnection = midi_out
    .create_virtual("out")
    .map_err(|e| Error::Port(e.to_string()))?;
  Ok((conn, format!("{}:out", virtual_name)))
}

#[cfg(not(unix))]
fn open_virtual_output(_virtual_name: &str) -> Result<(MidiOutputConnection, String)> {
  Err(Error::Port(format!(
    "virtual ports are not supported here; set an output port (e.g. a {} port)",
    LOOPBACK_PATTERN)))
}
