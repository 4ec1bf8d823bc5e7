//! The event loop: read one message, let the session react, send the
//! results, repeat until the input ends.
//!
//! All output caused by one input message is sent before the next input
//! message is read, so a forced note-off and its note-on are never split.

use log::{debug, info, warn};

use crate::midi::{EventSource, MessageSink, MidiMessage};
use crate::session::{Session, SurfaceEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
  pub received: usize,
  pub emitted: usize,
  pub failed: usize,
}

fn forward<K: MessageSink>(sink: &mut K, messages: &[MidiMessage], summary: &mut RunSummary) {
  for message in messages {
    match sink.send(message) {
      Ok(()) => summary.emitted += 1,
      Err(e) => {
        summary.failed += 1;
        warn!("dropped {}: {}", message, e); }
    }
  }
}

/// Runs until `source` ends, then turns off whatever is still sounding.
pub fn run<S, K>(session: &mut Session, source: &mut S, sink: &mut K) -> RunSummary
where
  S: EventSource,
  K: MessageSink,
{
  let mut summary: RunSummary = RunSummary::default();
  while let Some(message) = source.next_message() {
    summary.received += 1;
    let event: SurfaceEvent = SurfaceEvent::classify(message);
    let traced: bool = !matches!(event, SurfaceEvent::Passthrough(_));
    if traced {
      debug!("{:?}", event); }
    let out: Vec<MidiMessage> = session.react(event);
    if traced {
      for sent in &out {
        debug!("  -> {}", sent); }}
    forward(sink, &out, &mut summary);
  }

  let hanging: Vec<MidiMessage> = session.silence_all();
  if !hanging.is_empty() {
    info!("input closed, silencing {} hanging notes", hanging.len()); }
  forward(sink, &hanging, &mut summary);
  info!(
    "session ended: {} messages in, {} out, {} dropped",
    summary.received, summary.emitted, summary.failed);
  summary
}

/// Sends a one-shot LED batch to the surface.
pub fn illuminate<K: MessageSink>(sink: &mut K, batch: &[MidiMessage]) -> RunSummary {
  let mut summary: RunSummary = RunSummary::default();
  forward(sink, batch, &mut summary);
  debug!("sent {} LED messages", summary.emitted);
  summary
}
