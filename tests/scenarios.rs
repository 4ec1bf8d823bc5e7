//! End-to-end runs of a session over recorded surface input.

use launchpad_edo::engine::{self, RunSummary};
use launchpad_edo::grid::GridPos;
use launchpad_edo::{Error, MidiMessage, Session, SessionConfig, TuningError};

fn config_31() -> SessionConfig {
  SessionConfig { edo: 31, base_note: 60, x: None, y: None, channel: 0 } }

fn pad(id: u8, velocity: u8) -> MidiMessage {
  MidiMessage::note_on(0, id, velocity) }

fn button(id: u8, value: u8) -> MidiMessage {
  MidiMessage::ControlChange { channel: 0, control: id, value } }

fn replay(session: &mut Session, input: Vec<MidiMessage>) -> Vec<MidiMessage> {
  let mut source = input.into_iter();
  let mut sink: Vec<MidiMessage> = Vec::new();
  engine::run(session, &mut source, &mut sink);
  sink
}

#[test]
fn bottom_left_pad_plays_the_base_note() {
  let mut session: Session = Session::new(&config_31()).unwrap();
  assert_eq!(session.layout().x, 4);
  assert_eq!(session.layout().y, 1);
  assert_eq!(session.handle(pad(11, 100)), vec![MidiMessage::note_on(0, 60, 100)]);
  assert_eq!(session.handle(pad(11, 0)), vec![MidiMessage::note_off(0, 60)]);
}

#[test]
fn release_restores_the_previous_state() {
  let mut session: Session = Session::new(&config_31()).unwrap();
  session.handle(pad(45, 20));
  let held_before: u8 = session.held_velocity(GridPos::new(3, 3));
  let sounding_before: Vec<u8> = session.sounding_notes();

  session.handle(pad(33, 110));
  session.handle(MidiMessage::NoteOff { channel: 0, key: 33, velocity: 0 });

  assert_eq!(session.held_velocity(GridPos::new(3, 3)), held_before);
  assert_eq!(session.sounding_notes(), sounding_before);
}

#[test]
fn register_retunes_a_held_pad() {
  let mut session: Session = Session::new(&config_31()).unwrap();
  session.handle(pad(11, 100));
  let out: Vec<MidiMessage> = session.handle(button(10, 127));
  assert_eq!(out, vec![MidiMessage::note_off(0, 60), MidiMessage::note_on(0, 91, 100)]);
  assert_eq!(session.sounding_notes(), vec![91]);
}

#[test]
fn never_two_note_ons_in_a_row_for_one_note() {
  let mut session: Session = Session::new(&config_31()).unwrap();
  // (1,2) and (5,1) both sound 64 in 31-edo
  let out: Vec<MidiMessage> = replay(&mut session, vec![
    pad(12, 100),
    pad(51, 80),
    button(10, 127),
    button(50, 127),
    button(10, 0),
    pad(12, 0),
    pad(51, 0),
  ]);
  assert_eq!(&out[..3], &[
    MidiMessage::note_on(0, 64, 100),
    MidiMessage::note_off(0, 64),
    MidiMessage::note_on(0, 64, 80),
  ]);

  let mut sounding: [bool; 128] = [false; 128];
  for message in &out {
    match *message {
      MidiMessage::NoteOn { key, velocity, .. } if velocity > 0 => {
        assert!(!sounding[key as usize], "double note-on for {} in {:?}", key, out);
        sounding[key as usize] = true; }
      MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } =>
        sounding[key as usize] = false,
      _ => {}
    }
  }
  assert!(sounding.iter().all(|s| !s));
  assert!(session.sounding_notes().is_empty());
}

#[test]
fn clock_and_aftertouch_pass_through() {
  let mut session: Session = Session::new(&config_31()).unwrap();
  let input: Vec<MidiMessage> = vec![
    MidiMessage::Other(vec![0xF8]),
    MidiMessage::Other(vec![0xA0, 11, 30]),
    button(99, 127),
  ];
  assert_eq!(replay(&mut session, input.clone()), input);
}

#[test]
fn oversized_tuning_never_starts() {
  let config: SessionConfig = SessionConfig { edo: 90, ..config_31() };
  match Session::new(&config) {
    Err(Error::Tuning(TuningError::TuningTooLarge { edo, tone })) => {
      assert_eq!(edo, 90);
      assert_eq!(tone, 15); }
    Err(other) => panic!("unexpected error {}", other),
    Ok(_) => panic!("90-edo should not start"),
  }
}

#[test]
fn degraded_tuning_still_plays() {
  let config: SessionConfig = SessionConfig { edo: 53, ..config_31() };
  let mut session: Session = Session::new(&config).unwrap();
  // 60 + 7*8 + 7 + 53 overflows, so the register is ignored for (8,8)
  session.handle(button(80, 127));
  assert_eq!(session.handle(pad(88, 100)), vec![MidiMessage::note_on(0, 123, 100)]);
  assert_eq!(session.handle(pad(81, 100)), vec![MidiMessage::note_on(0, 120, 100)]);
}

#[test]
fn stream_end_silences_held_notes() {
  let mut session: Session = Session::new(&config_31()).unwrap();
  let mut source = vec![pad(11, 100), pad(22, 100)].into_iter();
  let mut sink: Vec<MidiMessage> = Vec::new();
  let summary: RunSummary = engine::run(&mut session, &mut source, &mut sink);
  assert_eq!(summary.received, 2);
  assert_eq!(&sink[2..], &[MidiMessage::note_off(0, 60), MidiMessage::note_off(0, 65)]);
}

#[test]
fn leds_show_the_tuning() {
  let session: Session = Session::new(&config_31()).unwrap();
  let mut sink: Vec<MidiMessage> = Vec::new();
  engine::illuminate(&mut sink, &session.colors().led_messages());
  assert_eq!(sink.len(), 108);
  assert_eq!(sink[10], MidiMessage::note_on(0, 11, 0x02));
  assert_eq!(sink[21], MidiMessage::note_on(0, 22, 0x09));
  assert!(sink[..9].iter().all(|m| matches!(m, MidiMessage::NoteOn { velocity: 0, .. })));
}
