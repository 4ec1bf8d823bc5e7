//! Launchpad EDO transformer
//!
//! # USAGE
//! ```sh
//! cargo run --bin launchpad_edo -- --edo 31
//! cargo run --bin launchpad_edo -- colors --edo 22
//! cargo run --bin launchpad_edo -- ports
//! ```
//! Put the surface in programmer mode first.
//!
//! # PURPOSE
//! Maps the 8x8 pads to n-edo in the (whole tone - 1, 1) isomorphic layout,
//! lights the whole tones along the diagonal (plus their chromatic
//! neighbours in plain-fifth edos), and sends the notes to a virtual output
//! port named 'launchpad-edo:out' (or to an existing port, see --output).
//! - Left column: hold to raise that row by one octave (n steps).
//! - Top row: hold to raise that column by one whole tone.
//! - Bottom row: hold to lower that column by one whole tone.

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc;
use std::{io, thread};

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use midir::{MidiInputConnection, MidiOutputConnection};

use launchpad_edo::colors::{self, ColorTable};
use launchpad_edo::config::Config;
use launchpad_edo::engine::{self, RunSummary};
use launchpad_edo::midi::MidiMessage;
use launchpad_edo::ports;
use launchpad_edo::session::{Session, SessionConfig};
use launchpad_edo::tuning::Tuning;

#[derive(Parser, Debug)]
#[command(name = "launchpad_edo", version, about = "Microtonal isomorphic layouts for Launchpad-style grid controllers")]
struct Args {
  #[command(subcommand)]
  command: Option<Command>,

  #[arg(short, long, global = true, help = "Config file (defaults to the user config directory)")]
  config: Option<PathBuf>,

  #[arg(short, long, global = true, help = "Equal divisions of the octave")]
  edo: Option<u32>,

  #[arg(short, long, global = true, allow_negative_numbers = true, help = "Note of the bottom-left pad")]
  base_note: Option<i32>,

  #[arg(short, global = true, allow_negative_numbers = true, help = "Steps per pad to the right")]
  x: Option<i32>,

  #[arg(short, global = true, allow_negative_numbers = true, help = "Steps per pad up")]
  y: Option<i32>,

  #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..16), help = "MIDI channel of the output notes")]
  channel: Option<u8>,

  #[arg(long, global = true, help = "Name fragment of the surface's ports")]
  surface: Option<String>,

  #[arg(long, global = true, help = "Send notes to this existing port instead of a virtual one")]
  output: Option<String>,

  #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More logging (-v: every note, -vv: everything)")]
  verbose: u8,

  #[arg(long, global = true, help = "Write the log to this file instead of stderr")]
  log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
  /// Light the surface and transform notes until Enter is pressed (default)
  Run,
  /// Print the color table without touching any port
  Colors,
  /// Light every button with its own palette index
  Palette,
  /// Turn every LED off
  Unlight,
  /// List MIDI ports
  Ports,
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
  use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};

  let level: LevelFilter = match verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  match log_file {
    Some(path) => WriteLogger::init(level, simplelog::Config::default(), File::create(path)?)?,
    None => TermLogger::init(
      level, simplelog::Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?,
  }
  Ok(())
}

fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
  let mut config: Config = Config::load(args.config.as_deref())?;
  if let Some(edo) = args.edo {
    config.set_edo(edo); }
  if let Some(base_note) = args.base_note {
    config.set_base_note(base_note); }
  config.set_steps(args.x, args.y);
  if let Some(channel) = args.channel {
    config.set_channel(channel); }
  if let Some(surface) = &args.surface {
    config.set_surface(surface.clone()); }
  if let Some(output) = &args.output {
    config.set_output(output.clone()); }
  Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
  let args: Args = Args::parse();
  init_logging(args.verbose, args.log_file.as_ref())?;
  let config: Config = load_config(&args)?;

  match args.command.unwrap_or(Command::Run) {
    Command::Run => run(&config),
    Command::Colors => print_colors(&config.session()),
    Command::Palette => send_batch(&config, &colors::palette_messages(), "Coloring"),
    Command::Unlight => send_batch(&config, &colors::unlight_messages(), "Unlighting"),
    Command::Ports => print_ports(),
  }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
  // fails on an unusable tuning before any port is opened
  let mut session: Session = Session::new(&config.session())?;
  let patterns: Vec<String> = config.surface_patterns();

  let (mut leds, led_port): (MidiOutputConnection, String) =
    ports::open_surface_output(&patterns)?;
  let (mut notes, note_port): (MidiOutputConnection, String) =
    ports::open_note_output(config.output_pattern(), config.virtual_name())?;
  let (tx, rx): (mpsc::Sender<MidiMessage>,
                 mpsc::Receiver<MidiMessage>) = mpsc::channel();
  let (conn_in, surface_port): (MidiInputConnection<()>, String) =
    ports::open_surface_input(&patterns, tx)?;

  info!("Coloring..");
  engine::illuminate(&mut leds, &session.colors().led_messages());

  let engine_thread: thread::JoinHandle<RunSummary> =
    thread::spawn(move || {
      let mut rx: mpsc::Receiver<MidiMessage> = rx;
      engine::run(&mut session, &mut rx, &mut notes) });

  print_startup_message(config, &surface_port, &led_port, &note_port);
  let mut input: String = String::new();
  io::stdin().read_line(&mut input)?;

  // dropping the input connection ends the stream; the engine then
  // silences anything still held
  let _ = conn_in.close();
  match engine_thread.join() {
    Ok(summary) => info!("{} messages in, {} out", summary.received, summary.emitted),
    Err(_) => log::error!("engine thread panicked"),
  }
  Ok(())
}

fn print_startup_message(config: &Config, surface: &str, leds: &str, notes: &str) {
  let session: SessionConfig = config.session();
  println!("Launchpad EDO transformer started!");
  println!();
  println!("Ports:");
  println!("  - '{}' (surface in)", surface);
  println!("  - '{}' (surface LEDs)", leds);
  println!("  - '{}' (notes out)", notes);
  println!();
  println!("Config:");
  println!("  - edo: {}", session.edo);
  println!("  - base note: {}", session.base_note);
  println!("  - channel: {}", session.channel);
  println!();
  println!("Press Enter to exit...");
}

fn print_colors(session: &SessionConfig) -> Result<(), Box<dyn Error>> {
  let tuning: Tuning = Tuning::new(session.edo)?;
  if let Some(warning) = tuning.warning() {
    log::warn!("{}", warning); }
  println!(
    "{}-edo: whole tone = {} steps, chroma = {}",
    tuning.edo(),
    tuning.tone(),
    tuning.chroma().map_or("none".to_string(), |c| c.to_string()));
  print!("{}", ColorTable::new(&tuning).render());
  Ok(())
}

fn send_batch(config: &Config, batch: &[MidiMessage], what: &str) -> Result<(), Box<dyn Error>> {
  let (mut leds, port): (MidiOutputConnection, String) =
    ports::open_surface_output(&config.surface_patterns())?;
  println!("{} '{}'..", what, port);
  let summary: RunSummary = engine::illuminate(&mut leds, batch);
  if summary.failed > 0 {
    log::warn!("{} of {} LED messages were not sent", summary.failed, batch.len()); }
  Ok(())
}

fn print_ports() -> Result<(), Box<dyn Error>> {
  let (inputs, outputs): (Vec<String>, Vec<String>) = ports::list()?;
  println!("Inputs:");
  for name in inputs {
    println!("  - {}", name); }
  println!("Outputs:");
  for name in outputs {
    println!("  - {}", name); }
  Ok(())
}
