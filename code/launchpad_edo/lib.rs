//! Microtonal isomorphic layouts for grid controllers.
//!
//! Remaps the 8x8 pads of a Launchpad-style surface to an n-edo tuning,
//! lights the pads to show the scale, and relays the result as MIDI notes.
//! Holding a left-column button raises its row by a period; holding a
//! top/bottom-row button moves its column a whole tone up/down. Held notes
//! are retuned in place.

pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod midi;
pub mod ports;
pub mod session;
pub mod transform;
pub mod tuning;

pub use error::{Error, Result};
pub use midi::{EventSource, MessageSink, MidiMessage};
pub use session::{Session, SessionConfig, SurfaceEvent};
pub use tuning::{Tuning, TuningError, TuningWarning};
