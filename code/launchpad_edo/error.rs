use std::path::PathBuf;

use thiserror::Error;

use crate::tuning::TuningError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Tuning(#[from] TuningError),

  #[error("bad config {path}: {message}")]
  Config { path: PathBuf, message: String },

  #[error("MIDI port error: {0}")]
  Port(String),

  #[error("MIDI transport error: {0}")]
  Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
