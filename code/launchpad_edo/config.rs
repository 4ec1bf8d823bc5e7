//! Settings: an embedded default `config.toml`, overlaid by the user's
//! file, overlaid by command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::session::SessionConfig;

const DEFAULT_CONFIG: &str = include_str!("config.toml");

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  #[serde(default)]
  tuning: TuningConfig,
  #[serde(default)]
  ports: PortsConfig,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct TuningConfig {
  edo: Option<u32>,
  base_note: Option<i32>,
  x: Option<i32>,
  y: Option<i32>,
  channel: Option<u8>,
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct PortsConfig {
  surface: Option<Vec<String>>,
  output: Option<String>,
  virtual_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  tuning: TuningConfig,
  ports: PortsConfig,
}

fn parse(contents: &str, path: &Path) -> Result<ConfigFile> {
  toml::from_str(contents).map_err(|e| Error::Config {
    path: path.to_path_buf(),
    message: e.to_string(),
  })
}

impl Config {
  /// The built-in defaults only.
  pub fn builtin() -> Result<Self> {
    let base: ConfigFile = parse(DEFAULT_CONFIG, Path::new("<builtin>"))?;
    Ok(Config { tuning: base.tuning, ports: base.ports })
  }

  /// Loads the defaults and overlays a user file on top.
  ///
  /// An explicit `path` must exist and parse. Without one, the file in the
  /// user config directory is used if present; a malformed file there is
  /// skipped with a warning.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let mut config: Config = Config::builtin()?;
    match path {
      Some(path) => {
        let contents: String = std::fs::read_to_string(path).map_err(|e| Error::Config {
          path: path.to_path_buf(),
          message: e.to_string(),
        })?;
        config.merge(parse(&contents, path)?);
      }
      None => {
        if let Some(path) = user_config_path().filter(|p| p.exists()) {
          match std::fs::read_to_string(&path) {
            Ok(contents) => match parse(&contents, &path) {
              Ok(user) => config.merge(user),
              Err(e) => log::warn!(target: "config", "ignoring {}", e),
            },
            Err(e) => {
              log::warn!(target: "config", "could not read config {}: {}", path.display(), e) }
          }
        }
      }
    }
    Ok(config)
  }

  /// Overlays settings from a TOML string, as if read from a user file.
  pub fn merge_str(&mut self, contents: &str) -> Result<()> {
    let user: ConfigFile = parse(contents, Path::new("<string>"))?;
    self.merge(user);
    Ok(())
  }

  fn merge(&mut self, user: ConfigFile) {
    let tuning: TuningConfig = user.tuning;
    if tuning.edo.is_some() {
      self.tuning.edo = tuning.edo; }
    if tuning.base_note.is_some() {
      self.tuning.base_note = tuning.base_note; }
    if tuning.x.is_some() {
      self.tuning.x = tuning.x; }
    if tuning.y.is_some() {
      self.tuning.y = tuning.y; }
    if tuning.channel.is_some() {
      self.tuning.channel = tuning.channel; }

    let ports: PortsConfig = user.ports;
    if ports.surface.is_some() {
      self.ports.surface = ports.surface; }
    if ports.output.is_some() {
      self.ports.output = ports.output; }
    if ports.virtual_name.is_some() {
      self.ports.virtual_name = ports.virtual_name; }
  }

  pub fn set_edo(&mut self, edo: u32) { self.tuning.edo = Some(edo); }

  pub fn set_base_note(&mut self, note: i32) { self.tuning.base_note = Some(note); }

  pub fn set_steps(&mut self, x: Option<i32>, y: Option<i32>) {
    if x.is_some() {
      self.tuning.x = x; }
    if y.is_some() {
      self.tuning.y = y; }
  }

  pub fn set_channel(&mut self, channel: u8) { self.tuning.channel = Some(channel); }

  pub fn set_surface(&mut self, pattern: String) { self.ports.surface = Some(vec![pattern]); }

  pub fn set_output(&mut self, pattern: String) { self.ports.output = Some(pattern); }

  pub fn session(&self) -> SessionConfig {
    let fallback: SessionConfig = SessionConfig::default();
    SessionConfig {
      edo: self.tuning.edo.unwrap_or(fallback.edo),
      base_note: self.tuning.base_note.unwrap_or(fallback.base_note),
      x: self.tuning.x,
      y: self.tuning.y,
      channel: self.tuning.channel.unwrap_or(fallback.channel).min(15),
    }
  }

  /// Name fragments that identify the surface's ports.
  pub fn surface_patterns(&self) -> Vec<String> {
    self.ports
      .surface
      .clone()
      .filter(|patterns| !patterns.is_empty())
      .unwrap_or_else(|| vec!["LP".to_string(), "Launchpad".to_string()])
  }

  /// Existing port to send notes to; `None` means a virtual port.
  pub fn output_pattern(&self) -> Option<&str> {
    self.ports.output.as_deref() }

  pub fn virtual_name(&self) -> &str {
    self.ports.virtual_name.as_deref().unwrap_or("launchpad-edo") }
}

pub fn user_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|d| d.join("launchpad_edo").join("config.toml")) }
