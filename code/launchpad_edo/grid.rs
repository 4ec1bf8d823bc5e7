//! Button coordinates on the 10x10 surface.
//!
//! Button ids follow the programmer-mode layout: `id = 10*row + col`, with
//! row 1 at the bottom. Rows/columns 0 and 9 are the round control buttons
//! around the 8x8 pad grid. Some models send the bottom row as 101..108,
//! so ids are reduced mod 100 first.

pub const GRID_SIZE: u8 = 10;
pub const BUTTON_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
  pub row: u8,
  pub col: u8,
}

/// What a control button does when held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
  /// Left column: raises every pad in `row` by one period.
  Register { row: u8 },
  /// Bottom row: lowers every pad in `col` by one whole tone.
  ToneShiftDown { col: u8 },
  /// Top row: raises every pad in `col` by one whole tone.
  ToneShiftUp { col: u8 },
}

pub fn decode(id: u8) -> GridPos {
  let id: u8 = id % 100;
  GridPos { row: id / GRID_SIZE, col: id % GRID_SIZE } }

pub fn encode(row: u8, col: u8) -> u8 {
  row * GRID_SIZE + col }

fn is_border(i: u8) -> bool {
  i == 0 || i == GRID_SIZE - 1 }

fn is_inner(i: u8) -> bool {
  (1..GRID_SIZE - 1).contains(&i) }

impl GridPos {
  pub fn new(row: u8, col: u8) -> Self {
    GridPos { row, col } }

  pub fn id(&self) -> u8 {
    encode(self.row, self.col) }

  pub fn index(&self) -> usize {
    self.id() as usize }

  pub fn is_control(&self) -> bool {
    is_border(self.row) || is_border(self.col) }

  pub fn is_playable(&self) -> bool {
    !self.is_control() }

  /// Corners and the right-hand column have no role.
  pub fn control(&self) -> Option<Control> {
    if self.col == 0 && is_inner(self.row) {
      Some(Control::Register { row: self.row })
    } else if self.row == 0 && is_inner(self.col) {
      Some(Control::ToneShiftDown { col: self.col })
    } else if self.row == GRID_SIZE - 1 && is_inner(self.col) {
      Some(Control::ToneShiftUp { col: self.col })
    } else {
      None
    }
  }
}

/// Every playable pad, bottom row first.
pub fn playable() -> impl Iterator<Item = GridPos> {
  (1..GRID_SIZE - 1).flat_map(|row| {
    (1..GRID_SIZE - 1).map(move |col| GridPos { row, col }) }) }

impl Control {
  /// The pads a modifier acts on.
  pub fn line(&self) -> Vec<GridPos> {
    match *self {
      Control::Register { row } =>
        (1..GRID_SIZE - 1).map(|col| GridPos { row, col }).collect(),
      Control::ToneShiftDown { col } | Control::ToneShiftUp { col } =>
        (1..GRID_SIZE - 1).map(|row| GridPos { row, col }).collect(),
    }
  }
}
