use std::fmt;

use crate::data::PrismTriangle;
use crate::{Coord, Error};

///////////////////////////////////////////////////////////////////////////////
// Direction

/// LEFT/RIGHT name the lateral neighbors across a prism's triangle side
/// edges; UP/DOWN the vertical neighbors in the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
  Left,
  Right,
  Up,
  Down,
}

impl Direction {
  pub const ALL: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
  ];

  pub fn opposite(self) -> Direction {
    match self {
      Direction::Left => Direction::Right,
      Direction::Right => Direction::Left,
      Direction::Up => Direction::Down,
      Direction::Down => Direction::Up,
    }
  }

  pub fn is_lateral(self) -> bool {
    match self {
      Direction::Left | Direction::Right => true,
      Direction::Up | Direction::Down => false,
    }
  }

  pub fn is_vertical(self) -> bool {
    !self.is_lateral()
  }

  fn index(self) -> usize {
    match self {
      Direction::Left => 0,
      Direction::Right => 1,
      Direction::Up => 2,
      Direction::Down => 3,
    }
  }
}

///////////////////////////////////////////////////////////////////////////////
// CellId

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub usize);

impl fmt::Debug for CellId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "CellId({})", self.0)
  }
}

impl CellId {
  pub fn usize(self) -> usize {
    self.0
  }
}

///////////////////////////////////////////////////////////////////////////////
// ZRange

/// Closed interval of z ordinates in micrometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZRange {
  pub min: Coord,
  pub max: Coord,
}

impl ZRange {
  pub const fn new(min: Coord, max: Coord) -> ZRange {
    ZRange { min, max }
  }

  pub fn height(&self) -> Coord {
    self.max - self.min
  }

  pub fn contains(&self, z: Coord) -> bool {
    self.min <= z && z <= self.max
  }

  fn validate(&self) -> Result<(), Error> {
    if self.min >= self.max {
      return Err(Error::InvertedZRange);
    }
    Ok(())
  }
}

///////////////////////////////////////////////////////////////////////////////
// PrismCell

/// A leaf of the subdivision: a triangular footprint swept over a z-range.
/// Larger depth means a finer cell.
#[derive(Debug, Clone)]
pub struct PrismCell {
  triangle: PrismTriangle<Coord>,
  z_range: ZRange,
  depth: u32,
  is_expanding: bool,
  adjacent: [Vec<CellId>; 4],
}

impl PrismCell {
  fn new(
    triangle: PrismTriangle<Coord>,
    z_range: ZRange,
    depth: u32,
    is_expanding: bool,
  ) -> PrismCell {
    PrismCell {
      triangle,
      z_range,
      depth,
      is_expanding,
      adjacent: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
    }
  }

  pub fn triangle(&self) -> &PrismTriangle<Coord> {
    &self.triangle
  }

  pub fn z_range(&self) -> ZRange {
    self.z_range
  }

  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Which diagonal of the prism the oscillation climbs. When false, the
  /// side-edge endpoints swap their z assignment.
  pub fn is_expanding(&self) -> bool {
    self.is_expanding
  }

  pub fn adjacent(&self, direction: Direction) -> &[CellId] {
    &self.adjacent[direction.index()]
  }
}

///////////////////////////////////////////////////////////////////////////////
// SubdivisionBuilder

pub struct SubdivisionBuilder {
  cells: Vec<PrismCell>,
}

impl SubdivisionBuilder {
  pub fn new() -> SubdivisionBuilder {
    SubdivisionBuilder { cells: Vec::new() }
  }

  pub fn push(
    &mut self,
    triangle: PrismTriangle<Coord>,
    z_range: ZRange,
    depth: u32,
    is_expanding: bool,
  ) -> CellId {
    let id = CellId(self.cells.len());
    self
      .cells
      .push(PrismCell::new(triangle, z_range, depth, is_expanding));
    id
  }

  /// Wires `b` as `a`'s neighbor in `direction` and `a` as `b`'s neighbor in
  /// the opposite direction. Call in geometric order: lateral lists run
  /// bottom-to-top along the shared side, vertical lists left-to-right
  /// across the shared surface.
  pub fn connect(&mut self, a: CellId, direction: Direction, b: CellId) {
    self.cells[a.usize()].adjacent[direction.index()].push(b);
    self.cells[b.usize()].adjacent[direction.opposite().index()].push(a);
  }

  pub fn finish(self) -> Result<Subdivision, Error> {
    Subdivision::new(self.cells)
  }
}

impl Default for SubdivisionBuilder {
  fn default() -> SubdivisionBuilder {
    SubdivisionBuilder::new()
  }
}

///////////////////////////////////////////////////////////////////////////////
// Subdivision

/// A frozen subdivision: the cell arena plus a depth layering. Built once,
/// then only observed.
#[derive(Debug, Clone)]
pub struct Subdivision {
  cells: Vec<PrismCell>,
  layers: Vec<Vec<CellId>>,
}

impl Subdivision {
  pub(crate) fn new(cells: Vec<PrismCell>) -> Result<Subdivision, Error> {
    validate(&cells)?;
    let max_depth = cells.iter().map(|cell| cell.depth).max().unwrap_or(0);
    let mut layers = vec![Vec::new(); max_depth as usize + 1];
    for (i, cell) in cells.iter().enumerate() {
      layers[cell.depth as usize].push(CellId(i));
    }
    Ok(Subdivision { cells, layers })
  }

  pub fn cell(&self, id: CellId) -> &PrismCell {
    &self.cells[id.usize()]
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn ids(&self) -> impl Iterator<Item = CellId> {
    (0..self.cells.len()).map(CellId)
  }

  /// Layer `k` holds every cell of depth `k`. Iterate in reverse for
  /// finest-first.
  pub fn depth_ordered(&self) -> &[Vec<CellId>] {
    &self.layers
  }
}

fn validate(cells: &[PrismCell]) -> Result<(), Error> {
  if cells.is_empty() {
    return Err(Error::EmptySubdivision);
  }
  for (i, cell) in cells.iter().enumerate() {
    cell.z_range.validate()?;
    cell.triangle.validate()?;
    for &direction in &Direction::ALL {
      for &neighbor in cell.adjacent(direction) {
        let other = cells.get(neighbor.usize()).ok_or(Error::AsymmetricAdjacency)?;
        if !other.adjacent(direction.opposite()).contains(&CellId(i)) {
          return Err(Error::AsymmetricAdjacency);
        }
        match direction {
          Direction::Up if other.z_range.min != cell.z_range.max => {
            return Err(Error::VerticalGap)
          }
          Direction::Down if other.z_range.max != cell.z_range.min => {
            return Err(Error::VerticalGap)
          }
          _ => {}
        }
      }
    }
  }
  Ok(())
}

///////////////////////////////////////////////////////////////////////////////
// Tests
