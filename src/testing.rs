//! Subdivision fixtures for tests and benchmarks.
//!
//! Real subdivisions come from the space-subdivision pass elsewhere in the
//! pipeline; the generators here assemble small-but-valid stand-ins:
//! columns of stacked prisms whose refinement depth varies from slot to
//! slot, so the oscillation constraints fire at every change of depth.
use rand::Rng;

use crate::data::{
  CellId, Direction, Point, PrismTriangle, Segment, Subdivision, SubdivisionBuilder, ZRange,
};
use crate::Coord;

const COARSE_HEIGHT: Coord = 2000;

/// Footprint with corners (0,0), (2000,0) and apex (1000,1732).
pub fn coarse_triangle() -> PrismTriangle<Coord> {
  PrismTriangle::new_unchecked(
    Segment::new(Point::new([0, 0]), Point::new([1000, 1732])),
    Segment::new(Point::new([1000, 1732]), Point::new([2000, 0])),
  )
}

/// The apex quarter of [`coarse_triangle`]: half-scale side edges lying on
/// the same side lines.
pub fn fine_triangle() -> PrismTriangle<Coord> {
  PrismTriangle::new_unchecked(
    Segment::new(Point::new([500, 866]), Point::new([1000, 1732])),
    Segment::new(Point::new([1000, 1732]), Point::new([1500, 866])),
  )
}

/// Mirror-image footprint to the right of [`coarse_triangle`], sharing its
/// right side line; corners (1000,1732), (2000,0), (3000,1732).
pub fn neighbor_coarse_triangle() -> PrismTriangle<Coord> {
  PrismTriangle::new_unchecked(
    Segment::new(Point::new([1000, 1732]), Point::new([2000, 0])),
    Segment::new(Point::new([2000, 0]), Point::new([3000, 1732])),
  )
}

/// The quarter of [`neighbor_coarse_triangle`] nested at its lower corner.
pub fn neighbor_fine_triangle() -> PrismTriangle<Coord> {
  PrismTriangle::new_unchecked(
    Segment::new(Point::new([1500, 866]), Point::new([2000, 0])),
    Segment::new(Point::new([2000, 0]), Point::new([2500, 866])),
  )
}

/// A single column of `cells` equally deep prisms with alternating
/// oscillation sense.
pub fn uniform_column(cells: usize) -> Subdivision {
  let mut builder = SubdivisionBuilder::new();
  let mut below: Option<CellId> = None;
  for i in 0..cells {
    let z = i as Coord * COARSE_HEIGHT;
    let id = builder.push(
      coarse_triangle(),
      ZRange::new(z, z + COARSE_HEIGHT),
      0,
      i % 2 == 0,
    );
    if let Some(b) = below {
      builder.connect(b, Direction::Up, id);
    }
    below = Some(id);
  }
  builder.finish().unwrap()
}

// One slot of a column: a single coarse cell, or two stacked cells one
// depth finer. The oscillation sense alternates per cell, keeping
// vertically adjacent diagonals opposed.
fn push_slot<R>(
  builder: &mut SubdivisionBuilder,
  rng: &mut R,
  z: Coord,
  coarse: PrismTriangle<Coord>,
  fine: PrismTriangle<Coord>,
  expanding: &mut bool,
  below: &mut Option<CellId>,
) -> Vec<CellId>
where
  R: Rng + ?Sized,
{
  let mut cells = Vec::new();
  if rng.gen_bool(0.5) {
    cells.push(builder.push(coarse, ZRange::new(z, z + COARSE_HEIGHT), 0, *expanding));
    *expanding = !*expanding;
  } else {
    for half in 0..2 {
      let bottom = z + half as Coord * (COARSE_HEIGHT / 2);
      cells.push(builder.push(
        fine,
        ZRange::new(bottom, bottom + COARSE_HEIGHT / 2),
        1,
        *expanding,
      ));
      *expanding = !*expanding;
    }
  }
  for &id in &cells {
    if let Some(b) = *below {
      builder.connect(b, Direction::Up, id);
    }
    *below = Some(id);
  }
  cells
}

/// A column of `slots`, each randomly refined or not.
pub fn refined_column<R>(rng: &mut R, slots: usize) -> Subdivision
where
  R: Rng + ?Sized,
{
  let mut builder = SubdivisionBuilder::new();
  let mut below: Option<CellId> = None;
  let mut expanding = true;
  for slot in 0..slots {
    let z = slot as Coord * COARSE_HEIGHT;
    push_slot(
      &mut builder,
      rng,
      z,
      coarse_triangle(),
      fine_triangle(),
      &mut expanding,
      &mut below,
    );
  }
  builder.finish().unwrap()
}

/// Two laterally adjacent columns with independently refined slots, so
/// lateral ownership, cross-corner references and the query all come into
/// play.
pub fn twin_columns<R>(rng: &mut R, slots: usize) -> Subdivision
where
  R: Rng + ?Sized,
{
  let mut builder = SubdivisionBuilder::new();
  let mut below_west: Option<CellId> = None;
  let mut below_east: Option<CellId> = None;
  let mut west_expanding = true;
  let mut east_expanding = true;
  for slot in 0..slots {
    let z = slot as Coord * COARSE_HEIGHT;
    let west = push_slot(
      &mut builder,
      rng,
      z,
      coarse_triangle(),
      fine_triangle(),
      &mut west_expanding,
      &mut below_west,
    );
    let east = push_slot(
      &mut builder,
      rng,
      z,
      neighbor_coarse_triangle(),
      neighbor_fine_triangle(),
      &mut east_expanding,
      &mut below_east,
    );
    // Lateral lists run bottom-to-top along the shared side.
    match (west.len(), east.len()) {
      (1, 1) => builder.connect(west[0], Direction::Right, east[0]),
      (1, 2) => {
        builder.connect(west[0], Direction::Right, east[0]);
        builder.connect(west[0], Direction::Right, east[1]);
      }
      (2, 1) => {
        builder.connect(west[0], Direction::Right, east[0]);
        builder.connect(west[1], Direction::Right, east[0]);
      }
      _ => {
        builder.connect(west[0], Direction::Right, east[0]);
        builder.connect(west[1], Direction::Right, east[1]);
      }
    }
  }
  builder.finish().unwrap()
}
