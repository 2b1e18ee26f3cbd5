use ordered_float::OrderedFloat;

use crate::data::{Direction, Point2, Point3, Vector, ZRange};
use crate::{Coord, Error, MIN_INCLINE_DEGREES};

/// Candidate bends closer than 10 micrometers to either anchor are dropped;
/// such a move is too short to matter and the bend would degenerate.
pub(crate) const MIN_BEND_CLEARANCE_SQ: Coord = 100;

/// The 3D course of one owned cell edge: at least two samples, strictly
/// increasing in z. The first sample sits at the owner's `z_min`, the last
/// at `z_max`; interior samples are bending points inserted by constraint
/// moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePolyline {
  points: Vec<Point3>,
}

impl EdgePolyline {
  /// Straight edge from `bottom` at `z.min` to `top` at `z.max`.
  pub fn between(bottom: Point2, top: Point2, z: ZRange) -> EdgePolyline {
    EdgePolyline {
      points: vec![bottom.with_z(z.min), top.with_z(z.max)],
    }
  }

  #[cfg(test)]
  pub(crate) fn from_points(points: Vec<Point3>) -> EdgePolyline {
    EdgePolyline { points }
  }

  pub fn points(&self) -> &[Point3] {
    &self.points
  }

  pub fn front(&self) -> Point3 {
    self.points[0]
  }

  pub fn back(&self) -> Point3 {
    self.points[self.points.len() - 1]
  }

  /// The endpoint on the side of a vertical direction.
  pub fn end(&self, direction: Direction) -> Point3 {
    debug_assert!(direction.is_vertical());
    match direction {
      Direction::Up => self.back(),
      _ => self.front(),
    }
  }

  /// Pulls the `direction` endpoint onto `destination`, inserting a bending
  /// point next to it when the move is long enough that a straight
  /// replacement segment would flatten the edge. The destination must lie
  /// in the endpoint's horizontal plane.
  pub fn adjust_end(&mut self, direction: Direction, destination: Point3) {
    debug_assert!(direction.is_vertical());
    let last = self.points.len() - 1;
    let (target, anchor) = match direction {
      Direction::Up => (last, last - 1),
      _ => (0, 1),
    };
    let moved = self.points[target];
    if moved == destination {
      return;
    }
    debug_assert_eq!(moved.z_coord(), destination.z_coord());
    let move_len = (destination.xy() - moved.xy()).magnitude();
    let dir: Vector<Coord, 3> = self.points[anchor] - moved;
    let len = dir.magnitude();
    debug_assert!(len > 0);
    // Half the move length back along the edge's old course, measured from
    // the moved endpoint, so the replacement segment stays parallel to the
    // original direction.
    let bend = destination + dir * (move_len / 2) / len;
    self.points[target] = destination;
    if bend.squared_distance(&self.points[anchor]) > MIN_BEND_CLEARANCE_SQ
      && bend.squared_distance(&destination) > MIN_BEND_CLEARANCE_SQ
    {
      match direction {
        Direction::Up => self.points.insert(last, bend),
        _ => self.points.insert(1, bend),
      }
    }
  }

  /// XY position of the edge at height `z`. `z` must lie inside the
  /// polyline's z-range.
  pub fn sample_at(&self, z: Coord) -> Point2 {
    assert!(
      self.front().z_coord() <= z && z <= self.back().z_coord(),
      "z {} outside the edge's range",
      z
    );
    for pair in self.points.windows(2) {
      let (below, above) = (pair[0], pair[1]);
      if z <= above.z_coord() {
        let dz = above.z_coord() - below.z_coord();
        debug_assert!(dz > 0);
        let t = z - below.z_coord();
        let x = below.x_coord() + (above.x_coord() - below.x_coord()) * t / dz;
        let y = below.y_coord() + (above.y_coord() - below.y_coord()) * t / dz;
        return Point2::new([x, y]);
      }
    }
    unreachable!("edge samples not z-monotone")
  }

  /// Smallest slope over all segments, in degrees off horizontal.
  pub fn min_inclination(&self) -> OrderedFloat<f64> {
    let mut min = OrderedFloat(90.0);
    for pair in self.points.windows(2) {
      let d = pair[1] - pair[0];
      let dz = d[2] as f64;
      let dxy = ((d[0] * d[0] + d[1] * d[1]) as f64).sqrt();
      min = min.min(OrderedFloat(dz.atan2(dxy).to_degrees()));
    }
    min
  }

  pub fn validate(&self) -> Result<(), Error> {
    if self.points.len() < 2 {
      return Err(Error::InsufficientSamples);
    }
    for pair in self.points.windows(2) {
      if pair[1].z_coord() <= pair[0].z_coord() {
        return Err(Error::MonotonicityViolation);
      }
    }
    if self.min_inclination() <= OrderedFloat(MIN_INCLINE_DEGREES) {
      return Err(Error::InclineViolation);
    }
    Ok(())
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
