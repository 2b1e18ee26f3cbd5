use claims::debug_assert_ok;

use crate::data::{CellId, Direction, EdgePolyline, Point2, Segment, Subdivision};
use crate::utils::CellMap;
use crate::Coord;

use Direction::*;

/// The edge network of a frozen subdivision: for every cell that owns its
/// LEFT or RIGHT side edge, the 3D polyline that edge follows.
///
/// A cell owns its LEFT edge iff it is strictly deeper than its left
/// neighbor, and its RIGHT edge iff it is at least as deep as its right
/// neighbor, so every lateral edge has exactly one owner and a shared
/// equal-depth edge belongs to the left cell. A cell without a lateral
/// neighbor owns that side outright.
pub struct EdgeNetwork<'a> {
  subdivision: &'a Subdivision,
  left_edges: CellMap<EdgePolyline>,
  right_edges: CellMap<EdgePolyline>,
}

impl<'a> EdgeNetwork<'a> {
  /// Eagerly builds the network: owned edges finest-depth-first under the
  /// oscillation constraints, then the z-discontinuity repair pass. The
  /// result is immutable; queries never touch the subdivision again.
  pub fn build(subdivision: &'a Subdivision) -> EdgeNetwork<'a> {
    let mut network = EdgeNetwork {
      subdivision,
      left_edges: CellMap::with_capacity(subdivision.len()),
      right_edges: CellMap::with_capacity(subdivision.len()),
    };
    for layer in subdivision.depth_ordered().iter().rev() {
      for &cell in layer {
        network.build_owned_edges(cell);
      }
    }
    for cell in subdivision.ids() {
      network.resolve_discontinuity(cell, Up);
      network.resolve_discontinuity(cell, Down);
    }
    network
  }

  pub fn subdivision(&self) -> &'a Subdivision {
    self.subdivision
  }

  pub fn left_edge(&self, cell: CellId) -> Option<&EdgePolyline> {
    self.left_edges.get(cell)
  }

  pub fn right_edge(&self, cell: CellId) -> Option<&EdgePolyline> {
    self.right_edges.get(cell)
  }

  pub fn left_edges(&self) -> impl Iterator<Item = (CellId, &EdgePolyline)> + '_ {
    self.left_edges.iter()
  }

  pub fn right_edges(&self) -> impl Iterator<Item = (CellId, &EdgePolyline)> + '_ {
    self.right_edges.iter()
  }

  /// 2D point where the shared edge between `before` (left) and `after`
  /// (right) crosses the horizontal plane at `z`. `z` must lie within the
  /// owning cell's z-range.
  pub fn cell_edge_location(&self, before: CellId, after: CellId, z: Coord) -> Point2 {
    debug_assert!(self
      .subdivision
      .cell(before)
      .adjacent(Right)
      .contains(&after));
    let edge = if self.subdivision.cell(after).depth() > self.subdivision.cell(before).depth() {
      self.owned_edge(Left, after)
    } else {
      self.owned_edge(Right, before)
    };
    edge.sample_at(z)
  }

  fn edges(&self, side: Direction) -> &CellMap<EdgePolyline> {
    match side {
      Left => &self.left_edges,
      Right => &self.right_edges,
      _ => panic!("{:?} does not name a cell side", side),
    }
  }

  fn edges_mut(&mut self, side: Direction) -> &mut CellMap<EdgePolyline> {
    match side {
      Left => &mut self.left_edges,
      Right => &mut self.right_edges,
      _ => panic!("{:?} does not name a cell side", side),
    }
  }

  fn owned_edge(&self, side: Direction, cell: CellId) -> &EdgePolyline {
    match self.edges(side).get(cell) {
      Some(edge) => edge,
      None => panic!("{:?} does not own its {:?} edge", cell, side),
    }
  }

  fn owns(&self, cell: CellId, side: Direction) -> bool {
    let c = self.subdivision.cell(cell);
    match c.adjacent(side).first() {
      None => true,
      Some(&neighbor) => {
        let neighbor_depth = self.subdivision.cell(neighbor).depth();
        match side {
          Left => c.depth() > neighbor_depth,
          Right => c.depth() >= neighbor_depth,
          _ => unreachable!(),
        }
      }
    }
  }

  fn build_owned_edges(&mut self, cell: CellId) {
    let sub = self.subdivision;
    for &side in &[Left, Right] {
      if !self.owns(cell, side) {
        continue;
      }
      let c = sub.cell(cell);
      let edge = match side {
        Left => c.triangle().from_edge(),
        _ => c.triangle().to_edge(),
      };
      let edge = if c.is_expanding() { edge } else { edge.reversed() };
      let polyline = EdgePolyline::between(edge.from, edge.to, c.z_range());
      debug_assert_ok!(polyline.validate());
      self.edges_mut(side).insert(cell, polyline);
      self.constrain_oscillation(cell, side, Up);
      self.constrain_oscillation(cell, side, Down);
    }
  }

  // Oscillation: when the vertical neighbor at this side's corner (or that
  // neighbor's own lateral neighbor there) is finer, its edge already
  // exists and dictates where this cell's endpoint must meet it.
  fn constrain_oscillation(&mut self, cell: CellId, side: Direction, vertical: Direction) {
    let sub = self.subdivision;
    let c = sub.cell(cell);
    let stacked = c.adjacent(vertical);
    // Cells on the top or bottom layer are unconstrained in that direction.
    let inner = match side {
      Left => stacked.first(),
      _ => stacked.last(),
    };
    let inner = match inner {
      Some(&id) => id,
      None => return,
    };
    let inner_depth = sub.cell(inner).depth();
    let corner = match vertical {
      Up => sub.cell(inner).adjacent(side).first(),
      _ => sub.cell(inner).adjacent(side).last(),
    }
    .copied();
    let corner_depth = corner.map(|id| sub.cell(id).depth());
    if c.depth() >= inner_depth && c.depth() >= corner_depth.unwrap_or(0) {
      // At least as fine as both: this cell's endpoint is authoritative.
      return;
    }
    let reference = match (corner, corner_depth) {
      (Some(corner), Some(depth))
        if depth > inner_depth || (depth == inner_depth && side == Left) =>
      {
        self.owned_edge(side.opposite(), corner)
      }
      _ => self.owned_edge(side, inner),
    };
    let destination = reference.end(vertical.opposite());
    let own = match self.edges_mut(side).get_mut(cell) {
      Some(edge) => edge,
      None => panic!("{:?} does not own its {:?} edge", cell, side),
    };
    own.adjust_end(vertical, destination);
    debug_assert_ok!(own.validate());
  }

  // Two equal-depth cells meeting a coarser cell across its `vertical`
  // surface share a side edge whose endpoint lies in the interior of that
  // surface. Pull it onto the crossing between the coarser cell's own side
  // edges at the shared height.
  fn resolve_discontinuity(&mut self, cell: CellId, vertical: Direction) {
    let sub = self.subdivision;
    let stacked = sub.cell(cell).adjacent(vertical);
    if stacked.len() < 2 {
      return;
    }
    let leftmost = stacked[0];
    debug_assert_eq!(sub.cell(leftmost).depth(), sub.cell(cell).depth() + 1);
    debug_assert_eq!(
      sub.cell(stacked[stacked.len() - 1]).depth(),
      sub.cell(cell).depth() + 1
    );
    let left_end = self.governing_edge(cell, Left, vertical).end(vertical).xy();
    let right_end = self
      .governing_edge(cell, Right, vertical)
      .end(vertical)
      .xy();
    let span = Segment::new(left_end, right_end);
    let shared = sub.cell(leftmost).triangle().to_edge();
    let crossing = match shared.line_intersection(&span) {
      Some(point) => point,
      None => unreachable!(
        "shared edge of {:?} parallel to the {:?} surface span of {:?}",
        leftmost, vertical, cell
      ),
    };
    let z = match vertical {
      Up => sub.cell(leftmost).z_range().min,
      _ => sub.cell(leftmost).z_range().max,
    };
    let destination = crossing.with_z(z);
    let edge = match self.right_edges.get_mut(leftmost) {
      Some(edge) => edge,
      None => panic!("{:?} does not own its {:?} edge", leftmost, Right),
    };
    edge.adjust_end(vertical.opposite(), destination);
    debug_assert_ok!(edge.validate());
  }

  // Which polyline governs this cell's `side` at its `vertical` end: a
  // finer lateral neighbor there holds the edge on its opposite side, and
  // an equal-depth left neighbor holds it on its right.
  fn governing_edge(&self, cell: CellId, side: Direction, vertical: Direction) -> &EdgePolyline {
    let sub = self.subdivision;
    let c = sub.cell(cell);
    let lateral = c.adjacent(side);
    let neighbor = match vertical {
      Up => lateral.last(),
      _ => lateral.first(),
    };
    if let Some(&neighbor) = neighbor {
      let neighbor_depth = sub.cell(neighbor).depth();
      if neighbor_depth > c.depth() || (side == Left && neighbor_depth == c.depth()) {
        return self.owned_edge(side.opposite(), neighbor);
      }
    }
    self.owned_edge(side, cell)
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::{Point, PrismTriangle, SubdivisionBuilder, ZRange};

  // Footprint with corners (0,0), (2000,0) and apex (1000,1732); both side
  // edges climb toward the apex.
  fn wide_triangle() -> PrismTriangle<Coord> {
    PrismTriangle::new_unchecked(
      Segment::new(Point::new([0, 0]), Point::new([1000, 1732])),
      Segment::new(Point::new([1000, 1732]), Point::new([2000, 0])),
    )
  }

  #[test]
  fn single_cell_holds_both_edges() {
    let mut builder = SubdivisionBuilder::new();
    let cell = builder.push(wide_triangle(), ZRange::new(0, 2000), 0, true);
    let subdivision = builder.finish().unwrap();
    let network = EdgeNetwork::build(&subdivision);

    let left = network.left_edge(cell).unwrap();
    assert_eq!(
      left.points(),
      &[Point::new([0, 0, 0]), Point::new([1000, 1732, 2000])]
    );
    let right = network.right_edge(cell).unwrap();
    assert_eq!(
      right.points(),
      &[Point::new([1000, 1732, 0]), Point::new([2000, 0, 2000])]
    );
    assert_eq!(left.sample_at(1000), Point::new([500, 866]));
  }

  #[test]
  fn contracting_cell_swaps_edge_endpoints() {
    let mut builder = SubdivisionBuilder::new();
    let cell = builder.push(wide_triangle(), ZRange::new(0, 2000), 0, false);
    let subdivision = builder.finish().unwrap();
    let network = EdgeNetwork::build(&subdivision);

    assert_eq!(
      network.left_edge(cell).unwrap().points(),
      &[Point::new([1000, 1732, 0]), Point::new([0, 0, 2000])]
    );
    assert_eq!(
      network.right_edge(cell).unwrap().points(),
      &[Point::new([2000, 0, 0]), Point::new([1000, 1732, 2000])]
    );
  }

  #[test]
  fn stacked_equal_depth_cells_stay_straight() {
    let mut builder = SubdivisionBuilder::new();
    let bottom = builder.push(wide_triangle(), ZRange::new(0, 2000), 0, true);
    let top = builder.push(wide_triangle(), ZRange::new(2000, 4000), 0, false);
    builder.connect(bottom, Up, top);
    let subdivision = builder.finish().unwrap();
    let network = EdgeNetwork::build(&subdivision);

    for &cell in &[bottom, top] {
      assert_eq!(network.left_edge(cell).unwrap().points().len(), 2);
      assert_eq!(network.right_edge(cell).unwrap().points().len(), 2);
    }
    // The alternating diagonals already meet at the shared boundary.
    assert_eq!(
      network.left_edge(bottom).unwrap().back(),
      network.left_edge(top).unwrap().front()
    );
    assert_eq!(
      network.right_edge(bottom).unwrap().back(),
      network.right_edge(top).unwrap().front()
    );
  }

  // A coarse cell under a single finer cell: the coarse endpoints are
  // pulled onto the finer edges, gaining a bend each; the finer cell's own
  // edges stay straight.
  #[test]
  fn coarse_cell_bends_toward_finer_neighbor_above() {
    let fine = PrismTriangle::new_unchecked(
      Segment::new(Point::new([500, 0]), Point::new([1000, 866])),
      Segment::new(Point::new([1000, 866]), Point::new([1000, 0])),
    );
    let mut builder = SubdivisionBuilder::new();
    let coarse = builder.push(wide_triangle(), ZRange::new(0, 2000), 0, true);
    let finer = builder.push(fine, ZRange::new(2000, 4000), 1, false);
    builder.connect(coarse, Up, finer);
    let subdivision = builder.finish().unwrap();
    let network = EdgeNetwork::build(&subdivision);

    // The finer cell is authoritative on both ends; no constraint applies.
    assert_eq!(network.left_edge(finer).unwrap().points().len(), 2);
    assert_eq!(network.right_edge(finer).unwrap().points().len(), 2);

    let left = network.left_edge(coarse).unwrap();
    assert_eq!(
      left.points(),
      &[
        Point::new([0, 0, 0]),
        Point::new([847, 601, 1694]),
        Point::new([1000, 866, 2000]),
      ]
    );
    let right = network.right_edge(coarse).unwrap();
    assert_eq!(
      right.points(),
      &[
        Point::new([1000, 1732, 0]),
        Point::new([824, 306, 1647]),
        Point::new([1000, 0, 2000]),
      ]
    );
    // The moved endpoints coincide exactly with the finer edges.
    assert_eq!(left.back(), network.left_edge(finer).unwrap().front());
    assert_eq!(right.back(), network.right_edge(finer).unwrap().front());
  }

  // Two equal-depth cells above one coarser cell: their shared edge ends in
  // the interior of the coarse top surface and is pulled onto the crossing
  // with the coarse cell's own edges.
  #[test]
  fn equal_depth_pair_above_coarse_cell_is_reconciled() {
    let upper_left = PrismTriangle::new_unchecked(
      Segment::new(Point::new([0, 0]), Point::new([1000, 1732])),
      Segment::new(Point::new([1000, 1732]), Point::new([1000, 0])),
    );
    let upper_right = PrismTriangle::new_unchecked(
      Segment::new(Point::new([1000, 0]), Point::new([1000, 1732])),
      Segment::new(Point::new([1000, 1732]), Point::new([2000, 0])),
    );
    let mut builder = SubdivisionBuilder::new();
    let coarse = builder.push(wide_triangle(), ZRange::new(0, 2000), 0, true);
    let left = builder.push(upper_left, ZRange::new(2000, 4000), 1, false);
    let right = builder.push(upper_right, ZRange::new(2000, 4000), 1, false);
    builder.connect(coarse, Up, left);
    builder.connect(coarse, Up, right);
    builder.connect(left, Right, right);
    let subdivision = builder.finish().unwrap();
    let network = EdgeNetwork::build(&subdivision);

    // Ownership: the left upper cell holds the shared edge.
    assert!(network.right_edge(left).is_some());
    assert!(network.left_edge(right).is_none());

    let shared = network.right_edge(left).unwrap();
    assert_eq!(
      shared.points(),
      &[
        Point::new([1000, 1732, 2000]),
        Point::new([1000, 2299, 2654]),
        Point::new([1000, 1732, 4000]),
      ]
    );

    // Query laws at the shared boundary.
    let at_bottom = network.cell_edge_location(left, right, 2000);
    assert_eq!(at_bottom, Point::new([1000, 1732]));
    assert_eq!(at_bottom, network.cell_edge_location(left, right, 2000));
    assert_eq!(
      network.cell_edge_location(left, right, 4000),
      Point::new([1000, 1732])
    );
    assert_eq!(
      network.cell_edge_location(left, right, 2654),
      Point::new([1000, 2299])
    );
  }

  // The reference edge for an oscillation constraint may be held by the
  // vertical neighbor's own lateral neighbor when that one is the owner.
  #[test]
  fn constraint_follows_ownership_across_the_corner() {
    let left_of_cell = PrismTriangle::new_unchecked(
      Segment::new(Point::new([-1000, 1732]), Point::new([0, 0])),
      Segment::new(Point::new([0, 0]), Point::new([1000, 1732])),
    );
    let above = PrismTriangle::new_unchecked(
      Segment::new(Point::new([500, 866]), Point::new([1000, 1732])),
      Segment::new(Point::new([1000, 1732]), Point::new([1500, 866])),
    );
    let above_left = PrismTriangle::new_unchecked(
      Segment::new(Point::new([0, 0]), Point::new([500, 866])),
      Segment::new(Point::new([500, 866]), Point::new([1000, 0])),
    );
    let mut builder = SubdivisionBuilder::new();
    let cell = builder.push(wide_triangle(), ZRange::new(0, 2000), 1, true);
    let neighbor = builder.push(left_of_cell, ZRange::new(0, 4000), 0, true);
    let upper = builder.push(above, ZRange::new(2000, 3000), 2, false);
    let upper_left = builder.push(above_left, ZRange::new(2000, 3000), 2, false);
    builder.connect(neighbor, Right, cell);
    builder.connect(cell, Up, upper);
    builder.connect(upper_left, Right, upper);
    let subdivision = builder.finish().unwrap();
    let network = EdgeNetwork::build(&subdivision);

    // `upper` and `upper_left` are equally deep, so the shared edge above
    // this cell's top-left corner belongs to `upper_left`; the constraint
    // must read it from there.
    assert!(network.left_edge(upper).is_none());
    let reference = network.right_edge(upper_left).unwrap();
    assert_eq!(reference.front(), Point::new([1000, 0, 2000]));

    let left = network.left_edge(cell).unwrap();
    assert_eq!(
      left.points(),
      &[
        Point::new([0, 0, 0]),
        Point::new([694, -530, 1388]),
        Point::new([1000, 0, 2000]),
      ]
    );
    assert_eq!(left.back(), reference.front());

    // The right side ties to the vertical neighbor itself.
    let right = network.right_edge(cell).unwrap();
    assert_eq!(right.points().len(), 3);
    assert_eq!(right.back(), network.right_edge(upper).unwrap().front());

    // The query reads the deeper cell's left edge for the lateral pair.
    assert_eq!(
      network.cell_edge_location(neighbor, cell, 0),
      Point::new([0, 0])
    );
    assert_eq!(
      network.cell_edge_location(neighbor, cell, 2000),
      Point::new([1000, 0])
    );
    assert_eq!(
      network.cell_edge_location(neighbor, cell, 1388),
      Point::new([694, -530])
    );
  }
}
