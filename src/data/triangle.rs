use crate::data::Segment;
use crate::{CoordScalar, Error};

/// A prism cell's XY footprint, reduced to the two side edges the cell's
/// oscillating path crosses: `from_edge` is the LEFT side, `to_edge` the
/// RIGHT side. The two edges are two sides of one triangle and share
/// exactly one corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrismTriangle<T> {
  from_edge: Segment<T, 2>,
  to_edge: Segment<T, 2>,
}

impl<T: CoordScalar> PrismTriangle<T> {
  pub fn new(from_edge: Segment<T, 2>, to_edge: Segment<T, 2>) -> Result<PrismTriangle<T>, Error> {
    let triangle = PrismTriangle { from_edge, to_edge };
    triangle.validate()?;
    Ok(triangle)
  }

  pub fn new_unchecked(from_edge: Segment<T, 2>, to_edge: Segment<T, 2>) -> PrismTriangle<T> {
    PrismTriangle { from_edge, to_edge }
  }

  pub fn validate(&self) -> Result<(), Error> {
    if self.from_edge.is_degenerate() || self.to_edge.is_degenerate() {
      return Err(Error::SideEdgeViolation);
    }
    let from = [self.from_edge.from, self.from_edge.to];
    let to = [self.to_edge.from, self.to_edge.to];
    let shared = from.iter().filter(|corner| to.contains(*corner)).count();
    if shared != 1 {
      return Err(Error::SideEdgeViolation);
    }
    Ok(())
  }

  pub fn from_edge(&self) -> Segment<T, 2> {
    self.from_edge
  }

  pub fn to_edge(&self) -> Segment<T, 2> {
    self.to_edge
  }
}
