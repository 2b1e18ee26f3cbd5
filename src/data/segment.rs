use crate::data::{Point, Point2};
use crate::Coord;

///////////////////////////////////////////////////////////////////////////////
// Segment

/// An oriented segment. The endpoint order is meaningful: a cell's side
/// edges assign `from` to the bottom of the cell's z-range and `to` to the
/// top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment<T, const N: usize = 2> {
  pub from: Point<T, N>,
  pub to: Point<T, N>,
}

impl<T, const N: usize> Segment<T, N> {
  pub const fn new(from: Point<T, N>, to: Point<T, N>) -> Segment<T, N> {
    Segment { from, to }
  }

  #[must_use]
  pub fn reversed(self) -> Segment<T, N>
  where
    T: Copy,
  {
    Segment {
      from: self.to,
      to: self.from,
    }
  }

  pub fn is_degenerate(&self) -> bool
  where
    T: PartialEq,
  {
    self.from == self.to
  }
}

///////////////////////////////////////////////////////////////////////////////
// Line/line crossing

fn div_round(num: i128, denom: i128) -> i128 {
  let (num, denom) = if denom < 0 { (-num, -denom) } else { (num, denom) };
  if num >= 0 {
    (num + denom / 2) / denom
  } else {
    (num - denom / 2) / denom
  }
}

impl Segment<Coord, 2> {
  /// Crossing point of the infinite lines through `self` and `other`,
  /// rounded to the nearest micrometer. `None` when the lines are parallel.
  pub fn line_intersection(&self, other: &Segment<Coord, 2>) -> Option<Point2> {
    let rx = (self.to.x_coord() - self.from.x_coord()) as i128;
    let ry = (self.to.y_coord() - self.from.y_coord()) as i128;
    let sx = (other.to.x_coord() - other.from.x_coord()) as i128;
    let sy = (other.to.y_coord() - other.from.y_coord()) as i128;
    let denom = rx * sy - ry * sx;
    if denom == 0 {
      return None;
    }
    let qpx = (other.from.x_coord() - self.from.x_coord()) as i128;
    let qpy = (other.from.y_coord() - self.from.y_coord()) as i128;
    let t_num = qpx * sy - qpy * sx;
    let x = self.from.x_coord() as i128 + div_round(t_num * rx, denom);
    let y = self.from.y_coord() as i128 + div_round(t_num * ry, denom);
    Some(Point::new([x as Coord, y as Coord]))
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
