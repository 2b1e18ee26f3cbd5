use array_init::array_init;
use num_traits::Zero;
use std::ops::Add;
use std::ops::Index;
use std::ops::Sub;

use crate::data::Vector;
use crate::{Coord, CoordScalar};

/// Fixed-point position in micrometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Point<T, const N: usize = 2> {
  pub array: [T; N],
}

pub type Point2 = Point<Coord, 2>;
pub type Point3 = Point<Coord, 3>;

// Methods on N-dimensional points.
impl<T, const N: usize> Point<T, N> {
  pub const fn new(array: [T; N]) -> Point<T, N> {
    Point { array }
  }

  pub fn map<U, F>(&self, f: F) -> Point<U, N>
  where
    T: Clone,
    F: Fn(T) -> U,
  {
    Point {
      array: array_init(|i| f(self.array[i].clone())),
    }
  }
}

impl<T: CoordScalar, const N: usize> Point<T, N> {
  // Warning: may overflow for coordinates far outside the printable range.
  pub fn squared_distance(&self, rhs: &Point<T, N>) -> T {
    let mut total = T::zero();
    for i in 0..N {
      let d = self.array[i] - rhs.array[i];
      total += d * d;
    }
    total
  }
}

// Methods on two-dimensional points.
impl<T: CoordScalar> Point<T, 2> {
  pub fn x_coord(&self) -> T {
    self.array[0]
  }

  pub fn y_coord(&self) -> T {
    self.array[1]
  }

  pub fn with_z(self, z: T) -> Point<T, 3> {
    Point::new([self.array[0], self.array[1], z])
  }
}

// Methods on three-dimensional points.
impl<T: CoordScalar> Point<T, 3> {
  pub fn x_coord(&self) -> T {
    self.array[0]
  }

  pub fn y_coord(&self) -> T {
    self.array[1]
  }

  pub fn z_coord(&self) -> T {
    self.array[2]
  }

  pub fn xy(self) -> Point<T, 2> {
    Point::new([self.array[0], self.array[1]])
  }
}

impl<T, const N: usize> Index<usize> for Point<T, N> {
  type Output = T;
  fn index(&self, key: usize) -> &T {
    self.array.index(key)
  }
}

impl<T> From<(T, T)> for Point<T, 2> {
  fn from(point: (T, T)) -> Point<T, 2> {
    Point {
      array: [point.0, point.1],
    }
  }
}

impl<T> From<(T, T, T)> for Point<T, 3> {
  fn from(point: (T, T, T)) -> Point<T, 3> {
    Point {
      array: [point.0, point.1, point.2],
    }
  }
}

impl<T: CoordScalar, const N: usize> Sub for Point<T, N> {
  type Output = Vector<T, N>;
  fn sub(self, rhs: Point<T, N>) -> Vector<T, N> {
    Vector(array_init(|i| self.array[i] - rhs.array[i]))
  }
}

impl<T: CoordScalar, const N: usize> Add<Vector<T, N>> for Point<T, N> {
  type Output = Point<T, N>;
  fn add(self, rhs: Vector<T, N>) -> Point<T, N> {
    Point {
      array: array_init(|i| self.array[i] + rhs.0[i]),
    }
  }
}
