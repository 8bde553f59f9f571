//! Neighbour search across face boundaries.
//!
//! Interior pixels resolve all 8 neighbours by bit arithmetic on the nested
//! index. Pixels on a face edge step into the adjacent face through
//! [`FACE_ARRAY`](crate::tables::FACE_ARRAY) and remap their coordinates
//! with [`SWAP_ARRAY`](crate::tables::SWAP_ARRAY).
//!
//! Eight vertices of the base tessellation (where an equatorial face's east
//! or west corner touches two polar faces) are shared by only 3 faces. The
//! 3 pixels around each of them have 7 neighbours, 24 pixels per order; the
//! missing slot is reported as `None`, never as a sentinel index.

use smallvec::SmallVec;

use super::nested::{check_pixel, nest_to_xyf, xyf_to_nest};
use crate::constants::{nside, CENTRE_DIRECTION};
use crate::error::Result;
use crate::tables::{
  neighbour_face, swap_flags, FLIP_X, FLIP_Y, SWAP_XY, X_OFFSET, Y_OFFSET,
};

/// Compass direction of a neighbour, in result order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
  SouthWest = 0,
  West = 1,
  NorthWest = 2,
  North = 3,
  NorthEast = 4,
  East = 5,
  SouthEast = 6,
  South = 7,
}

impl Direction {
  /// All directions in result order.
  pub const ALL: [Direction; 8] = [
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
  ];

  #[inline]
  pub const fn index(self) -> usize {
    self as usize
  }

  /// Face-local `(dx, dy)` step.
  #[inline]
  pub const fn offset(self) -> (i64, i64) {
    (X_OFFSET[self as usize], Y_OFFSET[self as usize])
  }

  /// Direction pointing back.
  pub const fn opposite(self) -> Direction {
    Direction::ALL[(self as usize + 4) % 8]
  }
}

/// The up-to-8 neighbours of one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Neighbours {
  slots: [Option<u64>; 8],
}

impl Neighbours {
  /// Neighbour in `direction`, `None` at a 3-face corner.
  #[inline]
  pub fn get(&self, direction: Direction) -> Option<u64> {
    self.slots[direction.index()]
  }

  /// Raw slots in result order SW, W, NW, N, NE, E, SE, S.
  #[inline]
  pub fn as_array(&self) -> &[Option<u64>; 8] {
    &self.slots
  }

  /// Present neighbours with their direction.
  pub fn iter(&self) -> impl Iterator<Item = (Direction, u64)> + '_ {
    Direction::ALL
      .iter()
      .zip(self.slots.iter())
      .filter_map(|(direction, slot)| slot.map(|pixel| (*direction, pixel)))
  }

  /// Present neighbour indices, in result order.
  pub fn pixels(&self) -> SmallVec<[u64; 8]> {
    self.slots.iter().flatten().copied().collect()
  }

  /// Directions with no neighbour.
  pub fn missing(&self) -> impl Iterator<Item = Direction> + '_ {
    Direction::ALL
      .iter()
      .copied()
      .filter(|direction| self.slots[direction.index()].is_none())
  }

  /// Number of present neighbours: 7 or 8, except at order 0 where the
  /// base faces have 6.
  pub fn len(&self) -> usize {
    self.slots.iter().filter(|slot| slot.is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn contains(&self, pixel: u64) -> bool {
    self.slots.contains(&Some(pixel))
  }
}

/// Neighbours of `pixel` at `order`, in order SW, W, NW, N, NE, E, SE, S.
///
/// Adjacency is reflexive across face edges: if `b` is a neighbour of `a`
/// then `a` is a neighbour of `b`, though not necessarily in the opposite
/// direction slot since crossing a polar edge rotates the face frame.
pub fn neighbours(pixel: u64, order: u8) -> Result<Neighbours> {
  check_pixel(pixel, order)?;
  let xy = nest_to_xyf(pixel, order);
  let side = nside(order) as i64;
  let ix = xy.ix as i64;
  let iy = xy.iy as i64;
  let face = xy.face as u64;
  let mut result = Neighbours::default();

  if ix > 0 && ix < side - 1 && iy > 0 && iy < side - 1 {
    for direction in Direction::ALL {
      let (dx, dy) = direction.offset();
      result.slots[direction.index()] =
        Some(xyf_to_nest(face, (ix + dx) as u64, (iy + dy) as u64, order));
    }
    return Ok(result);
  }

  for direction in Direction::ALL {
    let (dx, dy) = direction.offset();
    let mut x = ix + dx;
    let mut y = iy + dy;
    let mut row = CENTRE_DIRECTION as i64;
    if x < 0 {
      x += side;
      row -= 1;
    } else if x >= side {
      x -= side;
      row += 1;
    }
    if y < 0 {
      y += side;
      row -= 3;
    } else if y >= side {
      y -= side;
      row += 3;
    }

    let row = row as usize;
    let Some(target) = neighbour_face(row, xy.face)? else {
      continue;
    };
    let flags = swap_flags(row, xy.face)?;
    if flags & FLIP_X != 0 {
      x = side - x - 1;
    }
    if flags & FLIP_Y != 0 {
      y = side - y - 1;
    }
    if flags & SWAP_XY != 0 {
      std::mem::swap(&mut x, &mut y);
    }
    result.slots[direction.index()] = Some(xyf_to_nest(target as u64, x as u64, y as u64, order));
  }

  Ok(result)
}

#[cfg(test)]
#[path = "neighbours_test.rs"]
mod neighbours_test;
