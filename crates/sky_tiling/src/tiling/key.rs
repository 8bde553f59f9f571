//! TileKey - immutable value type naming one tile of the hierarchy.
//!
//! A tile is a HEALPix pixel at a given order. Order 0 = the 12 base faces,
//! each order down splits every tile into 4.

use std::cmp::Ordering;

use crate::constants::{npix, N_FACES};
use crate::healpix::{children_of, parent_of};

/// Tile identifier: `(order, nested pixel)`.
///
/// Ordering is by order first, then pixel, so sorted key lists walk the
/// hierarchy coarse to fine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileKey {
  /// Depth in the hierarchy (0 = base face).
  pub order: u8,
  /// Nested pixel index at `order`.
  pub pixel: u64,
}

impl TileKey {
  pub const fn new(order: u8, pixel: u64) -> Self {
    Self { order, pixel }
  }

  /// Base face tile.
  pub const fn base(face: u64) -> Self {
    Self { order: 0, pixel: face }
  }

  /// The 12 base face tiles.
  pub fn roots() -> impl Iterator<Item = TileKey> {
    (0..N_FACES).map(TileKey::base)
  }

  /// Whether `pixel` exists at `order`.
  pub fn is_valid(&self) -> bool {
    self.order <= crate::constants::MAX_ORDER && self.pixel < npix(self.order)
  }

  /// Base face this tile descends from.
  pub const fn face(&self) -> u64 {
    self.pixel >> (2 * self.order as u32)
  }

  /// Parent tile (coarser: order - 1).
  ///
  /// Returns None for base faces.
  pub fn parent(&self) -> Option<Self> {
    if self.order == 0 {
      return None;
    }
    Some(Self {
      order: self.order - 1,
      pixel: parent_of(self.pixel),
    })
  }

  /// Ancestor at `order`, or None if `order` is not coarser or equal.
  pub fn ancestor(&self, order: u8) -> Option<Self> {
    if order > self.order {
      return None;
    }
    Some(Self {
      order,
      pixel: self.pixel >> (2 * (self.order - order) as u32),
    })
  }

  /// The 4 children (finer: order + 1), in nested order.
  pub fn children(&self) -> [Self; 4] {
    children_of(self.pixel).map(|pixel| Self {
      order: self.order + 1,
      pixel,
    })
  }

  /// Whether `self` is `other` or one of its ancestors.
  pub fn contains(&self, other: &TileKey) -> bool {
    other.ancestor(self.order) == Some(*self)
  }
}

impl PartialOrd for TileKey {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for TileKey {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .order
      .cmp(&other.order)
      .then(self.pixel.cmp(&other.pixel))
  }
}

impl std::fmt::Display for TileKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "N{}/{}", self.order, self.pixel)
  }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
