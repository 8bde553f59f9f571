//! Parent/child relations of the nested scheme.
//!
//! Nested indices nest: the 4 children of `p` are `4p..4p + 4` and the
//! parent of `p` is `p >> 2`, independent of order.

use std::ops::Range;

use super::nested::{check_order, check_pixel};
use crate::error::{Result, TilingError};

/// Parent of `pixel` one order up.
///
/// Meaningless for order-0 pixels, which have no parent; use [`rescale`]
/// when the order is not known to be positive.
#[inline]
pub const fn parent_of(pixel: u64) -> u64 {
  pixel >> 2
}

/// The 4 children of `pixel` one order down, in nested order.
#[inline]
pub const fn children_of(pixel: u64) -> [u64; 4] {
  let first = pixel << 2;
  [first, first + 1, first + 2, first + 3]
}

/// Ancestor of `pixel` (at `from`) at the coarser order `to`.
pub fn rescale(pixel: u64, from: u8, to: u8) -> Result<u64> {
  check_pixel(pixel, from)?;
  if to > from {
    return Err(TilingError::InvalidOrder { order: to });
  }
  Ok(pixel >> (2 * (from - to) as u32))
}

/// Half-open range of all descendants of `pixel` (at `from`) at the finer
/// order `to`.
pub fn descendant_range(pixel: u64, from: u8, to: u8) -> Result<Range<u64>> {
  check_pixel(pixel, from)?;
  check_order(to)?;
  if to < from {
    return Err(TilingError::InvalidOrder { order: to });
  }
  let shift = 2 * (to - from) as u32;
  Ok((pixel << shift)..((pixel + 1) << shift))
}
