//! Conversion between face-local coordinates and nested indices.
//!
//! Coordinates are spread onto alternating bits one byte at a time through
//! [`UTAB`]; the reverse walks the index 16 bits at a time through [`CTAB`].

use crate::constants::{npface, npix, nside, MAX_ORDER, N_FACES};
use crate::error::{Result, TilingError};
use crate::tables::{CTAB, UTAB};

/// Face-local position of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceXy {
  /// Base face, 0..12.
  pub face: usize,
  /// Column in the face grid, grows towards the north-east.
  pub ix: u64,
  /// Row in the face grid, grows towards the north-west.
  pub iy: u64,
}

/// Reject orders deeper than [`MAX_ORDER`].
#[inline]
pub(crate) fn check_order(order: u8) -> Result<()> {
  if order > MAX_ORDER {
    return Err(TilingError::InvalidOrder { order });
  }
  Ok(())
}

/// Reject an order or a pixel index that does not exist at that order.
#[inline]
pub(crate) fn check_pixel(pixel: u64, order: u8) -> Result<()> {
  check_order(order)?;
  if pixel >= npix(order) {
    return Err(TilingError::InvalidPixel { pixel, order });
  }
  Ok(())
}

/// Spread the low 32 bits of `v` onto the even bits of a u64.
#[inline(always)]
fn spread(v: u64) -> u64 {
  UTAB[(v & 0xff) as usize] as u64
    | (UTAB[((v >> 8) & 0xff) as usize] as u64) << 16
    | (UTAB[((v >> 16) & 0xff) as usize] as u64) << 32
    | (UTAB[((v >> 24) & 0xff) as usize] as u64) << 48
}

/// Split an interleaved value into its even-bit and odd-bit halves.
#[inline(always)]
fn compact(v: u64) -> (u64, u64) {
  let mut x = 0u64;
  let mut y = 0u64;
  for chunk in 0..4 {
    let bits = (v >> (16 * chunk)) & 0xffff;
    let lo = CTAB[(bits & 0xff) as usize] as u64;
    let hi = CTAB[(bits >> 8) as usize] as u64;
    x |= ((lo & 0xf) | (hi & 0xf) << 4) << (8 * chunk);
    y |= ((lo >> 8) | (hi >> 8) << 4) << (8 * chunk);
  }
  (x, y)
}

/// Nested index of `(face, ix, iy)`. Inputs must already be in range.
#[inline]
pub(crate) fn xyf_to_nest(face: u64, ix: u64, iy: u64, order: u8) -> u64 {
  face * npface(order) + spread(ix) + (spread(iy) << 1)
}

/// Face-local position of a nested index. Input must already be in range.
#[inline]
pub(crate) fn nest_to_xyf(pixel: u64, order: u8) -> FaceXy {
  let npface = npface(order);
  let (ix, iy) = compact(pixel & (npface - 1));
  FaceXy {
    face: (pixel >> (2 * order as u32)) as usize,
    ix,
    iy,
  }
}

/// Nested index of the pixel at `(ix, iy)` on `face`.
pub fn pixel_of(face: usize, ix: u64, iy: u64, order: u8) -> Result<u64> {
  check_order(order)?;
  if face as u64 >= N_FACES {
    return Err(TilingError::InvalidFace { face });
  }
  let side = nside(order);
  if ix >= side || iy >= side {
    return Err(TilingError::InvalidFaceCoordinate { ix, iy, order });
  }
  Ok(xyf_to_nest(face as u64, ix, iy, order))
}

/// Face and face-local coordinates of a nested index.
pub fn face_xy_of(pixel: u64, order: u8) -> Result<FaceXy> {
  check_pixel(pixel, order)?;
  Ok(nest_to_xyf(pixel, order))
}

#[cfg(test)]
#[path = "nested_test.rs"]
mod nested_test;
