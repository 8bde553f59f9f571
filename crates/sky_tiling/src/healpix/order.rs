//! Order ↔ angular resolution.

use std::f64::consts::PI;

use super::nested::check_order;
use crate::constants::{npix, MAX_ORDER};
use crate::error::{Result, TilingError};

/// Solid angle of one pixel at `order`, in steradians. All pixels of an
/// order have the same area.
pub fn pixel_area(order: u8) -> Result<f64> {
  check_order(order)?;
  Ok(4.0 * PI / npix(order) as f64)
}

/// Square root of the pixel area: the typical pixel side, in radians.
pub fn mean_spacing(order: u8) -> Result<f64> {
  pixel_area(order).map(f64::sqrt)
}

/// Coarsest order whose mean spacing does not exceed `angle` radians.
///
/// Resolutions finer than order 29 return 29.
pub fn order_for_resolution(angle: f64) -> Result<u8> {
  if !angle.is_finite() || angle <= 0.0 {
    return Err(TilingError::InvalidResolution { value: angle });
  }
  for order in 0..=MAX_ORDER {
    if mean_spacing(order)? <= angle {
      return Ok(order);
    }
  }
  Ok(MAX_ORDER)
}
