//! TileTreeConfig - limits and globe geometry for tile selection.

use crate::constants::MAX_ORDER;
use crate::error::{Result, TilingError};

/// Configuration for tile selection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TileTreeConfig {
  /// Tiles coarser than this are always subdivided (while visible).
  pub min_order: u8,

  /// Tiles at this order are never subdivided.
  pub max_order: u8,

  /// Radius of the globe tiles are laid on, in world units. Only
  /// frustum culling looks at it.
  pub globe_radius: f64,

  /// Largest order difference allowed between adjacent visible leaves.
  /// 0 disables gradation.
  pub max_order_delta: u8,

  /// Upper bound on gradation passes per selection.
  pub max_gradation_iterations: usize,
}

impl TileTreeConfig {
  /// Full depth range, unit globe, no gradation.
  pub const DEFAULT: Self = Self {
    min_order: 0,
    max_order: MAX_ORDER,
    globe_radius: 1.0,
    max_order_delta: 0,
    max_gradation_iterations: 4,
  };

  /// Crack-free terrain: neighbouring leaves differ by at most one order.
  pub const GRADED: Self = Self {
    max_order_delta: 1,
    ..Self::DEFAULT
  };

  /// Whether neighbour gradation runs.
  #[inline]
  pub fn gradation_enabled(&self) -> bool {
    self.max_order_delta > 0 && self.max_gradation_iterations > 0
  }
}

impl Default for TileTreeConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Target tile size on the celestial sphere (camera at the centre).
///
/// A tile of `tile_pixels` texels should cover about as many screen
/// pixels, so its angular size matches `tile_pixels` times the angle of
/// one screen pixel.
pub fn sky_target_resolution(fov_y: f64, viewport_height_px: u32, tile_pixels: u32) -> Result<f64> {
  if !fov_y.is_finite() || fov_y <= 0.0 {
    return Err(TilingError::InvalidResolution { value: fov_y });
  }
  if viewport_height_px == 0 || tile_pixels == 0 {
    return Err(TilingError::InvalidResolution { value: 0.0 });
  }
  Ok(fov_y / viewport_height_px as f64 * tile_pixels as f64)
}

/// Target tile size, as an angle at the globe centre, for a camera
/// `camera_distance` from the centre of a globe of `globe_radius`.
///
/// Near the sub-camera point one radian of arc spans
/// `globe_radius / (camera_distance - globe_radius)` radians on screen.
pub fn globe_target_resolution(
  fov_y: f64,
  viewport_height_px: u32,
  tile_pixels: u32,
  camera_distance: f64,
  globe_radius: f64,
) -> Result<f64> {
  let on_screen = sky_target_resolution(fov_y, viewport_height_px, tile_pixels)?;
  if !globe_radius.is_finite() || globe_radius <= 0.0 {
    return Err(TilingError::InvalidResolution { value: globe_radius });
  }
  let altitude = camera_distance - globe_radius;
  if !altitude.is_finite() || altitude <= 0.0 {
    return Err(TilingError::InvalidResolution { value: camera_distance });
  }
  Ok(on_screen * altitude / globe_radius)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
