//! Spherical bounds of a tile, used for culling and resolution tests.

use glam::DVec3;

use super::TileKey;
use crate::error::Result;
use crate::geometry::angular_distance;
use crate::healpix::{pix2ang, PixelGeometry};

/// Margin applied to the corner-derived cap radius. Tile edges bulge
/// slightly past the great circles through their corners.
pub const CAP_PADDING: f64 = 1.05;

/// Centre, corners and enclosing cap of one tile on the unit sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileBounds {
  /// Unit direction of the tile centre.
  pub center: DVec3,
  /// Unit corner directions, ordered north, west, south, east.
  pub corners: [DVec3; 4],
  /// Angular radius (radians) of a cap around `center` containing the
  /// whole tile.
  pub cap_radius: f64,
}

impl TileBounds {
  pub fn from_geometry(geometry: PixelGeometry) -> Self {
    let reach = geometry
      .corners
      .iter()
      .map(|&corner| angular_distance(geometry.center, corner))
      .fold(0.0, f64::max);
    Self {
      center: geometry.center,
      corners: geometry.corners,
      cap_radius: reach * CAP_PADDING,
    }
  }

  /// Bounds of `key`; fails when the key names no pixel.
  pub fn for_key(key: TileKey) -> Result<Self> {
    pix2ang(key.pixel, key.order).map(Self::from_geometry)
  }

  /// Larger of the two corner-to-corner diagonals, in radians.
  ///
  /// Compared against the target resolution to decide subdivision.
  pub fn angular_size(&self) -> f64 {
    let [n, w, s, e] = self.corners;
    angular_distance(n, s).max(angular_distance(w, e))
  }

  /// Solid angle in steradians.
  pub fn solid_angle(&self) -> f64 {
    PixelGeometry {
      center: self.center,
      corners: self.corners,
    }
    .solid_angle()
  }

  /// Bounding sphere `(center, radius)` of the tile laid on a globe of
  /// `globe_radius`.
  ///
  /// The chord to the cap edge bounds the flat extent and the sagitta
  /// bounds the bulge, so the ball centred on the chord midpoint encloses
  /// the curved patch.
  pub fn bounding_sphere(&self, globe_radius: f64) -> (DVec3, f64) {
    let half = self.cap_radius.min(std::f64::consts::PI);
    let chord_half = globe_radius * half.sin().abs();
    let depth = globe_radius * (1.0 - half.cos());
    if half >= std::f64::consts::FRAC_PI_2 {
      // Caps past a hemisphere: fall back to the whole globe.
      return (DVec3::ZERO, globe_radius);
    }
    let center = self.center * (globe_radius - depth * 0.5);
    (center, (chord_half * chord_half + depth * depth * 0.25).sqrt())
  }

  /// Angular distance from the tile centre to `direction`.
  #[inline]
  pub fn distance_to(&self, direction: DVec3) -> f64 {
    angular_distance(self.center, direction)
  }
}
