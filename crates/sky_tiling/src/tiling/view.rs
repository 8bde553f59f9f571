//! View volumes: what part of the sphere the camera can see.
//!
//! A [`ViewVolume`] classifies a tile's bounds as fully outside, partially
//! visible or fully inside. Classification is conservative: a tile that is
//! visible is never reported [`Containment::Outside`].
//!
//! # Implementations
//!
//! - [`FullSky`]: everything is inside (all-sky overviews, tests)
//! - [`ConeView`]: a circular field of view on the celestial sphere
//! - [`Frustum`]: 6 clip planes against a globe of finite radius, with
//!   optional horizon culling and distance-scaled resolution for an
//!   exterior camera

use glam::{DMat4, DVec3, DVec4};

use super::TileBounds;
use crate::error::{Result, TilingError};
use crate::geometry::angular_distance;

/// Result of testing a tile against a view volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Containment {
  /// No part of the tile is visible.
  Outside,
  /// The tile crosses the view boundary.
  Intersecting,
  /// The whole tile is visible; descendants need no further tests.
  Inside,
}

/// Culling volume consulted by tile selection.
pub trait ViewVolume {
  /// Classify a tile.
  fn classify(&self, bounds: &TileBounds) -> Containment;

  /// Direction the view is centred on, used to order transitions nearest
  /// first. `None` keeps key order.
  fn focus(&self) -> Option<DVec3> {
    None
  }

  /// Factor applied to the target resolution for this tile. Views with a
  /// camera position grow it with distance so far tiles stay coarse.
  fn resolution_scale(&self, _bounds: &TileBounds) -> f64 {
    1.0
  }
}

impl<V: ViewVolume + ?Sized> ViewVolume for &V {
  fn classify(&self, bounds: &TileBounds) -> Containment {
    (**self).classify(bounds)
  }

  fn resolution_scale(&self, bounds: &TileBounds) -> f64 {
    (**self).resolution_scale(bounds)
  }

  fn focus(&self) -> Option<DVec3> {
    (**self).focus()
  }
}

// =============================================================================
// FullSky
// =============================================================================

/// Treats the whole sphere as visible.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FullSky;

impl ViewVolume for FullSky {
  fn classify(&self, _bounds: &TileBounds) -> Containment {
    Containment::Inside
  }
}

// =============================================================================
// ConeView
// =============================================================================

/// Circular field of view: all directions within `half_angle` of `axis`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeView {
  axis: DVec3,
  half_angle: f64,
}

impl ConeView {
  pub fn new(axis: DVec3, half_angle: f64) -> Result<Self> {
    let length = axis.length();
    if !axis.is_finite() || length == 0.0 {
      return Err(TilingError::InvalidDirection);
    }
    if !half_angle.is_finite() || half_angle <= 0.0 {
      return Err(TilingError::InvalidResolution { value: half_angle });
    }
    Ok(Self {
      axis: axis / length,
      half_angle,
    })
  }

  pub fn axis(&self) -> DVec3 {
    self.axis
  }

  pub fn half_angle(&self) -> f64 {
    self.half_angle
  }
}

impl ViewVolume for ConeView {
  fn classify(&self, bounds: &TileBounds) -> Containment {
    let distance = angular_distance(self.axis, bounds.center);
    if distance - bounds.cap_radius > self.half_angle {
      Containment::Outside
    } else if distance + bounds.cap_radius <= self.half_angle {
      Containment::Inside
    } else {
      Containment::Intersecting
    }
  }

  fn focus(&self) -> Option<DVec3> {
    Some(self.axis)
  }
}

// =============================================================================
// Frustum
// =============================================================================

/// Plane `normal · p + distance = 0`; the visible side is positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: DVec3,
  pub distance: f64,
}

impl Plane {
  /// Plane from `(a, b, c, d)` coefficients, normalised.
  pub fn from_coefficients(v: DVec4) -> Self {
    let length = v.truncate().length();
    let scale = if length > 0.0 { 1.0 / length } else { 0.0 };
    Self {
      normal: v.truncate() * scale,
      distance: v.w * scale,
    }
  }

  #[inline]
  pub fn signed_distance(&self, point: DVec3) -> f64 {
    self.normal.dot(point) + self.distance
  }
}

/// Camera frustum against a globe of radius `globe_radius` centred at the
/// origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
  planes: [Plane; 6],
  globe_radius: f64,
  eye: Option<DVec3>,
}

impl Frustum {
  /// Frustum from explicit planes (left, right, bottom, top, near, far).
  pub fn from_planes(planes: [Plane; 6], globe_radius: f64) -> Self {
    Self {
      planes,
      globe_radius,
      eye: None,
    }
  }

  /// Extract the 6 planes of a combined view-projection matrix.
  ///
  /// Expects clip-space depth in `[0, 1]`, as produced by
  /// `DMat4::perspective_rh` and friends.
  pub fn from_view_projection(view_projection: DMat4, globe_radius: f64) -> Self {
    let r0 = view_projection.row(0);
    let r1 = view_projection.row(1);
    let r2 = view_projection.row(2);
    let r3 = view_projection.row(3);
    let planes = [
      Plane::from_coefficients(r3 + r0),
      Plane::from_coefficients(r3 - r0),
      Plane::from_coefficients(r3 + r1),
      Plane::from_coefficients(r3 - r1),
      Plane::from_coefficients(r2),
      Plane::from_coefficients(r3 - r2),
    ];
    Self::from_planes(planes, globe_radius)
  }

  /// Also cull tiles entirely behind the globe's horizon as seen from
  /// `eye`. Ignored when the eye is inside the globe.
  pub fn with_horizon(mut self, eye: DVec3) -> Self {
    self.eye = Some(eye);
    self
  }

  pub fn planes(&self) -> &[Plane; 6] {
    &self.planes
  }

  pub fn globe_radius(&self) -> f64 {
    self.globe_radius
  }

  /// Position of the tile relative to the horizon seen from the eye.
  fn horizon_containment(&self, bounds: &TileBounds) -> Containment {
    let Some(eye) = self.eye else {
      return Containment::Inside;
    };
    let eye_distance = eye.length();
    if eye_distance <= self.globe_radius {
      return Containment::Inside;
    }
    // Surface points within this angle of the sub-eye point face the eye.
    let horizon = (self.globe_radius / eye_distance).acos();
    let distance = angular_distance(eye, bounds.center);
    if distance - bounds.cap_radius > horizon {
      Containment::Outside
    } else if distance + bounds.cap_radius <= horizon {
      Containment::Inside
    } else {
      Containment::Intersecting
    }
  }
}

impl ViewVolume for Frustum {
  fn classify(&self, bounds: &TileBounds) -> Containment {
    let horizon = self.horizon_containment(bounds);
    if horizon == Containment::Outside {
      return Containment::Outside;
    }
    let (center, radius) = bounds.bounding_sphere(self.globe_radius);
    let mut inside = horizon == Containment::Inside;
    for plane in &self.planes {
      let d = plane.signed_distance(center);
      if d < -radius {
        return Containment::Outside;
      }
      if d < radius {
        inside = false;
      }
    }
    if inside {
      Containment::Inside
    } else {
      Containment::Intersecting
    }
  }

  fn focus(&self) -> Option<DVec3> {
    self.eye.filter(|eye| eye.length() > 0.0)
  }

  /// Distance from the eye to the nearest tile corner, in units of the
  /// eye's altitude; 1 at the sub-eye point. Pair with
  /// [`globe_target_resolution`](super::globe_target_resolution).
  fn resolution_scale(&self, bounds: &TileBounds) -> f64 {
    let Some(eye) = self.eye else {
      return 1.0;
    };
    let altitude = eye.length() - self.globe_radius;
    if altitude <= 0.0 {
      return 1.0;
    }
    let nearest = bounds
      .corners
      .iter()
      .chain(std::iter::once(&bounds.center))
      .map(|&point| eye.distance(point * self.globe_radius))
      .fold(f64::INFINITY, f64::min);
    (nearest / altitude).max(1.0)
  }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;
