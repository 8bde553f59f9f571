//! Small spherical-geometry helpers shared by projection and culling.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;

/// Great-circle angle between two directions, in radians.
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate for nearly parallel
/// vectors where `acos` loses most of its digits.
#[inline]
pub fn angular_distance(a: DVec3, b: DVec3) -> f64 {
  a.cross(b).length().atan2(a.dot(b))
}

/// Solid angle of the spherical triangle `abc` (unit vectors).
///
/// Van Oosterom & Strackee; positive when `abc` winds counter-clockwise
/// seen from outside the sphere.
#[inline]
pub fn triangle_solid_angle(a: DVec3, b: DVec3, c: DVec3) -> f64 {
  let numerator = a.dot(b.cross(c));
  let denominator = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);
  2.0 * numerator.atan2(denominator)
}

/// Unit direction for a longitude/latitude pair in radians.
#[inline]
pub fn lonlat_to_direction(lon: f64, lat: f64) -> DVec3 {
  let (sin_lat, cos_lat) = lat.sin_cos();
  let (sin_lon, cos_lon) = lon.sin_cos();
  DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Longitude in `[0, 2π)` and latitude in `[-π/2, π/2]` of a direction.
#[inline]
pub fn direction_to_lonlat(direction: DVec3) -> (f64, f64) {
  let lon = direction.y.atan2(direction.x).rem_euclid(std::f64::consts::TAU);
  let lat = direction.z.atan2(direction.x.hypot(direction.y));
  (lon, lat.clamp(-FRAC_PI_2, FRAC_PI_2))
}
