//! Direction ↔ pixel projection.
//!
//! ```text
//!         z
//!         │   polar cap      |z| > 2/3   faces 0..3 (north), 8..11 (south)
//!    ─────┼─────────────
//!         │   equatorial     |z| <= 2/3  faces 4..7 straddle the equator
//!    ─────┼─────────────
//!         │   polar cap
//! ```
//!
//! Floor semantics throughout: a direction exactly on a pixel edge maps to
//! the pixel whose half-open interval `[lo, hi)` contains it, so identical
//! inputs always produce identical indices.

use std::f64::consts::{FRAC_2_PI, FRAC_PI_4};
use std::num::NonZeroU32;

use glam::DVec3;

use super::nested::{check_order, check_pixel, nest_to_xyf, xyf_to_nest};
use crate::constants::{nside, POLAR_PRECISION_Z, TRANSITION_Z};
use crate::error::{Result, TilingError};
use crate::geometry::{direction_to_lonlat, lonlat_to_direction, triangle_solid_angle};
use crate::tables::{JPLL, JRLL};

/// Centre and corner directions of one pixel.
///
/// Corners are ordered north, west, south, east, which winds
/// counter-clockwise seen from outside the sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelGeometry {
  pub center: DVec3,
  pub corners: [DVec3; 4],
}

impl PixelGeometry {
  pub const NORTH: usize = 0;
  pub const WEST: usize = 1;
  pub const SOUTH: usize = 2;
  pub const EAST: usize = 3;

  /// Solid angle of the quadrilateral spanned by the corners, treating
  /// edges as great-circle arcs.
  pub fn solid_angle(&self) -> f64 {
    let [n, w, s, e] = self.corners;
    triangle_solid_angle(n, w, s) + triangle_solid_angle(n, s, e)
  }
}

/// Nested index of the pixel containing `direction` at `order`.
///
/// The direction need not be normalised, but must be finite and non-zero.
pub fn ang2pix(direction: DVec3, order: u8) -> Result<u64> {
  check_order(order)?;
  let scale = direction.abs().max_element();
  if !direction.is_finite() || scale == 0.0 {
    return Err(TilingError::InvalidDirection);
  }
  // Rescale so the length neither overflows nor underflows.
  let direction = direction / scale;
  let length = direction.length();

  let z = direction.z / length;
  let za = z.abs();
  let side = nside(order);
  let ns = side as f64;

  let mut tt = (direction.y.atan2(direction.x) * FRAC_2_PI).rem_euclid(4.0);
  if tt >= 4.0 {
    tt -= 4.0;
  }

  if za <= TRANSITION_Z {
    // Equatorial belt: the two diagonal line families are straight in (tt, z).
    let temp1 = ns * (0.5 + tt);
    let temp2 = ns * (z * 0.75);
    let jp = (temp1 - temp2) as u64;
    let jm = (temp1 + temp2) as u64;
    let ifp = jp >> order;
    let ifm = jm >> order;
    let face = if ifp == ifm {
      ifp | 4
    } else if ifp < ifm {
      ifp
    } else {
      ifm + 8
    };
    let ix = jm & (side - 1);
    let iy = side - (jp & (side - 1)) - 1;
    return Ok(xyf_to_nest(face, ix, iy, order));
  }

  // Polar cap.
  let ntt = (tt as u64).min(3);
  let tp = tt - ntt as f64;
  let tmp = if za > POLAR_PRECISION_Z {
    // 1 - za cancels catastrophically this close to the pole.
    let sth = direction.x.hypot(direction.y) / length;
    ns * sth / ((1.0 + za) / 3.0).sqrt()
  } else {
    ns * (3.0 * (1.0 - za)).sqrt()
  };
  let jp = ((tp * tmp) as u64).min(side - 1);
  let jm = (((1.0 - tp) * tmp) as u64).min(side - 1);

  let pixel = if z >= 0.0 {
    xyf_to_nest(ntt, side - jm - 1, side - jp - 1, order)
  } else {
    xyf_to_nest(ntt + 8, jp, jm, order)
  };
  Ok(pixel)
}

/// Nested index of the pixel containing a longitude/latitude in radians.
pub fn ang2pix_lonlat(lon: f64, lat: f64, order: u8) -> Result<u64> {
  if !lon.is_finite() || !lat.is_finite() {
    return Err(TilingError::InvalidDirection);
  }
  ang2pix(lonlat_to_direction(lon, lat), order)
}

/// Centre and four corners of `pixel` at `order`.
pub fn pix2ang(pixel: u64, order: u8) -> Result<PixelGeometry> {
  check_pixel(pixel, order)?;
  let xy = nest_to_xyf(pixel, order);
  let ns = nside(order) as f64;
  let xc = (xy.ix as f64 + 0.5) / ns;
  let yc = (xy.iy as f64 + 0.5) / ns;
  let d = 0.5 / ns;

  Ok(PixelGeometry {
    center: face_point(xc, yc, xy.face),
    corners: [
      face_point(xc + d, yc + d, xy.face),
      face_point(xc - d, yc + d, xy.face),
      face_point(xc - d, yc - d, xy.face),
      face_point(xc + d, yc - d, xy.face),
    ],
  })
}

/// Centre direction of `pixel`.
pub fn pixel_center(pixel: u64, order: u8) -> Result<DVec3> {
  check_pixel(pixel, order)?;
  let xy = nest_to_xyf(pixel, order);
  let ns = nside(order) as f64;
  Ok(face_point(
    (xy.ix as f64 + 0.5) / ns,
    (xy.iy as f64 + 0.5) / ns,
    xy.face,
  ))
}

/// Longitude and latitude of the centre of `pixel`, in radians.
pub fn pix2lonlat(pixel: u64, order: u8) -> Result<(f64, f64)> {
  pixel_center(pixel, order).map(direction_to_lonlat)
}

/// `4 * step` points tracing the pixel outline counter-clockwise.
///
/// Each edge contributes `step` points starting at its first corner, edges
/// in the order north→west, west→south, south→east, east→north. With
/// `step == 1` this is exactly [`PixelGeometry::corners`].
pub fn boundaries(pixel: u64, order: u8, step: NonZeroU32) -> Result<Vec<DVec3>> {
  check_pixel(pixel, order)?;
  let xy = nest_to_xyf(pixel, order);
  let ns = nside(order) as f64;
  let step = step.get();
  let xc = (xy.ix as f64 + 0.5) / ns;
  let yc = (xy.iy as f64 + 0.5) / ns;
  let dc = 0.5 / ns;
  let d = 1.0 / (ns * step as f64);

  let mut points = Vec::with_capacity(4 * step as usize);
  for i in 0..step {
    points.push(face_point(xc + dc - i as f64 * d, yc + dc, xy.face));
  }
  for i in 0..step {
    points.push(face_point(xc - dc, yc + dc - i as f64 * d, xy.face));
  }
  for i in 0..step {
    points.push(face_point(xc - dc + i as f64 * d, yc - dc, xy.face));
  }
  for i in 0..step {
    points.push(face_point(xc + dc, yc - dc + i as f64 * d, xy.face));
  }
  Ok(points)
}

/// Unit direction of the continuous face coordinate `(x, y)` in `[0, 1]²`.
fn face_point(x: f64, y: f64, face: usize) -> DVec3 {
  let jr = JRLL[face] as f64 - x - y;

  let (nr, z, polar_sth) = if jr < 1.0 {
    let tmp = jr * jr / 3.0;
    let z = 1.0 - tmp;
    let sth = (z > POLAR_PRECISION_Z).then(|| (tmp * (2.0 - tmp)).sqrt());
    (jr, z, sth)
  } else if jr > 3.0 {
    let nr = 4.0 - jr;
    let tmp = nr * nr / 3.0;
    let z = tmp - 1.0;
    let sth = (z < -POLAR_PRECISION_Z).then(|| (tmp * (2.0 - tmp)).sqrt());
    (nr, z, sth)
  } else {
    (1.0, (2.0 - jr) * (2.0 / 3.0), None)
  };

  let mut tmp = JPLL[face] as f64 * nr + x - y;
  if tmp < 0.0 {
    tmp += 8.0;
  }
  if tmp >= 8.0 {
    tmp -= 8.0;
  }
  let phi = if nr < 1e-15 { 0.0 } else { FRAC_PI_4 * tmp / nr };
  let sth = polar_sth.unwrap_or_else(|| ((1.0 - z) * (1.0 + z)).max(0.0).sqrt());
  let (sin_phi, cos_phi) = phi.sin_cos();
  DVec3::new(sth * cos_phi, sth * sin_phi, z)
}

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;
