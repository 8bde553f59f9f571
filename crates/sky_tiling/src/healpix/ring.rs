//! Ring scheme and whole-map reordering.
//!
//! The ring scheme numbers pixels along iso-latitude rings from north to
//! south, which suits spherical-harmonic transforms; the nested scheme keeps
//! spatial locality. [`PixelMap::swap_scheme`] permutes a full-sky map
//! between the two in place.

use crate::constants::{npix, nside, MAX_ORDER, N_FACES};
use crate::error::{Result, TilingError};
use crate::tables::{swap_cycle, JPLL, JRLL};

use super::nested::{check_pixel, nest_to_xyf, xyf_to_nest, FaceXy};

/// Pixel numbering scheme of a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scheme {
  Nested,
  Ring,
}

/// Ring index of a nested pixel.
pub fn nest_to_ring(pixel: u64, order: u8) -> Result<u64> {
  check_pixel(pixel, order)?;
  Ok(nest_to_ring_unchecked(pixel, order))
}

/// Nested index of a ring pixel.
pub fn ring_to_nest(pixel: u64, order: u8) -> Result<u64> {
  check_pixel(pixel, order)?;
  Ok(ring_to_nest_unchecked(pixel, order))
}

fn nest_to_ring_unchecked(pixel: u64, order: u8) -> u64 {
  let xy = nest_to_xyf(pixel, order);
  xyf_to_ring(xy, order)
}

fn ring_to_nest_unchecked(pixel: u64, order: u8) -> u64 {
  let xy = ring_to_xyf(pixel, order);
  xyf_to_nest(xy.face as u64, xy.ix, xy.iy, order)
}

fn xyf_to_ring(xy: FaceXy, order: u8) -> u64 {
  let ns = nside(order) as i64;
  let nl4 = 4 * ns;
  let npix = npix(order) as i64;
  let ncap = 2 * ns * (ns - 1);
  let (ix, iy) = (xy.ix as i64, xy.iy as i64);

  let jr = JRLL[xy.face] * ns - ix - iy - 1;
  let (nr, first, shifted) = if jr < ns {
    (jr, 2 * jr * (jr - 1), 0)
  } else if jr > 3 * ns {
    let nr = nl4 - jr;
    (nr, npix - 2 * (nr + 1) * nr, 0)
  } else {
    (ns, ncap + (jr - ns) * nl4, (jr - ns) & 1)
  };

  let mut jp = (JPLL[xy.face] * nr + ix - iy + 1 + shifted).div_euclid(2);
  if jp > nl4 {
    jp -= nl4;
  } else if jp < 1 {
    jp += nl4;
  }
  (first + jp - 1) as u64
}

fn ring_to_xyf(pixel: u64, order: u8) -> FaceXy {
  let ns = nside(order) as i64;
  let nl2 = 2 * ns;
  let nl4 = 4 * ns;
  let npix = npix(order) as i64;
  let ncap = 2 * ns * (ns - 1);
  let pix = pixel as i64;

  let (ring, iphi, shifted, nr, face) = if pix < ncap {
    // North polar cap.
    let ring = (1 + isqrt(1 + 2 * pix)) >> 1;
    let iphi = pix + 1 - 2 * ring * (ring - 1);
    (ring, iphi, 0, ring, (iphi - 1) / ring)
  } else if pix < npix - ncap {
    // Equatorial belt.
    let ip = pix - ncap;
    let tmp = ip >> (order + 2);
    let ring = tmp + ns;
    let iphi = ip - tmp * nl4 + 1;
    let ire = tmp + 1;
    let irm = nl2 + 2 - ire;
    let ifm = (iphi - (ire >> 1) + ns - 1) >> order;
    let ifp = (iphi - (irm >> 1) + ns - 1) >> order;
    let face = if ifp == ifm {
      ifp | 4
    } else if ifp < ifm {
      ifp
    } else {
      ifm + 8
    };
    (ring, iphi, (ring + ns) & 1, ns, face)
  } else {
    // South polar cap.
    let ip = npix - pix;
    let ring = (1 + isqrt(2 * ip - 1)) >> 1;
    let iphi = 4 * ring + 1 - (ip - 2 * ring * (ring - 1));
    (2 * nl2 - ring, iphi, 0, ring, 8 + (iphi - 1) / ring)
  };

  let face = face as usize;
  let irt = ring - JRLL[face] * ns + 1;
  let mut ipt = 2 * iphi - JPLL[face] * nr - shifted - 1;
  if ipt >= nl2 {
    ipt -= 8 * ns;
  }
  FaceXy {
    face,
    ix: ((ipt - irt) >> 1) as u64,
    iy: ((-ipt - irt) >> 1) as u64,
  }
}

#[inline]
fn isqrt(v: i64) -> i64 {
  (v as u64).isqrt() as i64
}

/// A full-sky map: one value per pixel of a single order.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelMap<T> {
  order: u8,
  scheme: Scheme,
  values: Vec<T>,
}

impl<T> PixelMap<T> {
  /// Wrap `values`, inferring the order from the length.
  pub fn from_values(values: Vec<T>, scheme: Scheme) -> Result<Self> {
    let len = values.len();
    let per_face = len as u64 / N_FACES;
    if len == 0 || len as u64 % N_FACES != 0 || !per_face.is_power_of_two() {
      return Err(TilingError::MapSizeMismatch { len });
    }
    let twice_order = per_face.trailing_zeros();
    if twice_order % 2 != 0 || twice_order / 2 > MAX_ORDER as u32 {
      return Err(TilingError::MapSizeMismatch { len });
    }
    Ok(Self {
      order: (twice_order / 2) as u8,
      scheme,
      values,
    })
  }

  /// Map of `order` filled from `f(pixel)`, with pixels in `scheme`.
  pub fn from_fn(order: u8, scheme: Scheme, f: impl FnMut(u64) -> T) -> Result<Self> {
    super::nested::check_order(order)?;
    Ok(Self {
      order,
      scheme,
      values: (0..npix(order)).map(f).collect(),
    })
  }

  pub fn order(&self) -> u8 {
    self.order
  }

  pub fn scheme(&self) -> Scheme {
    self.scheme
  }

  pub fn values(&self) -> &[T] {
    &self.values
  }

  pub fn values_mut(&mut self) -> &mut [T] {
    &mut self.values
  }

  pub fn into_values(self) -> Vec<T> {
    self.values
  }

  /// Value of the pixel `pixel`, numbered in this map's current scheme.
  pub fn get(&self, pixel: u64) -> Option<&T> {
    self.values.get(usize::try_from(pixel).ok()?)
  }

  /// Value of the nested pixel `pixel`, whatever the map's scheme.
  pub fn get_nested(&self, pixel: u64) -> Result<&T> {
    check_pixel(pixel, self.order)?;
    let index = match self.scheme {
      Scheme::Nested => pixel,
      Scheme::Ring => nest_to_ring_unchecked(pixel, self.order),
    };
    Ok(&self.values[index as usize])
  }

  /// Reorder the values in place into the other scheme.
  ///
  /// Follows each permutation cycle once, swapping values along it. Cycle
  /// starts come from [`swap_cycle`] up to order 13; deeper maps find them
  /// with a visited bitmap.
  pub fn swap_scheme(&mut self) {
    self.reorder(swap_cycle(self.order));
  }

  fn reorder(&mut self, cycle_starts: Option<&[u64]>) {
    let order = self.order;
    // new[i] = old[source(i)]
    let source: fn(u64, u8) -> u64 = match self.scheme {
      Scheme::Nested => ring_to_nest_unchecked,
      Scheme::Ring => nest_to_ring_unchecked,
    };

    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("swap_scheme", order, from = ?self.scheme).entered();

    match cycle_starts {
      Some(starts) => {
        for &start in starts {
          follow_cycle(&mut self.values, start, |p| source(p, order), |_| {});
        }
      }
      None => {
        let mut visited = vec![false; self.values.len()];
        for start in 0..self.values.len() as u64 {
          if visited[start as usize] {
            continue;
          }
          follow_cycle(
            &mut self.values,
            start,
            |p| source(p, order),
            |p| visited[p as usize] = true,
          );
        }
      }
    }

    self.scheme = match self.scheme {
      Scheme::Nested => Scheme::Ring,
      Scheme::Ring => Scheme::Nested,
    };
  }
}

/// Rotate the values along the cycle through `start`, so each position
/// receives the value previously held at `source(position)`.
fn follow_cycle<T>(
  values: &mut [T],
  start: u64,
  source: impl Fn(u64) -> u64,
  mut visit: impl FnMut(u64),
) {
  let mut current = start;
  visit(current);
  let mut next = source(current);
  while next != start {
    values.swap(current as usize, next as usize);
    current = next;
    visit(current);
    next = source(current);
  }
}

#[cfg(test)]
#[path = "ring_test.rs"]
mod ring_test;
