//! Data-parallel batch projection on the rayon pool.
//!
//! Each element is independent, so a batch is a plain `par_iter` over the
//! input. The whole batch fails on the first invalid element.

use glam::DVec3;
use rayon::prelude::*;

use crate::error::Result;
use crate::healpix::nested::check_order;
use crate::healpix::{ang2pix, pix2ang, PixelGeometry};

/// [`ang2pix`] over a slice of directions, preserving order.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "batch::ang2pix", fields(len = directions.len())))]
pub fn ang2pix_batch(directions: &[DVec3], order: u8) -> Result<Vec<u64>> {
  check_order(order)?;
  directions.par_iter().map(|&d| ang2pix(d, order)).collect()
}

/// [`pix2ang`] over a slice of pixels, preserving order.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "batch::pix2ang", fields(len = pixels.len())))]
pub fn pix2ang_batch(pixels: &[u64], order: u8) -> Result<Vec<PixelGeometry>> {
  check_order(order)?;
  pixels.par_iter().map(|&p| pix2ang(p, order)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::npix;
  use crate::error::TilingError;

  #[test]
  fn test_batches_match_scalar_calls() {
    let order = 6;
    let pixels: Vec<u64> = (0..npix(order)).step_by(13).collect();
    let geometry = pix2ang_batch(&pixels, order).unwrap();
    assert_eq!(geometry.len(), pixels.len());

    let centers: Vec<DVec3> = geometry.iter().map(|g| g.center).collect();
    assert_eq!(ang2pix_batch(&centers, order), Ok(pixels.clone()));
    for (pixel, g) in pixels.iter().zip(&geometry) {
      assert_eq!(pix2ang(*pixel, order).as_ref(), Ok(g));
    }
  }

  #[test]
  fn test_batch_reports_invalid_element() {
    let directions = [DVec3::X, DVec3::ZERO, DVec3::Y];
    assert_eq!(ang2pix_batch(&directions, 4), Err(TilingError::InvalidDirection));
    assert_eq!(
      pix2ang_batch(&[0, 1], 30),
      Err(TilingError::InvalidOrder { order: 30 })
    );
    assert!(ang2pix_batch(&[], 3).unwrap().is_empty());
  }
}
