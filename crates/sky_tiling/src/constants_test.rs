use super::*;

#[test]
fn test_pixel_counts() {
  assert_eq!(npix(0), 12);
  assert_eq!(npix(1), 48);
  assert_eq!(npix(2), 192);
  assert_eq!(npix(MAX_ORDER), 12 * (1u64 << 58));
}

/// The deepest nested index must still fit in a u64 with room to spare.
#[test]
fn test_max_order_fits_u64() {
  let last = npix(MAX_ORDER) - 1;
  assert!(last.leading_zeros() >= 2, "index uses {} bits", 64 - last.leading_zeros());
}

#[test]
fn test_nside_squared_is_npface() {
  for order in 0..=MAX_ORDER {
    assert_eq!(nside(order) * nside(order), npface(order));
  }
}
