use std::f64::consts::{FRAC_PI_2, PI};

use super::*;
use crate::healpix::ang2pix;
use crate::tiling::TileKey;

fn bounds_at(direction: DVec3, order: u8) -> TileBounds {
  let pixel = ang2pix(direction, order).unwrap();
  TileBounds::for_key(TileKey::new(order, pixel)).unwrap()
}

// =============================================================================
// FullSky and ConeView
// =============================================================================

#[test]
fn test_full_sky_contains_everything() {
  for face in 0..12 {
    let bounds = TileBounds::for_key(TileKey::base(face)).unwrap();
    assert_eq!(FullSky.classify(&bounds), Containment::Inside);
  }
  assert_eq!(FullSky.focus(), None);
}

#[test]
fn test_cone_classification() {
  let cone = ConeView::new(DVec3::new(0.0, 0.0, 2.0), 0.2).unwrap();
  assert_eq!(cone.axis(), DVec3::Z);
  assert_eq!(cone.focus(), Some(DVec3::Z));

  // Small tile on the axis: fully inside.
  assert_eq!(cone.classify(&bounds_at(DVec3::Z, 8)), Containment::Inside);
  // Base face holding the axis: crosses the cone edge.
  assert_eq!(cone.classify(&bounds_at(DVec3::Z, 0)), Containment::Intersecting);
  // Opposite hemisphere: outside.
  assert_eq!(cone.classify(&bounds_at(DVec3::NEG_Z, 3)), Containment::Outside);
}

/// The tile containing the cone axis is never culled, however narrow the
/// cone.
#[test]
fn test_cone_never_culls_its_axis() {
  let axis = DVec3::new(0.3, -0.8, 0.52).normalize();
  let cone = ConeView::new(axis, 1e-9).unwrap();
  for order in [0u8, 5, 12, 20, 29] {
    assert_ne!(
      cone.classify(&bounds_at(axis, order)),
      Containment::Outside,
      "order {order}"
    );
  }
}

#[test]
fn test_cone_rejects_bad_parameters() {
  assert_eq!(ConeView::new(DVec3::ZERO, 0.1), Err(TilingError::InvalidDirection));
  assert_eq!(
    ConeView::new(DVec3::X, 0.0),
    Err(TilingError::InvalidResolution { value: 0.0 })
  );
  assert!(ConeView::new(DVec3::X, f64::NAN).is_err());
  assert!(ConeView::new(DVec3::X, PI).is_ok());
}

// =============================================================================
// Frustum
// =============================================================================

/// Camera 3 radii above the north pole looking down with a 30° field of view.
fn polar_camera() -> (Frustum, DVec3) {
  let eye = DVec3::new(0.0, 0.0, 3.0);
  let view = DMat4::look_at_rh(eye, DVec3::ZERO, DVec3::Y);
  let projection = DMat4::perspective_rh(30f64.to_radians(), 1.0, 0.1, 10.0);
  (Frustum::from_view_projection(projection * view, 1.0), eye)
}

#[test]
fn test_frustum_planes_are_normalised() {
  let (frustum, _) = polar_camera();
  for plane in frustum.planes() {
    assert!((plane.normal.length() - 1.0).abs() < 1e-12);
  }
  // The eye sits on the visible side of every side plane.
  let eye = DVec3::new(0.0, 0.0, 3.0);
  for plane in &frustum.planes()[..4] {
    assert!(plane.signed_distance(eye) >= -1e-9);
  }
}

#[test]
fn test_frustum_sees_pole_not_equator() {
  let (frustum, _) = polar_camera();
  assert_eq!(frustum.classify(&bounds_at(DVec3::Z, 4)), Containment::Inside);
  assert_eq!(frustum.classify(&bounds_at(DVec3::X, 4)), Containment::Outside);
  assert_eq!(
    frustum.classify(&bounds_at(DVec3::new(0.0, 1.0, 0.0), 4)),
    Containment::Outside
  );
}

#[test]
fn test_horizon_culls_far_side() {
  let (frustum, eye) = polar_camera();
  let far_side = bounds_at(DVec3::NEG_Z, 4);
  assert_ne!(
    frustum.classify(&far_side),
    Containment::Outside,
    "planes alone see through the globe"
  );

  let frustum = frustum.with_horizon(eye);
  assert_eq!(frustum.classify(&far_side), Containment::Outside);
  assert_eq!(frustum.classify(&bounds_at(DVec3::Z, 4)), Containment::Inside);
  assert_eq!(frustum.focus(), Some(eye));
}

/// A tile straddling the horizon is never reported fully inside.
#[test]
fn test_horizon_crossing_tile_is_intersecting() {
  let eye = DVec3::new(0.0, 0.0, 3.0);
  let wide = Frustum::from_view_projection(
    DMat4::perspective_rh(170f64.to_radians(), 1.0, 0.01, 10.0)
      * DMat4::look_at_rh(eye, DVec3::ZERO, DVec3::Y),
    1.0,
  )
  .with_horizon(eye);
  // Horizon seen from 3 radii sits at acos(1/3) ≈ 70.5° from the pole.
  let lat = FRAC_PI_2 - (1.0f64 / 3.0).acos();
  let on_horizon = DVec3::new(lat.cos(), 0.0, lat.sin());
  assert_eq!(wide.classify(&bounds_at(on_horizon, 3)), Containment::Intersecting);
}

#[test]
fn test_frustum_resolution_scale_grows_with_distance() {
  let (frustum, eye) = polar_camera();
  let equator = bounds_at(DVec3::X, 6);
  assert_eq!(frustum.resolution_scale(&equator), 1.0, "no eye, no scaling");

  let frustum = frustum.with_horizon(eye);
  let below = frustum.resolution_scale(&bounds_at(DVec3::Z, 8));
  assert!((below - 1.0).abs() < 1e-9, "sub-eye tile scale {below}");
  // Equator is sqrt(10) away against an altitude of 2.
  let far = frustum.resolution_scale(&equator);
  assert!(far > 1.5 && far < 10f64.sqrt() / 2.0 + 1e-9, "equator scale {far}");
}
