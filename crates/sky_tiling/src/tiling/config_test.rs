use super::*;

// =========================================================================
// TileTreeConfig
// =========================================================================

#[test]
fn test_default_config() {
  let config = TileTreeConfig::default();
  assert_eq!(config, TileTreeConfig::DEFAULT);
  assert_eq!(config.min_order, 0);
  assert_eq!(config.max_order, MAX_ORDER);
  assert!(!config.gradation_enabled(), "gradation is opt-in");
  assert!(TileTreeConfig::GRADED.gradation_enabled());
}

// =========================================================================
// Target resolution
// =========================================================================

#[test]
fn test_sky_target_resolution() {
  let fov = 60f64.to_radians();
  let target = sky_target_resolution(fov, 1080, 512).unwrap();
  assert!((target - fov * 512.0 / 1080.0).abs() < 1e-15);

  let sharper = sky_target_resolution(fov, 2160, 512).unwrap();
  assert!(sharper < target, "more screen pixels need smaller tiles");
}

#[test]
fn test_globe_target_shrinks_when_approaching() {
  let fov = 45f64.to_radians();
  let far = globe_target_resolution(fov, 1000, 256, 10.0, 1.0).unwrap();
  let near = globe_target_resolution(fov, 1000, 256, 1.1, 1.0).unwrap();
  assert!(near < far);
  assert!((far / near - 90.0).abs() < 1e-9);
}

#[test]
fn test_target_resolution_rejects_bad_input() {
  assert!(matches!(
    sky_target_resolution(0.0, 100, 100),
    Err(TilingError::InvalidResolution { .. })
  ));
  assert!(sky_target_resolution(f64::NAN, 100, 100).is_err());
  assert!(sky_target_resolution(1.0, 0, 100).is_err());
  assert!(sky_target_resolution(1.0, 100, 0).is_err());
  assert!(globe_target_resolution(1.0, 100, 100, 0.5, 1.0).is_err(), "camera inside globe");
  assert!(globe_target_resolution(1.0, 100, 100, 2.0, -1.0).is_err());
}
