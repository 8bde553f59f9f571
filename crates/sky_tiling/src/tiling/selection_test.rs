use std::collections::HashSet;
use std::f64::consts::PI;

use glam::DVec3;

use super::*;
use crate::constants::MAX_ORDER;
use crate::tiling::{ConeView, FullSky, TileBounds, TileTreeConfig, TransitionType};

/// Visible down to order 0 only: every child tile is culled.
struct RootsOnly;

impl ViewVolume for RootsOnly {
  fn classify(&self, bounds: &TileBounds) -> Containment {
    // Order-0 faces are the only tiles wider than a radian.
    if bounds.angular_size() > 1.0 {
      Containment::Intersecting
    } else {
      Containment::Outside
    }
  }
}

/// Whole sky visible, with fine detail requested only near `axis`.
struct Hotspot {
  axis: DVec3,
  radius: f64,
}

impl ViewVolume for Hotspot {
  fn classify(&self, _bounds: &TileBounds) -> Containment {
    Containment::Inside
  }

  fn focus(&self) -> Option<DVec3> {
    Some(self.axis)
  }

  fn resolution_scale(&self, bounds: &TileBounds) -> f64 {
    if bounds.distance_to(self.axis) - bounds.cap_radius < self.radius {
      1.0
    } else {
      64.0
    }
  }
}

/// Leaves partition the sphere: total area in units of the deepest order
/// equals the pixel count, and no leaf contains another.
fn assert_partition(leaves: &[TileKey]) {
  let deepest = leaves.iter().map(|k| k.order).max().unwrap_or(0);
  let covered: u64 = leaves
    .iter()
    .map(|k| 1u64 << (2 * (deepest - k.order) as u32))
    .sum();
  assert_eq!(covered, crate::constants::npix(deepest), "leaves must tile the sphere");

  let set: HashSet<TileKey> = leaves.iter().copied().collect();
  for leaf in leaves {
    let mut ancestor = leaf.parent();
    while let Some(key) = ancestor {
      assert!(!set.contains(&key), "{key} and its descendant {leaf} are both leaves");
      ancestor = key.parent();
    }
  }
}

/// Largest order gap between a leaf and a coarser adjacent leaf.
fn max_adjacent_delta(leaves: &[TileKey]) -> u8 {
  let set: HashSet<TileKey> = leaves.iter().copied().collect();
  let mut worst = 0;
  for leaf in leaves {
    for pixel in neighbours(leaf.pixel, leaf.order).unwrap().pixels() {
      let probe = TileKey::new(leaf.order, pixel);
      let coarse = (0..=leaf.order)
        .rev()
        .filter_map(|order| probe.ancestor(order))
        .find(|key| set.contains(key));
      if let Some(coarse) = coarse {
        worst = worst.max(leaf.order - coarse.order);
      }
    }
  }
  worst
}

// =========================================================================
// Traversal
// =========================================================================

/// A target wider than any base face selects exactly the 12 faces.
#[test]
fn test_coarse_target_selects_base_faces() {
  let mut tree = TileTree::default();
  let selection = tree.select_tiles(&FullSky, 2.0).unwrap();

  assert_eq!(selection.leaves, TileKey::roots().collect::<Vec<_>>());
  assert!(selection.transitions.is_empty(), "first frame has nothing to diff");
  assert!(selection.evicted.is_empty());
  assert!(selection.diagnostics.is_empty());
  assert_eq!(selection.stats.leaves, 12);
  assert_eq!(selection.stats.nodes_evaluated, 12);
  assert_eq!(tree.len(), 12);
  assert_eq!(tree.frame(), 1);
}

#[test]
fn test_leaves_meet_target() {
  let mut tree = TileTree::default();
  let target = 0.3;
  let selection = tree.select_tiles(&FullSky, target).unwrap();

  assert_partition(&selection.leaves);
  for key in &selection.leaves {
    let node = tree.node(key).unwrap();
    assert!(node.bounds.angular_size() <= target, "{key} too large");
    let parent = key.parent().and_then(|p| tree.node(&p)).unwrap();
    assert!(parent.bounds.angular_size() > target, "{key} split needlessly");
    assert_eq!(parent.state, NodeState::Subdivided);
  }
}

/// Shrinking the target never reduces the number of leaves.
#[test]
fn test_leaf_count_is_monotonic_in_target() {
  let cone = ConeView::new(DVec3::new(1.0, 2.0, 0.5), 0.4).unwrap();
  let mut tree = TileTree::default();
  let mut last = 0;
  for target in [2.0, 1.0, 0.5, 0.2, 0.1, 0.05, 0.02] {
    let count = tree.select_tiles(&cone, target).unwrap().leaves.len();
    assert!(count >= last, "target {target}: {count} leaves after {last}");
    last = count;
  }
}

/// Same tree, view and target: same output.
#[test]
fn test_selection_is_deterministic() {
  let cone = ConeView::new(DVec3::new(-0.2, 0.1, -1.0), 0.3).unwrap();
  let mut a = TileTree::default();
  let mut b = TileTree::default();
  let first = a.select_tiles(&cone, 0.01).unwrap();
  let second = b.select_tiles(&cone, 0.01).unwrap();
  assert_eq!(first.leaves, second.leaves);
  assert_eq!(first.transitions, second.transitions);
  assert_eq!(first.evicted, second.evicted);

  // Re-running on a settled tree changes nothing.
  let again = a.select_tiles(&cone, 0.01).unwrap();
  assert_eq!(again.leaves, first.leaves);
  assert!(again.transitions.is_empty());
  assert!(again.evicted.is_empty());
}

#[test]
fn test_cone_leaves_stay_near_axis() {
  let axis = DVec3::new(0.0, -1.0, 0.3).normalize();
  let cone = ConeView::new(axis, 0.25).unwrap();
  let mut tree = TileTree::default();
  let selection = tree.select_tiles(&cone, 0.02).unwrap();

  assert!(!selection.leaves.is_empty());
  assert_eq!(selection.stats.fallback_leaves, selection.fallback_leaves.len());
  for key in &selection.leaves {
    if selection.fallback_leaves.contains(key) {
      continue;
    }
    let bounds = tree.node(key).unwrap().bounds;
    assert!(bounds.distance_to(axis) - bounds.cap_radius <= 0.25, "{key} is outside the cone");
  }
  let axis_leaf = tree.leaf_containing(axis).unwrap().expect("axis must be covered");
  assert!(selection.leaves.contains(&axis_leaf.key));
  assert!(!selection.fallback_leaves.contains(&axis_leaf.key));
  assert_eq!(tree.leaf_containing(-axis).unwrap(), None);
}

#[test]
fn test_min_and_max_order() {
  let config = TileTreeConfig {
    min_order: 2,
    ..TileTreeConfig::DEFAULT
  };
  let mut tree = TileTree::new(config);
  let selection = tree.select_tiles(&FullSky, 10.0).unwrap();
  assert_eq!(selection.leaves.len(), 192);
  assert!(selection.leaves.iter().all(|k| k.order == 2));

  let config = TileTreeConfig {
    max_order: 6,
    ..TileTreeConfig::DEFAULT
  };
  let mut tree = TileTree::new(config);
  let cone = ConeView::new(DVec3::X, 0.05).unwrap();
  let selection = tree.select_tiles(&cone, 1e-9).unwrap();
  assert!(selection.leaves.iter().all(|k| k.order <= 6));
  assert_eq!(selection.stats.deepest_order, 6);
  assert_eq!(tree.leaf_containing(DVec3::X).unwrap().map(|n| n.key.order), Some(6));
}

/// A tile whose children are all culled stays visible instead of leaving a
/// hole.
#[test]
fn test_monotonic_fallback_keeps_parent() {
  let mut tree = TileTree::default();
  let selection = tree.select_tiles(&RootsOnly, 0.01).unwrap();

  assert_eq!(selection.fallback_leaves, selection.leaves);
  assert_eq!(selection.stats.fallback_leaves, 12);
  assert!(selection.evicted.is_empty(), "children never left this frame");

  assert_eq!(selection.leaves.len(), 12);
  assert!(selection.leaves.iter().all(|k| k.order == 0));
  assert_eq!(selection.stats.nodes_culled, 48);
  assert_eq!(tree.len(), 12, "culled children are not kept");
}

#[test]
fn test_invalid_target_rejected() {
  let mut tree = TileTree::default();
  for target in [0.0, -1.0, f64::NAN, f64::INFINITY] {
    assert!(matches!(
      tree.select_tiles(&FullSky, target),
      Err(TilingError::InvalidResolution { .. })
    ));
  }
  assert_eq!(tree.frame(), 0, "rejected calls do not advance the tree");
}

/// Orders past the deepest index become diagnostics, never a panic.
#[test]
fn test_unresolvable_tiles_become_diagnostics() {
  let config = TileTreeConfig {
    min_order: 40,
    max_order: 40,
    ..TileTreeConfig::DEFAULT
  };
  let mut tree = TileTree::new(config);
  let axis = DVec3::new(0.4, 0.4, 0.8).normalize();
  let cone = ConeView::new(axis, 1e-7).unwrap();
  let selection = tree.select_tiles(&cone, 1.0).unwrap();

  assert!(!selection.diagnostics.is_empty());
  for diagnostic in &selection.diagnostics {
    assert_eq!(diagnostic.key.order, MAX_ORDER + 1);
    assert_eq!(
      diagnostic.error,
      TilingError::InvalidOrder { order: MAX_ORDER + 1 }
    );
  }
  assert_eq!(selection.stats.deepest_order, MAX_ORDER);
  let axis_leaf = tree.leaf_containing(axis).unwrap().map(|n| n.key);
  assert_eq!(axis_leaf.map(|k| k.order), Some(MAX_ORDER));
  // Unresolvable children are not evidence the tile is off screen.
  assert!(!axis_leaf.is_some_and(|k| selection.fallback_leaves.contains(&k)));
}

// =========================================================================
// Transitions and eviction
// =========================================================================

#[test]
fn test_subdivide_then_merge() {
  let mut tree = TileTree::default();
  tree.select_tiles(&FullSky, 2.0).unwrap();

  // Every base face is wider than 1.2 rad, none of their children are.
  let finer = tree.select_tiles(&FullSky, 1.2).unwrap();
  assert_eq!(finer.leaves.len(), 48);
  assert_eq!(finer.transitions.len(), 12);
  for group in &finer.transitions {
    assert_eq!(group.transition_type, TransitionType::Subdivide);
    assert_eq!(group.nodes_to_add.as_slice(), &group.group_key.children());
  }
  assert_eq!(finer.stats.subdivisions, 12);

  let coarser = tree.select_tiles(&FullSky, 2.0).unwrap();
  assert_eq!(coarser.leaves.len(), 12);
  assert_eq!(coarser.stats.merges, 12);
  assert!(coarser.transitions.iter().all(TransitionGroup::is_merge));
  assert_eq!(coarser.evicted.len(), 48);
  assert_eq!(tree.len(), 12);
}

/// Panning across the sky: every leaf that drops out of the leaf set is
/// either evicted or split by a subdivide group, including base faces that
/// stay in the arena as culled.
#[test]
fn test_panning_reports_every_departed_leaf() {
  let east = ConeView::new(DVec3::new(1.0, 0.0, 0.1), 0.2).unwrap();
  let west = ConeView::new(DVec3::new(-1.0, 0.0, 0.1), 0.2).unwrap();
  let mut tree = TileTree::default();
  let before = tree.select_tiles(&east, 0.05).unwrap();
  let after = tree.select_tiles(&west, 0.05).unwrap();

  let still: HashSet<TileKey> = after.leaves.iter().copied().collect();
  let evicted: HashSet<TileKey> = after.evicted.iter().copied().collect();
  let split: HashSet<TileKey> = after
    .transitions
    .iter()
    .filter(|g| !g.is_merge())
    .map(|g| g.group_key)
    .collect();

  let departed: Vec<TileKey> = before
    .leaves
    .iter()
    .copied()
    .filter(|key| !still.contains(key))
    .collect();
  assert!(!departed.is_empty());
  for key in &departed {
    assert!(
      evicted.contains(key) || split.contains(key),
      "{key} left the leaf set unreported"
    );
  }

  for key in &after.evicted {
    assert!(!still.contains(key), "{key} is both a leaf and evicted");
    assert!(
      tree.node(key).map_or(true, |node| node.state == NodeState::Culled),
      "{key} evicted but still live"
    );
  }
  assert_eq!(after.stats.evicted, after.evicted.len());

  // Panning back reports the west side the same way.
  let back = tree.select_tiles(&east, 0.05).unwrap();
  let back_evicted: HashSet<TileKey> = back.evicted.iter().copied().collect();
  for key in after.leaves.iter().filter(|key| !back.leaves.contains(key)) {
    assert!(back_evicted.contains(key), "{key} left the leaf set unreported");
  }
}

/// Transitions come nearest to the view focus first.
#[test]
fn test_transitions_sorted_by_focus() {
  let axis = DVec3::new(0.2, 0.9, -0.3).normalize();
  let view = Hotspot { axis, radius: PI };
  let mut tree = TileTree::default();
  tree.select_tiles(&view, 2.0).unwrap();
  let selection = tree.select_tiles(&view, 1.2).unwrap();

  let distances: Vec<f64> = selection
    .transitions
    .iter()
    .map(|g| tree.node(&g.group_key).unwrap().bounds.distance_to(axis))
    .collect();
  assert_eq!(distances.len(), 12);
  assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{distances:?}");
}

// =========================================================================
// Gradation
// =========================================================================

#[test]
fn test_gradation_limits_neighbour_order_gap() {
  let view = Hotspot {
    axis: DVec3::new(1.0, 1.0, 0.2).normalize(),
    radius: 0.2,
  };

  let mut plain = TileTree::default();
  let ungraded = plain.select_tiles(&view, 0.04).unwrap();
  assert!(max_adjacent_delta(&ungraded.leaves) > 1, "hotspot should create a steep LOD step");
  assert_eq!(ungraded.stats.gradation_subdivisions, 0);

  let config = TileTreeConfig {
    max_gradation_iterations: 32,
    ..TileTreeConfig::GRADED
  };
  let mut graded = TileTree::new(config);
  let selection = graded.select_tiles(&view, 0.04).unwrap();
  assert_partition(&selection.leaves);
  assert!(selection.stats.gradation_subdivisions > 0);
  assert!(max_adjacent_delta(&selection.leaves) <= 1);
  assert!(selection.leaves.len() > ungraded.leaves.len());
}

// =========================================================================
// Cancellation
// =========================================================================

#[test]
fn test_cancelled_selection_stops() {
  let token = CancelToken::new();
  token.cancel();
  let mut tree = TileTree::default();
  let result = select(&mut tree, &FullSky, 0.1, Some(&token));
  assert_eq!(result, Err(TilingError::Cancelled));
  assert!(token.is_cancelled());
}
