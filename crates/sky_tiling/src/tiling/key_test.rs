use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::*;

// =========================================================================
// TileKey hierarchy
// =========================================================================

/// Equal keys must produce equal hashes (HashMap invariant).
#[test]
fn test_key_hash_consistency() {
  let hash = |key: TileKey| {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
  };
  assert_eq!(hash(TileKey::new(4, 99)), hash(TileKey::new(4, 99)));
  assert_ne!(TileKey::new(4, 99), TileKey::new(5, 99));
}

/// Children's parent is always the original key.
#[test]
fn test_children_parent_roundtrip() {
  let key = TileKey::new(3, 500);
  for child in key.children() {
    assert_eq!(child.order, 4);
    assert_eq!(child.parent(), Some(key));
    assert!(key.contains(&child));
  }
  assert_eq!(TileKey::base(7).parent(), None);
}

#[test]
fn test_ancestor_and_face() {
  let key = TileKey::new(5, 11 * 1024 + 37);
  assert_eq!(key.face(), 11);
  assert_eq!(key.ancestor(0), Some(TileKey::base(11)));
  assert_eq!(key.ancestor(5), Some(key));
  assert_eq!(key.ancestor(6), None);
  assert!(TileKey::base(11).contains(&key));
  assert!(!TileKey::base(10).contains(&key));
}

#[test]
fn test_roots_and_validity() {
  let roots: Vec<TileKey> = TileKey::roots().collect();
  assert_eq!(roots.len(), 12);
  assert!(roots.iter().all(TileKey::is_valid));
  assert!(!TileKey::new(0, 12).is_valid());
  assert!(!TileKey::new(30, 0).is_valid());
}

/// Sorting puts coarse tiles first, then by pixel.
#[test]
fn test_key_ordering() {
  let mut keys = vec![TileKey::new(2, 0), TileKey::new(1, 40), TileKey::new(1, 3)];
  keys.sort();
  assert_eq!(
    keys,
    vec![TileKey::new(1, 3), TileKey::new(1, 40), TileKey::new(2, 0)]
  );
  assert_eq!(TileKey::new(7, 12).to_string(), "N7/12");
}
