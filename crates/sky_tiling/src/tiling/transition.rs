//! TransitionGroup - atomic tile tree state changes.
//!
//! A transition group represents either a subdivide (1 parent → 4 children)
//! or merge (4 children → 1 parent) of the visible leaf set, so a renderer
//! can swap the tiles in one step and fade between them.

use smallvec::SmallVec;

use super::TileKey;

/// Type of tile transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionType {
  /// 1 parent → 4 children (finer detail)
  Subdivide,
  /// 4 children → 1 parent (coarser detail)
  Merge,
}

/// Atomic leaf set change. Group key is always the parent tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionGroup {
  pub transition_type: TransitionType,

  /// The parent tile (for both subdivide and merge).
  pub group_key: TileKey,

  /// Tiles entering the subtree under `group_key`.
  /// - Subdivide: the children now in view
  /// - Merge: the parent
  pub nodes_to_add: SmallVec<[TileKey; 4]>,

  /// Tiles leaving it.
  /// - Subdivide: the parent
  /// - Merge: the children
  pub nodes_to_remove: SmallVec<[TileKey; 4]>,
}

impl TransitionGroup {
  /// Parent → the given children. `None` if `children` is empty.
  pub fn new_subdivide(parent: TileKey, children: SmallVec<[TileKey; 4]>) -> Option<Self> {
    if children.is_empty() {
      return None;
    }

    let mut nodes_to_remove = SmallVec::new();
    nodes_to_remove.push(parent);

    Some(Self {
      transition_type: TransitionType::Subdivide,
      group_key: parent,
      nodes_to_add: children,
      nodes_to_remove,
    })
  }

  /// The given children → parent. `None` if `children` is empty.
  pub fn new_merge(parent: TileKey, children: SmallVec<[TileKey; 4]>) -> Option<Self> {
    if children.is_empty() {
      return None;
    }

    let mut nodes_to_add = SmallVec::new();
    nodes_to_add.push(parent);

    Some(Self {
      transition_type: TransitionType::Merge,
      group_key: parent,
      nodes_to_add,
      nodes_to_remove: children,
    })
  }

  #[inline]
  pub fn is_merge(&self) -> bool {
    self.transition_type == TransitionType::Merge
  }
}

#[cfg(test)]
#[path = "transition_test.rs"]
mod transition_test;
