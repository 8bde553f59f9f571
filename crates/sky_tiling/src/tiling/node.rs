//! TileNode - one arena entry of the tile tree.

use super::{Containment, TileBounds, TileKey};

/// Selection state of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
  /// Created but not yet classified in any selection.
  Unevaluated,
  /// Outside the view volume.
  Culled,
  /// Visible and drawn at this order.
  VisibleLeaf,
  /// Visible through its children, which are drawn instead.
  Subdivided,
}

impl NodeState {
  #[inline]
  pub fn is_visible(self) -> bool {
    matches!(self, NodeState::VisibleLeaf | NodeState::Subdivided)
  }
}

/// A tile known to the tree, with its cached bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct TileNode {
  pub key: TileKey,
  pub bounds: TileBounds,
  pub state: NodeState,
  /// Classification from the last selection that visited this tile.
  pub containment: Option<Containment>,
  /// Selection frame that last visited this tile.
  pub last_visited: u64,
}

impl TileNode {
  pub fn new(key: TileKey, bounds: TileBounds) -> Self {
    Self {
      key,
      bounds,
      state: NodeState::Unevaluated,
      containment: None,
      last_visited: 0,
    }
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.state == NodeState::VisibleLeaf
  }
}
