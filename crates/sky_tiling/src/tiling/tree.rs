//! TileTree - arena of tiles persisted across selections.
//!
//! The tree owns every tile any recent selection touched, keyed by
//! [`TileKey`]. Parent/child links are implicit in the keys. A selection
//! rewrites node states in place and evicts tiles it did not reach, so the
//! arena never grows past what one frame visits.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glam::DVec3;

use super::selection::{self, Selection};
use super::{NodeState, TileBounds, TileKey, TileNode, TileTreeConfig, ViewVolume};
use crate::constants::MAX_ORDER;
use crate::error::Result;
use crate::healpix::ang2pix;
use crate::metrics::SelectionMetrics;

/// Persistent tile hierarchy over the 12 base faces.
#[derive(Clone, Debug)]
pub struct TileTree {
  config: TileTreeConfig,
  nodes: HashMap<TileKey, TileNode>,
  frame: u64,
  metrics: SelectionMetrics,
}

impl TileTree {
  /// Tree holding the 12 base faces, all [`NodeState::Unevaluated`].
  pub fn new(config: TileTreeConfig) -> Self {
    #[cfg(feature = "tracing")]
    if config.max_order > MAX_ORDER {
      tracing::warn!(
        max_order = config.max_order,
        "max_order beyond {MAX_ORDER}; deeper tiles will be culled with diagnostics"
      );
    }

    let nodes = TileKey::roots()
      .filter_map(|key| {
        TileBounds::for_key(key)
          .ok()
          .map(|bounds| (key, TileNode::new(key, bounds)))
      })
      .collect();

    Self {
      config,
      nodes,
      frame: 0,
      metrics: SelectionMetrics::default(),
    }
  }

  pub fn config(&self) -> &TileTreeConfig {
    &self.config
  }

  /// Replace the configuration; takes effect at the next selection.
  pub fn set_config(&mut self, config: TileTreeConfig) {
    self.config = config;
  }

  /// Number of tiles in the arena.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn node(&self, key: &TileKey) -> Option<&TileNode> {
    self.nodes.get(key)
  }

  /// All tiles, in no particular order.
  pub fn iter(&self) -> impl Iterator<Item = &TileNode> {
    self.nodes.values()
  }

  /// Visible leaves of the last selection, in no particular order.
  pub fn leaves(&self) -> impl Iterator<Item = &TileNode> {
    self.nodes.values().filter(|node| node.is_leaf())
  }

  /// Number of selections run on this tree.
  pub fn frame(&self) -> u64 {
    self.frame
  }

  pub fn metrics(&self) -> &SelectionMetrics {
    &self.metrics
  }

  /// Select the visible tiles for `view` at `target_resolution` radians
  /// per tile.
  ///
  /// Deterministic: identical trees, views and targets yield identical
  /// selections.
  pub fn select_tiles<V: ViewVolume + ?Sized>(
    &mut self,
    view: &V,
    target_resolution: f64,
  ) -> Result<Selection> {
    selection::select(self, view, target_resolution, None)
  }

  /// Visible leaf covering `direction`, if any.
  pub fn leaf_containing(&self, direction: DVec3) -> Result<Option<&TileNode>> {
    let deepest = ang2pix(direction, MAX_ORDER)?;
    for order in 0..=MAX_ORDER {
      let pixel = deepest >> (2 * (MAX_ORDER - order) as u32);
      match self.nodes.get(&TileKey::new(order, pixel)) {
        Some(node) if node.state == NodeState::VisibleLeaf => return Ok(Some(node)),
        Some(node) if node.state == NodeState::Subdivided => continue,
        _ => return Ok(None),
      }
    }
    Ok(None)
  }

  // ---------------------------------------------------------------------------
  // Selection internals
  // ---------------------------------------------------------------------------

  /// Existing node for `key`, or a new one when its bounds resolve.
  pub(crate) fn node_entry(&mut self, key: TileKey) -> Result<&mut TileNode> {
    match self.nodes.entry(key) {
      Entry::Occupied(entry) => Ok(entry.into_mut()),
      Entry::Vacant(entry) => {
        let bounds = TileBounds::for_key(key)?;
        Ok(entry.insert(TileNode::new(key, bounds)))
      }
    }
  }

  pub(crate) fn state_of(&self, key: &TileKey) -> Option<NodeState> {
    self.nodes.get(key).map(|node| node.state)
  }

  pub(crate) fn set_state(&mut self, key: &TileKey, state: NodeState) {
    if let Some(node) = self.nodes.get_mut(key) {
      node.state = state;
    }
  }

  /// Snapshot of every node's state, for transition diffing.
  pub(crate) fn states(&self) -> HashMap<TileKey, NodeState> {
    self
      .nodes
      .iter()
      .map(|(key, node)| (*key, node.state))
      .collect()
  }

  /// Drop every node `keep` rejects; returns the dropped keys, sorted.
  pub(crate) fn evict(&mut self, mut keep: impl FnMut(&TileKey) -> bool) -> Vec<TileKey> {
    let mut evicted: Vec<TileKey> = self.nodes.keys().filter(|key| !keep(key)).copied().collect();
    evicted.sort_unstable();
    for key in &evicted {
      self.nodes.remove(key);
    }
    evicted
  }

  pub(crate) fn advance_frame(&mut self) -> u64 {
    self.frame += 1;
    self.frame
  }

  pub(crate) fn metrics_mut(&mut self) -> &mut SelectionMetrics {
    &mut self.metrics
  }
}

impl Default for TileTree {
  fn default() -> Self {
    Self::new(TileTreeConfig::DEFAULT)
  }
}
