//! Tile selection: one frame of LOD traversal over the tile tree.
//!
//! Picks the set of visible leaves whose angular size is at or below the
//! target resolution, and reports how the leaf set changed since the last
//! frame.
//!
//! # Algorithm Phases
//!
//! 1. **Traverse**: depth-first from the 12 base faces. A tile outside the
//!    view is culled; a visible tile larger than the target (scaled by
//!    [`ViewVolume::resolution_scale`]) or coarser than `min_order`
//!    subdivides while below `max_order`. Children of a
//!    tile fully inside the view skip the view test.
//! 2. **Gradation** (optional): subdivide leaves that are more than
//!    `max_order_delta` orders coarser than a neighbouring leaf.
//! 3. **Evict**: drop tiles this frame did not reach.
//! 4. **Diff**: emit subdivide/merge groups against the previous states,
//!    nearest to the view focus first.
//!
//! # Monotonic Fallback
//!
//! A tile that wants to subdivide but whose children are all culled stays
//! a visible leaf, so the leaf count never drops as the target shrinks.
//! When those children were all outside the view, the tile itself lies
//! outside it too; such tiles are listed in [`Selection::fallback_leaves`]
//! so renderers can skip fetching them.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;
use web_time::Instant;

use super::{Containment, NodeState, TileKey, TileTree, TransitionGroup, ViewVolume};
use crate::error::{Result, TilingError};
use crate::healpix::neighbours;

/// Shared flag that aborts a running selection.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Relaxed)
  }
}

/// A tile culled because the index engine rejected it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileDiagnostic {
  pub key: TileKey,
  pub error: TilingError,
}

/// Statistics from one selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionStats {
  /// Tiles classified this frame.
  pub nodes_evaluated: usize,
  /// Tiles found outside the view (or failing to resolve).
  pub nodes_culled: usize,
  /// Visible leaves selected.
  pub leaves: usize,
  /// Deepest order among the leaves.
  pub deepest_order: u8,
  /// Subdivide groups emitted.
  pub subdivisions: usize,
  /// Merge groups emitted.
  pub merges: usize,
  /// Leaves kept only by the monotonic fallback.
  pub fallback_leaves: usize,
  /// Subdivisions forced by neighbour gradation.
  /// Tracked separately since they ignore the target resolution.
  pub gradation_subdivisions: usize,
  /// Tiles dropped from the arena.
  pub evicted: usize,
  /// Wall time of the selection in microseconds.
  pub select_us: u64,
}

/// Output of one selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
  /// Visible leaves, sorted by key.
  pub leaves: Vec<TileKey>,
  /// Leaf set changes since the previous selection, nearest to the view
  /// focus first.
  pub transitions: Vec<TransitionGroup>,
  /// Tiles whose per-tile caches should be dropped, sorted by key: tiles
  /// from earlier frames removed from the arena, plus tiles visible last
  /// frame and culled now.
  pub evicted: Vec<TileKey>,
  /// Leaves whose children all fell outside the view. Part of `leaves`,
  /// but nothing of them is on screen. Sorted by key.
  pub fallback_leaves: Vec<TileKey>,
  /// Tiles culled because their key did not resolve.
  pub diagnostics: Vec<TileDiagnostic>,
  pub stats: SelectionStats,
}

/// Per-frame traversal state.
struct Frame<'a, V: ?Sized> {
  view: &'a V,
  target: f64,
  min_order: u8,
  max_order: u8,
  frame: u64,
  cancel: Option<&'a CancelToken>,
  visited: HashSet<TileKey>,
  fallback: HashSet<TileKey>,
  diagnostics: Vec<TileDiagnostic>,
  stats: SelectionStats,
}

impl<V: ?Sized> Frame<'_, V> {
  #[inline]
  fn check_cancelled(&self) -> Result<()> {
    match self.cancel {
      Some(token) if token.is_cancelled() => Err(TilingError::Cancelled),
      _ => Ok(()),
    }
  }
}

/// Run one selection on `tree`.
///
/// On `Err(TilingError::Cancelled)` the tree is left mid-update and should
/// be discarded.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "tiling::select", fields(target = target_resolution)))]
pub(crate) fn select<V: ViewVolume + ?Sized>(
  tree: &mut TileTree,
  view: &V,
  target_resolution: f64,
  cancel: Option<&CancelToken>,
) -> Result<Selection> {
  if !target_resolution.is_finite() || target_resolution <= 0.0 {
    return Err(TilingError::InvalidResolution {
      value: target_resolution,
    });
  }

  let start = Instant::now();
  let config = tree.config().clone();
  let previous = tree.states();
  let mut frame = Frame {
    view,
    target: target_resolution,
    min_order: config.min_order,
    max_order: config.max_order,
    frame: tree.advance_frame(),
    cancel,
    visited: HashSet::new(),
    fallback: HashSet::new(),
    diagnostics: Vec::new(),
    stats: SelectionStats::default(),
  };

  // Phase 1: Traverse
  {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("traverse").entered();
    for root in TileKey::roots() {
      evaluate(tree, &mut frame, root, false)?;
    }
  }

  // Phase 2: Gradation
  if config.gradation_enabled() {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("gradation").entered();
    frame.stats.gradation_subdivisions = enforce_gradation(
      tree,
      &mut frame,
      config.max_order_delta,
      config.max_gradation_iterations,
    )?;
  }

  // Phase 3: Evict
  let evicted = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("evict").entered();
    let mut evicted = tree.evict(|key| frame.visited.contains(key));
    // Tiles created and dropped within this frame were never reported.
    evicted.retain(|key| previous.contains_key(key));
    // Culled tiles stay in the arena but are gone from the screen.
    evicted.extend(frame.visited.iter().copied().filter(|key| {
      tree.state_of(key) == Some(NodeState::Culled)
        && previous.get(key).is_some_and(|state| state.is_visible())
    }));
    evicted.sort_unstable();
    evicted
  };

  // Phase 4: Diff
  let transitions = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("diff").entered();
    collect_transitions(tree, &frame, &previous)
  };

  let mut leaves: Vec<TileKey> = frame
    .visited
    .iter()
    .filter(|key| tree.state_of(key) == Some(NodeState::VisibleLeaf))
    .copied()
    .collect();
  leaves.sort_unstable();

  let mut fallback_leaves: Vec<TileKey> = frame
    .fallback
    .iter()
    .filter(|key| tree.state_of(key) == Some(NodeState::VisibleLeaf))
    .copied()
    .collect();
  fallback_leaves.sort_unstable();

  let mut stats = frame.stats;
  stats.leaves = leaves.len();
  stats.fallback_leaves = fallback_leaves.len();
  stats.deepest_order = leaves.iter().map(|key| key.order).max().unwrap_or(0);
  stats.subdivisions = transitions.iter().filter(|g| !g.is_merge()).count();
  stats.merges = transitions.len() - stats.subdivisions;
  stats.evicted = evicted.len();
  stats.select_us = start.elapsed().as_micros() as u64;

  #[cfg(feature = "tracing")]
  tracing::debug!(
    leaves = stats.leaves,
    culled = stats.nodes_culled,
    evicted = stats.evicted,
    fallback = stats.fallback_leaves,
    diagnostics = frame.diagnostics.len(),
    "selection complete"
  );

  let selection = Selection {
    leaves,
    transitions,
    evicted,
    fallback_leaves,
    diagnostics: frame.diagnostics,
    stats,
  };
  tree.metrics_mut().record_selection(&selection);
  Ok(selection)
}

/// Classify `key` and, when it is visible and too coarse, its subtree.
fn evaluate<V: ViewVolume + ?Sized>(
  tree: &mut TileTree,
  frame: &mut Frame<'_, V>,
  key: TileKey,
  parent_inside: bool,
) -> Result<NodeState> {
  frame.check_cancelled()?;
  frame.stats.nodes_evaluated += 1;

  let node = match tree.node_entry(key) {
    Ok(node) => node,
    Err(error) => {
      #[cfg(feature = "tracing")]
      tracing::warn!(%key, %error, "tile does not resolve, culling");
      frame.diagnostics.push(TileDiagnostic { key, error });
      frame.stats.nodes_culled += 1;
      return Ok(NodeState::Culled);
    }
  };
  frame.visited.insert(key);
  node.last_visited = frame.frame;

  let containment = if parent_inside {
    Containment::Inside
  } else {
    frame.view.classify(&node.bounds)
  };
  node.containment = Some(containment);

  if containment == Containment::Outside {
    node.state = NodeState::Culled;
    frame.stats.nodes_culled += 1;
    return Ok(NodeState::Culled);
  }

  let wants_split = key.order < frame.max_order
    && (key.order < frame.min_order
      || node.bounds.angular_size() > frame.target * frame.view.resolution_scale(&node.bounds));
  if wants_split && split(tree, frame, key, containment == Containment::Inside)? {
    return Ok(NodeState::Subdivided);
  }

  tree.set_state(&key, NodeState::VisibleLeaf);
  Ok(NodeState::VisibleLeaf)
}

/// Evaluate the children of `key`. Marks `key` subdivided and returns true
/// when any child is visible; otherwise the children leave this frame and
/// `key` stays as it was. If none of them failed to resolve, they were all
/// outside the view and `key` is recorded as a fallback leaf.
fn split<V: ViewVolume + ?Sized>(
  tree: &mut TileTree,
  frame: &mut Frame<'_, V>,
  key: TileKey,
  inside: bool,
) -> Result<bool> {
  let children = key.children();
  let diagnostics_before = frame.diagnostics.len();
  let mut any_visible = false;
  for child in children {
    any_visible |= evaluate(tree, frame, child, inside)?.is_visible();
  }

  if any_visible {
    tree.set_state(&key, NodeState::Subdivided);
  } else {
    for child in &children {
      frame.visited.remove(child);
    }
    if frame.diagnostics.len() == diagnostics_before {
      frame.fallback.insert(key);
    }
  }
  Ok(any_visible)
}

/// First tile on the path from `key` up to its base face that this frame
/// visited, if it is a visible leaf.
fn covering_leaf<V: ?Sized>(tree: &TileTree, frame: &Frame<'_, V>, key: TileKey) -> Option<TileKey> {
  (0..=key.order)
    .rev()
    .filter_map(|order| key.ancestor(order))
    .find(|ancestor| frame.visited.contains(ancestor))
    .filter(|ancestor| tree.state_of(ancestor) == Some(NodeState::VisibleLeaf))
}

/// Subdivide leaves more than `max_delta` orders coarser than a neighbour.
///
/// Returns the number of gradation subdivisions performed.
fn enforce_gradation<V: ViewVolume + ?Sized>(
  tree: &mut TileTree,
  frame: &mut Frame<'_, V>,
  max_delta: u8,
  max_iterations: usize,
) -> Result<usize> {
  let mut performed = 0;
  let mut attempted: HashSet<TileKey> = HashSet::new();

  for _iteration in 0..max_iterations {
    let mut leaves: Vec<TileKey> = frame
      .visited
      .iter()
      .filter(|key| tree.state_of(key) == Some(NodeState::VisibleLeaf))
      .copied()
      .collect();
    leaves.sort_unstable();

    let mut too_coarse: BTreeSet<TileKey> = BTreeSet::new();
    for leaf in &leaves {
      for pixel in neighbours(leaf.pixel, leaf.order)?.pixels() {
        let Some(coarse) = covering_leaf(tree, frame, TileKey::new(leaf.order, pixel)) else {
          continue;
        };
        if leaf.order - coarse.order > max_delta
          && coarse.order < frame.max_order
          && !attempted.contains(&coarse)
        {
          too_coarse.insert(coarse);
        }
      }
    }

    // Converged
    if too_coarse.is_empty() {
      break;
    }

    for key in too_coarse {
      attempted.insert(key);
      let inside = tree.node(&key).and_then(|node| node.containment) == Some(Containment::Inside);
      if split(tree, frame, key, inside)? {
        performed += 1;
      }
    }
  }

  Ok(performed)
}

/// Subdivide and merge groups between `previous` states and the tree now.
///
/// Only leaves that were already visible produce groups; tiles entering or
/// leaving the view appear in the leaf set and eviction list alone.
fn collect_transitions<V: ViewVolume + ?Sized>(
  tree: &TileTree,
  frame: &Frame<'_, V>,
  previous: &HashMap<TileKey, NodeState>,
) -> Vec<TransitionGroup> {
  let was_visible = |key: &TileKey| previous.get(key).is_some_and(|state| state.is_visible());

  let mut keys: Vec<TileKey> = frame.visited.iter().copied().collect();
  keys.sort_unstable();

  let mut groups = Vec::new();
  for key in keys {
    let before = previous.get(&key).copied();
    let now = tree.state_of(&key);
    let group = match (before, now) {
      (Some(NodeState::VisibleLeaf), Some(NodeState::Subdivided)) => {
        let children: SmallVec<[TileKey; 4]> = key
          .children()
          .into_iter()
          .filter(|child| tree.state_of(child).is_some_and(NodeState::is_visible))
          .collect();
        TransitionGroup::new_subdivide(key, children)
      }
      (Some(NodeState::Subdivided), Some(NodeState::VisibleLeaf)) => {
        let children: SmallVec<[TileKey; 4]> = key
          .children()
          .into_iter()
          .filter(|child| was_visible(child))
          .collect();
        TransitionGroup::new_merge(key, children)
      }
      _ => None,
    };
    groups.extend(group);
  }

  if let Some(focus) = frame.view.focus() {
    let distance = |key: &TileKey| {
      tree
        .node(key)
        .map_or(f64::INFINITY, |node| node.bounds.distance_to(focus))
    };
    groups.sort_by(|a, b| {
      distance(&a.group_key)
        .total_cmp(&distance(&b.group_key))
        .then(a.group_key.cmp(&b.group_key))
    });
  }
  groups
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;
