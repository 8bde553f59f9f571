//! Selection statistics for debug overlays.
//!
//! Feature-gated and runtime-toggled so recording costs nothing when
//! disabled.
//!
//! # Usage
//!
//! ```ignore
//! use sky_tiling::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! tree.select_tiles(&view, target)?;
//! let avg = tree.metrics().avg_select_timing_us();
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::constants::MAX_ORDER;
use crate::tiling::Selection;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  /// Create a new rolling window with the given capacity.
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Iterate over values (oldest to newest).
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  /// Get the most recent value.
  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
  pub fn sum(&self) -> T {
    self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
  }
}

impl RollingWindow<u64> {
  /// Mean of the window, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = *self.buffer.iter().min()?;
    let max = *self.buffer.iter().max()?;
    Some((min, max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds at 60fps
  }
}

/// Tree-level statistics updated by each selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionMetrics {
  /// Leaf count at each order in the last selection (index = order).
  pub leaves_per_order: [u32; MAX_ORDER as usize + 1],
  /// Rolling window of selection times in microseconds.
  pub select_timings: RollingWindow<u64>,

  // Last frame snapshot
  pub last_select_us: u64,
  pub last_leaf_count: usize,
  pub last_transition_count: usize,

  // Cumulative
  pub total_selections: u64,
  pub total_evictions: u64,
  pub total_diagnostics: u64,
}

impl SelectionMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset everything except the cumulative totals.
  pub fn reset(&mut self) {
    self.leaves_per_order.fill(0);
    self.select_timings.clear();
    self.last_select_us = 0;
    self.last_leaf_count = 0;
    self.last_transition_count = 0;
  }

  /// Record the outcome of one selection.
  pub fn record_selection(&mut self, selection: &Selection) {
    if !is_enabled() {
      return;
    }

    self.leaves_per_order.fill(0);
    for key in &selection.leaves {
      let order = (key.order as usize).min(MAX_ORDER as usize);
      self.leaves_per_order[order] += 1;
    }

    let stats = &selection.stats;
    self.select_timings.push(stats.select_us);
    self.last_select_us = stats.select_us;
    self.last_leaf_count = selection.leaves.len();
    self.last_transition_count = selection.transitions.len();

    self.total_selections += 1;
    self.total_evictions += selection.evicted.len() as u64;
    self.total_diagnostics += selection.diagnostics.len() as u64;
  }

  /// Total leaf count across all orders.
  pub fn total_leaves(&self) -> u32 {
    self.leaves_per_order.iter().sum()
  }

  /// Deepest order holding a leaf, if any.
  pub fn deepest_order(&self) -> Option<u8> {
    self
      .leaves_per_order
      .iter()
      .rposition(|&count| count > 0)
      .map(|order| order as u8)
  }

  /// Average selection time in microseconds.
  pub fn avg_select_timing_us(&self) -> f64 {
    self.select_timings.average()
  }
}
