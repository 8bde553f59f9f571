//! Async Tile Selection
//!
//! Runs [`TileTree::select_tiles`] on rayon's pool so the render thread
//! only captures inputs and applies finished results.
//!
//! # Flow
//!
//! ```text
//! Main Thread                       Async (rayon)
//! ┌─────────────────┐
//! │ Capture inputs  │
//! │ (tree, view)    │
//! └───────┬─────────┘
//!         │ start()
//!         ▼
//!                                  ┌───────────────┐
//!                                  │ select()      │
//!                                  │ (traverse,    │
//!                                  │  gradation,   │
//!                                  │  diff)        │
//!                                  └───────┬───────┘
//!                                          │
//! ┌─────────────────┐                      │
//! │ poll_results()  │◄─────────────────────┘
//! │ - Swap in tree  │
//! │ - Apply groups  │
//! └─────────────────┘
//! ```
//!
//! # Last Write Wins
//!
//! Starting a new request while one is running cancels the old one: its
//! traversal stops at the next tile and its result is never delivered.
//!
//! # Usage
//!
//! ```ignore
//! let mut selector = AsyncTileSelector::new();
//!
//! // Each frame the camera moved:
//! selector.start(SelectionRequest {
//!     tree: tree.clone(),
//!     view: frustum,
//!     target_resolution,
//! });
//!
//! // Poll each frame
//! if let Some(result) = selector.poll_results() {
//!     if let Ok(selection) = result.outcome {
//!         tree = result.tree;
//!         renderer.apply(&selection.transitions);
//!     }
//! }
//! ```

use crossbeam_channel::{self as channel, Receiver, TryRecvError};

use super::selection::{self, CancelToken, Selection};
use super::{TileTree, ViewVolume};
use crate::error::Result;

/// Request to start an async selection.
pub struct SelectionRequest<V: ViewVolume> {
  /// Tree snapshot to select on; returned updated in the result.
  pub tree: TileTree,
  /// View volume for this frame.
  pub view: V,
  /// Target tile size in radians.
  pub target_resolution: f64,
}

/// A finished selection.
#[derive(Debug)]
pub struct SelectionResult {
  /// Value returned by the [`AsyncTileSelector::start`] call that produced
  /// this result.
  pub generation: u64,
  /// The tree after selection.
  pub tree: TileTree,
  pub outcome: Result<Selection>,
}

/// Non-blocking tile selector with at most one request in flight.
pub struct AsyncTileSelector {
  receiver: Option<Receiver<SelectionResult>>,
  cancel: Option<CancelToken>,
  generation: u64,
}

impl AsyncTileSelector {
  pub fn new() -> Self {
    Self {
      receiver: None,
      cancel: None,
      generation: 0,
    }
  }

  /// Check if a task is running.
  pub fn is_busy(&self) -> bool {
    self.receiver.is_some()
  }

  /// Generation of the most recent request.
  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Start selecting on the rayon pool, superseding any running request.
  ///
  /// Returns the request's generation.
  pub fn start<V: ViewVolume + Send + 'static>(&mut self, request: SelectionRequest<V>) -> u64 {
    #[cfg(feature = "tracing")]
    if self.is_busy() {
      tracing::debug!(generation = self.generation, "superseding running selection");
    }
    self.cancel();

    self.generation += 1;
    let generation = self.generation;
    let token = CancelToken::new();
    let (sender, receiver) = channel::bounded(1);
    self.receiver = Some(receiver);
    self.cancel = Some(token.clone());

    rayon::spawn(move || {
      let SelectionRequest {
        mut tree,
        view,
        target_resolution,
      } = request;
      let outcome = selection::select(&mut tree, &view, target_resolution, Some(&token));
      if token.is_cancelled() {
        return;
      }
      // Ignore send error (receiver dropped = superseded)
      let _ = sender.send(SelectionResult {
        generation,
        tree,
        outcome,
      });
    });

    generation
  }

  /// Poll for results (non-blocking).
  ///
  /// Returns `Some(result)` when complete, `None` if still running or idle.
  pub fn poll_results(&mut self) -> Option<SelectionResult> {
    let receiver = self.receiver.as_ref()?;

    match receiver.try_recv() {
      Ok(result) => {
        self.finish();
        Some(result)
      }
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => {
        self.finish();
        None
      }
    }
  }

  /// Block until the running request finishes.
  ///
  /// Returns `None` when idle or when the request was cancelled.
  pub fn wait(&mut self) -> Option<SelectionResult> {
    let result = self.receiver.as_ref()?.recv().ok();
    self.finish();
    result
  }

  /// Cancel the running request, if any. Its result is discarded.
  pub fn cancel(&mut self) {
    if let Some(token) = self.cancel.take() {
      token.cancel();
    }
    self.receiver = None;
  }

  fn finish(&mut self) {
    self.receiver = None;
    self.cancel = None;
  }
}

impl Default for AsyncTileSelector {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for AsyncTileSelector {
  fn drop(&mut self) {
    self.cancel();
  }
}
