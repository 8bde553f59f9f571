//! Level-of-detail tile selection over the HEALPix hierarchy.
//!
//! The sky (or a globe) is covered by the 12 base tiles; every tile splits
//! into its four nested children. Each frame, [`TileTree::select_tiles`]
//! picks the set of visible leaves whose angular size meets the target
//! resolution and reports what changed since the previous frame as
//! [`TransitionGroup`]s.
//!
//! # Module Structure
//!
//! - [`key`]: `TileKey` - (order, nested pixel) address of a tile
//! - [`bounds`]: `TileBounds` - cached corners and bounding cap
//! - [`view`]: `ViewVolume` and its cone / frustum implementations
//! - [`config`]: `TileTreeConfig` - order limits and gradation
//! - [`tree`]: `TileTree` - node arena persisted across frames
//! - [`selection`]: the per-frame selection algorithm
//! - [`transition`]: `TransitionGroup` - atomic subdivide/merge changes
//! - [`async_selection`]: selection off the render thread

pub mod async_selection;
pub mod bounds;
pub mod config;
pub mod key;
pub mod node;
pub mod selection;
pub mod transition;
pub mod tree;
pub mod view;

// Re-exports
pub use async_selection::{AsyncTileSelector, SelectionRequest, SelectionResult};
pub use bounds::{TileBounds, CAP_PADDING};
pub use config::{globe_target_resolution, sky_target_resolution, TileTreeConfig};
pub use key::TileKey;
pub use node::{NodeState, TileNode};
pub use selection::{CancelToken, Selection, SelectionStats, TileDiagnostic};
pub use transition::{TransitionGroup, TransitionType};
pub use tree::TileTree;
pub use view::{ConeView, Containment, FullSky, Frustum, Plane, ViewVolume};
