//! sky_tiling - HEALPix indexing and level-of-detail tile selection
//!
//! This crate tiles the unit sphere with the nested HEALPix scheme and
//! chooses which tiles to draw for a sky or globe viewer.
//!
//! # Features
//!
//! - **Index engine**: direction ↔ pixel conversion, pixel corners and
//!   boundaries, 8-neighbourhoods, parent/child arithmetic and ring-order
//!   conversion for orders 0 through 29
//! - **Tile tree**: per-frame selection of visible tiles against a cone or
//!   camera frustum, with optional neighbour gradation and atomic
//!   subdivide/merge transitions
//! - **Async selection**: selection on rayon's pool with last-write-wins
//!   cancellation
//! - **Batch conversion**: parallel `ang2pix` / `pix2ang` over slices
//!
//! # Example
//!
//! ```ignore
//! use glam::DVec3;
//! use sky_tiling::{healpix, ConeView, TileTree, TileTreeConfig};
//!
//! // Index a direction at order 10
//! let pixel = healpix::ang2pix(DVec3::new(0.3, 0.4, 0.866), 10)?;
//! let neighbours = healpix::neighbours(pixel, 10)?;
//!
//! // Select tiles for a 20 degree field of view
//! let mut tree = TileTree::new(TileTreeConfig::default());
//! let view = ConeView::new(DVec3::Z, 10f64.to_radians())?;
//! let selection = tree.select_tiles(&view, 0.01)?;
//!
//! println!("{} tiles, {} transitions",
//!     selection.leaves.len(), selection.transitions.len());
//! ```

pub mod constants;
pub mod error;
pub mod geometry;
pub mod tables;

// Re-export commonly used items
pub use constants::{npface, npix, nside, MAX_ORDER, N_FACES};
pub use error::{Result, TilingError};

// HEALPix index engine
pub mod healpix;
pub use healpix::{ang2pix, neighbours, pix2ang, Direction, Neighbours, PixelGeometry};

// Parallel conversions over slices
pub mod batch;
pub use batch::{ang2pix_batch, pix2ang_batch};

// LOD tile selection
pub mod tiling;
pub use tiling::{
  AsyncTileSelector, ConeView, Frustum, FullSky, Selection, TileKey, TileTree, TileTreeConfig,
  TransitionGroup, TransitionType, ViewVolume,
};

// Selection statistics for debug overlays
pub mod metrics;
