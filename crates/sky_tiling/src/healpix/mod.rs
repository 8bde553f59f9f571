//! HEALPix index engine.
//!
//! Maps between unit directions, nested pixel indices and face-local grid
//! coordinates, and resolves neighbours across face boundaries. Every
//! operation is a pure function over the constant tables in
//! [`crate::tables`], so callers may share them freely across threads.
//!
//! # Conventions
//!
//! - Directions are `glam::DVec3`, not required to be normalised.
//! - `z` is the polar axis; longitude is measured from +x towards +y.
//! - Inside a face, `ix` grows towards the north-east and `iy` towards the
//!   north-west. The nested index interleaves them as `... y1 x1 y0 x0`.
//!
//! # Module Structure
//!
//! - [`nested`]: `(face, ix, iy)` ↔ nested index
//! - [`projection`]: `ang2pix`, `pix2ang`, pixel boundaries
//! - [`neighbours`]: 8-direction neighbour search
//! - [`hierarchy`]: parent/children and order rescaling
//! - [`ring`]: ring-scheme conversion and map reordering
//! - [`order`]: order ↔ angular resolution

pub mod hierarchy;
pub mod nested;
pub mod neighbours;
pub mod order;
pub mod projection;
pub mod ring;

// Re-exports
pub use hierarchy::{children_of, descendant_range, parent_of, rescale};
pub use nested::{face_xy_of, pixel_of, FaceXy};
pub use neighbours::{neighbours, Direction, Neighbours};
pub use order::{mean_spacing, order_for_resolution, pixel_area};
pub use projection::{
  ang2pix, ang2pix_lonlat, boundaries, pix2ang, pix2lonlat, pixel_center, PixelGeometry,
};
pub use ring::{nest_to_ring, ring_to_nest, PixelMap, Scheme};
