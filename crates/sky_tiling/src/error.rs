//! Error type shared by the index engine and the tile selector.

use thiserror::Error;

use crate::constants::MAX_ORDER;

/// Failures surfaced by sky tiling operations.
///
/// Every variant except [`TilingError::Cancelled`] is an invalid argument:
/// the call is rejected instead of clamping the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TilingError {
  #[error("order {order} is outside [0, {max}]", max = MAX_ORDER)]
  InvalidOrder { order: u8 },

  #[error("pixel {pixel} does not exist at order {order}")]
  InvalidPixel { pixel: u64, order: u8 },

  #[error("face-local coordinate ({ix}, {iy}) is outside the order {order} grid")]
  InvalidFaceCoordinate { ix: u64, iy: u64, order: u8 },

  #[error("direction vector is zero-length or not finite")]
  InvalidDirection,

  #[error("face index {face} is outside [0, 11]")]
  InvalidFace { face: usize },

  #[error("neighbour direction index {index} is outside [0, 8]")]
  InvalidDirectionIndex { index: usize },

  #[error("target angular resolution {value} must be finite and positive")]
  InvalidResolution { value: f64 },

  #[error("map of {len} values is not a full-sky map (12 * 4^N entries)")]
  MapSizeMismatch { len: usize },

  #[error("tile selection was superseded by a newer request")]
  Cancelled,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TilingError>;
