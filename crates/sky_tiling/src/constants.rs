//! Numeric limits of the HEALPix nested scheme.
//!
//! # Index Layout
//!
//! ```text
//! nested index (u64):
//!
//!   bit 63 ........ 2N+4 | 2N+3 .. 2N | 2N-1 ............... 0
//!   ─────────────────────┼────────────┼──────────────────────────
//!        unused (zero)   │ face 0..11 │ y_{N-1} x_{N-1} ... y_0 x_0
//! ```
//!
//! Order 29 is the deepest level whose index fits: 4 face bits + 58
//! interleaved coordinate bits = 62 bits.

/// Number of base faces in the tessellation.
pub const N_FACES: u64 = 12;

/// Deepest supported order (nside = 2^29).
pub const MAX_ORDER: u8 = 29;

/// Number of relative neighbour directions (8 compass + centre).
pub const N_DIRECTIONS: usize = 9;

/// Index of the "centre" row in the face topology tables.
pub const CENTRE_DIRECTION: usize = 4;

/// |z| above which a direction lies in a polar cap.
pub const TRANSITION_Z: f64 = 2.0 / 3.0;

/// |z| above which sin(theta) is carried explicitly to keep precision near
/// the poles.
pub const POLAR_PRECISION_Z: f64 = 0.99;

/// Highest order covered by the precomputed swap cycle table.
pub const MAX_SWAP_CYCLE_ORDER: u8 = 13;

/// Number of pixels per face at `order`: 4^order.
#[inline]
pub const fn npface(order: u8) -> u64 {
  1u64 << (2 * order as u32)
}

/// Side length of a face grid at `order`: 2^order.
#[inline]
pub const fn nside(order: u8) -> u64 {
  1u64 << order as u32
}

/// Total pixel count at `order`: 12 * 4^order.
#[inline]
pub const fn npix(order: u8) -> u64 {
  N_FACES * npface(order)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
