//! # Shared Types Crate
//!
//! Primitives shared by every CrossNet Approvals crate: fixed-size hash and
//! identity types, the 256-bit approval counter, and the big-endian byte
//! cursor used by the fixed-order wire codecs.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate primitive types live here and
//!   nowhere else.
//! - **Plain data**: everything in this crate is `Copy`-able byte arrays or
//!   pure helper functions; no crypto, no state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod encoding;
pub mod entities;

pub use encoding::{ByteReader, DecodeError};
pub use entities::*;
