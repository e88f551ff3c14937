//! worldsync Wire Format - Binary snapshot encoding
//!
//! One snapshot is exactly 4 bytes, no framing, no version tag:
//! - Bytes 0-1: time (BE, unsigned)
//! - Byte 2: paused (0x00 = false, nonzero = true)
//! - Byte 3: raining (0x00 = false, nonzero = true)

pub mod codec;

pub use codec::*;
