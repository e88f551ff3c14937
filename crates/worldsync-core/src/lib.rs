//! worldsync Core - Fundamental types for world-state synchronization
//!
//! This crate defines the types shared by every layer of the protocol:
//! - The `Message` snapshot value
//! - Protocol constants (day length, well-known port)
//! - The error taxonomy

pub mod error;
pub mod message;

pub use error::*;
pub use message::*;
