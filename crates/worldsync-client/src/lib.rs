//! worldsync Client - Outbound state synchronization
//!
//! This crate provides:
//! - The push client held by the observer
//! - Caller-owned push rate limiting

pub mod client;
pub mod throttle;

pub use client::*;
pub use throttle::*;
