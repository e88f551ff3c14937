//! worldsync Server - Inbound state synchronization
//!
//! This crate provides:
//! - The datagram listener held by the presenter
//! - The dispatch gate marshalling snapshots onto the presentation thread
//! - The supervisor coupling the listener to the settings flag

pub mod gate;
pub mod server;
pub mod supervisor;

pub use gate::*;
pub use server::*;
pub use supervisor::*;
