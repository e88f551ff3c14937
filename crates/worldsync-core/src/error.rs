//! Error types for the worldsync protocol

use thiserror::Error;

/// Errors surfaced by the synchronization core
#[derive(Error, Debug)]
pub enum SyncError {
    // Client errors
    #[error("Failed to open client socket: {0}")]
    Connect(String),

    #[error("Client is not connected")]
    NotConnected,

    #[error("Failed to send datagram: {0}")]
    Send(String),

    // Server errors
    #[error("Failed to bind port {port}: {reason}")]
    Bind { port: u16, reason: String },

    // Wire errors
    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    // Internal: the network worker exited while a caller was waiting on it
    #[error("Network worker is gone")]
    WorkerGone,
}

/// Result type for worldsync operations
pub type SyncResult<T> = Result<T, SyncError>;
