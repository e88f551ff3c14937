//! Configuration-driven server lifecycle

use worldsync_core::SyncResult;

use crate::WorldStateServer;

/// Couples the server lifecycle to the presenter's "allow synchronization"
/// settings flag.
///
/// Feed the persisted flag value through [`SyncSupervisor::apply`] once at
/// startup, then again on every change: a false-to-true transition starts
/// the server, true-to-false stops it. Repeated values are absorbed by
/// `start`/`stop` idempotence. Configuration storage itself lives with the
/// host application.
pub struct SyncSupervisor {
    server: WorldStateServer,
}

impl SyncSupervisor {
    pub fn new(server: WorldStateServer) -> Self {
        SyncSupervisor { server }
    }

    /// Apply the flag's current value to the server
    pub fn apply(&self, enabled: bool) -> SyncResult<()> {
        if enabled {
            self.server.start()
        } else {
            self.server.stop();
            Ok(())
        }
    }

    pub fn server(&self) -> &WorldStateServer {
        &self.server
    }
}
