//! Datagram listener and receive pipeline

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

use worldsync_core::{SyncError, SyncResult, DEFAULT_PORT};
use worldsync_wire::decode;

use crate::DispatchGate;

// Generous for a 4-byte protocol; oversized datagrams decode from their
// leading bytes.
const RECV_BUFFER_SIZE: usize = 64;

/// Live listener state: a worker thread driving the socket and the signal
/// used to stop it.
struct Worker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
    local_addr: SocketAddr,
}

/// Server receiving world-state updates on the well-known loopback port.
///
/// Each received datagram runs through the wire codec; malformed datagrams
/// are logged and dropped without affecting the listener, decoded snapshots
/// go to the [`DispatchGate`]. `start`/`stop` block the caller until the
/// listener is up or torn down and are serialized under one lock.
pub struct WorldStateServer {
    bind_addr: SocketAddr,
    gate: Arc<DispatchGate>,
    worker: Mutex<Option<Worker>>,
}

impl WorldStateServer {
    /// Server listening on the standard port
    pub fn new(gate: Arc<DispatchGate>) -> Self {
        Self::with_port(DEFAULT_PORT, gate)
    }

    /// Server listening on `127.0.0.1:port`; port 0 lets the OS choose.
    /// The interface is always loopback.
    pub fn with_port(port: u16, gate: Arc<DispatchGate>) -> Self {
        WorldStateServer {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port),
            gate,
            worker: Mutex::new(None),
        }
    }

    /// Start listening. No-op when already listening. A bind failure leaves
    /// the server stopped and is reported to the caller, never escalated.
    pub fn start(&self) -> SyncResult<()> {
        let mut guard = self.worker.lock();

        if guard.is_some() {
            return Ok(());
        }

        tracing::info!(addr = %self.bind_addr, "starting world state server");
        let worker = spawn_worker(self.bind_addr, Arc::clone(&self.gate))?;
        tracing::info!(addr = %worker.local_addr, "world state server listening");
        *guard = Some(worker);

        Ok(())
    }

    /// Stop listening and join the worker thread. No-op when already
    /// stopped. Safe from any caller thread.
    pub fn stop(&self) {
        let mut guard = self.worker.lock();

        let Some(worker) = guard.take() else {
            return;
        };

        tracing::info!("shutting down world state server");
        let _ = worker.shutdown.send(());
        let _ = worker.handle.join();
        tracing::info!("world state server stopped");
    }

    pub fn is_listening(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Bound address of the live listener, if any
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.worker.lock().as_ref().map(|worker| worker.local_addr)
    }
}

impl Drop for WorldStateServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_worker(bind_addr: SocketAddr, gate: Arc<DispatchGate>) -> SyncResult<Worker> {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let (ready_tx, ready_rx) = oneshot::channel::<SyncResult<SocketAddr>>();
    let port = bind_addr.port();

    let handle = thread::Builder::new()
        .name("worldsync-server".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_io()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(SyncError::Bind {
                        port,
                        reason: e.to_string(),
                    }));
                    return;
                }
            };

            runtime.block_on(async move {
                let socket = match UdpSocket::bind(bind_addr).await {
                    Ok(socket) => socket,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SyncError::Bind {
                            port,
                            reason: e.to_string(),
                        }));
                        return;
                    }
                };

                let local_addr = match socket.local_addr() {
                    Ok(addr) => addr,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SyncError::Bind {
                            port,
                            reason: e.to_string(),
                        }));
                        return;
                    }
                };

                let _ = ready_tx.send(Ok(local_addr));

                let mut buf = [0u8; RECV_BUFFER_SIZE];
                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        received = socket.recv_from(&mut buf) => match received {
                            Ok((len, _)) => match decode(&buf[..len]) {
                                Ok(message) => {
                                    tracing::debug!(time = message.time, "received world state update");
                                    gate.offer(message);
                                }
                                Err(error) => {
                                    tracing::warn!(%error, "discarding malformed datagram");
                                }
                            },
                            Err(error) => {
                                tracing::warn!(%error, "UDP receive error");
                            }
                        },
                    }
                }
            });
        })
        .map_err(|e| SyncError::Bind {
            port,
            reason: e.to_string(),
        })?;

    match ready_rx.blocking_recv() {
        Ok(Ok(local_addr)) => Ok(Worker {
            shutdown: shutdown_tx,
            handle,
            local_addr,
        }),
        Ok(Err(error)) => {
            let _ = handle.join();
            Err(error)
        }
        Err(_) => {
            let _ = handle.join();
            Err(SyncError::WorkerGone)
        }
    }
}
