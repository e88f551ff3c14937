//! Push client for world-state updates

use std::net::SocketAddr;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, oneshot};

use worldsync_core::{default_addr, Message, SyncError, SyncResult};
use worldsync_wire::{encode, PACKET_SIZE};

const COMMAND_QUEUE_DEPTH: usize = 16;

enum Command {
    Send {
        payload: [u8; PACKET_SIZE],
        reply: oneshot::Sender<SyncResult<()>>,
    },
}

/// Live connection state: a worker thread driving the socket, plus the
/// channel used to reach it. Dropping `commands` ends the worker loop.
struct Worker {
    commands: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
    local_addr: SocketAddr,
}

/// Client pushing world-state updates to a local presenter.
///
/// Socket I/O runs on a dedicated worker thread; the public operations block
/// the caller until the underlying network operation resolves. All operations
/// are serialized through one lock, so a periodic pusher and a shutdown path
/// cannot race on the socket.
pub struct WorldStateClient {
    target: SocketAddr,
    worker: Mutex<Option<Worker>>,
}

impl WorldStateClient {
    /// Client targeting the standard loopback address and port
    pub fn new() -> Self {
        Self::with_target(default_addr())
    }

    /// Client targeting an alternative presenter address
    pub fn with_target(target: SocketAddr) -> Self {
        WorldStateClient {
            target,
            worker: Mutex::new(None),
        }
    }

    /// Establish the "connection" to the presenter.
    ///
    /// Acquires a socket on an OS-assigned local port and starts the worker.
    /// No-op when already connected. On failure the client remains
    /// disconnected and no worker survives.
    pub fn connect(&self) -> SyncResult<()> {
        let mut guard = self.worker.lock();

        if guard.is_some() {
            return Ok(());
        }

        let worker = spawn_worker(self.target)?;
        tracing::info!(local = %worker.local_addr, target = %self.target, "client connected");
        *guard = Some(worker);

        Ok(())
    }

    /// Release the socket and shut down the worker thread. No-op when
    /// already disconnected. Teardown is total: the worker is joined before
    /// this returns.
    pub fn disconnect(&self) {
        let mut guard = self.worker.lock();

        let Some(worker) = guard.take() else {
            return;
        };

        drop(worker.commands);
        let _ = worker.handle.join();
        tracing::info!("client disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Local address of the held socket, if connected
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.worker.lock().as_ref().map(|worker| worker.local_addr)
    }

    /// Prepare an update to the presenter
    pub fn update(&self) -> UpdateBuilder<'_> {
        UpdateBuilder {
            client: self,
            message: Message::default(),
        }
    }

    /// Encode `message` and send exactly one datagram to the target.
    ///
    /// Fails with [`SyncError::NotConnected`] when disconnected; an OS-level
    /// send failure propagates to the caller. No retry in either case.
    pub fn send(&self, message: &Message) -> SyncResult<()> {
        let guard = self.worker.lock();
        let worker = guard.as_ref().ok_or(SyncError::NotConnected)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        worker
            .commands
            .blocking_send(Command::Send {
                payload: encode(message),
                reply: reply_tx,
            })
            .map_err(|_| SyncError::WorkerGone)?;

        reply_rx.blocking_recv().map_err(|_| SyncError::WorkerGone)?
    }
}

impl Default for WorldStateClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorldStateClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Fluent builder for one outbound snapshot. Fields default to zero/false.
pub struct UpdateBuilder<'a> {
    client: &'a WorldStateClient,
    message: Message,
}

impl UpdateBuilder<'_> {
    pub fn set_time(mut self, time: u16) -> Self {
        self.message.time = time;
        self
    }

    pub fn set_paused(mut self, paused: bool) -> Self {
        self.message.paused = paused;
        self
    }

    pub fn set_raining(mut self, raining: bool) -> Self {
        self.message.raining = raining;
        self
    }

    /// Snapshot accumulated so far
    pub fn message(&self) -> Message {
        self.message
    }

    /// Send the accumulated snapshot as one datagram
    pub fn push(self) -> SyncResult<()> {
        self.client.send(&self.message)
    }
}

fn spawn_worker(target: SocketAddr) -> SyncResult<Worker> {
    let (command_tx, mut command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    let (ready_tx, ready_rx) = oneshot::channel::<SyncResult<SocketAddr>>();

    let handle = thread::Builder::new()
        .name("worldsync-client".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_io()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(SyncError::Connect(e.to_string())));
                    return;
                }
            };

            runtime.block_on(async move {
                // Local port is OS-assigned; traffic never leaves loopback
                let socket = match UdpSocket::bind("127.0.0.1:0").await {
                    Ok(socket) => socket,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SyncError::Connect(e.to_string())));
                        return;
                    }
                };

                let local_addr = match socket.local_addr() {
                    Ok(addr) => addr,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SyncError::Connect(e.to_string())));
                        return;
                    }
                };

                let _ = ready_tx.send(Ok(local_addr));

                while let Some(command) = command_rx.recv().await {
                    match command {
                        Command::Send { payload, reply } => {
                            let result = socket
                                .send_to(&payload, target)
                                .await
                                .map(|_| ())
                                .map_err(|e| SyncError::Send(e.to_string()));
                            let _ = reply.send(result);
                        }
                    }
                }
            });
        })
        .map_err(|e| SyncError::Connect(e.to_string()))?;

    match ready_rx.blocking_recv() {
        Ok(Ok(local_addr)) => Ok(Worker {
            commands: command_tx,
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
