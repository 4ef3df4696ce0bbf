use crate::{ConnectionState, LinkConfig};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// State shared with the listener task.
struct Shared {
    state: AtomicU8,
    generation: AtomicU64,
}

impl Shared {
    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Mark the link closed on behalf of one connection. A listener from a
    /// superseded connection must never touch a newer connection's state.
    fn close_if_current(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) == generation {
            self.set_state(ConnectionState::Disconnected);
        }
    }
}

/// Handle to the per-connection listener.
struct Listener {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Persistent duplex link to the robot controller.
pub struct RobotLink {
    config: LinkConfig,
    shared: Arc<Shared>,
    writer: Mutex<Option<OwnedWriteHalf>>,
    listener: Mutex<Option<Listener>>,
}

impl RobotLink {
    pub fn new(config: LinkConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared {
                state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
                generation: AtomicU64::new(0),
            }),
            writer: Mutex::new(None),
            listener: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Lock-free connection check.
    pub fn is_connected(&self) -> bool {
        self.shared.state() == ConnectionState::Connected
    }

    /// Open the connection and start its listener. Valid from
    /// `Disconnected` or `Failed` only. Returns false on any failure and
    /// never errors.
    pub async fn connect(&self) -> bool {
        match self.state() {
            ConnectionState::Disconnected | ConnectionState::Failed => {}
            state => {
                warn!(%state, "connect ignored; link already active");
                return false;
            }
        }

        info!(
            host = %self.config.host,
            port = self.config.port,
            "connecting to robot controller"
        );
        self.shared.set_state(ConnectionState::Connecting);

        let stream = match TcpStream::connect((self.config.host.as_str(), self.config.port)).await
        {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "connect failed; is the controller running?");
                self.shared.set_state(ConnectionState::Failed);
                return false;
            }
        };

        let (read_half, write_half) = stream.into_split();
        *self.writer.lock().await = Some(write_half);

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Connected before the listener starts, so an immediate EOF in the
        // listener cannot be overwritten by a late Connected store here.
        self.shared.set_state(ConnectionState::Connected);

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(listen(read_half, shared, generation, shutdown_rx));
        *self.listener.lock().await = Some(Listener {
            shutdown: shutdown_tx,
            task,
        });

        info!(
            host = %self.config.host,
            port = self.config.port,
            "connected to robot controller"
        );
        true
    }

    /// Tear the connection down. Idempotent; safe from any state.
    pub async fn disconnect(&self) {
        let listener = self.listener.lock().await.take();
        if let Some(listener) = &listener {
            let _ = listener.shutdown.send(true);
        }

        // Flush and close the write side before the read side goes away.
        if let Some(mut writer) = self.writer.lock().await.take() {
            let _ = writer.shutdown().await;
        }

        if let Some(listener) = listener {
            let _ = listener.task.await;
        }

        self.shared.set_state(ConnectionState::Disconnected);
        debug!("robot link disconnected");
    }

    /// Write one command line. Only valid when connected; returns false
    /// without touching the socket otherwise. A write failure drops the
    /// writer so later sends fail fast instead of retrying blindly.
    pub async fn send(&self, command: &str) -> bool {
        if !self.is_connected() {
            error!("not connected to robot controller");
            return false;
        }

        let mut guard = self.writer.lock().await;
        let Some(writer) = guard.as_mut() else {
            error!("robot link writer already closed");
            return false;
        };

        info!(%command, "sending command to robot controller");
        let outcome = async {
            writer.write_all(command.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;

        match outcome {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "command write failed");
                *guard = None;
                self.shared.set_state(ConnectionState::Disconnected);
                false
            }
        }
    }
}

/// Per-connection inbound loop. Exactly one runs per active connection,
/// tagged with that connection's generation. Non-empty lines are logged as
/// controller-originated and dropped; EOF or a read error ends the loop.
/// Never panics or propagates errors out of the task.
async fn listen(
    read_half: OwnedReadHalf,
    shared: Arc<Shared>,
    generation: u64,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                debug!(generation, "listener stopping");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        info!(generation, message = %line, "controller");
                    }
                }
                Ok(None) => {
                    info!(generation, "controller closed the connection");
                    break;
                }
                Err(e) => {
                    warn!(generation, error = %e, "controller read failed");
                    break;
                }
            }
        }
    }
    shared.close_if_current(generation);
}
