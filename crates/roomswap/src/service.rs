//! Swap service actor: one Tokio task that owns a `SwapEngine`.
//!
//! Every read and write of rooms and requests is a command on the
//! actor's channel, handled one at a time. A pass therefore runs with
//! exclusive access to the engine, and no caller can observe a cycle
//! that is half rotated.

use roomswap_engine::{OccupancyStore, PassConfig, SwapEngine};
use roomswap_protocol::{
    PassReport, RoomEntry, RoomId, StateReport, SwapEdge, SwapSnapshot,
};
use tokio::sync::{mpsc, oneshot};

use crate::{RoomSwapError, ServiceError};

/// Reply channel for commands that can fail. The caller keeps the
/// receiving end and awaits it after sending the command.
type Reply<T> = oneshot::Sender<Result<T, RoomSwapError>>;

/// Commands sent to the service actor through its channel.
///
/// Reads (`Snapshot`, `Report`) reply with a plain value: they cannot
/// fail, not even on a poisoned service.
enum EngineCommand {
    Submit {
        edge: SwapEdge,
        reply: Reply<Option<RoomId>>,
    },
    Withdraw {
        from: RoomId,
        reply: Reply<Option<RoomId>>,
    },
    /// `None` means every room with a pending request.
    RunPass {
        candidates: Option<Vec<RoomId>>,
        reply: Reply<PassReport>,
    },
    Snapshot {
        reply: oneshot::Sender<SwapSnapshot>,
    },
    Report {
        reply: oneshot::Sender<StateReport>,
    },
    Shutdown,
}

/// Handle to a running swap service.
///
/// Cheap to clone: it is only an `mpsc::Sender`. Every clone feeds the
/// same actor, so requests and passes from different tasks are applied
/// in the order they reach the channel.
#[derive(Clone)]
pub struct SwapService {
    sender: mpsc::Sender<EngineCommand>,
}

impl SwapService {
    /// Creates a builder for a service over an in-memory registry.
    pub fn builder() -> SwapServiceBuilder {
        SwapServiceBuilder::new()
    }

    /// Moves `engine` into a new actor task and returns its handle.
    ///
    /// `S: Send + 'static` because the store moves into a task that may
    /// run on any worker thread and outlive the caller. The channel is
    /// bounded by `PassConfig::channel_size`; when it is full, callers
    /// wait in `send` instead of queueing without limit.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S>(engine: SwapEngine<S>) -> Self
    where
        S: OccupancyStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(engine.config().channel_size.max(1));
        let actor = ServiceActor {
            engine,
            receiver: rx,
            poisoned: false,
        };
        tokio::spawn(actor.run());
        Self { sender: tx }
    }

    /// Admits a swap request. Returns the request it replaced, if any.
    pub async fn submit_request(&self, edge: SwapEdge) -> Result<Option<RoomId>, RoomSwapError> {
        self.call(|reply| EngineCommand::Submit { edge, reply }).await?
    }

    /// Withdraws the pending request of `from`. Returns its old target.
    pub async fn withdraw_request(&self, from: RoomId) -> Result<Option<RoomId>, RoomSwapError> {
        self.call(|reply| EngineCommand::Withdraw { from, reply }).await?
    }

    /// Runs a pass over the given start rooms, in order.
    pub async fn run_pass(&self, candidates: Vec<RoomId>) -> Result<PassReport, RoomSwapError> {
        self.call(|reply| EngineCommand::RunPass {
            candidates: Some(candidates),
            reply,
        })
        .await?
    }

    /// Runs a pass over every room that has a pending request.
    pub async fn run_pass_all(&self) -> Result<PassReport, RoomSwapError> {
        self.call(|reply| EngineCommand::RunPass {
            candidates: None,
            reply,
        })
        .await?
    }

    /// The current rooms and requests.
    pub async fn snapshot(&self) -> Result<SwapSnapshot, RoomSwapError> {
        Ok(self.call(|reply| EngineCommand::Snapshot { reply }).await?)
    }

    /// The current room table.
    pub async fn state_report(&self) -> Result<StateReport, RoomSwapError> {
        Ok(self.call(|reply| EngineCommand::Report { reply }).await?)
    }

    /// Tells the service to stop. Commands queued behind the shutdown are
    /// dropped, and their callers get `ServiceError::Unavailable`.
    pub async fn shutdown(&self) -> Result<(), RoomSwapError> {
        self.sender
            .send(EngineCommand::Shutdown)
            .await
            .map_err(|_| ServiceError::Unavailable.into())
    }

    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn call<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> EngineCommand,
    ) -> Result<T, ServiceError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| ServiceError::Unavailable)?;
        reply_rx.await.map_err(|_| ServiceError::Unavailable)
    }
}

/// The actor state. Runs inside a Tokio task.
struct ServiceActor<S: OccupancyStore> {
    engine: SwapEngine<S>,
    receiver: mpsc::Receiver<EngineCommand>,
    /// Set once a commit could not be rolled back. From then on the room
    /// table can't be trusted, so every mutation is refused while reads
    /// keep answering for inspection.
    poisoned: bool,
}

impl<S: OccupancyStore> ServiceActor<S> {
    async fn run(mut self) {
        tracing::info!(
            requests = self.engine.graph().len(),
            "swap service started"
        );

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                EngineCommand::Submit { edge, reply } => {
                    let result = self
                        .guard()
                        .and_then(|()| Ok(self.engine.submit_request(edge)?));
                    let _ = reply.send(result);
                }
                EngineCommand::Withdraw { from, reply } => {
                    let result = self
                        .guard()
                        .map(|()| self.engine.withdraw_request(&from));
                    let _ = reply.send(result);
                }
                EngineCommand::RunPass { candidates, reply } => {
                    let result = self.handle_pass(candidates);
                    let _ = reply.send(result);
                }
                EngineCommand::Snapshot { reply } => {
                    let _ = reply.send(self.engine.snapshot());
                }
                EngineCommand::Report { reply } => {
                    let _ = reply.send(self.engine.state_report());
                }
                EngineCommand::Shutdown => {
                    tracing::info!("swap service shutting down");
                    break;
                }
            }
        }

        tracing::info!("swap service stopped");
    }

    fn guard(&self) -> Result<(), RoomSwapError> {
        if self.poisoned {
            return Err(ServiceError::Poisoned.into());
        }
        Ok(())
    }

    fn handle_pass(&mut self, candidates: Option<Vec<RoomId>>) -> Result<PassReport, RoomSwapError> {
        self.guard()?;
        let result = match candidates {
            Some(candidates) => self.engine.run_pass(&candidates),
            None => self.engine.run_pass_all(),
        };
        match result {
            Ok(report) => Ok(report),
            Err(e) => {
                if e.is_fatal() {
                    tracing::error!(error = %e, "partial commit, swap service halted");
                    self.poisoned = true;
                } else {
                    tracing::warn!(error = %e, "swap pass aborted");
                }
                Err(RoomSwapError::Engine(e))
            }
        }
    }
}

/// Builder for a [`SwapService`] over an in-memory registry.
///
/// # Example
///
/// ```rust,ignore
/// let service = SwapService::builder()
///     .config(PassConfig { edge_policy: EdgePolicy::Reject, ..Default::default() })
///     .snapshot(snapshot)
///     .spawn()?;
/// ```
pub struct SwapServiceBuilder {
    config: PassConfig,
    snapshot: SwapSnapshot,
}

impl SwapServiceBuilder {
    pub fn new() -> Self {
        Self {
            config: PassConfig::default(),
            snapshot: SwapSnapshot::default(),
        }
    }

    /// Sets the pass configuration.
    pub fn config(mut self, config: PassConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts from the collaborator's snapshot, replacing anything added
    /// so far.
    pub fn snapshot(mut self, snapshot: SwapSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Adds one room.
    pub fn room(mut self, entry: RoomEntry) -> Self {
        self.snapshot.rooms.push(entry);
        self
    }

    /// Adds one pending request.
    pub fn request(mut self, edge: SwapEdge) -> Self {
        self.snapshot.requests.push(edge);
        self
    }

    /// Loads the engine and starts the actor.
    ///
    /// # Errors
    /// Whatever [`SwapEngine::from_snapshot`] rejects.
    pub fn spawn(self) -> Result<SwapService, RoomSwapError> {
        let engine = SwapEngine::from_snapshot(self.snapshot, self.config)?;
        Ok(SwapService::spawn(engine))
    }
}

impl Default for SwapServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
