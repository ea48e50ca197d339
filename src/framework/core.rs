//! # Core Actor Framework
//!
//! This module defines the generic building blocks for a single-writer state actor.
//!
//! ## Key Types
//!
//! - [`ActorState`]: The trait that any actor-owned state must implement.
//! - [`StateActor`]: The generic actor that owns the state and applies commands in order.
//! - [`StateClient`]: The generic, cloneable client for talking to the actor.
//! - [`FrameworkError`]: Plumbing errors (e.g., ActorClosed) plus boxed state errors.

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (State trait with hooks)
// =============================================================================

/// Trait that any state must implement to be owned by a [`StateActor`].
///
/// # Architecture Note
/// The actor owns exactly one value of this type. Every mutation arrives as a
/// [`ActorState::Command`] and is applied inside the actor task, one at a time, so
/// readers never observe a half-applied command and no lock is needed.
///
/// # Async & Context
/// This trait is `#[async_trait]` so hooks may await (e.g., writing to disk).
/// The `Context` type is injected into every hook at `run()` time ("late binding"),
/// which keeps construction free of I/O dependencies.
///
/// # Provided Methods (Hooks)
/// - [`ActorState::should_commit`] decides whether a command needs [`ActorState::on_commit`].
/// - [`ActorState::on_commit`] runs after a successful committing command.
///
/// The defaults never commit.
#[async_trait]
pub trait ActorState: Clone + Send + Sync + 'static {
    /// Enum of every operation the state accepts.
    type Command: Send + Sync + Debug;

    /// Result of a command. Variants usually match `Command` 1:1.
    type Reply: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this state.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply one command.
    async fn handle(
        &mut self,
        command: Self::Command,
        ctx: &Self::Context,
    ) -> Result<Self::Reply, Self::Error>;

    /// Whether `command` changes durable state and should trigger [`ActorState::on_commit`].
    fn should_commit(_command: &Self::Command) -> bool {
        false
    }

    /// Called after a committing command succeeded.
    ///
    /// A failure here is logged by the actor and does not undo the command: the
    /// in-memory state stays authoritative and the next commit retries.
    async fn on_commit(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Actor mailbox full")]
    MailboxFull,
    #[error("State error: {0}")]
    StateError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor.
///
/// - **Command**: applies an [`ActorState::Command`] and answers with its reply.
/// - **Snapshot**: returns a clone of the whole state, taken between two commands.
#[derive(Debug)]
pub enum StateRequest<S: ActorState> {
    Command {
        command: S::Command,
        respond_to: Response<S::Reply>,
    },
    Snapshot {
        respond_to: Response<S>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns a state value.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state and the
/// receiver end of the channel, and processes requests *sequentially* in a loop.
/// That sequential loop is the single serialization point for every mutation.
pub struct StateActor<S: ActorState> {
    receiver: mpsc::Receiver<StateRequest<S>>,
    state: S,
}

impl<S: ActorState> StateActor<S> {
    /// Creates a new `StateActor` seeded with `initial` and its associated client.
    ///
    /// `buffer_size` is the mailbox capacity; callers wait when it is full.
    pub fn new(buffer_size: usize, initial: S) -> (Self, StateClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            state: initial,
        };
        let client = StateClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self, context: S::Context) {
        // Extract just the type name (e.g., "LocalState" instead of "catalog_sync::...::LocalState")
        let state_type = std::any::type_name::<S>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(state_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StateRequest::Command {
                    command,
                    respond_to,
                } => {
                    debug!(state_type, ?command, "Command");
                    let commit = S::should_commit(&command);
                    match self.state.handle(command, &context).await {
                        Ok(reply) => {
                            if commit {
                                if let Err(e) = self.state.on_commit(&context).await {
                                    warn!(state_type, error = %e, "on_commit failed");
                                }
                            }
                            let _ = respond_to.send(Ok(reply));
                        }
                        Err(e) => {
                            warn!(state_type, error = %e, "Command rejected");
                            let _ = respond_to.send(Err(FrameworkError::StateError(Box::new(e))));
                        }
                    }
                }
                StateRequest::Snapshot { respond_to } => {
                    debug!(state_type, "Snapshot");
                    let _ = respond_to.send(Ok(self.state.clone()));
                }
            }
        }

        info!(state_type, "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a [`StateActor`].
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
pub struct StateClient<S: ActorState> {
    sender: mpsc::Sender<StateRequest<S>>,
}

impl<S: ActorState> Clone for StateClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: ActorState> StateClient<S> {
    pub fn new(sender: mpsc::Sender<StateRequest<S>>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, command: S::Command) -> Result<S::Reply, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StateRequest::Command {
                command,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Enqueues `command` without waiting for room or for the reply.
    ///
    /// Usable from synchronous code such as `Drop`. The reply is discarded.
    pub fn try_send_detached(&self, command: S::Command) -> Result<(), FrameworkError> {
        let (respond_to, _) = oneshot::channel();
        self.sender
            .try_send(StateRequest::Command {
                command,
                respond_to,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => FrameworkError::MailboxFull,
                mpsc::error::TrySendError::Closed(_) => FrameworkError::ActorClosed,
            })
    }

    pub async fn snapshot(&self) -> Result<S, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StateRequest::Snapshot { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
