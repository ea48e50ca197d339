//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and the receiver it talks to.
//! Then use [`expect_command`] or [`expect_snapshot`] to assert what the client sent
//! and to answer it by hand.

use crate::framework::{ActorState, FrameworkError, StateClient, StateRequest};
use tokio::sync::{mpsc, oneshot};

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// When testing *client* logic (e.g., how `StoreClient` maps replies and errors) we
/// don't need a running `StateActor`. The client sends to a channel the test owns; the
/// test inspects each request and answers it, simulating success or failure
/// deterministically.
pub fn create_mock_client<S: ActorState>(
    buffer_size: usize,
) -> (StateClient<S>, mpsc::Receiver<StateRequest<S>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StateClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Command request
pub async fn expect_command<S: ActorState>(
    receiver: &mut mpsc::Receiver<StateRequest<S>>,
) -> Option<(S::Command, oneshot::Sender<Result<S::Reply, FrameworkError>>)> {
    match receiver.recv().await {
        Some(StateRequest::Command {
            command,
            respond_to,
        }) => Some((command, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Snapshot request
pub async fn expect_snapshot<S: ActorState>(
    receiver: &mut mpsc::Receiver<StateRequest<S>>,
) -> Option<oneshot::Sender<Result<S, FrameworkError>>> {
    match receiver.recv().await {
        Some(StateRequest::Snapshot { respond_to }) => Some(respond_to),
        _ => None,
    }
}
