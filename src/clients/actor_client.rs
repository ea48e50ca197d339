use crate::framework::{ActorState, FrameworkError, StateClient};
use async_trait::async_trait;

/// Trait for state-specific clients to inherit the common read operation.
///
/// Implementors wrap a generic [`StateClient`] and translate framework errors into
/// their own error type.
#[async_trait]
pub trait ActorClient<S: ActorState>: Send + Sync {
    /// The state-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic StateClient.
    fn inner(&self) -> &StateClient<S>;

    /// Map framework errors to the specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a consistent copy of the whole state.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<S, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().snapshot().await.map_err(Self::map_error)
    }
}
