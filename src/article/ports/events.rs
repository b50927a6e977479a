//! Emitter port for publication notifications.
//!
//! The emitter is the boundary to downstream consumers such as the live
//! ticker and breaking-news alerts. Implementations route each notification
//! to the topic named by [`PublicationNotification::topic`].

use crate::article::domain::PublicationNotification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for emitter operations.
pub type EmitResult<T> = Result<T, EmitError>;

/// Publication notification contract.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Never block on slow consumers
/// - Treat an absence of subscribers as success
/// - Preserve emission order per topic
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicationEventEmitter: Send + Sync {
    /// Hands a notification to the fan-out.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Closed`] once the emitter has shut down, or
    /// [`EmitError::Transport`] when the underlying channel fails.
    async fn emit(&self, notification: &PublicationNotification) -> EmitResult<()>;
}

/// Errors returned by emitter implementations.
#[derive(Debug, Clone, Error)]
pub enum EmitError {
    /// The emitter no longer accepts notifications.
    #[error("publication emitter is closed")]
    Closed,

    /// Transport-layer failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmitError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
