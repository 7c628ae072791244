//! Messaging port used for replies and request deletion.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::command::domain::{CallbackError, ChannelId, ClientId, MessageHandle, UserId};

/// Result type for messaging operations.
pub type MessagingResult<T> = Result<T, MessagingError>;

/// Outbound messaging primitives of the chat gateway.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends `text` to `channel` on behalf of `client`.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::MissingPermissions`] when the bot may not
    /// post in the channel, or [`MessagingError::Transport`] on any other
    /// delivery failure.
    async fn send_reply(
        &self,
        client: &ClientId,
        channel: &ChannelId,
        text: &str,
    ) -> MessagingResult<MessageHandle>;

    /// Deletes a delivered message.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::MissingPermissions`] when the bot may not
    /// delete the message, or [`MessagingError::Transport`] otherwise.
    async fn delete_message(&self, client: &ClientId, handle: &MessageHandle)
    -> MessagingResult<()>;

    /// Opens (or reuses) the private channel between the bot and `user`.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError`] when the channel cannot be opened.
    async fn private_channel(&self, client: &ClientId, user: &UserId)
    -> MessagingResult<ChannelId>;
}

/// Errors returned by messaging adapters.
#[derive(Debug, Clone, Error)]
pub enum MessagingError {
    /// The bot lacks a channel permission required by the request.
    #[error("missing permissions: {0}")]
    MissingPermissions(String),

    /// Delivery failed for any other reason.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessagingError {
    /// Wraps a transport-level failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns whether the failure is a bot-side permission problem.
    #[must_use]
    pub const fn is_missing_permissions(&self) -> bool {
        matches!(self, Self::MissingPermissions(_))
    }
}

impl From<MessagingError> for CallbackError {
    fn from(err: MessagingError) -> Self {
        Self::Messaging(Arc::new(err))
    }
}
