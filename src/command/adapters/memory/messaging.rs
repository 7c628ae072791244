//! In-memory messenger recording outbound traffic.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::command::{
    domain::{ChannelId, ClientId, MessageHandle, MessageId, UserId},
    ports::{Messenger, MessagingError, MessagingResult},
};

/// A message delivered through [`InMemoryMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Sending client.
    pub client: ClientId,
    /// Destination channel.
    pub channel: ChannelId,
    /// Message text.
    pub text: String,
}

#[derive(Debug, Default)]
struct MessengerState {
    sent: Vec<SentMessage>,
    deleted: Vec<MessageHandle>,
    read_only_channels: HashSet<ChannelId>,
    delete_failure: Option<MessagingError>,
}

/// Thread-safe messenger that records sends and deletions.
///
/// Private channels are named `dm-{user}`. Failures can be injected per
/// channel for sends and globally for deletions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessenger {
    state: Arc<RwLock<MessengerState>>,
}

impl InMemoryMessenger {
    /// Creates a messenger with no recorded traffic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sends to `channel` fail with missing permissions.
    pub fn deny_sends_to(&self, channel: ChannelId) {
        if let Ok(mut state) = self.state.write() {
            state.read_only_channels.insert(channel);
        }
    }

    /// Makes every deletion fail with `error`.
    pub fn fail_deletes_with(&self, error: MessagingError) {
        if let Ok(mut state) = self.state.write() {
            state.delete_failure = Some(error);
        }
    }

    /// Returns every delivered message in order.
    #[must_use]
    pub fn sent(&self) -> Vec<SentMessage> {
        self.state
            .read()
            .map(|state| state.sent.clone())
            .unwrap_or_default()
    }

    /// Returns the messages delivered to `channel` in order.
    #[must_use]
    pub fn sent_to(&self, channel: &ChannelId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|message| message.channel == *channel)
            .map(|message| message.text)
            .collect()
    }

    /// Returns every deleted message handle in order.
    #[must_use]
    pub fn deleted(&self) -> Vec<MessageHandle> {
        self.state
            .read()
            .map(|state| state.deleted.clone())
            .unwrap_or_default()
    }

    /// Returns the private channel identifier used for `user`.
    #[must_use]
    pub fn private_channel_of(user: &UserId) -> ChannelId {
        ChannelId::new(format!("dm-{user}"))
    }
}

fn poisoned(err: impl std::fmt::Display) -> MessagingError {
    MessagingError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl Messenger for InMemoryMessenger {
    async fn send_reply(
        &self,
        client: &ClientId,
        channel: &ChannelId,
        text: &str,
    ) -> MessagingResult<MessageHandle> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.read_only_channels.contains(channel) {
            return Err(MessagingError::MissingPermissions(format!(
                "cannot send messages in {channel}"
            )));
        }
        state.sent.push(SentMessage {
            client: client.clone(),
            channel: channel.clone(),
            text: text.to_owned(),
        });
        Ok(MessageHandle {
            channel: channel.clone(),
            message: MessageId::new(format!("sent-{}", state.sent.len())),
        })
    }

    async fn delete_message(
        &self,
        _client: &ClientId,
        handle: &MessageHandle,
    ) -> MessagingResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if let Some(error) = &state.delete_failure {
            return Err(error.clone());
        }
        state.deleted.push(handle.clone());
        Ok(())
    }

    async fn private_channel(
        &self,
        _client: &ClientId,
        user: &UserId,
    ) -> MessagingResult<ChannelId> {
        Ok(Self::private_channel_of(user))
    }
}
