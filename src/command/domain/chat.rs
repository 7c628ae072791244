//! Chat gateway model consumed by the dispatcher.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ChannelId, ClientId, GuildId, MessageId, UserId};

/// Scope used to look up command prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixScope {
    /// Prefixes configured for one guild.
    Guild(GuildId),
    /// Wildcard scope, used for private messages.
    Any,
}

impl PrefixScope {
    /// Storage key of the wildcard scope.
    pub const ANY_KEY: &'static str = "*";

    /// Returns the storage key for this scope.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Guild(guild) => guild.as_str(),
            Self::Any => Self::ANY_KEY,
        }
    }
}

impl fmt::Display for PrefixScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A bot-client connection that received a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotClient {
    /// Client identity used as the registry key.
    pub id: ClientId,
    /// Display name of the bot account.
    pub name: String,
}

impl BotClient {
    /// Creates a bot client descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ClientId::new(id),
            name: name.into(),
        }
    }
}

impl fmt::Display for BotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatUser {
    /// User identifier.
    pub id: UserId,
    /// Account name.
    pub name: String,
    /// Discriminator suffix distinguishing accounts with the same name.
    pub discriminator: String,
}

impl ChatUser {
    /// Creates a chat user.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        discriminator: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            discriminator: discriminator.into(),
        }
    }
}

impl fmt::Display for ChatUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} ({})", self.name, self.discriminator, self.id)
    }
}

/// Channel a message was posted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef {
    /// Channel identifier.
    pub id: ChannelId,
    /// Channel name, empty for private channels.
    pub name: String,
    /// Owning guild; `None` for private channels.
    pub guild: Option<GuildId>,
}

impl ChannelRef {
    /// Creates a guild text channel.
    #[must_use]
    pub fn guild(
        id: impl Into<String>,
        name: impl Into<String>,
        guild: impl Into<String>,
    ) -> Self {
        Self {
            id: ChannelId::new(id),
            name: name.into(),
            guild: Some(GuildId::new(guild)),
        }
    }

    /// Creates a private (direct message) channel.
    #[must_use]
    pub fn private(id: impl Into<String>) -> Self {
        Self {
            id: ChannelId::new(id),
            name: String::new(),
            guild: None,
        }
    }

    /// Returns whether the channel is a private conversation.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.guild.is_none()
    }

    /// Returns the scope to look command prefixes up in.
    #[must_use]
    pub fn prefix_scope(&self) -> PrefixScope {
        self.guild
            .clone()
            .map_or(PrefixScope::Any, PrefixScope::Guild)
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.guild {
            Some(guild) => write!(f, "#{} ({}) in {}", self.name, self.id, guild),
            None => write!(f, "private channel {}", self.id),
        }
    }
}

/// A message received from the chat gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Channel the message was posted in.
    pub channel: ChannelRef,
    /// Message author.
    pub author: ChatUser,
    /// Raw message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a chat message.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        channel: ChannelRef,
        author: ChatUser,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(id),
            channel,
            author,
            content: content.into(),
        }
    }

    /// Returns a handle addressing this message for deletion.
    #[must_use]
    pub fn handle(&self) -> MessageHandle {
        MessageHandle {
            channel: self.channel.id.clone(),
            message: self.id.clone(),
        }
    }
}

/// Address of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    /// Channel holding the message.
    pub channel: ChannelId,
    /// Message identifier.
    pub message: MessageId,
}

/// A message paired with the bot client that received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Receiving bot client.
    pub client: BotClient,
    /// Received message.
    pub message: ChatMessage,
}

impl InboundMessage {
    /// Pairs a message with its receiving client.
    #[must_use]
    pub const fn new(client: BotClient, message: ChatMessage) -> Self {
        Self { client, message }
    }
}
