//! Shared helpers for in-memory dispatch integration tests.

use std::io;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use herald::command::{
    adapters::memory::{
        InMemoryChannelCapabilities, InMemoryMessenger, InMemoryPermissionResolver,
        InMemoryPrefixStore,
    },
    domain::{
        BotClient, CallbackResult, ChannelId, ChannelRef, ChatMessage, ChatUser, CommandContext,
        InboundMessage, UserId,
    },
    services::{CommandDispatcher, CommandRegistry, DispatchPorts, DispatcherConfig},
};
use rstest::fixture;
use tokio::runtime::Runtime;

/// Guild of every guild message.
pub const GUILD: &str = "g-1";
/// Channel of every guild message.
pub const CHANNEL: &str = "c-1";
/// Author of every message.
pub const AUTHOR: &str = "u-1";

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// In-memory collaborators plus the registry they serve.
pub struct Harness {
    /// Shared command registry.
    pub registry: Arc<CommandRegistry>,
    /// Prefix settings.
    pub prefixes: Arc<InMemoryPrefixStore>,
    /// Permission decisions.
    pub permissions: Arc<InMemoryPermissionResolver>,
    /// Channel capabilities.
    pub capabilities: Arc<InMemoryChannelCapabilities>,
    /// Recorded outbound traffic.
    pub messenger: Arc<InMemoryMessenger>,
}

impl Harness {
    /// Returns the collaborators as dispatcher ports.
    pub fn ports(&self) -> DispatchPorts {
        DispatchPorts {
            prefixes: self.prefixes.clone(),
            permissions: self.permissions.clone(),
            capabilities: self.capabilities.clone(),
            messenger: self.messenger.clone(),
        }
    }

    /// Builds a dispatcher with `config`.
    pub fn dispatcher(&self, config: &DispatcherConfig) -> CommandDispatcher {
        CommandDispatcher::new(Arc::clone(&self.registry), self.ports(), config)
    }

    /// Returns the texts sent to the guild channel.
    pub fn channel_replies(&self) -> Vec<String> {
        self.messenger.sent_to(&ChannelId::new(CHANNEL))
    }

    /// Returns the texts sent to the author's private channel.
    pub fn private_replies(&self) -> Vec<String> {
        self.messenger
            .sent_to(&InMemoryMessenger::private_channel_of(&UserId::new(AUTHOR)))
    }
}

/// Provides empty collaborators answering the `!` prefix.
#[fixture]
pub fn harness() -> Harness {
    Harness {
        registry: Arc::new(CommandRegistry::new()),
        prefixes: Arc::new(InMemoryPrefixStore::new(["!"])),
        permissions: Arc::new(InMemoryPermissionResolver::new()),
        capabilities: Arc::new(InMemoryChannelCapabilities::new([])),
        messenger: Arc::new(InMemoryMessenger::new()),
    }
}

/// Creates a bot client with the given identifier.
pub fn client(id: &str) -> BotClient {
    BotClient::new(id, format!("herald-{id}"))
}

/// Wraps `content` as a guild message received by `bot`.
pub fn guild_message(bot: &BotClient, content: &str) -> InboundMessage {
    let message = ChatMessage::new(
        "m-1",
        ChannelRef::guild(CHANNEL, "general", GUILD),
        ChatUser::new(AUTHOR, "ada", "0001"),
        content,
    );
    InboundMessage::new(bot.clone(), message)
}

/// Wraps `content` as a private message received by `bot`.
pub fn private_message(bot: &BotClient, content: &str) -> InboundMessage {
    let message = ChatMessage::new(
        "m-2",
        ChannelRef::private(format!("dm-{AUTHOR}")),
        ChatUser::new(AUTHOR, "ada", "0001"),
        content,
    );
    InboundMessage::new(bot.clone(), message)
}

/// Replies with the name the command was invoked by.
pub fn echo_name(context: &CommandContext) -> BoxFuture<'_, CallbackResult> {
    Box::pin(async move {
        context
            .reply(&format!("{} via {}", context.command_name(), context.client().name))
            .await?;
        Ok(())
    })
}

/// Replies that the author was refused.
pub fn refuse(context: &CommandContext) -> BoxFuture<'_, CallbackResult> {
    Box::pin(async move {
        context.reply("refused").await?;
        Ok(())
    })
}
