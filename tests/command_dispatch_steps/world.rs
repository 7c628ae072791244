//! Shared world state for command dispatch BDD scenarios.

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
    services::{
        CommandDispatcher, CommandRegistry, DispatchOutcome, DispatchPorts, DispatcherConfig,
    },
};
use rstest::fixture;

/// Channel every scenario message is posted in.
pub const CHANNEL: &str = "c-1";
/// Author of every scenario message.
pub const AUTHOR: &str = "u-1";

/// Scenario world for command dispatch behaviour tests.
pub struct DispatchWorld {
    /// Bot client receiving the messages.
    pub bot: BotClient,
    /// Registry the dispatcher consults.
    pub registry: Arc<CommandRegistry>,
    /// Prefix settings.
    pub prefixes: Arc<InMemoryPrefixStore>,
    /// Permission decisions.
    pub permissions: Arc<InMemoryPermissionResolver>,
    /// Channel capabilities.
    pub capabilities: Arc<InMemoryChannelCapabilities>,
    /// Recorded outbound traffic.
    pub messenger: Arc<InMemoryMessenger>,
    /// Dispatcher tunables.
    pub config: DispatcherConfig,
    /// Outcome of the last dispatch.
    pub outcome: Option<DispatchOutcome>,
}

impl DispatchWorld {
    /// Creates a world with empty collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bot: BotClient::new("bot-1", "herald"),
            registry: Arc::new(CommandRegistry::new()),
            prefixes: Arc::new(InMemoryPrefixStore::default()),
            permissions: Arc::new(InMemoryPermissionResolver::new()),
            capabilities: Arc::new(InMemoryChannelCapabilities::default()),
            messenger: Arc::new(InMemoryMessenger::new()),
            config: DispatcherConfig::default(),
            outcome: None,
        }
    }

    /// Returns the collaborators as dispatcher ports.
    pub fn ports(&self) -> DispatchPorts {
        DispatchPorts {
            prefixes: self.prefixes.clone(),
            permissions: self.permissions.clone(),
            capabilities: self.capabilities.clone(),
            messenger: self.messenger.clone(),
        }
    }

    /// Builds a dispatcher over the current registry.
    pub fn dispatcher(&self) -> CommandDispatcher {
        CommandDispatcher::new(Arc::clone(&self.registry), self.ports(), &self.config)
    }

    /// Wraps `content` as a guild message from the scenario author.
    pub fn inbound(&self, content: &str) -> InboundMessage {
        let message = ChatMessage::new(
            "m-1",
            ChannelRef::guild(CHANNEL, "general", "g-1"),
            ChatUser::new(AUTHOR, "ada", "0001"),
            content,
        );
        InboundMessage::new(self.bot.clone(), message)
    }

    /// Returns the texts sent to the scenario channel.
    pub fn channel_replies(&self) -> Vec<String> {
        self.messenger.sent_to(&ChannelId::new(CHANNEL))
    }

    /// Returns the texts sent privately to the scenario author.
    pub fn private_replies(&self) -> Vec<String> {
        self.messenger
            .sent_to(&InMemoryMessenger::private_channel_of(&UserId::new(AUTHOR)))
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Replies with the kick target and reason.
pub fn kick_user(context: &CommandContext) -> BoxFuture<'_, CallbackResult> {
    Box::pin(async move {
        let target = context.first_arg().unwrap_or("nobody");
        let reason = context
            .options()
            .and_then(|options| options.value_of("reason"))
            .unwrap_or("none");
        context.reply(&format!("kicked {target}: {reason}")).await?;
        Ok(())
    })
}

/// Tells the author they may not kick.
pub fn refuse_kick(context: &CommandContext) -> BoxFuture<'_, CallbackResult> {
    Box::pin(async move {
        context.reply("you may not kick").await?;
        Ok(())
    })
}
