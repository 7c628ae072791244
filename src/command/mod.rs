//! Chat command dispatch.
//!
//! Turns inbound chat messages into invocations of registered bot commands.
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: command definitions, the option parser, the argument
//!   tokenizer and the access policy ([`domain`])
//! - **Ports**: prefix lookup, permission decisions, channel capabilities and
//!   outbound messaging ([`ports`])
//! - **Adapters**: in-memory implementations of every port ([`adapters`])
//! - **Services**: the registry, the dispatcher and help rendering
//!   ([`services`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use herald::command::adapters::memory::{
//!     InMemoryChannelCapabilities, InMemoryMessenger, InMemoryPermissionResolver,
//!     InMemoryPrefixStore,
//! };
//! use herald::command::domain::{
//!     BotClient, ChannelRef, ChatMessage, ChatUser, ChannelId, CommandBuilder, InboundMessage,
//! };
//! use herald::command::services::{
//!     CommandDispatcher, CommandRegistry, DispatchOutcome, DispatchPorts, DispatcherConfig,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let messenger = Arc::new(InMemoryMessenger::new());
//! let ports = DispatchPorts {
//!     prefixes: Arc::new(InMemoryPrefixStore::new(["!"])),
//!     permissions: Arc::new(InMemoryPermissionResolver::new()),
//!     capabilities: Arc::new(InMemoryChannelCapabilities::new([])),
//!     messenger: messenger.clone(),
//! };
//! let bot = BotClient::new("bot-1", "herald");
//! let registry = Arc::new(CommandRegistry::new());
//! registry.register_all(
//!     &bot.id,
//!     [CommandBuilder::new("ping")
//!         .on_execute(|context| {
//!             Box::pin(async move {
//!                 context.reply("pong").await?;
//!                 Ok(())
//!             })
//!         })
//!         .build()
//!         .expect("ping is a valid command")],
//! );
//!
//! let dispatcher = CommandDispatcher::new(registry, ports, &DispatcherConfig::default());
//! let message = ChatMessage::new(
//!     "m-1",
//!     ChannelRef::guild("c-1", "general", "g-1"),
//!     ChatUser::new("u-1", "ada", "0001"),
//!     "!ping",
//! );
//! let outcome = dispatcher
//!     .handle(InboundMessage::new(bot, message))
//!     .await
//!     .expect("dispatch task should not be cancelled");
//!
//! assert_eq!(outcome, DispatchOutcome::Executed { succeeded: true });
//! assert_eq!(messenger.sent_to(&ChannelId::new("c-1")), vec!["pong".to_owned()]);
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
