//! Domain model for command dispatch.
//!
//! Covers the chat gateway model, command definitions and their builder,
//! the option-parsing capability, argument tokenization and the access
//! policy. Nothing here performs I/O.

mod access;
mod builder;
mod capability;
mod chat;
mod context;
mod definition;
mod error;
mod ids;
mod option;
mod tokenizer;

pub use access::{
    AccessVerdict, Decision, EXECUTE_OPERATION, WILDCARD_RESOURCE, evaluate_access,
    resource_chain,
};
pub use builder::CommandBuilder;
pub use capability::Capability;
pub use chat::{
    BotClient, ChannelRef, ChatMessage, ChatUser, InboundMessage, MessageHandle, PrefixScope,
};
pub use context::CommandContext;
pub use definition::{Callback, CommandDefinition};
pub use error::{CallbackError, CallbackResult, CommandDefinitionError, UsageError};
pub use ids::{ChannelId, ClientId, DispatchId, GuildId, MessageId, UserId};
pub use option::{
    HELP_OPTION, HELP_OPTION_NAMES, OptionArgument, OptionDescriptor, OptionSpec, ParsedOptions,
    ValueType,
};
pub use tokenizer::split_arguments;
