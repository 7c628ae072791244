//! Per-dispatch invocation context handed to command callbacks.

use std::fmt;
use std::sync::Arc;

use super::{BotClient, ChatMessage, CommandDefinition, MessageHandle, ParsedOptions};
use crate::command::ports::{Messenger, MessagingResult};

/// Everything a callback knows about one command invocation.
///
/// A context is created fresh for each dispatch and dropped when the
/// dispatch ends; it is never shared between messages.
pub struct CommandContext {
    client: BotClient,
    message: ChatMessage,
    prefix: String,
    command: Arc<CommandDefinition>,
    command_name: String,
    args: Option<Vec<String>>,
    options: Option<ParsedOptions>,
    messenger: Arc<dyn Messenger>,
}

impl CommandContext {
    /// Creates a context for `command` triggered by `message`.
    ///
    /// The typed command name defaults to the definition's name; arguments
    /// and options start empty.
    #[must_use]
    pub fn new(
        client: BotClient,
        message: ChatMessage,
        prefix: impl Into<String>,
        command: Arc<CommandDefinition>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let command_name = command.name().to_owned();
        Self {
            client,
            message,
            prefix: prefix.into(),
            command,
            command_name,
            args: None,
            options: None,
            messenger,
        }
    }

    /// Sets the command name as the user typed it.
    #[must_use]
    pub fn with_command_name(mut self, command_name: impl Into<String>) -> Self {
        self.command_name = command_name.into();
        self
    }

    /// Sets the argument tokens.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }

    /// Sets the parsed options.
    #[must_use]
    pub fn with_options(mut self, options: ParsedOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Returns the bot client that received the message.
    #[must_use]
    pub const fn client(&self) -> &BotClient {
        &self.client
    }

    /// Returns the triggering message.
    #[must_use]
    pub const fn message(&self) -> &ChatMessage {
        &self.message
    }

    /// Returns the prefix the message matched.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the matched command.
    #[must_use]
    pub fn command(&self) -> &CommandDefinition {
        &self.command
    }

    /// Returns the command name as typed, which may be an alias.
    #[must_use]
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Returns the argument tokens, `None` when no arguments were given.
    #[must_use]
    pub fn args(&self) -> Option<&[String]> {
        self.args.as_deref()
    }

    /// Returns the first argument token.
    #[must_use]
    pub fn first_arg(&self) -> Option<&str> {
        self.args
            .as_ref()
            .and_then(|args| args.first())
            .map(String::as_str)
    }

    /// Returns the parsed options of commands that parse options.
    #[must_use]
    pub const fn options(&self) -> Option<&ParsedOptions> {
        self.options.as_ref()
    }

    /// Returns the message text after the prefix.
    #[must_use]
    pub fn content_after_prefix(&self) -> &str {
        self.message
            .content
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(&self.message.content)
    }

    /// Returns the message text after the command name, or an empty string.
    #[must_use]
    pub fn content_after_command(&self) -> &str {
        self.content_after_prefix()
            .split_once(' ')
            .map_or("", |(_, rest)| rest)
    }

    /// Sends `text` to the channel the command was invoked in.
    ///
    /// # Errors
    ///
    /// Returns the messaging port's error when delivery fails.
    pub async fn reply(&self, text: &str) -> MessagingResult<MessageHandle> {
        self.messenger
            .send_reply(&self.client.id, &self.message.channel.id, text)
            .await
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("client", &self.client)
            .field("message", &self.message)
            .field("prefix", &self.prefix)
            .field("command", &self.command.name())
            .field("command_name", &self.command_name)
            .field("args", &self.args)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
