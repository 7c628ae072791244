//! Fluent construction of command definitions.

use futures_util::future::BoxFuture;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::warn;

use super::{
    Callback, CallbackResult, Capability, CommandContext, CommandDefinition,
    CommandDefinitionError, OptionSpec,
};

fn noop(_context: &CommandContext) -> BoxFuture<'_, CallbackResult> {
    Box::pin(async { Ok(()) })
}

/// Builds [`CommandDefinition`] values.
///
/// Defaults: no aliases, empty category and description, no option
/// parsing, no required capabilities, unsecured, the request is kept,
/// quotes are stripped, unlimited arguments and no-op callbacks.
///
/// ```
/// use herald::command::domain::{CommandBuilder, Capability};
///
/// let command = CommandBuilder::new("kick")
///     .in_category("moderation")
///     .requires([Capability::KickMembers])
///     .secured()
///     .build()
///     .expect("kick is a valid command");
/// assert!(command.is_secured());
/// ```
#[derive(Clone)]
pub struct CommandBuilder {
    name: String,
    aliases: BTreeSet<String>,
    category: String,
    description: String,
    option_spec: Option<OptionSpec>,
    required_capabilities: BTreeSet<Capability>,
    secured: bool,
    delete_request: bool,
    preserve_quotes: bool,
    argument_limit: usize,
    on_execute: Callback,
    on_bot_denied: Callback,
    on_author_denied: Callback,
}

impl CommandBuilder {
    /// Starts a command called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: BTreeSet::new(),
            category: String::new(),
            description: String::new(),
            option_spec: None,
            required_capabilities: BTreeSet::new(),
            secured: false,
            delete_request: false,
            preserve_quotes: false,
            argument_limit: 0,
            on_execute: Arc::new(noop),
            on_bot_denied: Arc::new(noop),
            on_author_denied: Arc::new(noop),
        }
    }

    /// Starts a command called `name` that also answers to `aliases`.
    #[must_use]
    pub fn with_aliases(
        name: impl Into<String>,
        aliases: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(name).aliased_by(aliases)
    }

    /// Replaces the alias set.
    #[must_use]
    pub fn aliased_by(mut self, aliases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the category used in the permission resource chain.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the description shown in help output.
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Parses arguments with `spec`.
    ///
    /// The help flag (`-h`, `--help`, `-?`) is registered and unknown flags
    /// are kept as positional arguments instead of failing the parse.
    #[must_use]
    pub fn parsed_by(mut self, spec: OptionSpec) -> Self {
        self.option_spec = Some(spec.accepting_help().allowing_unrecognized());
        self
    }

    /// Passes the raw remainder as a single argument instead of parsing it.
    #[must_use]
    pub fn non_parsed(mut self) -> Self {
        self.option_spec = None;
        self
    }

    /// Requires the author to hold `capabilities` in the channel.
    #[must_use]
    pub fn requires(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.required_capabilities = capabilities.into_iter().collect();
        self
    }

    /// Requires an explicit allow decision from the permission store.
    #[must_use]
    pub const fn secured(mut self) -> Self {
        self.secured = true;
        self
    }

    /// Deletes the triggering message after execution.
    #[must_use]
    pub const fn delete_request(mut self) -> Self {
        self.delete_request = true;
        self
    }

    /// Keeps quote characters in argument tokens.
    #[must_use]
    pub const fn preserve_quotes(mut self) -> Self {
        self.preserve_quotes = true;
        self
    }

    /// Caps the number of argument tokens; the remainder collapses into the
    /// last one. Zero means unlimited.
    #[must_use]
    pub const fn argument_limit(mut self, limit: usize) -> Self {
        self.argument_limit = limit;
        self
    }

    /// Sets the action run when the command executes.
    #[must_use]
    pub fn on_execute<F>(mut self, callback: F) -> Self
    where
        F: for<'a> Fn(&'a CommandContext) -> BoxFuture<'a, CallbackResult> + Send + Sync + 'static,
    {
        self.on_execute = Arc::new(callback);
        self
    }

    /// Sets the action run when the bot lacks a permission it needs.
    #[must_use]
    pub fn on_bot_denied<F>(mut self, callback: F) -> Self
    where
        F: for<'a> Fn(&'a CommandContext) -> BoxFuture<'a, CallbackResult> + Send + Sync + 'static,
    {
        self.on_bot_denied = Arc::new(callback);
        self
    }

    /// Sets the action run when the author may not execute the command.
    #[must_use]
    pub fn on_author_denied<F>(mut self, callback: F) -> Self
    where
        F: for<'a> Fn(&'a CommandContext) -> BoxFuture<'a, CallbackResult> + Send + Sync + 'static,
    {
        self.on_author_denied = Arc::new(callback);
        self
    }

    /// Validates the builder and produces the definition.
    ///
    /// # Errors
    ///
    /// Returns [`CommandDefinitionError::BlankName`] when the name is blank.
    pub fn build(self) -> Result<CommandDefinition, CommandDefinitionError> {
        if self.name.trim().is_empty() {
            return Err(CommandDefinitionError::BlankName);
        }

        let unreachable_keys: Vec<&String> = std::iter::once(&self.name)
            .chain(&self.aliases)
            .filter(|key| key.chars().any(char::is_uppercase))
            .collect();
        if !unreachable_keys.is_empty() {
            warn!(
                command = %self.name,
                keys = ?unreachable_keys,
                "Command keys with uppercase characters never match lower-cased input"
            );
        }

        let parameter_aliases = derive_parameter_aliases(self.option_spec.as_ref());
        Ok(CommandDefinition {
            name: self.name,
            aliases: self.aliases,
            category: self.category,
            description: self.description,
            option_spec: self.option_spec,
            parameter_aliases,
            required_capabilities: self.required_capabilities,
            secured: self.secured,
            delete_request: self.delete_request,
            preserve_quotes: self.preserve_quotes,
            argument_limit: self.argument_limit,
            on_execute: self.on_execute,
            on_bot_denied: self.on_bot_denied,
            on_author_denied: self.on_author_denied,
        })
    }
}

fn derive_parameter_aliases(spec: Option<&OptionSpec>) -> BTreeMap<String, String> {
    spec.map(|spec| {
        spec.recognized_names()
            .filter(|name| name.chars().count() > 1)
            .map(|name| (name.to_owned(), format!("--{name}")))
            .collect()
    })
    .unwrap_or_default()
}
