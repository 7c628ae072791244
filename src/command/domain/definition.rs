//! Immutable command definitions.

use futures_util::future::BoxFuture;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{CallbackResult, Capability, CommandContext, OptionSpec};

/// Callback slot invoked with the per-dispatch invocation context.
pub type Callback =
    Arc<dyn for<'a> Fn(&'a CommandContext) -> BoxFuture<'a, CallbackResult> + Send + Sync>;

/// A registered bot command.
///
/// Definitions are built once through
/// [`CommandBuilder`](super::CommandBuilder) and never change afterwards.
/// Equality, ordering and hashing use the name only.
#[derive(Clone)]
pub struct CommandDefinition {
    pub(super) name: String,
    pub(super) aliases: BTreeSet<String>,
    pub(super) category: String,
    pub(super) description: String,
    pub(super) option_spec: Option<OptionSpec>,
    pub(super) parameter_aliases: BTreeMap<String, String>,
    pub(super) required_capabilities: BTreeSet<Capability>,
    pub(super) secured: bool,
    pub(super) delete_request: bool,
    pub(super) preserve_quotes: bool,
    pub(super) argument_limit: usize,
    pub(super) on_execute: Callback,
    pub(super) on_bot_denied: Callback,
    pub(super) on_author_denied: Callback,
}

impl CommandDefinition {
    /// Returns the command name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the alternate names.
    #[must_use]
    pub const fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    /// Returns the category, empty when unset.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the description, empty when unset.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the option-parsing capability, if the command parses options.
    #[must_use]
    pub const fn option_spec(&self) -> Option<&OptionSpec> {
        self.option_spec.as_ref()
    }

    /// Returns the bare-key to long-flag rewrites applied to tokens.
    #[must_use]
    pub const fn parameter_aliases(&self) -> &BTreeMap<String, String> {
        &self.parameter_aliases
    }

    /// Returns the capabilities the author must hold in the channel.
    #[must_use]
    pub const fn required_capabilities(&self) -> &BTreeSet<Capability> {
        &self.required_capabilities
    }

    /// Returns whether execution requires an explicit allow decision.
    #[must_use]
    pub const fn is_secured(&self) -> bool {
        self.secured
    }

    /// Returns whether the triggering message is deleted after execution.
    #[must_use]
    pub const fn deletes_request(&self) -> bool {
        self.delete_request
    }

    /// Returns whether the tokenizer keeps quote characters.
    #[must_use]
    pub const fn preserves_quotes(&self) -> bool {
        self.preserve_quotes
    }

    /// Returns the maximum number of argument tokens, 0 meaning unlimited.
    #[must_use]
    pub const fn argument_limit(&self) -> usize {
        self.argument_limit
    }

    /// Returns whether the command parses its arguments as options.
    #[must_use]
    pub fn parses_options(&self) -> bool {
        self.option_spec.as_ref().is_some_and(|spec| !spec.is_empty())
    }

    /// Returns whether a lower-cased user token selects this command.
    ///
    /// The token is compared with the name and the aliases exactly as
    /// stored, so a mixed-case alias never matches.
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.name == lowered || self.aliases.contains(lowered)
    }

    /// Returns the callback run when the command executes.
    #[must_use]
    pub const fn on_execute(&self) -> &Callback {
        &self.on_execute
    }

    /// Returns the callback run when the bot lacks a permission.
    #[must_use]
    pub const fn on_bot_denied(&self) -> &Callback {
        &self.on_bot_denied
    }

    /// Returns the callback run when the author is denied.
    #[must_use]
    pub const fn on_author_denied(&self) -> &Callback {
        &self.on_author_denied
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .field("description", &self.description)
            .field("option_spec", &self.option_spec)
            .field("parameter_aliases", &self.parameter_aliases)
            .field("required_capabilities", &self.required_capabilities)
            .field("secured", &self.secured)
            .field("delete_request", &self.delete_request)
            .field("preserve_quotes", &self.preserve_quotes)
            .field("argument_limit", &self.argument_limit)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CommandDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CommandDefinition {}

impl PartialOrd for CommandDefinition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CommandDefinition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for CommandDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
