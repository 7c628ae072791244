//! Message-to-command dispatch pipeline.
//!
//! Every inbound message is processed as its own task: resolve prefixes,
//! match a command, check access, parse arguments, then run the command's
//! callbacks. A semaphore bounds how many dispatches run at once, and a
//! failure or panic in one dispatch never reaches the caller or any other
//! dispatch.

use futures_util::FutureExt;
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{Instrument, info, info_span, trace, warn};

use super::{CommandRegistry, DispatcherConfig, HelpReplier, command_help};
use crate::command::{
    domain::{
        AccessVerdict, BotClient, Callback, ChatMessage, CommandContext, CommandDefinition,
        DispatchId, EXECUTE_OPERATION, HELP_OPTION, InboundMessage, evaluate_access,
        resource_chain, split_arguments,
    },
    ports::{
        CapabilityLookupError, ChannelCapabilities, Messenger, PermissionError,
        PermissionResolver, PrefixStore,
    },
};

/// Collaborators the dispatcher consults for every message.
#[derive(Clone)]
pub struct DispatchPorts {
    /// Command prefixes per guild.
    pub prefixes: Arc<dyn PrefixStore>,
    /// Stored allow and deny decisions.
    pub permissions: Arc<dyn PermissionResolver>,
    /// Effective channel capabilities of users.
    pub capabilities: Arc<dyn ChannelCapabilities>,
    /// Outbound chat messaging.
    pub messenger: Arc<dyn Messenger>,
}

impl fmt::Debug for DispatchPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchPorts").finish_non_exhaustive()
    }
}

/// Why a message was not treated as a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The content starts with none of the configured prefixes.
    NoPrefixMatch,
    /// The token after the prefix names no registered command.
    NoCommandMatch,
}

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The message was not a command.
    Ignored(IgnoreReason),
    /// The author may not execute the command; the author-denied callback ran.
    AuthorDenied,
    /// The arguments did not parse; a help reply was attempted.
    UsageError,
    /// The author asked for help; a help reply was attempted.
    HelpRequested,
    /// The execute callback ran.
    Executed {
        /// Whether the callback completed without error.
        succeeded: bool,
    },
    /// A collaborator failed or the dispatch panicked; no command callback
    /// completed.
    Aborted,
}

#[derive(Debug, Error)]
enum AccessLookupError {
    #[error(transparent)]
    Permission(#[from] PermissionError),
    #[error(transparent)]
    Capability(#[from] CapabilityLookupError),
}

#[derive(Debug, Clone, Copy)]
enum CallbackSlot {
    Execute,
    BotDenied,
    AuthorDenied,
}

impl CallbackSlot {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Execute => "on_execute",
            Self::BotDenied => "on_bot_denied",
            Self::AuthorDenied => "on_author_denied",
        }
    }

    const fn select(self, command: &CommandDefinition) -> &Callback {
        match self {
            Self::Execute => command.on_execute(),
            Self::BotDenied => command.on_bot_denied(),
            Self::AuthorDenied => command.on_author_denied(),
        }
    }
}

/// Routes chat messages to registered commands.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
    ports: DispatchPorts,
    help: HelpReplier,
    permits: Arc<Semaphore>,
}

impl CommandDispatcher {
    /// Creates a dispatcher over `registry` using `ports`.
    ///
    /// The concurrency bound is clamped to at least one permit and the help
    /// chunk size to at least
    /// [`MIN_MESSAGE_LENGTH`](super::MIN_MESSAGE_LENGTH).
    #[must_use]
    pub fn new(
        registry: Arc<CommandRegistry>,
        ports: DispatchPorts,
        config: &DispatcherConfig,
    ) -> Self {
        let permits = config
            .max_concurrent_dispatches
            .clamp(1, Semaphore::MAX_PERMITS);
        let help = HelpReplier::new(Arc::clone(&ports.messenger), config);
        Self {
            registry,
            ports,
            help,
            permits: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Returns the registry consulted for command lookup.
    #[must_use]
    pub const fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Schedules `inbound` for dispatch and returns immediately.
    ///
    /// Must be called from within a Tokio runtime. The handle resolves to
    /// the dispatch outcome; dropping it does not cancel the dispatch.
    #[must_use = "the handle is the only way to observe the dispatch outcome"]
    pub fn handle(&self, inbound: InboundMessage) -> JoinHandle<DispatchOutcome> {
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.dispatch(inbound).await })
    }

    /// Dispatches `inbound` on the current task.
    ///
    /// Waits for a free permit first. Panics raised while processing are
    /// caught, logged and reported as [`DispatchOutcome::Aborted`].
    pub async fn dispatch(&self, inbound: InboundMessage) -> DispatchOutcome {
        let dispatch = DispatchId::new();
        let span = info_span!(
            "dispatch",
            id = %dispatch,
            bot = %inbound.client.name,
            channel = %inbound.message.channel.id
        );
        async move {
            let Ok(_permit) = Arc::clone(&self.permits).acquire_owned().await else {
                warn!("Dispatch pool is closed, dropping message");
                return DispatchOutcome::Aborted;
            };
            match AssertUnwindSafe(self.process(inbound))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(panic) => {
                    warn!(
                        panic = %panic_message(panic.as_ref()),
                        "Command dispatch terminated abnormally"
                    );
                    DispatchOutcome::Aborted
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn process(&self, inbound: InboundMessage) -> DispatchOutcome {
        let InboundMessage { client, message } = inbound;

        let scope = message.channel.prefix_scope();
        let prefixes = match self.ports.prefixes.prefixes(&scope).await {
            Ok(prefixes) => prefixes,
            Err(err) => {
                warn!(scope = %scope, error = %err, "Could not resolve command prefixes");
                return DispatchOutcome::Aborted;
            }
        };
        let Some(prefix) = select_prefix(&prefixes, &message.content) else {
            trace!("Message matches no prefix");
            return DispatchOutcome::Ignored(IgnoreReason::NoPrefixMatch);
        };

        let after_prefix = message.content.get(prefix.len()..).unwrap_or_default();
        let typed_name = after_prefix.split(' ').next().unwrap_or_default().to_owned();
        let Some(command) = self.registry.find(&client.id, &typed_name) else {
            trace!(command = %typed_name, "Message matches no command");
            return DispatchOutcome::Ignored(IgnoreReason::NoCommandMatch);
        };
        let remainder = after_prefix
            .get(typed_name.len()..)
            .and_then(|rest| rest.strip_prefix(' '))
            .filter(|rest| !rest.is_empty())
            .map(str::to_owned);

        let verdict = match self.authorize(&client, &message, &command).await {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(
                    command = %command.name(),
                    user = %message.author,
                    error = %err,
                    "Could not evaluate command access"
                );
                return DispatchOutcome::Aborted;
            }
        };

        let context = CommandContext::new(
            client,
            message,
            prefix,
            Arc::clone(&command),
            Arc::clone(&self.ports.messenger),
        )
        .with_command_name(typed_name);

        if !verdict.can_execute() {
            info!(
                user = %context.message().author,
                command = %command.name(),
                permitted = verdict.permitted,
                capable = verdict.capable,
                "User was denied command execution"
            );
            run_callback(CallbackSlot::AuthorDenied, &context).await;
            return DispatchOutcome::AuthorDenied;
        }

        let prepared = match command.option_spec() {
            Some(spec) if command.parses_options() => {
                let tokens = remainder
                    .as_deref()
                    .map(|raw| {
                        split_arguments(
                            raw,
                            command.argument_limit(),
                            !command.preserves_quotes(),
                            command.parameter_aliases(),
                        )
                    })
                    .unwrap_or_default();
                let parsed = spec.parse(&tokens);
                let with_args = if remainder.is_some() {
                    context.with_args(tokens)
                } else {
                    context
                };
                match parsed {
                    Ok(options) => with_args.with_options(options),
                    Err(usage) => {
                        info!(
                            user = %with_args.message().author,
                            command = %command.name(),
                            error = %usage,
                            "Failed to parse command arguments"
                        );
                        self.send_help(&with_args, Some(&usage.to_string())).await;
                        return DispatchOutcome::UsageError;
                    }
                }
            }
            _ => match remainder {
                Some(raw) => context.with_args(vec![raw]),
                None => context,
            },
        };

        if prepared.options().is_some_and(|options| options.has(HELP_OPTION)) {
            info!(
                user = %prepared.message().author,
                command = %command.name(),
                "User requested command help"
            );
            self.send_help(&prepared, None).await;
            return DispatchOutcome::HelpRequested;
        }

        info!(
            user = %prepared.message().author,
            command = %command.name(),
            args = ?prepared.args(),
            "User executing command"
        );
        let succeeded = run_callback(CallbackSlot::Execute, &prepared).await;
        if command.deletes_request() {
            self.delete_request(&prepared).await;
        }
        info!(
            user = %prepared.message().author,
            command = %command.name(),
            succeeded,
            "User completed command execution"
        );
        DispatchOutcome::Executed { succeeded }
    }

    async fn authorize(
        &self,
        client: &BotClient,
        message: &ChatMessage,
        command: &CommandDefinition,
    ) -> Result<AccessVerdict, AccessLookupError> {
        let decisions = self
            .ports
            .permissions
            .check(message, EXECUTE_OPERATION, &resource_chain(command))
            .await?;
        let capabilities = if command.required_capabilities().is_empty() {
            BTreeSet::new()
        } else {
            self.ports
                .capabilities
                .capabilities_of(&client.id, &message.channel, &message.author)
                .await?
        };
        Ok(evaluate_access(command, &decisions, &capabilities))
    }

    async fn delete_request(&self, context: &CommandContext) {
        let handle = context.message().handle();
        match self
            .ports
            .messenger
            .delete_message(&context.client().id, &handle)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_missing_permissions() => {
                warn!(
                    bot = %context.client(),
                    channel = %context.message().channel,
                    error = %err,
                    "Missing permissions to delete the request"
                );
                run_callback(CallbackSlot::BotDenied, context).await;
            }
            Err(err) => {
                warn!(
                    bot = %context.client(),
                    channel = %context.message().channel,
                    error = %err,
                    "Failed to delete the request"
                );
            }
        }
    }

    async fn send_help(&self, context: &CommandContext, comment: Option<&str>) {
        let text = command_help(context.command(), comment);
        if let Err(err) = self.help.reply(context, &text).await {
            warn!(
                bot = %context.client(),
                user = %context.message().author,
                command = %context.command().name(),
                error = %err,
                "Could not deliver command help"
            );
        }
    }
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("registry", &self.registry)
            .field("help", &self.help)
            .field("available_permits", &self.permits.available_permits())
            .finish_non_exhaustive()
    }
}

/// Runs one callback slot, containing its errors and panics.
async fn run_callback(slot: CallbackSlot, context: &CommandContext) -> bool {
    let callback = Arc::clone(slot.select(context.command()));
    let result = AssertUnwindSafe(async { callback(context).await })
        .catch_unwind()
        .await;
    let failure = match result {
        Ok(Ok(())) => return true,
        Ok(Err(err)) => err.to_string(),
        Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
    };
    warn!(
        bot = %context.client(),
        user = %context.message().author,
        command = %context.command().name(),
        callback = slot.as_str(),
        error = %failure,
        "Command callback failed"
    );
    false
}

/// Picks the longest non-empty prefix `content` starts with.
fn select_prefix(prefixes: &BTreeSet<String>, content: &str) -> Option<String> {
    prefixes
        .iter()
        .filter(|prefix| !prefix.is_empty() && content.starts_with(prefix.as_str()))
        .max_by_key(|prefix| prefix.len())
        .cloned()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}
