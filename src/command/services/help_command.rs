//! Built-in `help` command listing the commands an author may run.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use super::{CommandRegistry, DispatchPorts, DispatcherConfig, HelpReplier, command_help};
use crate::command::{
    domain::{
        CallbackError, CallbackResult, Capability, CommandBuilder, CommandContext,
        CommandDefinition, CommandDefinitionError, EXECUTE_OPERATION, OptionDescriptor,
        OptionSpec, evaluate_access, resource_chain,
    },
    ports::{ChannelCapabilities, PermissionResolver},
};

/// Name of the built-in help command.
pub const HELP_COMMAND_NAME: &str = "help";

const FULL_FLAG: &str = "full";
const NAME_COLUMN: usize = 20;

struct HelpCatalog {
    registry: Weak<CommandRegistry>,
    permissions: Arc<dyn PermissionResolver>,
    capabilities: Arc<dyn ChannelCapabilities>,
    replier: HelpReplier,
}

impl HelpCatalog {
    async fn respond(&self, context: &CommandContext) -> CallbackResult {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| CallbackError::message("command registry is no longer available"))?;
        let commands = registry.commands(&context.client().id);

        let capabilities = self
            .capabilities
            .capabilities_of(
                &context.client().id,
                &context.message().channel,
                &context.message().author,
            )
            .await
            .map_err(CallbackError::failed)?;
        let mut available: Vec<&CommandDefinition> = Vec::new();
        for command in commands.iter() {
            if self.may_execute(context, command, &capabilities).await? {
                available.push(command);
            }
        }
        available.sort_by(|left, right| left.name().cmp(right.name()));

        let full = context
            .options()
            .is_some_and(|options| options.has(FULL_FLAG));
        let keys = context
            .options()
            .map(|options| options.positionals())
            .unwrap_or_default();

        let response = if keys.is_empty() {
            list_commands(&available, full, context.prefix())
        } else {
            describe_requested(&available, keys)
        };
        self.replier
            .reply_privately(context, &response)
            .await
            .map_err(CallbackError::from)
    }

    async fn may_execute(
        &self,
        context: &CommandContext,
        command: &CommandDefinition,
        capabilities: &BTreeSet<Capability>,
    ) -> Result<bool, CallbackError> {
        let decisions = self
            .permissions
            .check(context.message(), EXECUTE_OPERATION, &resource_chain(command))
            .await
            .map_err(CallbackError::failed)?;
        Ok(evaluate_access(command, &decisions, capabilities).can_execute())
    }
}

fn list_commands(available: &[&CommandDefinition], full: bool, prefix: &str) -> String {
    if full {
        let mut text = String::from("*Commands available to you*\n");
        for command in available {
            let label = format!("**{}**", command.name());
            text.push_str(&format!(
                "{label:<NAME_COLUMN$}\t\t{}\n",
                command.description()
            ));
        }
        text
    } else {
        let names: Vec<&str> = available.iter().map(|command| command.name()).collect();
        format!(
            "*Commands available to you*: {} (more with `{prefix}{HELP_COMMAND_NAME} {FULL_FLAG}`)",
            names.join(", ")
        )
    }
}

fn describe_requested(available: &[&CommandDefinition], keys: &[String]) -> String {
    let requested: Vec<String> = available
        .iter()
        .filter(|command| is_requested(command, keys))
        .map(|command| command_help(command, None))
        .collect();
    if requested.is_empty() {
        format!("No command available to you matches {}", keys.join(", "))
    } else {
        requested.concat()
    }
}

fn is_requested(command: &CommandDefinition, keys: &[String]) -> bool {
    let name = command.name().to_lowercase();
    keys.iter().any(|key| {
        let lowered = key.to_lowercase();
        lowered == name
            || command
                .aliases()
                .iter()
                .any(|alias| lowered.contains(alias.to_lowercase().as_str()))
    })
}

/// Builds the `help` command for `registry`.
///
/// Without arguments it lists the names of the commands the author may
/// execute; `--full` adds their descriptions and naming commands shows
/// their option help. Replies always go to the author's private channel.
///
/// The command keeps a weak reference to `registry`, so registering it in
/// that same registry creates no cycle.
///
/// # Errors
///
/// Propagates [`CommandDefinitionError`] from the builder.
pub fn help_command(
    registry: &Arc<CommandRegistry>,
    ports: &DispatchPorts,
    config: &DispatcherConfig,
) -> Result<CommandDefinition, CommandDefinitionError> {
    let catalog = Arc::new(HelpCatalog {
        registry: Arc::downgrade(registry),
        permissions: Arc::clone(&ports.permissions),
        capabilities: Arc::clone(&ports.capabilities),
        replier: HelpReplier::new(Arc::clone(&ports.messenger), config),
    });
    CommandBuilder::new(HELP_COMMAND_NAME)
        .in_category("General")
        .described_as("Show help about commands")
        .parsed_by(
            OptionSpec::new()
                .with_option(OptionDescriptor::new([FULL_FLAG], "Show command descriptions"))
                .with_positional("Command to get help about"),
        )
        .on_execute(move |context| {
            let shared = Arc::clone(&catalog);
            Box::pin(async move { shared.respond(context).await })
        })
        .build()
}
