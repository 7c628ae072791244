//! Given steps for command dispatch BDD scenarios.

use std::sync::Arc;

use eyre::WrapErr;
use herald::command::{
    adapters::memory::InMemoryPrefixStore,
    domain::{
        CommandBuilder, Decision, EXECUTE_OPERATION, OptionArgument, OptionDescriptor,
        OptionSpec, UserId, ValueType,
    },
    services::help_command,
};
use rstest_bdd_macros::given;

use super::world::{AUTHOR, DispatchWorld, kick_user, refuse_kick};

fn kick() -> CommandBuilder {
    CommandBuilder::new("kick")
        .in_category("moderation")
        .described_as("Kick a member")
        .parsed_by(
            OptionSpec::new()
                .with_option(
                    OptionDescriptor::new(["r", "reason"], "Reason for the kick")
                        .with_argument(OptionArgument::required(ValueType::String)),
                )
                .with_positional("User to kick"),
        )
        .on_execute(kick_user)
        .on_author_denied(refuse_kick)
}

#[given(r#"a dispatcher with the default prefix "{prefix}""#)]
fn dispatcher_with_prefix(world: &mut DispatchWorld, prefix: String) {
    world.prefixes = Arc::new(InMemoryPrefixStore::new([prefix]));
}

#[given(r#"a registered "{name}" command that replies "{reply}""#)]
fn registered_replying_command(
    world: &mut DispatchWorld,
    name: String,
    reply: String,
) -> Result<(), eyre::Report> {
    let command = CommandBuilder::new(name)
        .on_execute(move |context| {
            let text = reply.clone();
            Box::pin(async move {
                context.reply(&text).await?;
                Ok(())
            })
        })
        .build()
        .wrap_err("build replying command")?;
    world.registry.register_all(&world.bot.id, [command]);
    Ok(())
}

#[given("a registered kick command")]
fn registered_kick(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let command = kick().build().wrap_err("build kick command")?;
    world.registry.register_all(&world.bot.id, [command]);
    Ok(())
}

#[given("a registered secured kick command")]
fn registered_secured_kick(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let command = kick().secured().build().wrap_err("build secured kick command")?;
    world.registry.register_all(&world.bot.id, [command]);
    Ok(())
}

#[given("a registered secured ban command")]
fn registered_secured_ban(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let command = CommandBuilder::new("ban")
        .in_category("moderation")
        .secured()
        .build()
        .wrap_err("build ban command")?;
    world.registry.register_all(&world.bot.id, [command]);
    Ok(())
}

#[given(r#"the author is allowed to run "{resource}""#)]
fn author_allowed(world: &mut DispatchWorld, resource: String) -> Result<(), eyre::Report> {
    world
        .permissions
        .grant_user(UserId::new(AUTHOR), EXECUTE_OPERATION, &resource, Decision::Allow)
        .wrap_err("grant allow decision")
}

#[given("the help command is registered")]
fn help_registered(world: &mut DispatchWorld) -> Result<(), eyre::Report> {
    let command = help_command(&world.registry, &world.ports(), &world.config)
        .wrap_err("build help command")?;
    world.registry.register_all(&world.bot.id, [command]);
    Ok(())
}
