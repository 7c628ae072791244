//! Permission decisions and channel capabilities end to end.

use std::io;

use crate::in_memory_dispatch::helpers::{
    AUTHOR, CHANNEL, Harness, client, echo_name, guild_message, harness, refuse, runtime,
};
use herald::command::{
    domain::{
        Capability, ChannelId, CommandBuilder, Decision, EXECUTE_OPERATION, UserId,
        WILDCARD_RESOURCE,
    },
    services::{DispatchOutcome, DispatcherConfig},
};
use rstest::rstest;
use tokio::runtime::Runtime;

#[rstest]
fn required_capability_gates_execution(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    let purge = CommandBuilder::new("purge")
        .requires([Capability::ManageMessages])
        .on_execute(echo_name)
        .on_author_denied(refuse)
        .build()
        .expect("purge is a valid command");
    harness.registry.register_all(&bot.id, [purge]);
    let dispatcher = harness.dispatcher(&DispatcherConfig::default());

    let refused = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!purge")));
    harness
        .capabilities
        .assign(
            ChannelId::new(CHANNEL),
            UserId::new(AUTHOR),
            [Capability::ManageMessages, Capability::SendMessages],
        )
        .expect("capability assignment");
    let granted = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!purge")));

    assert_eq!(refused, DispatchOutcome::AuthorDenied);
    assert_eq!(granted, DispatchOutcome::Executed { succeeded: true });
    assert_eq!(
        harness.channel_replies(),
        vec!["refused", "purge via herald-bot-1"]
    );
}

#[rstest]
fn wildcard_deny_overrides_a_command_allow(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    let ping = CommandBuilder::new("ping")
        .secured()
        .on_execute(echo_name)
        .on_author_denied(refuse)
        .build()
        .expect("ping is a valid command");
    harness.registry.register_all(&bot.id, [ping]);
    harness
        .permissions
        .grant_user(UserId::new(AUTHOR), EXECUTE_OPERATION, "ping", Decision::Allow)
        .expect("grant allow");
    let dispatcher = harness.dispatcher(&DispatcherConfig::default());

    let allowed = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!ping")));
    harness
        .permissions
        .grant_everyone(EXECUTE_OPERATION, WILDCARD_RESOURCE, Decision::Deny)
        .expect("grant deny");
    let denied = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!ping")));

    assert_eq!(allowed, DispatchOutcome::Executed { succeeded: true });
    assert_eq!(denied, DispatchOutcome::AuthorDenied);
}

#[rstest]
fn denied_author_never_reaches_the_execute_callback(
    runtime: io::Result<Runtime>,
    harness: Harness,
) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    let wipe = CommandBuilder::new("wipe")
        .secured()
        .delete_request()
        .on_execute(echo_name)
        .build()
        .expect("wipe is a valid command");
    harness.registry.register_all(&bot.id, [wipe]);
    let dispatcher = harness.dispatcher(&DispatcherConfig::default());

    let outcome = rt.block_on(dispatcher.dispatch(guild_message(&bot, "!wipe all")));

    assert_eq!(outcome, DispatchOutcome::AuthorDenied);
    assert!(harness.messenger.sent().is_empty());
    assert!(harness.messenger.deleted().is_empty());
}
