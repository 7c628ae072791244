//! Registries per bot client and prefixes per guild.

use std::io;

use crate::in_memory_dispatch::helpers::{
    GUILD, Harness, client, echo_name, guild_message, harness, private_message, runtime,
};
use herald::command::{
    domain::{CommandBuilder, GuildId, PrefixScope},
    services::{DispatchOutcome, DispatcherConfig, IgnoreReason},
};
use rstest::rstest;
use tokio::runtime::Runtime;

#[rstest]
fn commands_are_isolated_per_client(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let first = client("bot-1");
    let second = client("bot-2");
    let ping = CommandBuilder::new("ping")
        .on_execute(echo_name)
        .build()
        .expect("ping is a valid command");
    harness.registry.register_all(&first.id, [ping]);
    let dispatcher = harness.dispatcher(&DispatcherConfig::default());

    let (handled, unknown) = rt.block_on(async {
        let handled = dispatcher
            .handle(guild_message(&first, "!ping"))
            .await
            .expect("dispatch task");
        let unknown = dispatcher
            .handle(guild_message(&second, "!ping"))
            .await
            .expect("dispatch task");
        (handled, unknown)
    });

    assert_eq!(handled, DispatchOutcome::Executed { succeeded: true });
    assert_eq!(unknown, DispatchOutcome::Ignored(IgnoreReason::NoCommandMatch));
    assert_eq!(harness.channel_replies(), vec!["ping via herald-bot-1"]);
    assert!(harness.registry.commands(&second.id).is_empty());
}

#[rstest]
fn guild_prefix_replaces_the_default(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    let ping = CommandBuilder::with_aliases("ping", ["p"])
        .on_execute(echo_name)
        .build()
        .expect("ping is a valid command");
    harness.registry.register_all(&bot.id, [ping]);
    harness
        .prefixes
        .set_prefixes(PrefixScope::Guild(GuildId::new(GUILD)), ["?", "herald "])
        .expect("prefix update");
    let dispatcher = harness.dispatcher(&DispatcherConfig::default());

    let outcomes = rt.block_on(async {
        let mut outcomes = Vec::new();
        for content in ["!ping", "?P", "herald ping"] {
            outcomes.push(dispatcher.dispatch(guild_message(&bot, content)).await);
        }
        outcomes
    });

    assert_eq!(
        outcomes,
        vec![
            DispatchOutcome::Ignored(IgnoreReason::NoPrefixMatch),
            DispatchOutcome::Executed { succeeded: true },
            DispatchOutcome::Executed { succeeded: true },
        ]
    );
    assert_eq!(
        harness.channel_replies(),
        vec!["P via herald-bot-1", "ping via herald-bot-1"]
    );
}

#[rstest]
fn private_messages_use_the_wildcard_prefixes(runtime: io::Result<Runtime>, harness: Harness) {
    let rt = runtime.expect("runtime");
    let bot = client("bot-1");
    let ping = CommandBuilder::new("ping")
        .on_execute(echo_name)
        .build()
        .expect("ping is a valid command");
    harness.registry.register_all(&bot.id, [ping]);
    harness
        .prefixes
        .set_prefixes(PrefixScope::Any, ["."])
        .expect("prefix update");
    let dispatcher = harness.dispatcher(&DispatcherConfig::default());

    let (private, guild) = rt.block_on(async {
        let private = dispatcher.dispatch(private_message(&bot, ".ping")).await;
        let guild = dispatcher.dispatch(guild_message(&bot, ".ping")).await;
        (private, guild)
    });

    assert_eq!(private, DispatchOutcome::Executed { succeeded: true });
    assert_eq!(guild, DispatchOutcome::Executed { succeeded: true });
    assert_eq!(harness.private_replies(), vec!["ping via herald-bot-1"]);
}
