//! When steps for command dispatch BDD scenarios.

use rstest_bdd_macros::when;

use super::world::{DispatchWorld, run_async};

#[when(r#"the user sends "{content}""#)]
fn user_sends(world: &mut DispatchWorld, content: String) -> Result<(), eyre::Report> {
    let dispatcher = world.dispatcher();
    let outcome = run_async(dispatcher.handle(world.inbound(&content)))
        .map_err(|err| eyre::eyre!("dispatch task failed: {err}"))?;
    world.outcome = Some(outcome);
    Ok(())
}
