//! launch command - Supervised start of the configured program

use super::Context;
use crate::launcher::{LaunchSupervisor, SystemRunner};
use crate::ui::output;
use anyhow::Result;

/// Prepare trees, run the program and repair on failure.
///
/// Returns the program's final exit code.
pub fn launch(ctx: &Context) -> Result<i32> {
    let mut supervisor = LaunchSupervisor::from_config(&ctx.config, SystemRunner, ctx.verbosity);
    let outcome = supervisor.launch();

    if outcome.retried() {
        output::debug(
            format!(
                "relaunched after repair; final exit code {}",
                outcome.exit_code
            ),
            ctx.verbosity,
        );
    }
    if outcome.rescued {
        output::debug("rescue command ran", ctx.verbosity);
    }

    Ok(outcome.exit_code)
}
