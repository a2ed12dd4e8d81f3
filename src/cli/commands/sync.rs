//! sync command - Fetch and hard-reset trees

use super::{selected_trees, Context};
use crate::sync::RepositorySynchronizer;
use crate::ui::output;
use anyhow::Result;

/// Synchronize the named trees (all when `names` is empty).
///
/// Every selected tree is attempted. Returns 1 if any failed.
pub fn sync(ctx: &Context, names: &[String]) -> Result<i32> {
    let trees = selected_trees(ctx, names)?;
    let mut synchronizer = RepositorySynchronizer::new(ctx.config.progress_interval());
    let verbosity = ctx.verbosity;
    let mut failed = 0;

    for tree in &trees {
        output::print(
            format!("Synchronizing {} with {} ({})", tree.name, tree.remote, tree.reference),
            verbosity,
        );
        match synchronizer.synchronize_tree(tree, &mut |p| output::print(p, verbosity)) {
            Ok(oid) => output::print(format!("  {} is at {}", tree.name, oid.short(7)), verbosity),
            Err(err) => {
                failed += 1;
                output::error_chain(&err, verbosity);
            }
        }
    }

    if failed > 0 {
        output::error(format!("{failed} of {} trees failed to synchronize", trees.len()));
        return Ok(1);
    }
    Ok(0)
}
