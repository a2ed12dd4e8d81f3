//! reset command - Hard-reset trees from local history

use super::{selected_trees, Context};
use crate::sync::RepositoryResetter;
use crate::ui::output;
use anyhow::Result;

/// Reset the named trees (all when `names` is empty) without fetching.
///
/// Returns 1 if any tree could not be reset.
pub fn reset(ctx: &Context, names: &[String]) -> Result<i32> {
    let trees = selected_trees(ctx, names)?;
    let resetter = RepositoryResetter::new();
    let mut failed = 0;

    for tree in &trees {
        match resetter.try_reset(&tree.path, &tree.reference) {
            Ok(oid) => output::print(
                format!("{} reset to {} ({})", tree.name, tree.reference, oid.short(7)),
                ctx.verbosity,
            ),
            Err(err) => {
                failed += 1;
                output::error(format!("{}: {err}", tree.name));
            }
        }
    }

    Ok(if failed > 0 { 1 } else { 0 })
}
