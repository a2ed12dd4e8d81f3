//! status command - Show each tree's checkout state

use super::Context;
use crate::git::{Git, GitError};
use crate::sync::TrackedTree;
use anyhow::Result;

/// Print one block per tree. Never modifies anything.
///
/// Always returns 0; a missing checkout is a state, not an error.
pub fn status(ctx: &Context) -> Result<i32> {
    for tree in ctx.config.trees().into_iter().map(TrackedTree::from) {
        println!("{}", describe(&tree));
    }
    Ok(0)
}

fn describe(tree: &TrackedTree) -> String {
    let mut lines = vec![format!("{} ({})", tree.name, tree.path.display())];

    let git = match Git::open(&tree.path) {
        Ok(git) => git,
        Err(GitError::NotARepo { .. }) => {
            lines.push("  checkout: missing".to_string());
            return lines.join("\n");
        }
        Err(err) => {
            lines.push(format!("  checkout: unusable ({err})"));
            return lines.join("\n");
        }
    };

    match git.info() {
        Ok(info) => lines.push(format!("  checkout: {}", info.work_dir.display())),
        Err(err) => lines.push(format!("  checkout: unusable ({err})")),
    }

    let remote = match git.remote_url(tree.remote.as_str()) {
        Ok(Some(url)) => url,
        Ok(None) => "(not configured)".to_string(),
        Err(err) => format!("(error: {err})"),
    };
    lines.push(format!("  remote:   {} {remote}", tree.remote));

    let head = git
        .head_oid()
        .map(|oid| oid.short(7).to_string())
        .unwrap_or_else(|_| "(none)".to_string());
    lines.push(format!("  head:     {head}"));

    let target = match git.try_resolve_reference(tree.reference.as_str()) {
        Ok(Some(oid)) => oid.short(7).to_string(),
        Ok(None) => "(not fetched)".to_string(),
        Err(err) => format!("(error: {err})"),
    };
    lines.push(format!("  {}: {target}", tree.reference));

    let state = match git.worktree_status(true) {
        Ok(s) => format!(
            "{}, {} untracked",
            if s.is_clean() { "clean" } else { "modified" },
            s.untracked
        ),
        Err(err) => format!("unknown ({err})"),
    };
    lines.push(format!("  worktree: {state}"));

    lines.join("\n")
}
