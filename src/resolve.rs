//! Command-tree resolution: match an argument list to the most specific
//! runnable command.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::command::CommandTree;
use crate::errors::DispatchError;

/// Walk the tree from the root to find the target command for `args`.
///
/// Returns the target and the residual arguments, `Ok(None)` when no
/// runnable command matched (the caller decides how to surface that), or
/// an error when the tree has no root at all.
#[instrument(level = "debug", skip(tree))]
pub fn find(
    tree: &CommandTree,
    args: &[String],
) -> Result<Option<(Index, Vec<String>)>, DispatchError> {
    let Some(root) = tree.root() else {
        return Err(DispatchError::EmptyTree);
    };
    Ok(find_from(tree, root, args))
}

/// Descend into the first child (insertion order) whose name equals the
/// leading token, as long as more than one token remains. A node that
/// matches nothing further is the target if it is runnable; every
/// remaining token, subcommand-shaped or not, is passed through for its
/// flag parser to interpret.
fn find_from(tree: &CommandTree, node: Index, args: &[String]) -> Option<(Index, Vec<String>)> {
    let cmd = tree.get(node)?;
    if args.len() > 1 && cmd.has_children() {
        for &child in cmd.children() {
            let matched = tree.get(child).is_some_and(|c| c.name() == args[0]);
            if matched {
                return find_from(tree, child, &args[1..]);
            }
        }
    }
    if cmd.is_runnable() {
        debug!(command = %cmd.name(), residual = args.len(), "resolved command");
        return Some((node, args.to_vec()));
    }
    None
}
