//! Persistent-flag merging: pull every ancestor's inheritable flags into
//! the target's local set before parsing.

use generational_arena::Index;
use tracing::instrument;

use crate::command::CommandTree;
use crate::flags::FlagRef;

/// Merge inheritable flags into `target`'s local flag set.
///
/// Climbs from the target to the root, collecting each persistent set on
/// the way (the target's own included), and appends every flag whose name
/// the local set has not claimed yet. Merged entries share storage with
/// the defining set, so values bound during parsing are visible to the
/// ancestor that declared the flag. First-claimed-wins: a local flag
/// shadows any inherited one, and a nearer ancestor beats a farther one.
/// Merging never fails and is idempotent.
#[instrument(level = "debug", skip(tree))]
pub fn merge_inherited(tree: &mut CommandTree, target: Index) {
    let mut pending: Vec<FlagRef> = Vec::new();
    let mut current = Some(target);
    while let Some(cur) = current {
        let Some(cmd) = tree.get(cur) else { break };
        if let Some(pflags) = cmd.persistent_flags() {
            pending.extend(pflags.entries().iter().cloned());
        }
        current = cmd.parent();
    }

    let Some(cmd) = tree.get_mut(target) else {
        return;
    };
    let flags = cmd.flags_mut();
    for flag in pending {
        let name = flag.borrow().name.clone();
        if flags.lookup(&name).is_none() {
            flags.add_flag(flag);
        }
    }
}
