//! Debug inspection of command trees: termtree rendering and the
//! recursive flag dump.

use std::collections::HashSet;

use generational_arena::Index;
use termtree::Tree;

use crate::command::CommandTree;

impl CommandTree {
    /// Render the command hierarchy as a printable tree of
    /// `name :: short` labels.
    pub fn to_tree_string(&self) -> Tree<String> {
        if let Some(root_idx) = self.root() {
            let mut tree = Tree::new(label(self, root_idx));

            fn build_tree(tree: &CommandTree, node_idx: Index, parent_tree: &mut Tree<String>) {
                if let Some(node) = tree.get(node_idx) {
                    for &child_idx in node.children() {
                        if tree.get(child_idx).is_some() {
                            let mut child_tree = Tree::new(label(tree, child_idx));
                            build_tree(tree, child_idx, &mut child_tree);
                            parent_tree.push(child_tree);
                        }
                    }
                }
            }

            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("empty tree".to_string())
        }
    }
}

fn label(tree: &CommandTree, idx: Index) -> String {
    match tree.get(idx) {
        Some(cmd) if cmd.short.is_empty() => cmd.name().to_string(),
        Some(cmd) => format!("{} :: {}", cmd.name(), cmd.short),
        None => String::new(),
    }
}

/// Dump every flag assigned in the subtree rooted at `idx`, one command
/// path per block, with `[L]` / `[P]` / `[LP]` markers for local,
/// persistent, and locally-registered-and-persistent flags.
pub fn debug_flags(tree: &CommandTree, idx: Index) -> String {
    let mut out = String::new();
    walk(tree, idx, &mut out);
    out
}

fn walk(tree: &CommandTree, idx: Index, out: &mut String) {
    let Some(cmd) = tree.get(idx) else { return };
    if cmd.has_flags() || cmd.has_persistent_flags() {
        out.push_str(&format!("{}\n", tree.command_path(idx)));
    }
    let mut listed = HashSet::new();
    if let Some(flags) = cmd.local_flags() {
        flags.visit_all(|flag| {
            let persistent = cmd
                .persistent_flags()
                .and_then(|p| p.lookup(&flag.name))
                .is_some();
            let marker = if persistent { "[LP]" } else { "[L]" };
            listed.insert(flag.name.clone());
            out.push_str(&format!(
                "  {} [{}] {} {}\n",
                flag_lead(flag.shorthand, &flag.name),
                flag.default,
                flag.value,
                marker
            ));
        });
    }
    if let Some(pflags) = cmd.persistent_flags() {
        pflags.visit_all(|flag| {
            if listed.contains(&flag.name) {
                return;
            }
            out.push_str(&format!(
                "  {} [{}] {} [P]\n",
                flag_lead(flag.shorthand, &flag.name),
                flag.default,
                flag.value
            ));
        });
    }
    for &child in cmd.children() {
        walk(tree, child, out);
    }
}

fn flag_lead(shorthand: Option<char>, name: &str) -> String {
    match shorthand {
        Some(c) => format!("-{}, --{}", c, name),
        None => format!("--{}", name),
    }
}
