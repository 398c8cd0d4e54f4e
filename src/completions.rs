//! Zsh completion script generation.
//!
//! Emits a `#compdef` script with one function per command: `_arguments`
//! specs for every flag visible at that command, a describe block for
//! subcommands, and dispatch into per-subcommand functions. Hidden
//! commands and unlisted flags are left out.

use generational_arena::Index;

use crate::command::CommandTree;
use crate::flags::{Flag, FlagRef};

/// Generate the zsh completion script for the whole tree.
pub fn zsh_completion(tree: &CommandTree) -> String {
    let Some(root) = tree.root() else {
        return String::new();
    };
    let name = tree
        .get(root)
        .map(|cmd| cmd.name().to_string())
        .unwrap_or_default();
    let mut out = String::new();
    out.push_str(&format!("#compdef _{} {}\n", name, name));
    write_command_function(tree, root, &mut out);
    out
}

/// Every flag parseable at `idx`: local flags, the node's own persistent
/// flags, then each ancestor's persistent flags, de-duplicated by name
/// with the nearest definition winning.
pub fn extract_flags(tree: &CommandTree, idx: Index) -> Vec<FlagRef> {
    fn claim(flag: &FlagRef, flags: &mut Vec<FlagRef>) {
        let name = flag.borrow().name.clone();
        let taken = flags.iter().any(|f| f.borrow().name == name);
        if !taken {
            flags.push(FlagRef::clone(flag));
        }
    }

    let mut flags: Vec<FlagRef> = Vec::new();

    if let Some(cmd) = tree.get(idx) {
        if let Some(local) = cmd.local_flags() {
            for flag in local.entries() {
                claim(flag, &mut flags);
            }
        }
    }
    let mut current = Some(idx);
    while let Some(cur) = current {
        let Some(cmd) = tree.get(cur) else { break };
        if let Some(pflags) = cmd.persistent_flags() {
            for flag in pflags.entries() {
                claim(flag, &mut flags);
            }
        }
        current = cmd.parent();
    }
    flags
}

fn function_name(tree: &CommandTree, idx: Index) -> String {
    format!("_{}", tree.command_path(idx).replace(' ', "_"))
}

fn write_command_function(tree: &CommandTree, idx: Index, out: &mut String) {
    let Some(cmd) = tree.get(idx) else { return };
    let visible_children: Vec<Index> = cmd
        .children()
        .iter()
        .copied()
        .filter(|&c| {
            tree.get(c)
                .is_some_and(|child| !child.hidden && child.deprecated.is_none())
        })
        .collect();

    let specs: Vec<String> = extract_flags(tree, idx)
        .iter()
        .filter(|f| f.borrow().is_listed())
        .map(|f| flag_spec(&f.borrow()))
        .collect();

    out.push_str(&format!("\nfunction {} {{\n", function_name(tree, idx)));
    if visible_children.is_empty() {
        out.push_str("  _arguments \\\n");
        for (i, spec) in specs.iter().enumerate() {
            let terminator = if i + 1 == specs.len() { "" } else { " \\" };
            out.push_str(&format!("    {}{}\n", spec, terminator));
        }
        if specs.is_empty() {
            out.push_str("    \"*::arg: \"\n");
        }
    } else {
        out.push_str("  local -a commands\n\n");
        out.push_str("  _arguments -C \\\n");
        for spec in &specs {
            out.push_str(&format!("    {} \\\n", spec));
        }
        out.push_str("    \"1: :->cmnds\" \\\n");
        out.push_str("    \"*::arg:->args\"\n\n");
        out.push_str("  case $state in\n");
        out.push_str("  cmnds)\n");
        out.push_str("    commands=(\n");
        for &child in &visible_children {
            if let Some(child_cmd) = tree.get(child) {
                out.push_str(&format!(
                    "      \"{}:{}\"\n",
                    child_cmd.name(),
                    child_cmd.short
                ));
            }
        }
        out.push_str("    )\n");
        out.push_str("    _describe \"command\" commands\n");
        out.push_str("    ;;\n");
        out.push_str("  esac\n\n");
        out.push_str("  case \"$words[1]\" in\n");
        for &child in &visible_children {
            if let Some(child_cmd) = tree.get(child) {
                out.push_str(&format!(
                    "  {})\n    {}\n    ;;\n",
                    child_cmd.name(),
                    function_name(tree, child)
                ));
            }
        }
        out.push_str("  esac\n");
    }
    out.push_str("}\n");

    for child in visible_children {
        write_command_function(tree, child, out);
    }
}

fn flag_spec(flag: &Flag) -> String {
    match flag.shorthand {
        Some(c) => format!(
            "\"(-{} --{})\"{{-{},--{}}}\"[{}]\"",
            c, flag.name, c, flag.name, flag.usage
        ),
        None => format!("\"--{}[{}]\"", flag.name, flag.usage),
    }
}
