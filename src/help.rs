//! Usage and help text rendering.
//!
//! Pure functions over a finalized command tree; the dispatcher prints the
//! usage text when flag parsing fails, and applications can wire the help
//! renderer into a `help` command.

use generational_arena::Index;

use crate::command::{Command, CommandTree};
use crate::flags::{FlagSet, FlagValue};

/// Render the usage text for one command: path header, usage line,
/// runnable-children listing, flag tables and help topics.
pub fn usage(tree: &CommandTree, idx: Index) -> String {
    let Some(cmd) = tree.get(idx) else {
        return String::new();
    };
    let path = tree.command_path(idx);
    let mut out = String::new();

    out.push_str(&format!("{:<11} :: {}\n", path, cmd.short));
    out.push_str("Usage:\n");
    let mut line = tree.full_use_line(idx);
    if cmd.has_children() {
        line.push_str(" command");
    }
    if cmd.has_flags() || cmd.has_persistent_flags() {
        line.push_str(" [flags]");
    }
    out.push_str(&format!("    {}\n", line));

    let children: Vec<&Command> = cmd
        .children()
        .iter()
        .filter_map(|&c| tree.get(c))
        .filter(|c| !c.hidden && c.deprecated.is_none())
        .collect();

    let runnable: Vec<&&Command> = children.iter().filter(|c| c.is_runnable()).collect();
    if !runnable.is_empty() {
        out.push_str("\nThe commands are:\n");
        for child in &runnable {
            out.push_str(&format!("    {:<11} {}\n", child.use_line, child.short));
        }
        out.push_str(&format!(
            "\nUse \"{} help [command]\" for more information about a command.\n",
            path
        ));
    }

    if let Some(flags) = cmd.local_flags() {
        let table = flag_usages(flags);
        if !table.is_empty() {
            out.push_str("\nFlags:\n");
            out.push_str(&table);
        }
    }
    if let Some(pflags) = cmd.persistent_flags() {
        let table = flag_usages(pflags);
        if !table.is_empty() {
            out.push_str("\nPersistent Flags:\n");
            out.push_str(&table);
        }
    }

    let topics: Vec<&&Command> = children.iter().filter(|c| !c.is_runnable()).collect();
    if !topics.is_empty() {
        out.push_str("\nAdditional help topics:\n");
        for topic in &topics {
            out.push_str(&format!("    {} {:<11} {}\n", path, topic.name(), topic.short));
        }
    }

    out
}

/// Render the full help text for one command: usage line when runnable,
/// the long description (short as fallback), and examples.
pub fn help(tree: &CommandTree, idx: Index) -> String {
    let Some(cmd) = tree.get(idx) else {
        return String::new();
    };
    let mut out = String::new();
    if cmd.is_runnable() {
        out.push_str(&format!("Usage: {}\n\n", tree.full_use_line(idx)));
    }
    let body = if cmd.long.is_empty() {
        &cmd.short
    } else {
        &cmd.long
    };
    out.push_str(body.trim());
    out.push('\n');
    if !cmd.example.is_empty() {
        out.push_str(&format!("\nExamples:\n{}\n", cmd.example.trim_end()));
    }
    out
}

/// One line per listed flag: shorthand, name, usage, non-empty default.
pub fn flag_usages(flags: &FlagSet) -> String {
    let mut out = String::new();
    flags.visit_all(|flag| {
        if !flag.is_listed() {
            return;
        }
        let lead = match flag.shorthand {
            Some(c) => format!("-{}, --{}", c, flag.name),
            None => format!("    --{}", flag.name),
        };
        out.push_str(&format!("  {:<24} {}", lead, flag.usage));
        match &flag.default {
            FlagValue::String(s) if s.is_empty() => {}
            default => out.push_str(&format!(" (default {})", default)),
        }
        out.push('\n');
    });
    out
}
