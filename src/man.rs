//! Man page generation.
//!
//! Renders one roff page per command (NAME, SYNOPSIS, DESCRIPTION, OPTIONS,
//! inherited OPTIONS, EXAMPLE, SEE ALSO, HISTORY) and walks the tree to
//! write a `<command-path-with-dashes>.1` file per node, skipping
//! deprecated commands.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use generational_arena::Index;
use itertools::Itertools;

use crate::command::CommandTree;
use crate::flags::FlagSet;

/// Rendering options for man pages.
#[derive(Debug, Clone)]
pub struct ManOptions {
    /// Project name shown in the page footer.
    pub project_name: String,
    /// Manual section, 1 for user commands.
    pub section: u8,
    /// Generation timestamp; the current time when unset.
    pub date: Option<DateTime<Utc>>,
}

impl ManOptions {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            section: 1,
            date: None,
        }
    }
}

/// Render the man page for one command.
pub fn man_page(tree: &CommandTree, idx: Index, opts: &ManOptions) -> String {
    let Some(cmd) = tree.get(idx) else {
        return String::new();
    };
    let path = tree.command_path(idx);
    let dashed = path.replace(' ', "-");
    let date = opts.date.unwrap_or_else(Utc::now);
    let mut out = String::new();

    out.push_str(&format!(
        ".TH \"{}\" \"{}\" \"{}\" \"{}\"\n",
        dashed.to_uppercase(),
        opts.section,
        date.format("%B %Y"),
        opts.project_name
    ));

    out.push_str(".SH NAME\n");
    out.push_str(&format!("{} \\- {}\n", path, cmd.short));

    out.push_str(".SH SYNOPSIS\n");
    out.push_str(&format!(".B {}\n[OPTIONS]\n", path));

    out.push_str(".SH DESCRIPTION\n");
    let description = if cmd.long.is_empty() {
        &cmd.short
    } else {
        &cmd.long
    };
    out.push_str(&format!("{}\n", description.trim()));

    let mut seen = HashSet::new();
    let mut own = String::new();
    if let Some(flags) = cmd.local_flags() {
        own.push_str(&man_flags(flags, &mut seen));
    }
    if let Some(pflags) = cmd.persistent_flags() {
        own.push_str(&man_flags(pflags, &mut seen));
    }
    if !own.is_empty() {
        out.push_str(".SH OPTIONS\n");
        out.push_str(&own);
    }
    let inherited = tree.inherited_flags(idx);
    let table = man_flags(&inherited, &mut seen);
    if !table.is_empty() {
        out.push_str(".SH OPTIONS INHERITED FROM PARENT COMMANDS\n");
        out.push_str(&table);
    }

    if !cmd.example.is_empty() {
        out.push_str(".SH EXAMPLE\n");
        out.push_str(&format!(".nf\n{}\n.fi\n", cmd.example.trim_end()));
    }

    let see_also = see_also_entries(tree, idx, opts);
    if !see_also.is_empty() {
        out.push_str(".SH SEE ALSO\n");
        out.push_str(&format!("{}\n", see_also.join(", ")));
    }

    out.push_str(".SH HISTORY\n");
    out.push_str(&format!(
        "{} Auto generated by {}\n",
        date.format("%d-%b-%Y"),
        opts.project_name
    ));

    out
}

/// Write man pages for `idx` and every non-deprecated descendant into
/// `dir`, one `<dashed-path>.<section>` file per command.
pub fn man_tree(
    tree: &CommandTree,
    idx: Index,
    opts: &ManOptions,
    dir: &Path,
) -> io::Result<()> {
    let Some(cmd) = tree.get(idx) else {
        return Ok(());
    };
    let children = cmd.children().to_vec();
    for child in children {
        let skip = tree
            .get(child)
            .is_some_and(|c| c.deprecated.is_some());
        if skip {
            continue;
        }
        man_tree(tree, child, opts, dir)?;
    }

    let dashed = tree.command_path(idx).replace(' ', "-");
    let filename = dir.join(format!("{}.{}", dashed, opts.section));
    fs::write(filename, man_page(tree, idx, opts))
}

/// `seen` de-duplicates across the local, persistent and inherited tables
/// once merging has aliased a flag into more than one set.
fn man_flags(flags: &FlagSet, seen: &mut HashSet<String>) -> String {
    let mut out = String::new();
    flags.visit_all(|flag| {
        if !flag.is_listed() || !seen.insert(flag.name.clone()) {
            return;
        }
        out.push_str(".TP\n");
        match flag.shorthand {
            Some(c) => out.push_str(&format!("\\fB\\-{}\\fP, \\fB\\-\\-{}\\fP\n", c, flag.name)),
            None => out.push_str(&format!("\\fB\\-\\-{}\\fP\n", flag.name)),
        }
        out.push_str(&format!(
            "{} (default: {})\n",
            flag.usage, flag.default
        ));
    });
    out
}

/// Parent first, then children sorted by name; deprecated and hidden
/// entries are left out.
fn see_also_entries(tree: &CommandTree, idx: Index, opts: &ManOptions) -> Vec<String> {
    let Some(cmd) = tree.get(idx) else {
        return Vec::new();
    };
    let mut entries = Vec::new();
    if let Some(parent) = cmd.parent() {
        let dashed = tree.command_path(parent).replace(' ', "-");
        entries.push(format!("\\fB{}\\fP({})", dashed, opts.section));
    }
    let dashed = tree.command_path(idx).replace(' ', "-");
    let children = cmd
        .children()
        .iter()
        .filter_map(|&c| tree.get(c))
        .filter(|c| c.deprecated.is_none() && !c.hidden)
        .map(|c| c.name().to_string())
        .sorted()
        .map(|name| format!("\\fB{}-{}\\fP({})", dashed, name, opts.section));
    entries.extend(children);
    entries
}
