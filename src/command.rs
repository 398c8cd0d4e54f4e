//! Command nodes and the arena-backed command tree.
//!
//! A [`Command`] is one node of the dispatch tree: identity, flag sets,
//! optional run action. Nodes live in a [`CommandTree`] arena; the tree
//! owns every node, and the parent back-reference is a plain arena index
//! used for upward walks only.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::flags::{FlagRef, FlagSet};

/// Action invoked when a command is dispatched. Receives the resolved
/// command and the positional arguments left over after flag parsing.
pub type RunAction = Box<dyn Fn(&Command, &[String])>;

/// One subcommand: identity, help text, flags and an optional run action.
///
/// A command without a run action is a container / help-topic node and is
/// never dispatched to directly.
pub struct Command {
    name: Option<String>,
    /// One-line usage message, e.g. `"add <file>"`. The first
    /// space-delimited token doubles as the command name unless an explicit
    /// name is set.
    pub use_line: String,
    /// Short description shown in command listings.
    pub short: String,
    /// Long description shown in full help output.
    pub long: String,
    /// Example invocations shown in help and man output.
    pub example: String,
    /// Deprecation message; deprecated commands warn when dispatched and
    /// are skipped by the man-page tree walker.
    pub deprecated: Option<String>,
    /// Hidden commands dispatch normally but are excluded from generated
    /// help and completions.
    pub hidden: bool,
    flags: Option<FlagSet>,
    pflags: Option<FlagSet>,
    run: Option<RunAction>,
    pub(crate) parent: Option<Index>,
    pub(crate) children: Vec<Index>,
}

impl Command {
    pub fn new(use_line: impl Into<String>) -> Self {
        Self {
            name: None,
            use_line: use_line.into(),
            short: String::new(),
            long: String::new(),
            example: String::new(),
            deprecated: None,
            hidden: false,
            flags: None,
            pflags: None,
            run: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Override the name derived from the usage line.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn run(mut self, action: impl Fn(&Command, &[String]) + 'static) -> Self {
        self.run = Some(Box::new(action));
        self
    }

    /// The command name: the explicit name if set, else the usage line up
    /// to the first space.
    pub fn name(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        match self.use_line.split_once(' ') {
            Some((head, _)) => head,
            None => &self.use_line,
        }
    }

    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    /// Child indices in insertion order.
    pub fn children(&self) -> &[Index] {
        &self.children
    }

    /// Local flag set, lazily created on first access.
    pub fn flags_mut(&mut self) -> &mut FlagSet {
        if self.flags.is_none() {
            let name = self.name().to_string();
            self.flags = Some(FlagSet::new(name));
        }
        self.flags.as_mut().expect("flag set just created")
    }

    /// Persistent flag set, lazily created on first access. Entries
    /// propagate to every descendant at dispatch time.
    pub fn persistent_flags_mut(&mut self) -> &mut FlagSet {
        if self.pflags.is_none() {
            let name = self.name().to_string();
            self.pflags = Some(FlagSet::new(name));
        }
        self.pflags.as_mut().expect("flag set just created")
    }

    pub fn local_flags(&self) -> Option<&FlagSet> {
        self.flags.as_ref()
    }

    pub fn persistent_flags(&self) -> Option<&FlagSet> {
        self.pflags.as_ref()
    }

    pub fn has_flags(&self) -> bool {
        self.flags.as_ref().is_some_and(FlagSet::has_flags)
    }

    pub fn has_persistent_flags(&self) -> bool {
        self.pflags.as_ref().is_some_and(FlagSet::has_flags)
    }

    pub(crate) fn run_action(&self) -> Option<&RunAction> {
        self.run.as_ref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name())
            .field("use_line", &self.use_line)
            .field("runnable", &self.is_runnable())
            .field("children", &self.children.len())
            .finish()
    }
}

/// Arena-based tree of commands.
///
/// The arena owns every node; indices are stable handles for parent and
/// child references. Construction happens before dispatch and the tree is
/// read-only afterwards.
#[derive(Debug)]
pub struct CommandTree {
    arena: Arena<Command>,
    root: Option<Index>,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a command. With `parent` set, the node is appended to that
    /// parent's children. With `parent` absent, the node becomes the root
    /// if none exists yet, otherwise an orphan to be wired later with
    /// [`add_child`](Self::add_child).
    #[instrument(level = "trace", skip(self, command))]
    pub fn insert(&mut self, mut command: Command, parent: Option<Index>) -> Index {
        command.parent = parent;
        let idx = self.arena.insert(command);
        match parent {
            Some(parent_idx) => {
                if let Some(parent_cmd) = self.arena.get_mut(parent_idx) {
                    parent_cmd.children.push(idx);
                }
            }
            None => {
                if self.root.is_none() {
                    self.root = Some(idx);
                }
            }
        }
        idx
    }

    /// Wire an existing node under a parent.
    ///
    /// Panics on construction-time invariant violations: a node can never
    /// be its own child, have two parents, or be the tree root.
    pub fn add_child(&mut self, parent: Index, child: Index) {
        assert_ne!(parent, child, "command cannot be a child of itself");
        assert_ne!(
            self.root,
            Some(child),
            "root command cannot be attached as a child"
        );
        {
            let child_cmd = self
                .arena
                .get_mut(child)
                .expect("child index not found in tree");
            assert!(child_cmd.parent.is_none(), "command already has a parent");
            child_cmd.parent = Some(parent);
        }
        let parent_cmd = self
            .arena
            .get_mut(parent)
            .expect("parent index not found in tree");
        parent_cmd.children.push(child);
    }

    /// Wire several existing nodes under a parent, preserving order.
    pub fn add_children(&mut self, parent: Index, children: impl IntoIterator<Item = Index>) {
        for child in children {
            self.add_child(parent, child);
        }
    }

    pub fn get(&self, idx: Index) -> Option<&Command> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut Command> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Space-joined chain of names from the root down to `idx`, computed
    /// by climbing parent references.
    #[instrument(level = "trace", skip(self))]
    pub fn command_path(&self, idx: Index) -> String {
        let mut parts = Vec::new();
        let mut current = Some(idx);
        while let Some(cur) = current {
            let Some(cmd) = self.get(cur) else { break };
            parts.push(cmd.name().to_string());
            current = cmd.parent;
        }
        parts.reverse();
        parts.join(" ")
    }

    /// The full usage line for `idx`, prefixed with the parent's command
    /// path when the node has one.
    pub fn full_use_line(&self, idx: Index) -> String {
        let Some(cmd) = self.get(idx) else {
            return String::new();
        };
        match cmd.parent {
            Some(parent) => format!("{} {}", self.command_path(parent), cmd.use_line),
            None => cmd.use_line.clone(),
        }
    }

    /// Look up a flag visible at `idx`: its local set first, then the
    /// persistent sets of the node and its ancestors, nearest first.
    pub fn flag(&self, idx: Index, name: &str) -> Option<FlagRef> {
        let local = self
            .get(idx)
            .and_then(|cmd| cmd.local_flags())
            .and_then(|flags| flags.lookup(name));
        local.or_else(|| self.persistent_flag(idx, name))
    }

    fn persistent_flag(&self, idx: Index, name: &str) -> Option<FlagRef> {
        let cmd = self.get(idx)?;
        let own = cmd
            .persistent_flags()
            .and_then(|flags| flags.lookup(name));
        match own {
            Some(flag) => Some(flag),
            None => cmd.parent.and_then(|p| self.persistent_flag(p, name)),
        }
    }

    /// Collect every persistent flag an ancestor contributes to `idx` into
    /// a fresh set sharing storage with the definers. Nearest ancestor
    /// claims a colliding name first.
    pub fn inherited_flags(&self, idx: Index) -> FlagSet {
        let name = self.get(idx).map(|c| c.name().to_string()).unwrap_or_default();
        let mut set = FlagSet::new(name);
        let mut current = self.get(idx).and_then(|cmd| cmd.parent);
        while let Some(cur) = current {
            let Some(cmd) = self.get(cur) else { break };
            if let Some(pflags) = cmd.persistent_flags() {
                for flag in pflags.entries() {
                    let flag_name = flag.borrow().name.clone();
                    if set.lookup(&flag_name).is_none() {
                        set.add_flag(FlagRef::clone(flag));
                    }
                }
            }
            current = cmd.parent;
        }
        set
    }

    /// Preorder iterator over `(index, command)` pairs.
    pub fn iter(&self) -> CommandIter<'_> {
        CommandIter::new(self)
    }
}

pub struct CommandIter<'a> {
    tree: &'a CommandTree,
    stack: Vec<Index>,
}

impl<'a> CommandIter<'a> {
    fn new(tree: &'a CommandTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for CommandIter<'a> {
    type Item = (Index, &'a Command);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.tree.get(current)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current, node))
    }
}
