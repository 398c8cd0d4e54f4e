//! Top-level dispatch controller.
//!
//! One [`Commander`] owns the command tree for the life of the process:
//! resolve the target command, merge inherited flags, parse the residual
//! tokens, invoke the run action. A single deterministic pass without
//! retries; the controller never terminates the process itself.

use std::env;
use std::fmt;
use std::io::{self, Write};

use tracing::{debug, instrument, warn};

use crate::command::CommandTree;
use crate::errors::DispatchError;
use crate::help;
use crate::merge::merge_inherited;
use crate::resolve::find;

pub struct Commander {
    tree: CommandTree,
    args: Option<Vec<String>>,
    /// Usage and error text sink; stderr when unset.
    output: Option<Box<dyn Write>>,
}

impl Commander {
    pub fn new(tree: CommandTree) -> Self {
        Self {
            tree,
            args: None,
            output: None,
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut CommandTree {
        &mut self.tree
    }

    /// Override the argument list; without this, `execute` uses the
    /// process arguments minus the program name. Particularly useful when
    /// testing.
    pub fn set_args(&mut self, args: Vec<String>) {
        self.args = Some(args);
    }

    /// Redirect usage output; stderr when unset.
    pub fn set_output(&mut self, output: Box<dyn Write>) {
        self.output = Some(output);
    }

    /// Resolve, merge, parse and invoke in one pass.
    #[instrument(skip(self))]
    pub fn execute(&mut self) -> Result<(), DispatchError> {
        let args = self
            .args
            .clone()
            .unwrap_or_else(|| env::args().skip(1).collect());
        self.execute_args(&args)
    }

    pub fn execute_args(&mut self, args: &[String]) -> Result<(), DispatchError> {
        let (target, residual) = match find(&self.tree, args)? {
            Some(found) => found,
            None => {
                let name = args.first().cloned().unwrap_or_default();
                return Err(DispatchError::UnknownSubcommand { name });
            }
        };

        if let Some(message) = self.tree.get(target).and_then(|c| c.deprecated.clone()) {
            warn!(command = %self.tree.command_path(target), "deprecated command: {}", message);
        }

        merge_inherited(&mut self.tree, target);

        let parse_result = match self.tree.get_mut(target) {
            Some(cmd) => cmd.flags_mut().parse(&residual),
            None => return Err(DispatchError::EmptyTree),
        };
        if let Err(e) = parse_result {
            let usage = help::usage(&self.tree, target);
            self.write_output(&usage);
            return Err(DispatchError::Parse(e));
        }

        let Some(cmd) = self.tree.get(target) else {
            return Err(DispatchError::EmptyTree);
        };
        let leftover: Vec<String> = cmd
            .local_flags()
            .map(|flags| flags.args().to_vec())
            .unwrap_or_default();
        if let Some(run) = cmd.run_action() {
            debug!(command = %cmd.name(), positionals = leftover.len(), "invoking run action");
            run(cmd, &leftover);
        }
        Ok(())
    }

    fn write_output(&mut self, text: &str) {
        match &mut self.output {
            Some(sink) => {
                let _ = writeln!(sink, "{}", text);
            }
            None => {
                let _ = writeln!(io::stderr(), "{}", text);
            }
        }
    }
}

impl fmt::Debug for Commander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commander")
            .field("tree", &self.tree)
            .field("args", &self.args)
            .finish()
    }
}
