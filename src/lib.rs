//! Build command-line tools from hierarchical command trees.
//!
//! Declare a tree of commands, each with its own flags, help text and run
//! action; a [`Commander`] resolves process arguments to the most specific
//! command, merges inherited flags into its flag set, parses the residual
//! tokens and invokes the action. Pure renderers generate usage text, man
//! pages and zsh completions from the same tree.
//!
//! ```
//! use rscmd::{Command, CommandTree, Commander};
//!
//! let mut tree = CommandTree::new();
//! let root = tree.insert(Command::new("app").short("demo application"), None);
//!
//! let mut list = Command::new("list")
//!     .short("List entries")
//!     .run(|_cmd, args| println!("listing {:?}", args));
//! list.flags_mut().bool("all", Some('a'), false, "include hidden entries");
//! tree.insert(list, Some(root));
//!
//! let mut app = Commander::new(tree);
//! app.set_args(vec!["list".into(), "--all".into()]);
//! assert!(app.execute().is_ok());
//! ```

pub mod cli;
pub mod command;
pub mod completions;
pub mod dispatch;
pub mod errors;
pub mod exitcode;
pub mod flags;
pub mod help;
pub mod inspect;
pub mod man;
pub mod merge;
pub mod resolve;
pub mod scaffold;
pub mod util;

pub use command::{Command, CommandTree};
pub use generational_arena::Index;
pub use dispatch::Commander;
pub use errors::{DispatchError, FlagError};
pub use flags::{Flag, FlagRef, FlagSet, FlagValue};
