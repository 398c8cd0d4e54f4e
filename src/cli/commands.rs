//! Command tree for the `rscmd` binary, built with the framework itself.

use std::path::{Path, PathBuf};
use std::process;

use crate::cli::output;
use crate::command::{Command, CommandTree};
use crate::completions;
use crate::dispatch::Commander;
use crate::exitcode;
use crate::help;
use crate::man::{self, ManOptions};
use crate::scaffold::{ScaffoldConfig, Scaffolder};

pub fn build_cli() -> Commander {
    Commander::new(build_tree())
}

/// The generator's own command tree. Rebuilt inside run actions that need
/// whole-tree access (completion and man generation), since an action only
/// sees its own node.
pub fn build_tree() -> CommandTree {
    let mut tree = CommandTree::new();

    let mut root_cmd = Command::new("rscmd")
        .short("Generator for rscmd-based CLI applications")
        .long(
            "rscmd scaffolds command-line applications built on the rscmd framework\n\
             and generates man pages and shell completions for them.",
        )
        .run(|_cmd, _args| {
            let tree = build_tree();
            if let Some(root) = tree.root() {
                output::info(&help::usage(&tree, root));
            }
        });
    root_cmd.persistent_flags_mut().string(
        "author",
        Some('a'),
        "",
        "author recorded in generated manifests",
    );
    let root = tree.insert(root_cmd, None);

    let mut init_cmd = Command::new("init <name>")
        .short("Create a new CLI application project")
        .long(
            "Create a project skeleton wired to the rscmd framework:\n\
             a manifest and a main.rs hosting a one-command tree.",
        )
        .example("  rscmd init myapp\n  rscmd init myapp --dir /tmp/sandbox/myapp")
        .run(|cmd, args| {
            let Some(name) = args.first() else {
                output::error("init requires a project name");
                process::exit(exitcode::USAGE);
            };
            let flags = cmd.local_flags();
            let dir = flags
                .and_then(|f| f.get_string("dir"))
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(name));
            let author = flags
                .and_then(|f| f.get_string("author"))
                .filter(|s| !s.is_empty());
            let scaffolder = Scaffolder::new(ScaffoldConfig {
                project_name: name.clone(),
                author,
                output_dir: dir,
            });
            match scaffolder.create_project() {
                Ok(files) => {
                    for file in files {
                        output::action("created", &file.display());
                    }
                }
                Err(e) => {
                    output::error(&e);
                    process::exit(e.exit_code());
                }
            }
        });
    init_cmd
        .flags_mut()
        .string("dir", Some('o'), "", "output directory (default: ./<name>)");
    tree.insert(init_cmd, Some(root));

    let mut add_cmd = Command::new("add <name>")
        .short("Add a command source file to an existing project")
        .example("  rscmd add serve\n  rscmd add config-show --dir ./myapp")
        .run(|cmd, args| {
            let Some(name) = args.first() else {
                output::error("add requires a command name");
                process::exit(exitcode::USAGE);
            };
            let dir = cmd
                .local_flags()
                .and_then(|f| f.get_string("dir"))
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let scaffolder = Scaffolder::new(ScaffoldConfig {
                project_name: name.clone(),
                author: None,
                output_dir: dir,
            });
            match scaffolder.add_command(name) {
                Ok(path) => output::action("created", &path.display()),
                Err(e) => {
                    output::error(&e);
                    process::exit(e.exit_code());
                }
            }
        });
    add_cmd
        .flags_mut()
        .string("dir", Some('d'), ".", "project directory");
    tree.insert(add_cmd, Some(root));

    let completion_cmd = Command::new("completion <shell>")
        .short("Generate a shell completion script on stdout")
        .example("  rscmd completion zsh > _rscmd")
        .run(|_cmd, args| match args.first().map(String::as_str) {
            Some("zsh") => {
                let tree = build_tree();
                print!("{}", completions::zsh_completion(&tree));
            }
            Some(shell) => {
                output::error(&format!("unsupported shell: {}", shell));
                process::exit(exitcode::USAGE);
            }
            None => {
                output::error("completion requires a shell name");
                process::exit(exitcode::USAGE);
            }
        });
    tree.insert(completion_cmd, Some(root));

    let man_cmd = Command::new("man <dir>")
        .short("Generate man pages into a directory")
        .run(|_cmd, args| {
            let dir = args.first().map(String::as_str).unwrap_or(".");
            let tree = build_tree();
            let Some(root) = tree.root() else { return };
            let opts = ManOptions::new("rscmd");
            if let Err(e) = man::man_tree(&tree, root, &opts, Path::new(dir)) {
                output::error(&e);
                process::exit(exitcode::IOERR);
            }
            output::success(&format!("man pages written to {}", dir));
        });
    tree.insert(man_cmd, Some(root));

    let help_cmd = Command::new("help [command]")
        .short("Help about any command")
        .run(|_cmd, args| {
            let tree = build_tree();
            let Some(mut idx) = tree.root() else { return };
            for name in args {
                let next = tree.get(idx).and_then(|c| {
                    c.children()
                        .iter()
                        .copied()
                        .find(|&child| tree.get(child).is_some_and(|cc| cc.name() == *name))
                });
                match next {
                    Some(n) => idx = n,
                    None => {
                        output::error(&format!("unknown help topic: {}", name));
                        process::exit(exitcode::USAGE);
                    }
                }
            }
            output::info(&help::help(&tree, idx));
            if tree.get(idx).is_some_and(Command::has_children) {
                output::info(&help::usage(&tree, idx));
            }
        });
    tree.insert(help_cmd, Some(root));

    tree
}
