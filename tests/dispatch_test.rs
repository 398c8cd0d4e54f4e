//! End-to-end dispatch tests: resolve, merge, parse, invoke

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rscmd::errors::DispatchError;
use rscmd::{exitcode, Command, CommandTree, Commander, FlagValue, Index};

#[ctor::ctor]
fn init() {
    rscmd::util::testing::init_test_setup();
}

fn toks(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Sink capturing everything the commander writes.
#[derive(Clone, Default)]
struct BufSink(Rc<RefCell<Vec<u8>>>);

impl BufSink {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for BufSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

type Calls = Rc<RefCell<Vec<Vec<String>>>>;

/// app with persistent --debug; sub1 (recorded run, local --long); sub2.
fn demo_app(calls: &Calls) -> (Commander, Index, Index) {
    let mut tree = CommandTree::new();
    let mut root_cmd = Command::new("app").short("demo application");
    root_cmd
        .persistent_flags_mut()
        .bool("debug", None, false, "debug output");
    let root = tree.insert(root_cmd, None);

    let mut sub1_cmd = Command::new("sub1").short("first subcommand");
    sub1_cmd.flags_mut().bool("long", None, false, "long listing");
    let recorded = Rc::clone(calls);
    let sub1_cmd = sub1_cmd.run(move |_cmd, args| recorded.borrow_mut().push(args.to_vec()));
    let sub1 = tree.insert(sub1_cmd, Some(root));

    tree.insert(Command::new("sub2").run(|_, _| {}), Some(root));
    (Commander::new(tree), root, sub1)
}

#[test]
fn given_persistent_and_local_flags_when_dispatched_then_both_parse_and_no_residual() {
    let calls: Calls = Rc::default();
    let (mut app, _, sub1) = demo_app(&calls);

    app.set_args(toks(&["sub1", "--long", "--debug"]));
    app.execute().unwrap();

    assert_eq!(calls.borrow().len(), 1);
    assert!(calls.borrow()[0].is_empty());

    let flags = app.tree().get(sub1).unwrap().local_flags().unwrap();
    assert_eq!(flags.get_bool("long"), Some(true));
    assert_eq!(flags.get_bool("debug"), Some(true));
}

#[test]
fn given_positionals_between_flags_when_dispatched_then_run_receives_leftovers() {
    let calls: Calls = Rc::default();
    let (mut app, ..) = demo_app(&calls);

    app.set_args(toks(&["sub1", "a", "--long", "b"]));
    app.execute().unwrap();

    assert_eq!(calls.borrow()[0], toks(&["a", "b"]));
}

#[test]
fn given_unknown_token_when_root_not_runnable_then_unknown_subcommand_error() {
    let mut tree = CommandTree::new();
    let root = tree.insert(Command::new("app"), None);
    tree.insert(Command::new("sub1").run(|_, _| {}), Some(root));

    let mut app = Commander::new(tree);
    app.set_args(toks(&["bogus"]));
    let err = app.execute().unwrap_err();

    assert!(matches!(
        &err,
        DispatchError::UnknownSubcommand { name } if name == "bogus"
    ));
    assert!(err.to_string().contains("bogus"));
    assert!(err.to_string().contains("help"));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_empty_args_when_root_not_runnable_then_unknown_subcommand_with_empty_name() {
    let mut tree = CommandTree::new();
    let root = tree.insert(Command::new("app"), None);
    tree.insert(Command::new("sub1").run(|_, _| {}), Some(root));

    let mut app = Commander::new(tree);
    app.set_args(Vec::new());
    let err = app.execute().unwrap_err();
    assert!(matches!(err, DispatchError::UnknownSubcommand { name } if name.is_empty()));
}

#[test]
fn given_empty_args_when_root_runnable_then_root_invoked() {
    let calls: Calls = Rc::default();
    let recorded = Rc::clone(&calls);
    let mut tree = CommandTree::new();
    tree.insert(
        Command::new("app").run(move |_cmd, args| recorded.borrow_mut().push(args.to_vec())),
        None,
    );

    let mut app = Commander::new(tree);
    app.set_args(Vec::new());
    app.execute().unwrap();
    assert_eq!(calls.borrow().as_slice(), &[Vec::<String>::new()]);
}

#[test]
fn given_empty_tree_when_executed_then_empty_tree_error() {
    let mut app = Commander::new(CommandTree::new());
    app.set_args(Vec::new());
    let err = app.execute().unwrap_err();
    assert!(matches!(err, DispatchError::EmptyTree));
    assert_eq!(err.exit_code(), exitcode::SOFTWARE);
}

#[test]
fn given_bad_flag_when_dispatched_then_usage_rendered_and_parse_error_returned() {
    let calls: Calls = Rc::default();
    let (mut app, ..) = demo_app(&calls);
    let sink = BufSink::default();
    app.set_output(Box::new(sink.clone()));

    app.set_args(toks(&["sub1", "--nope"]));
    let err = app.execute().unwrap_err();

    assert!(matches!(err, DispatchError::Parse(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
    let rendered = sink.contents();
    assert!(rendered.contains("Usage:"), "got: {rendered}");
    assert!(rendered.contains("app sub1"), "got: {rendered}");
    assert!(calls.borrow().is_empty(), "run action must not fire");
}

#[test]
fn given_merged_dispatch_when_flag_parsed_then_roots_flag_object_updated() {
    let mut tree = CommandTree::new();
    let mut root_cmd = Command::new("app");
    let debug = root_cmd
        .persistent_flags_mut()
        .bool("debug", None, false, "debug output");
    let root = tree.insert(root_cmd, None);
    tree.insert(Command::new("sub1").run(|_, _| {}), Some(root));

    let mut app = Commander::new(tree);
    app.set_args(toks(&["sub1", "--debug"]));
    app.execute().unwrap();

    assert_eq!(debug.borrow().value, FlagValue::Bool(true));
}

#[test]
fn given_same_args_when_executed_twice_then_deterministic() {
    let calls: Calls = Rc::default();
    let (mut app, ..) = demo_app(&calls);
    app.set_args(toks(&["sub1", "x"]));
    app.execute().unwrap();
    app.execute().unwrap();
    assert_eq!(calls.borrow().as_slice(), &[toks(&["x"]), toks(&["x"])]);
}
