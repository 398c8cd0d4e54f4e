//! Tests for command-tree resolution

use rstest::rstest;

use rscmd::errors::DispatchError;
use rscmd::resolve::find;
use rscmd::{Command, CommandTree, Index};

#[ctor::ctor]
fn init() {
    rscmd::util::testing::init_test_setup();
}

fn toks(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// app (runnable)
/// ├── sub1 (runnable)
/// │   └── leaf (runnable)
/// └── sub2 (runnable)
fn demo_tree() -> (CommandTree, Index, Index, Index, Index) {
    let mut tree = CommandTree::new();
    let root = tree.insert(Command::new("app").run(|_, _| {}), None);
    let sub1 = tree.insert(Command::new("sub1").run(|_, _| {}), Some(root));
    let leaf = tree.insert(Command::new("leaf").run(|_, _| {}), Some(sub1));
    let sub2 = tree.insert(Command::new("sub2").run(|_, _| {}), Some(root));
    (tree, root, sub1, leaf, sub2)
}

#[test]
fn given_empty_tree_when_find_then_errors() {
    let tree = CommandTree::new();
    let err = find(&tree, &toks(&["anything"])).unwrap_err();
    assert!(matches!(err, DispatchError::EmptyTree));
}

#[test]
fn given_runnable_root_when_find_with_empty_args_then_root_with_no_residual() {
    let (tree, root, ..) = demo_tree();
    let (target, residual) = find(&tree, &[]).unwrap().expect("target");
    assert_eq!(target, root);
    assert!(residual.is_empty());
}

#[test]
fn given_unrunnable_root_when_no_child_matches_then_none() {
    let mut tree = CommandTree::new();
    let root = tree.insert(Command::new("app"), None);
    tree.insert(Command::new("sub1").run(|_, _| {}), Some(root));

    let resolved = find(&tree, &toks(&["bogus"])).unwrap();
    assert!(resolved.is_none());
}

#[test]
fn given_matching_child_when_find_then_descends_and_strips_token() {
    let (tree, _, sub1, ..) = demo_tree();
    let (target, residual) = find(&tree, &toks(&["sub1", "--long", "--debug"]))
        .unwrap()
        .expect("target");
    assert_eq!(target, sub1);
    assert_eq!(residual, toks(&["--long", "--debug"]));
}

#[test]
fn given_nested_match_when_find_then_reaches_leaf() {
    let (tree, _, _, leaf, _) = demo_tree();
    let (target, residual) = find(&tree, &toks(&["sub1", "leaf", "--n"]))
        .unwrap()
        .expect("target");
    assert_eq!(target, leaf);
    assert_eq!(residual, toks(&["--n"]));
}

// A single remaining token never descends; it is residual input for the
// current command's own parser.
#[rstest]
#[case::subcommand_shaped(&["sub1"])]
#[case::flag_shaped(&["--verbose"])]
fn given_single_token_when_root_runnable_then_root_keeps_token(#[case] args: &[&str]) {
    let (tree, root, ..) = demo_tree();
    let (target, residual) = find(&tree, &toks(args)).unwrap().expect("target");
    assert_eq!(target, root);
    assert_eq!(residual, toks(args));
}

#[test]
fn given_unmatched_tokens_when_current_runnable_then_passed_through() {
    let (tree, root, ..) = demo_tree();
    let (target, residual) = find(&tree, &toks(&["bogus", "extra"]))
        .unwrap()
        .expect("target");
    assert_eq!(target, root);
    assert_eq!(residual, toks(&["bogus", "extra"]));
}

#[test]
fn given_duplicate_sibling_names_when_find_then_first_inserted_wins() {
    let mut tree = CommandTree::new();
    let root = tree.insert(Command::new("app"), None);
    let first = tree.insert(Command::new("dup").run(|_, _| {}), Some(root));
    tree.insert(Command::new("dup").run(|_, _| {}), Some(root));

    let (target, _) = find(&tree, &toks(&["dup", "x"])).unwrap().expect("target");
    assert_eq!(target, first);
}

#[test]
fn given_identical_inputs_when_find_twice_then_results_agree() {
    let (tree, ..) = demo_tree();
    let args = toks(&["sub1", "leaf", "a", "b"]);
    let once = find(&tree, &args).unwrap();
    let twice = find(&tree, &args).unwrap();
    assert_eq!(once, twice);
}
