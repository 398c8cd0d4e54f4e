//! Tests for persistent-flag merging

use std::rc::Rc;

use rscmd::merge::merge_inherited;
use rscmd::{Command, CommandTree, FlagValue};

#[ctor::ctor]
fn init() {
    rscmd::util::testing::init_test_setup();
}

fn toks(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn given_ancestor_persistent_flags_when_merged_then_appear_in_local_set() {
    let mut tree = CommandTree::new();
    let mut root_cmd = Command::new("app");
    root_cmd
        .persistent_flags_mut()
        .bool("debug", None, false, "debug output");
    let root = tree.insert(root_cmd, None);
    let sub = tree.insert(Command::new("sub").run(|_, _| {}), Some(root));

    merge_inherited(&mut tree, sub);

    let flags = tree.get(sub).unwrap().local_flags().expect("local set");
    assert!(flags.lookup("debug").is_some());
}

#[test]
fn given_colliding_generations_when_merged_then_nearest_ancestor_wins() {
    let mut tree = CommandTree::new();
    let mut grandparent = Command::new("app");
    grandparent
        .persistent_flags_mut()
        .string("x", None, "from-grandparent", "");
    let gp = tree.insert(grandparent, None);

    let mut parent = Command::new("mid");
    let parents_x = parent.persistent_flags_mut().string("x", None, "from-parent", "");
    let mid = tree.insert(parent, Some(gp));
    let leaf = tree.insert(Command::new("leaf").run(|_, _| {}), Some(mid));

    merge_inherited(&mut tree, leaf);

    let flags = tree.get(leaf).unwrap().local_flags().expect("local set");
    assert_eq!(flags.len(), 1);
    assert!(Rc::ptr_eq(&flags.lookup("x").unwrap(), &parents_x));
}

#[test]
fn given_local_flag_of_same_name_when_merged_then_never_overwritten() {
    let mut tree = CommandTree::new();
    let mut root_cmd = Command::new("app");
    root_cmd
        .persistent_flags_mut()
        .string("x", None, "inherited", "");
    let root = tree.insert(root_cmd, None);

    let mut sub_cmd = Command::new("sub").run(|_, _| {});
    let local = sub_cmd.flags_mut().string("x", None, "local", "");
    let sub = tree.insert(sub_cmd, Some(root));

    merge_inherited(&mut tree, sub);

    let flags = tree.get(sub).unwrap().local_flags().expect("local set");
    assert_eq!(flags.len(), 1);
    assert!(Rc::ptr_eq(&flags.lookup("x").unwrap(), &local));
}

#[test]
fn given_merge_applied_twice_when_compared_then_effective_set_unchanged() {
    let mut tree = CommandTree::new();
    let mut root_cmd = Command::new("app");
    root_cmd.persistent_flags_mut().bool("debug", None, false, "");
    root_cmd.persistent_flags_mut().string("out", None, "", "");
    let root = tree.insert(root_cmd, None);
    let sub = tree.insert(Command::new("sub").run(|_, _| {}), Some(root));

    merge_inherited(&mut tree, sub);
    let after_once = tree.get(sub).unwrap().local_flags().unwrap().len();
    merge_inherited(&mut tree, sub);
    let after_twice = tree.get(sub).unwrap().local_flags().unwrap().len();

    assert_eq!(after_once, 2);
    assert_eq!(after_once, after_twice);
}

#[test]
fn given_targets_own_persistent_flags_when_merged_then_parseable_locally() {
    let mut tree = CommandTree::new();
    let root = tree.insert(Command::new("app"), None);
    let mut sub_cmd = Command::new("sub").run(|_, _| {});
    sub_cmd
        .persistent_flags_mut()
        .int("level", None, 0, "nesting level");
    let sub = tree.insert(sub_cmd, Some(root));

    merge_inherited(&mut tree, sub);

    let flags = tree.get(sub).unwrap().local_flags().expect("local set");
    assert!(flags.lookup("level").is_some());
}

// Merged entries alias the definer's storage: parsing through the child's
// set updates the flag object the ancestor registered.
#[test]
fn given_merged_flag_when_parsed_then_ancestors_flag_object_sees_value() {
    let mut tree = CommandTree::new();
    let mut root_cmd = Command::new("app");
    let verbose = root_cmd
        .persistent_flags_mut()
        .bool("verbose", None, false, "noisy output");
    let root = tree.insert(root_cmd, None);
    let sub = tree.insert(Command::new("sub").run(|_, _| {}), Some(root));

    merge_inherited(&mut tree, sub);
    tree.get_mut(sub)
        .unwrap()
        .flags_mut()
        .parse(&toks(&["--verbose"]))
        .unwrap();

    assert_eq!(verbose.borrow().value, FlagValue::Bool(true));
    assert!(verbose.borrow().changed);
}
