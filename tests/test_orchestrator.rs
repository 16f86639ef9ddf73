// Copyright (C) Brian G. Milnes 2025

//! End-to-end tests for rewriting a source tree

mod common;

use common::TestTree;
use import_rewrite::{rewrite_file, rewrite_tree, Config, FileOutcome, RuleSet, RunSummary, ToolLogger};

const LIB: &str = r#"use std::fmt;

use old_crate::foo::sub as x;
use old_crate::foo;
use other::Thing;

fn main() {}
"#;

const LIB_REWRITTEN: &str = r#"use std::fmt;

use new_crate::baz;
use new_crate::baz::sub as x;
use other::Thing;

fn main() {}
"#;

// Unsorted on purpose: untouched files keep their bytes
const UNRELATED: &str = "use b::B;\nuse  a::A;\n";

fn config() -> Config {
    Config::new(RuleSet::single("old_crate::foo", "new_crate::baz").unwrap())
}

fn run(tree: &TestTree, config: &Config) -> RunSummary {
    let mut logger = ToolLogger::new_disabled().quiet(true);
    rewrite_tree(tree.root(), config, &mut logger).unwrap()
}

fn sample_tree() -> TestTree {
    let tree = TestTree::new().unwrap();
    tree.write("src/lib.rs", LIB).unwrap();
    tree.write("src/other.rs", UNRELATED).unwrap();
    tree.write("src/broken.rs", "use old_crate::foo;\nfn broken( {\n").unwrap();
    tree.write("src/widget_pb.rs", LIB).unwrap();
    tree.write("vendor/dep/src/lib.rs", LIB).unwrap();
    tree.write("notes.txt", "use old_crate::foo;\n").unwrap();
    tree
}

#[test]
fn test_rewrites_matching_files_only() {
    let tree = sample_tree();

    let summary = run(&tree, &config());

    assert_eq!(
        summary,
        RunSummary {
            scanned: 3,
            rewritten: 1,
            unchanged: 1,
            failed: 1,
            substitutions: 2,
            dry_run: false,
        }
    );
    assert_eq!(tree.read("src/lib.rs").unwrap(), LIB_REWRITTEN);
    assert_eq!(tree.read("src/other.rs").unwrap(), UNRELATED);
    assert_eq!(tree.read("src/widget_pb.rs").unwrap(), LIB);
    assert_eq!(tree.read("vendor/dep/src/lib.rs").unwrap(), LIB);
    assert_eq!(tree.read("notes.txt").unwrap(), "use old_crate::foo;\n");
}

#[test]
fn test_parse_failure_leaves_file_untouched() {
    let tree = sample_tree();

    run(&tree, &config());

    assert_eq!(tree.read("src/broken.rs").unwrap(), "use old_crate::foo;\nfn broken( {\n");
    assert!(rewrite_file(&tree.path("src/broken.rs"), &config()).is_err());
}

#[test]
fn test_second_run_is_a_no_op() {
    let tree = sample_tree();

    run(&tree, &config());
    let second = run(&tree, &config());

    assert_eq!(second.rewritten, 0);
    assert_eq!(second.substitutions, 0);
    assert_eq!(tree.read("src/lib.rs").unwrap(), LIB_REWRITTEN);
}

#[test]
fn test_no_backups_left_behind() {
    let tree = sample_tree();

    run(&tree, &config());

    assert_eq!(
        tree.entries("src").unwrap(),
        vec!["broken.rs", "lib.rs", "other.rs", "widget_pb.rs"]
    );
}

#[test]
fn test_dry_run_writes_nothing() {
    let tree = sample_tree();

    let summary = run(&tree, &config().with_dry_run(true));

    assert!(summary.dry_run);
    assert_eq!(summary.rewritten, 1);
    assert_eq!(tree.read("src/lib.rs").unwrap(), LIB);
    assert_eq!(
        rewrite_file(&tree.path("src/lib.rs"), &config().with_dry_run(true)).unwrap(),
        FileOutcome::WouldRewrite { substitutions: 2 }
    );
}

#[test]
fn test_conflicting_rewrite_fails_file() {
    let tree = TestTree::new().unwrap();
    let source = "use new_crate::baz;\nuse old_crate::foo;\n";
    tree.write("lib.rs", source).unwrap();

    let summary = run(&tree, &config());

    assert_eq!(summary.failed, 1);
    assert_eq!(tree.read("lib.rs").unwrap(), source);
}

#[test]
fn test_non_utf8_file_fails() {
    let tree = TestTree::new().unwrap();
    std::fs::write(tree.path("latin1.rs"), b"// caf\xe9\nuse old_crate::foo;\n").unwrap();

    let summary = run(&tree, &config());

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.rewritten, 0);
}

#[test]
fn test_missing_root_is_fatal() {
    let tree = TestTree::new().unwrap();
    let mut logger = ToolLogger::new_disabled().quiet(true);

    assert!(rewrite_tree(&tree.path("missing"), &config(), &mut logger).is_err());
}

#[test]
fn test_summary_display() {
    let summary = RunSummary {
        scanned: 4,
        rewritten: 2,
        unchanged: 1,
        failed: 1,
        substitutions: 3,
        dry_run: false,
    };

    assert_eq!(
        summary.to_string(),
        "Summary: 4 files scanned, rewrote 2 file(s) (3 imports), 1 unchanged, 1 failed"
    );
}

#[cfg(unix)]
#[test]
fn test_permissions_survive_rewrite() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let tree = TestTree::new().unwrap();
    let path = tree.write("lib.rs", "use old_crate::foo::Bar;\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let outcome = rewrite_file(&path, &config()).unwrap();

    assert_eq!(outcome, FileOutcome::Rewritten { substitutions: 1 });
    assert_eq!(tree.read("lib.rs").unwrap(), "use new_crate::baz::Bar;\n");
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o644);
}

#[test]
fn test_nested_target_module_rewritten() {
    let tree = TestTree::new().unwrap();
    tree.write("src/target/mod.rs", "use old_crate::foo::X;\n").unwrap();

    let summary = run(&tree, &config());

    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.rewritten, 1);
    assert_eq!(tree.read("src/target/mod.rs").unwrap(), "use new_crate::baz::X;\n");
}

#[test]
fn test_rewrite_that_would_drop_comments_fails_file() {
    let tree = TestTree::new().unwrap();
    let source = "use old_crate::{foo::A, /* keep */ other::B};\n";
    tree.write("lib.rs", source).unwrap();

    let summary = run(&tree, &config());

    assert_eq!(summary.failed, 1);
    assert_eq!(tree.read("lib.rs").unwrap(), source);
}
