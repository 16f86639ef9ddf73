// Copyright (C) Brian G. Milnes 2025

//! Tests for the transactional writer

mod common;

use common::TestTree;
use import_rewrite::{write_with_backup, write_with_backup_using, WriteError};
use std::fs;
use std::io;

#[test]
fn test_write_replaces_content_and_removes_backup() {
    let tree = TestTree::new().unwrap();
    let path = tree.write("lib.rs", "use old::X;\n").unwrap();
    let perm = fs::metadata(&path).unwrap().permissions();

    write_with_backup(&path, b"use old::X;\n", &perm, b"use new::X;\n").unwrap();

    assert_eq!(tree.read("lib.rs").unwrap(), "use new::X;\n");
    assert_eq!(tree.entries("").unwrap(), vec!["lib.rs".to_string()]);
}

#[test]
fn test_backup_holds_original_during_overwrite() {
    let tree = TestTree::new().unwrap();
    let path = tree.write("lib.rs", "original\n").unwrap();
    let perm = fs::metadata(&path).unwrap().permissions();
    let dir = tree.root().to_path_buf();

    write_with_backup_using(&path, b"original\n", &perm, b"updated\n", |target, contents, _| {
        let backups: Vec<_> = fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("lib.rs."))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read(backups[0].path())?, b"original\n");
        fs::write(target, contents)
    })
    .unwrap();

    assert_eq!(tree.read("lib.rs").unwrap(), "updated\n");
    assert_eq!(tree.entries("").unwrap(), vec!["lib.rs".to_string()]);
}

#[test]
fn test_failed_overwrite_restores_original() {
    let tree = TestTree::new().unwrap();
    let path = tree.write("lib.rs", "use old::X;\n").unwrap();
    let perm = fs::metadata(&path).unwrap().permissions();

    let result = write_with_backup_using(&path, b"use old::X;\n", &perm, b"use new::X;\n", |target, _, _| {
        // Leave a truncated file behind, as a full disk would
        fs::write(target, b"use ne")?;
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    });

    match result {
        Err(WriteError::Overwrite { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected overwrite error, got {other:?}"),
    }
    assert_eq!(tree.read("lib.rs").unwrap(), "use old::X;\n");
    assert_eq!(tree.entries("").unwrap(), vec!["lib.rs".to_string()]);
}

#[test]
fn test_missing_directory_fails_before_touching_anything() {
    let tree = TestTree::new().unwrap();
    let path = tree.path("missing/lib.rs");
    let perm = fs::metadata(tree.root()).unwrap().permissions();

    let result = write_with_backup(&path, b"a", &perm, b"b");

    assert!(matches!(result, Err(WriteError::Backup { .. })));
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn test_permissions_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let tree = TestTree::new().unwrap();
    let path = tree.write("lib.rs", "use old::X;\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
    let perm = fs::metadata(&path).unwrap().permissions();

    write_with_backup(&path, b"use old::X;\n", &perm, b"use new::X;\n").unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
}

#[cfg(unix)]
#[test]
fn test_restored_file_keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tree = TestTree::new().unwrap();
    let path = tree.write("lib.rs", "keep\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
    let perm = fs::metadata(&path).unwrap().permissions();

    let result = write_with_backup_using(&path, b"keep\n", &perm, b"lose\n", |_, _, _| {
        Err(io::Error::new(io::ErrorKind::Other, "fail"))
    });

    assert!(result.is_err());
    assert_eq!(tree.read("lib.rs").unwrap(), "keep\n");
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}
