//! Unstow: the mirrored, permissive walk. Matching links are removed,
//! everything else is reported and left alone, and the run still succeeds.

mod common;

use std::fs;
use std::os::unix::fs::symlink;

use common::{entry_count, farm, is_symlink};
use linkfarm::errors::ApiError;
use linkfarm::types::{ConflictReason, Operation};

#[test]
fn unstow_after_stow_restores_the_destination() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("pkg/bin")).unwrap();
    fs::write(root.join("pkg/bin/tool"), b"").unwrap();
    fs::create_dir_all(root.join("pkg/doc")).unwrap();
    fs::write(root.join("pkg/doc/readme"), b"").unwrap();
    fs::create_dir(root.join("dest")).unwrap();

    let (api, _facts, _audit) = farm();
    api.stow(&[root.join("pkg")], &root.join("dest")).unwrap();
    assert_eq!(entry_count(&root.join("dest")), 2);

    api.unstow(&[root.join("pkg")], &root.join("dest")).unwrap();
    assert_eq!(entry_count(&root.join("dest")), 0, "round trip leaves dest as found");
}

#[test]
fn unstow_only_removes_links_to_this_source() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir(root.join("pkgA")).unwrap();
    fs::write(root.join("pkgA/a"), b"").unwrap();
    fs::create_dir(root.join("pkgB")).unwrap();
    fs::write(root.join("pkgB/b"), b"").unwrap();
    fs::create_dir(root.join("dest")).unwrap();

    let (api, _facts, _audit) = farm();
    api.stow(&[root.join("pkgA"), root.join("pkgB")], &root.join("dest"))
        .unwrap();

    api.unstow(&[root.join("pkgA")], &root.join("dest")).unwrap();
    assert!(!root.join("dest/a").exists());
    assert!(is_symlink(&root.join("dest/b")), "pkgB's link survives");
}

#[test]
fn unstow_reports_foreign_files_but_still_succeeds() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir(root.join("pkg")).unwrap();
    fs::write(root.join("pkg/conf"), b"").unwrap();
    fs::create_dir(root.join("dest")).unwrap();
    fs::write(root.join("dest/conf"), b"someone else's").unwrap();

    let (api, _facts, audit) = farm();
    let plan = api.plan_unstow(&[root.join("pkg")], &root.join("dest")).unwrap();
    assert!(!plan.aborted, "unstow conflicts are never fatal");
    assert_eq!(plan.conflicts.len(), 1);

    let expected = format!(
        "linkfarm unstow: can not unstow '{}': Conflicts with existing file",
        root.join("dest/conf").display()
    );
    assert!(audit.contains(&expected));

    api.unstow(&[root.join("pkg")], &root.join("dest")).unwrap();
    assert_eq!(fs::read(root.join("dest/conf")).unwrap(), b"someone else's");
}

#[test]
fn unstow_reports_broken_links_without_aborting() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir(root.join("pkg")).unwrap();
    fs::write(root.join("pkg/f"), b"").unwrap();
    fs::create_dir(root.join("dest")).unwrap();
    symlink(root.join("long_gone"), root.join("dest/f")).unwrap();

    let (api, facts, audit) = farm();
    let plan = api.plan_unstow(&[root.join("pkg")], &root.join("dest")).unwrap();
    assert!(!plan.aborted, "a dangling link never dooms an unstow");
    assert!(plan.ops.is_empty());
    assert_eq!(plan.conflicts.len(), 1);
    assert_eq!(plan.conflicts[0].reason, ConflictReason::BrokenLink);

    let expected = format!(
        "linkfarm unstow: can not unstow '{}': Conflicts with a broken link",
        root.join("dest/f").display()
    );
    assert!(audit.contains(&expected));

    // The advisory surfaces as a warn-decision plan fact.
    {
        let events = facts.events.lock().unwrap();
        assert!(events.iter().any(|(_, event, decision, fields)| {
            event == "plan"
                && decision == "warn"
                && fields.get("conflict").and_then(|v| v.as_str())
                    == Some("Conflicts with a broken link")
        }));
    }

    // Committing still succeeds and leaves the dangling link alone.
    api.unstow(&[root.join("pkg")], &root.join("dest")).unwrap();
    assert!(is_symlink(&root.join("dest/f")));
}

#[test]
fn unstow_recurses_into_unfolded_directories() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("pkgA/bin")).unwrap();
    fs::write(root.join("pkgA/bin/a"), b"").unwrap();
    fs::create_dir_all(root.join("pkgB/bin")).unwrap();
    fs::write(root.join("pkgB/bin/b"), b"").unwrap();
    fs::create_dir(root.join("dest")).unwrap();

    let (api, _facts, _audit) = farm();
    api.stow(&[root.join("pkgA")], &root.join("dest")).unwrap();
    api.stow(&[root.join("pkgB")], &root.join("dest")).unwrap();

    let plan = api.plan_unstow(&[root.join("pkgA")], &root.join("dest")).unwrap();
    assert_eq!(
        plan.ops,
        vec![Operation::RemoveLink {
            target: root.join("dest/bin/a"),
        }]
    );

    api.unstow(&[root.join("pkgA")], &root.join("dest")).unwrap();
    assert!(!root.join("dest/bin/a").exists());
    assert!(is_symlink(&root.join("dest/bin/b")));
    assert!(root.join("dest/bin").is_dir());
}

#[test]
fn unstow_skips_directory_links_owned_by_other_sources() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("pkgA/bin")).unwrap();
    fs::create_dir_all(root.join("pkgB/bin")).unwrap();
    fs::write(root.join("pkgB/bin/b"), b"").unwrap();
    fs::create_dir(root.join("dest")).unwrap();
    // dest/bin is a whole-directory link to pkgB, not pkgA.
    symlink(root.join("pkgB/bin"), root.join("dest/bin")).unwrap();

    let (api, _facts, _audit) = farm();
    let plan = api.plan_unstow(&[root.join("pkgA")], &root.join("dest")).unwrap();
    assert!(plan.ops.is_empty());
    assert!(plan.conflicts.is_empty());
    assert!(is_symlink(&root.join("dest/bin")));
}

#[test]
fn unstow_with_missing_source_is_invalid_input() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir(root.join("dest")).unwrap();

    let (api, _facts, audit) = farm();
    let err = api
        .plan_unstow(&[root.join("gone")], &root.join("dest"))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    let expected = format!(
        "linkfarm unstow: can not unstow from '{}': No such directory",
        root.join("gone").display()
    );
    assert!(audit.contains(&expected));
}
