//! Integration tests for hierarchy construction and path resolution.
//!
//! Validates:
//! - Builder validation (names, duplicates, global collisions, defaults)
//! - Resolution of absolute and relative paths against the working directory
//! - Global command lookup
//! - The hierarchy handle handed to command actions

#[path = "fixtures/mod.rs"]
mod fixtures;

use fixtures::test_hierarchy;
use std::sync::Arc;
use trie_shell::tree::path::MAX_PATH_DEPTH;
use trie_shell::{
    BuildError, CommandDef, DirectoryId, HierarchyBuilder, Node, Param, PathError,
};

fn noop(name: &str) -> CommandDef {
    CommandDef::new(name, "", |_, _| Ok(()))
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_global_and_local_name_clash_fails_build() {
    let mut builder = HierarchyBuilder::new();
    builder.global_command(noop("help")).unwrap();
    builder.command("tools", noop("help")).unwrap();

    assert_eq!(
        builder.build().err(),
        Some(BuildError::GlobalCollision {
            name: "help".to_string(),
            directory: "/tools".to_string()
        })
    );
}

#[test]
fn test_system_commands_reserve_names() {
    let mut builder = HierarchyBuilder::with_system_commands();
    builder.directory("ls", "Shadowing a system command").unwrap();
    assert!(matches!(
        builder.build(),
        Err(BuildError::GlobalCollision { .. })
    ));
}

#[test]
fn test_builder_chaining() {
    let mut builder = HierarchyBuilder::new();
    builder
        .directory("a", "First")
        .unwrap()
        .directory("a/b", "Second")
        .unwrap()
        .command("a/b", noop("run"))
        .unwrap();
    let h = builder.build().unwrap();
    assert_eq!(h.directory_count(), 3);
    assert_eq!(h.command_count(), 1);
}

#[test]
fn test_builder_rejects_bad_parameters() {
    let mut builder = HierarchyBuilder::new();
    assert!(matches!(
        builder.command("/", noop("run").param(Param::integer("bad name", ""))),
        Err(BuildError::InvalidName { .. })
    ));
    assert!(matches!(
        builder.command("/", noop("run").param(Param::boolean("on", "").optional(1))),
        Err(BuildError::DefaultKindMismatch { .. })
    ));
}

// ============================================================================
// Path Resolution Tests
// ============================================================================

#[test]
fn test_root_and_relative_navigation() {
    let h = test_hierarchy();
    assert_eq!(h.resolve_directory("/"), Ok(DirectoryId::ROOT));

    let system = h.resolve_directory("system").unwrap();
    assert_eq!(h.resolve_directory("system/network/.."), Ok(system));
    assert_eq!(h.resolve_directory("system/."), Ok(system));
    assert_eq!(h.directory(system).unwrap().description(), "System commands");
}

#[test]
fn test_double_delimiter_is_invalid() {
    let h = test_hierarchy();
    assert_eq!(
        h.resolve_directory("system//network"),
        Err(PathError::InvalidPath {
            path: "system//network".to_string()
        })
    );
}

#[test]
fn test_relative_resolution_follows_working_directory() {
    let h = test_hierarchy();
    let network = h.resolve_directory("/system/network").unwrap();
    h.set_working_directory(network);

    let ping = h.resolve_command("ping").unwrap();
    assert_eq!(h.command_path(ping), "/system/network/ping");
    assert_eq!(h.resolve_command("../status").map(|id| h.command_path(id)), Ok("/system/status".to_string()));
    assert!(h.resolve_command("/math/add").is_ok());
}

#[test]
fn test_global_lookup_precedes_local() {
    let h = test_hierarchy();
    h.set_working_directory(h.resolve_directory("math").unwrap());

    let echo = h.resolve_command("echo").unwrap();
    assert!(h.command(echo).unwrap().is_global());
    assert_eq!(h.command_path(echo), "echo");
}

#[test]
fn test_resolve_node() {
    let h = test_hierarchy();
    assert!(matches!(h.resolve("system"), Ok(Node::Directory(_))));
    assert!(matches!(h.resolve("system/status"), Ok(Node::Command(_))));
    assert!(matches!(h.resolve("/"), Ok(Node::Directory(DirectoryId::ROOT))));
}

#[test]
fn test_command_path_cannot_end_with_delimiter() {
    let h = test_hierarchy();
    assert_eq!(
        h.resolve_command("system/status/"),
        Err(PathError::InvalidCommandPath {
            path: "system/status/".to_string()
        })
    );
}

#[test]
fn test_path_depth_limit() {
    let h = test_hierarchy();
    let deep = vec!["."; MAX_PATH_DEPTH + 1].join("/");
    assert_eq!(
        h.resolve_directory(&deep),
        Err(PathError::PathTooDeep {
            max: MAX_PATH_DEPTH
        })
    );
}

// ============================================================================
// Handle Tests
// ============================================================================

#[test]
fn test_handle_resolves_to_built_hierarchy() {
    let builder = HierarchyBuilder::with_system_commands();
    let handle = builder.handle();
    assert!(!handle.is_bound());

    let h = builder.build().unwrap();
    assert!(Arc::ptr_eq(&handle.get().unwrap(), &h));
    assert_eq!(handle.bind(&h), Err(BuildError::AlreadyBound));
}

#[test]
fn test_hierarchy_shared_across_threads() {
    let h = test_hierarchy();
    let system = h.resolve_directory("system").unwrap();

    let worker = {
        let h = Arc::clone(&h);
        std::thread::spawn(move || h.set_working_directory(system))
    };
    worker.join().unwrap();

    assert_eq!(h.working_directory(), system);
}
