//! Tests for TreeLoader: JSON/TOML, nested/flat, and error reporting

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use treeflow::application::services::TreeLoader;
use treeflow::application::ApplicationError;
use treeflow::domain::{DomainError, TreeBuilder};
use treeflow::infrastructure::traits::RealFileSystem;
use treeflow::util::testing::{init_test_setup, sample_tree};

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/trees")
        .join(name)
}

fn loader() -> TreeLoader {
    init_test_setup();
    TreeLoader::new(Arc::new(RealFileSystem))
}

#[rstest]
#[case::nested_json("sample.json", 14)]
#[case::nested_toml("sample.toml", 5)]
#[case::flat_json("flat.json", 4)]
#[case::flat_toml("flat.toml", 3)]
fn given_valid_file_when_loading_then_tree_built(#[case] file: &str, #[case] nodes: usize) {
    let tree = loader().load(&resource(file)).unwrap();

    assert_eq!(tree.len(), nodes);
    let root = tree.get_node(tree.root().unwrap()).unwrap();
    assert_eq!(root.data.id, "root");
    assert_eq!(root.data.label, "Root System");
}

#[test]
fn given_sample_json_when_loading_then_matches_builtin_sample() {
    let loaded = loader().load(&resource("sample.json")).unwrap();
    let builtin = TreeBuilder::new().build_from_tree(&sample_tree()).unwrap();

    let ids = |t: &treeflow::domain::TreeArena| {
        t.iter()
            .map(|(_, n)| (n.data.id.clone(), n.data.meta.clone(), n.depth))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&loaded), ids(&builtin));
}

#[test]
fn given_flat_json_when_loading_then_children_keep_record_order() {
    let tree = loader().load(&resource("flat.json")).unwrap();

    let root = tree.get_node(tree.root().unwrap()).unwrap();
    let children: Vec<_> = root
        .children
        .iter()
        .map(|&c| tree.get_node(c).unwrap().data.id.as_str())
        .collect();
    assert_eq!(children, vec!["B", "A"]);
    let a1 = tree.get_node(tree.find("A1").unwrap()).unwrap();
    assert_eq!(a1.data.meta, "Login Handler");
    // meta defaults to empty
    let b = tree.get_node(tree.find("B").unwrap()).unwrap();
    assert_eq!(b.data.meta, "");
}

#[test]
fn given_cycle_when_loading_then_domain_error() {
    let err = loader().load(&resource("cycle.json")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::CycleDetected(ref id)) if id == "A"
    ));
}

#[test]
fn given_duplicate_id_when_loading_then_domain_error() {
    let err = loader().load(&resource("duplicate.json")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DuplicateId(ref id)) if id == "A"
    ));
}

#[test]
fn given_missing_label_when_loading_then_parse_error_names_field_and_file() {
    let path = resource("missing_label.json");

    let err = loader().load(&path).unwrap_err();

    match &err {
        ApplicationError::Parse { path: p, message } => {
            assert_eq!(p, &path);
            assert!(message.contains("label"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("missing_label.json"));
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let temp = TempDir::new().unwrap();

    let err = loader().load(&temp.path().join("nope.json")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[rstest]
#[case::json("tree.json", "{ not json")]
#[case::toml("tree.toml", "id = ")]
fn given_malformed_content_when_loading_then_parse_error(
    #[case] name: &str,
    #[case] content: &str,
) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();

    // Act
    let err = loader().load(&path).unwrap_err();

    // Assert
    assert!(matches!(err, ApplicationError::Parse { .. }), "{err}");
}

#[test]
fn given_deep_tree_when_loading_with_small_limit_then_rejected() {
    let err = loader()
        .with_max_depth(2)
        .load(&resource("sample.json"))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::DepthExceeded { max: 2, .. })
    ));
}

/// Nested JSON chain `n0 -> n1 -> ... -> n{levels - 1}`.
fn chain_json(levels: usize) -> String {
    let mut json = String::new();
    for i in 0..levels {
        json.push_str(&format!(r#"{{"id": "n{i}", "label": "Node {i}", "children": ["#));
    }
    for _ in 0..levels {
        json.push_str("]}");
    }
    json
}

#[test]
fn given_nested_json_deeper_than_64_levels_when_loading_then_tree_built() {
    // Arrange: 100 levels is past serde_json's default recursion limit
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deep.json");
    fs::write(&path, chain_json(100)).unwrap();

    // Act
    let tree = loader().load(&path).unwrap();

    // Assert
    assert_eq!(tree.len(), 100);
    assert_eq!(tree.depth(), 99);
}

#[test]
fn given_nested_json_deeper_than_limit_when_loading_then_depth_exceeded() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deep.json");
    fs::write(&path, chain_json(100)).unwrap();

    let err = loader().with_max_depth(60).load(&path).unwrap_err();

    assert!(
        matches!(
            err,
            ApplicationError::Domain(DomainError::DepthExceeded { ref id, depth: 61, max: 60 })
                if id == "n61"
        ),
        "{err}"
    );
}

#[test]
fn given_pathological_nesting_when_loading_then_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("brackets.json");
    fs::write(&path, format!("{}{}", "[".repeat(100_000), "]".repeat(100_000))).unwrap();

    let err = loader().load(&path).unwrap_err();

    assert!(
        matches!(err, ApplicationError::Parse { ref message, .. } if message.contains("nesting")),
        "{err}"
    );
}

#[test]
fn given_unknown_extension_when_loading_then_parsed_as_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tree.data");
    fs::write(&path, r#"{"id": "root", "label": "Root System"}"#).unwrap();

    let tree = loader().load(&path).unwrap();

    assert_eq!(tree.len(), 1);
}
