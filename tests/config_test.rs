//! Integration tests for Settings config loading with layered precedence.
//!
//! Precedence: defaults < global file < local file < environment.
//! These tests pass explicit file locations and disable the environment
//! layer; see `config_env_test.rs` for environment overrides.

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;

use treeflow::application::ApplicationError;
use treeflow::config::Settings;
use treeflow::domain::LayoutSpec;
use treeflow::infrastructure::ViewSettings;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config file");
    path
}

#[test]
fn given_no_files_when_loading_then_defaults() {
    let settings = Settings::load_from(None, None, false).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.layout, LayoutSpec::default());
    assert_eq!(settings.view, ViewSettings::default());
    assert!(settings.tree_file.is_none());
}

#[test]
fn given_missing_global_file_when_loading_then_skipped() {
    let temp = TempDir::new().unwrap();

    let settings =
        Settings::load_from(Some(&temp.path().join("absent.toml")), None, false).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_missing_local_file_when_loading_then_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load_from(None, Some(&temp.path().join("absent.toml")), false);

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_global_and_local_when_loading_then_local_wins_per_key() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let global = write(
        &temp,
        "global.toml",
        r#"
[layout]
sibling_gap = 50.0
level_gap = 100.0

[view]
fit_padding = 0.1
"#,
    );
    let local = write(
        &temp,
        "local.toml",
        r#"
[layout]
sibling_gap = 10.0
"#,
    );

    // Act
    let settings = Settings::load_from(Some(&global), Some(&local), false).unwrap();

    // Assert
    assert_eq!(settings.layout.sibling_gap, 10.0, "local overrides global");
    assert_eq!(settings.layout.level_gap, 100.0, "global overrides default");
    assert_eq!(settings.layout.node_width, 160.0, "untouched default");
    assert_eq!(settings.view.fit_padding, 0.1);
    assert_eq!(settings.view.max_zoom, 2.0);
}

#[test]
fn given_tree_file_with_env_var_when_loading_then_expanded() {
    let temp = TempDir::new().unwrap();
    let home = std::env::var("HOME").unwrap_or_default();
    let local = write(&temp, "local.toml", "tree_file = \"$HOME/trees/system.json\"\n");

    let settings = Settings::load_from(None, Some(&local), false).unwrap();

    assert_eq!(
        settings.tree_file,
        Some(PathBuf::from(format!("{}/trees/system.json", home)))
    );
}

#[test]
fn given_negative_gap_when_loading_then_rejected() {
    let temp = TempDir::new().unwrap();
    let local = write(&temp, "local.toml", "[layout]\nsibling_gap = -5.0\n");

    let result = Settings::load_from(None, Some(&local), false);

    assert!(matches!(result, Err(ApplicationError::Domain(_))));
}

#[rstest]
#[case::inverted_zoom("min_zoom = 3.0\nmax_zoom = 2.0\n")]
#[case::zero_min_zoom("min_zoom = 0.0\n")]
#[case::nan_zoom("max_zoom = nan\n")]
#[case::negative_padding("fit_padding = -0.1\n")]
#[case::empty_viewport("viewport_width = 0.0\n")]
#[case::infinite_viewport("viewport_height = inf\n")]
fn given_invalid_view_when_loading_then_config_error(#[case] view: &str) {
    let temp = TempDir::new().unwrap();
    let local = write(&temp, "local.toml", &format!("[view]\n{view}"));

    let result = Settings::load_from(None, Some(&local), false);

    assert!(
        matches!(result, Err(ApplicationError::Config { ref message }) if message.contains("view")),
        "{result:?}"
    );
}

#[test]
fn given_malformed_toml_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    let local = write(&temp, "local.toml", "[layout\nnode_width = 1\n");

    let result = Settings::load_from(None, Some(&local), false);

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_serialized_then_loadable_again() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.layout.node_width = 200.0;
    settings.layout.initial_expand_depth = 2;
    settings.view.viewport_width = 1920.0;

    // Act
    let local = write(&temp, "local.toml", &settings.to_toml().unwrap());
    let loaded = Settings::load_from(None, Some(&local), false).unwrap();

    // Assert
    assert_eq!(loaded, settings);
}

#[test]
fn given_template_when_loaded_then_equals_defaults() {
    let temp = TempDir::new().unwrap();
    let local = write(&temp, "local.toml", &Settings::template());

    let settings = Settings::load_from(None, Some(&local), false).unwrap();

    assert_eq!(settings, Settings::default());
}
