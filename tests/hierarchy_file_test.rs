//! Loading hierarchies and settings from files on disk.

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;

use checktree::application::{load_tree, ApplicationError, HierarchySource};
use checktree::config::Settings;
use checktree::domain::{render, DomainError, TriState};

const ANIMALS: &str = r#"
[[roots]]
label = "Animals"

[[roots.children]]
label = "Birds"
checked = true

[[roots.children.children]]
label = "Owl"

[[roots.children.children]]
label = "Crow"

[[roots.children]]
label = "Fish"

[[roots]]
label = "Plants"
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_hierarchy_file_when_loading_then_checked_subtree_and_derived_parents() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "animals.toml", ANIMALS);

    let tree = load_tree(&HierarchySource::File(path)).unwrap();
    let state = |p: &str| tree.state(tree.find_by_path(p).unwrap()).unwrap();

    assert_eq!(tree.roots().len(), 2);
    assert_eq!(state("Animals/Birds/Owl"), TriState::Checked);
    assert_eq!(state("Animals/Birds"), TriState::Checked);
    assert_eq!(state("Animals/Fish"), TriState::Unchecked);
    assert_eq!(state("Animals"), TriState::Inconsistent);
    assert_eq!(state("Plants"), TriState::Unchecked);
}

#[test]
fn given_loaded_file_when_toggling_then_each_root_is_independent() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "animals.toml", ANIMALS);
    let mut tree = load_tree(&HierarchySource::File(path)).unwrap();

    tree.toggle_path("Plants").unwrap();
    tree.toggle_path("Animals/Fish").unwrap();

    let out = render(&tree, &Default::default()).unwrap();
    assert!(out.starts_with("[x] Animals\n"));
    assert!(out.contains("[x] Plants"));
}

#[rstest]
#[case::empty_roots("roots = []\n")]
#[case::duplicate_siblings("[[roots]]\nlabel = \"a\"\n[[roots.children]]\nlabel = \"b\"\n[[roots.children]]\nlabel = \"b\"\n")]
#[case::blank_label("[[roots]]\nlabel = \"  \"\n")]
fn given_invalid_hierarchy_when_loading_then_domain_error(#[case] content: &str) {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.toml", content);

    let err = load_tree(&HierarchySource::File(path)).unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(
            DomainError::EmptyHierarchy
                | DomainError::DuplicateLabel { .. }
                | DomainError::InvalidLabel { .. }
        )
    ));
}

#[test]
fn given_missing_file_when_loading_then_operation_failed_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let err = load_tree(&HierarchySource::File(path)).unwrap_err();
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn given_config_file_when_loading_settings_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let config = write(
        &dir,
        "checktree.toml",
        "hierarchy = \"/srv/trees/europe.toml\"\n\n[glyphs]\nchecked = \"(*)\"\n",
    );

    let settings = Settings::load(Some(config.as_path())).expect("load settings");

    assert_eq!(
        settings.hierarchy,
        Some(PathBuf::from("/srv/trees/europe.toml"))
    );
    assert_eq!(settings.glyphs.checked, "(*)");
    assert_eq!(settings.glyphs.unchecked, "[ ]");
}

#[test]
fn given_broken_config_file_when_loading_settings_then_config_error() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "checktree.toml", "glyphs = 3\n");

    let err = Settings::load(Some(config.as_path())).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
}
