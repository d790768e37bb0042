//! Plugin discovery over real directories with fake modules

mod common;

use common::mock_helpers::{write_corrupt_module, write_module, FakeLoader, MODULE_EXTENSION};
use common::test_timeout;
use fyre_pipeline::config::EditorConfig;
use fyre_pipeline::pipeline::{NodeStatus, Pipeline};
use fyre_pipeline::plugin::{discover, DiscoveryOptions, PluginLoadError, PluginRegistry};
use fyre_pipeline::Element;
use std::path::PathBuf;
use std::sync::Arc;

fn plugin_options() -> DiscoveryOptions {
    DiscoveryOptions {
        library_extension: MODULE_EXTENSION.to_string(),
        include_builtins: false,
    }
}

#[test]
fn test_valid_modules_plus_one_corrupt() {
    for n in 0..5 {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..n {
            let export = format!("element:Source {}", i);
            write_module(dir.path(), &format!("mod{}", i), &[export.as_str()]);
        }
        let corrupt = write_corrupt_module(dir.path(), "broken");

        let report = discover(&FakeLoader, &[dir.path().to_path_buf()], &plugin_options());
        assert_eq!(report.catalog.len(), n, "catalog size with {} valid modules", n);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, corrupt);
        assert_eq!(report.scanned, n + 1);
    }
}

#[test]
fn test_catalog_order_follows_search_paths_then_file_names() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_module(second.path(), "a", &["element:Second A"]);
    write_module(first.path(), "b", &["element:First B"]);
    write_module(first.path(), "a", &["element:First A"]);

    let paths = vec![first.path().to_path_buf(), second.path().to_path_buf()];
    let report = discover(&FakeLoader, &paths, &plugin_options());
    assert_eq!(
        report.catalog.names(),
        vec!["First A", "First B", "Second A"]
    );
}

#[test]
fn test_only_element_exports_are_cataloged() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "mixed", &["other:Helper", "element:Useful"]);

    let report = discover(&FakeLoader, &[dir.path().to_path_buf()], &plugin_options());
    assert_eq!(report.catalog.names(), vec!["Useful"]);
    assert!(report.failures.is_empty());
}

#[test]
fn test_other_extensions_and_subdirectories_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "top", &["element:Top"]);
    std::fs::write(dir.path().join("notes.txt"), "element:Nope").unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_module(&nested, "deep", &["element:Deep"]);

    let report = discover(&FakeLoader, &[dir.path().to_path_buf()], &plugin_options());
    assert_eq!(report.catalog.names(), vec!["Top"]);
}

#[test]
fn test_duplicate_names_keep_first_registration() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "a", &["element:Shared"]);
    let later = write_module(dir.path(), "b", &["element:Shared"]);

    let report = discover(&FakeLoader, &[dir.path().to_path_buf()], &plugin_options());
    assert_eq!(report.catalog.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, later);
    assert!(matches!(
        report.failures[0].error,
        PluginLoadError::DuplicateElement { .. }
    ));
}

#[test]
fn test_unreadable_search_path_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "ok", &["element:Fine"]);

    let paths = vec![PathBuf::from("/definitely/not/here"), dir.path().to_path_buf()];
    let report = discover(&FakeLoader, &paths, &plugin_options());
    assert_eq!(report.catalog.names(), vec!["Fine"]);
    assert!(report.failures.is_empty());
}

#[test]
fn test_registry_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "ext", &["element:Extra"]);

    let mut config = EditorConfig::default();
    config.plugins.search_paths = vec![dir.path().to_path_buf()];
    config.plugins.include_default_dirs = false;
    config.plugins.library_extension = Some(MODULE_EXTENSION.to_string());

    let registry = PluginRegistry::from_config(Arc::new(FakeLoader), &config);
    assert_eq!(registry.search_paths(), &[dir.path().to_path_buf()]);

    let report = registry.refresh();
    assert!(report.failures.is_empty());
    let names: Vec<String> = registry
        .list_element_kinds()
        .into_iter()
        .map(|k| k.name)
        .collect();
    assert_eq!(names, vec!["Constant", "Matrix Multiply", "Pixmap", "Extra"]);
}

#[test]
fn test_background_refresh_swaps_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PluginRegistry::new(
        Arc::new(FakeLoader),
        vec![dir.path().to_path_buf()],
        plugin_options(),
    );

    let before = registry.catalog();
    assert!(before.is_empty());

    write_module(dir.path(), "late", &["element:Late"]);
    let report = registry
        .spawn_refresh()
        .recv_timeout(test_timeout())
        .unwrap();
    assert_eq!(report.catalog.names(), vec!["Late"]);

    // Readers holding the old catalog keep a consistent view.
    assert!(before.is_empty());
    assert!(registry.catalog().contains("Late"));
}

#[test]
fn test_plugin_element_in_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "src", &["element:Ticker"]);

    let registry = PluginRegistry::new(
        Arc::new(FakeLoader),
        vec![dir.path().to_path_buf()],
        DiscoveryOptions {
            include_builtins: true,
            ..plugin_options()
        },
    );
    registry.refresh();

    let mut pipeline = Pipeline::new();
    let ticker = pipeline.add_node(registry.create_element("Ticker").unwrap()).unwrap();
    let pixmap = pipeline.add_node(registry.create_element("Pixmap").unwrap()).unwrap();
    assert_eq!(pipeline.node(ticker).unwrap().category(), "Test");

    // Pixmap width and height take ints.
    pipeline.add_edge(ticker, 0, pixmap, 0).unwrap();
    pipeline.add_edge(ticker, 0, pixmap, 1).unwrap();
    assert_eq!(pipeline.node_status(pixmap), Some(NodeStatus::Pending));

    // The point pad wants pair(int).
    assert!(pipeline.add_edge(ticker, 0, pixmap, 2).is_err());
}
