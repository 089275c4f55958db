use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use feedtree::application::services::FeedService;
use feedtree::application::ApplicationError;
use feedtree::domain::{DomainError, LayoutConfig, PluginInstance};
use feedtree::infrastructure::traits::FileSystem;
use feedtree::util::testing::init_test_setup;

/// In-memory filesystem keyed by path.
#[derive(Default)]
struct MockFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MockFileSystem {
    fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(PathBuf::from(path), content.to_string());
        self
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

const FEED: &str = r#"[
    {"id": 1, "previous_id": null, "plugin_name": "pl-dircopy", "plugin_version": "2.1.1", "status": "finishedSuccessfully"},
    {"id": 2, "previous_id": 1, "plugin_name": "pl-mri10yr", "plugin_version": "1.0"},
    {"id": 3, "previous_id": 1, "plugin_name": "pl-simpledsapp", "plugin_version": "2.0.2"},
    {"id": 4, "previous_id": 2, "plugin_name": "pl-fshack", "plugin_version": "1.2.0", "title": "recon"}
]"#;

fn service(fs: MockFileSystem) -> FeedService {
    FeedService::new(Arc::new(fs))
}

fn feed() -> Vec<PluginInstance> {
    service(MockFileSystem::default().with_file("/feed.json", FEED))
        .load_instances(Path::new("/feed.json"))
        .unwrap()
}

#[test]
fn given_json_list_when_loading_then_returns_records_with_extra_fields() {
    // Arrange
    init_test_setup();
    let svc = service(MockFileSystem::default().with_file("/feed.json", FEED));

    // Act
    let instances = svc.load_instances(Path::new("/feed.json")).unwrap();

    // Assert
    assert_eq!(instances.len(), 4);
    assert_eq!(instances[0].previous_id, None);
    assert_eq!(instances[3].previous_id, Some(2));
    assert_eq!(instances[3].title.as_deref(), Some("recon"));
    assert_eq!(
        instances[0].extra.get("status"),
        Some(&serde_json::json!("finishedSuccessfully"))
    );
}

#[test]
fn given_result_page_when_loading_then_unwraps_results() {
    let page = r#"{"count": 2, "next": null, "results": [
        {"id": 7, "plugin_name": "pl-dircopy"},
        {"id": 8, "previous_id": 7}
    ]}"#;
    let svc = service(MockFileSystem::default().with_file("/page.json", page));

    let instances = svc.load_instances(Path::new("/page.json")).unwrap();

    assert_eq!(instances.iter().map(|i| i.id).collect::<Vec<_>>(), vec![7, 8]);
    assert_eq!(instances[1].previous_id, Some(7));
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let svc = service(MockFileSystem::default());

    let result = svc.load_instances(Path::new("/nope.json"));

    assert!(matches!(result, Err(ApplicationError::OperationFailed { .. })));
}

#[test]
fn given_malformed_json_when_loading_then_parse_error() {
    let svc = service(MockFileSystem::default().with_file("/bad.json", "[{\"id\": }"));

    let result = svc.load_instances(Path::new("/bad.json"));

    assert!(matches!(result, Err(ApplicationError::Parse { .. })));
}

#[test]
fn given_feed_when_rendering_tree_then_one_line_per_instance() {
    let instances = feed();
    let svc = service(MockFileSystem::default());

    let text = svc.render_tree(&instances).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "pl-dircopy v. 2.1.1 [1]");
    assert!(lines[2].ends_with("recon [4]"));
}

#[test]
fn given_duplicate_ids_when_rendering_then_domain_error_surfaces() {
    let instances = vec![PluginInstance::new(1, None), PluginInstance::new(1, None)];
    let svc = service(MockFileSystem::default());

    let result = svc.render_tree(&instances);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::DuplicateId(_)))
    ));
}

#[test]
fn given_forest_when_listing_roots_then_input_order_with_labels() {
    let instances = vec![
        PluginInstance::new(5, None).with_plugin("pl-dircopy", "2.1.1"),
        PluginInstance::new(6, Some(5)),
        PluginInstance::new(9, Some(404)).with_title("orphan"),
    ];
    let svc = service(MockFileSystem::default());

    let roots = svc.roots(&instances).unwrap();

    let summary: Vec<(u64, &str)> = roots.iter().map(|r| (r.id, r.label.as_str())).collect();
    assert_eq!(summary, vec![(5, "pl-dircopy v. 2.1.1"), (9, "orphan")]);
}

#[test]
fn given_selection_when_building_layout_view_then_marks_node_and_truncates_labels() {
    // Arrange
    let instances = feed();
    let svc = service(MockFileSystem::default());

    // Act
    let view = svc
        .layout_view(&instances, LayoutConfig::default(), Some(3), 12)
        .unwrap();

    // Assert
    assert_eq!(view.nodes.len(), 4);
    assert_eq!(view.edges.len(), 3);
    let selected: Vec<u64> = view.nodes.iter().filter(|n| n.selected).map(|n| n.id).collect();
    assert_eq!(selected, vec![3]);
    assert_eq!(view.nodes[0].label, "pl-dircopy v...");
    assert_eq!(view.nodes[2].label, "recon");
    assert_eq!(view.nodes[2].delay_ms, 400);
    assert_eq!(view.transition_ms, 100);
    assert_eq!(view.total_duration_ms, 500);
    assert!(view.edges.iter().all(|e| e.path.starts_with('M')));
}

#[test]
fn given_unknown_selection_when_building_layout_view_then_nothing_selected() {
    let instances = feed();
    let svc = service(MockFileSystem::default());

    let view = svc
        .layout_view(&instances, LayoutConfig::default(), Some(99), 0)
        .unwrap();

    assert!(view.nodes.iter().all(|n| !n.selected));
    assert_eq!(view.nodes[0].label, "pl-dircopy v. 2.1.1");
}

#[test]
fn given_layout_view_when_serializing_then_exposes_render_fields() {
    let instances = feed();
    let svc = service(MockFileSystem::default());

    let view = svc
        .layout_view(&instances, LayoutConfig::default(), None, 12)
        .unwrap();
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["nodes"][0]["id"], 1);
    assert_eq!(json["edges"][0]["parent_id"], 1);
    assert_eq!(json["total_duration_ms"], 500);
}

#[test]
fn given_point_on_node_when_selecting_then_returns_that_instance() {
    let instances = feed();
    let svc = service(MockFileSystem::default());

    let hit = svc
        .select_at(&instances, LayoutConfig::default(), 202.0, 3.0, 8.0)
        .unwrap();
    let miss = svc
        .select_at(&instances, LayoutConfig::default(), 10.0, 10.0, 8.0)
        .unwrap();

    assert_eq!(hit.map(|i| i.id), Some(1));
    assert!(miss.is_none());
}
