//! Feed tree service
//!
//! Loads plugin instance records, rebuilds the feed tree and produces
//! serializable views of its layout.

use std::path::Path;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    release_tree, truncate_label, InstanceRecord, Layout, LayoutConfig, PluginInstance,
    TreeBuilder, TreeLayout, TreeNodeConvert,
};
use crate::infrastructure::traits::FileSystem;

/// Accepted shapes of an instance file: a bare list or a result page.
#[derive(Deserialize)]
#[serde(untagged)]
enum InstanceDocument {
    List(Vec<PluginInstance>),
    Page { results: Vec<PluginInstance> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootView {
    pub id: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: u64,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    pub delay_ms: u64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub parent_id: u64,
    pub child_id: u64,
    pub path: String,
    pub delay_ms: u64,
}

/// Layout of the primary tree, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub transition_ms: u64,
    pub total_duration_ms: u64,
}

impl LayoutView {
    fn from_layout(
        layout: &Layout<'_, PluginInstance>,
        selected: Option<u64>,
        label_max_chars: usize,
    ) -> Self {
        let nodes = layout
            .nodes()
            .iter()
            .map(|n| NodeView {
                id: n.record.id,
                label: truncate_label(&n.record.label(), label_max_chars),
                x: n.x,
                y: n.y,
                depth: n.depth,
                delay_ms: millis(n.delay),
                selected: n.is_selected(selected.as_ref()),
            })
            .collect();
        let edges = layout
            .edges()
            .iter()
            .map(|e| EdgeView {
                parent_id: e.parent.id,
                child_id: e.child.id,
                path: e.path.svg_d(),
                delay_ms: millis(e.delay),
            })
            .collect();
        Self {
            nodes,
            edges,
            transition_ms: millis(layout.timing().duration),
            total_duration_ms: millis(layout.total_duration()),
        }
    }
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Service turning instance files into trees and layouts.
pub struct FeedService {
    fs: Arc<dyn FileSystem>,
}

impl FeedService {
    /// Create a new feed service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read plugin instance records from a JSON file.
    pub fn load_instances(&self, path: &Path) -> ApplicationResult<Vec<PluginInstance>> {
        debug!("load_instances: path={}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("instance file not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("not a file: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "expected a JSON file",
                )),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read instance file", path)?;
        let document: InstanceDocument =
            serde_json::from_str(&content).map_err(|e| ApplicationError::Parse {
                context: path.display().to_string(),
                source: e,
            })?;
        let instances = match document {
            InstanceDocument::List(list) => list,
            InstanceDocument::Page { results } => results,
        };
        debug!("load_instances: {} records", instances.len());
        Ok(instances)
    }

    /// Text rendering of every tree in the feed, roots in input order.
    pub fn render_tree(&self, instances: &[PluginInstance]) -> ApplicationResult<String> {
        let tree = TreeBuilder::new().build(instances)?;
        let trees = tree.to_tree_string();
        let text = trees.iter().join("");
        trees.into_iter().for_each(release_tree);
        Ok(text)
    }

    pub fn roots(&self, instances: &[PluginInstance]) -> ApplicationResult<Vec<RootView>> {
        let tree = TreeBuilder::new().build(instances)?;
        Ok(tree
            .roots()
            .iter()
            .filter_map(|&idx| tree.record(idx))
            .map(|r| RootView {
                id: r.id,
                label: r.label(),
            })
            .collect())
    }

    /// Layout of the primary tree, `selected` marked.
    pub fn layout_view(
        &self,
        instances: &[PluginInstance],
        config: LayoutConfig,
        selected: Option<u64>,
        label_max_chars: usize,
    ) -> ApplicationResult<LayoutView> {
        let tree = TreeBuilder::new().build(instances)?;
        let engine = TreeLayout::new(config)?;
        let layout = engine.layout_primary(&tree);
        if let Some(id) = selected {
            if layout.node(&id).is_none() {
                debug!("layout_view: selected id {} not in layout", id);
            }
        }
        Ok(LayoutView::from_layout(&layout, selected, label_max_chars))
    }

    /// Record drawn under the point, as a click on the rendered tree would
    /// report it.
    pub fn select_at(
        &self,
        instances: &[PluginInstance],
        config: LayoutConfig,
        x: f64,
        y: f64,
        radius: f64,
    ) -> ApplicationResult<Option<PluginInstance>> {
        let tree = TreeBuilder::new().build(instances)?;
        let engine = TreeLayout::new(config)?;
        let layout = engine.layout_primary(&tree);
        Ok(layout.hit_test(x, y, radius).map(|n| n.record.clone()))
    }
}
