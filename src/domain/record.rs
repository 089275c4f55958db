//! Instance records: the flat input the tree is rebuilt from.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A unit of work with an identifier and an optional parent identifier.
///
/// The core only reads `id` and `previous_id`; everything else a record
/// carries is opaque payload owned by the caller.
pub trait InstanceRecord {
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Parent identifier, `None` marks a root candidate.
    fn previous_id(&self) -> Option<&Self::Id>;

    /// Display text for the node, defaults to the id.
    fn label(&self) -> String {
        self.id().to_string()
    }
}

/// Plugin instance as delivered by the job API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInstance {
    pub id: u64,
    #[serde(default, alias = "previousId")]
    pub previous_id: Option<u64>,
    #[serde(default)]
    pub plugin_name: String,
    #[serde(default)]
    pub plugin_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Remaining fields, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PluginInstance {
    pub fn new(id: u64, previous_id: Option<u64>) -> Self {
        Self {
            id,
            previous_id,
            plugin_name: String::new(),
            plugin_version: String::new(),
            title: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_plugin(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.plugin_name = name.into();
        self.plugin_version = version.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl InstanceRecord for PluginInstance {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn previous_id(&self) -> Option<&u64> {
        self.previous_id.as_ref()
    }

    fn label(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        match (self.plugin_name.is_empty(), self.plugin_version.is_empty()) {
            (true, _) => self.id.to_string(),
            (false, true) => self.plugin_name.clone(),
            (false, false) => format!("{} v. {}", self.plugin_name, self.plugin_version),
        }
    }
}

impl fmt::Display for PluginInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.id)
    }
}

/// Truncate a label to `max_chars` characters, marking the cut with `...`.
///
/// `max_chars == 0` disables truncation.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if max_chars == 0 || label.chars().count() <= max_chars {
        return label.to_string();
    }
    let head: String = label.chars().take(max_chars).collect();
    format!("{}...", head)
}
