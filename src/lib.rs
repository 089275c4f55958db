//! Rebuilds a feed's plugin instance hierarchy from flat records and lays it
//! out for animated rendering.
//!
//! ```
//! use feedtree::domain::{PluginInstance, TreeBuilder, TreeLayout, LayoutConfig};
//!
//! let records = vec![
//!     PluginInstance::new(1, None),
//!     PluginInstance::new(2, Some(1)),
//!     PluginInstance::new(3, Some(1)),
//! ];
//! let tree = TreeBuilder::new().build(&records).unwrap();
//! let layout = TreeLayout::new(LayoutConfig::default()).unwrap().layout_primary(&tree);
//! assert_eq!(layout.nodes().len(), 3);
//! assert_eq!(layout.edges().len(), 2);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
