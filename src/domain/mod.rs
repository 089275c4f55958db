//! Domain layer: instance records, the rebuilt tree and its layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod animation;
pub mod arena;
pub mod builder;
pub mod error;
pub mod layout;
pub mod record;
pub mod tree_traits;

pub use animation::AnimationTiming;
pub use arena::{FeedTree, TreeNode};
pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use layout::{
    Bounds, EdgePath, Layout, LayoutConfig, LayoutEdge, LayoutNode, LinkShape, Orientation, Point,
    Sizing, TreeLayout,
};
pub use record::{truncate_label, InstanceRecord, PluginInstance};
pub use tree_traits::{release_tree, TreeNodeConvert};
