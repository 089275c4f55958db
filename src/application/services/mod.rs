//! Application services: concrete structs over the `FileSystem` boundary.

mod feed;

pub use feed::{EdgeView, FeedService, LayoutView, NodeView, RootView};
