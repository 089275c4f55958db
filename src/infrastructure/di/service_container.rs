//! Wiring of settings, filesystem and services for one CLI invocation.

use std::sync::Arc;

use crate::application::services::FeedService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

pub struct ServiceContainer {
    pub settings: Arc<Settings>,
    pub fs: Arc<dyn FileSystem>,
    pub feed: FeedService,
}

impl ServiceContainer {
    /// Container backed by the real filesystem.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Container over an injected filesystem.
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let feed = FeedService::new(Arc::clone(&fs));

        Self { settings, fs, feed }
    }
}
