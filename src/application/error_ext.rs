//! Attach the failing path to I/O errors.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait IoResultExt<T> {
    /// Map an I/O failure to `OperationFailed`, naming `action` and `path`.
    ///
    /// ```ignore
    /// let json = fs.read_to_string(path).with_path_context("read instance file", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::OperationFailed {
            context: format!("{} {}", action, path.display()),
            source: Box::new(source),
        })
    }
}
