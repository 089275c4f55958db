//! Application layer: loads instance files and turns the domain tree and
//! layout into views for the CLI.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
