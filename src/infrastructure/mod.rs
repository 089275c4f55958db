//! Infrastructure layer: real I/O and service wiring

pub mod di;
pub mod traits;
