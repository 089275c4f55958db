//! Process exit codes, following BSD `sysexits.h` where a value exists there.

pub const OK: i32 = 0;

/// `select` hit no node
pub const NOTFOUND: i32 = 1;

/// Bad flags or arguments (EX_USAGE)
pub const USAGE: i32 = 64;

/// Instance file parsed but its hierarchy is invalid (EX_DATAERR)
pub const DATAERR: i32 = 65;

/// Instance file missing or unreadable (EX_NOINPUT)
pub const NOINPUT: i32 = 66;

/// Settings or layout configuration rejected (EX_CONFIG)
pub const CONFIG: i32 = 78;
