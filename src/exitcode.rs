//! Process exit codes, following BSD sysexits.h

/// Command line usage error, including a missing dataset argument
pub const USAGE: i32 = 64;

/// Dataset content rejected (negative or oversized weight)
pub const DATAERR: i32 = 65;

/// Dataset path does not exist
pub const NOINPUT: i32 = 66;

/// Internal software error (stale handle, broken invariant)
pub const SOFTWARE: i32 = 70;

/// Reading the dataset or writing output failed
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
