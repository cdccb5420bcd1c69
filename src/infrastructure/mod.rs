//! Infrastructure layer: dataset sources backed by real I/O

pub mod error;
pub mod fs_source;

pub use error::{InfraError, InfraResult};
pub use fs_source::FileSystemSource;
