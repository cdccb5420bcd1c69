//! Application layer: interactive session state
//!
//! This layer orchestrates domain operations for a front end; it performs no I/O.

pub mod error;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use session::{Action, SessionEvent, TreemapSession};
