//! gent core collaborators
//!
//! Error types, the unique-membership [`Set`], and the [`FileSystem`]
//! abstraction consumed by the snapshot harness.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assert_fs;
pub mod error;
pub mod fs;
pub mod set;

// Re-exports
pub use assert_fs::AssertFs;
pub use error::{CoreError, CoreResult};
pub use fs::{FileSystem, MemFs, OsFs};
pub use set::Set;
