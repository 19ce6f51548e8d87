//! # Digest Store
//!
//! Persistence for the outputs of a digest run. There is no database: the
//! output directory is the only state, and the HTTP layer serves files back
//! out of it by name.
//!
//! Summary files are named with a random token and written exactly once;
//! the extracted-text and transcript side files are fixed names that each
//! run overwrites.

mod domain;
mod store;

pub use domain::{JobResult, SummaryDocument};
pub use store::fs::FsOutputStore;
pub use store::{OutputStore, StoredFile};
