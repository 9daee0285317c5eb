//! Infrastructure layer: I/O implementations
//!
//! This layer implements the I/O boundary traits and persists selections.

pub mod error;
pub mod persistence;
pub mod store;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use persistence::{PersistenceAdapter, StorageKeys};
pub use store::{FileStore, MemoryStore};
pub use traits::{
    Clock, DataSource, FileDataSource, FileSystem, InlineDataSource, KeyValueStore,
    RealFileSystem, SystemClock,
};
