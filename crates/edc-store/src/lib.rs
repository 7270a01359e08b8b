#![deny(unsafe_code)]

//! Record store for the import pipeline.
//!
//! The core pipeline talks to storage through the [`RecordStore`] trait and
//! never depends on a specific engine. [`MemoryStore`] is the in-process
//! implementation: a single mutex-guarded state with monotonic id counters,
//! optionally snapshotted to a JSON file so the CLI keeps its state across
//! invocations.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::{NewRecord, RecordStore, TreeInsert};
