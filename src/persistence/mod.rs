//! Durability layer: snapshot save/load

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotError, SnapshotResult, FORMAT_VERSION};
