//! Whole-store snapshot persistence
//!
//! A snapshot is a gzip-compressed JSON image of every node and edge in
//! insertion order. Writes go to a sibling temp file first and are renamed
//! into place, so an interrupted save never truncates an existing snapshot.

use crate::graph::{Edge, GraphError, GraphStore, Node};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Snapshot format version; bumped on incompatible layout changes
pub const FORMAT_VERSION: u32 = 1;

/// Errors raised while saving or loading snapshots
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("snapshot is inconsistent: {0}")]
    Corrupt(#[from] GraphError),

    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u32),

    #[error("engine was opened without a snapshot path")]
    NoPath,
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Serializable image of a whole graph store
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Snapshot {
    /// Capture the current store contents, in insertion order
    pub fn capture(store: &GraphStore) -> Self {
        Snapshot {
            format_version: FORMAT_VERSION,
            nodes: store.all_nodes().into_iter().cloned().collect(),
            edges: store.all_edges().into_iter().cloned().collect(),
        }
    }

    /// Rebuild a store from this snapshot
    ///
    /// Identity reservations, adjacency, and property indexes are rebuilt
    /// from the entity lists; timestamps are preserved. A snapshot carrying
    /// duplicate GUIDs or dangling edges is rejected as corrupt.
    pub fn restore(
        self,
        node_guid_key: impl Into<String>,
        edge_guid_key: impl Into<String>,
    ) -> SnapshotResult<GraphStore> {
        if self.format_version != FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.format_version));
        }

        let mut store = GraphStore::with_keys(node_guid_key, edge_guid_key);
        for node in self.nodes {
            store.insert_restored_node(node)?;
        }
        for edge in self.edges {
            store.insert_restored_edge(edge)?;
        }
        Ok(store)
    }

    /// Write this snapshot to disk
    pub fn save(&self, path: &Path) -> SnapshotResult<()> {
        let tmp = path.with_extension("tmp");
        let file = File::create(&tmp)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, self)?;
        let mut inner = encoder.finish()?;
        inner.flush()?;
        drop(inner);
        std::fs::rename(&tmp, path)?;

        debug!(path = %path.display(), nodes = self.nodes.len(), edges = self.edges.len(), "snapshot saved");
        Ok(())
    }

    /// Read a snapshot from disk
    pub fn load(path: &Path) -> SnapshotResult<Snapshot> {
        let file = File::open(path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let snapshot: Snapshot = serde_json::from_reader(decoder)?;

        debug!(path = %path.display(), nodes = snapshot.nodes.len(), edges = snapshot.edges.len(), "snapshot loaded");
        Ok(snapshot)
    }
}
