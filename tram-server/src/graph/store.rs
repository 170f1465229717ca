//! Shared read access to the current graph.

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, trace};

use super::{DataVersion, Graph, GraphError};

/// Source of read transactions over a graph.
pub trait GraphStore: Send + Sync {
    /// Open a transaction pinned to the current graph.
    fn begin_read(&self) -> Result<ReadTransaction, GraphError>;

    /// Version of the current graph, if the store is available.
    fn version(&self) -> Option<DataVersion>;

    fn is_available(&self) -> bool;
}

/// A read-only view of one graph. Later replacements of the store's graph
/// do not affect an open transaction.
pub struct ReadTransaction {
    id: u64,
    graph: Arc<Graph>,
}

impl ReadTransaction {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl Deref for ReadTransaction {
    type Target = Graph;

    fn deref(&self) -> &Graph {
        &self.graph
    }
}

impl Drop for ReadTransaction {
    fn drop(&mut self) {
        trace!(transaction = self.id, "read transaction closed");
    }
}

/// Keeps the graph in memory behind an `Arc`.
pub struct InMemoryGraphStore {
    graph: RwLock<Arc<Graph>>,
    available: AtomicBool,
    next_transaction: AtomicU64,
}

impl InMemoryGraphStore {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph: RwLock::new(Arc::new(graph)),
            available: AtomicBool::new(true),
            next_transaction: AtomicU64::new(1),
        }
    }

    /// Swap in a rebuilt graph.
    pub fn replace(&self, graph: Graph) {
        info!(version = %graph.version(), "graph replaced");
        let mut current = self.graph.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(graph);
    }

    pub fn mark_unavailable(&self) {
        self.available.store(false, Ordering::Release);
    }

    pub fn mark_available(&self) {
        self.available.store(true, Ordering::Release);
    }

    fn current(&self) -> Result<Arc<Graph>, GraphError> {
        if !self.is_available() {
            return Err(GraphError::Unavailable);
        }
        let graph = self.graph.read().map_err(|_| GraphError::Unavailable)?;
        Ok(Arc::clone(&graph))
    }
}

impl GraphStore for InMemoryGraphStore {
    fn begin_read(&self) -> Result<ReadTransaction, GraphError> {
        let graph = self.current()?;
        let id = self.next_transaction.fetch_add(1, Ordering::Relaxed);
        trace!(transaction = id, "read transaction opened");
        Ok(ReadTransaction { id, graph })
    }

    fn version(&self) -> Option<DataVersion> {
        self.current().ok().map(|g| g.version().clone())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }
}
