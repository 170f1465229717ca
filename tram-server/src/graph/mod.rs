//! The time-expanded transit graph: building, storing, and persisting it.

mod builder;
mod error;
mod network;
mod node;
mod persist;
mod store;
mod version;

pub use builder::{BuildReport, GraphBuilder, GraphConfig};
pub use error::GraphError;
pub use network::Graph;
pub use node::{Edge, Node, NodeId, Relationship, RelationshipId};
pub use persist::{GraphFile, LoadedGraph};
pub use store::{GraphStore, InMemoryGraphStore, ReadTransaction};
pub use version::DataVersion;
