//! Saving and reloading built graphs.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::neighbours::{NeighbourConfig, NeighbourLinker};
use crate::spatial::StationLocations;
use crate::timetable::Timetable;

use super::{DataVersion, Graph, GraphBuilder, GraphConfig, GraphError};

/// Written next to the graph once it is complete. A graph is reused only
/// if its marker matches the inputs exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BuildMarker {
    version: DataVersion,
    neighbours: NeighbourConfig,
}

/// Result of [`GraphFile::load_or_build`].
#[derive(Debug)]
pub struct LoadedGraph {
    pub graph: Graph,
    /// False if the file on disk was reused.
    pub rebuilt: bool,
}

/// A graph persisted as JSON, with its build marker alongside.
#[derive(Debug, Clone)]
pub struct GraphFile {
    path: PathBuf,
}

impl GraphFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn marker_path(&self) -> PathBuf {
        self.path.with_extension("version")
    }

    /// Write the graph, then its marker.
    ///
    /// The old marker is removed first, so an interrupted save is never
    /// mistaken for a complete one.
    pub fn save(&self, graph: &Graph, neighbours: &NeighbourConfig) -> Result<(), GraphError> {
        let marker_path = self.marker_path();
        match fs::remove_file(&marker_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(GraphError::io(&marker_path, e)),
        }

        write_json(&self.path, graph)?;
        write_json(
            &marker_path,
            &BuildMarker {
                version: graph.version().clone(),
                neighbours: neighbours.clone(),
            },
        )?;
        info!(path = %self.path.display(), version = %graph.version(), "saved graph");
        Ok(())
    }

    /// Read the graph back, checking it carries `expected`.
    pub fn load(&self, expected: &DataVersion) -> Result<Graph, GraphError> {
        let file = File::open(&self.path).map_err(|e| GraphError::io(&self.path, e))?;
        let graph: Graph = serde_json::from_reader(BufReader::new(file))?;
        if graph.version() != expected {
            return Err(GraphError::VersionMismatch {
                expected: expected.clone(),
                found: graph.version().clone(),
            });
        }
        Ok(graph)
    }

    fn read_marker(&self) -> Option<BuildMarker> {
        let text = fs::read_to_string(self.marker_path()).ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Reuse the saved graph if it was built from the same inputs, otherwise
    /// build a fresh one, link neighbours, and save it.
    pub fn load_or_build(
        &self,
        timetable: &Timetable,
        graph_config: &GraphConfig,
        neighbour_config: &NeighbourConfig,
        locations: &StationLocations,
    ) -> Result<LoadedGraph, GraphError> {
        let expected = BuildMarker {
            version: DataVersion::of_build(timetable, graph_config),
            neighbours: neighbour_config.clone(),
        };

        if self.read_marker().as_ref() == Some(&expected) {
            match self.load(&expected.version) {
                Ok(graph) => {
                    info!(path = %self.path.display(), version = %expected.version, "reusing saved graph");
                    return Ok(LoadedGraph {
                        graph,
                        rebuilt: false,
                    });
                }
                Err(err) => warn!(path = %self.path.display(), error = %err, "saved graph unusable, rebuilding"),
            }
        } else {
            info!(path = %self.path.display(), "no matching saved graph, building");
        }

        let (mut graph, _) = GraphBuilder::new(graph_config.clone()).build(timetable);
        NeighbourLinker::new(neighbour_config.clone()).create_neighbours(&mut graph, locations, timetable);
        self.save(&graph, neighbour_config)?;
        Ok(LoadedGraph {
            graph,
            rebuilt: true,
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GraphError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GraphError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| GraphError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush().map_err(|e| GraphError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn inputs() -> (Timetable, StationLocations) {
        let timetable = testing::walkable_timetable();
        let locations = StationLocations::from_timetable(&timetable);
        (timetable, locations)
    }

    #[test]
    fn builds_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let file = GraphFile::new(dir.path().join("graph.json"));
        let (timetable, locations) = inputs();
        let config = GraphConfig::default();
        let neighbours = NeighbourConfig::default();

        let first = file
            .load_or_build(&timetable, &config, &neighbours, &locations)
            .unwrap();
        assert!(first.rebuilt);
        assert_eq!(first.graph.neighbour_pair_count(), 1);

        let second = file
            .load_or_build(&timetable, &config, &neighbours, &locations)
            .unwrap();
        assert!(!second.rebuilt);
        assert_eq!(second.graph, first.graph);
    }

    #[test]
    fn changed_inputs_force_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let file = GraphFile::new(dir.path().join("graph.json"));
        let (timetable, locations) = inputs();
        let config = GraphConfig::default();
        let neighbours = NeighbourConfig::default();
        file.load_or_build(&timetable, &config, &neighbours, &locations)
            .unwrap();

        let costly = GraphConfig {
            board_cost: 2,
            ..GraphConfig::default()
        };
        assert!(file
            .load_or_build(&timetable, &costly, &neighbours, &locations)
            .unwrap()
            .rebuilt);

        let wider = NeighbourConfig {
            margin_metres: 100,
            ..NeighbourConfig::default()
        };
        let rebuilt = file
            .load_or_build(&timetable, &costly, &wider, &locations)
            .unwrap();
        assert!(rebuilt.rebuilt);
        assert_eq!(rebuilt.graph.neighbour_pair_count(), 0);
    }

    #[test]
    fn corrupt_file_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let file = GraphFile::new(dir.path().join("graph.json"));
        let (timetable, locations) = inputs();
        let config = GraphConfig::default();
        let neighbours = NeighbourConfig::default();
        file.load_or_build(&timetable, &config, &neighbours, &locations)
            .unwrap();

        fs::write(file.path(), b"{\"nodes\": [").unwrap();
        let loaded = file
            .load_or_build(&timetable, &config, &neighbours, &locations)
            .unwrap();
        assert!(loaded.rebuilt);
    }

    #[test]
    fn load_checks_version() {
        let dir = tempfile::tempdir().unwrap();
        let file = GraphFile::new(dir.path().join("graph.json"));
        let (graph, _) = GraphBuilder::new(GraphConfig::default()).build(&testing::two_route_timetable());
        file.save(&graph, &NeighbourConfig::default()).unwrap();

        assert!(file.load(graph.version()).is_ok());
        assert!(matches!(
            file.load(&DataVersion::unversioned()),
            Err(GraphError::VersionMismatch { .. })
        ));
        assert!(matches!(
            GraphFile::new(dir.path().join("missing.json")).load(graph.version()),
            Err(GraphError::Io { .. })
        ));
    }
}
