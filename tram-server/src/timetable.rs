//! The validated timetable snapshot the graph is built from.
//!
//! Feed parsing happens upstream; this module only bundles the typed records
//! and loads them from a JSON snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Agency, CompositeId, CompositeStation, FeedInfo, Modes, Platform, Route, RouteId, Service,
    ServiceId, Station, StationId, Trip,
};

/// Errors loading a timetable snapshot.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    #[error("failed to read timetable {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse timetable: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("timetable has duplicate {kind} id {id}")]
    Duplicate { kind: &'static str, id: String },
}

/// All typed records for one feed version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    pub feed: FeedInfo,
    #[serde(default)]
    pub agencies: Vec<Agency>,
    pub stations: Vec<Station>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub composites: Vec<CompositeStation>,
    pub routes: Vec<Route>,
    pub services: Vec<Service>,
    pub trips: Vec<Trip>,
    /// Stations the operator publishes as interchanges.
    #[serde(default)]
    pub interchanges: BTreeSet<StationId>,
}

impl Timetable {
    pub fn from_json(text: &str) -> Result<Self, TimetableError> {
        let timetable: Timetable = serde_json::from_str(text)?;
        timetable.check_unique()?;
        Ok(timetable)
    }

    /// Load a JSON snapshot from disk.
    pub fn load(path: &Path) -> Result<Self, TimetableError> {
        let text = std::fs::read_to_string(path).map_err(|source| TimetableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let timetable = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            version = %timetable.feed.version,
            stations = timetable.stations.len(),
            routes = timetable.routes.len(),
            trips = timetable.trips.len(),
            "loaded timetable"
        );
        Ok(timetable)
    }

    fn check_unique(&self) -> Result<(), TimetableError> {
        fn unique<'a>(
            kind: &'static str,
            ids: impl Iterator<Item = &'a str>,
        ) -> Result<(), TimetableError> {
            let mut seen = BTreeSet::new();
            for id in ids {
                if !seen.insert(id) {
                    return Err(TimetableError::Duplicate {
                        kind,
                        id: id.to_string(),
                    });
                }
            }
            Ok(())
        }

        unique("station", self.stations.iter().map(|s| s.id.as_str()))?;
        unique("route", self.routes.iter().map(|r| r.id.as_str()))?;
        unique("service", self.services.iter().map(|s| s.id.as_str()))?;
        unique("trip", self.trips.iter().map(|t| t.id.as_str()))?;
        unique("composite", self.composites.iter().map(|c| c.id.as_str()))?;
        Ok(())
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.iter().find(|s| &s.id == id)
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| &r.id == id)
    }

    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| &s.id == id)
    }

    pub fn composite(&self, id: &CompositeId) -> Option<&CompositeStation> {
        self.composites.iter().find(|c| &c.id == id)
    }

    /// The composite a station belongs to, either by its own back-reference
    /// or by being listed as a member.
    pub fn composite_of(&self, station: &StationId) -> Option<&CompositeStation> {
        if let Some(composite) = self
            .station(station)
            .and_then(|s| s.composite.as_ref())
            .and_then(|id| self.composite(id))
        {
            return Some(composite);
        }
        self.composites.iter().find(|c| c.members.contains(station))
    }

    /// Modes a station is treated as serving for neighbour linking: its own,
    /// or its composite's when it is a member of one.
    pub fn effective_modes(&self, station: &StationId) -> Modes {
        if let Some(composite) = self.composite_of(station) {
            return composite.modes(&self.stations);
        }
        self.station(station)
            .map(|s| s.modes.clone())
            .unwrap_or_default()
    }

    /// Routes calling at each station.
    pub fn routes_by_station(&self) -> BTreeMap<StationId, BTreeSet<RouteId>> {
        let mut map: BTreeMap<StationId, BTreeSet<RouteId>> = BTreeMap::new();
        for trip in &self.trips {
            for call in &trip.calls {
                map.entry(call.station.clone())
                    .or_default()
                    .insert(trip.route.clone());
            }
        }
        map
    }

    /// Stable hash of the canonical JSON form.
    ///
    /// Used in the graph's version marker, so it must not depend on process
    /// state such as hasher seeds.
    pub fn content_hash(&self) -> u64 {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        fnv1a(FNV_OFFSET, &bytes)
    }
}

pub(crate) const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV-1a, continuing from `hash`.
pub(crate) fn fnv1a(hash: u64, bytes: &[u8]) -> u64 {
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(hash, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(PRIME))
}
