//! Stations, platforms and composite stations.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CompositeId, PlatformId, StationId};

/// Mode of transport serving a stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Tram,
    Bus,
    Walk,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Tram => f.write_str("tram"),
            TransportMode::Bus => f.write_str("bus"),
            TransportMode::Walk => f.write_str("walk"),
        }
    }
}

/// Set of modes serving a station.
pub type Modes = BTreeSet<TransportMode>;

/// WGS84 latitude and longitude in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub lat: f64,
    pub lon: f64,
}

impl LatLong {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True if both components are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A physical stop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    #[serde(default)]
    pub area: String,
    pub modes: Modes,
    pub location: LatLong,
    /// The composite this stop belongs to, if any.
    #[serde(default)]
    pub composite: Option<CompositeId>,
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: &str, mode: TransportMode, location: LatLong) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            area: String::new(),
            modes: BTreeSet::from([mode]),
            location,
            composite: None,
        }
    }

    pub fn serves(&self, mode: TransportMode) -> bool {
        self.modes.contains(&mode)
    }
}

/// A user-facing interchange made of several physically distinct stops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeStation {
    pub id: CompositeId,
    pub name: String,
    pub members: BTreeSet<StationId>,
}

impl CompositeStation {
    /// Union of the modes of the given member stations.
    pub fn modes<'a>(&self, stations: impl IntoIterator<Item = &'a Station>) -> Modes {
        stations
            .into_iter()
            .filter(|s| self.members.contains(&s.id))
            .flat_map(|s| s.modes.iter().copied())
            .collect()
    }
}

/// A platform at a station.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub station: StationId,
    pub label: String,
}
