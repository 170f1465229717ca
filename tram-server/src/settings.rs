//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Error reading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing mandatory env var {0}")]
    Missing(&'static str),

    #[error("bad value '{value}' for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Timetable JSON file.
    pub timetable: PathBuf,

    /// Where the built graph is saved and reloaded from.
    pub graph_file: PathBuf,

    pub listen: SocketAddr,

    /// Stations of different modes closer than this are linked by a walk.
    pub walk_margin_metres: u32,

    pub max_changes: usize,
}

impl Settings {
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_WALK_MARGIN_METRES: u32 = 1000;
    pub const DEFAULT_MAX_CHANGES: usize = 3;

    /// Read settings from `TRAM_*` environment variables.
    ///
    /// `TRAM_TIMETABLE` is mandatory. `TRAM_GRAPH_FILE` defaults to the
    /// timetable path with a `.graph.json` extension.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let timetable = lookup("TRAM_TIMETABLE")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(SettingsError::Missing("TRAM_TIMETABLE"))?;

        let graph_file = lookup("TRAM_GRAPH_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| timetable.with_extension("graph.json"));

        let listen = parse_var(&lookup, "TRAM_LISTEN")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], Self::DEFAULT_PORT)));

        let walk_margin_metres = parse_var(&lookup, "TRAM_WALK_MARGIN_M")?
            .unwrap_or(Self::DEFAULT_WALK_MARGIN_METRES);
        let max_changes =
            parse_var(&lookup, "TRAM_MAX_CHANGES")?.unwrap_or(Self::DEFAULT_MAX_CHANGES);

        Ok(Self {
            timetable,
            graph_file,
            listen,
            walk_margin_metres,
            max_changes,
        })
    }
}

/// Parse an optional variable, failing on a value that does not parse.
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, SettingsError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply() {
        let settings = settings(&[("TRAM_TIMETABLE", "/data/feed.json")]).unwrap();
        assert_eq!(settings.timetable, PathBuf::from("/data/feed.json"));
        assert_eq!(settings.graph_file, PathBuf::from("/data/feed.graph.json"));
        assert_eq!(settings.listen.port(), 3000);
        assert_eq!(settings.walk_margin_metres, 1000);
        assert_eq!(settings.max_changes, 3);
    }

    #[test]
    fn all_vars_read() {
        let settings = settings(&[
            ("TRAM_TIMETABLE", "feed.json"),
            ("TRAM_GRAPH_FILE", "/tmp/g.json"),
            ("TRAM_LISTEN", "0.0.0.0:8080"),
            ("TRAM_WALK_MARGIN_M", "500"),
            ("TRAM_MAX_CHANGES", " 2 "),
        ])
        .unwrap();
        assert_eq!(settings.graph_file, PathBuf::from("/tmp/g.json"));
        assert_eq!(settings.listen, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(settings.walk_margin_metres, 500);
        assert_eq!(settings.max_changes, 2);
    }

    #[test]
    fn timetable_is_mandatory() {
        assert!(matches!(
            settings(&[]),
            Err(SettingsError::Missing("TRAM_TIMETABLE"))
        ));
        assert!(matches!(
            settings(&[("TRAM_TIMETABLE", " ")]),
            Err(SettingsError::Missing(_))
        ));
    }

    #[test]
    fn bad_values_rejected() {
        let err = settings(&[("TRAM_TIMETABLE", "f.json"), ("TRAM_MAX_CHANGES", "many")]).unwrap_err();
        assert_eq!(err.to_string(), "bad value 'many' for TRAM_MAX_CHANGES");

        assert!(settings(&[("TRAM_TIMETABLE", "f.json"), ("TRAM_LISTEN", "nowhere")]).is_err());
    }
}
