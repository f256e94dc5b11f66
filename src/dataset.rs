use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::config::CONFIG_FILE;
use crate::empire::parse_periods;
use crate::error::{AtlasError, Result};
use crate::geography::CoordinateTable;
use crate::session::Inputs;
use crate::types::{GeoFeature, RawRecord};

pub const GEOGRAPHY_FILE: &str = "geography.json";
pub const COORDINATES_FILE: &str = "country-codes.json";
pub const EMPIRES_FILE: &str = "empires.json";

/// Stem of the event table used when `--events` is not given.
pub const DEFAULT_EVENTS: &str = "events";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Geography,
    Coordinates,
    Empires,
    Events,
    Config,
}

/// A table discovered in the data directory.
#[derive(Debug, Clone, Serialize)]
pub struct InputFile {
    pub kind: InputKind,
    /// File stem; event tables are selected by it.
    pub name: String,
    pub path: PathBuf,
}

fn classify(file_name: &str) -> InputKind {
    match file_name {
        GEOGRAPHY_FILE => InputKind::Geography,
        COORDINATES_FILE => InputKind::Coordinates,
        EMPIRES_FILE => InputKind::Empires,
        CONFIG_FILE => InputKind::Config,
        _ => InputKind::Events,
    }
}

/// List the `*.json` tables directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched.
pub fn discover(dir: &Path) -> Vec<InputFile> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path().to_path_buf();
            if path.extension().and_then(|x| x.to_str()) != Some("json") {
                return None;
            }
            let file_name = path.file_name()?.to_str()?;
            let kind = classify(file_name);
            let name = path.file_stem()?.to_str()?.to_string();
            Some(InputFile { kind, name, path })
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| AtlasError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn find(files: &[InputFile], kind: InputKind, dir: &Path, file_name: &str) -> Result<PathBuf> {
    files
        .iter()
        .find(|f| f.kind == kind)
        .map(|f| f.path.clone())
        .ok_or_else(|| AtlasError::MissingInput(dir.join(file_name)))
}

/// Path of the event table named `events_name`.
pub fn event_table(files: &[InputFile], events_name: &str) -> Result<PathBuf> {
    let tables: Vec<&InputFile> = files.iter().filter(|f| f.kind == InputKind::Events).collect();
    tables
        .iter()
        .find(|f| f.name == events_name)
        .map(|f| f.path.clone())
        .ok_or_else(|| AtlasError::UnknownEventTable {
            name: events_name.to_string(),
            available: if tables.is_empty() {
                "none".to_string()
            } else {
                tables
                    .iter()
                    .map(|f| f.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        })
}

/// Read every table the session needs from `dir`.
pub fn load(dir: &Path, events_name: &str) -> Result<Inputs> {
    let files = discover(dir);
    tracing::debug!(dir = %dir.display(), files = files.len(), "discovered input files");

    let events_path = event_table(&files, events_name)?;
    let events: Vec<RawRecord> = read_json(&events_path)?;

    let geography: Vec<GeoFeature> =
        read_json(&find(&files, InputKind::Geography, dir, GEOGRAPHY_FILE)?)?;
    let coordinates: CoordinateTable =
        read_json(&find(&files, InputKind::Coordinates, dir, COORDINATES_FILE)?)?;
    let period_rows: Vec<Map<String, Value>> =
        read_json(&find(&files, InputKind::Empires, dir, EMPIRES_FILE)?)?;
    let periods = parse_periods(&period_rows)?;

    tracing::info!(
        table = %events_path.display(),
        rows = events.len(),
        features = geography.len(),
        coordinates = coordinates.len(),
        periods = periods.len(),
        "loaded data directory"
    );

    Ok(Inputs {
        events,
        geography,
        coordinates,
        periods,
    })
}
