//! Reference geography: the valid 3-letter codes, their names, and their
//! coordinates. Location codes in the event table are checked against it.

use std::collections::{HashMap, HashSet};

use atlas_types::LatLong;
use serde::Deserialize;

use crate::location::split_up_locations;
use crate::types::{Column, GeoFeature};
use crate::validate::ValidationIssue;

/// Geometry id of map features that are not countries.
pub const SENTINEL_ID: &str = "-99";

#[derive(Debug, Clone, Default)]
pub struct Geography {
    /// Known codes in reference order.
    codes: Vec<String>,
    known: HashSet<String>,
    /// Lower-cased name → code.
    by_name: HashMap<String, String>,
}

impl Geography {
    pub fn from_features(features: &[GeoFeature]) -> Self {
        let mut geo = Geography::default();
        for f in features.iter().filter(|f| f.id != SENTINEL_ID) {
            geo.codes.push(f.id.clone());
            geo.known.insert(f.id.clone());
            geo.by_name.insert(f.name.to_lowercase(), f.id.clone());
        }
        geo
    }

    /// Every known code, in the order of the reference collection.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn is_known(&self, code: &str) -> bool {
        self.known.contains(code)
    }

    /// Case-insensitive name lookup ("france" → "FRA").
    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        self.by_name.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Check a `;`-delimited list of expanded codes.
    ///
    /// Tokens without any ASCII letter are skipped. A token that is not a
    /// known 3-letter code is reported, with the code of an exactly matching
    /// country name as a suggestion when there is one.
    pub fn validate_codes(&self, codes: &str, line: usize, field: Column) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for part in split_up_locations(codes) {
            if !part.chars().any(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            if part.chars().count() == 3 && self.is_known(&part) {
                continue;
            }
            let suggestion = self.code_for_name(&part).map(str::to_string);
            issues.push(ValidationIssue::Code {
                line,
                field: field.as_str(),
                code: part,
                suggestion,
            });
        }
        issues
    }
}

// ── Coordinates ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoordValue {
    Number(f64),
    Text(String),
}

impl CoordValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            CoordValue::Number(n) => Some(*n),
            CoordValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Code → [latitude, longitude] table. Entries that are not two numbers
/// are kept as misses rather than rejected at load time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, Vec<CoordValue>>")]
pub struct CoordinateTable {
    entries: HashMap<String, Option<LatLong>>,
}

impl From<HashMap<String, Vec<CoordValue>>> for CoordinateTable {
    fn from(raw: HashMap<String, Vec<CoordValue>>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(code, pair)| {
                let loc = match pair.as_slice() {
                    [lat, long] => Some(LatLong {
                        latitude: lat.as_f64().unwrap_or(f64::NAN),
                        longitude: long.as_f64().unwrap_or(f64::NAN),
                    })
                    .filter(|l| l.latitude.is_finite() && l.longitude.is_finite()),
                    _ => None,
                };
                (code, loc)
            })
            .collect();
        CoordinateTable { entries }
    }
}

impl CoordinateTable {
    #[cfg(test)]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64, f64)>) -> Self {
        CoordinateTable {
            entries: pairs
                .into_iter()
                .map(|(code, latitude, longitude)| {
                    (
                        code.to_string(),
                        Some(LatLong {
                            latitude,
                            longitude,
                        }),
                    )
                })
                .collect(),
        }
    }

    pub fn lookup(&self, code: &str) -> Option<LatLong> {
        self.entries.get(code).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
