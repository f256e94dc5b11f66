use std::collections::BTreeMap;

use atlas_types::DateValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Event table columns ────────────────────────────────────────────

/// Columns every event table must carry (checked on the first data row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    StartDate,
    EndDate,
    Title,
    RelatedEvents,
    Description,
    Footnotes,
    Image,
    ForMoreSee,
    Ref,
    Location,
    Influences,
    Empire,
    Tags,
}

impl Column {
    pub const REQUIRED: [Column; 13] = [
        Column::StartDate,
        Column::EndDate,
        Column::Title,
        Column::RelatedEvents,
        Column::Description,
        Column::Footnotes,
        Column::Image,
        Column::ForMoreSee,
        Column::Ref,
        Column::Location,
        Column::Influences,
        Column::Empire,
        Column::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartDate => "StartDate",
            Self::EndDate => "EndDate",
            Self::Title => "Title",
            Self::RelatedEvents => "RelatedEvents",
            Self::Description => "Description",
            Self::Footnotes => "Footnotes",
            Self::Image => "Image",
            Self::ForMoreSee => "ForMoreSee",
            Self::Ref => "Ref",
            Self::Location => "Location",
            Self::Influences => "Influences",
            Self::Empire => "Empire",
            Self::Tags => "Tags",
        }
    }
}

/// Optional per-record bubble radius override (not a required column).
pub const RADIUS_FIELD: &str = "radius";

// ── Raw row ────────────────────────────────────────────────────────

/// One row of the event table exactly as ingested: column name → text.
///
/// Scalars that are not strings are stringified and `null` becomes "", so a
/// table decoded from JSON behaves like one decoded from delimited text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::Null => String::new(),
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect();
        RawRecord { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawRecord {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl RawRecord {
    pub fn has_column(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field text, or "" when the column is absent on this row.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn column(&self, column: Column) -> &str {
        self.get(column.as_str())
    }

    pub fn set(&mut self, column: Column, value: String) {
        self.fields.insert(column.as_str().to_string(), value);
    }

    /// Rows whose StartDate begins with `//` are comments in the source table.
    pub fn is_comment(&self) -> bool {
        self.column(Column::StartDate).starts_with("//")
    }
}

// ── Populated event ────────────────────────────────────────────────

/// An event after validation and population. Immutable from here on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Zero-based position among the non-comment rows.
    pub id: usize,
    pub title: String,
    pub start_date: Option<DateValue>,
    pub end_date: Option<DateValue>,
    pub related_events: String,
    pub description: String,
    pub footnotes: String,
    pub image: String,
    pub for_more_see: String,
    pub reference: String,
    /// Canonical `;`-joined codes (or literal "lat,long" points).
    pub location: String,
    pub influences: String,
    pub empire: String,
    pub tags: String,
    pub radius: Option<u32>,
}

// ── Geography reference ────────────────────────────────────────────

/// One geometry of the reference world map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoFeature {
    pub id: String,
    pub name: String,
}

// ── Empire periods ─────────────────────────────────────────────────

/// One `"<Empire> <Colour>"` column of a period row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmpireAssignment {
    pub empire: String,
    pub colour: String,
    pub codes: Vec<String>,
}

/// A period row. `year` is the inclusive upper bound of the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmpirePeriod {
    pub year: i32,
    /// In column order; later assignments overwrite earlier ones per code.
    pub assignments: Vec<EmpireAssignment>,
}
