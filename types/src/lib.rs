#![allow(dead_code)]
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Code → colour assignments handed to a choropleth sink in one update.
pub type ColourMap = BTreeMap<String, String>;

// ── Date value ───────────────────────────────────────────────────────────

/// A structured date as written in the event table.
///
/// Parts keep their original spelling ("03" stays "03"). A value with only a
/// year (or year + month) is meaningful: those events display without the
/// missing parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl DateValue {
    pub fn year_only(year: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: None,
            day: None,
        }
    }

    /// Integer year, used to pick the empire period for a selected event.
    pub fn year_number(&self) -> Option<i32> {
        self.year.trim().parse().ok()
    }

    pub fn is_only_year(&self) -> bool {
        self.month.is_none() && self.day.is_none()
    }
}

/// Day-first display: "D/M/Y", "M/Y" or "Y" depending on which parts exist.
impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.month, &self.day) {
            (Some(month), Some(day)) => write!(f, "{day}/{month}/{}", self.year),
            (None, Some(day)) => write!(f, "{day}/{}", self.year),
            (Some(month), None) => write!(f, "{month}/{}", self.year),
            (None, None) => f.write_str(&self.year),
        }
    }
}

// ── Validation report ────────────────────────────────────────────────────

/// Outcome of validating a raw event table.
///
/// `is_valid` is derived from `messages`: a report is valid exactly when no
/// message was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            messages: Vec::new(),
        }
    }

    pub fn from_messages(messages: Vec<String>) -> Self {
        Self {
            is_valid: messages.is_empty(),
            messages,
        }
    }
}

// ── Timeline payload ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineText {
    pub headline: String,
    pub text: String,
}

/// One slide for a generic timeline widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub unique_id: String,
    pub start_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateValue>,
    pub text: TimelineText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDocument {
    pub start_year: i32,
    pub end_year: i32,
    pub events: Vec<TimelineEvent>,
}

// ── Map payload ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u32,
    pub fill_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcPath {
    pub origin: LatLong,
    pub destination: LatLong,
}

/// The primary shape drawn for an event's `Location` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// One location: a circle centred on it.
    Bubble(Bubble),
    /// Two locations: origin → destination.
    Arc(ArcPath),
    /// Three or more codes filled with the primary colour (see `choropleth`).
    Fill { codes: Vec<String> },
    /// No location, or a location whose coordinates could not be resolved.
    None,
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Bubble(_) => "bubble",
            Geometry::Arc(_) => "arc",
            Geometry::Fill { .. } => "fill",
            Geometry::None => "none",
        }
    }
}

/// Everything the map needs to show one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapProjection {
    pub geometry: Geometry,
    /// Fill colours plus the influence overlay. Influences are applied last,
    /// so they win over a primary fill on the same code.
    pub choropleth: ColourMap,
}

// ── Event details ────────────────────────────────────────────────────────

/// A link to another event by title; `id` is `None` when no event has that title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
}

/// Info-panel content for a selected event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub id: usize,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_more_see: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnotes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedLink>,
}

/// The full display payload produced when an event is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub details: EventDetails,
    pub projection: MapProjection,
    /// Previous event colours reset to neutral.
    pub event_reset: ColourMap,
    /// Previous empire colours reset to neutral, then the period's colours.
    pub empire_update: ColourMap,
}
