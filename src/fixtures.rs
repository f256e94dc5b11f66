//! Small in-memory tables shared by the unit tests.

use crate::geography::{CoordinateTable, Geography};
use crate::types::{Column, GeoFeature, RawRecord};

pub fn geography() -> Geography {
    let features: Vec<GeoFeature> = [
        ("FRA", "France"),
        ("DEU", "Germany"),
        ("POL", "Poland"),
        ("BEL", "Belgium"),
        ("RUS", "Russia"),
        ("AUT", "Austria"),
        ("GBR", "United Kingdom"),
        ("ITA", "Italy"),
        ("ESP", "Spain"),
        ("-99", "Northern Cyprus"),
        ("FIN", "Finland"),
        ("DNK", "Denmark"),
        ("SWE", "Sweden"),
        ("NOR", "Norway"),
    ]
    .into_iter()
    .map(|(id, name)| GeoFeature {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect();
    Geography::from_features(&features)
}

pub fn coordinates() -> CoordinateTable {
    CoordinateTable::from_pairs([
        ("FRA", 46.0, 2.0),
        ("DEU", 51.0, 9.0),
        ("BEL", 50.83, 4.0),
        ("RUS", 60.0, 100.0),
        ("AUT", 47.33, 13.33),
        ("GBR", 54.0, -2.0),
        ("ITA", 42.83, 12.83),
    ])
}

/// A row with every required column; unspecified columns are empty.
pub fn row(start: &str, end: &str, title: &str, location: &str) -> RawRecord {
    let mut rec = RawRecord::default();
    for c in Column::REQUIRED {
        rec.set(c, String::new());
    }
    rec.set(Column::StartDate, start.to_string());
    rec.set(Column::EndDate, end.to_string());
    rec.set(Column::Title, title.to_string());
    rec.set(Column::Location, location.to_string());
    rec
}
