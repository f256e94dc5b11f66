//! Map payload for one event.
//!
//! The number of `Location` entries picks the shape: one → bubble, two →
//! arc, more → filled codes. `Influences` are always overlaid on top.

use atlas_types::{ArcPath, Bubble, ColourMap, Geometry, MapProjection};

use crate::config::AtlasConfig;
use crate::error::Result;
use crate::geography::CoordinateTable;
use crate::location::{ensure_lat_long, split_up_locations};
use crate::types::EventRecord;

fn apply_colour(choropleth: &mut ColourMap, codes: &[String], colour: &str) {
    for code in codes {
        choropleth.insert(code.clone(), colour.to_string());
    }
}

fn geometry_for(
    record: &EventRecord,
    parts: &[String],
    coords: &CoordinateTable,
    config: &AtlasConfig,
) -> Result<Geometry> {
    let geometry = match parts {
        [] => Geometry::None,
        [only] => {
            let loc = ensure_lat_long(only, coords)?;
            Geometry::Bubble(Bubble {
                name: record.title.clone(),
                latitude: loc.latitude,
                longitude: loc.longitude,
                radius: record.radius.unwrap_or(config.default_radius),
                fill_key: config.bubble_fill_key.clone(),
            })
        }
        [origin, destination] => Geometry::Arc(ArcPath {
            origin: ensure_lat_long(origin, coords)?,
            destination: ensure_lat_long(destination, coords)?,
        }),
        codes => Geometry::Fill {
            codes: codes.to_vec(),
        },
    };
    Ok(geometry)
}

/// Project a populated event onto the map.
///
/// Fails when a bubble or arc endpoint has no coordinates; see
/// [`overlay_only`] for the fallback the session uses.
pub fn project(
    record: &EventRecord,
    coords: &CoordinateTable,
    config: &AtlasConfig,
) -> Result<MapProjection> {
    let parts = split_up_locations(&record.location);
    let geometry = geometry_for(record, &parts, coords, config)?;

    let mut choropleth = ColourMap::new();
    if let Geometry::Fill { codes } = &geometry {
        apply_colour(&mut choropleth, codes, &config.primary_colour);
    }
    // Influences last: they win over a fill on the same code.
    apply_colour(
        &mut choropleth,
        &split_up_locations(&record.influences),
        &config.secondary_colour,
    );

    Ok(MapProjection {
        geometry,
        choropleth,
    })
}

/// The influence overlay without any primary geometry.
pub fn overlay_only(record: &EventRecord, config: &AtlasConfig) -> MapProjection {
    let mut choropleth = ColourMap::new();
    apply_colour(
        &mut choropleth,
        &split_up_locations(&record.influences),
        &config.secondary_colour,
    );
    MapProjection {
        geometry: Geometry::None,
        choropleth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;
    use crate::fixtures;

    fn event(location: &str, influences: &str) -> EventRecord {
        EventRecord {
            id: 0,
            title: "Congress of Vienna".into(),
            start_date: None,
            end_date: None,
            related_events: String::new(),
            description: String::new(),
            footnotes: String::new(),
            image: String::new(),
            for_more_see: String::new(),
            reference: String::new(),
            location: location.into(),
            influences: influences.into(),
            empire: String::new(),
            tags: String::new(),
            radius: None,
        }
    }

    #[test]
    fn test_single_location_is_bubble() {
        let cfg = AtlasConfig::default();
        let p = project(&event("AUT", ""), &fixtures::coordinates(), &cfg).unwrap();
        match p.geometry {
            Geometry::Bubble(b) => {
                assert_eq!(b.name, "Congress of Vienna");
                assert_eq!(b.latitude, 47.33);
                assert_eq!(b.radius, 10);
                assert_eq!(b.fill_key, "bubble");
            }
            other => panic!("expected bubble, got {other:?}"),
        }
        assert!(p.choropleth.is_empty());
    }

    #[test]
    fn test_bubble_radius_override_and_literal_point() {
        let mut e = event("48.2, 16.37", "");
        e.radius = Some(25);
        let p = project(&e, &fixtures::coordinates(), &AtlasConfig::default()).unwrap();
        let Geometry::Bubble(b) = p.geometry else {
            panic!("expected bubble");
        };
        assert_eq!(b.radius, 25);
        assert_eq!(b.longitude, 16.37);
    }

    #[test]
    fn test_two_locations_is_arc() {
        let p = project(
            &event("FRA;RUS", ""),
            &fixtures::coordinates(),
            &AtlasConfig::default(),
        )
        .unwrap();
        let Geometry::Arc(arc) = p.geometry else {
            panic!("expected arc");
        };
        assert_eq!(arc.origin.latitude, 46.0);
        assert_eq!(arc.destination.longitude, 100.0);
    }

    #[test]
    fn test_many_locations_fill_and_influence_wins() {
        let cfg = AtlasConfig::default();
        let p = project(&event("FRA;DEU;ITA", "DEU"), &fixtures::coordinates(), &cfg).unwrap();
        assert_eq!(p.geometry.kind(), "fill");
        assert_eq!(p.choropleth["FRA"], "#4C668C");
        assert_eq!(p.choropleth["ITA"], "#4C668C");
        assert_eq!(p.choropleth["DEU"], "#758AA8");
        assert_eq!(p.choropleth.len(), 3);
    }

    #[test]
    fn test_fill_does_not_need_coordinates() {
        let p = project(
            &event("ESP;POL;SWE", ""),
            &fixtures::coordinates(),
            &AtlasConfig::default(),
        )
        .unwrap();
        assert_eq!(p.geometry.kind(), "fill");
    }

    #[test]
    fn test_no_location_only_overlay() {
        let cfg = AtlasConfig::default();
        let p = project(&event("", "GBR;FRA"), &fixtures::coordinates(), &cfg).unwrap();
        assert_eq!(p.geometry, Geometry::None);
        assert_eq!(p.choropleth.len(), 2);
        assert_eq!(p, overlay_only(&event("", "GBR;FRA"), &cfg));
    }

    #[test]
    fn test_missing_coordinates_is_an_error() {
        let err = project(
            &event("ESP", ""),
            &fixtures::coordinates(),
            &AtlasConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AtlasError::UnknownCode(c) if c == "ESP"));
    }
}
