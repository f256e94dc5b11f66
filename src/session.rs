//! Session state: the loaded tables, the populated events, and what the map
//! currently shows.
//!
//! A display sink applies the updates of a [`Selection`] in this order:
//! `event_reset`, `empire_update`, then the projection's choropleth.

use atlas_types::{ColourMap, DateValue, Selection, TimelineDocument, ValidationReport};

use crate::config::AtlasConfig;
use crate::empire;
use crate::error::{AtlasError, Result};
use crate::geography::{CoordinateTable, Geography};
use crate::projector::{overlay_only, project};
use crate::timeline::Population;
use crate::types::{EmpirePeriod, GeoFeature, RawRecord};
use crate::validate::validate_records;

/// The three independently loaded tables plus the geography reference.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub events: Vec<RawRecord>,
    pub geography: Vec<GeoFeature>,
    pub coordinates: CoordinateTable,
    pub periods: Vec<EmpirePeriod>,
}

pub enum Startup {
    Ready(Box<Session>),
    /// The event table failed validation; nothing was populated.
    Rejected(ValidationReport),
}

pub struct Session {
    config: AtlasConfig,
    coordinates: CoordinateTable,
    periods: Vec<EmpirePeriod>,
    population: Population,
    /// Replaced wholesale on every resolve.
    empire_colours: ColourMap,
    /// Choropleth of the selected event.
    event_colours: ColourMap,
    selected: Option<usize>,
}

/// Every code of `previous` set to `neutral`.
fn neutralise(previous: &ColourMap, neutral: &str) -> ColourMap {
    previous
        .keys()
        .map(|code| (code.clone(), neutral.to_string()))
        .collect()
}

/// One update that clears `previous` and then applies `next`.
fn reset_then_apply(previous: &ColourMap, next: &ColourMap, neutral: &str) -> ColourMap {
    let mut update = neutralise(previous, neutral);
    update.extend(next.iter().map(|(k, v)| (k.clone(), v.clone())));
    update
}

impl Session {
    /// Validate the raw events (normalising their locations), then populate.
    /// The initial empire colouring is the open-ended last period.
    pub fn start(mut inputs: Inputs, config: AtlasConfig) -> Startup {
        let geography = Geography::from_features(&inputs.geography);
        let report = validate_records(&mut inputs.events, &geography);
        if !report.is_valid {
            return Startup::Rejected(report);
        }

        let population = Population::from_rows(&inputs.events);
        let mut session = Session {
            config,
            coordinates: inputs.coordinates,
            periods: inputs.periods,
            population,
            empire_colours: ColourMap::new(),
            event_colours: ColourMap::new(),
            selected: None,
        };
        session.set_empire_colours(None);
        Startup::Ready(Box::new(session))
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    #[cfg(test)]
    pub fn empire_colours(&self) -> &ColourMap {
        &self.empire_colours
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn timeline(&self) -> TimelineDocument {
        self.population.timeline(&self.config)
    }

    /// Resolve the colouring for `year` and return the update that moves the
    /// map from the previous colouring to the new one.
    pub fn set_empire_colours(&mut self, year: Option<i32>) -> ColourMap {
        let next = empire::resolve(year, &self.periods);
        let update = reset_then_apply(&self.empire_colours, &next, &self.config.neutral_colour);
        tracing::debug!(?year, codes = next.len(), "empire colours resolved");
        self.empire_colours = next;
        update
    }

    pub fn select(&mut self, id: usize) -> Result<Selection> {
        let year = self
            .population
            .get(id)
            .ok_or_else(|| AtlasError::UnknownEvent(id.to_string()))?
            .start_date
            .as_ref()
            .and_then(DateValue::year_number);

        let event_reset = neutralise(&self.event_colours, &self.config.neutral_colour);
        let empire_update = self.set_empire_colours(year);

        let event = self
            .population
            .get(id)
            .ok_or_else(|| AtlasError::UnknownEvent(id.to_string()))?;
        let projection = match project(event, &self.coordinates, &self.config) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(
                    event = id,
                    title = %event.title,
                    "cannot place event on the map: {e}"
                );
                overlay_only(event, &self.config)
            }
        };
        let details = self.population.details(event, &self.config);

        self.event_colours = projection.choropleth.clone();
        self.selected = Some(id);

        Ok(Selection {
            details,
            projection,
            event_reset,
            empire_update,
        })
    }

    pub fn select_title(&mut self, title: &str) -> Result<Selection> {
        let id = self
            .population
            .resolve_related(title)
            .ok_or_else(|| AtlasError::UnknownEvent(title.to_string()))?;
        self.select(id)
    }

    /// A numeric query is an id; anything else is a title.
    pub fn select_query(&mut self, query: &str) -> Result<Selection> {
        match query.trim().parse::<usize>() {
            Ok(id) => self.select(id),
            Err(_) => self.select_title(query),
        }
    }

    /// Slideshow successor of `current`; the first event when nothing is selected.
    pub fn next_id(&self, current: Option<usize>) -> Option<usize> {
        let next = current.map_or(0, |id| id + 1);
        (next < self.population.len()).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::types::Column;
    use atlas_types::Geometry;

    fn periods() -> Vec<EmpirePeriod> {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(
            r#"[
                {"Year": 1800, "French blue": "FRA", "British red": "GBR"},
                {"Year": 1815, "French blue": "FRA;BEL;ITA", "British red": "GBR"},
                {"Year": 1850, "French blue": "FRA", "Austrian yellow": "AUT;ITA"}
            ]"#,
        )
        .unwrap();
        empire::parse_periods(&rows).unwrap()
    }

    fn inputs() -> Inputs {
        let mut events = vec![
            fixtures::row("1815/6/18", "", "Battle of Waterloo", "bel"),
            fixtures::row("1812", "", "Invasion of Russia", "fra;rus"),
            fixtures::row("1848", "", "Revolutions of 1848", "fra;deu;aut"),
            fixtures::row("1807", "", "Treaty", "esp"),
        ];
        events[0].set(Column::RelatedEvents, "Invasion of Russia".into());
        events[2].set(Column::Influences, "deu".into());
        let geography = ["FRA", "DEU", "BEL", "RUS", "AUT", "GBR", "ITA", "ESP"]
            .into_iter()
            .map(|id| GeoFeature {
                id: id.into(),
                name: id.to_lowercase(),
            })
            .collect();
        Inputs {
            events,
            geography,
            coordinates: fixtures::coordinates(),
            periods: periods(),
        }
    }

    fn ready(inputs: Inputs) -> Session {
        match Session::start(inputs, AtlasConfig::default()) {
            Startup::Ready(s) => *s,
            Startup::Rejected(r) => panic!("rejected: {:?}", r.messages),
        }
    }

    #[test]
    fn test_start_rejects_invalid_table() {
        let mut bad = inputs();
        bad.events[1].set(Column::StartDate, "1812-06".into());
        match Session::start(bad, AtlasConfig::default()) {
            Startup::Rejected(r) => {
                assert!(!r.is_valid);
                assert_eq!(r.messages.len(), 1);
                assert!(r.messages[0].starts_with("Line 3: Start Date"));
            }
            Startup::Ready(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_start_resolves_open_ended_period() {
        let session = ready(inputs());
        assert_eq!(session.empire_colours()["AUT"], "yellow");
        assert_eq!(session.timeline().events.len(), 4);
    }

    #[test]
    fn test_empire_update_resets_previous_codes() {
        let mut session = ready(inputs());
        let update = session.set_empire_colours(Some(1810));
        // AUT was yellow in the last period and is not coloured in 1815.
        assert_eq!(update["AUT"], "silver");
        assert_eq!(update["BEL"], "blue");
        assert_eq!(update["GBR"], "red");
        assert!(!session.empire_colours().contains_key("AUT"));
    }

    #[test]
    fn test_select_bubble_with_period_of_start_year() {
        let mut session = ready(inputs());
        let sel = session.select(0).unwrap();
        assert_eq!(sel.details.title, "Battle of Waterloo");
        assert_eq!(sel.projection.geometry.kind(), "bubble");
        assert_eq!(sel.empire_update["BEL"], "blue");
        assert_eq!(sel.details.related[0].id, Some(1));
        assert!(sel.event_reset.is_empty());
        assert_eq!(session.selected(), Some(0));
    }

    #[test]
    fn test_select_resets_previous_event_colours() {
        let mut session = ready(inputs());
        let first = session.select(2).unwrap();
        assert_eq!(first.projection.choropleth["DEU"], "#758AA8");
        let second = session.select(1).unwrap();
        assert_eq!(second.projection.geometry.kind(), "arc");
        assert_eq!(second.event_reset.len(), 3);
        assert!(second.event_reset.values().all(|c| c == "silver"));
    }

    #[test]
    fn test_select_missing_coordinates_keeps_overlay() {
        let mut session = ready(inputs());
        let sel = session.select(3).unwrap();
        assert_eq!(sel.projection.geometry, Geometry::None);
    }

    #[test]
    fn test_select_unknown() {
        let mut session = ready(inputs());
        assert!(matches!(session.select(42), Err(AtlasError::UnknownEvent(_))));
        assert!(matches!(
            session.select_title("Battle of Hastings"),
            Err(AtlasError::UnknownEvent(_))
        ));
    }

    #[test]
    fn test_select_query_by_title_or_id() {
        let mut session = ready(inputs());
        assert_eq!(session.select_query("battle of waterloo").unwrap().details.id, 0);
        assert_eq!(session.select_query(" 2 ").unwrap().details.id, 2);
    }

    #[test]
    fn test_next_id() {
        let session = ready(inputs());
        assert_eq!(session.next_id(None), Some(0));
        assert_eq!(session.next_id(Some(2)), Some(3));
        assert_eq!(session.next_id(Some(3)), None);
    }
}
