//! Population: turns validated rows into immutable events and builds the
//! timeline and info-panel payloads from them.
//!
//! Validation runs on the unfiltered table; population drops comment rows,
//! so ids count only real events.

use std::collections::HashMap;

use atlas_types::{EventDetails, RelatedLink, TimelineDocument, TimelineEvent, TimelineText};

use crate::config::AtlasConfig;
use crate::date::parse_date;
use crate::location::split_up_locations;
use crate::types::{Column, EventRecord, RADIUS_FIELD, RawRecord};

#[derive(Debug, Clone, Default)]
pub struct Population {
    pub events: Vec<EventRecord>,
    /// Lower-cased title → id.
    title_index: HashMap<String, usize>,
    /// Non-fatal problems found while populating.
    pub warnings: Vec<String>,
}

fn event_from_row(id: usize, row: &RawRecord) -> EventRecord {
    let text = |c: Column| row.column(c).to_string();
    EventRecord {
        id,
        title: text(Column::Title),
        start_date: parse_date(row.column(Column::StartDate)),
        end_date: parse_date(row.column(Column::EndDate)),
        related_events: text(Column::RelatedEvents),
        description: text(Column::Description),
        footnotes: text(Column::Footnotes),
        image: text(Column::Image),
        for_more_see: text(Column::ForMoreSee),
        reference: text(Column::Ref),
        location: text(Column::Location),
        influences: text(Column::Influences),
        empire: text(Column::Empire),
        tags: text(Column::Tags),
        radius: leading_number(row.get(RADIUS_FIELD)),
    }
}

/// The run of digits at the start of `s`, so "12px" reads as 12.
fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

/// `Some(text)` unless the field is blank.
fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl Population {
    pub fn from_rows(rows: &[RawRecord]) -> Self {
        let mut population = Population::default();

        for row in rows.iter().filter(|r| !r.is_comment()) {
            let id = population.events.len();
            let event = event_from_row(id, row);

            if event.start_date.is_none() {
                let msg = format!("The row {id} has no start date");
                tracing::warn!("{msg}");
                population.warnings.push(msg);
            }

            let key = event.title.trim().to_lowercase();
            if key.is_empty() {
                let msg = format!("The row {id} has no title");
                tracing::warn!("{msg}");
                population.warnings.push(msg);
            } else if let Some(previous) = population.title_index.insert(key, id) {
                tracing::warn!(
                    title = %event.title,
                    previous,
                    id,
                    "duplicate title, later row wins"
                );
            }

            population.events.push(event);
        }

        tracing::info!(
            events = population.events.len(),
            comments = rows.len() - population.events.len(),
            "populated events"
        );
        population
    }

    pub fn get(&self, id: usize) -> Option<&EventRecord> {
        self.events.get(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Id of the event with this title (case-insensitive), if any.
    pub fn resolve_related(&self, title: &str) -> Option<usize> {
        self.title_index.get(&title.trim().to_lowercase()).copied()
    }

    pub fn timeline(&self, config: &AtlasConfig) -> TimelineDocument {
        let events = self
            .events
            .iter()
            .map(|e| TimelineEvent {
                unique_id: e.id.to_string(),
                start_date: e.start_date.clone(),
                end_date: e.end_date.clone(),
                text: TimelineText {
                    headline: e.title.clone(),
                    text: config.timeline_text.clone(),
                },
            })
            .collect();

        TimelineDocument {
            start_year: config.timeline_start,
            end_year: config.timeline_end,
            events,
        }
    }

    /// Info-panel content for one event.
    pub fn details(&self, event: &EventRecord, config: &AtlasConfig) -> EventDetails {
        let related = split_up_locations(&event.related_events)
            .into_iter()
            .map(|title| {
                let id = self.resolve_related(&title);
                if id.is_none() {
                    tracing::warn!(event = event.id, related = %title, "related event not found");
                }
                RelatedLink { title, id }
            })
            .collect();

        EventDetails {
            id: event.id,
            title: event.title.clone(),
            for_more_see: non_blank(&event.for_more_see),
            start: event.start_date.as_ref().map(ToString::to_string),
            end: event.end_date.as_ref().map(ToString::to_string),
            tags: split_up_locations(&event.tags),
            image: non_blank(&event.image).map(|img| format!("{}{img}", config.image_prefix)),
            description: event.description.clone(),
            footnotes: split_up_locations(&event.footnotes),
            related,
        }
    }
}
