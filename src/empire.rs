//! Empire colouring over time.
//!
//! The period table has one row per period: a `Year` column (inclusive upper
//! bound of the period) and any number of `"<Empire> <Colour>"` columns whose
//! values are `;`-delimited code lists, e.g.
//!
//!   Year | British red      | French blue
//!   1800 | GBR;IRL;IND      | FRA
//!   1815 | GBR;IRL;IND;ZAF  | FRA;DZA
//!
//! Rows must be in ascending `Year` order. The last row is open-ended: it
//! also covers every year after it.

use atlas_types::ColourMap;
use serde_json::{Map, Value};

use crate::error::{AtlasError, Result};
use crate::location::split_up_locations;
use crate::types::{EmpireAssignment, EmpirePeriod};

const YEAR_KEY: &str = "Year";

/// Split a column key into `(empire, colour)`.
///
/// Grammar: whitespace-separated tokens, empire name first, colour second;
/// further tokens are ignored. Keys with fewer than two tokens have no colour.
pub fn parse_empire_key(key: &str) -> Option<(&str, &str)> {
    let mut tokens = key.split_whitespace();
    let empire = tokens.next()?;
    let colour = tokens.next()?;
    Some((empire, colour))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_year(index: usize, value: Option<&Value>) -> Result<i32> {
    let invalid = |reason: String| AtlasError::InvalidPeriod { index, reason };
    match value {
        None => Err(invalid("missing Year".to_string())),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| invalid(format!("Year {n} is not a whole year"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| invalid(format!("Year {s:?} is not a number"))),
        Some(other) => Err(invalid(format!("Year {other} is not a number"))),
    }
}

/// Parse one period row, keeping its columns in source order.
pub fn parse_period(index: usize, row: &Map<String, Value>) -> Result<EmpirePeriod> {
    let year = parse_year(index, row.get(YEAR_KEY))?;

    let mut assignments = Vec::new();
    for (key, value) in row {
        if key == YEAR_KEY || key.is_empty() {
            continue;
        }
        let Some((empire, colour)) = parse_empire_key(key) else {
            tracing::warn!(period = index, column = %key, "empire column has no colour, skipping");
            continue;
        };
        assignments.push(EmpireAssignment {
            empire: empire.to_string(),
            colour: colour.to_string(),
            codes: split_up_locations(&value_text(value)),
        });
    }

    Ok(EmpirePeriod { year, assignments })
}

pub fn parse_periods(rows: &[Map<String, Value>]) -> Result<Vec<EmpirePeriod>> {
    let periods = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_period(i, row))
        .collect::<Result<Vec<_>>>()?;

    if periods.windows(2).any(|w| w[0].year > w[1].year) {
        tracing::warn!("empire periods are not in ascending Year order; lookups assume they are");
    }
    Ok(periods)
}

/// The period covering `year`: the first whose `year` bound is not below it.
/// No year, or a year past every bound, selects the last period.
pub fn select_period(year: Option<i32>, periods: &[EmpirePeriod]) -> Option<&EmpirePeriod> {
    match year {
        Some(y) => periods
            .iter()
            .find(|p| y <= p.year)
            .or_else(|| periods.last()),
        None => periods.last(),
    }
}

/// Code → colour for the period covering `year`.
///
/// When a code appears under several empires, the column that comes later in
/// the row wins.
pub fn resolve(year: Option<i32>, periods: &[EmpirePeriod]) -> ColourMap {
    let mut colours = ColourMap::new();
    let Some(period) = select_period(year, periods) else {
        return colours;
    };
    for assignment in &period.assignments {
        for code in &assignment.codes {
            colours.insert(code.clone(), assignment.colour.clone());
        }
    }
    colours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(json: &str) -> Vec<Map<String, Value>> {
        serde_json::from_str(json).unwrap()
    }

    fn two_periods() -> Vec<EmpirePeriod> {
        parse_periods(&rows(
            r#"[
                {"Year": "1800", "British red": "GBR;IRL", "French blue": "FRA"},
                {"Year": 1850, "British red": "GBR; IRL; IND", "French blue": "FRA;DZA", "": "junk"}
            ]"#,
        ))
        .unwrap()
    }

    #[test]
    fn test_parse_empire_key() {
        assert_eq!(parse_empire_key("British red"), Some(("British", "red")));
        assert_eq!(parse_empire_key("  Ottoman   green  "), Some(("Ottoman", "green")));
        assert_eq!(parse_empire_key("Russian purple extra"), Some(("Russian", "purple")));
        assert_eq!(parse_empire_key("British"), None);
        assert_eq!(parse_empire_key(""), None);
    }

    #[test]
    fn test_parse_period_keeps_column_order() {
        let periods = two_periods();
        assert_eq!(periods[0].year, 1800);
        assert_eq!(periods[1].year, 1850);
        let empires: Vec<&str> = periods[1]
            .assignments
            .iter()
            .map(|a| a.empire.as_str())
            .collect();
        assert_eq!(empires, ["British", "French"]);
        assert_eq!(periods[1].assignments[0].codes, ["GBR", "IRL", "IND"]);
    }

    #[test]
    fn test_parse_period_rejects_bad_year() {
        let err = parse_periods(&rows(r#"[{"Year": "soon", "British red": "GBR"}]"#)).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidPeriod { index: 0, .. }));
        let err = parse_periods(&rows(r#"[{"British red": "GBR"}]"#)).unwrap_err();
        assert!(err.to_string().contains("missing Year"));
    }

    #[test]
    fn test_parse_period_skips_colourless_column() {
        let json = r#"[{"Year": 1800, "British": "GBR", "French blue": "FRA"}]"#;
        let periods = parse_periods(&rows(json)).unwrap();
        assert_eq!(periods[0].assignments.len(), 1);
        assert_eq!(periods[0].assignments[0].colour, "blue");
    }

    #[test]
    fn test_resolve_first_period_not_below_year() {
        let periods = two_periods();
        let colours = resolve(Some(1820), &periods);
        assert_eq!(colours.get("IND").map(String::as_str), Some("red"));
        assert_eq!(colours.get("DZA").map(String::as_str), Some("blue"));
        assert_eq!(colours.len(), 5);
    }

    #[test]
    fn test_resolve_bound_is_inclusive() {
        let periods = two_periods();
        let colours = resolve(Some(1800), &periods);
        assert!(!colours.contains_key("IND"));
        assert_eq!(colours.len(), 3);
    }

    #[test]
    fn test_resolve_past_last_period_falls_back() {
        let periods = two_periods();
        assert_eq!(resolve(Some(1900), &periods), resolve(Some(1850), &periods));
    }

    #[test]
    fn test_resolve_without_year_uses_last_period() {
        let periods = two_periods();
        assert_eq!(resolve(None, &periods), resolve(Some(1850), &periods));
    }

    #[test]
    fn test_resolve_empty_table() {
        assert!(resolve(Some(1800), &[]).is_empty());
    }

    #[test]
    fn test_later_column_wins() {
        let periods = parse_periods(&rows(
            r#"[{"Year": 1810, "French blue": "FRA;ESP", "Spanish yellow": "ESP"}]"#,
        ))
        .unwrap();
        let colours = resolve(Some(1810), &periods);
        assert_eq!(colours["ESP"], "yellow");
        assert_eq!(colours["FRA"], "blue");
    }
}
