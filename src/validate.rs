//! Validation and normalisation of the raw event table.
//!
//! One pass reports every problem it can find. Only a structural problem
//! (no rows, missing columns) stops the pass early. As a side effect the
//! `Location` and `Influences` fields are rewritten into canonical codes.

use atlas_types::ValidationReport;
use thiserror::Error;

use crate::date::{DateError, validate_date};
use crate::geography::Geography;
use crate::location::LocationResolver;
use crate::types::{Column, RawRecord};

/// Physical line of a row: rows are zero-based and line 1 is the header.
fn line_number(index: usize) -> usize {
    index + 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Fatal: the table cannot be checked row by row.
    Structural,
    DateFormat,
    Code,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("You need at least one event!")]
    NoEvents,

    #[error("You are missing the column {0}")]
    MissingColumn(&'static str),

    #[error("Line {line}: {field}: {error}")]
    Date {
        line: usize,
        /// "Start Date" or "End Date".
        field: &'static str,
        error: DateError,
    },

    #[error("Line {line}: {field} has an invalid country code: {code}{}", suggestion_suffix(.suggestion))]
    Code {
        line: usize,
        field: &'static str,
        code: String,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(code) => format!(" (Did you mean to use the code {code}?)"),
        None => String::new(),
    }
}

impl ValidationIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::NoEvents | Self::MissingColumn(_) => IssueKind::Structural,
            Self::Date { .. } => IssueKind::DateFormat,
            Self::Code { .. } => IssueKind::Code,
        }
    }
}

fn report(issues: &[ValidationIssue]) -> ValidationReport {
    ValidationReport::from_messages(issues.iter().map(ToString::to_string).collect())
}

/// Columns required on the first row that it does not have.
fn missing_columns(first: &RawRecord) -> Vec<ValidationIssue> {
    Column::REQUIRED
        .iter()
        .filter(|c| !first.has_column(c.as_str()))
        .map(|c| ValidationIssue::MissingColumn(c.as_str()))
        .collect()
}

fn check_dates(index: usize, record: &RawRecord, issues: &mut Vec<ValidationIssue>) {
    let line = line_number(index);
    let checks = [
        (Column::StartDate, "Start Date", false),
        (Column::EndDate, "End Date", true),
    ];
    for (column, field, optional) in checks {
        if let Err(error) = validate_date(record.column(column), optional) {
            issues.push(ValidationIssue::Date { line, field, error });
        }
    }
}

fn normalise_codes(
    index: usize,
    record: &mut RawRecord,
    resolver: &LocationResolver,
    geography: &Geography,
    issues: &mut Vec<ValidationIssue>,
) {
    let line = line_number(index);
    for column in [Column::Location, Column::Influences] {
        let codes = resolver.normalise(record.column(column));
        issues.extend(geography.validate_codes(&codes, line, column));
        record.set(column, codes);
    }
}

/// Validate the unfiltered event table, normalising location fields in place.
///
/// Comment rows are checked like any other row; only population drops them.
pub fn validate_records(records: &mut [RawRecord], geography: &Geography) -> ValidationReport {
    let Some(first) = records.first() else {
        return report(&[ValidationIssue::NoEvents]);
    };

    let structural = missing_columns(first);
    if !structural.is_empty() {
        tracing::warn!(missing = structural.len(), "event table is missing columns");
        return report(&structural);
    }

    let mut issues = Vec::new();

    for (index, record) in records.iter().enumerate() {
        check_dates(index, record, &mut issues);
    }

    let resolver = LocationResolver::new(geography);
    for (index, record) in records.iter_mut().enumerate() {
        normalise_codes(index, record, &resolver, geography, &mut issues);
    }

    if issues.is_empty() {
        tracing::info!(rows = records.len(), "event table is valid");
        ValidationReport::valid()
    } else {
        let count = |kind| issues.iter().filter(|i| i.kind() == kind).count();
        tracing::warn!(
            rows = records.len(),
            dates = count(IssueKind::DateFormat),
            codes = count(IssueKind::Code),
            "event table is invalid"
        );
        report(&issues)
    }
}
