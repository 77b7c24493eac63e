//! Year indexing and per-department series extraction.

use chrono::NaiveDate;

use crate::domain::{PlacementRecord, PlacementSeries};
use crate::error::AppError;

/// One record plus its year index.
#[derive(Debug, Clone, PartialEq)]
struct IndexedRecord {
    date: NaiveDate,
    record: PlacementRecord,
}

/// The loaded table, indexed by year and sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct PlacementTable {
    rows: Vec<IndexedRecord>,
}

impl PlacementTable {
    /// Index every record by January 1st of its year and sort chronologically.
    ///
    /// The sort is stable, so rows sharing a year keep their file order.
    pub fn from_records(records: Vec<PlacementRecord>) -> Result<Self, AppError> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let date = year_start(record.year).ok_or_else(|| {
                AppError::internal(format!("Year {} cannot be used as a date index", record.year))
            })?;
            rows.push(IndexedRecord { date, record });
        }
        rows.sort_by_key(|r| r.date);
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Distinct department labels in first-seen (chronological) order.
    pub fn departments(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            let name = row.record.department.as_str();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    /// Chronological series for `department` (exact, case-sensitive match).
    pub fn series(&self, department: &str) -> Option<PlacementSeries> {
        let points: Vec<(NaiveDate, f64)> = self
            .rows
            .iter()
            .filter(|r| r.record.department == department)
            .map(|r| (r.date, r.record.placed_students))
            .collect();
        if points.is_empty() {
            return None;
        }
        Some(PlacementSeries {
            department: department.to_string(),
            points,
        })
    }
}

/// January 1st of `year`, restricted to four-digit calendar years.
pub fn year_start(year: i32) -> Option<NaiveDate> {
    if !(1..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, 1, 1)
}
