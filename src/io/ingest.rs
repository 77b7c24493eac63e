//! CSV ingest.
//!
//! Turns the placement CSV into `PlacementRecord`s. The loader is strict:
//! a missing required column or a single unparseable row fails the whole
//! load (there is no partial recovery), and the error names the line.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::PlacementRecord;
use crate::error::AppError;

const COL_YEAR: &str = "year";
const COL_DEPARTMENT: &str = "department";
const COL_PLACED: &str = "placed_students";

/// Load every row of the placement CSV at `path`.
pub fn load_placements(path: &Path) -> Result<Vec<PlacementRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::internal(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_placements(file)
}

/// Parse placement rows from any reader (the file loader delegates here).
pub fn read_placements<R: std::io::Read>(reader: R) -> Result<Vec<PlacementRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::internal(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::internal(format!("CSV parse error on line {line}: {e}")))?;
        let row = parse_row(&record, &header_map)
            .map_err(|e| AppError::internal(format!("Invalid row on line {line}: {e}")))?;
        records.push(row);
    }

    Ok(records)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for (col, display) in [
        (COL_YEAR, "Year"),
        (COL_DEPARTMENT, "Department"),
        (COL_PLACED, "Placed_Students"),
    ] {
        if !header_map.contains_key(col) {
            return Err(AppError::internal(format!("Missing required column: `{display}`")));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<PlacementRecord, String> {
    // Numbers tolerate padding; department labels are kept verbatim.
    let year = parse_year(get_required(record, header_map, COL_YEAR)?.trim())?;
    let department = get_required(record, header_map, COL_DEPARTMENT)?.to_string();
    let placed_students = parse_count(get_required(record, header_map, COL_PLACED)?.trim())?;

    Ok(PlacementRecord {
        year,
        department,
        placed_students,
    })
}

/// Accept `2019` as well as float-formatted years such as `2019.0`.
pub(crate) fn parse_year(s: &str) -> Result<i32, String> {
    if let Ok(y) = s.parse::<i32>() {
        return Ok(y);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i32::MAX as f64 => Ok(v as i32),
        _ => Err(format!("Invalid year '{s}'. Expected a 4-digit year such as 2019.")),
    }
}

fn parse_count(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid `Placed_Students` value '{s}'.")),
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_and_ignores_extra_columns() {
        let csv = "\u{feff}Year,Department,Placed_Students,Notes\n\
                   2020,Computer Science,120,\n\
                   2019,Civil Engineering, 45.0 ,late\n";
        let rows = read_placements(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2020);
        assert_eq!(rows[1].department, "Civil Engineering");
        assert!((rows[1].placed_students - 45.0).abs() < 1e-12);
    }

    #[test]
    fn department_whitespace_is_preserved() {
        let csv = " Year , Department ,Placed_Students\n 2019 , Civil Engineering ,45\n";
        let rows = read_placements(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].year, 2019);
        assert_eq!(rows[0].department, " Civil Engineering ");
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Year,Department\n2020,Computer Science\n";
        let err = read_placements(csv.as_bytes()).unwrap_err();
        assert_eq!(err.message(), "Missing required column: `Placed_Students`");
    }

    #[test]
    fn bad_row_fails_whole_load_with_line_number() {
        let csv = "Year,Department,Placed_Students\n2020,CS,10\nabc,CS,11\n";
        let err = read_placements(csv.as_bytes()).unwrap_err();
        assert!(err.message().contains("line 3"), "got: {err}");
        assert!(err.message().contains("Invalid year 'abc'"), "got: {err}");
    }

    #[test]
    fn year_accepts_float_formatting() {
        assert_eq!(parse_year("2019.0"), Ok(2019));
        assert!(parse_year("2019.5").is_err());
    }

    #[test]
    fn missing_file_is_internal_error() {
        let err = load_placements(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
        assert!(err.message().starts_with("Failed to open CSV"));
    }
}
