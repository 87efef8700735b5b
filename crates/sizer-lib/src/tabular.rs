//! Tabular workload decoding
//!
//! Decodes uploaded CSV/XLS/XLSX payloads into row-level workload
//! records. Only structural failures abort the parse; row-level numeric
//! coercion failures leave the field unset.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::models::RowProfile;

/// File extensions accepted for upload, matched case-insensitively
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

/// Profile fields a header column can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Users,
    Concurrency,
    Workload,
    Cpu,
    Ram,
    Disk,
}

/// Case-insensitive header vocabulary
fn recognize_header(name: &str) -> Option<Column> {
    match name.trim().to_lowercase().as_str() {
        "users" | "total_users" | "user_count" => Some(Column::Users),
        "concurrency" | "concurrent_users" | "user_concurrency" => Some(Column::Concurrency),
        "workload" | "workload_type" | "category" => Some(Column::Workload),
        "cpu" | "processor" => Some(Column::Cpu),
        "ram" | "memory" => Some(Column::Ram),
        "disk" | "hard_disk" | "storage" | "hdd" => Some(Column::Disk),
        _ => None,
    }
}

/// Parse an uploaded file into row profiles.
///
/// The extension gates format dispatch before any byte inspection;
/// anything other than csv/xls/xlsx is rejected outright.
pub fn parse(bytes: &[u8], file_name: &str) -> Result<Vec<RowProfile>, ParseError> {
    let extension = file_name
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && *ext != file_name)
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ParseError::UnsupportedFormat { extension });
    }

    if bytes.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let rows = match extension.as_str() {
        "csv" => parse_csv(bytes)?,
        _ => parse_sheet(bytes)?,
    };

    debug!(file = %file_name, rows = rows.len(), "Parsed tabular upload");
    Ok(rows)
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<RowProfile>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ParseError::Malformed(e.to_string()))?
        .clone();

    let columns: Vec<Option<Column>> = headers.iter().map(recognize_header).collect();
    if columns.iter().all(Option::is_none) {
        return Err(ParseError::UnrecognizedSchema);
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Malformed(e.to_string()))?;
        let cells: Vec<&str> = record.iter().collect();
        match build_row(&columns, &cells) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped rows with no recognized data");
    }
    Ok(rows)
}

fn parse_sheet(bytes: &[u8]) -> Result<Vec<RowProfile>, ParseError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| ParseError::Malformed(e.to_string()))?;

    // First sheet only
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::EmptyInput)?
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    let mut sheet_rows = range.rows();
    // First row is always the header
    let header = match sheet_rows.next() {
        Some(h) => h,
        None => return Err(ParseError::EmptyInput),
    };

    let columns: Vec<Option<Column>> = header
        .iter()
        .map(|cell| recognize_header(&cell_text(cell)))
        .collect();
    if columns.iter().all(Option::is_none) {
        return Err(ParseError::UnrecognizedSchema);
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for sheet_row in sheet_rows {
        let cells: Vec<String> = sheet_row.iter().map(cell_text).collect();
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        match build_row(&columns, &refs) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped rows with no recognized data");
    }
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        other => other.to_string().trim().to_string(),
    }
}

/// Map one record's cells into a row profile. Returns None when no
/// recognized column held data, so the caller can skip and count it.
fn build_row(columns: &[Option<Column>], cells: &[&str]) -> Option<RowProfile> {
    let mut row = RowProfile::default();

    for (idx, column) in columns.iter().enumerate() {
        let Some(column) = column else { continue };
        let Some(value) = cells.get(idx).map(|c| c.trim()).filter(|c| !c.is_empty()) else {
            continue;
        };

        match column {
            // Numeric coercion failures are non-fatal: the field stays None
            Column::Users => row.users = coerce_count(value),
            Column::Concurrency => row.concurrency = coerce_count(value),
            Column::Workload => row.workload = Some(value.to_lowercase()),
            Column::Cpu => row.cpu = Some(value.to_string()),
            Column::Ram => row.ram = Some(value.to_string()),
            Column::Disk => row.disk = Some(value.to_string()),
        }
    }

    if row.is_empty() {
        None
    } else {
        Some(row)
    }
}

fn coerce_count(value: &str) -> Option<u64> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    // Spreadsheets often hand back integers as floats
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_extension_before_byte_inspection() {
        let err = parse(b"users\n10\n", "data.pdf").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnsupportedFormat {
                extension: "pdf".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_missing_extension() {
        let err = parse(b"users\n10\n", "data").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(parse(b"", "data.csv").unwrap_err(), ParseError::EmptyInput);
    }

    #[test]
    fn test_unrecognized_schema() {
        let err = parse(b"foo,bar\n1,2\n", "data.csv").unwrap_err();
        assert_eq!(err, ParseError::UnrecognizedSchema);
    }

    #[test]
    fn test_single_row_csv() {
        let rows = parse(b"users,concurrency,workload\n200,50,web-server\n", "fleet.csv").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].users, Some(200));
        assert_eq!(rows[0].concurrency, Some(50));
        assert_eq!(rows[0].workload.as_deref(), Some("web-server"));
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let rows = parse(b"Users,CONCURRENCY,Workload\n10,2,database\n", "a.csv").unwrap();
        assert_eq!(rows[0].users, Some(10));
        assert_eq!(rows[0].concurrency, Some(2));
    }

    #[test]
    fn test_unknown_columns_ignored() {
        let rows = parse(
            b"region,users,owner\nus-east-1,10,alice\n",
            "a.csv",
        )
        .unwrap();
        assert_eq!(rows[0].users, Some(10));
        assert!(rows[0].workload.is_none());
    }

    #[test]
    fn test_empty_rows_skipped_not_fatal() {
        let rows = parse(b"users,workload\n10,web-server\n,\n20,database\n", "a.csv").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_numeric_coercion_failure_leaves_field_unset() {
        let rows = parse(b"users,workload\nmany,database\n", "a.csv").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].users.is_none());
        assert_eq!(rows[0].workload.as_deref(), Some("database"));
    }

    #[test]
    fn test_hardware_columns_kept_as_text() {
        let rows = parse(
            b"cpu,ram,disk\n8 cores,16GB,500GB SSD\n",
            "hosts.csv",
        )
        .unwrap();
        assert_eq!(rows[0].cpu.as_deref(), Some("8 cores"));
        assert_eq!(rows[0].ram.as_deref(), Some("16GB"));
        assert_eq!(rows[0].disk.as_deref(), Some("500GB SSD"));
    }

    #[test]
    fn test_float_counts_rounded() {
        assert_eq!(coerce_count("25.0"), Some(25));
        assert_eq!(coerce_count("25.4"), Some(25));
        assert_eq!(coerce_count("-3"), None);
        assert_eq!(coerce_count("lots"), None);
    }

    #[test]
    fn test_xlsx_with_garbage_bytes_is_malformed() {
        let err = parse(b"definitely not a zip archive", "data.xlsx").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_uppercase_extension_accepted() {
        let rows = parse(b"users\n5\n", "DATA.CSV").unwrap();
        assert_eq!(rows[0].users, Some(5));
    }
}
