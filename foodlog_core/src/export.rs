//! CSV export of logged food entries.
//!
//! One row per entry, days in ascending order. Path exports are written to
//! a temporary file in the target directory and renamed into place.

use crate::{DailyLog, FoodEntry, Result};
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const HEADERS: [&str; 9] = [
    "log_date",
    "id",
    "name",
    "description",
    "calories",
    "protein",
    "carbs",
    "fat",
    "logged_at",
];

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    log_date: String,
    id: String,
    name: String,
    description: Option<String>,
    calories: u32,
    protein: f64,
    carbs: f64,
    fat: f64,
    logged_at: String,
}

impl CsvRow {
    fn new(log_date: NaiveDate, entry: &FoodEntry) -> Self {
        CsvRow {
            log_date: log_date.to_string(),
            id: entry.id.to_string(),
            name: entry.name.clone(),
            description: entry.description.clone(),
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            logged_at: entry.logged_at.to_rfc3339(),
        }
    }
}

/// Write every entry in `logs` as CSV, returning the number of rows
///
/// The header row is always written, even when there are no entries.
pub fn write_entries_csv<W: Write>(logs: &[DailyLog], writer: W) -> Result<usize> {
    let mut sorted: Vec<&DailyLog> = logs.iter().collect();
    sorted.sort_by_key(|log| log.log_date);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(HEADERS)?;

    let mut rows = 0;
    for log in sorted {
        for entry in &log.entries {
            writer.serialize(CsvRow::new(log.log_date, entry))?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

/// Export logs to a CSV file at `path`, replacing it atomically
pub fn export_csv(logs: &[DailyLog], path: &Path) -> Result<usize> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    let rows = write_entries_csv(logs, &mut tmp)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!("Exported {} entries to {:?}", rows, path);
    Ok(rows)
}
