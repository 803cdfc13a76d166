//! CSV wide table adapter.
//!
//! Layout: header `Date,<entity>...`, one row per date, empty field for an
//! absent cell.

use crate::adapters::csv_fields::parse_date;
use crate::domain::entity::EntityId;
use crate::domain::error::IndexDataError;
use crate::domain::wide_table::WideTable;
use crate::ports::table_port::TablePort;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct CsvTableAdapter {
    output_dir: PathBuf,
}

impl CsvTableAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", name))
    }
}

/// Serialize `table` as CSV text.
pub fn to_csv_string(table: &WideTable) -> Result<String, IndexDataError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(table.column_count() + 1);
    header.push("Date".to_string());
    header.extend(table.columns().iter().map(|c| c.to_string()));
    wtr.write_record(&header)?;

    for (row, date) in table.rows().iter().enumerate() {
        let mut record = Vec::with_capacity(table.column_count() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        record.extend(
            table
                .row_values(row)
                .into_iter()
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| IndexDataError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| IndexDataError::Io(std::io::Error::other(e)))
}

/// Parse CSV text produced by [`to_csv_string`]. `name` is only used in errors.
pub fn from_csv_str(name: &str, content: &str) -> Result<WideTable, IndexDataError> {
    let table_err = |reason: String| IndexDataError::Table {
        name: name.to_string(),
        reason,
    };

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(table_err("missing header".into()));
    }
    // Column keys were normalized, under whatever rule was configured, when
    // the table was written.
    let columns: Vec<EntityId> = headers
        .iter()
        .skip(1)
        .map(EntityId::from_normalized)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let date_str = record.get(0).unwrap_or_default();
        let date = parse_date(date_str)
            .map_err(|e| table_err(format!("invalid date {:?}: {}", date_str, e)))?;
        let mut cells = Vec::with_capacity(columns.len());
        for (col, raw) in record.iter().skip(1).enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let value: f64 = raw
                .parse()
                .map_err(|e| table_err(format!("invalid value {:?} on {}: {}", raw, date, e)))?;
            cells.push((col, value));
        }
        rows.push((date, cells));
    }

    let mut table = WideTable::new(rows.iter().map(|(date, _)| *date), columns.clone());
    for (date, cells) in rows {
        for (col, value) in cells {
            if let Some(entity) = columns.get(col) {
                table.set(date, entity, value);
            }
        }
    }
    Ok(table)
}

impl TablePort for CsvTableAdapter {
    fn write_table(&self, table: &WideTable, name: &str) -> Result<PathBuf, IndexDataError> {
        let content = to_csv_string(table)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.table_path(name);
        fs::write(&path, content)?;
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "table written"
        );
        Ok(path)
    }

    fn read_table(&self, name: &str) -> Result<WideTable, IndexDataError> {
        let path = self.table_path(name);
        let content = fs::read_to_string(&path)?;
        from_csv_str(name, &content)
    }
}
