//! CSV search-interest adapter.
//!
//! One optional file per entity, `<base>/<ENTITY>.csv`, holding a `date`
//! column and an interest column. The interest column is the one named
//! `$<ENTITY>` (the search term used when fetching), `<ENTITY>`, or else the
//! first column that is neither `date` nor `isPartial`.

use crate::adapters::csv_fields::{find_column, parse_date};
use crate::domain::entity::EntityId;
use crate::domain::error::IndexDataError;
use crate::domain::series::{SeriesPoint, SingleColumnSeries};
use crate::ports::trend_port::TrendPort;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvTrendAdapter {
    base_path: PathBuf,
}

impl CsvTrendAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, entity: &EntityId) -> PathBuf {
        self.base_path.join(format!("{}.csv", entity))
    }

    fn value_column(entity: &EntityId, headers: &csv::StringRecord, date_col: usize) -> Option<usize> {
        let term = format!("${}", entity);
        find_column(headers, &[term.as_str(), entity.as_str()]).or_else(|| {
            headers
                .iter()
                .enumerate()
                .find(|(i, h)| *i != date_col && !h.trim().eq_ignore_ascii_case("isPartial"))
                .map(|(i, _)| i)
        })
    }
}

impl TrendPort for CsvTrendAdapter {
    fn load_trend(&self, entity: &EntityId) -> Result<Option<SingleColumnSeries>, IndexDataError> {
        let path = self.csv_path(entity);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(IndexDataError::DataCorruption {
                    entity: entity.to_string(),
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let corrupt = |reason: String| IndexDataError::DataCorruption {
            entity: entity.to_string(),
            reason,
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| corrupt(format!("CSV header error: {}", e)))?
            .clone();
        let date_col =
            find_column(&headers, &["date"]).ok_or_else(|| corrupt("missing date column".into()))?;
        let value_col = Self::value_column(entity, &headers, date_col)
            .ok_or_else(|| corrupt("missing interest column".into()))?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| corrupt(format!("CSV parse error: {}", e)))?;

            let date_str = record.get(date_col).unwrap_or_default();
            let date = parse_date(date_str)
                .map_err(|e| corrupt(format!("invalid date {:?}: {}", date_str, e)))?;

            let raw = record.get(value_col).unwrap_or_default().trim();
            let value = if raw.is_empty() {
                None
            } else {
                let v = raw
                    .parse::<f64>()
                    .map_err(|e| corrupt(format!("invalid interest {:?}: {}", raw, e)))?;
                if !v.is_finite() {
                    return Err(corrupt(format!("non-finite interest on {}", date)));
                }
                Some(v)
            };
            points.push(SeriesPoint { date, value });
        }

        points.sort_by_key(|p| p.date);
        SingleColumnSeries::from_unchecked(entity.clone(), points).map(Some)
    }
}
