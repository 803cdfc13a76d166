//! CSV price history adapter.
//!
//! One file per entity, `<base>/<ENTITY>.csv`, as saved by the download step:
//! `Date,Open,High,Low,Close,Adj Close,Volume` in any column order.

use crate::adapters::csv_fields::{find_column, parse_date};
use crate::domain::entity::EntityId;
use crate::domain::error::IndexDataError;
use crate::domain::ohlcv::{OhlcvRecord, OhlcvSeries};
use crate::ports::price_port::PriceSeriesPort;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adj_close: usize,
    volume: usize,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, entity: &EntityId) -> PathBuf {
        self.base_path.join(format!("{}.csv", entity))
    }

    fn columns(entity: &EntityId, headers: &csv::StringRecord) -> Result<Columns, IndexDataError> {
        let require = |names: &[&str]| {
            find_column(headers, names).ok_or_else(|| IndexDataError::DataCorruption {
                entity: entity.to_string(),
                reason: format!("missing {} column", names[0]),
            })
        };
        let close = require(&["Close"])?;
        Ok(Columns {
            date: require(&["Date"])?,
            open: require(&["Open"])?,
            high: require(&["High"])?,
            low: require(&["Low"])?,
            close,
            adj_close: find_column(headers, &["Adj Close", "Adj_Close", "AdjClose"])
                .unwrap_or(close),
            volume: require(&["Volume"])?,
        })
    }
}

fn corrupt(entity: &EntityId, line: u64, reason: String) -> IndexDataError {
    IndexDataError::DataCorruption {
        entity: entity.to_string(),
        reason: format!("line {}: {}", line, reason),
    }
}

fn price_field(
    entity: &EntityId,
    record: &csv::StringRecord,
    line: u64,
    idx: usize,
    name: &str,
) -> Result<f64, IndexDataError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| corrupt(entity, line, format!("missing {} value", name)))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| corrupt(entity, line, format!("invalid {} value {:?}: {}", name, raw, e)))?;
    if !value.is_finite() {
        return Err(corrupt(entity, line, format!("non-finite {} value", name)));
    }
    Ok(value)
}

fn volume_field(
    entity: &EntityId,
    record: &csv::StringRecord,
    line: u64,
    idx: usize,
) -> Result<i64, IndexDataError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| corrupt(entity, line, "missing volume value".into()))?
        .trim();
    // pandas writes integer columns that once held NaN as floats ("1500.0").
    match raw.parse::<i64>() {
        Ok(v) => Ok(v),
        Err(_) => {
            let v = price_field(entity, record, line, idx, "volume")?;
            Ok(v.round() as i64)
        }
    }
}

impl PriceSeriesPort for CsvPriceAdapter {
    fn load_series(&self, entity: &EntityId) -> Result<OhlcvSeries, IndexDataError> {
        let path = self.csv_path(entity);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IndexDataError::NotFound {
                    entity: entity.to_string(),
                });
            }
            Err(e) => {
                return Err(IndexDataError::DataCorruption {
                    entity: entity.to_string(),
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| IndexDataError::DataCorruption {
            entity: entity.to_string(),
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Self::columns(entity, headers)?;

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| IndexDataError::DataCorruption {
                entity: entity.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let date_str = record
                .get(cols.date)
                .ok_or_else(|| corrupt(entity, line, "missing date value".into()))?;
            let date = parse_date(date_str)
                .map_err(|e| corrupt(entity, line, format!("invalid date {:?}: {}", date_str, e)))?;

            records.push(OhlcvRecord {
                date,
                open: price_field(entity, &record, line, cols.open, "open")?,
                high: price_field(entity, &record, line, cols.high, "high")?,
                low: price_field(entity, &record, line, cols.low, "low")?,
                close: price_field(entity, &record, line, cols.close, "close")?,
                adj_close: price_field(entity, &record, line, cols.adj_close, "adj close")?,
                volume: volume_field(entity, &record, line, cols.volume)?,
            });
        }

        records.sort_by_key(|r| r.date);
        OhlcvSeries::new(entity.clone(), records)
    }
}
