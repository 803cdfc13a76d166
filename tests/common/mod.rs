#![allow(dead_code)]

use chrono::NaiveDate;
use indexdata::domain::entity::{EntityId, EntityRegistry, SymbolRule};
use indexdata::domain::error::IndexDataError;
pub use indexdata::domain::ohlcv::{OhlcvRecord, OhlcvSeries};
use indexdata::domain::series::{SeriesPoint, SingleColumnSeries};
use indexdata::domain::wide_table::WideTable;
use indexdata::ports::price_port::PriceSeriesPort;
use indexdata::ports::table_port::TablePort;
use indexdata::ports::trend_port::TrendPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct MockPriceStore {
    pub data: HashMap<EntityId, Vec<OhlcvRecord>>,
    pub corrupt: HashMap<EntityId, String>,
}

impl MockPriceStore {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            corrupt: HashMap::new(),
        }
    }

    pub fn with_records(mut self, entity: &str, records: Vec<OhlcvRecord>) -> Self {
        self.data.insert(EntityId::new(entity), records);
        self
    }

    pub fn with_closes(self, entity: &str, closes: &[(&str, f64)]) -> Self {
        let records = closes.iter().map(|&(d, c)| make_record(d, c)).collect();
        self.with_records(entity, records)
    }

    pub fn with_corruption(mut self, entity: &str, reason: &str) -> Self {
        self.corrupt.insert(EntityId::new(entity), reason.to_string());
        self
    }
}

impl PriceSeriesPort for MockPriceStore {
    fn load_series(&self, entity: &EntityId) -> Result<OhlcvSeries, IndexDataError> {
        if let Some(reason) = self.corrupt.get(entity) {
            return Err(IndexDataError::DataCorruption {
                entity: entity.to_string(),
                reason: reason.clone(),
            });
        }
        let records = self
            .data
            .get(entity)
            .cloned()
            .ok_or_else(|| IndexDataError::NotFound {
                entity: entity.to_string(),
            })?;
        OhlcvSeries::new(entity.clone(), records)
    }
}

pub struct MockTrendStore {
    pub data: HashMap<EntityId, SingleColumnSeries>,
}

impl MockTrendStore {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_trend(mut self, entity: &str, points: &[(&str, f64)]) -> Self {
        let id = EntityId::new(entity);
        let series = SingleColumnSeries::new(
            id.clone(),
            points
                .iter()
                .map(|&(d, v)| SeriesPoint::defined(parse(d), v))
                .collect(),
        );
        self.data.insert(id, series);
        self
    }
}

impl TrendPort for MockTrendStore {
    fn load_trend(&self, entity: &EntityId) -> Result<Option<SingleColumnSeries>, IndexDataError> {
        Ok(self.data.get(entity).cloned())
    }
}

/// Table sink that keeps every written table in memory.
#[derive(Default)]
pub struct MemoryTables {
    pub written: RefCell<HashMap<String, WideTable>>,
}

impl TablePort for MemoryTables {
    fn write_table(&self, table: &WideTable, name: &str) -> Result<PathBuf, IndexDataError> {
        self.written
            .borrow_mut()
            .insert(name.to_string(), table.clone());
        Ok(PathBuf::from(format!("{}.csv", name)))
    }

    fn read_table(&self, name: &str) -> Result<WideTable, IndexDataError> {
        self.written
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| IndexDataError::Table {
                name: name.to_string(),
                reason: "not written".to_string(),
            })
    }
}

pub fn parse(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_record(date: &str, adj_close: f64) -> OhlcvRecord {
    OhlcvRecord {
        date: parse(date),
        open: adj_close - 1.0,
        high: adj_close + 1.0,
        low: adj_close - 2.0,
        close: adj_close + 0.5,
        adj_close,
        volume: 1000,
    }
}

pub fn generate_records(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvRecord> {
    let start = parse(start_date);
    (0..count)
        .map(|i| OhlcvRecord {
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            adj_close: start_price + i as f64,
            volume: 1000 + i as i64,
        })
        .collect()
}

pub fn registry(symbols: &[&str]) -> EntityRegistry {
    EntityRegistry::from_symbols(symbols.iter().copied(), &SymbolRule::default()).unwrap()
}

pub fn id(symbol: &str) -> EntityId {
    EntityId::new(symbol)
}
