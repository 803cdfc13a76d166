//! OHLCV record and per-entity series.

use crate::domain::entity::EntityId;
use crate::domain::error::IndexDataError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

/// One entity's price history, ordered by strictly increasing date.
#[derive(Debug, Clone)]
pub struct OhlcvSeries {
    entity: EntityId,
    records: Vec<OhlcvRecord>,
}

impl OhlcvSeries {
    /// Build a series, rejecting out-of-order or repeated dates as corruption.
    pub fn new(entity: EntityId, records: Vec<OhlcvRecord>) -> Result<Self, IndexDataError> {
        if let Some(pair) = records.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(IndexDataError::DataCorruption {
                entity: entity.to_string(),
                reason: format!(
                    "dates not strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                ),
            });
        }
        Ok(Self { entity, records })
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn records(&self) -> &[OhlcvRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last date, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
