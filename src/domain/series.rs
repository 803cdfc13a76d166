//! Single-column, per-entity time series.

use crate::domain::entity::EntityId;
use crate::domain::error::IndexDataError;
use chrono::NaiveDate;

/// One dated observation. `None` marks a date the calculation could not
/// define (e.g. RSI warm-up); the date still belongs to the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn defined(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value: Some(value),
        }
    }

    pub fn undefined(date: NaiveDate) -> Self {
        Self { date, value: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleColumnSeries {
    pub entity: EntityId,
    pub points: Vec<SeriesPoint>,
}

impl SingleColumnSeries {
    pub fn new(entity: EntityId, points: Vec<SeriesPoint>) -> Self {
        Self { entity, points }
    }

    /// Build from externally sourced points, rejecting unordered dates.
    pub fn from_unchecked(
        entity: EntityId,
        points: Vec<SeriesPoint>,
    ) -> Result<Self, IndexDataError> {
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(IndexDataError::DataCorruption {
                entity: entity.to_string(),
                reason: format!(
                    "dates not strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                ),
            });
        }
        Ok(Self { entity, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .and_then(|i| self.points[i].value)
    }

    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}
