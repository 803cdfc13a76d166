//! Per-entity price history port.

use crate::domain::entity::EntityId;
use crate::domain::error::IndexDataError;
use crate::domain::ohlcv::OhlcvSeries;

pub trait PriceSeriesPort {
    /// Load one entity's OHLCV history.
    ///
    /// Fails with `NotFound` when nothing has been fetched for the entity and
    /// with `DataCorruption` when the stored history cannot be read.
    fn load_series(&self, entity: &EntityId) -> Result<OhlcvSeries, IndexDataError>;
}
