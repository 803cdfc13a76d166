//! Search-interest trend port.

use crate::domain::entity::EntityId;
use crate::domain::error::IndexDataError;
use crate::domain::series::SingleColumnSeries;

pub trait TrendPort {
    /// `Ok(None)` is the normal outcome for an entity without trend data.
    fn load_trend(&self, entity: &EntityId) -> Result<Option<SingleColumnSeries>, IndexDataError>;
}
