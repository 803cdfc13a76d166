//! Join of an aggregated price table against the trend store.
//!
//! Trend coverage is partial by nature: an entity without trend data gets no
//! column at all, rather than a column of absent cells. A trend series with
//! no defined value counts as no trend data.

use crate::domain::aggregate::outer_join_with_rows;
use crate::domain::entity::{EntityId, EntityRegistry};
use crate::domain::error::IndexDataError;
use crate::domain::pipeline::{SkipReason, SkippedEntity};
use crate::domain::wide_table::WideTable;
use crate::ports::trend_port::TrendPort;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct TrendJoin {
    pub table: WideTable,
    /// Entities with no trend data, or trend data that could not be read.
    pub skipped: Vec<SkippedEntity>,
}

impl TrendJoin {
    pub fn joined(&self) -> &[EntityId] {
        self.table.columns()
    }
}

/// Outer-join every available trend series, in registry order.
///
/// With `include_base_dates`, the dates of `base` join the row union so the
/// result lines up with the price table; `base` never contributes columns.
pub fn join_trends(
    base: &WideTable,
    registry: &EntityRegistry,
    trends: &dyn TrendPort,
    include_base_dates: bool,
) -> Result<TrendJoin, IndexDataError> {
    let mut found = Vec::new();
    let mut skipped = Vec::new();

    for entity in registry.iter() {
        match trends.load_trend(entity) {
            Ok(Some(series)) if series.defined_count() > 0 => {
                debug!(entity = %entity, points = series.len(), "trend series loaded");
                found.push(series);
            }
            // A file with no usable value is the same as no file.
            Ok(_) => {
                debug!(entity = %entity, "no trend data");
                skipped.push(SkippedEntity {
                    entity: entity.clone(),
                    reason: SkipReason::NotFound,
                });
            }
            Err(e) if e.is_entity_scoped() => {
                warn!(entity = %entity, error = %e, "skipping unreadable trend data");
                skipped.push(SkippedEntity {
                    entity: entity.clone(),
                    reason: SkipReason::from_error(&e),
                });
            }
            Err(e) => return Err(e),
        }
    }

    let extra_rows: &[_] = if include_base_dates { base.rows() } else { &[] };
    let table = outer_join_with_rows(registry, &found, extra_rows);

    info!(
        joined = table.column_count(),
        without_trend = skipped.len(),
        rows = table.row_count(),
        "trend data joined"
    );

    Ok(TrendJoin { table, skipped })
}
