//! Derivation passes over the registry.
//!
//! Each entity's price history is loaded once, every requested indicator is
//! derived from it, and the history is dropped before the next entity. An
//! entity whose history is missing or corrupt is skipped for every indicator
//! in the run; the rest of the batch carries on.

use crate::domain::aggregate::outer_join;
use crate::domain::entity::{EntityId, EntityRegistry};
use crate::domain::error::IndexDataError;
use crate::domain::indicator::IndicatorType;
use crate::domain::series::SingleColumnSeries;
use crate::domain::wide_table::WideTable;
use crate::ports::price_port::PriceSeriesPort;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SkippedEntity {
    pub entity: EntityId,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NotFound,
    Corrupt { reason: String },
}

impl SkipReason {
    pub fn from_error(err: &IndexDataError) -> Self {
        match err {
            IndexDataError::NotFound { .. } => SkipReason::NotFound,
            IndexDataError::DataCorruption { reason, .. } => SkipReason::Corrupt {
                reason: reason.clone(),
            },
            other => SkipReason::Corrupt {
                reason: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DerivedTables {
    pub tables: Vec<(IndicatorType, WideTable)>,
    pub skipped: Vec<SkippedEntity>,
}

impl DerivedTables {
    pub fn table(&self, indicator: IndicatorType) -> Option<&WideTable> {
        self.tables
            .iter()
            .find(|(kind, _)| *kind == indicator)
            .map(|(_, table)| table)
    }
}

/// Derive one wide table per entry of `indicators`, in the given order.
///
/// Fails with `NoEntities` when every registry entity was skipped.
pub fn derive_tables(
    registry: &EntityRegistry,
    prices: &dyn PriceSeriesPort,
    indicators: &[IndicatorType],
) -> Result<DerivedTables, IndexDataError> {
    let mut columns: Vec<Vec<SingleColumnSeries>> = indicators
        .iter()
        .map(|_| Vec::with_capacity(registry.len()))
        .collect();
    let mut skipped = Vec::new();

    for entity in registry.iter() {
        let series = match prices.load_series(entity) {
            Ok(series) => series,
            Err(e) if e.is_entity_scoped() => {
                warn!(entity = %entity, error = %e, "skipping entity");
                skipped.push(SkippedEntity {
                    entity: entity.clone(),
                    reason: SkipReason::from_error(&e),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!(entity = %entity, records = series.len(), "price history loaded");
        for (kind, out) in indicators.iter().zip(columns.iter_mut()) {
            out.push(kind.calculate(&series));
        }
    }

    let derived = registry.len() - skipped.len();
    if derived == 0 {
        return Err(IndexDataError::NoEntities {
            skipped: skipped.len(),
        });
    }
    if !skipped.is_empty() {
        info!(
            derived,
            skipped = skipped.len(),
            total = registry.len(),
            "some entities were skipped"
        );
    }

    let tables = indicators
        .iter()
        .zip(columns)
        .map(|(kind, series)| {
            let table = outer_join(registry, &series);
            info!(
                indicator = %kind,
                rows = table.row_count(),
                columns = table.column_count(),
                "table aggregated"
            );
            (*kind, table)
        })
        .collect();

    Ok(DerivedTables { tables, skipped })
}
