//! Outer join of per-entity series into one wide table.
//!
//! The column set is fixed up front from the registry, then every series
//! fills its column in a single pass. Rows are the union of all input dates.

use crate::domain::entity::{EntityId, EntityRegistry};
use crate::domain::series::SingleColumnSeries;
use crate::domain::wide_table::WideTable;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Outer-join `series` into a table whose columns follow registry order.
///
/// Entities absent from the registry are placed after the registry columns in
/// input order. An entity with an empty series still gets a column.
pub fn outer_join(registry: &EntityRegistry, series: &[SingleColumnSeries]) -> WideTable {
    outer_join_with_rows(registry, series, &[])
}

/// Like [`outer_join`], with `extra_rows` added to the row union.
pub fn outer_join_with_rows(
    registry: &EntityRegistry,
    series: &[SingleColumnSeries],
    extra_rows: &[NaiveDate],
) -> WideTable {
    let rows = union_dates(series)
        .into_iter()
        .chain(extra_rows.iter().copied());
    let mut table = WideTable::new(rows, column_order(registry, series));

    for s in series {
        let Some(col) = table.column_position(&s.entity) else {
            continue;
        };
        for point in &s.points {
            let (Some(value), Some(row)) = (point.value, table.row_position(point.date)) else {
                continue;
            };
            table.set_at(row, col, value);
        }
    }

    table
}

/// Sorted union of every date in `series`, including undefined points.
pub fn union_dates(series: &[SingleColumnSeries]) -> BTreeSet<NaiveDate> {
    series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.date))
        .collect()
}

fn column_order(registry: &EntityRegistry, series: &[SingleColumnSeries]) -> Vec<EntityId> {
    let mut keyed: Vec<(usize, &EntityId)> = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let key = registry
                .position(&s.entity)
                .unwrap_or(registry.len() + i);
            (key, &s.entity)
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, id)| id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::SymbolRule;
    use crate::domain::series::SeriesPoint;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    fn registry(symbols: &[&str]) -> EntityRegistry {
        EntityRegistry::from_symbols(symbols.iter().copied(), &SymbolRule::default()).unwrap()
    }

    fn series(entity: &str, points: &[(u32, f64)]) -> SingleColumnSeries {
        SingleColumnSeries::new(
            EntityId::new(entity),
            points
                .iter()
                .map(|&(d, v)| SeriesPoint::defined(date(d), v))
                .collect(),
        )
    }

    #[test]
    fn two_entity_example() {
        let reg = registry(&["A", "B"]);
        let a = EntityId::new("A");
        let b = EntityId::new("B");
        let table = outer_join(
            &reg,
            &[
                series("A", &[(1, 10.0), (2, 12.0)]),
                series("B", &[(2, 20.0), (3, 22.0)]),
            ],
        );

        assert_eq!(table.rows(), &[date(1), date(2), date(3)]);
        assert_eq!(table.get(date(1), &a), Some(10.0));
        assert_eq!(table.get(date(1), &b), None);
        assert_eq!(table.get(date(2), &a), Some(12.0));
        assert_eq!(table.get(date(2), &b), Some(20.0));
        assert_eq!(table.get(date(3), &a), None);
        assert_eq!(table.get(date(3), &b), Some(22.0));
    }

    #[test]
    fn columns_follow_registry_not_input_order() {
        let reg = registry(&["A", "B", "C"]);
        let table = outer_join(
            &reg,
            &[
                series("C", &[(1, 3.0)]),
                series("A", &[(1, 1.0)]),
                series("B", &[(1, 2.0)]),
            ],
        );
        let cols: Vec<&str> = table.columns().iter().map(|c| c.as_str()).collect();
        assert_eq!(cols, vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_series_keeps_its_column() {
        let reg = registry(&["A", "B"]);
        let table = outer_join(&reg, &[series("A", &[(1, 1.0)]), series("B", &[])]);

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows(), &[date(1)]);
        assert_eq!(table.column_values(&EntityId::new("B")), Some(vec![None]));
        assert_eq!(table.get(date(1), &EntityId::new("A")), Some(1.0));
    }

    #[test]
    fn missing_entity_has_no_column() {
        let reg = registry(&["A", "B"]);
        let table = outer_join(&reg, &[series("B", &[(1, 2.0)])]);
        assert!(!table.has_column(&EntityId::new("A")));
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn undefined_points_contribute_rows_only() {
        let reg = registry(&["A"]);
        let s = SingleColumnSeries::new(
            EntityId::new("A"),
            vec![
                SeriesPoint::undefined(date(1)),
                SeriesPoint::defined(date(2), 50.0),
            ],
        );
        let table = outer_join(&reg, &[s]);

        assert_eq!(table.rows(), &[date(1), date(2)]);
        assert_eq!(table.get(date(1), &EntityId::new("A")), None);
        assert_eq!(table.cell_count(), 1);
    }

    #[test]
    fn unregistered_entities_go_last() {
        let reg = registry(&["A", "B"]);
        let table = outer_join(
            &reg,
            &[
                series("X", &[(1, 9.0)]),
                series("B", &[(1, 2.0)]),
                series("Y", &[(1, 8.0)]),
            ],
        );
        let cols: Vec<&str> = table.columns().iter().map(|c| c.as_str()).collect();
        assert_eq!(cols, vec!["B", "X", "Y"]);
    }

    #[test]
    fn extra_rows_join_the_union() {
        let reg = registry(&["A"]);
        let table = outer_join_with_rows(&reg, &[series("A", &[(2, 1.0)])], &[date(1), date(2)]);
        assert_eq!(table.rows(), &[date(1), date(2)]);
        assert_eq!(table.get(date(1), &EntityId::new("A")), None);
    }

    #[test]
    fn rejoin_is_identical() {
        let reg = registry(&["A", "B"]);
        let input = [
            series("A", &[(1, 10.0), (4, 11.0)]),
            series("B", &[(2, 20.0), (3, 22.0)]),
        ];
        assert_eq!(outer_join(&reg, &input), outer_join(&reg, &input));
    }

    #[test]
    fn no_series_gives_empty_table() {
        let reg = registry(&["A"]);
        let table = outer_join(&reg, &[]);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }
}
