//! RSI (Relative Strength Index) over adjusted close.
//!
//! Average gain/loss are plain trailing means over the last n price changes
//! (not Wilder smoothing):
//! - change[i] = AdjClose[i] - AdjClose[i-1], undefined for i = 0
//! - gain = max(change, 0), loss = max(-change, 0)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first n dates are kept in the output as undefined.

use crate::domain::ohlcv::OhlcvSeries;
use crate::domain::series::{SeriesPoint, SingleColumnSeries};

pub fn calculate_rsi(series: &OhlcvSeries, window: usize) -> SingleColumnSeries {
    let records = series.records();
    let entity = series.entity().clone();

    if window == 0 || records.len() < 2 {
        let points = records
            .iter()
            .map(|r| SeriesPoint::undefined(r.date))
            .collect();
        return SingleColumnSeries::new(entity, points);
    }

    // gains[k] / losses[k] belong to records[k + 1].
    let (gains, losses): (Vec<f64>, Vec<f64>) = records
        .windows(2)
        .map(|w| {
            let change = w[1].adj_close - w[0].adj_close;
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let mut points = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if i < window {
            points.push(SeriesPoint::undefined(record.date));
            continue;
        }
        let span = (i - window)..i;
        let avg_gain = gains[span.clone()].iter().sum::<f64>() / window as f64;
        let avg_loss = losses[span].iter().sum::<f64>() / window as f64;
        points.push(SeriesPoint::defined(record.date, rsi_from_averages(avg_gain, avg_loss)));
    }

    SingleColumnSeries::new(entity, points)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EntityId;
    use crate::domain::ohlcv::OhlcvRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> OhlcvSeries {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let records = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| OhlcvRecord {
                date: start + chrono::Duration::days(i as i64),
                open: p,
                high: p,
                low: p,
                close: p,
                adj_close: p,
                volume: 100,
            })
            .collect();
        OhlcvSeries::new(EntityId::new("TEST"), records).unwrap()
    }

    #[test]
    fn rsi_empty_series() {
        let rsi = calculate_rsi(&make_series(&[]), 14);
        assert!(rsi.is_empty());
    }

    #[test]
    fn rsi_single_record() {
        let rsi = calculate_rsi(&make_series(&[100.0]), 14);
        assert_eq!(rsi.len(), 1);
        assert_eq!(rsi.points[0].value, None);
    }

    #[test]
    fn rsi_warmup_kept_as_undefined() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let rsi = calculate_rsi(&make_series(&prices), 14);

        assert_eq!(rsi.len(), 20);
        for i in 0..14 {
            assert!(rsi.points[i].value.is_none(), "point {} should be undefined", i);
        }
        for i in 14..20 {
            assert!(rsi.points[i].value.is_some(), "point {} should be defined", i);
        }
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let rsi = calculate_rsi(&make_series(&prices), 14);

        for point in &rsi.points[14..] {
            assert_eq!(point.value, Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let rsi = calculate_rsi(&make_series(&prices), 14);
        assert_relative_eq!(rsi.points[14].value.unwrap(), 0.0);
    }

    #[test]
    fn rsi_flat_prices_is_100() {
        let rsi = calculate_rsi(&make_series(&[50.0; 6]), 3);
        assert_eq!(rsi.points[3].value, Some(100.0));
        assert_eq!(rsi.points[5].value, Some(100.0));
    }

    #[test]
    fn rsi_known_calculation() {
        // changes: +2, -1, +3, -2
        let rsi = calculate_rsi(&make_series(&[10.0, 12.0, 11.0, 14.0, 12.0]), 2);

        assert_eq!(rsi.points[0].value, None);
        assert_eq!(rsi.points[1].value, None);
        // window (+2, -1): gain 1.0, loss 0.5 -> RS 2 -> 66.66..
        assert_relative_eq!(rsi.points[2].value.unwrap(), 100.0 - 100.0 / 3.0, epsilon = 1e-9);
        // window (-1, +3): gain 1.5, loss 0.5 -> RS 3 -> 75
        assert_relative_eq!(rsi.points[3].value.unwrap(), 75.0, epsilon = 1e-9);
        // window (+3, -2): gain 1.5, loss 1.0 -> RS 1.5 -> 60
        assert_relative_eq!(rsi.points[4].value.unwrap(), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=60)
            .map(|i| 100.0 + ((i % 7) as f64 - 3.0) * 2.0)
            .collect();
        let rsi = calculate_rsi(&make_series(&prices), 14);

        for point in &rsi.points {
            if let Some(v) = point.value {
                assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
            }
        }
    }

    #[test]
    fn rsi_zero_window() {
        let rsi = calculate_rsi(&make_series(&[1.0, 2.0, 3.0]), 0);
        assert_eq!(rsi.len(), 3);
        assert!(rsi.points.iter().all(|p| p.value.is_none()));
    }
}
