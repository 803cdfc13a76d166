//! Simple Moving Average of adjusted close.
//!
//! SMA(n)[i] = sum(AdjClose[i-n+1..=i]) / n
//!
//! Dates with fewer than n observations are dropped from the output rather
//! than emitted as undefined, so a series of length L yields L - n + 1 points.

use crate::domain::ohlcv::OhlcvSeries;
use crate::domain::series::{SeriesPoint, SingleColumnSeries};

pub fn calculate_sma(series: &OhlcvSeries, window: usize) -> SingleColumnSeries {
    let records = series.records();
    let entity = series.entity().clone();

    if window == 0 || records.len() < window {
        return SingleColumnSeries::new(entity, vec![]);
    }

    let mut points = Vec::with_capacity(records.len() - window + 1);
    let mut sum: f64 = records[..window - 1].iter().map(|r| r.adj_close).sum();

    for i in (window - 1)..records.len() {
        sum += records[i].adj_close;
        points.push(SeriesPoint::defined(records[i].date, sum / window as f64));
        sum -= records[i + 1 - window].adj_close;
    }

    SingleColumnSeries::new(entity, points)
}
