//! Identity projections: adjusted close and volume.

use crate::domain::ohlcv::OhlcvSeries;
use crate::domain::series::{SeriesPoint, SingleColumnSeries};

pub fn adj_close(series: &OhlcvSeries) -> SingleColumnSeries {
    let points = series
        .records()
        .iter()
        .map(|r| SeriesPoint::defined(r.date, r.adj_close))
        .collect();
    SingleColumnSeries::new(series.entity().clone(), points)
}

pub fn volume(series: &OhlcvSeries) -> SingleColumnSeries {
    let points = series
        .records()
        .iter()
        .map(|r| SeriesPoint::defined(r.date, r.volume as f64))
        .collect();
    SingleColumnSeries::new(series.entity().clone(), points)
}
