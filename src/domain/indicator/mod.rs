//! Indicator calculators.
//!
//! Each calculator turns one entity's [`OhlcvSeries`] into a
//! [`SingleColumnSeries`] over the same dates:
//! - `AdjClose` / `Volume`: identity projection of one column
//! - `Sma(n)`: trailing mean of adjusted close, leading dates dropped
//! - `Rsi(n)`: trailing-mean RSI, leading dates kept as undefined

pub mod projection;
pub mod rsi;
pub mod sma;

use crate::domain::ohlcv::OhlcvSeries;
use crate::domain::series::SingleColumnSeries;
use std::fmt;

pub const DEFAULT_SMA_WINDOW: usize = 100;
pub const DEFAULT_RSI_WINDOW: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    AdjClose,
    Volume,
    Sma(usize),
    Rsi(usize),
}

impl IndicatorType {
    pub fn calculate(&self, series: &OhlcvSeries) -> SingleColumnSeries {
        match *self {
            IndicatorType::AdjClose => projection::adj_close(series),
            IndicatorType::Volume => projection::volume(series),
            IndicatorType::Sma(window) => sma::calculate_sma(series, window),
            IndicatorType::Rsi(window) => rsi::calculate_rsi(series, window),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::AdjClose => write!(f, "ADJ_CLOSE"),
            IndicatorType::Volume => write!(f, "VOLUME"),
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Rsi(window) => write!(f, "RSI({})", window),
        }
    }
}
