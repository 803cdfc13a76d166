//! Core domain types and logic.

pub mod entity;
pub mod ohlcv;
pub mod series;
pub mod indicator;
pub mod wide_table;
pub mod aggregate;
pub mod trend_join;
pub mod pipeline;
pub mod config;
pub mod error;
