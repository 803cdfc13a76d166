//! Concrete adapter implementations for ports.

pub mod csv_fields;
pub mod csv_price_adapter;
pub mod csv_table_adapter;
pub mod csv_trend_adapter;
pub mod file_config_adapter;
pub mod registry_file_adapter;
