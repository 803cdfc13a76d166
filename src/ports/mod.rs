//! Port traits: the boundaries between the pipeline and its data sources.

pub mod config_port;
pub mod price_port;
pub mod registry_port;
pub mod table_port;
pub mod trend_port;
