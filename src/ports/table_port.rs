//! Wide table sink and source port.

use crate::domain::error::IndexDataError;
use crate::domain::wide_table::WideTable;
use std::path::PathBuf;

pub trait TablePort {
    /// Write `table` under `name`, returning where it landed.
    fn write_table(&self, table: &WideTable, name: &str) -> Result<PathBuf, IndexDataError>;

    fn read_table(&self, name: &str) -> Result<WideTable, IndexDataError>;
}
