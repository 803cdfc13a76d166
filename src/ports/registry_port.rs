//! Entity registry source port.

use crate::domain::error::IndexDataError;

pub trait RegistryPort {
    /// Raw symbols in listing order, before normalization.
    fn load_symbols(&self) -> Result<Vec<String>, IndexDataError>;

    /// Replace the stored snapshot.
    fn save_symbols(&self, symbols: &[String]) -> Result<(), IndexDataError>;
}
