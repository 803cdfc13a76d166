//! Domain error types.

use crate::domain::entity::RegistryError;

/// Top-level error type for indexdata.
#[derive(Debug, thiserror::Error)]
pub enum IndexDataError {
    #[error("no price data for {entity}")]
    NotFound { entity: String },

    #[error("corrupt data for {entity}: {reason}")]
    DataCorruption { entity: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("no entity produced data ({skipped} skipped)")]
    NoEntities { skipped: usize },

    #[error("table {name}: {reason}")]
    Table { name: String, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IndexDataError {
    /// Errors that only disqualify a single entity rather than the whole run.
    pub fn is_entity_scoped(&self) -> bool {
        matches!(
            self,
            IndexDataError::NotFound { .. } | IndexDataError::DataCorruption { .. }
        )
    }
}

impl From<&IndexDataError> for std::process::ExitCode {
    fn from(err: &IndexDataError) -> Self {
        let code: u8 = match err {
            IndexDataError::Io(_) | IndexDataError::Csv(_) | IndexDataError::Table { .. } => 1,
            IndexDataError::ConfigParse { .. }
            | IndexDataError::ConfigMissing { .. }
            | IndexDataError::ConfigInvalid { .. } => 2,
            IndexDataError::Registry(_) => 3,
            IndexDataError::NotFound { .. } | IndexDataError::DataCorruption { .. } => 4,
            IndexDataError::NoEntities { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
