//! Pipeline configuration, validated before any data is touched.
//!
//! ```ini
//! [paths]
//! tickers_file = sp500tickers.txt
//! price_dir = stock_dfs
//! trend_dir = google_trends
//! output_dir = .
//!
//! [indicators]
//! sma_window = 100
//! rsi_window = 14
//!
//! [registry]
//! substitute_from = .
//! substitute_to = -
//!
//! [trends]
//! include_price_dates = false
//!
//! [output]
//! closes = joined_closes
//! ```

use crate::domain::entity::SymbolRule;
use crate::domain::error::IndexDataError;
use crate::domain::indicator::{DEFAULT_RSI_WINDOW, DEFAULT_SMA_WINDOW, IndicatorType};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct OutputNames {
    pub closes: String,
    pub volumes: String,
    pub smas: String,
    pub rsis: String,
    pub trends: String,
}

impl OutputNames {
    pub fn for_indicator(&self, indicator: IndicatorType) -> &str {
        match indicator {
            IndicatorType::AdjClose => &self.closes,
            IndicatorType::Volume => &self.volumes,
            IndicatorType::Sma(_) => &self.smas,
            IndicatorType::Rsi(_) => &self.rsis,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub tickers_file: PathBuf,
    pub price_dir: PathBuf,
    pub trend_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sma_window: usize,
    pub rsi_window: usize,
    pub symbol_rule: SymbolRule,
    pub include_price_dates: bool,
    pub outputs: OutputNames,
}

impl PipelineConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, IndexDataError> {
        let path = |key: &str, default: &str| {
            PathBuf::from(
                config
                    .get_string("paths", key)
                    .unwrap_or_else(|| default.to_string()),
            )
        };
        let output = |key: &str, default: &str| -> Result<String, IndexDataError> {
            let name = config
                .get_string("output", key)
                .unwrap_or_else(|| default.to_string());
            validate_output_name(key, &name)?;
            Ok(name)
        };

        Ok(Self {
            tickers_file: path("tickers_file", "sp500tickers.txt"),
            price_dir: path("price_dir", "stock_dfs"),
            trend_dir: path("trend_dir", "google_trends"),
            output_dir: path("output_dir", "."),
            sma_window: window(config, "sma_window", DEFAULT_SMA_WINDOW)?,
            rsi_window: window(config, "rsi_window", DEFAULT_RSI_WINDOW)?,
            symbol_rule: symbol_rule(config)?,
            include_price_dates: config.get_bool("trends", "include_price_dates", false),
            outputs: OutputNames {
                closes: output("closes", "joined_closes")?,
                volumes: output("volumes", "joined_volumes")?,
                smas: output("smas", "joined_smas")?,
                rsis: output("rsis", "joined_rsis")?,
                trends: output("trends", "joined_trends")?,
            },
        })
    }

    pub fn sma(&self) -> IndicatorType {
        IndicatorType::Sma(self.sma_window)
    }

    pub fn rsi(&self) -> IndicatorType {
        IndicatorType::Rsi(self.rsi_window)
    }

    /// Every indicator family, in output order.
    pub fn all_indicators(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::AdjClose,
            IndicatorType::Volume,
            self.sma(),
            self.rsi(),
        ]
    }
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, IndexDataError> {
    let invalid = |reason: String| IndexDataError::ConfigInvalid {
        section: "indicators".to_string(),
        key: key.to_string(),
        reason,
    };
    let value = config
        .get_int("indicators", key)
        .map_err(|e| invalid(format!("{} is not an integer: {}", key, e)))?
        .unwrap_or(default as i64);
    if value <= 0 {
        return Err(invalid(format!("{} must be positive", key)));
    }
    Ok(value as usize)
}

fn symbol_rule(config: &dyn ConfigPort) -> Result<SymbolRule, IndexDataError> {
    let from = config
        .get_string("registry", "substitute_from")
        .unwrap_or_else(|| ".".to_string());
    let to = config
        .get_string("registry", "substitute_to")
        .unwrap_or_else(|| "-".to_string());

    let mut chars = from.chars();
    let (Some(from_char), None) = (chars.next(), chars.next()) else {
        return Err(IndexDataError::ConfigInvalid {
            section: "registry".to_string(),
            key: "substitute_from".to_string(),
            reason: "must be exactly one character".to_string(),
        });
    };

    SymbolRule::new(from_char, &to).map_err(|e| IndexDataError::ConfigInvalid {
        section: "registry".to_string(),
        key: "substitute_to".to_string(),
        reason: e.to_string(),
    })
}

fn validate_output_name(key: &str, name: &str) -> Result<(), IndexDataError> {
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        return Err(IndexDataError::ConfigInvalid {
            section: "output".to_string(),
            key: key.to_string(),
            reason: "must be a non-empty file name without path separators".to_string(),
        });
    }
    Ok(())
}
