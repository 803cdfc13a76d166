//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::csv_table_adapter::CsvTableAdapter;
use crate::adapters::csv_trend_adapter::CsvTrendAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::registry_file_adapter::RegistryFileAdapter;
use crate::domain::config::PipelineConfig;
use crate::domain::entity::{EntityRegistry, parse_symbols};
use crate::domain::error::IndexDataError;
use crate::domain::indicator::IndicatorType;
use crate::domain::pipeline::{DerivedTables, SkipReason, SkippedEntity, derive_tables};
use crate::domain::trend_join::{TrendJoin, join_trends};
use crate::domain::wide_table::WideTable;
use crate::ports::price_port::PriceSeriesPort;
use crate::ports::registry_port::RegistryPort;
use crate::ports::table_port::TablePort;
use crate::ports::trend_port::TrendPort;

#[derive(Parser, Debug)]
#[command(name = "indexdata", about = "Date-aligned indicator tables for index constituents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Join adjusted closes and volumes
    Compile {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated symbols, instead of the tickers file
        #[arg(long)]
        tickers: Option<String>,
    },
    /// Join simple moving averages of adjusted close
    Sma {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        tickers: Option<String>,
        #[arg(long)]
        window: Option<usize>,
    },
    /// Join relative strength indices of adjusted close
    Rsi {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        tickers: Option<String>,
        #[arg(long)]
        window: Option<usize>,
    },
    /// Join search-interest trends against the written closes table
    JoinTrends {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        tickers: Option<String>,
    },
    /// Derive every table, then join trends
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        tickers: Option<String>,
    },
    /// List the registry, optionally replacing the saved snapshot
    Tickers {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated symbols to save as the new snapshot
        #[arg(long)]
        set: Option<String>,
        /// Report stored price history for each entity
        #[arg(long)]
        check: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Compile { config, tickers } => run_families(
            config.as_deref(),
            tickers.as_deref(),
            |_| vec![IndicatorType::AdjClose, IndicatorType::Volume],
        ),
        Command::Sma {
            config,
            tickers,
            window,
        } => run_families(config.as_deref(), tickers.as_deref(), |cfg| {
            vec![IndicatorType::Sma(window.unwrap_or(cfg.sma_window))]
        }),
        Command::Rsi {
            config,
            tickers,
            window,
        } => run_families(config.as_deref(), tickers.as_deref(), |cfg| {
            vec![IndicatorType::Rsi(window.unwrap_or(cfg.rsi_window))]
        }),
        Command::JoinTrends { config, tickers } => {
            run_join_trends(config.as_deref(), tickers.as_deref())
        }
        Command::Run { config, tickers } => run_all(config.as_deref(), tickers.as_deref()),
        Command::Tickers { config, set, check } => {
            run_tickers(config.as_deref(), set.as_deref(), check)
        }
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load and validate configuration. Without a path, every key takes its
/// default.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, IndexDataError> {
    let adapter = match path {
        Some(path) => {
            FileConfigAdapter::from_file(path).map_err(|e| IndexDataError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        None => FileConfigAdapter::from_string("").map_err(|reason| {
            IndexDataError::ConfigParse {
                file: "<defaults>".to_string(),
                reason,
            }
        })?,
    };
    PipelineConfig::from_config(&adapter)
}

/// Build the registry from `--tickers` when given, else from the snapshot.
pub fn load_registry(
    config: &PipelineConfig,
    source: &dyn RegistryPort,
    tickers_override: Option<&str>,
) -> Result<EntityRegistry, IndexDataError> {
    let symbols = match tickers_override {
        Some(list) => parse_symbols(list)?,
        None => source.load_symbols()?,
    };
    Ok(EntityRegistry::from_symbols(symbols, &config.symbol_rule)?)
}

/// Derive `indicators` for every entity and write one table per indicator.
pub fn derive_and_write(
    config: &PipelineConfig,
    registry: &EntityRegistry,
    indicators: &[IndicatorType],
    prices: &dyn PriceSeriesPort,
    tables: &dyn TablePort,
) -> Result<DerivedTables, IndexDataError> {
    eprintln!(
        "Deriving {} for {} entities",
        indicators
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        registry.len()
    );

    let derived = derive_tables(registry, prices, indicators)?;
    report_skipped("no price data", &derived.skipped);

    for (indicator, table) in &derived.tables {
        let path = tables.write_table(table, config.outputs.for_indicator(*indicator))?;
        eprintln!(
            "  {}: {} dates x {} entities -> {}",
            indicator,
            table.row_count(),
            table.column_count(),
            path.display()
        );
    }

    Ok(derived)
}

/// Join trends against `base` and write the result.
pub fn join_and_write(
    config: &PipelineConfig,
    registry: &EntityRegistry,
    base: &WideTable,
    trends: &dyn TrendPort,
    tables: &dyn TablePort,
) -> Result<TrendJoin, IndexDataError> {
    let joined = join_trends(base, registry, trends, config.include_price_dates)?;
    report_skipped("no trend data", &joined.skipped);

    let path = tables.write_table(&joined.table, &config.outputs.trends)?;
    eprintln!(
        "  trends: {} dates x {} entities -> {}",
        joined.table.row_count(),
        joined.table.column_count(),
        path.display()
    );
    Ok(joined)
}

fn report_skipped(what: &str, skipped: &[SkippedEntity]) {
    if skipped.is_empty() {
        return;
    }
    let (missing, corrupt): (Vec<_>, Vec<_>) = skipped
        .iter()
        .partition(|s| s.reason == SkipReason::NotFound);
    if !missing.is_empty() {
        eprintln!(
            "Skipped {} entities with {}: {}",
            missing.len(),
            what,
            missing
                .iter()
                .map(|s| s.entity.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    for s in corrupt {
        if let SkipReason::Corrupt { reason } = &s.reason {
            eprintln!("Skipped {} (unreadable: {})", s.entity, reason);
        }
    }
}

struct Workspace {
    config: PipelineConfig,
    registry: EntityRegistry,
    tables: CsvTableAdapter,
}

fn open_workspace(
    config_path: Option<&Path>,
    tickers_override: Option<&str>,
) -> Result<Workspace, IndexDataError> {
    let config = load_config(config_path)?;
    let source = RegistryFileAdapter::new(config.tickers_file.clone());
    let registry = load_registry(&config, &source, tickers_override)?;
    let tables = CsvTableAdapter::new(config.output_dir.clone());
    Ok(Workspace {
        config,
        registry,
        tables,
    })
}

fn run_families(
    config_path: Option<&Path>,
    tickers_override: Option<&str>,
    indicators: impl FnOnce(&PipelineConfig) -> Vec<IndicatorType>,
) -> Result<(), IndexDataError> {
    let ws = open_workspace(config_path, tickers_override)?;
    let indicators = indicators(&ws.config);
    for indicator in &indicators {
        if let IndicatorType::Sma(0) | IndicatorType::Rsi(0) = indicator {
            return Err(IndexDataError::ConfigInvalid {
                section: "indicators".to_string(),
                key: "window".to_string(),
                reason: "window must be positive".to_string(),
            });
        }
    }

    let prices = CsvPriceAdapter::new(ws.config.price_dir.clone());
    derive_and_write(&ws.config, &ws.registry, &indicators, &prices, &ws.tables)?;
    Ok(())
}

fn run_join_trends(
    config_path: Option<&Path>,
    tickers_override: Option<&str>,
) -> Result<(), IndexDataError> {
    let ws = open_workspace(config_path, tickers_override)?;
    eprintln!(
        "Joining trends against {}",
        ws.tables.table_path(&ws.config.outputs.closes).display()
    );
    let base = ws.tables.read_table(&ws.config.outputs.closes)?;
    let trends = CsvTrendAdapter::new(ws.config.trend_dir.clone());
    join_and_write(&ws.config, &ws.registry, &base, &trends, &ws.tables)?;
    Ok(())
}

fn run_all(config_path: Option<&Path>, tickers_override: Option<&str>) -> Result<(), IndexDataError> {
    let ws = open_workspace(config_path, tickers_override)?;
    let prices = CsvPriceAdapter::new(ws.config.price_dir.clone());
    let trends = CsvTrendAdapter::new(ws.config.trend_dir.clone());

    let indicators = ws.config.all_indicators();
    let derived = derive_and_write(&ws.config, &ws.registry, &indicators, &prices, &ws.tables)?;

    let empty = WideTable::default();
    let base = derived.table(IndicatorType::AdjClose).unwrap_or(&empty);
    join_and_write(&ws.config, &ws.registry, base, &trends, &ws.tables)?;
    Ok(())
}

fn run_tickers(
    config_path: Option<&Path>,
    set: Option<&str>,
    check: bool,
) -> Result<(), IndexDataError> {
    let config = load_config(config_path)?;
    let source = RegistryFileAdapter::new(config.tickers_file.clone());

    if let Some(list) = set {
        let symbols = parse_symbols(list)?;
        EntityRegistry::from_symbols(&symbols, &config.symbol_rule)?;
        source.save_symbols(&symbols)?;
        eprintln!(
            "Saved {} tickers to {}",
            symbols.len(),
            config.tickers_file.display()
        );
    }

    let registry = load_registry(&config, &source, None)?;
    let prices = CsvPriceAdapter::new(config.price_dir.clone());

    for entity in registry.iter() {
        if !check {
            println!("{}", entity);
            continue;
        }
        match prices.load_series(entity) {
            Ok(series) => match series.date_range() {
                Some((first, last)) => {
                    println!("{}: {} records, {} to {}", entity, series.len(), first, last)
                }
                None => println!("{}: 0 records", entity),
            },
            Err(IndexDataError::NotFound { .. }) => println!("{}: no data", entity),
            Err(e) => println!("{}: {}", entity, e),
        }
    }
    eprintln!("{} tickers", registry.len());
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), IndexDataError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(Some(config_path))?;

    eprintln!("\nPaths:");
    eprintln!("  tickers_file: {}", config.tickers_file.display());
    eprintln!("  price_dir:    {}", config.price_dir.display());
    eprintln!("  trend_dir:    {}", config.trend_dir.display());
    eprintln!("  output_dir:   {}", config.output_dir.display());

    eprintln!("\nIndicators:");
    for indicator in config.all_indicators() {
        eprintln!(
            "  {} -> {}.csv",
            indicator,
            config.outputs.for_indicator(indicator)
        );
    }
    eprintln!("  TRENDS -> {}.csv", config.outputs.trends);

    eprintln!("\nConfiguration is valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_sma_window() {
        let cli = Cli::try_parse_from(["indexdata", "sma", "--window", "50"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Sma {
                window: Some(50),
                ..
            }
        ));
    }

    #[test]
    fn cli_parses_tickers_override() {
        let cli = Cli::try_parse_from(["indexdata", "compile", "--tickers", "AAPL,MSFT"]).unwrap();
        match cli.command {
            Command::Compile { tickers, .. } => assert_eq!(tickers.as_deref(), Some("AAPL,MSFT")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn validate_requires_config() {
        assert!(Cli::try_parse_from(["indexdata", "validate"]).is_err());
    }
}
