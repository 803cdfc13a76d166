//! Plain-text entity list snapshot: one symbol per line.
//!
//! Blank lines and lines starting with `#` are ignored. Symbols are stored
//! raw; normalization happens when the registry is built.

use crate::domain::error::IndexDataError;
use crate::ports::registry_port::RegistryPort;
use std::fs;
use std::path::PathBuf;

pub struct RegistryFileAdapter {
    path: PathBuf,
}

impl RegistryFileAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RegistryPort for RegistryFileAdapter {
    fn load_symbols(&self) -> Result<Vec<String>, IndexDataError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    fn save_symbols(&self, symbols: &[String]) -> Result<(), IndexDataError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut content = symbols.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_skips_comments_and_blanks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tickers.txt");
        fs::write(&path, "# S&P 500\nMMM\n\n  AOS \nBRK.B\r\n").unwrap();

        let adapter = RegistryFileAdapter::new(path);
        assert_eq!(adapter.load_symbols().unwrap(), vec!["MMM", "AOS", "BRK.B"]);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let adapter = RegistryFileAdapter::new(dir.path().join("nested").join("tickers.txt"));
        let symbols = vec!["MMM".to_string(), "BF.B".to_string()];

        adapter.save_symbols(&symbols).unwrap();
        assert_eq!(adapter.load_symbols().unwrap(), symbols);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let adapter = RegistryFileAdapter::new(dir.path().join("none.txt"));
        assert!(matches!(adapter.load_symbols(), Err(IndexDataError::Io(_))));
    }
}
