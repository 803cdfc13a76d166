//! Entity identifiers and the ordered entity registry.
//!
//! Ticker symbols arrive in whatever shape the listing source used ("BRK.B",
//! "BF.B\n"). Every symbol is passed through a [`SymbolRule`] before it is used
//! as a lookup key or a filename component, so "BRK.B" and "BRK-B" name the
//! same entity everywhere in a run.

use std::collections::HashMap;
use std::fmt;

/// A normalized ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Normalize `raw` with the default rule ("." becomes "-").
    pub fn new(raw: &str) -> Self {
        SymbolRule::default().normalize(raw)
    }

    /// Wrap an id that is already normalized, such as a column key read back
    /// from a written table. Only surrounding whitespace is removed.
    pub(crate) fn from_normalized(id: &str) -> Self {
        EntityId(id.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Single-character substitution applied to every raw symbol.
///
/// The replacement may not contain the substituted character, which keeps
/// `normalize` idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRule {
    from: char,
    to: String,
}

impl SymbolRule {
    pub fn new(from: char, to: &str) -> Result<Self, RegistryError> {
        if to.contains(from) {
            return Err(RegistryError::InvalidRule {
                from,
                to: to.to_string(),
            });
        }
        Ok(Self {
            from,
            to: to.to_string(),
        })
    }

    pub fn normalize(&self, raw: &str) -> EntityId {
        let replaced = raw.trim().replace(self.from, &self.to);
        EntityId(replaced.trim().to_string())
    }
}

impl Default for SymbolRule {
    fn default() -> Self {
        Self {
            from: '.',
            to: "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("empty symbol in entity list")]
    EmptySymbol,

    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("entity registry is empty")]
    Empty,

    #[error("substitution '{from}' -> '{to}' is not idempotent")]
    InvalidRule { from: char, to: String },
}

/// Ordered, duplicate-free set of entities fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRegistry {
    entities: Vec<EntityId>,
    positions: HashMap<EntityId, usize>,
}

impl EntityRegistry {
    pub fn from_symbols<I, S>(symbols: I, rule: &SymbolRule) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entities = Vec::new();
        let mut positions = HashMap::new();

        for raw in symbols {
            let id = rule.normalize(raw.as_ref());
            if id.as_str().is_empty() {
                return Err(RegistryError::EmptySymbol);
            }
            if positions.contains_key(&id) {
                return Err(RegistryError::DuplicateEntity(id.0));
            }
            positions.insert(id.clone(), entities.len());
            entities.push(id);
        }

        let registry = Self {
            entities,
            positions,
        };
        if registry.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.iter()
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Registry position of `id`; this is the column order of every table.
    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.positions.get(id).copied()
    }
}

/// Parse a comma-separated symbol list, e.g. from a `--tickers` override.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, RegistryError> {
    let mut symbols = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::EmptySymbol);
        }
        symbols.push(trimmed.to_uppercase());
    }
    Ok(symbols)
}
