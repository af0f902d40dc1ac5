// bimap keeps the one-to-one mapping between a variable name and its position,
// so lookups can go both ways
use bimap::BiMap;

use crate::lexer::{self, VariablePattern};

/// Ordered, duplicate-free set of the variable names found in one compilation pass.
///
/// Positions are assigned in first-seen order and never change afterwards, because
/// every coefficient vector built against the registry is keyed by position.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    pattern: VariablePattern,
    positions: BiMap<String, usize>,
}

impl VariableRegistry {
    pub fn new(pattern: VariablePattern) -> Self {
        Self {
            pattern,
            positions: BiMap::new(),
        }
    }

    /// Builds a registry from every variable mentioned in `texts`, in order.
    pub fn discover<I, S>(pattern: VariablePattern, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new(pattern);
        for text in texts {
            registry.extend(text.as_ref());
        }
        registry
    }

    /// Builds a registry from names that are already known, keeping their order.
    pub fn from_names<I, S>(pattern: VariablePattern, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new(pattern);
        for name in names {
            registry.register(name.into());
        }
        registry
    }

    /// Appends the variables of `text` that are not known yet and returns how many
    /// were new.
    pub fn extend(&mut self, text: &str) -> usize {
        let pattern = self.pattern;
        lexer::variables(text, pattern)
            .filter(|name| !self.register(name.to_string()).1)
            .count()
    }

    // Returns the position of the name and whether it was previously known.
    fn register(&mut self, name: String) -> (usize, bool) {
        if let Some(&position) = self.positions.get_by_left(&name) {
            return (position, true);
        }
        let position = self.positions.len();
        self.positions.insert(name, position);
        (position, false)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get_by_left(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.positions.get_by_right(&index).map(String::as_str)
    }

    /// All names in position order.
    pub fn names(&self) -> Vec<&str> {
        (0..self.len()).filter_map(|index| self.name(index)).collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn pattern(&self) -> VariablePattern {
        self.pattern
    }
}

impl PartialEq for VariableRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.names() == other.names()
    }
}
