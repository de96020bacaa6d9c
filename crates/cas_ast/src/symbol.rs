//! Interned names for variables and functions.

use std::collections::HashMap;
use std::fmt;

/// Handle to a name in a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Append-only name store. Ids stay valid for the life of the table.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: Vec<Box<str>>,
    ids: HashMap<Box<str>, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = SymbolId(self.names.len() as u32);
        self.names.push(name.into());
        self.ids.insert(name.into(), id);
        id
    }

    /// # Panics
    /// Panics if `id` came from another table.
    pub fn resolve(&self, id: SymbolId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut table = SymbolTable::new();
        let theta = table.intern("theta");
        let x = table.intern("x");
        assert_eq!(table.intern("theta"), theta);
        assert_ne!(theta, x);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(x), "x");
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let mut table = SymbolTable::new();
        assert_eq!(table.lookup("r"), None);
        assert!(table.is_empty());
        let r = table.intern("r");
        assert_eq!(table.lookup("r"), Some(r));
    }
}
