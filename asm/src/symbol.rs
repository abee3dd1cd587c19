use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolKind {
    /// Bound to a location counter value.
    Label,
    /// Bound to a constant by `EQU`.
    Equ,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub address: Option<i64>,
}

/// Symbol table. Entries are addressed by their 1-based insertion index,
/// which intermediate records capture in pass 1. Entries are never removed,
/// so an index stays valid for the whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable(IndexMap<String, Symbol>);

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable(IndexMap::new())
    }

    /// Register a use of `name`, creating an unresolved entry on first sight.
    pub fn reference(&mut self, name: &str) -> usize {
        match self.0.get_index_of(name) {
            Some(idx) => idx + 1,
            None => {
                let (idx, _) = self.0.insert_full(
                    name.to_string(),
                    Symbol {
                        kind: SymbolKind::Label,
                        address: None,
                    },
                );
                idx + 1
            }
        }
    }

    /// Bind `name` in place and return its index together with the value it
    /// held before, if it was already defined.
    pub fn define(&mut self, name: &str, kind: SymbolKind, value: i64) -> (usize, Option<i64>) {
        let idx = self.reference(name);
        let entry = &mut self.0[idx - 1];
        let prev = entry.address.replace(value);
        entry.kind = kind;
        (idx, prev)
    }

    pub fn get(&self, index: usize) -> Option<(&str, &Symbol)> {
        self.0
            .get_index(index.checked_sub(1)?)
            .map(|(name, sym)| (name.as_str(), sym))
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(|sym| sym.address)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &Symbol)> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, (name, sym))| (idx + 1, name.as_str(), sym))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, sym)| sym.address.is_none())
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_reference_keeps_index() {
        let mut symbols = SymbolTable::new();
        symbols.define("A", SymbolKind::Label, 100);
        let b = symbols.reference("B");
        assert_eq!(b, 2);
        assert_eq!(symbols.value_of("B"), None);

        symbols.reference("C");
        let (idx, prev) = symbols.define("B", SymbolKind::Label, 108);
        assert_eq!((idx, prev), (2, None));
        assert_eq!(
            symbols.get(b).map(|(name, sym)| (name, sym.address)),
            Some(("B", Some(108)))
        );
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn redefinition_reports_previous() {
        let mut symbols = SymbolTable::new();
        symbols.define("X", SymbolKind::Label, 1);
        let (_, prev) = symbols.define("X", SymbolKind::Equ, 5);
        assert_eq!(prev, Some(1));
        assert_eq!(symbols.value_of("X"), Some(5));
        assert_eq!(symbols.get(1).map(|(_, sym)| sym.kind), Some(SymbolKind::Equ));
    }

    #[test]
    fn index_zero_is_out_of_range() {
        let mut symbols = SymbolTable::new();
        symbols.reference("A");
        assert!(symbols.get(0).is_none());
        assert!(symbols.get(2).is_none());
        assert_eq!(symbols.unresolved().collect::<Vec<_>>(), vec!["A"]);
    }
}
