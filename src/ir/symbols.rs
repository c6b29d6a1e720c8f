//! Symbol table.

use std::collections::HashMap;
use std::ops::Index;

use cranelift_entity::{entity_impl, PrimaryMap};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolIdx(u32);
entity_impl!(SymbolIdx, "sym");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolDetails {
    Object,
    Procedure,
    Component,
    DerivedType,
    TypeParam,
    /// Use-association of a symbol declared in another scope.
    Use(SymbolIdx),
}

#[derive(Debug)]
pub struct Symbol {
    pub name: String,
    pub details: SymbolDetails,
}

/// Symbols of a compilation, together with the renamings applied when
/// emitting module files.
#[derive(Default)]
pub struct SymbolTable {
    symbols: PrimaryMap<SymbolIdx, Symbol>,
    by_name: HashMap<String, SymbolIdx>,
    renamings: HashMap<SymbolIdx, String>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Declares a symbol. Names are case-insensitive; a later declaration
    /// of the same name shadows the earlier one for lookups.
    pub fn declare<S: Into<String>>(
        &mut self,
        name: S,
        details: SymbolDetails,
    ) -> SymbolIdx {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        let idx = self.symbols.push(Symbol { name, details });

        self.by_name.insert(key, idx);
        idx
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolIdx> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    /// Follows use-associations back to the original declaration.
    pub fn ultimate(&self, mut idx: SymbolIdx) -> SymbolIdx {
        while let SymbolDetails::Use(target) = self.symbols[idx].details {
            idx = target;
        }

        idx
    }

    /// Records the name under which `idx` must be emitted. The rename is
    /// keyed by the ultimate symbol, so every use-association of it is
    /// affected too.
    pub fn rename<S: Into<String>>(&mut self, idx: SymbolIdx, name: S) {
        let ultimate = self.ultimate(idx);

        self.renamings.insert(ultimate, name.into());
    }

    pub fn renaming(&self, idx: SymbolIdx) -> Option<&str> {
        self.renamings
            .get(&self.ultimate(idx))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Index<SymbolIdx> for SymbolTable {
    type Output = Symbol;

    fn index(&self, index: SymbolIdx) -> &Symbol {
        &self.symbols[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renaming_follows_use_association() {
        let mut table = SymbolTable::new();

        let x = table.declare("x", SymbolDetails::Object);
        let local = table.declare("y", SymbolDetails::Use(x));
        let z = table.declare("z", SymbolDetails::Object);

        table.rename(local, "x$1");

        assert_eq!(table.ultimate(local), x);
        assert_eq!(table.renaming(x), Some("x$1"));
        assert_eq!(table.renaming(local), Some("x$1"));
        assert_eq!(table.renaming(z), None);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut table = SymbolTable::new();

        let idx = table.declare("Alpha", SymbolDetails::Object);

        assert_eq!(table.lookup("ALPHA"), Some(idx));
        assert_eq!(table[idx].name, "Alpha");
        assert_eq!(table.lookup("beta"), None);
    }
}
