//! Per-document symbol tables.
//!
//! A [`SymbolTable`] lists every named declaration of one document with
//! its qualified name, and binds each declaration under every dot-suffix
//! of that name. For package `a.b.c` and a message `T` the bindings are
//! `T`, `c.T`, `b.c.T` and `a.b.c.T`; a nested `T.Inner` additionally
//! gets `Inner`. Tables are immutable once built and shared behind an
//! `Arc` by the database.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{FileId, TextRange};
use crate::syntax::ast::{DeclId, DeclKind, Document};

/// Index into [`SymbolTable::symbols`].
type SymbolIdx = usize;

// ============================================================================
// SYMBOLS
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Message,
    Enum,
    /// A proto2 group, usable both as a type and as a field.
    Group,
    Field,
    /// A field declared inside an `extend` block.
    Extension,
    OneOf,
    EnumValue,
}

impl SymbolKind {
    /// Kinds that may appear as a field type.
    pub fn is_complex_type(self) -> bool {
        matches!(self, SymbolKind::Message | SymbolKind::Enum | SymbolKind::Group)
    }

    /// Kinds that carry a tag number.
    pub fn is_field(self) -> bool {
        matches!(self, SymbolKind::Field | SymbolKind::Group | SymbolKind::Extension)
    }

    pub fn display(self) -> &'static str {
        match self {
            SymbolKind::Message => "message",
            SymbolKind::Enum => "enum",
            SymbolKind::Group => "group",
            SymbolKind::Field => "field",
            SymbolKind::Extension => "extension",
            SymbolKind::OneOf => "oneof",
            SymbolKind::EnumValue => "enum value",
        }
    }
}

/// One named declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    /// Package segments, enclosing type names and own name joined by `.`.
    pub qualified_name: SmolStr,
    pub kind: SymbolKind,
    pub decl: DeclId,
    pub name_range: TextRange,
}

/// A spelling under which a symbol can be referenced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub spelling: SmolStr,
    symbol: SymbolIdx,
}

// ============================================================================
// SYMBOL TABLE
// ============================================================================

/// Flat, read-only index over one document's named declarations.
///
/// Symbols are stored once in `symbols`, in source pre-order; every other
/// map refers to them by index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    file: FileId,
    package: Vec<SmolStr>,
    symbols: Vec<Symbol>,
    /// All bindings in symbol order, shortest spelling first per symbol.
    bindings: Vec<Binding>,
    by_spelling: FxHashMap<SmolStr, Vec<SymbolIdx>>,
    by_decl: FxHashMap<DeclId, SymbolIdx>,
}

impl SymbolTable {
    /// Build the table for `document`.
    ///
    /// Declarations without a name are left out, together with everything
    /// nested in them, since no qualified name can be formed for those.
    pub fn build(file: FileId, document: &Document) -> Self {
        let mut table = SymbolTable {
            file,
            package: document.package().to_vec(),
            ..Default::default()
        };
        let mut path = table.package.clone();
        for decl in document.top_level() {
            table.collect(document, decl, &mut path, false);
        }
        tracing::trace!(
            file = %file,
            symbols = table.symbols.len(),
            bindings = table.bindings.len(),
            "built symbol table"
        );
        table
    }

    fn collect(&mut self, document: &Document, id: DeclId, path: &mut Vec<SmolStr>, in_extend: bool) {
        let decl = document.decl(id);
        let kind = match &decl.kind {
            DeclKind::Message => Some(SymbolKind::Message),
            DeclKind::Enum => Some(SymbolKind::Enum),
            DeclKind::Group(_) => Some(SymbolKind::Group),
            DeclKind::Field(_) if in_extend => Some(SymbolKind::Extension),
            DeclKind::Field(_) => Some(SymbolKind::Field),
            DeclKind::OneOf => Some(SymbolKind::OneOf),
            DeclKind::EnumValue(_) => Some(SymbolKind::EnumValue),
            DeclKind::Extend(_) => {
                for &child in &decl.children {
                    self.collect(document, child, path, true);
                }
                return;
            }
            DeclKind::Option(_) => None,
        };
        let Some(kind) = kind else {
            return;
        };
        let Some(name) = decl.name.clone() else {
            return;
        };

        path.push(name.clone());
        self.insert(Symbol {
            name,
            qualified_name: SmolStr::new(path.join(".")),
            kind,
            decl: id,
            name_range: decl.name_range,
        }, path);

        if decl.kind.opens_scope() {
            for &child in &decl.children {
                self.collect(document, child, path, false);
            }
        } else if matches!(decl.kind, DeclKind::OneOf) {
            // one-of members are qualified as direct members of the message
            path.pop();
            for &child in &decl.children {
                self.collect(document, child, path, in_extend);
            }
            return;
        }
        path.pop();
    }

    fn insert(&mut self, symbol: Symbol, path: &[SmolStr]) {
        let idx = self.symbols.len();
        self.by_decl.insert(symbol.decl, idx);
        for start in (0..path.len()).rev() {
            let spelling = SmolStr::new(path[start..].join("."));
            self.by_spelling.entry(spelling.clone()).or_default().push(idx);
            self.bindings.push(Binding { spelling, symbol: idx });
        }
        self.symbols.push(symbol);
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// The package segments the table was built under.
    pub fn package(&self) -> &[SmolStr] {
        &self.package
    }

    /// All symbols in source order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// All `(spelling, symbol)` bindings in source order.
    pub fn bindings(&self) -> impl Iterator<Item = (&SmolStr, &Symbol)> + '_ {
        self.bindings
            .iter()
            .map(move |b| (&b.spelling, &self.symbols[b.symbol]))
    }

    /// Symbols bound under exactly `spelling`, in source order.
    pub fn lookup(&self, spelling: &str) -> Vec<&Symbol> {
        self.by_spelling
            .get(spelling)
            .map(|indices| indices.iter().map(|&idx| &self.symbols[idx]).collect())
            .unwrap_or_default()
    }

    /// The symbol whose qualified name is exactly `qualified_name`.
    pub fn lookup_qualified(&self, qualified_name: &str) -> Option<&Symbol> {
        self.lookup(qualified_name)
            .into_iter()
            .find(|s| s.qualified_name == qualified_name)
    }

    pub fn symbol_for_decl(&self, decl: DeclId) -> Option<&Symbol> {
        self.by_decl.get(&decl).map(|&idx| &self.symbols[idx])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
