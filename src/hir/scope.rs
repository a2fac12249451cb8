//! Scope provider: what a name may refer to at one reference site.
//!
//! Resolution is pure lookup over already-built symbol tables:
//!
//! 1. **Searchable documents** - the referring document plus its visible
//!    imports ([`resolve_imports`]), each with a distance.
//! 2. **Filtering** - each table's bindings are filtered to the kind the
//!    reference expects.
//! 3. **Union** - bindings are merged by spelling; the lowest distance
//!    wins and, at equal distance, the first in source order.
//!
//! Recursive and mutually recursive message types need no special care:
//! nothing here follows type references except the single hop an option
//! path or enum literal takes to find its container.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;

use super::db::DocumentSource;
use super::ids::DeclRef;
use super::imports::resolve_imports;
use super::symbols::{Symbol, SymbolKind, SymbolTable};
use crate::base::{FileId, TextRange};
use crate::syntax::ast::{DeclId, DeclKind, Document, NameRef, OptionName, TypeRef, Value};

// ============================================================================
// REFERENCES
// ============================================================================

/// What a reference is allowed to name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A field type or `extend` target: messages, enums and groups.
    ComplexType,
    /// The parenthesized key of a custom option: extension fields.
    Extension,
    /// A field after a custom option key, looked up in the container type
    /// of `owner` (a group's own body, or the message a field's type names).
    OptionField { owner: DeclRef },
    /// An enum literal used as the default of `field`.
    EnumLiteral { field: DeclRef },
}

/// A resolution request at one site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub file: FileId,
    /// The declaration the name is written in.
    pub site: DeclId,
    pub kind: ReferenceKind,
    pub spelling: SmolStr,
    pub range: TextRange,
}

impl Reference {
    pub fn new(file: FileId, site: DeclId, kind: ReferenceKind, name: &NameRef) -> Self {
        Self {
            file,
            site,
            kind,
            spelling: name.spelling.clone(),
            range: name.range,
        }
    }
}

// ============================================================================
// SCOPE
// ============================================================================

/// A declaration a spelling may resolve to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub target: DeclRef,
    pub kind: SymbolKind,
    pub qualified_name: SmolStr,
    pub name_range: TextRange,
    pub distance: u32,
}

/// Ordered, deduplicated spelling → declaration bindings for one reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    bindings: IndexMap<SmolStr, Candidate>,
    /// Bindings under complete qualified names only, for `.a.b.T`.
    qualified: IndexMap<SmolStr, Candidate>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding unless the spelling is already bound.
    ///
    /// Callers feed candidates in ascending distance and source order, so
    /// first-come is both nearest-wins and first-declared-wins.
    pub fn add(&mut self, spelling: SmolStr, candidate: Candidate) {
        if spelling == candidate.qualified_name {
            if let Entry::Vacant(entry) = self.qualified.entry(spelling.clone()) {
                entry.insert(candidate.clone());
            }
        }
        match self.bindings.entry(spelling) {
            Entry::Vacant(entry) => {
                entry.insert(candidate);
            }
            Entry::Occupied(mut entry) => {
                if candidate.distance < entry.get().distance {
                    entry.insert(candidate);
                }
            }
        }
    }

    /// Look up an exact spelling. A leading `.` means fully qualified.
    pub fn lookup(&self, spelling: &str) -> Option<&Candidate> {
        match spelling.strip_prefix('.') {
            Some(qualified) => self.qualified.get(qualified),
            None => self.bindings.get(spelling),
        }
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.lookup(spelling).is_some()
    }

    /// All `(spelling, candidate)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Candidate)> + '_ {
        self.bindings.iter()
    }

    pub fn spellings(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ============================================================================
// SCOPE PROVIDER
// ============================================================================

/// Compute the scope for `reference`.
///
/// An empty scope is a valid answer; whether that is an error is up to
/// the caller.
pub fn get_scope(source: &impl DocumentSource, reference: &Reference) -> Scope {
    match reference.kind {
        ReferenceKind::ComplexType => visible_scope(source, reference.file, |kind| kind.is_complex_type()),
        ReferenceKind::Extension => visible_scope(source, reference.file, |kind| kind == SymbolKind::Extension),
        ReferenceKind::OptionField { owner } => option_field_scope(source, owner),
        ReferenceKind::EnumLiteral { field } => enum_literal_scope(source, field),
    }
}

/// `get_scope(reference).lookup(spelling)`.
pub fn resolve(source: &impl DocumentSource, reference: &Reference) -> Option<Candidate> {
    let scope = get_scope(source, reference);
    let found = scope.lookup(&reference.spelling).cloned();
    if found.is_none() {
        tracing::trace!(spelling = %reference.spelling, kind = ?reference.kind, "unresolved reference");
    }
    found
}

fn visible_scope(source: &impl DocumentSource, file: FileId, accept: impl Fn(SymbolKind) -> bool) -> Scope {
    let mut scope = Scope::new();
    for visible in resolve_imports(source, file).visible {
        let Some(table) = source.symbol_table(visible.file) else {
            continue;
        };
        for (spelling, symbol) in table.bindings() {
            if accept(symbol.kind) {
                scope.add(spelling.clone(), candidate(table, symbol, visible.distance));
            }
        }
    }
    scope
}

fn candidate(table: &SymbolTable, symbol: &Symbol, distance: u32) -> Candidate {
    Candidate {
        target: DeclRef::new(table.file(), symbol.decl),
        kind: symbol.kind,
        qualified_name: symbol.qualified_name.clone(),
        name_range: symbol.name_range,
        distance,
    }
}

/// Members of a container type, bound by simple name.
fn member_scope(source: &impl DocumentSource, container: DeclRef, members: &[DeclId]) -> Scope {
    let mut scope = Scope::new();
    let Some(table) = source.symbol_table(container.file) else {
        return scope;
    };
    for &member in members {
        if let Some(symbol) = table.symbol_for_decl(member) {
            scope.add(symbol.name.clone(), candidate(table, symbol, 0));
        }
    }
    scope
}

fn option_field_scope(source: &impl DocumentSource, owner: DeclRef) -> Scope {
    let Some(container) = container_type(source, owner) else {
        return Scope::new();
    };
    let Some(document) = source.document(container.file) else {
        return Scope::new();
    };
    match document.get(container.decl).map(|d| &d.kind) {
        Some(DeclKind::Message | DeclKind::Group(_)) => {
            let members = document.member_fields(container.decl);
            member_scope(source, container, &members)
        }
        _ => Scope::new(),
    }
}

fn enum_literal_scope(source: &impl DocumentSource, field: DeclRef) -> Scope {
    let Some(container) = container_type(source, field) else {
        return Scope::new();
    };
    let Some(document) = source.document(container.file) else {
        return Scope::new();
    };
    match document.get(container.decl) {
        Some(decl) if decl.kind == DeclKind::Enum => {
            let values: Vec<_> = decl
                .children
                .iter()
                .copied()
                .filter(|&c| matches!(document.decl(c).kind, DeclKind::EnumValue(_)))
                .collect();
            member_scope(source, container, &values)
        }
        _ => Scope::new(),
    }
}

/// The type whose members `owner` exposes: a group is its own container,
/// a field's container is what its type resolves to.
pub fn container_type(source: &impl DocumentSource, owner: DeclRef) -> Option<DeclRef> {
    let document = source.document(owner.file)?;
    let decl = document.get(owner.decl)?;
    match &decl.kind {
        DeclKind::Group(_) => Some(owner),
        DeclKind::Field(field) => {
            let name = field.ty.named()?;
            let reference = Reference::new(owner.file, owner.decl, ReferenceKind::ComplexType, name);
            resolve(source, &reference).map(|c| c.target)
        }
        _ => None,
    }
}

// ============================================================================
// REFERENCE COLLECTION
// ============================================================================

/// Every statically known reference in `document`, in source order.
///
/// Option field paths after a custom key are not included; their scope
/// depends on what the key resolves to, see [`resolve_option_name`].
pub fn references(file: FileId, document: &Document) -> Vec<Reference> {
    let mut out = Vec::new();
    for id in document.decl_ids() {
        let decl = document.decl(id);
        match &decl.kind {
            DeclKind::Field(field) => {
                if let TypeRef::Named(name) = &field.ty {
                    out.push(Reference::new(file, id, ReferenceKind::ComplexType, name));
                }
                for option in &field.options {
                    if let Some(ext) = &option.name.extension {
                        out.push(Reference::new(file, id, ReferenceKind::Extension, ext));
                    }
                    if option.is_default_value() {
                        if let Value::Ident(literal) = &option.value {
                            out.push(Reference {
                                file,
                                site: id,
                                kind: ReferenceKind::EnumLiteral {
                                    field: DeclRef::new(file, id),
                                },
                                spelling: literal.clone(),
                                range: option.value_range,
                            });
                        }
                    }
                }
            }
            DeclKind::Group(group) => {
                for option in &group.options {
                    if let Some(ext) = &option.name.extension {
                        out.push(Reference::new(file, id, ReferenceKind::Extension, ext));
                    }
                }
            }
            DeclKind::EnumValue(value) => {
                for option in &value.options {
                    if let Some(ext) = &option.name.extension {
                        out.push(Reference::new(file, id, ReferenceKind::Extension, ext));
                    }
                }
            }
            DeclKind::Extend(TypeRef::Named(name)) => {
                out.push(Reference::new(file, id, ReferenceKind::ComplexType, name));
            }
            DeclKind::Option(option) => {
                if let Some(ext) = &option.name.extension {
                    out.push(Reference::new(file, id, ReferenceKind::Extension, ext));
                }
            }
            _ => {}
        }
    }
    out
}

/// Resolve every segment of a custom option name, `(ext).a.b`.
///
/// Each field segment is looked up in the container of the previous
/// segment's target; resolution stops at the first segment that fails.
pub fn resolve_option_name(
    source: &impl DocumentSource,
    file: FileId,
    site: DeclId,
    name: &OptionName,
) -> Vec<(NameRef, Option<Candidate>)> {
    let mut out = Vec::new();
    let Some(ext) = &name.extension else {
        return out;
    };
    let mut owner = resolve(source, &Reference::new(file, site, ReferenceKind::Extension, ext));
    out.push((ext.clone(), owner.clone()));
    for segment in &name.fields {
        let found = owner.as_ref().and_then(|o| {
            let kind = ReferenceKind::OptionField { owner: o.target };
            resolve(source, &Reference::new(file, site, kind, segment))
        });
        out.push((segment.clone(), found.clone()));
        owner = found;
    }
    out
}
