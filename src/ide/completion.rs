//! Completion candidates.
//!
//! Candidates come straight from the scope provider; this module only
//! works out which reference the cursor is in and filters by the text
//! typed so far. Presentation is left to the editor.

use smol_str::SmolStr;

use crate::base::{FileId, TextRange, TextSize};
use crate::hir::{
    Candidate, DocumentSource, Reference, ReferenceKind, Scope, SymbolKind, get_scope, references,
    resolve_option_name,
};
use crate::syntax::ast::{DeclId, DeclKind, Document};

use super::goto::option_names;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    Message,
    Enum,
    Field,
    EnumValue,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Message => 7,    // Class
            CompletionKind::Enum => 13,      // Enum
            CompletionKind::Field => 5,      // Field
            CompletionKind::EnumValue => 20, // EnumMember
        }
    }
}

impl From<SymbolKind> for CompletionKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Message | SymbolKind::Group => CompletionKind::Message,
            SymbolKind::Enum => CompletionKind::Enum,
            SymbolKind::EnumValue => CompletionKind::EnumValue,
            SymbolKind::Field | SymbolKind::Extension | SymbolKind::OneOf => CompletionKind::Field,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    /// The spelling to insert.
    pub label: SmolStr,
    pub kind: CompletionKind,
    /// Qualified name of the declaration.
    pub detail: Option<SmolStr>,
    /// Import distance; lower sorts first.
    pub sort_priority: u32,
}

impl CompletionItem {
    fn new(spelling: &SmolStr, candidate: &Candidate) -> Self {
        Self {
            label: spelling.clone(),
            kind: candidate.kind.into(),
            detail: Some(candidate.qualified_name.clone()),
            sort_priority: candidate.distance,
        }
    }
}

/// Completion candidates at `offset`.
///
/// Inside a written name, the candidates are those of that reference's
/// scope starting with the text before the cursor. Elsewhere inside a
/// message body, every visible type is offered.
pub fn completions(source: &impl DocumentSource, file: FileId, offset: TextSize) -> Vec<CompletionItem> {
    let Some(document) = source.document(file) else {
        return Vec::new();
    };

    if let Some(reference) = references(file, document)
        .into_iter()
        .find(|r| r.range.contains_inclusive(offset))
    {
        let prefix = typed_prefix(&reference.spelling, reference.range, offset);
        return items(&get_scope(source, &reference), prefix);
    }

    if let Some(items) = option_field_completions(source, file, document, offset) {
        return items;
    }

    match enclosing_body(document, offset) {
        Some(site) => {
            let reference = Reference {
                file,
                site,
                kind: ReferenceKind::ComplexType,
                spelling: SmolStr::default(),
                range: TextRange::empty(offset),
            };
            items(&get_scope(source, &reference), "")
        }
        None => Vec::new(),
    }
}

fn items(scope: &Scope, prefix: &str) -> Vec<CompletionItem> {
    let mut out: Vec<_> = scope
        .iter()
        .filter(|(spelling, _)| spelling.starts_with(prefix))
        .map(|(spelling, candidate)| CompletionItem::new(spelling, candidate))
        .collect();
    out.sort_by_key(|item| item.sort_priority);
    out
}

fn typed_prefix(spelling: &str, range: TextRange, offset: TextSize) -> &str {
    let typed = usize::from(offset - range.start().min(offset));
    spelling.get(..typed).unwrap_or(spelling)
}

/// Field segments after a custom option key, `(ext).fi|`.
fn option_field_completions(
    source: &impl DocumentSource,
    file: FileId,
    document: &Document,
    offset: TextSize,
) -> Option<Vec<CompletionItem>> {
    for (site, name) in option_names(document) {
        let Some(pos) = name.fields.iter().position(|f| f.range.contains_inclusive(offset)) else {
            continue;
        };
        let resolved = resolve_option_name(source, file, site, name);
        // resolved[0] is the extension, resolved[i + 1] the i-th field
        let owner = resolved.get(pos).and_then(|(_, c)| c.as_ref())?;
        let segment = &name.fields[pos];
        let reference = Reference::new(file, site, ReferenceKind::OptionField { owner: owner.target }, segment);
        let prefix = typed_prefix(&segment.spelling, segment.range, offset);
        return Some(items(&get_scope(source, &reference), prefix));
    }
    None
}

/// The innermost message, group, one-of or `extend` body around `offset`.
fn enclosing_body(document: &Document, offset: TextSize) -> Option<DeclId> {
    document
        .decl_ids()
        .filter(|&id| {
            let decl = document.decl(id);
            matches!(
                decl.kind,
                DeclKind::Message | DeclKind::Group(_) | DeclKind::OneOf | DeclKind::Extend(_)
            ) && decl.range.contains(offset)
        })
        .min_by_key(|&id| document.decl(id).range.len())
}
