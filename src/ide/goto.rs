//! Go-to-definition.

use smol_str::SmolStr;

use crate::base::{FileId, TextRange, TextSize};
use crate::hir::{Candidate, DocumentSource, SymbolKind, references, resolve, resolve_option_name};
use crate::syntax::ast::{DeclKind, Document, FieldOption, OptionName};

/// Result of a go-to-definition request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GotoResult {
    pub targets: Vec<GotoTarget>,
}

impl GotoResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(target: GotoTarget) -> Self {
        Self { targets: vec![target] }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Where to jump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    pub file: FileId,
    /// The target's name; empty at the start of the file for imports.
    pub range: TextRange,
    /// `None` when the target is a whole document.
    pub kind: Option<SymbolKind>,
    pub name: SmolStr,
}

impl From<&Candidate> for GotoTarget {
    fn from(candidate: &Candidate) -> Self {
        Self {
            file: candidate.target.file,
            range: candidate.name_range,
            kind: Some(candidate.kind),
            name: candidate.qualified_name.clone(),
        }
    }
}

/// Find the definition of the name at `offset` in `file`.
///
/// Handles import URIs, field and `extend` types, custom option names
/// (each dotted segment separately) and enum literals in defaults.
pub fn goto_definition(source: &impl DocumentSource, file: FileId, offset: TextSize) -> GotoResult {
    let Some(document) = source.document(file) else {
        return GotoResult::empty();
    };

    for import in &document.imports {
        if import.uri_range.contains_inclusive(offset) {
            return match source.locate(&import.uri, file) {
                Some(target) => GotoResult::single(GotoTarget {
                    file: target,
                    range: TextRange::default(),
                    kind: None,
                    name: import.uri.clone(),
                }),
                None => GotoResult::empty(),
            };
        }
    }

    if let Some(reference) = references(file, document)
        .into_iter()
        .find(|r| r.range.contains_inclusive(offset))
    {
        return resolve(source, &reference)
            .map(|c| GotoResult::single(GotoTarget::from(&c)))
            .unwrap_or_default();
    }

    for (site, name) in option_names(document) {
        let touches = name
            .extension
            .iter()
            .chain(&name.fields)
            .any(|segment| segment.range.contains_inclusive(offset));
        if !touches {
            continue;
        }
        for (segment, found) in resolve_option_name(source, file, site, name) {
            if segment.range.contains_inclusive(offset) {
                return found
                    .map(|c| GotoResult::single(GotoTarget::from(&c)))
                    .unwrap_or_default();
            }
        }
    }

    GotoResult::empty()
}

/// Every option name in `document` with the declaration it belongs to.
pub(crate) fn option_names(document: &Document) -> Vec<(crate::syntax::ast::DeclId, &OptionName)> {
    let mut out = Vec::new();
    for id in document.decl_ids() {
        let field_options: &[FieldOption] = match &document.decl(id).kind {
            DeclKind::Field(field) => &field.options,
            DeclKind::Group(group) => &group.options,
            DeclKind::EnumValue(value) => &value.options,
            DeclKind::Option(option) => {
                out.push((id, &option.name));
                continue;
            }
            _ => continue,
        };
        out.extend(field_options.iter().map(|o| (id, &o.name)));
    }
    out
}
