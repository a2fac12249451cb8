//! Document links - clickable import paths.

use std::borrow::Cow;

use crate::base::{FileId, TextRange};
use crate::hir::DocumentSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// The quoted import path in the source file.
    pub range: TextRange,
    pub target: FileId,
    pub tooltip: Cow<'static, str>,
}

/// One link per import that resolves to a loaded document. Unresolved
/// imports get no link; the validator reports them instead.
pub fn document_links(source: &impl DocumentSource, file: FileId) -> Vec<DocumentLink> {
    let Some(document) = source.document(file) else {
        return Vec::new();
    };
    document
        .imports
        .iter()
        .filter_map(|import| {
            let target = source.locate(&import.uri, file)?;
            Some(DocumentLink {
                range: import.uri_range,
                target,
                tooltip: Cow::Owned(format!("Open {}", import.uri)),
            })
        })
        .collect()
}
