//! Import graph resolution.
//!
//! Computes which documents are visible from one document: the document
//! itself, everything it imports directly, and from there on only what
//! those documents re-export through `import public`, transitively. Each
//! visible document carries its distance from the root, which the scope
//! provider uses for nearest-wins.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::db::DocumentSource;
use crate::base::{FileId, TextRange};

/// A document visible from the resolution root.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisibleDocument {
    pub file: FileId,
    /// 0 for the root, 1 for direct imports, +1 per public re-export hop.
    pub distance: u32,
}

/// An import of the root document that matches no loaded document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedImport {
    /// Index into the root document's `imports`.
    pub import: usize,
    pub uri: SmolStr,
    pub uri_range: TextRange,
}

/// An import of the root document from which the root is reachable again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportCycle {
    pub import: usize,
    pub target: FileId,
}

/// The visible-document set of one document, in search order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportResolution {
    pub root: FileId,
    /// Ordered by distance, then by import declaration order.
    pub visible: Vec<VisibleDocument>,
    pub unresolved: Vec<UnresolvedImport>,
}

impl ImportResolution {
    pub fn files(&self) -> impl Iterator<Item = FileId> + '_ {
        self.visible.iter().map(|v| v.file)
    }

    pub fn distance(&self, file: FileId) -> Option<u32> {
        self.visible.iter().find(|v| v.file == file).map(|v| v.distance)
    }

    pub fn is_visible(&self, file: FileId) -> bool {
        self.distance(file).is_some()
    }
}

/// Resolve the documents visible from `root`.
///
/// Never fails: imports that cannot be located are listed in
/// [`ImportResolution::unresolved`] and contribute nothing. Traversal
/// stops at documents already visited, so import cycles terminate; use
/// [`import_cycles`] to list them.
pub fn resolve_imports(source: &impl DocumentSource, root: FileId) -> ImportResolution {
    let mut resolution = ImportResolution {
        root,
        ..Default::default()
    };
    let Some(document) = source.document(root) else {
        return resolution;
    };

    let mut visited = FxHashSet::default();
    visited.insert(root);
    resolution.visible.push(VisibleDocument { file: root, distance: 0 });

    for (idx, import) in document.imports.iter().enumerate() {
        match source.locate(&import.uri, root) {
            Some(target) => {
                if visited.insert(target) {
                    resolution.visible.push(VisibleDocument { file: target, distance: 1 });
                } else {
                    tracing::trace!(uri = %import.uri, "import already visible");
                }
            }
            None => {
                tracing::debug!(root = %root, uri = %import.uri, "import not found");
                resolution.unresolved.push(UnresolvedImport {
                    import: idx,
                    uri: import.uri.clone(),
                    uri_range: import.uri_range,
                });
            }
        }
    }

    // breadth-first over public re-exports; `visible` doubles as the queue
    let mut cursor = 1;
    while cursor < resolution.visible.len() {
        let VisibleDocument { file, distance } = resolution.visible[cursor];
        cursor += 1;
        let Some(document) = source.document(file) else {
            continue;
        };
        for import in document.imports.iter().filter(|i| i.is_public()) {
            let Some(target) = source.locate(&import.uri, file) else {
                continue;
            };
            if visited.insert(target) {
                resolution.visible.push(VisibleDocument {
                    file: target,
                    distance: distance + 1,
                });
            }
        }
    }

    tracing::trace!(
        root = %root,
        visible = resolution.visible.len(),
        unresolved = resolution.unresolved.len(),
        "resolved imports"
    );
    resolution
}

/// Imports of `root` whose target leads back to `root`, over imports of
/// any visibility.
///
/// Walks the whole reachable import graph once per import, so callers
/// that only need visibility should stick to [`resolve_imports`].
pub fn import_cycles(source: &impl DocumentSource, root: FileId) -> Vec<ImportCycle> {
    let Some(document) = source.document(root) else {
        return Vec::new();
    };
    document
        .imports
        .iter()
        .enumerate()
        .filter_map(|(idx, import)| {
            let target = source.locate(&import.uri, root)?;
            if !reaches(source, target, root) {
                return None;
            }
            tracing::debug!(root = %root, uri = %import.uri, "possible circular imports");
            Some(ImportCycle { import: idx, target })
        })
        .collect()
}

/// Whether `to` is reachable from `from` over imports of any visibility.
fn reaches(source: &impl DocumentSource, from: FileId, to: FileId) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = vec![from];
    while let Some(file) = stack.pop() {
        if file == to {
            return true;
        }
        if !visited.insert(file) {
            continue;
        }
        let Some(document) = source.document(file) else {
            continue;
        };
        stack.extend(
            document
                .imports
                .iter()
                .filter_map(|import| source.locate(&import.uri, file)),
        );
    }
    false
}
