//! Cross-document declaration identifiers.

use std::fmt;

use crate::base::FileId;
use crate::syntax::ast::DeclId;

/// A declaration anywhere in the database.
///
/// Combines the owning document with the declaration's arena index in
/// that document. Documents never point at each other directly; a
/// `DeclRef` is looked up again in whichever snapshot is current.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclRef {
    pub file: FileId,
    pub decl: DeclId,
}

impl DeclRef {
    #[inline]
    pub const fn new(file: FileId, decl: DeclId) -> Self {
        Self { file, decl }
    }
}

impl fmt::Debug for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclRef({}:{})", self.file, self.decl.0)
    }
}
