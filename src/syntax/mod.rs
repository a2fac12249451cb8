//! `.proto` syntax: tokens, the document model and the parser.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Decl, DeclId, DeclKind, Document, Import, ImportVisibility, NameRef, TypeRef};
pub use parser::{Parse, ParseError, parse};
