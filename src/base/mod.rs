//! Foundation types shared by every layer.
//!
//! - [`FileId`] - handle for a loaded schema document
//! - [`TextRange`], [`TextSize`] - byte positions inside a document
//! - [`LineCol`], [`LineIndex`] - line/column conversion for diagnostics
//!
//! Nothing in here depends on other protoscope modules.

mod file_id;
mod span;

pub use file_id::FileId;
pub use span::{LineCol, LineIndex, TextRange, TextSize};

pub use text_size;
