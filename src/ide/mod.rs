//! IDE features - high-level APIs for editor integrations.
//!
//! Thin consumers of the `hir` layer: each function takes a
//! [`DocumentSource`](crate::hir::DocumentSource) plus a position and
//! returns plain data, with no protocol types. Positions are byte
//! offsets; use [`LineIndex`](crate::base::LineIndex) to convert.
//!
//! The usual entry point is [`AnalysisHost`]:
//!
//! ```ignore
//! use protoscope::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! host.set_file_content("/ws/a.proto", "message A {}");
//!
//! let analysis = host.analysis();
//! let file = analysis.file_id("/ws/a.proto").unwrap();
//! let links = analysis.document_links(file);
//! ```

mod analysis;
mod completion;
mod document_links;
mod goto;

pub use analysis::{Analysis, AnalysisHost};
pub use completion::{CompletionItem, CompletionKind, completions};
pub use document_links::{DocumentLink, document_links};
pub use goto::{GotoResult, GotoTarget, goto_definition};
