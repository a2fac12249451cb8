//! Import path configuration.
//!
//! Decides which loaded paths an `import "x/y.proto";` statement may
//! refer to. Matching is purely lexical: no file system access happens
//! here, the database only compares the candidates against the paths it
//! already holds.

use std::path::PathBuf;

/// Where import URIs are looked up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImportPaths {
    /// URIs are relative to the importing document's directory, or taken
    /// as written.
    #[default]
    SingleDirectory,
    /// URIs are tried against each directory in order, then as for
    /// [`ImportPaths::SingleDirectory`].
    MultipleDirectories(Vec<PathBuf>),
}

impl ImportPaths {
    /// Candidate paths for `uri` imported from the document at `importer`,
    /// most preferred first. All candidates are normalized.
    pub fn candidates(&self, uri: &str, importer: &str) -> Vec<String> {
        let uri = normalize_path(strip_scheme(uri));
        if uri.starts_with('/') {
            return vec![uri];
        }

        let mut out: Vec<String> = Vec::new();
        let mut push = |candidate: String| {
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        };

        if let ImportPaths::MultipleDirectories(directories) = self {
            for dir in directories {
                let dir = normalize_path(&dir.to_string_lossy());
                push(join(&dir, &uri));
            }
        }
        let importer = normalize_path(importer);
        if let Some(dir) = parent_dir(&importer) {
            push(join(dir, &uri));
        }
        push(uri);
        out
    }
}

/// Remove a URI scheme such as `file:` or `platform:` and an empty
/// authority (`//`). Single-letter prefixes are drive letters and stay.
pub fn strip_scheme(uri: &str) -> &str {
    let Some(colon) = uri.find(':') else {
        return uri;
    };
    let scheme = &uri[..colon];
    let is_scheme = scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return uri;
    }
    let rest = &uri[colon + 1..];
    match rest.strip_prefix("//") {
        Some(after) if after.starts_with('/') => after,
        _ => rest,
    }
}

/// Fold `.` and `..` segments and unify separators to `/`.
///
/// A `..` that would climb above a relative path's start is kept; one
/// that would climb above the root is dropped.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

fn parent_dir(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| if idx == 0 { "/" } else { &path[..idx] })
}

fn join(dir: &str, relative: &str) -> String {
    if dir.is_empty() {
        return normalize_path(relative);
    }
    normalize_path(&format!("{dir}/{relative}"))
}
