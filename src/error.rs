//! Error types for tree building.
//!
//! Every variant here is terminal for a single `build_tree` call: the
//! traversal stops and no partial tree is handed back.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience type for functions that can fail while building a tree.
pub type Result<T> = std::result::Result<T, AstError>;

/// Things that can go wrong between a file path and a finished tree.
#[derive(Error, Debug)]
pub enum AstError {
    /// The path or an argument can't be handed to libclang at all.
    /// Raised before any parser call is made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// libclang refused to create an index.
    #[error("unable to create parser session")]
    Session,

    /// libclang produced no translation unit for the file.
    #[error("unable to parse translation unit '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A call or name-use cursor has no referenced declaration.
    #[error("unresolved reference from {kind} '{name}' at {file}:{line}:{col}")]
    UnresolvedReference {
        kind: String,
        name: String,
        file: String,
        line: u32,
        col: u32,
    },

    /// The loaded libclang numbers its cursor kinds differently from
    /// the table this crate was built against.
    #[error("cursor kind table out of sync with libclang: tag {tag} should be '{expected}', parser says '{found}'")]
    KindTableMismatch {
        tag: i32,
        expected: &'static str,
        found: String,
    },

    /// Encoding a finished tree failed.
    #[error("serialize tree failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AstError {
    /// Creates a parse error with the path for context.
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_names_file() {
        let err = AstError::parse("/tmp/missing.c", "no such file");
        assert_eq!(
            err.to_string(),
            "unable to parse translation unit '/tmp/missing.c': no such file"
        );
    }

    #[test]
    fn test_unresolved_reference_message() {
        let err = AstError::UnresolvedReference {
            kind: "CallExpr".into(),
            name: String::new(),
            file: "a.c".into(),
            line: 3,
            col: 5,
        };
        assert_eq!(err.to_string(), "unresolved reference from CallExpr '' at a.c:3:5");
    }
}
