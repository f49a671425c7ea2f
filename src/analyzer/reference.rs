//! Referenced-declaration summaries for name uses and calls.

use super::{kind, location, types};
use crate::clang::Cursor;
use crate::error::{AstError, Result};
use crate::parser::ReferenceSummary;

/// Summarizes the declaration `cursor` refers to.
///
/// A name use or call without a resolvable target is an error for the
/// whole tree, not a missing field.
pub fn resolve_reference(cursor: &Cursor<'_>) -> Result<ReferenceSummary> {
    let Some(target) = cursor.referenced() else {
        let loc = location::locate(cursor);
        return Err(AstError::UnresolvedReference {
            kind: kind::classify(cursor.kind()).into_owned(),
            name: cursor.spelling(),
            file: loc.file.unwrap_or_default(),
            line: loc.line,
            col: loc.col,
        });
    };

    Ok(ReferenceSummary {
        name: target.spelling(),
        ty: types::cursor_type(&target),
    })
}
