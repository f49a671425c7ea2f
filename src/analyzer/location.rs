//! Source spans for nodes.

use crate::clang::Cursor;
use crate::parser::Location;

/// Location of `cursor`: where its spelling starts, plus the byte length up
/// to the end of its extent.
pub fn locate(cursor: &Cursor<'_>) -> Location {
    let start = cursor.location();
    let end = cursor.extent_end();

    Location {
        line: start.line,
        col: start.col,
        offset: start.offset,
        tok_len: span_len(start.offset, end.offset),
        file: start.file,
    }
}

/// Zero unless `end` lies strictly past `start`.
fn span_len(start: u32, end: u32) -> u32 {
    end.saturating_sub(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        assert_eq!(span_len(4, 5), 1);
        assert_eq!(span_len(0, 12), 12);
        assert_eq!(span_len(7, 7), 0);
        assert_eq!(span_len(9, 3), 0);
    }
}
