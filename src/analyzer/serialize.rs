//! The cursor walk that turns a translation unit into `Node`s.

use super::{filter, kind, location, reference, types};
use crate::clang::Cursor;
use crate::error::Result;
use crate::parser::Node;
use tracing::{debug, trace};

/// Serializes the children of `parent`, in libclang's order, skipping
/// filtered subtrees. This is the `inner` of whatever `parent` became.
pub fn serialize_children(parent: &Cursor<'_>) -> Result<Vec<Node>> {
    let mut out = Vec::new();
    for child in parent.children() {
        visit(&child, &mut out)?;
    }
    Ok(out)
}

fn visit(cursor: &Cursor<'_>, out: &mut Vec<Node>) -> Result<()> {
    if cursor.is_null() {
        return Ok(());
    }

    if filter::is_excluded(cursor) {
        debug!(
            "skipping {} subtree at offset {}",
            kind::classify(cursor.kind()),
            cursor.location().offset
        );
        return Ok(());
    }

    let mut node = build_node(cursor)?;
    node.inner = serialize_children(cursor)?;
    out.push(node);
    Ok(())
}

/// Header fields of a node; `inner` is left empty.
fn build_node(cursor: &Cursor<'_>) -> Result<Node> {
    let tag = cursor.kind();

    let referenced_decl = if kind::is_reference_like(tag) {
        Some(reference::resolve_reference(cursor)?)
    } else {
        None
    };

    let node = Node {
        kind: kind::classify(tag).into_owned(),
        tag_used: kind::tag_used(tag).map(str::to_string),
        id: cursor.usr(),
        name: cursor.spelling(),
        loc: location::locate(cursor),
        ty: types::cursor_type(cursor),
        referenced_decl,
        inner: Vec::new(),
    };
    trace!("{} '{}'", node.kind, node.name);
    Ok(node)
}
