use crate::analyzer::{kind, serialize};
use crate::clang::{Index, TranslationUnit};
use crate::error::{AstError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::CString;
use std::path::Path;
use tracing::debug;

/// Source span of a node. Missing information reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub line: u32,
    pub col: u32,
    pub offset: u32,
    pub tok_len: u32,
    /// Absent for built-in and command-line locations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub qual_type: String,
    /// Only present when the canonical type is spelled differently.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desugared_qual_type: Option<String>,
}

/// What a name use or call points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_used: Option<String>,
    /// libclang USR, shared by every cursor naming the same entity.
    pub id: String,
    pub name: String,
    pub loc: Location,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_decl: Option<ReferenceSummary>,
    #[serde(default)]
    pub inner: Vec<Node>,
}

fn to_c_string(what: &str, value: &str) -> Result<CString> {
    CString::new(value)
        .map_err(|_| AstError::InvalidInput(format!("{} contains a NUL byte: {:?}", what, value)))
}

/// Parses `path` with `compile_args` and returns the top-level nodes of
/// the translation unit.
///
/// Either the whole tree comes back or an error does. Parser resources
/// are released before returning on every path.
pub fn build_tree(path: impl AsRef<Path>, compile_args: &[String]) -> Result<Vec<Node>> {
    let path = path.as_ref();
    let path_str = path
        .to_str()
        .ok_or_else(|| AstError::InvalidInput(format!("path is not UTF-8: {}", path.display())))?;
    if path_str.is_empty() {
        return Err(AstError::InvalidInput("empty file path".into()));
    }
    let c_path = to_c_string("file path", path_str)?;
    let c_args = compile_args
        .iter()
        .map(|arg| to_c_string("compile argument", arg))
        .collect::<Result<Vec<_>>>()?;

    if let Err(err) = std::fs::metadata(path) {
        return Err(AstError::parse(path, err.to_string()));
    }

    kind::verify_against_parser()?;

    debug!("parsing {} with {} args", path.display(), c_args.len());
    let index = Index::new()?;
    let unit = TranslationUnit::parse(&index, path, &c_path, &c_args)?;
    let tree = serialize::serialize_children(&unit.cursor())?;
    debug!("{}: {} top-level nodes", path.display(), tree.len());
    Ok(tree)
}

/// Encodes a root sequence as JSON.
pub fn to_json(tree: &[Node], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(json)
}

pub trait Visitor {
    fn enter(&mut self, _node: &Node, _depth: usize) {}
    fn exit(&mut self, _node: &Node, _depth: usize) {}
}

/// Depth-first walk over a finished tree. Roots are at depth 1.
pub fn traverse_ast(roots: &[Node], visitor: &mut dyn Visitor) {
    fn walk(node: &Node, depth: usize, visitor: &mut dyn Visitor) {
        visitor.enter(node, depth);
        for child in &node.inner {
            walk(child, depth + 1, visitor);
        }
        visitor.exit(node, depth);
    }

    for root in roots {
        walk(root, 1, visitor);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub nodes: usize,
    pub max_depth: usize,
}

impl Visitor for TreeStats {
    fn enter(&mut self, _node: &Node, depth: usize) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

impl TreeStats {
    pub fn of(roots: &[Node]) -> Self {
        let mut stats = Self::default();
        traverse_ast(roots, &mut stats);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: &str, name: &str) -> Node {
        Node {
            kind: kind.into(),
            tag_used: None,
            id: String::new(),
            name: name.into(),
            loc: Location::default(),
            ty: None,
            referenced_decl: None,
            inner: vec![],
        }
    }

    #[test]
    fn test_field_names_on_the_wire() {
        let mut record = leaf("RecordDecl", "S");
        record.tag_used = Some("struct".into());
        record.id = "c:@S@S".into();
        record.loc.file = Some("a.c".into());
        record.loc.tok_len = 3;
        let mut field = leaf("FieldDecl", "a");
        field.ty = Some(TypeInfo {
            qual_type: "int".into(),
            desugared_qual_type: None,
        });
        record.inner.push(field);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kind"], "RecordDecl");
        assert_eq!(value["tagUsed"], "struct");
        assert_eq!(value["id"], "c:@S@S");
        assert_eq!(value["loc"]["tokLen"], 3);
        assert_eq!(value["loc"]["file"], "a.c");
        assert_eq!(value["inner"][0]["type"]["qualType"], "int");
        assert!(value.get("type").is_none());
        assert!(value.get("referencedDecl").is_none());
        assert!(value["inner"][0]["type"].get("desugaredQualType").is_none());
    }

    #[test]
    fn test_inner_always_present() {
        let json = serde_json::to_string(&leaf("VarDecl", "x")).unwrap();
        assert!(json.contains(r#""inner":[]"#));
        assert!(!json.contains("file"));
    }

    #[test]
    fn test_reference_summary_uses_type_key() {
        let mut call = leaf("CallExpr", "foo");
        call.referenced_decl = Some(ReferenceSummary {
            name: "foo".into(),
            ty: Some(TypeInfo {
                qual_type: "void (void)".into(),
                desugared_qual_type: None,
            }),
        });
        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(value["referencedDecl"]["name"], "foo");
        assert_eq!(value["referencedDecl"]["type"]["qualType"], "void (void)");
    }

    #[test]
    fn test_tree_stats() {
        let mut func = leaf("FunctionDecl", "f");
        let mut body = leaf("CompoundStmt", "");
        body.inner.push(leaf("ReturnStmt", ""));
        func.inner.push(body);
        let roots = vec![leaf("VarDecl", "x"), func];

        let stats = TreeStats::of(&roots);
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(TreeStats::of(&[]), TreeStats::default());
    }

    #[test]
    fn test_empty_path_is_invalid_input() {
        let err = build_tree("", &[]).unwrap_err();
        assert!(matches!(err, AstError::InvalidInput(_)));
    }

    #[test]
    fn test_nul_in_argument_is_invalid_input() {
        let err = build_tree("whatever.c", &["-DX=\0".to_string()]).unwrap_err();
        assert!(matches!(err, AstError::InvalidInput(_)));
    }
}
