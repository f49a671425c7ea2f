use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use xcompile_native::{build_tree, AstError, Node};

fn write_source(name: &str, source: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    (dir, path)
}

fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a Node>) {
    for node in nodes {
        out.push(node);
        collect(&node.inner, out);
    }
}

fn all_nodes(nodes: &[Node]) -> Vec<&Node> {
    let mut out = Vec::new();
    collect(nodes, &mut out);
    out
}

#[test]
fn test_single_variable() {
    let (_dir, path) = write_source("x.c", "int x;\n");
    let tree = build_tree(&path, &[]).unwrap();

    assert_eq!(tree.len(), 1);
    let x = &tree[0];
    assert_eq!(x.kind, "VarDecl");
    assert_eq!(x.name, "x");
    assert_eq!(x.ty.as_ref().unwrap().qual_type, "int");
    assert!(x.ty.as_ref().unwrap().desugared_qual_type.is_none());
    assert!(x.inner.is_empty());
    assert!(x.tag_used.is_none());
    assert!(x.referenced_decl.is_none());
    assert_eq!(x.loc.line, 1);
    assert_eq!(x.loc.col, 5);
    assert_eq!(x.loc.offset, 4);
    assert!(x.loc.file.as_deref().unwrap().ends_with("x.c"));
}

#[test]
fn test_struct_with_field() {
    let (_dir, path) = write_source("s.c", "struct S { int a; };\n");
    let tree = build_tree(&path, &[]).unwrap();

    assert_eq!(tree.len(), 1);
    let s = &tree[0];
    assert_eq!(s.kind, "RecordDecl");
    assert_eq!(s.tag_used.as_deref(), Some("struct"));
    assert_eq!(s.name, "S");
    assert_eq!(s.inner.len(), 1);
    assert_eq!(s.inner[0].kind, "FieldDecl");
    assert_eq!(s.inner[0].name, "a");
}

#[test]
fn test_class_and_union_tags() {
    let (_dir, path) = write_source("t.cpp", "class C {};\nunion U { int i; float f; };\n");
    let tree = build_tree(&path, &[]).unwrap();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].kind, "RecordDecl");
    assert_eq!(tree[0].tag_used.as_deref(), Some("class"));
    assert_eq!(tree[1].kind, "RecordDecl");
    assert_eq!(tree[1].tag_used.as_deref(), Some("union"));
    let names: Vec<_> = tree[1].inner.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["i", "f"]);
}

#[test]
fn test_call_references_callee() {
    let (_dir, path) = write_source("call.c", "void foo(void);\nvoid bar(void) { foo(); }\n");
    let tree = build_tree(&path, &[]).unwrap();

    let nodes = all_nodes(&tree);
    let call = nodes.iter().find(|n| n.kind == "CallExpr").unwrap();
    let target = call.referenced_decl.as_ref().unwrap();
    assert_eq!(target.name, "foo");
    assert_eq!(target.ty.as_ref().unwrap().qual_type, "void (void)");

    let use_of_foo = nodes.iter().find(|n| n.kind == "DeclRefExpr").unwrap();
    assert_eq!(use_of_foo.referenced_decl.as_ref().unwrap().name, "foo");
}

#[test]
fn test_unresolvable_call_fails_whole_tree() {
    let (_dir, path) = write_source("fp.c", "int before;\nvoid f(void) { ((void (*)(void))0)(); }\n");
    let err = build_tree(&path, &[]).unwrap_err();
    assert!(matches!(err, AstError::UnresolvedReference { .. }), "got {err}");
}

#[test]
fn test_missing_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = build_tree(dir.path().join("nope.c"), &[]).unwrap_err();
    assert!(matches!(err, AstError::Parse { .. }), "got {err}");
}

#[test]
fn test_typedef_is_desugared() {
    let (_dir, path) = write_source("td.c", "typedef int myint;\nmyint v;\n");
    let tree = build_tree(&path, &[]).unwrap();

    let v = tree.iter().find(|n| n.name == "v").unwrap();
    let ty = v.ty.as_ref().unwrap();
    assert_eq!(ty.qual_type, "myint");
    assert_eq!(ty.desugared_qual_type.as_deref(), Some("int"));
}

#[test]
fn test_forward_declaration_shares_id() {
    let (_dir, path) = write_source("fwd.c", "struct S;\nstruct S { int a; };\n");
    let tree = build_tree(&path, &[]).unwrap();

    assert_eq!(tree.len(), 2);
    assert!(!tree[0].id.is_empty());
    assert_eq!(tree[0].id, tree[1].id);
}

#[test]
fn test_children_in_source_order() {
    let (_dir, path) = write_source("order.c", "int c;\nint a;\nint b;\nvoid f(int p, int q);\n");
    let tree = build_tree(&path, &[]).unwrap();

    let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b", "f"]);
    let params: Vec<_> = tree[3].inner.iter().map(|n| (n.kind.as_str(), n.name.as_str())).collect();
    assert_eq!(params, vec![("ParmVarDecl", "p"), ("ParmVarDecl", "q")]);
}

#[test]
fn test_openmp_block_is_cut() {
    let source = "int before;\n\
                  void f(void) {\n\
                  #pragma omp parallel\n\
                  { int hidden = 1; }\n\
                  }\n\
                  int after;\n";
    let (_dir, path) = write_source("omp.c", source);
    let tree = build_tree(&path, &["-fopenmp".to_string()]).unwrap();

    let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["before", "f", "after"]);

    let nodes = all_nodes(&tree);
    assert!(nodes.iter().all(|n| n.name != "hidden"));
    assert!(nodes.iter().all(|n| !n.kind.starts_with("OMP")));

    // the function body survives, only the directive goes
    let body = &tree[1].inner[0];
    assert_eq!(body.kind, "CompoundStmt");
    assert!(body.inner.is_empty());
}

#[test]
fn test_same_tree_twice() {
    let (_dir, path) = write_source("twice.c", "typedef unsigned long size;\nsize n;\nint g(size s) { return (int)s; }\n");
    let first = build_tree(&path, &[]).unwrap();
    let second = build_tree(&path, &[]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_bit_cast_is_kept() {
    let (_dir, path) = write_source("cast.cpp", "float f(int i) { return __builtin_bit_cast(float, i); }\n");
    let tree = build_tree(&path, &["-std=c++20".to_string()]).unwrap();

    let nodes = all_nodes(&tree);
    assert!(nodes.iter().any(|n| n.kind == "BuiltinBitCastExpr"));
}

#[test]
fn test_objc_declarations_are_cut() {
    let (_dir, path) = write_source("objc.m", "@interface Foo\n@end\nint keep;\n");
    let tree = build_tree(&path, &["-x".to_string(), "objective-c".to_string()]).unwrap();

    let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["keep"]);
    assert_eq!(tree[0].kind, "VarDecl");
    assert!(all_nodes(&tree).iter().all(|n| !n.kind.starts_with("ObjC")));
}

#[test]
fn test_seh_leave_is_kept() {
    let (_dir, path) = write_source("seh.c", "void f(void) { __try { __leave; } __finally { } }\n");
    let args = ["--target=x86_64-pc-windows-msvc".to_string(), "-fms-extensions".to_string()];
    let tree = build_tree(&path, &args).unwrap();

    let nodes = all_nodes(&tree);
    assert!(nodes.iter().any(|n| n.kind == "SEHTryStmt"));
    assert!(nodes.iter().any(|n| n.kind == "SEHLeaveStmt"));
}
