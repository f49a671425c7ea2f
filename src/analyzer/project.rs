use crate::error::Result;
use crate::parser::{build_tree, Node};
use dashmap::DashMap;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Extensions treated as C/C++ sources or headers.
pub const C_FAMILY_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx"];

/// Directory names not descended into below the walk root.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[".git", "build"];

#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Passed unchanged to every parse.
    pub compile_args: Vec<String>,
    /// Files whose path matches are left out.
    pub exclude: Option<Regex>,
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk. The root itself is always walked.
    pub skip_dirs: Vec<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            compile_args: Vec::new(),
            exclude: None,
            extensions: C_FAMILY_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[derive(Serialize)]
struct ProjectSnapshot<'a> {
    trees: BTreeMap<String, &'a Vec<Node>>,
    errors: BTreeMap<String, &'a String>,
}

/// Trees for every source file under a directory, built in parallel.
pub struct ProjectIndex {
    pub trees: Arc<DashMap<String, Vec<Node>>>,
    pub errors: Arc<DashMap<String, String>>,
}

impl ProjectIndex {
    /// Parses each file on its own parser session. A file that fails is
    /// recorded in `errors` and does not stop the others.
    pub fn index_project(project_root: &str, options: &IndexOptions) -> Self {
        let files = find_all_source_files(project_root, options);
        info!("indexing {} files under {}", files.len(), project_root);

        let trees = Arc::new(DashMap::new());
        let errors = Arc::new(DashMap::new());

        files.par_iter().for_each(|file_path| {
            match build_tree(file_path, &options.compile_args) {
                Ok(tree) => {
                    trees.insert(file_path.clone(), tree);
                }
                Err(err) => {
                    warn!("failed to build tree for {}: {}", file_path, err);
                    errors.insert(file_path.clone(), err.to_string());
                }
            }
        });

        info!("indexed {} files, {} failed", trees.len(), errors.len());
        Self { trees, errors }
    }

    pub fn tree(&self, file: &str) -> Option<Vec<Node>> {
        self.trees.get(file).map(|t| t.value().clone())
    }

    /// `{"trees": {path: [Node]}, "errors": {path: message}}`, keys sorted.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let trees: Vec<_> = self.trees.iter().collect();
        let errors: Vec<_> = self.errors.iter().collect();
        let snapshot = ProjectSnapshot {
            trees: trees.iter().map(|e| (e.key().clone(), e.value())).collect(),
            errors: errors.iter().map(|e| (e.key().clone(), e.value())).collect(),
        };
        let json = if pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(json)
    }
}

pub fn find_all_source_files(root: &str, options: &IndexOptions) -> Vec<String> {
    use walkdir::WalkDir;
    let mut out = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || !e.file_type().is_dir()
            || !options.skip_dirs.iter().any(|d| e.file_name() == d.as_str())
    });
    for entry in walker.filter_map(|e| e.ok()) {
        let p = entry.path();
        if !p.is_file() {
            continue;
        }
        let Some(ext) = p.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !options.extensions.iter().any(|e| e == ext) {
            continue;
        }
        let path = p.to_string_lossy().to_string();
        if options.exclude.as_ref().is_some_and(|re| re.is_match(&path)) {
            continue;
        }
        out.push(path);
    }
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_sources_filters_extension_and_exclude() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.c"), "int a;").unwrap();
        fs::write(dir.path().join("b.hpp"), "int b;").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("build/gen.c"), "int g;").unwrap();
        fs::create_dir(dir.path().join("third_party")).unwrap();
        fs::write(dir.path().join("third_party/z.c"), "int z;").unwrap();

        let options = IndexOptions {
            exclude: Some(Regex::new("third_party").unwrap()),
            ..Default::default()
        };
        let files = find_all_source_files(dir.path().to_str().unwrap(), &options);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.rsplit('/').next().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.c", "b.hpp"]);
    }

    #[test]
    fn test_root_under_build_dir_is_walked() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("build").join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("main.c"), "int main(void) { return 0; }").unwrap();
        fs::write(root.join("src/util.c"), "int util;").unwrap();
        fs::create_dir(root.join("build")).unwrap();
        fs::write(root.join("build/gen.c"), "int g;").unwrap();

        let files = find_all_source_files(root.to_str().unwrap(), &IndexOptions::default());
        assert_eq!(
            files,
            vec![
                root.join("main.c").to_string_lossy().to_string(),
                root.join("src/util.c").to_string_lossy().to_string(),
            ]
        );
    }

    #[test]
    fn test_skip_dirs_are_configurable() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/addon.c"), "int addon;").unwrap();
        fs::create_dir(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor/v.c"), "int v;").unwrap();

        let root = dir.path().to_str().unwrap();
        assert_eq!(find_all_source_files(root, &IndexOptions::default()).len(), 2);

        let options = IndexOptions {
            skip_dirs: vec!["vendor".to_string()],
            ..Default::default()
        };
        let files = find_all_source_files(root, &options);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("addon.c"));
    }

    #[test]
    fn test_index_project_records_trees_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.c"), "int ok;\n").unwrap();
        fs::write(dir.path().join("bad.c"), "void f(void) { ((void (*)(void))0)(); }\n").unwrap();

        let index = ProjectIndex::index_project(dir.path().to_str().unwrap(), &IndexOptions::default());
        assert_eq!(index.trees.len(), 1);
        assert_eq!(index.errors.len(), 1);

        let ok_path = dir.path().join("ok.c").to_string_lossy().to_string();
        let tree = index.tree(&ok_path).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "ok");

        let json: serde_json::Value = serde_json::from_str(&index.to_json(false).unwrap()).unwrap();
        assert_eq!(json["trees"][&ok_path][0]["kind"], "VarDecl");
        assert!(json["errors"].as_object().unwrap().len() == 1);
    }
}
