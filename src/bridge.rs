use crate::parser;
use napi::bindgen_prelude::*;
use napi_derive::napi;

/// `getClangAST(filename, args)`: the top-level nodes of `filename` as JSON.
#[napi(js_name = "getClangAST")]
pub fn get_clang_ast(filename: String, args: Vec<String>) -> Result<String> {
    let tree = parser::build_tree(&filename, &args).map_err(|e| Error::from_reason(e.to_string()))?;
    parser::to_json(&tree, false).map_err(|e| Error::from_reason(e.to_string()))
}

#[napi(object)]
pub struct TraverseStats {
    pub nodes_visited: u32,
    pub max_depth: u32,
}

#[napi]
pub fn traverse_ast(ast_json: String) -> Result<TraverseStats> {
    let roots: Vec<parser::Node> = serde_json::from_str(&ast_json)
        .map_err(|e| Error::from_reason(format!("invalid ast json: {}", e)))?;
    let stats = parser::TreeStats::of(&roots);
    Ok(TraverseStats {
        nodes_visited: stats.nodes as u32,
        max_depth: stats.max_depth as u32,
    })
}
