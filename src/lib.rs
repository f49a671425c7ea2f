pub mod clang;
pub mod error;
pub mod parser;
#[cfg(feature = "node")]
pub mod bridge;
pub mod analyzer {
    pub mod filter;
    pub mod kind;
    pub mod location;
    pub mod project;
    pub mod reference;
    pub mod serialize;
    pub mod types;
}

// Re-export selected API for consumers
pub use error::{AstError, Result};
pub use parser::{build_tree, to_json, traverse_ast, Location, Node, ReferenceSummary, TreeStats, TypeInfo};
