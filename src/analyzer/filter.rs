//! Which cursors never make it into the tree.
//!
//! Skipping a cursor cuts its whole subtree. Two pragma families are
//! excluded (OpenMP and OpenACC), and so is anything Objective-C.

use super::kind::tags;
use crate::clang::Cursor;
use clang_sys::CXCursorKind;
use std::ops::RangeInclusive;

/// OpenMP directives. The range also spans two unrelated statement kinds
/// that libclang numbered in between; see `RANGE_EXEMPT`.
pub const OPENMP_DIRECTIVES: RangeInclusive<CXCursorKind> =
    tags::OMPParallelDirective..=tags::OMPInterchangeDirective;

/// OpenMP expressions living outside the directive range.
pub const OPENMP_EXPRESSIONS: [CXCursorKind; 3] = [
    tags::ArraySectionExpr,
    tags::OMPArrayShapingExpr,
    tags::OMPIteratorExpr,
];

/// OpenACC constructs.
pub const OPENACC_CONSTRUCTS: RangeInclusive<CXCursorKind> =
    tags::OpenACCComputeConstruct..=tags::OpenACCLoopConstruct;

/// Kinds inside `OPENMP_DIRECTIVES` that are kept.
pub const RANGE_EXEMPT: [CXCursorKind; 2] = [tags::BuiltinBitCastExpr, tags::SEHLeaveStmt];

const _: () = {
    assert!(tags::OMPParallelDirective < tags::SEHLeaveStmt);
    assert!(tags::SEHLeaveStmt < tags::BuiltinBitCastExpr);
    assert!(tags::BuiltinBitCastExpr < tags::OMPInterchangeDirective);
    assert!(tags::OMPInterchangeDirective < tags::OpenACCComputeConstruct);
    assert!(tags::OpenACCComputeConstruct <= tags::OpenACCLoopConstruct);
};

/// True when a cursor of this kind must be dropped with its subtree.
pub fn is_excluded_kind(kind: CXCursorKind) -> bool {
    if RANGE_EXEMPT.contains(&kind) {
        return false;
    }
    OPENMP_DIRECTIVES.contains(&kind)
        || OPENMP_EXPRESSIONS.contains(&kind)
        || OPENACC_CONSTRUCTS.contains(&kind)
}

/// Kind and language checks together.
pub fn is_excluded(cursor: &Cursor<'_>) -> bool {
    is_excluded_kind(cursor.kind()) || cursor.is_objc()
}
