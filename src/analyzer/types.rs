//! Type descriptors.

use crate::clang::{Cursor, Type};
use crate::parser::TypeInfo;

/// Spelled type plus its canonical form when that reads differently.
pub fn describe_type(ty: &Type<'_>) -> TypeInfo {
    type_info(ty.spelling(), ty.canonical().spelling())
}

/// `describe_type` of the cursor's type, if it has one.
pub fn cursor_type(cursor: &Cursor<'_>) -> Option<TypeInfo> {
    let ty = cursor.ty();
    ty.is_valid().then(|| describe_type(&ty))
}

fn type_info(qual_type: String, canonical: String) -> TypeInfo {
    let desugared_qual_type = (canonical != qual_type).then_some(canonical);
    TypeInfo {
        qual_type,
        desugared_qual_type,
    }
}
