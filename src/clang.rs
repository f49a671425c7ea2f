//! Thin owned wrappers over the libclang handles the serializer needs.
//!
//! All `unsafe` lives here. Index and translation unit are released on
//! drop, strings are copied out and disposed immediately, and cursors
//! carry the lifetime of the translation unit they came from.

use crate::error::{AstError, Result};
use clang_sys::*;
use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::path::Path;
use std::ptr;
use tracing::trace;

/// `clang_createIndex` flags. Fixed: no PCH declaration filtering, no
/// diagnostics printed by libclang itself.
const EXCLUDE_DECLARATIONS_FROM_PCH: c_int = 0;
const DISPLAY_DIAGNOSTICS: c_int = 0;

/// Copies a `CXString` into an owned `String` and disposes it.
fn cx_string_to_string(cx_string: CXString) -> String {
    unsafe {
        let c_str = clang_getCString(cx_string);
        let result = if c_str.is_null() {
            String::new()
        } else {
            CStr::from_ptr(c_str).to_string_lossy().into_owned()
        };
        clang_disposeString(cx_string);
        result
    }
}

/// libclang's own spelling for a cursor kind.
///
/// Only call this with kinds the loaded parser knows about: libclang
/// treats an unknown tag as unreachable.
pub fn kind_spelling(kind: CXCursorKind) -> String {
    cx_string_to_string(unsafe { clang_getCursorKindSpelling(kind) })
}

/// Full version banner of the loaded libclang, e.g. `clang version 19.1.0`.
pub fn clang_version() -> String {
    cx_string_to_string(unsafe { clang_getClangVersion() })
}

/// A parser session.
pub struct Index {
    raw: CXIndex,
}

impl Index {
    pub fn new() -> Result<Self> {
        let raw = unsafe { clang_createIndex(EXCLUDE_DECLARATIONS_FROM_PCH, DISPLAY_DIAGNOSTICS) };
        if raw.is_null() {
            return Err(AstError::Session);
        }
        Ok(Self { raw })
    }
}

impl Drop for Index {
    fn drop(&mut self) {
        trace!("disposing index");
        unsafe { clang_disposeIndex(self.raw) };
    }
}

/// A parsed source file plus everything it includes.
pub struct TranslationUnit<'i> {
    raw: CXTranslationUnit,
    _index: PhantomData<&'i Index>,
}

impl<'i> TranslationUnit<'i> {
    /// Parses `path` with `args` as the compiler command line, no unsaved
    /// buffers and default options.
    pub fn parse(
        index: &'i Index,
        path: &Path,
        c_path: &CStr,
        args: &[CString],
    ) -> Result<Self> {
        let c_args: Vec<*const std::os::raw::c_char> = args.iter().map(|s| s.as_ptr()).collect();
        let mut raw: CXTranslationUnit = ptr::null_mut();

        let code = unsafe {
            clang_parseTranslationUnit2(
                index.raw,
                c_path.as_ptr(),
                c_args.as_ptr(),
                c_args.len() as c_int,
                ptr::null_mut(),
                0,
                CXTranslationUnit_None,
                &mut raw,
            )
        };

        if code != CXError_Success || raw.is_null() {
            if !raw.is_null() {
                unsafe { clang_disposeTranslationUnit(raw) };
            }
            return Err(AstError::parse(path, error_code_reason(code)));
        }

        Ok(Self {
            raw,
            _index: PhantomData,
        })
    }

    /// The root cursor of the unit.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(unsafe { clang_getTranslationUnitCursor(self.raw) })
    }
}

impl Drop for TranslationUnit<'_> {
    fn drop(&mut self) {
        trace!("disposing translation unit");
        unsafe { clang_disposeTranslationUnit(self.raw) };
    }
}

fn error_code_reason(code: CXErrorCode) -> &'static str {
    match code {
        CXError_Success => "no translation unit produced",
        CXError_Crashed => "parser crashed",
        CXError_InvalidArguments => "invalid arguments",
        CXError_ASTReadError => "AST read error",
        _ => "parser failure",
    }
}

/// Where a source location points, after macro spelling resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellingLocation {
    pub file: Option<String>,
    pub line: u32,
    pub col: u32,
    pub offset: u32,
}

fn spelling_location(location: CXSourceLocation) -> SpellingLocation {
    let mut file: CXFile = ptr::null_mut();
    let mut line = 0;
    let mut col = 0;
    let mut offset = 0;
    unsafe {
        clang_getSpellingLocation(location, &mut file, &mut line, &mut col, &mut offset);
    }

    let file = if file.is_null() {
        None
    } else {
        Some(cx_string_to_string(unsafe { clang_getFileName(file) }))
    };

    SpellingLocation {
        file,
        line,
        col,
        offset,
    }
}

/// One element of the parsed source, valid while its unit is alive.
#[derive(Clone, Copy)]
pub struct Cursor<'tu> {
    raw: CXCursor,
    _unit: PhantomData<&'tu ()>,
}

impl<'tu> Cursor<'tu> {
    fn new(raw: CXCursor) -> Self {
        Self {
            raw,
            _unit: PhantomData,
        }
    }

    pub fn is_null(&self) -> bool {
        unsafe { clang_Cursor_isNull(self.raw) != 0 }
    }

    pub fn kind(&self) -> CXCursorKind {
        unsafe { clang_getCursorKind(self.raw) }
    }

    pub fn is_objc(&self) -> bool {
        unsafe { clang_getCursorLanguage(self.raw) == CXLanguage_ObjC }
    }

    /// The USR, empty for cursors that don't name an entity.
    pub fn usr(&self) -> String {
        cx_string_to_string(unsafe { clang_getCursorUSR(self.raw) })
    }

    pub fn spelling(&self) -> String {
        cx_string_to_string(unsafe { clang_getCursorSpelling(self.raw) })
    }

    pub fn location(&self) -> SpellingLocation {
        spelling_location(unsafe { clang_getCursorLocation(self.raw) })
    }

    pub fn extent_end(&self) -> SpellingLocation {
        spelling_location(unsafe { clang_getRangeEnd(clang_getCursorExtent(self.raw)) })
    }

    pub fn ty(&self) -> Type<'tu> {
        Type::new(unsafe { clang_getCursorType(self.raw) })
    }

    /// The declaration this cursor refers to, if libclang can find one.
    pub fn referenced(&self) -> Option<Cursor<'tu>> {
        let target = Cursor::new(unsafe { clang_getCursorReferenced(self.raw) });
        let invalid = unsafe { clang_isInvalid(target.kind()) != 0 };
        if target.is_null() || invalid {
            None
        } else {
            Some(target)
        }
    }

    /// Direct children in libclang's visiting order.
    pub fn children(&self) -> Vec<Cursor<'tu>> {
        extern "C" fn collect(
            child: CXCursor,
            _parent: CXCursor,
            data: CXClientData,
        ) -> CXChildVisitResult {
            let children = unsafe { &mut *(data as *mut Vec<CXCursor>) };
            children.push(child);
            CXChildVisit_Continue
        }

        let mut children: Vec<CXCursor> = Vec::new();
        unsafe {
            clang_visitChildren(self.raw, collect, &mut children as *mut Vec<CXCursor> as CXClientData);
        }
        children.into_iter().map(Cursor::new).collect()
    }
}

/// A type handle, valid while its unit is alive.
#[derive(Clone, Copy)]
pub struct Type<'tu> {
    raw: CXType,
    _unit: PhantomData<&'tu ()>,
}

impl<'tu> Type<'tu> {
    fn new(raw: CXType) -> Self {
        Self {
            raw,
            _unit: PhantomData,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.raw.kind != CXType_Invalid
    }

    pub fn spelling(&self) -> String {
        cx_string_to_string(unsafe { clang_getTypeSpelling(self.raw) })
    }

    pub fn canonical(&self) -> Type<'tu> {
        Type::new(unsafe { clang_getCanonicalType(self.raw) })
    }
}
