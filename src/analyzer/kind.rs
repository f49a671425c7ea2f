//! Cursor kind classification.
//!
//! Maps libclang's `CXCursorKind` tags to the labels used in the output
//! tree. Labels follow clang's JSON AST dump where one exists; struct,
//! union and class declarations share `RecordDecl` and are told apart by
//! `tagUsed`.
//!
//! The table mirrors `clang-c/Index.h` of LLVM 19. Kinds added by later
//! releases are not listed and fall back to libclang's own spelling.

use crate::clang;
use crate::error::{AstError, Result};
use clang_sys::CXCursorKind;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// One row of the kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindRow {
    /// Numeric tag as libclang reports it.
    pub tag: CXCursorKind,
    /// Enumerator name in `Index.h`, without the `CXCursor_` prefix.
    pub name: &'static str,
    /// What `clang_getCursorKindSpelling` returns for this tag.
    pub spelling: &'static str,
    /// Label emitted as `kind`.
    pub label: &'static str,
}

macro_rules! cursor_kinds {
    (@spelling $name:ident) => { stringify!($name) };
    (@spelling $name:ident $spelling:literal) => { $spelling };

    ($($name:ident = $tag:literal => $label:literal $(($spelling:literal))?,)*) => {
        /// Cursor kind tags of the pinned libclang release, by enumerator name.
        #[allow(non_upper_case_globals)]
        pub mod tags {
            use clang_sys::CXCursorKind;
            $(pub const $name: CXCursorKind = $tag;)*
        }

        static KIND_TABLE: &[KindRow] = &[
            $(KindRow {
                tag: $tag,
                name: stringify!($name),
                spelling: cursor_kinds!(@spelling $name $($spelling)?),
                label: $label,
            },)*
        ];

        fn table_label(kind: CXCursorKind) -> Option<&'static str> {
            match kind {
                $($tag => Some($label),)*
                _ => None,
            }
        }
    };
}

cursor_kinds! {
    // Declarations
    UnexposedDecl = 1 => "UnexposedDecl",
    StructDecl = 2 => "RecordDecl",
    UnionDecl = 3 => "RecordDecl",
    ClassDecl = 4 => "RecordDecl",
    EnumDecl = 5 => "EnumDecl",
    FieldDecl = 6 => "FieldDecl",
    EnumConstantDecl = 7 => "EnumConstantDecl",
    FunctionDecl = 8 => "FunctionDecl",
    VarDecl = 9 => "VarDecl",
    ParmDecl = 10 => "ParmVarDecl",
    ObjCInterfaceDecl = 11 => "ObjCInterfaceDecl",
    ObjCCategoryDecl = 12 => "ObjCCategoryDecl",
    ObjCProtocolDecl = 13 => "ObjCProtocolDecl",
    ObjCPropertyDecl = 14 => "ObjCPropertyDecl",
    ObjCIvarDecl = 15 => "ObjCIvarDecl",
    ObjCInstanceMethodDecl = 16 => "ObjCMethodDecl",
    ObjCClassMethodDecl = 17 => "ObjCMethodDecl",
    ObjCImplementationDecl = 18 => "ObjCImplementationDecl",
    ObjCCategoryImplDecl = 19 => "ObjCCategoryImplDecl",
    TypedefDecl = 20 => "TypedefDecl",
    CXXMethod = 21 => "CXXMethod",
    Namespace = 22 => "NamespaceDecl",
    LinkageSpec = 23 => "LinkageSpecDecl",
    Constructor = 24 => "CXXConstructorDecl" ("CXXConstructor"),
    Destructor = 25 => "CXXDestructorDecl" ("CXXDestructor"),
    ConversionFunction = 26 => "CXXConversionDecl" ("CXXConversion"),
    TemplateTypeParameter = 27 => "TemplateTypeParmDecl",
    NonTypeTemplateParameter = 28 => "NonTypeTemplateParmDecl",
    TemplateTemplateParameter = 29 => "TemplateTemplateParmDecl",
    FunctionTemplate = 30 => "FunctionTemplateDecl",
    ClassTemplate = 31 => "ClassTemplateDecl",
    ClassTemplatePartialSpecialization = 32 => "ClassTemplatePartialSpecializationDecl",
    NamespaceAlias = 33 => "NamespaceAliasDecl",
    UsingDirective = 34 => "UsingDirectiveDecl",
    UsingDeclaration = 35 => "UsingDecl",
    TypeAliasDecl = 36 => "TypeAliasDecl",
    ObjCSynthesizeDecl = 37 => "ObjCPropertyImplDecl",
    ObjCDynamicDecl = 38 => "ObjCPropertyImplDecl",
    CXXAccessSpecifier = 39 => "AccessSpecDecl",

    // References
    ObjCSuperClassRef = 40 => "ObjCSuperClassRef",
    ObjCProtocolRef = 41 => "ObjCProtocolRef",
    ObjCClassRef = 42 => "ObjCClassRef",
    TypeRef = 43 => "TypeRef",
    CXXBaseSpecifier = 44 => "CXXBaseSpecifier" ("C++ base class specifier"),
    TemplateRef = 45 => "TemplateRef",
    NamespaceRef = 46 => "NamespaceRef",
    MemberRef = 47 => "MemberRef",
    LabelRef = 48 => "LabelRef",
    OverloadedDeclRef = 49 => "OverloadedDeclRef",
    VariableRef = 50 => "VariableRef",

    // Invalid cursors
    InvalidFile = 70 => "InvalidFile",
    NoDeclFound = 71 => "NoDeclFound",
    NotImplemented = 72 => "NotImplemented",
    InvalidCode = 73 => "InvalidCode",

    // Expressions
    UnexposedExpr = 100 => "UnexposedExpr",
    DeclRefExpr = 101 => "DeclRefExpr",
    MemberRefExpr = 102 => "MemberExpr",
    CallExpr = 103 => "CallExpr",
    ObjCMessageExpr = 104 => "ObjCMessageExpr",
    BlockExpr = 105 => "BlockExpr",
    IntegerLiteral = 106 => "IntegerLiteral",
    FloatingLiteral = 107 => "FloatingLiteral",
    ImaginaryLiteral = 108 => "ImaginaryLiteral",
    StringLiteral = 109 => "StringLiteral",
    CharacterLiteral = 110 => "CharacterLiteral",
    ParenExpr = 111 => "ParenExpr",
    UnaryOperator = 112 => "UnaryOperator",
    ArraySubscriptExpr = 113 => "ArraySubscriptExpr",
    BinaryOperator = 114 => "BinaryOperator",
    CompoundAssignOperator = 115 => "CompoundAssignOperator",
    ConditionalOperator = 116 => "ConditionalOperator",
    CStyleCastExpr = 117 => "CStyleCastExpr",
    CompoundLiteralExpr = 118 => "CompoundLiteralExpr",
    InitListExpr = 119 => "InitListExpr",
    AddrLabelExpr = 120 => "AddrLabelExpr",
    StmtExpr = 121 => "StmtExpr",
    GenericSelectionExpr = 122 => "GenericSelectionExpr",
    GNUNullExpr = 123 => "GNUNullExpr",
    CXXStaticCastExpr = 124 => "CXXStaticCastExpr",
    CXXDynamicCastExpr = 125 => "CXXDynamicCastExpr",
    CXXReinterpretCastExpr = 126 => "CXXReinterpretCastExpr",
    CXXConstCastExpr = 127 => "CXXConstCastExpr",
    CXXFunctionalCastExpr = 128 => "CXXFunctionalCastExpr",
    CXXTypeidExpr = 129 => "CXXTypeidExpr",
    CXXBoolLiteralExpr = 130 => "CXXBoolLiteralExpr",
    CXXNullPtrLiteralExpr = 131 => "CXXNullPtrLiteralExpr",
    CXXThisExpr = 132 => "CXXThisExpr",
    CXXThrowExpr = 133 => "CXXThrowExpr",
    CXXNewExpr = 134 => "CXXNewExpr",
    CXXDeleteExpr = 135 => "CXXDeleteExpr",
    UnaryExpr = 136 => "UnaryExprOrTypeTraitExpr",
    ObjCStringLiteral = 137 => "ObjCStringLiteral",
    ObjCEncodeExpr = 138 => "ObjCEncodeExpr",
    ObjCSelectorExpr = 139 => "ObjCSelectorExpr",
    ObjCProtocolExpr = 140 => "ObjCProtocolExpr",
    ObjCBridgedCastExpr = 141 => "ObjCBridgedCastExpr",
    PackExpansionExpr = 142 => "PackExpansionExpr",
    SizeOfPackExpr = 143 => "SizeOfPackExpr",
    LambdaExpr = 144 => "LambdaExpr",
    ObjCBoolLiteralExpr = 145 => "ObjCBoolLiteralExpr",
    ObjCSelfExpr = 146 => "ObjCSelfExpr",
    ArraySectionExpr = 147 => "ArraySectionExpr",
    ObjCAvailabilityCheckExpr = 148 => "ObjCAvailabilityCheckExpr",
    FixedPointLiteral = 149 => "FixedPointLiteral",
    OMPArrayShapingExpr = 150 => "OMPArrayShapingExpr",
    OMPIteratorExpr = 151 => "OMPIteratorExpr",
    CXXAddrspaceCastExpr = 152 => "CXXAddrspaceCastExpr",
    ConceptSpecializationExpr = 153 => "ConceptSpecializationExpr",
    RequiresExpr = 154 => "RequiresExpr",
    CXXParenListInitExpr = 155 => "CXXParenListInitExpr",
    PackIndexingExpr = 156 => "PackIndexingExpr",

    // Statements
    UnexposedStmt = 200 => "UnexposedStmt",
    LabelStmt = 201 => "LabelStmt",
    CompoundStmt = 202 => "CompoundStmt",
    CaseStmt = 203 => "CaseStmt",
    DefaultStmt = 204 => "DefaultStmt",
    IfStmt = 205 => "IfStmt",
    SwitchStmt = 206 => "SwitchStmt",
    WhileStmt = 207 => "WhileStmt",
    DoStmt = 208 => "DoStmt",
    ForStmt = 209 => "ForStmt",
    GotoStmt = 210 => "GotoStmt",
    IndirectGotoStmt = 211 => "IndirectGotoStmt",
    ContinueStmt = 212 => "ContinueStmt",
    BreakStmt = 213 => "BreakStmt",
    ReturnStmt = 214 => "ReturnStmt",
    GCCAsmStmt = 215 => "GCCAsmStmt",
    ObjCAtTryStmt = 216 => "ObjCAtTryStmt",
    ObjCAtCatchStmt = 217 => "ObjCAtCatchStmt",
    ObjCAtFinallyStmt = 218 => "ObjCAtFinallyStmt",
    ObjCAtThrowStmt = 219 => "ObjCAtThrowStmt",
    ObjCAtSynchronizedStmt = 220 => "ObjCAtSynchronizedStmt",
    ObjCAutoreleasePoolStmt = 221 => "ObjCAutoreleasePoolStmt",
    ObjCForCollectionStmt = 222 => "ObjCForCollectionStmt",
    CXXCatchStmt = 223 => "CXXCatchStmt",
    CXXTryStmt = 224 => "CXXTryStmt",
    CXXForRangeStmt = 225 => "CXXForRangeStmt",
    SEHTryStmt = 226 => "SEHTryStmt",
    SEHExceptStmt = 227 => "SEHExceptStmt",
    SEHFinallyStmt = 228 => "SEHFinallyStmt",
    MSAsmStmt = 229 => "MSAsmStmt",
    NullStmt = 230 => "NullStmt",
    DeclStmt = 231 => "DeclStmt",
    OMPParallelDirective = 232 => "OMPParallelDirective",
    OMPSimdDirective = 233 => "OMPSimdDirective",
    OMPForDirective = 234 => "OMPForDirective",
    OMPSectionsDirective = 235 => "OMPSectionsDirective",
    OMPSectionDirective = 236 => "OMPSectionDirective",
    OMPSingleDirective = 237 => "OMPSingleDirective",
    OMPParallelForDirective = 238 => "OMPParallelForDirective",
    OMPParallelSectionsDirective = 239 => "OMPParallelSectionsDirective",
    OMPTaskDirective = 240 => "OMPTaskDirective",
    OMPMasterDirective = 241 => "OMPMasterDirective",
    OMPCriticalDirective = 242 => "OMPCriticalDirective",
    OMPTaskyieldDirective = 243 => "OMPTaskyieldDirective",
    OMPBarrierDirective = 244 => "OMPBarrierDirective",
    OMPTaskwaitDirective = 245 => "OMPTaskwaitDirective",
    OMPFlushDirective = 246 => "OMPFlushDirective",
    SEHLeaveStmt = 247 => "SEHLeaveStmt",
    OMPOrderedDirective = 248 => "OMPOrderedDirective",
    OMPAtomicDirective = 249 => "OMPAtomicDirective",
    OMPForSimdDirective = 250 => "OMPForSimdDirective",
    OMPParallelForSimdDirective = 251 => "OMPParallelForSimdDirective",
    OMPTargetDirective = 252 => "OMPTargetDirective",
    OMPTeamsDirective = 253 => "OMPTeamsDirective",
    OMPTaskgroupDirective = 254 => "OMPTaskgroupDirective",
    OMPCancellationPointDirective = 255 => "OMPCancellationPointDirective",
    OMPCancelDirective = 256 => "OMPCancelDirective",
    OMPTargetDataDirective = 257 => "OMPTargetDataDirective",
    OMPTaskLoopDirective = 258 => "OMPTaskLoopDirective",
    OMPTaskLoopSimdDirective = 259 => "OMPTaskLoopSimdDirective",
    OMPDistributeDirective = 260 => "OMPDistributeDirective",
    OMPTargetEnterDataDirective = 261 => "OMPTargetEnterDataDirective",
    OMPTargetExitDataDirective = 262 => "OMPTargetExitDataDirective",
    OMPTargetParallelDirective = 263 => "OMPTargetParallelDirective",
    OMPTargetParallelForDirective = 264 => "OMPTargetParallelForDirective",
    OMPTargetUpdateDirective = 265 => "OMPTargetUpdateDirective",
    OMPDistributeParallelForDirective = 266 => "OMPDistributeParallelForDirective",
    OMPDistributeParallelForSimdDirective = 267 => "OMPDistributeParallelForSimdDirective",
    OMPDistributeSimdDirective = 268 => "OMPDistributeSimdDirective",
    OMPTargetParallelForSimdDirective = 269 => "OMPTargetParallelForSimdDirective",
    OMPTargetSimdDirective = 270 => "OMPTargetSimdDirective",
    OMPTeamsDistributeDirective = 271 => "OMPTeamsDistributeDirective",
    OMPTeamsDistributeSimdDirective = 272 => "OMPTeamsDistributeSimdDirective",
    OMPTeamsDistributeParallelForSimdDirective = 273 => "OMPTeamsDistributeParallelForSimdDirective",
    OMPTeamsDistributeParallelForDirective = 274 => "OMPTeamsDistributeParallelForDirective",
    OMPTargetTeamsDirective = 275 => "OMPTargetTeamsDirective",
    OMPTargetTeamsDistributeDirective = 276 => "OMPTargetTeamsDistributeDirective",
    OMPTargetTeamsDistributeParallelForDirective = 277 => "OMPTargetTeamsDistributeParallelForDirective",
    OMPTargetTeamsDistributeParallelForSimdDirective = 278 => "OMPTargetTeamsDistributeParallelForSimdDirective",
    OMPTargetTeamsDistributeSimdDirective = 279 => "OMPTargetTeamsDistributeSimdDirective",
    BuiltinBitCastExpr = 280 => "BuiltinBitCastExpr",
    OMPMasterTaskLoopDirective = 281 => "OMPMasterTaskLoopDirective",
    OMPParallelMasterTaskLoopDirective = 282 => "OMPParallelMasterTaskLoopDirective",
    OMPMasterTaskLoopSimdDirective = 283 => "OMPMasterTaskLoopSimdDirective",
    OMPParallelMasterTaskLoopSimdDirective = 284 => "OMPParallelMasterTaskLoopSimdDirective",
    OMPParallelMasterDirective = 285 => "OMPParallelMasterDirective",
    OMPDepobjDirective = 286 => "OMPDepobjDirective",
    OMPScanDirective = 287 => "OMPScanDirective",
    OMPTileDirective = 288 => "OMPTileDirective",
    OMPCanonicalLoop = 289 => "OMPCanonicalLoop",
    OMPInteropDirective = 290 => "OMPInteropDirective",
    OMPDispatchDirective = 291 => "OMPDispatchDirective",
    OMPMaskedDirective = 292 => "OMPMaskedDirective",
    OMPUnrollDirective = 293 => "OMPUnrollDirective",
    OMPMetaDirective = 294 => "OMPMetaDirective",
    OMPGenericLoopDirective = 295 => "OMPGenericLoopDirective",
    OMPTeamsGenericLoopDirective = 296 => "OMPTeamsGenericLoopDirective",
    OMPTargetTeamsGenericLoopDirective = 297 => "OMPTargetTeamsGenericLoopDirective",
    OMPParallelGenericLoopDirective = 298 => "OMPParallelGenericLoopDirective",
    OMPTargetParallelGenericLoopDirective = 299 => "OMPTargetParallelGenericLoopDirective",
    OMPParallelMaskedDirective = 300 => "OMPParallelMaskedDirective",
    OMPMaskedTaskLoopDirective = 301 => "OMPMaskedTaskLoopDirective",
    OMPMaskedTaskLoopSimdDirective = 302 => "OMPMaskedTaskLoopSimdDirective",
    OMPParallelMaskedTaskLoopDirective = 303 => "OMPParallelMaskedTaskLoopDirective",
    OMPParallelMaskedTaskLoopSimdDirective = 304 => "OMPParallelMaskedTaskLoopSimdDirective",
    OMPErrorDirective = 305 => "OMPErrorDirective",
    OMPScopeDirective = 306 => "OMPScopeDirective",
    OMPReverseDirective = 307 => "OMPReverseDirective",
    OMPInterchangeDirective = 308 => "OMPInterchangeDirective",
    OpenACCComputeConstruct = 320 => "OpenACCComputeConstruct",
    OpenACCLoopConstruct = 321 => "OpenACCLoopConstruct",

    TranslationUnit = 350 => "TranslationUnitDecl" ("TranslationUnit"),

    // Attributes
    UnexposedAttr = 400 => "UnexposedAttr",
    IBActionAttr = 401 => "IBActionAttr" ("attribute(ibaction)"),
    IBOutletAttr = 402 => "IBOutletAttr" ("attribute(iboutlet)"),
    IBOutletCollectionAttr = 403 => "IBOutletCollectionAttr" ("attribute(iboutletcollection)"),
    CXXFinalAttr = 404 => "FinalAttr" ("attribute(final)"),
    CXXOverrideAttr = 405 => "OverrideAttr" ("attribute(override)"),
    AnnotateAttr = 406 => "AnnotateAttr" ("attribute(annotate)"),
    AsmLabelAttr = 407 => "AsmLabelAttr" ("asm label"),
    PackedAttr = 408 => "PackedAttr" ("attribute(packed)"),
    PureAttr = 409 => "PureAttr" ("attribute(pure)"),
    ConstAttr = 410 => "ConstAttr" ("attribute(const)"),
    NoDuplicateAttr = 411 => "NoDuplicateAttr" ("attribute(noduplicate)"),
    CUDAConstantAttr = 412 => "CUDAConstantAttr" ("attribute(constant)"),
    CUDADeviceAttr = 413 => "CUDADeviceAttr" ("attribute(device)"),
    CUDAGlobalAttr = 414 => "CUDAGlobalAttr" ("attribute(global)"),
    CUDAHostAttr = 415 => "CUDAHostAttr" ("attribute(host)"),
    CUDASharedAttr = 416 => "CUDASharedAttr" ("attribute(shared)"),
    VisibilityAttr = 417 => "VisibilityAttr" ("attribute(visibility)"),
    DLLExport = 418 => "DLLExportAttr" ("attribute(dllexport)"),
    DLLImport = 419 => "DLLImportAttr" ("attribute(dllimport)"),
    NSReturnsRetained = 420 => "NSReturnsRetainedAttr" ("attribute(ns_returns_retained)"),
    NSReturnsNotRetained = 421 => "NSReturnsNotRetainedAttr" ("attribute(ns_returns_not_retained)"),
    NSReturnsAutoreleased = 422 => "NSReturnsAutoreleasedAttr" ("attribute(ns_returns_autoreleased)"),
    NSConsumesSelf = 423 => "NSConsumesSelfAttr" ("attribute(ns_consumes_self)"),
    NSConsumed = 424 => "NSConsumedAttr" ("attribute(ns_consumed)"),
    ObjCException = 425 => "ObjCExceptionAttr" ("attribute(objc_exception)"),
    ObjCNSObject = 426 => "ObjCNSObjectAttr" ("attribute(NSObject)"),
    ObjCIndependentClass = 427 => "ObjCIndependentClassAttr" ("attribute(objc_independent_class)"),
    ObjCPreciseLifetime = 428 => "ObjCPreciseLifetimeAttr" ("attribute(objc_precise_lifetime)"),
    ObjCReturnsInnerPointer = 429 => "ObjCReturnsInnerPointerAttr" ("attribute(objc_returns_inner_pointer)"),
    ObjCRequiresSuper = 430 => "ObjCRequiresSuperAttr" ("attribute(objc_requires_super)"),
    ObjCRootClass = 431 => "ObjCRootClassAttr" ("attribute(objc_root_class)"),
    ObjCSubclassingRestricted = 432 => "ObjCSubclassingRestrictedAttr" ("attribute(objc_subclassing_restricted)"),
    ObjCExplicitProtocolImpl = 433 => "ObjCExplicitProtocolImplAttr" ("attribute(objc_protocol_requires_explicit_implementation)"),
    ObjCDesignatedInitializer = 434 => "ObjCDesignatedInitializerAttr" ("attribute(objc_designated_initializer)"),
    ObjCRuntimeVisible = 435 => "ObjCRuntimeVisibleAttr" ("attribute(objc_runtime_visible)"),
    ObjCBoxable = 436 => "ObjCBoxableAttr" ("attribute(objc_boxable)"),
    FlagEnum = 437 => "FlagEnumAttr" ("attribute(flag_enum)"),
    ConvergentAttr = 438 => "ConvergentAttr" ("attribute(convergent)"),
    WarnUnusedAttr = 439 => "WarnUnusedAttr" ("attribute(warn_unused)"),
    WarnUnusedResultAttr = 440 => "WarnUnusedResultAttr" ("attribute(warn_unused_result)"),
    AlignedAttr = 441 => "AlignedAttr" ("attribute(aligned)"),

    // Preprocessing
    PreprocessingDirective = 500 => "PreprocessingDirective",
    MacroDefinition = 501 => "MacroDefinition" ("macro definition"),
    MacroExpansion = 502 => "MacroExpansion" ("macro expansion"),
    InclusionDirective = 503 => "InclusionDirective" ("inclusion directive"),

    // Extra declarations
    ModuleImportDecl = 600 => "ImportDecl" ("ModuleImport"),
    TypeAliasTemplateDecl = 601 => "TypeAliasTemplateDecl",
    StaticAssert = 602 => "StaticAssertDecl",
    FriendDecl = 603 => "FriendDecl",
    ConceptDecl = 604 => "ConceptDecl",

    OverloadCandidate = 700 => "OverloadCandidate",
}

/// Canonical label for `kind`, falling back to libclang's spelling for
/// tags this table doesn't know.
pub fn classify(kind: CXCursorKind) -> Cow<'static, str> {
    classify_with(kind, clang::kind_spelling)
}

fn classify_with(kind: CXCursorKind, fallback: impl FnOnce(CXCursorKind) -> String) -> Cow<'static, str> {
    match table_label(kind) {
        Some(label) => Cow::Borrowed(label),
        None => Cow::Owned(fallback(kind)),
    }
}

/// `tagUsed` for aggregate declarations.
pub fn tag_used(kind: CXCursorKind) -> Option<&'static str> {
    match kind {
        tags::StructDecl => Some("struct"),
        tags::UnionDecl => Some("union"),
        tags::ClassDecl => Some("class"),
        _ => None,
    }
}

/// Name uses and calls, the kinds that carry `referencedDecl`.
pub fn is_reference_like(kind: CXCursorKind) -> bool {
    matches!(kind, tags::DeclRefExpr | tags::CallExpr)
}

/// Every row of the table, in tag order.
pub fn kind_table() -> &'static [KindRow] {
    KIND_TABLE
}

/// Kinds whose libclang spelling anchors the filter ranges, with the LLVM
/// major release that introduced them.
const ANCHORS: &[(CXCursorKind, u32)] = &[
    (tags::OMPParallelDirective, 4),
    (tags::BuiltinBitCastExpr, 9),
    (tags::OMPArrayShapingExpr, 11),
    (tags::OMPIteratorExpr, 11),
    (tags::OMPInterchangeDirective, 19),
    (tags::OpenACCComputeConstruct, 19),
    (tags::OpenACCLoopConstruct, 19),
];

/// Release whose `Index.h` the table mirrors. Every row is a valid tag from
/// this major version on.
const PINNED_MAJOR: u32 = 19;

/// A table row libclang spells differently than expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindMismatch {
    pub tag: CXCursorKind,
    pub expected: &'static str,
    pub found: String,
}

fn row(tag: CXCursorKind) -> Option<&'static KindRow> {
    KIND_TABLE
        .binary_search_by_key(&tag, |row| row.tag)
        .ok()
        .map(|i| &KIND_TABLE[i])
}

fn table_mismatches_with<'a>(
    rows: impl IntoIterator<Item = &'a KindRow>,
    mut spell: impl FnMut(CXCursorKind) -> String,
) -> Vec<KindMismatch> {
    rows.into_iter()
        .filter_map(|row| {
            let found = spell(row.tag);
            (found != row.spelling).then(|| KindMismatch {
                tag: row.tag,
                expected: row.spelling,
                found,
            })
        })
        .collect()
}

fn parser_major_version(banner: &str) -> Option<u32> {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VERSION
        .get_or_init(|| Regex::new(r"clang version (\d+)\.").ok())
        .as_ref()?;
    re.captures(banner)?.get(1)?.as_str().parse().ok()
}

fn loaded_major() -> Option<u32> {
    let banner = clang::clang_version();
    let major = parser_major_version(&banner);
    if major.is_none() {
        debug!("unrecognised libclang version '{}'", banner);
    }
    major
}

/// Compares every row against the loaded libclang's spelling.
///
/// Older releases abort on tags they don't define, so nothing is checked
/// below the pinned major version or when the version banner is unknown.
pub fn table_mismatches() -> Vec<KindMismatch> {
    match loaded_major() {
        Some(major) if major >= PINNED_MAJOR => table_mismatches_with(KIND_TABLE, clang::kind_spelling),
        Some(major) => {
            debug!("libclang {} predates the table, full check skipped", major);
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Checks that the loaded libclang numbers the filter anchors the way the
/// table does. Other rows that disagree are logged, not fatal. Runs once per
/// process; later calls return the first result.
pub fn verify_against_parser() -> Result<()> {
    static VERIFIED: OnceLock<Option<KindMismatch>> = OnceLock::new();

    let mismatch = VERIFIED.get_or_init(|| {
        let major = loaded_major()?;

        let anchors = ANCHORS
            .iter()
            .filter(|(_, since)| major >= *since)
            .filter_map(|(tag, _)| row(*tag));
        if let Some(first) = table_mismatches_with(anchors, clang::kind_spelling).into_iter().next() {
            return Some(first);
        }

        for m in table_mismatches() {
            warn!(
                "libclang {} spells kind {} as '{}', table has '{}'",
                major, m.tag, m.found, m.expected
            );
        }
        debug!("kind table verified against libclang {}", major);
        None
    });

    match mismatch {
        None => Ok(()),
        Some(m) => Err(AstError::KindTableMismatch {
            tag: m.tag,
            expected: m.expected,
            found: m.found.clone(),
        }),
    }
}
