//! The lowered AST this crate consumes (spec §3).
//!
//! Every node here is the *output* of an external analysis+lowering
//! pipeline (out of scope, see crate docs); this module only defines the
//! shapes and the invariants callers are contractually required to uphold
//! before calling [`crate::emit`]. The emitter never re-derives anything
//! this module's docs say is precomputed — see `src/error.rs` for what
//! happens when a node violates its contract.

use std::rc::Rc;
use bitflags::bitflags;
use crate::symbol::Symbol;

bitflags! {
  /// Visibility qualifiers on a top-level declaration (spec §3, §4.1).
  #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
  pub struct Visibility: u8 {
    /// Exported to hand-written C: no `__u_` prefix, declared in the header.
    const PUB          = 1 << 0;
    /// Linked from C: no `__u_` prefix, never declared in the header.
    const EXTERN       = 1 << 1;
    const STATIC       = 1 << 2;
    const VOLATILE     = 1 << 3;
    /// A struct/union declared but not yet defined (`typedef struct X X;`).
    const FORWARD_DECL = 1 << 4;
  }
}

impl Visibility {
  /// Whether a symbol with this visibility gets the `__u_` private prefix.
  #[must_use] pub fn needs_user_prefix(self) -> bool {
    !self.intersects(Visibility::PUB | Visibility::EXTERN)
  }
}

/// The closed set of builtin numeric/boolean/void types (spec §3).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BuiltinType {
  I8, I16, I32, I64, Isz,
  U8, U16, U32, U64, Usz,
  Bool, Void,
}

impl BuiltinType {
  #[must_use] pub fn is_signed(self) -> bool {
    matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isz)
  }

  #[must_use] pub fn is_unsigned(self) -> bool {
    matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usz)
  }

  #[must_use] pub fn is_numeric(self) -> bool { self.is_signed() || self.is_unsigned() }

  /// Bit width, for the signed/unsigned pairs that have one. `isz`/`usz`
  /// are pointer-sized and have no fixed width here.
  #[must_use] pub fn bit_width(self) -> Option<u32> {
    match self {
      Self::I8 | Self::U8 => Some(8),
      Self::I16 | Self::U16 => Some(16),
      Self::I32 | Self::U32 => Some(32),
      Self::I64 | Self::U64 => Some(64),
      Self::Isz | Self::Usz | Self::Bool | Self::Void => None,
    }
  }
}

/// A named type: either one of the closed builtins, or a user-defined
/// struct/union/enum referenced by name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NamedType {
  Builtin(BuiltinType),
  /// `needs_user_prefix` follows the same rule as identifier references
  /// (§4.1): precomputed by analysis, not re-derived here.
  User { name: Symbol, needs_user_prefix: bool },
}

/// A fully resolved type node. `Optional`/`ErrorUnion` kinds are lowered
/// away upstream and must never appear here (spec §3 invariant); there is
/// deliberately no variant for them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Type {
  Named(NamedType),
  Pointer(Box<Type>),
  /// Array of statically known size; the size literal is already
  /// constant-evaluated by the time it reaches this crate (invariant 5).
  Array(Box<Type>, u64),
  Slice(Box<Type>),
  Function(Box<Type>, Vec<Type>),
}

impl Type {
  #[must_use] pub fn builtin(b: BuiltinType) -> Self { Self::Named(NamedType::Builtin(b)) }
}

/// The builtin operator categories the dispatch tables (`dispatch.rs`) are
/// indexed by, plus the categories that never have a runtime-call form and
/// always render through the native operator-spelling map.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OpKind {
  SatAdd, SatSub, SatMul, SatDiv,
  WrapAdd, WrapSub, WrapMul, WrapDiv,
  CheckedAdd, CheckedSub, CheckedMul, CheckedDiv, CheckedMod,
  CheckedShl, CheckedShr, CheckedNeg,
  // Always-native: never present in RUNTIME_FUNCS.
  BitAnd, BitOr, BitXor, BitNot,
  Eq, Ne, Lt, Le, Gt, Ge,
  LogAnd, LogOr, LogNot,
  /// Address-of (`&x`). Special-cased in `expr.rs` when the operand is a
  /// slice index (§4.6).
  AddrOf,
}

impl OpKind {
  #[must_use] pub fn is_unary(self) -> bool {
    matches!(self, Self::CheckedNeg | Self::BitNot | Self::LogNot | Self::AddrOf)
  }
}

/// Fixed intrinsic identifiers that resolve to runtime entry points rather
/// than user or temporary symbols (§4.6).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intrinsic { Dbg, Panic, CheckDeref }

/// How a slice-construction expression's source was analyzed (§4.6).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SliceSourceKind { Array, Slice, Pointer }

/// Source location, line-only: the only locality the statement emitter's
/// `#line` directives need (§4.7, §9 "Source line directives").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Span { pub line: u32 }

#[derive(Clone, Debug)]
pub struct EnumDecl {
  pub name: Symbol,
  pub vis: Visibility,
  pub underlying: BuiltinType,
  /// Ordered list of `(value name, constant)`.
  pub values: Vec<(Symbol, i128)>,
}

#[derive(Clone, Debug)]
pub struct Field {
  pub name: Symbol,
  pub ty: Type,
  pub alignment: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct StructDecl {
  pub fields: Vec<Field>,
  pub is_packed: bool,
  pub alignment: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct UnionDecl {
  pub fields: Vec<Field>,
  /// Synthesized by the analysis pass; never null (invariant 7).
  pub tag_type: Rc<EnumDecl>,
}

#[derive(Clone, Debug)]
pub struct Param { pub name: Symbol, pub ty: Type }

#[derive(Debug)]
pub enum Expr {
  LitUInt(u64),
  LitInt(i64),
  /// Raw bytes; string literals reach this crate already lowered to array
  /// initializers *except* where the emitter renders a literal directly
  /// (invariant 6 governs where `LitStr` may appear at all).
  LitStr(Vec<u8>),
  Ident {
    symbol: Symbol,
    needs_user_prefix: bool,
    /// Non-zero-id temporaries render as `__tmp<N>` regardless of
    /// `needs_user_prefix` (§4.1).
    tmpid: u32,
    intrinsic: Option<Intrinsic>,
  },
  Binary {
    op: OpKind,
    resolved_type: BuiltinType,
    lhs: Box<Expr>,
    rhs: Box<Expr>,
  },
  Unary {
    op: OpKind,
    resolved_type: BuiltinType,
    operand: Box<Expr>,
  },
  Call { callee: Box<Expr>, args: Vec<Expr> },
  Field {
    object: Box<Expr>,
    field: Symbol,
    object_is_pointer: bool,
    /// Resolved type of *this access expression* (not necessarily the
    /// struct's declared field type): for the `ptr` field of a slice
    /// payload this is the recovered element pointer type, used by the
    /// `ptr`-field cast special case (§4.6).
    resolved_type: Type,
  },
  Index {
    object: Box<Expr>,
    index: Box<Expr>,
    is_slice_index: bool,
    /// Element type; required to recover `sizeof(T)` at slice-index sites
    /// (invariant 2).
    resolved_type: Type,
  },
  SliceConstruct {
    source: Box<Expr>,
    source_kind: SliceSourceKind,
    start: Option<Box<Expr>>,
    end: Option<Box<Expr>>,
    element_type: Type,
  },
  Cast {
    target: Type,
    operand: Box<Expr>,
    /// Resolved builtin type of the operand, when known. `None` triggers
    /// the bare-cast fallback described in spec §4.5/§9.
    source_type: Option<BuiltinType>,
  },
  StructInit {
    ty: Type,
    /// Flat `{field_name, value}` list; each value is a literal or
    /// identifier reference (invariant 8).
    fields: Vec<(Symbol, Box<Expr>)>,
  },
  ArrayInit { element_type: Type, elements: Vec<Expr> },
  EnumValue { enum_decl: Rc<EnumDecl>, value_name: Symbol },
}

#[derive(Debug)]
pub struct SwitchCase {
  /// Empty ⇒ `default:` (spec §3).
  pub values: Vec<i128>,
  pub body: Box<Stmt>,
}

#[derive(Debug)]
pub enum StmtKind {
  Decl(Box<Decl>),
  Assign { lhs: Expr, rhs: Expr },
  /// An expression evaluated only for its value, discarded; wrapped in
  /// `TICK_UNUSED(...)` on emission (§4.7).
  Unused(Expr),
  /// An expression evaluated for its side effect (e.g. a bare call).
  ExprStmt(Expr),
  Block(Vec<Stmt>),
  /// Always has both arms; earlier passes fill in an empty else-block
  /// where the source omitted one (§4.7).
  If { cond: Expr, then_branch: Box<Stmt>, else_branch: Box<Stmt> },
  For {
    init: Option<Box<Stmt>>,
    cond: Expr,
    step: Option<Box<Stmt>>,
    body: Box<Stmt>,
  },
  Switch { scrutinee: Expr, cases: Vec<SwitchCase> },
  Return(Option<Expr>),
  Break,
  Continue,
  Goto(Symbol),
  Label(Symbol),
}

#[derive(Debug)]
pub struct Stmt { pub span: Span, pub kind: StmtKind }

#[derive(Debug)]
pub enum DeclKind {
  Variable { ty: Type, init: Option<Expr> },
  /// `body: None` is a forward declaration (`Visibility::FORWARD_DECL` or
  /// `extern`); present only for definitions.
  Function { ret: Type, params: Vec<Param>, body: Option<Vec<Stmt>> },
  Struct(StructDecl),
  Enum(Rc<EnumDecl>),
  Union(UnionDecl),
}

#[derive(Debug)]
pub struct Decl {
  pub name: Symbol,
  pub vis: Visibility,
  /// Non-zero ⇒ compiler-generated; renders as `__tmp<N>`, never
  /// `__u_`-prefixed (§4.1).
  pub tmpid: u32,
  pub span: Span,
  pub kind: DeclKind,
}

/// A module: an ordered list of top-level declarations. Emission order
/// matches this order exactly (§4.8).
#[derive(Debug, Default)]
pub struct Module { pub decls: Vec<Decl> }
