//! Expression emitter (spec §4.6): dispatches on AST node kind, consulting
//! the dispatch tables (`dispatch.rs`) to choose between a native C
//! operator and a runtime call, and handling the handful of shapes that
//! need out-of-band element typing (slice indexing/construction, the
//! `ptr`-field cast) because the runtime slice representation itself
//! erases element type (`ty_emit::SLICE_TYPE_NAME`).

use std::fmt::Write;
use crate::ast::{BuiltinType, Expr, Intrinsic, OpKind, SliceSourceKind, Type};
use crate::cast::{cast_strategy, CastStrategy};
use crate::dispatch::runtime_func;
use crate::error::{bug, EmitResult};
use crate::naming::{write_enum_value, write_ident};
use if_chain::if_chain;
use itertools::Itertools as _;
use crate::symbol::Symbol;
use crate::ty_emit::{render_type, write_sizeof};

/// Render `e` to an owned `String`. Most call sites need the text of a
/// sub-expression before deciding how to wrap it (a cast, a call
/// argument), so this is the workhorse entry point; [`write_expr`] just
/// forwards into the active sink.
#[must_use] pub fn render_expr(e: &Expr) -> String {
  let mut s = String::new();
  write_expr(&mut s, e).unwrap_or_else(|_| bug!("write to String cannot fail"));
  s
}

pub fn write_expr(out: &mut dyn Write, e: &Expr) -> EmitResult<()> {
  match e {
    Expr::LitUInt(n) => write!(out, "{n}"),
    Expr::LitInt(n) => write!(out, "{n}"),
    Expr::LitStr(bytes) => write_c_string_literal(out, bytes),
    Expr::Ident { symbol, needs_user_prefix, tmpid, intrinsic } =>
      write_ident_expr(out, *symbol, *needs_user_prefix, *tmpid, *intrinsic),
    Expr::Binary { op, resolved_type, lhs, rhs } => write_binary(out, *op, *resolved_type, lhs, rhs),
    Expr::Unary { op, resolved_type, operand } => write_unary(out, *op, *resolved_type, operand),
    Expr::Call { callee, args } => write_call(out, callee, args),
    Expr::Field { object, field, object_is_pointer, resolved_type } =>
      write_field(out, object, *field, *object_is_pointer, resolved_type),
    Expr::Index { object, index, is_slice_index, resolved_type } =>
      write_index(out, object, index, *is_slice_index, resolved_type),
    Expr::SliceConstruct { source, source_kind, start, end, element_type } =>
      write_slice_construct(out, source, *source_kind, start.as_deref(), end.as_deref(), element_type),
    Expr::Cast { target, operand, source_type } => write_cast(out, target, operand, *source_type),
    Expr::StructInit { ty, fields } => write_struct_init(out, ty, fields),
    Expr::ArrayInit { elements, .. } => write_array_init(out, elements),
    Expr::EnumValue { enum_decl, value_name } =>
      write_enum_value(out, enum_decl.name, enum_decl.vis.needs_user_prefix(), *value_name),
  }
}

fn write_ident_expr(
  out: &mut dyn Write,
  symbol: Symbol,
  needs_user_prefix: bool,
  tmpid: u32,
  intrinsic: Option<Intrinsic>,
) -> EmitResult<()> {
  if let Some(i) = intrinsic {
    return out.write_str(match i {
      Intrinsic::Dbg => "tick_debug_log",
      Intrinsic::Panic => "tick_panic",
      Intrinsic::CheckDeref => "tick_check_deref",
    })
  }
  write_ident(out, symbol, needs_user_prefix, tmpid)
}

/// The escape policy is explicit, not delegated to a host library (spec §9
/// "String literal escaping"): named escapes for NL/CR/TAB/backslash/
/// double-quote/NUL, printable ASCII verbatim, `\xNN` for everything else.
fn write_c_string_literal(out: &mut dyn Write, bytes: &[u8]) -> EmitResult<()> {
  out.write_char('"')?;
  for &b in bytes {
    match b {
      b'\n' => out.write_str("\\n")?,
      b'\r' => out.write_str("\\r")?,
      b'\t' => out.write_str("\\t")?,
      b'\\' => out.write_str("\\\\")?,
      b'"' => out.write_str("\\\"")?,
      0 => out.write_str("\\0")?,
      0x20..=0x7e => out.write_char(b as char)?,
      _ => write!(out, "\\x{b:02x}")?,
    }
  }
  out.write_char('"')
}

/// The native C spelling for an operator category, used whenever the
/// dispatch table has no runtime-call entry for this `(op, type)` pair.
/// A total match: every `OpKind` has *some* native spelling, even the ones
/// (`CheckedMod`, `CheckedShl`, …) whose table row is never actually
/// absent — matching spec §9's "the dispatch in §4.6/§4.7 must be a total
/// match" for the AST node kinds, carried over to this closed enum too.
fn op_spelling(op: OpKind) -> &'static str {
  use OpKind::{
    SatAdd, SatSub, SatMul, SatDiv, WrapAdd, WrapSub, WrapMul, WrapDiv,
    CheckedAdd, CheckedSub, CheckedMul, CheckedDiv, CheckedMod, CheckedShl, CheckedShr, CheckedNeg,
    BitAnd, BitOr, BitXor, BitNot, Eq, Ne, Lt, Le, Gt, Ge, LogAnd, LogOr, LogNot, AddrOf,
  };
  match op {
    SatAdd | WrapAdd | CheckedAdd => "+",
    SatSub | WrapSub | CheckedSub => "-",
    SatMul | WrapMul | CheckedMul => "*",
    SatDiv | WrapDiv | CheckedDiv => "/",
    CheckedMod => "%",
    CheckedShl => "<<",
    CheckedShr => ">>",
    CheckedNeg => "-",
    BitAnd => "&", BitOr => "|", BitXor => "^", BitNot => "~",
    Eq => "==", Ne => "!=", Lt => "<", Le => "<=", Gt => ">", Ge => ">=",
    LogAnd => "&&", LogOr => "||", LogNot => "!",
    AddrOf => "&",
  }
}

fn write_binary(out: &mut dyn Write, op: OpKind, ty: BuiltinType, lhs: &Expr, rhs: &Expr) -> EmitResult<()> {
  if let Some(f) = runtime_func_for(op, ty) {
    write!(out, "{f}({}, {})", render_expr(lhs), render_expr(rhs))
  } else {
    write!(out, "({} {} {})", render_expr(lhs), op_spelling(op), render_expr(rhs))
  }
}

fn write_unary(out: &mut dyn Write, op: OpKind, ty: BuiltinType, operand: &Expr) -> EmitResult<()> {
  if op == OpKind::AddrOf {
    return write_addr_of(out, operand)
  }
  if let Some(f) = runtime_func_for(op, ty) {
    write!(out, "{f}({})", render_expr(operand))
  } else {
    write!(out, "({}{})", op_spelling(op), render_expr(operand))
  }
}

/// Looks up the dispatch table, but first enforces spec §4.4's one
/// fatal-not-fallback absence: unsigned `CHECKED_NEG` must never be
/// requested at all ("the emitter must never emit unsigned negation"),
/// so reaching it here is an upstream invariant violation, not a signal
/// to fall back to the native `-` operator (which would silently emit
/// exactly the thing the contract forbids).
fn runtime_func_for(op: OpKind, ty: BuiltinType) -> Option<&'static str> {
  if op == OpKind::CheckedNeg && ty.is_unsigned() {
    bug!("unsigned negation requested on {ty:?}; the source language never allows this")
  }
  if matches!(op,
    OpKind::SatAdd | OpKind::SatSub | OpKind::SatMul | OpKind::SatDiv
    | OpKind::WrapAdd | OpKind::WrapSub | OpKind::WrapMul | OpKind::WrapDiv
    | OpKind::CheckedAdd | OpKind::CheckedSub | OpKind::CheckedMul | OpKind::CheckedDiv
    | OpKind::CheckedMod | OpKind::CheckedShl | OpKind::CheckedShr | OpKind::CheckedNeg
  ) {
    runtime_func(op, ty)
  } else {
    None
  }
}

fn write_addr_of(out: &mut dyn Write, operand: &Expr) -> EmitResult<()> {
  if let Expr::Index { object, index, is_slice_index: true, resolved_type } = operand {
    // `&` and the slice index's own dereference cancel; emit the pointer
    // expression directly instead of `&*ptr` (spec §4.6 special case).
    return write_slice_index_ptr(out, object, index, resolved_type)
  }
  write!(out, "(&{})", render_expr(operand))
}

fn write_call(out: &mut dyn Write, callee: &Expr, args: &[Expr]) -> EmitResult<()> {
  let wants_format_string = matches!(
    callee,
    Expr::Ident { intrinsic: Some(Intrinsic::Dbg | Intrinsic::Panic), .. }
  );
  write_expr(out, callee)?;
  out.write_char('(')?;
  let rendered = args.iter().enumerate().map(|(i, a)| {
    if i == 0 && wants_format_string {
      format!("(const char*){}", render_expr(a))
    } else {
      render_expr(a)
    }
  });
  out.write_str(&rendered.join(", "))?;
  out.write_char(')')
}

fn write_field(
  out: &mut dyn Write,
  object: &Expr,
  field: Symbol,
  object_is_pointer: bool,
  resolved_type: &Type,
) -> EmitResult<()> {
  let accessor = if object_is_pointer { "->" } else { "." };
  let core = format!("({}){accessor}{field}", render_expr(object));
  if_chain! {
    if field.with_str(|s| s == "ptr");
    if let Type::Pointer(pointee) = resolved_type;
    then { write!(out, "({}*)({core})", render_type(pointee)) }
    else { out.write_str(&core) }
  }
}

/// `(T*)tick_slice_index_ptr(s, i, sizeof(T))`, without the leading `*` —
/// shared by plain slice indexing (which adds the `*`) and the `&s[i]`
/// special case (which doesn't).
fn write_slice_index_ptr(out: &mut dyn Write, object: &Expr, index: &Expr, elem_ty: &Type) -> EmitResult<()> {
  write!(out, "({}*)tick_slice_index_ptr({}, {}, ", render_type(elem_ty), render_expr(object), render_expr(index))?;
  write_sizeof(out, elem_ty)?;
  out.write_char(')')
}

fn write_index(out: &mut dyn Write, object: &Expr, index: &Expr, is_slice_index: bool, resolved_type: &Type) -> EmitResult<()> {
  if is_slice_index {
    out.write_char('*')?;
    write_slice_index_ptr(out, object, index, resolved_type)
  } else {
    write!(out, "({})[{}]", render_expr(object), render_expr(index))
  }
}

fn write_slice_construct(
  out: &mut dyn Write,
  source: &Expr,
  kind: SliceSourceKind,
  start: Option<&Expr>,
  end: Option<&Expr>,
  element_type: &Type,
) -> EmitResult<()> {
  let start_text = start.map_or_else(|| "0".to_owned(), render_expr);
  match kind {
    SliceSourceKind::Array => {
      let arr = render_expr(source);
      let len_expr = format!("sizeof({arr})/sizeof({arr}[0])");
      let end_text = end.map_or_else(|| len_expr.clone(), render_expr);
      write!(out, "tick_slice_from_array({arr}, {len_expr}, {start_text}, {end_text}, ")?;
      write_sizeof(out, element_type)?;
      out.write_char(')')
    }
    SliceSourceKind::Slice => {
      let s = render_expr(source);
      let end_text = end.map_or_else(|| format!("{s}.len"), render_expr);
      write!(out, "tick_slice_from_slice({s}, {start_text}, {end_text}, ")?;
      write_sizeof(out, element_type)?;
      out.write_char(')')
    }
    SliceSourceKind::Pointer => {
      let Some(end) = end else {
        bug!("pointer-sourced slice construction with no end bound (spec §4.6 invariant)")
      };
      write!(out, "tick_slice_from_ptr({}, {start_text}, {}, ", render_expr(source), render_expr(end))?;
      write_sizeof(out, element_type)?;
      out.write_char(')')
    }
  }
}

fn write_cast(out: &mut dyn Write, target: &Type, operand: &Expr, source_type: Option<BuiltinType>) -> EmitResult<()> {
  let Type::Named(crate::ast::NamedType::Builtin(dst)) = target else {
    // Non-numeric cast targets (e.g. pointer reinterpretation) always
    // have provably-safe plain-cast semantics; the dispatch tables only
    // cover numeric-to-numeric narrowing/sign-change (spec §4.4).
    return write!(out, "({})({})", render_type(target), render_expr(operand))
  };
  match cast_strategy(source_type, *dst) {
    CastStrategy::Bare => write!(out, "({})({})", render_type(target), render_expr(operand)),
    CastStrategy::RuntimeCall(f) => write!(out, "{f}({})", render_expr(operand)),
  }
}

fn write_struct_init(out: &mut dyn Write, ty: &Type, fields: &[(Symbol, Box<Expr>)]) -> EmitResult<()> {
  write!(out, "({}){{ ", render_type(ty))?;
  for (i, (name, value)) in fields.iter().enumerate() {
    if i > 0 { out.write_str(", ")?; }
    debug_assert!(
      matches!(**value, Expr::LitUInt(_) | Expr::LitInt(_) | Expr::LitStr(_) | Expr::Ident { .. }),
      "struct-initializer field values must be literals or identifier references (invariant 8)",
    );
    write!(out, ".{name} = {}", render_expr(value))?;
  }
  out.write_str(" }")
}

fn write_array_init(out: &mut dyn Write, elements: &[Expr]) -> EmitResult<()> {
  out.write_str("{ ")?;
  for (i, e) in elements.iter().enumerate() {
    if i > 0 { out.write_str(", ")?; }
    write_expr(out, e)?;
  }
  out.write_str(" }")
}
