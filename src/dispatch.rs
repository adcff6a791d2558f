//! The operator-to-runtime-function dispatch tables (spec §4.4).
//!
//! Two sparse 2-D tables bridge source operators to the runtime ABI:
//! `RUNTIME_FUNCS[op][type]` for arithmetic/shift/negation, and
//! `CAST_FUNCS[src][dst]` for narrowing/sign-change casts. Both are
//! expressed as total `match`es over the closed `OpKind`/`BuiltinType`
//! enums rather than literal 2-D arrays, the same way `mmcc` prefers
//! exhaustive matches over primitive enums to closed sets
//! (`entity.rs`'s `make_prims!`-generated `from_str`/`as_symbol` are each a
//! total match over a fixed enum). Spec §9 explicitly allows either
//! representation; the contract is only that an absent cell has the
//! defined meaning below, never "forgot to add a row".

use crate::ast::{BuiltinType, OpKind};

/// Lowercase runtime type suffix (`i8`, `u32`, …), identical to the
/// spellings the runtime header uses (§4.2).
#[must_use] pub fn type_suffix(ty: BuiltinType) -> &'static str {
  match ty {
    BuiltinType::I8 => "i8", BuiltinType::I16 => "i16",
    BuiltinType::I32 => "i32", BuiltinType::I64 => "i64", BuiltinType::Isz => "isz",
    BuiltinType::U8 => "u8", BuiltinType::U16 => "u16",
    BuiltinType::U32 => "u32", BuiltinType::U64 => "u64", BuiltinType::Usz => "usz",
    BuiltinType::Bool => "bool", BuiltinType::Void => "void",
  }
}

macro_rules! runtime_fn {
  ($prefix:literal, $ty:expr) => {{
    let t = $ty;
    Some(match t {
      BuiltinType::I8 => concat!($prefix, "_i8"), BuiltinType::I16 => concat!($prefix, "_i16"),
      BuiltinType::I32 => concat!($prefix, "_i32"), BuiltinType::I64 => concat!($prefix, "_i64"),
      BuiltinType::Isz => concat!($prefix, "_isz"),
      BuiltinType::U8 => concat!($prefix, "_u8"), BuiltinType::U16 => concat!($prefix, "_u16"),
      BuiltinType::U32 => concat!($prefix, "_u32"), BuiltinType::U64 => concat!($prefix, "_u64"),
      BuiltinType::Usz => concat!($prefix, "_usz"),
      BuiltinType::Bool | BuiltinType::Void =>
        crate::error::bug!("non-numeric type {t:?} reached the arithmetic dispatch table"),
    })
  }};
}

/// `RUNTIME_FUNCS[op][type]` (spec §4.4.1). `None` means "emit the native C
/// operator"; every `None` case below is one of the three defined-absence
/// rules, not an omission.
#[must_use] pub fn runtime_func(op: OpKind, ty: BuiltinType) -> Option<&'static str> {
  use OpKind::{
    SatAdd, SatSub, SatMul, SatDiv,
    WrapAdd, WrapSub, WrapMul, WrapDiv,
    CheckedAdd, CheckedSub, CheckedMul, CheckedDiv, CheckedMod,
    CheckedShl, CheckedShr, CheckedNeg,
  };
  match op {
    // Saturating ops are defined (and checked) for every numeric type.
    SatAdd => runtime_fn!("tick_sat_add", ty),
    SatSub => runtime_fn!("tick_sat_sub", ty),
    SatMul => runtime_fn!("tick_sat_mul", ty),
    SatDiv => runtime_fn!("tick_sat_div", ty),

    // Wrapping: unsigned C arithmetic is already modular, so unsigned rows
    // are absent and the native operator is used directly.
    WrapAdd if ty.is_unsigned() => None,
    WrapAdd => runtime_fn!("tick_wrap_add", ty),
    WrapSub if ty.is_unsigned() => None,
    WrapSub => runtime_fn!("tick_wrap_sub", ty),
    WrapMul if ty.is_unsigned() => None,
    WrapMul => runtime_fn!("tick_wrap_mul", ty),
    WrapDiv if ty.is_unsigned() => None,
    WrapDiv => runtime_fn!("tick_wrap_div", ty),

    // Checked add/sub/mul: unsigned can never overflow at the language
    // level, so these route to the wrap entry (documents "no overflow
    // possible", doesn't re-check it) rather than having their own cell.
    CheckedAdd if ty.is_unsigned() => runtime_fn!("tick_wrap_add", ty),
    CheckedAdd => runtime_fn!("tick_checked_add", ty),
    CheckedSub if ty.is_unsigned() => runtime_fn!("tick_wrap_sub", ty),
    CheckedSub => runtime_fn!("tick_checked_sub", ty),
    CheckedMul if ty.is_unsigned() => runtime_fn!("tick_wrap_mul", ty),
    CheckedMul => runtime_fn!("tick_checked_mul", ty),

    // Division/modulo/shift are checked (div-by-zero, shift amount range)
    // for both signednesses; there is no wrap/sat variant of these.
    CheckedDiv => runtime_fn!("tick_checked_div", ty),
    CheckedMod => runtime_fn!("tick_checked_mod", ty),
    CheckedShl => runtime_fn!("tick_checked_shl", ty),
    CheckedShr => runtime_fn!("tick_checked_shr", ty),

    // Unsigned negation has no cell at all: the source language never
    // produces it, so reaching this combination is an invariant violation,
    // not a fallback-to-native case (§4.4 item 1, "the emitter must never
    // emit unsigned negation").
    CheckedNeg if ty.is_unsigned() => None,
    CheckedNeg => runtime_fn!("tick_checked_neg", ty),

    _ => crate::error::bug!("{op:?} is not an arithmetic/shift/negation op kind"),
  }
}

/// Numeric rank used only to compare widths within a signedness class; 64-
/// bit and pointer-sized (`isz`/`usz`) share a rank since this backend
/// targets 64-bit hosts, matching the runtime header's type aliases.
fn rank(ty: BuiltinType) -> u8 {
  match ty {
    BuiltinType::I8 | BuiltinType::U8 => 0,
    BuiltinType::I16 | BuiltinType::U16 => 1,
    BuiltinType::I32 | BuiltinType::U32 => 2,
    BuiltinType::I64 | BuiltinType::U64 | BuiltinType::Isz | BuiltinType::Usz => 3,
    BuiltinType::Bool | BuiltinType::Void =>
      crate::error::bug!("non-numeric type {ty:?} reached the cast dispatch table"),
  }
}

/// The widening-cast predicate (spec §4.4 item 3): true iff `(src, dst)` is
/// value-preserving and so never needs a runtime check.
#[must_use] pub fn is_widening(src: BuiltinType, dst: BuiltinType) -> bool {
  match (src.is_signed(), dst.is_signed()) {
    (true, true) | (false, false) => rank(dst) >= rank(src),
    (false, true) => rank(dst) > rank(src),
    (true, false) => false,
  }
}

/// `CAST_FUNCS[src][dst]` (spec §4.4.2). `None` ⇒ a plain `(T)expr` is
/// well-defined; `Some(f)` ⇒ emit `f(expr)`, a runtime function that
/// panics on out-of-range input.
#[must_use] pub fn cast_func(src: BuiltinType, dst: BuiltinType) -> Option<&'static str> {
  if src == dst || is_widening(src, dst) { return None }
  Some(match (src, dst) {
    (BuiltinType::I8, BuiltinType::I16) => "tick_checked_cast_i8_i16",
    (BuiltinType::I8, BuiltinType::I32) => "tick_checked_cast_i8_i32",
    (BuiltinType::I8, BuiltinType::I64) => "tick_checked_cast_i8_i64",
    (BuiltinType::I8, BuiltinType::Isz) => "tick_checked_cast_i8_isz",
    (BuiltinType::I8, BuiltinType::U8) => "tick_checked_cast_i8_u8",
    (BuiltinType::I8, BuiltinType::U16) => "tick_checked_cast_i8_u16",
    (BuiltinType::I8, BuiltinType::U32) => "tick_checked_cast_i8_u32",
    (BuiltinType::I8, BuiltinType::U64) => "tick_checked_cast_i8_u64",
    (BuiltinType::I8, BuiltinType::Usz) => "tick_checked_cast_i8_usz",

    (BuiltinType::I16, BuiltinType::I8) => "tick_checked_cast_i16_i8",
    (BuiltinType::I16, BuiltinType::U8) => "tick_checked_cast_i16_u8",
    (BuiltinType::I16, BuiltinType::U16) => "tick_checked_cast_i16_u16",
    (BuiltinType::I16, BuiltinType::U32) => "tick_checked_cast_i16_u32",
    (BuiltinType::I16, BuiltinType::U64) => "tick_checked_cast_i16_u64",
    (BuiltinType::I16, BuiltinType::Usz) => "tick_checked_cast_i16_usz",

    (BuiltinType::I32, BuiltinType::I8) => "tick_checked_cast_i32_i8",
    (BuiltinType::I32, BuiltinType::I16) => "tick_checked_cast_i32_i16",
    (BuiltinType::I32, BuiltinType::U8) => "tick_checked_cast_i32_u8",
    (BuiltinType::I32, BuiltinType::U16) => "tick_checked_cast_i32_u16",
    (BuiltinType::I32, BuiltinType::U32) => "tick_checked_cast_i32_u32",
    (BuiltinType::I32, BuiltinType::U64) => "tick_checked_cast_i32_u64",
    (BuiltinType::I32, BuiltinType::Usz) => "tick_checked_cast_i32_usz",

    (BuiltinType::I64, BuiltinType::I8) => "tick_checked_cast_i64_i8",
    (BuiltinType::I64, BuiltinType::I16) => "tick_checked_cast_i64_i16",
    (BuiltinType::I64, BuiltinType::I32) => "tick_checked_cast_i64_i32",
    (BuiltinType::I64, BuiltinType::U8) => "tick_checked_cast_i64_u8",
    (BuiltinType::I64, BuiltinType::U16) => "tick_checked_cast_i64_u16",
    (BuiltinType::I64, BuiltinType::U32) => "tick_checked_cast_i64_u32",
    (BuiltinType::I64, BuiltinType::U64) => "tick_checked_cast_i64_u64",
    (BuiltinType::I64, BuiltinType::Usz) => "tick_checked_cast_i64_usz",

    (BuiltinType::Isz, BuiltinType::I8) => "tick_checked_cast_isz_i8",
    (BuiltinType::Isz, BuiltinType::I16) => "tick_checked_cast_isz_i16",
    (BuiltinType::Isz, BuiltinType::I32) => "tick_checked_cast_isz_i32",
    (BuiltinType::Isz, BuiltinType::U8) => "tick_checked_cast_isz_u8",
    (BuiltinType::Isz, BuiltinType::U16) => "tick_checked_cast_isz_u16",
    (BuiltinType::Isz, BuiltinType::U32) => "tick_checked_cast_isz_u32",
    (BuiltinType::Isz, BuiltinType::U64) => "tick_checked_cast_isz_u64",
    (BuiltinType::Isz, BuiltinType::Usz) => "tick_checked_cast_isz_usz",

    (BuiltinType::U8, BuiltinType::I8) => "tick_checked_cast_u8_i8",
    (BuiltinType::U8, BuiltinType::I16) => "tick_checked_cast_u8_i16",
    (BuiltinType::U8, BuiltinType::I32) => "tick_checked_cast_u8_i32",
    (BuiltinType::U8, BuiltinType::I64) => "tick_checked_cast_u8_i64",
    (BuiltinType::U8, BuiltinType::Isz) => "tick_checked_cast_u8_isz",

    (BuiltinType::U16, BuiltinType::I8) => "tick_checked_cast_u16_i8",
    (BuiltinType::U16, BuiltinType::I16) => "tick_checked_cast_u16_i16",
    (BuiltinType::U16, BuiltinType::I32) => "tick_checked_cast_u16_i32",
    (BuiltinType::U16, BuiltinType::I64) => "tick_checked_cast_u16_i64",
    (BuiltinType::U16, BuiltinType::Isz) => "tick_checked_cast_u16_isz",
    (BuiltinType::U16, BuiltinType::U8) => "tick_checked_cast_u16_u8",

    (BuiltinType::U32, BuiltinType::I8) => "tick_checked_cast_u32_i8",
    (BuiltinType::U32, BuiltinType::I16) => "tick_checked_cast_u32_i16",
    (BuiltinType::U32, BuiltinType::I32) => "tick_checked_cast_u32_i32",
    (BuiltinType::U32, BuiltinType::I64) => "tick_checked_cast_u32_i64",
    (BuiltinType::U32, BuiltinType::Isz) => "tick_checked_cast_u32_isz",
    (BuiltinType::U32, BuiltinType::U8) => "tick_checked_cast_u32_u8",
    (BuiltinType::U32, BuiltinType::U16) => "tick_checked_cast_u32_u16",

    (BuiltinType::U64, BuiltinType::I8) => "tick_checked_cast_u64_i8",
    (BuiltinType::U64, BuiltinType::I16) => "tick_checked_cast_u64_i16",
    (BuiltinType::U64, BuiltinType::I32) => "tick_checked_cast_u64_i32",
    (BuiltinType::U64, BuiltinType::I64) => "tick_checked_cast_u64_i64",
    (BuiltinType::U64, BuiltinType::Isz) => "tick_checked_cast_u64_isz",
    (BuiltinType::U64, BuiltinType::U8) => "tick_checked_cast_u64_u8",
    (BuiltinType::U64, BuiltinType::U16) => "tick_checked_cast_u64_u16",
    (BuiltinType::U64, BuiltinType::U32) => "tick_checked_cast_u64_u32",

    (BuiltinType::Usz, BuiltinType::I8) => "tick_checked_cast_usz_i8",
    (BuiltinType::Usz, BuiltinType::I16) => "tick_checked_cast_usz_i16",
    (BuiltinType::Usz, BuiltinType::I32) => "tick_checked_cast_usz_i32",
    (BuiltinType::Usz, BuiltinType::I64) => "tick_checked_cast_usz_i64",
    (BuiltinType::Usz, BuiltinType::Isz) => "tick_checked_cast_usz_isz",
    (BuiltinType::Usz, BuiltinType::U8) => "tick_checked_cast_usz_u8",
    (BuiltinType::Usz, BuiltinType::U16) => "tick_checked_cast_usz_u16",
    (BuiltinType::Usz, BuiltinType::U32) => "tick_checked_cast_usz_u32",

    (s, d) if s == d => crate::error::bug!("cast_func called with src == dst ({s:?})"),
    (s, d) => crate::error::bug!(
      "no cast table entry for ({s:?}, {d:?}) and is_widening disagreed with the table"
    ),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use BuiltinType::{I32, I8, U32, U8, Isz};

  #[test]
  fn checked_add_signed_is_checked() {
    assert_eq!(runtime_func(OpKind::CheckedAdd, I32), Some("tick_checked_add_i32"));
  }

  #[test]
  fn checked_add_unsigned_routes_to_wrap() {
    assert_eq!(runtime_func(OpKind::CheckedAdd, U32), Some("tick_wrap_add_u32"));
  }

  #[test]
  fn wrap_add_unsigned_is_absent() {
    assert_eq!(runtime_func(OpKind::WrapAdd, U32), None);
  }

  #[test]
  fn checked_neg_unsigned_is_absent() {
    assert_eq!(runtime_func(OpKind::CheckedNeg, U32), None);
  }

  #[test]
  fn checked_neg_signed_is_present() {
    assert_eq!(runtime_func(OpKind::CheckedNeg, I32), Some("tick_checked_neg_i32"));
  }

  #[test]
  fn narrowing_cast_uses_table() {
    assert_eq!(cast_func(I32, I8), Some("tick_checked_cast_i32_i8"));
  }

  #[test]
  fn widening_cast_is_absent() {
    assert_eq!(cast_func(I8, I32), None);
    assert_eq!(cast_func(U8, I32), None);
    assert_eq!(cast_func(U8, Isz), None);
  }

  #[test]
  fn same_width_sign_change_is_checked() {
    assert_eq!(cast_func(I32, U32), Some("tick_checked_cast_i32_u32"));
  }

  #[test]
  fn signed_to_unsigned_never_widens() {
    assert!(!is_widening(I32, U32));
    assert!(!is_widening(I8, U32));
  }
}
