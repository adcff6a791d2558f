//! Naming & visibility resolver (spec §4.1, §6.4).
//!
//! Every function here is a pure formatter: the `needs_user_prefix`/`tmpid`
//! flags it consumes are precomputed by analysis and carried on the AST
//! node (`ast.rs` docs each field with where it comes from); this module
//! never walks scopes or re-derives visibility, it only applies the four
//! naming rules spec §6.4 fixes as contract:
//!
//! - `__u_<name>` — private user symbol
//! - bare `<name>` — pub/extern symbol
//! - `__tmp<N>` — compiler temporary
//! - `<Enum>_<Value>` — enum value, prefix rule applied to `<Enum>` only

use std::fmt::Write;
use crate::error::EmitResult;
use crate::symbol::Symbol;

/// Render a user-defined name under the private-prefix rule (§4.1).
pub fn write_prefixed(out: &mut dyn Write, name: Symbol, needs_user_prefix: bool) -> EmitResult<()> {
  if needs_user_prefix {
    out.write_str("__u_")?;
  }
  write!(out, "{name}")
}

/// Render a compiler temporary: `__tmp<N>`. Never carries the user prefix
/// regardless of `needs_user_prefix` (§4.1: "never carry the user prefix").
pub fn write_temp(out: &mut dyn Write, tmpid: u32) -> EmitResult<()> {
  debug_assert_ne!(tmpid, 0, "write_temp called with tmpid == 0 (not a temporary)");
  write!(out, "__tmp{tmpid}")
}

/// Render an identifier reference: a temporary if `tmpid != 0`, otherwise
/// the prefix rule applied to `symbol`.
pub fn write_ident(out: &mut dyn Write, symbol: Symbol, needs_user_prefix: bool, tmpid: u32) -> EmitResult<()> {
  if tmpid != 0 { write_temp(out, tmpid) } else { write_prefixed(out, symbol, needs_user_prefix) }
}

/// Render an enum value reference: `<EnumName>_<ValueName>`, prefix rule
/// applied only to the enum-name portion (§4.1).
pub fn write_enum_value(
  out: &mut dyn Write,
  enum_name: Symbol,
  enum_needs_user_prefix: bool,
  value_name: Symbol,
) -> EmitResult<()> {
  write_prefixed(out, enum_name, enum_needs_user_prefix)?;
  write!(out, "_{value_name}")
}
