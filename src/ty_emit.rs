//! Type emitter (spec §4.2): renders the portion of a C type that comes
//! before a declarator's name. Array brackets and the pointer-to-array /
//! function-pointer parenthesization live in `declarator.rs` instead —
//! this module only ever emits a type that reads correctly standing
//! alone (e.g. inside a cast or `sizeof`).

use std::fmt::Write;
use crate::ast::{BuiltinType, NamedType, Type};
use crate::dispatch::type_suffix;
use crate::error::EmitResult;
use crate::naming::write_prefixed;

/// The runtime's slice representation (`{void* ptr; usz len}`, §4.2,
/// §6.3); element typing is recovered out-of-band at index/construction
/// sites, never encoded in this name.
pub const SLICE_TYPE_NAME: &str = "TickSlice";

/// Emit the leading portion of `ty`.
pub fn write_type(out: &mut dyn Write, ty: &Type) -> EmitResult<()> {
  match ty {
    Type::Named(NamedType::Builtin(b)) => out.write_str(type_suffix(*b)),
    Type::Named(NamedType::User { name, needs_user_prefix }) =>
      write_prefixed(out, *name, *needs_user_prefix),
    // A function pointee renders its own `(*)(params)`; don't also prepend
    // a `*` for the pointer itself (spec §4.2).
    Type::Pointer(pointee) if matches!(&**pointee, Type::Function(..)) =>
      write_type(out, pointee),
    Type::Pointer(pointee) => { write_type(out, pointee)?; out.write_char('*') }
    // Array brackets are a declarator suffix, not part of the type prefix.
    Type::Array(elem, _) => write_type(out, elem),
    Type::Slice(_) => out.write_str(SLICE_TYPE_NAME),
    Type::Function(ret, params) => write_function_type(out, ret, params),
  }
}

/// `R (*)(P…)`, with an empty parameter list rendered `(void)` (§4.2).
pub fn write_function_type(out: &mut dyn Write, ret: &Type, params: &[Type]) -> EmitResult<()> {
  write_type(out, ret)?;
  out.write_str(" (*)")?;
  write_type_list(out, params)
}

/// `(P1, P2, …)` or `(void)` when `params` is empty — the parenthesized,
/// types-only parameter list shared by function-pointer types and header
/// prototypes (§4.8).
pub fn write_type_list(out: &mut dyn Write, params: &[Type]) -> EmitResult<()> {
  out.write_char('(')?;
  if params.is_empty() {
    out.write_str("void")?;
  } else {
    for (i, p) in params.iter().enumerate() {
      if i > 0 { out.write_str(", ")?; }
      write_type(out, p)?;
    }
  }
  out.write_char(')')
}

/// Render a type to an owned `String`. Convenience for call sites (cast
/// expressions, `sizeof`) that need the fragment as a value rather than
/// writing it directly into the active sink.
#[must_use] pub fn render_type(ty: &Type) -> String {
  let mut s = String::new();
  write_type(&mut s, ty).unwrap_or_else(|_| crate::error::bug!("write to String cannot fail"));
  s
}

/// `sizeof(<rendered type>)`, used throughout the expression emitter for
/// slice construction and indexing (§4.6).
pub fn write_sizeof(out: &mut dyn Write, ty: &Type) -> EmitResult<()> {
  write!(out, "sizeof({})", render_type(ty))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::NamedType;
  use crate::symbol::intern;

  #[test]
  fn builtin_types_use_runtime_aliases() {
    assert_eq!(render_type(&Type::builtin(BuiltinType::I32)), "i32");
    assert_eq!(render_type(&Type::builtin(BuiltinType::Usz)), "usz");
  }

  #[test]
  fn user_type_gets_prefix_rule() {
    let ty = Type::Named(NamedType::User { name: intern("Point"), needs_user_prefix: true });
    assert_eq!(render_type(&ty), "__u_Point");
  }

  #[test]
  fn plain_pointer_appends_star() {
    let ty = Type::Pointer(Box::new(Type::builtin(BuiltinType::I32)));
    assert_eq!(render_type(&ty), "i32*");
  }

  #[test]
  fn pointer_to_function_does_not_double_star() {
    let f = Type::Function(Box::new(Type::builtin(BuiltinType::I32)), vec![Type::builtin(BuiltinType::I32)]);
    let ty = Type::Pointer(Box::new(f));
    assert_eq!(render_type(&ty), "i32 (*)(i32)");
  }

  #[test]
  fn array_type_emits_only_element() {
    let ty = Type::Array(Box::new(Type::builtin(BuiltinType::I32)), 10);
    assert_eq!(render_type(&ty), "i32");
  }

  #[test]
  fn slice_emits_fixed_struct_name() {
    let ty = Type::Slice(Box::new(Type::builtin(BuiltinType::U8)));
    assert_eq!(render_type(&ty), SLICE_TYPE_NAME);
  }

  #[test]
  fn empty_param_list_is_void() {
    let f = Type::Function(Box::new(Type::builtin(BuiltinType::Void)), vec![]);
    assert_eq!(render_type(&f), "void (*)(void)");
  }
}
