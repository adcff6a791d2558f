//! Declarator synthesizer (spec §4.3): composes a full C declarator —
//! `<type-prefix> <name> <suffix>` — handling the two shapes where C's
//! declarator syntax is context-sensitive: pointer-to-array and
//! function-pointer. This is the syntax inversion spec §1 calls out as
//! the hard part of the whole emitter.

use std::fmt::Write;
use smallvec::SmallVec;
use crate::ast::Type;
use crate::error::EmitResult;
use crate::ty_emit::{write_type, write_type_list};

/// Peel off every layer of `Array(_, N)`, returning the element type once
/// arrays are exhausted and the sizes collected in declaration order
/// (outermost dimension first, matching `E name[N1][N2]` for `array of N1
/// arrays of N2 E`). `SmallVec` because nearly every declarator has 0 or 1
/// dimensions and a handful have 2; heap-allocating a `Vec` for the common
/// case would be wasted work, the same tradeoff `mmcc` makes for its
/// small, usually-singleton collections (`build_mir.rs`'s
/// `SmallVec<[BlockId; 2]>` successor lists).
fn strip_array_dims(ty: &Type) -> (&Type, SmallVec<[u64; 2]>) {
  let mut dims = SmallVec::new();
  let mut cur = ty;
  while let Type::Array(inner, n) = cur {
    dims.push(*n);
    cur = inner;
  }
  (cur, dims)
}

fn write_array_suffix(out: &mut dyn Write, dims: &[u64]) -> EmitResult<()> {
  for d in dims { write!(out, "[{d}]")?; }
  Ok(())
}

/// `(*name)` or, for an abstract declarator (`name == ""`, used by header
/// prototypes' parameter types), `(*)`.
fn write_paren_star_name(out: &mut dyn Write, name: &str) -> EmitResult<()> {
  write!(out, " (*{name})")
}

/// Compose the full declarator for `ty name` (or, with `name == ""`, the
/// corresponding abstract declarator for a types-only context such as a
/// header prototype's parameter list).
pub fn write_declarator(out: &mut dyn Write, ty: &Type, name: &str) -> EmitResult<()> {
  match ty {
    // Pointer-to-array: `E (*name)[N]` (spec §4.3 boundary scenario 1).
    Type::Pointer(pointee) if matches!(&**pointee, Type::Array(..)) => {
      let (base, dims) = strip_array_dims(pointee);
      write_type(out, base)?;
      write_paren_star_name(out, name)?;
      write_array_suffix(out, &dims)
    }
    // Function-pointer variable: `R (*name)(P…)` (boundary scenario 2).
    Type::Pointer(pointee) if matches!(&**pointee, Type::Function(..)) => {
      let Type::Function(ret, params) = &**pointee else {
        crate::error::bug!("matched Function pointee but destructured something else")
      };
      write_type(out, ret)?;
      write_paren_star_name(out, name)?;
      write_type_list(out, params)
    }
    // Everything else: `<type-prefix> <name> <array-suffix?>`.
    _ => {
      let (base, dims) = strip_array_dims(ty);
      write_type(out, base)?;
      if !name.is_empty() {
        out.write_char(' ')?;
        out.write_str(name)?;
      }
      write_array_suffix(out, &dims)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::BuiltinType;
  use pretty_assertions::assert_eq;

  fn rendered(ty: &Type, name: &str) -> String {
    let mut s = String::new();
    write_declarator(&mut s, ty, name).unwrap();
    s
  }

  #[test]
  fn pointer_to_array_declaration() {
    // spec §8 boundary scenario 1: `Pointer(Array(i32, 10))` named `p`.
    let ty = Type::Pointer(Box::new(Type::Array(Box::new(Type::builtin(BuiltinType::I32)), 10)));
    assert_eq!(rendered(&ty, "__u_p"), "i32 (*__u_p)[10]");
  }

  #[test]
  fn function_pointer_variable() {
    // spec §8 boundary scenario 2.
    let f = Type::Function(Box::new(Type::builtin(BuiltinType::I32)), vec![Type::builtin(BuiltinType::I32)]);
    let ty = Type::Pointer(Box::new(f));
    assert_eq!(rendered(&ty, "__u_cb"), "i32 (*__u_cb)(i32)");
  }

  #[test]
  fn plain_array_declaration() {
    let ty = Type::Array(Box::new(Type::builtin(BuiltinType::U8)), 16);
    assert_eq!(rendered(&ty, "buf"), "u8 buf[16]");
  }

  #[test]
  fn multi_dimensional_array() {
    let inner = Type::Array(Box::new(Type::builtin(BuiltinType::I32)), 4);
    let ty = Type::Array(Box::new(inner), 3);
    assert_eq!(rendered(&ty, "m"), "i32 m[3][4]");
  }

  #[test]
  fn plain_pointer_declaration() {
    let ty = Type::Pointer(Box::new(Type::builtin(BuiltinType::I32)));
    assert_eq!(rendered(&ty, "p"), "i32* p");
  }

  #[test]
  fn abstract_function_pointer_for_header_param() {
    let f = Type::Function(Box::new(Type::builtin(BuiltinType::Void)), vec![]);
    let ty = Type::Pointer(Box::new(f));
    assert_eq!(rendered(&ty, ""), "void (*)(void)");
  }
}
