//! C11 code generator for the tick compiler back end (spec §1).
//!
//! Consumes a fully type-analyzed, lowered AST (see [`ast`]) and emits a
//! pair of textually synchronized C11 translation units — a public
//! header and an implementation file — against the bundled runtime ABI
//! in [`runtime_header`]. Lexing, parsing, semantic analysis, and AST
//! lowering are external collaborators; this crate starts from their
//! output.

pub mod ast;
pub mod cast;
pub mod declarator;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod expr;
pub mod logging;
pub mod naming;
pub mod runtime_header;
pub mod stmt;
pub mod symbol;
pub mod ty_emit;
pub mod writer;

pub use driver::EmitOptions;
pub use error::EmitResult;

use ast::Module;
use driver::{emit_module, emit_preamble};
use runtime_header::RUNTIME_HEADER_TEXT;
use writer::EmitCtx;

/// Emit `ast` as a header/implementation pair into `header_sink` and
/// `impl_sink` (spec §5, §6.2). `source_filename` names the `#line`
/// directives the statement emitter writes; `opts.header_basename` names
/// the `#include` line the implementation file's preamble gets.
///
/// This is the single entry point external callers use; every other
/// public item in this crate exists to build the `ast::Module` passed
/// here or to test a component of the emitter in isolation.
pub fn emit(
  ast: &Module,
  source_filename: &str,
  opts: &EmitOptions,
  header_sink: &mut dyn std::fmt::Write,
  impl_sink: &mut dyn std::fmt::Write,
) -> EmitResult<()> {
  log::debug!("emit() starting for {source_filename}, header basename {}", opts.header_basename);
  let mut header_ctx = EmitCtx::new(header_sink, source_filename);
  let mut impl_ctx = EmitCtx::new(impl_sink, source_filename);
  emit_preamble(&mut header_ctx, &mut impl_ctx, opts, RUNTIME_HEADER_TEXT)?;
  emit_module(&mut header_ctx, &mut impl_ctx, ast)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::{BuiltinType, Decl, DeclKind, Type, Visibility};

  #[test]
  fn preamble_shape_matches_the_output_contract() {
    // spec §8 invariants: exactly one #include in impl, #pragma once
    // as the first non-comment line in the header.
    let module = Module {
      decls: vec![Decl {
        name: symbol::intern("helper"),
        vis: Visibility::empty(),
        tmpid: 0,
        span: ast::Span { line: 1 },
        kind: DeclKind::Function { ret: Type::builtin(BuiltinType::Void), params: vec![], body: Some(vec![]) },
      }],
    };
    let opts = EmitOptions { header_basename: "out.h".to_owned() };
    let mut header = String::new();
    let mut imp = String::new();
    emit(&module, "in.tk", &opts, &mut header, &mut imp).unwrap();

    let first_code_line = header.lines().find(|l| !l.trim_start().starts_with("//")).unwrap();
    assert_eq!(first_code_line, "#pragma once");
    assert_eq!(imp.matches("#include").count(), 1);
    assert!(imp.contains("#include \"out.h\""));
    assert!(imp.contains("void __u_helper(void) {"));
  }
}
