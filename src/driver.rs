//! Top-level driver (spec §4.8): iterates a module's declarations in
//! source order, routing each to the header sink, the implementation
//! sink, or both, per its visibility.

use std::fmt::Write as _;
use crate::ast::{Decl, DeclKind, Module, Visibility};
use crate::declarator::write_declarator;
use crate::error::EmitResult;
use crate::expr::render_expr;
use crate::naming::{write_enum_value, write_ident, write_prefixed};
use crate::stmt::write_stmt;
use crate::ty_emit::{render_type, write_type_list};
use crate::writer::EmitCtx;

/// Bundles the one caller-supplied string spec §6.2's `emit` signature
/// needs beyond the two sinks: the filename the implementation file's
/// `#include` line names.
#[derive(Clone, Debug, Default)]
pub struct EmitOptions {
  pub header_basename: String,
}

pub fn emit_preamble(
  header_ctx: &mut EmitCtx<'_>,
  impl_ctx: &mut EmitCtx<'_>,
  opts: &EmitOptions,
  runtime_header_text: &str,
) -> EmitResult<()> {
  header_ctx.write_str("// Generated by tick compiler\n")?;
  header_ctx.write_str("#pragma once\n")?;
  header_ctx.write_str(runtime_header_text)?;
  header_ctx.newline()?;
  write!(impl_ctx, "#include \"{}\"\n", opts.header_basename)?;
  impl_ctx.newline()
}

pub fn emit_module(header_ctx: &mut EmitCtx<'_>, impl_ctx: &mut EmitCtx<'_>, module: &Module) -> EmitResult<()> {
  log::debug!("emitting module with {} top-level declarations", module.decls.len());
  for decl in &module.decls {
    emit_decl(header_ctx, impl_ctx, decl)?;
  }
  Ok(())
}

fn decl_name(decl: &Decl) -> String {
  let mut s = String::new();
  write_ident(&mut s, decl.name, decl.vis.needs_user_prefix(), decl.tmpid)
    .unwrap_or_else(|_| crate::error::bug!("write to String cannot fail"));
  s
}

/// A function parameter is local scope and, unlike a top-level `Decl`,
/// has no way to be individually marked `pub`/`extern` (`ast::Param`
/// carries no visibility field at all) — so it always takes the private
/// prefix, the same as any other binding the naming rule (§4.1) never
/// exempts.
fn param_name(p: &crate::ast::Param) -> String {
  let mut s = String::new();
  write_prefixed(&mut s, p.name, true).unwrap_or_else(|_| crate::error::bug!("write to String cannot fail"));
  s
}

fn emit_decl(header_ctx: &mut EmitCtx<'_>, impl_ctx: &mut EmitCtx<'_>, decl: &Decl) -> EmitResult<()> {
  match &decl.kind {
    DeclKind::Enum(enum_decl) => {
      log::trace!("routing enum {} ({})", decl.name, if decl.vis.contains(Visibility::PUB) { "header" } else { "impl" });
      let target = if decl.vis.contains(Visibility::PUB) { &mut *header_ctx } else { &mut *impl_ctx };
      emit_enum(target, decl, enum_decl)
    }
    DeclKind::Struct(struct_decl) => emit_struct(header_ctx, impl_ctx, decl, struct_decl),
    DeclKind::Union(union_decl) => emit_union(header_ctx, impl_ctx, decl, union_decl),
    DeclKind::Function { ret, params, body } => emit_function(header_ctx, impl_ctx, decl, ret, params, body.as_deref()),
    DeclKind::Variable { ty, init } => emit_variable(header_ctx, impl_ctx, decl, ty, init.as_ref()),
  }
}

fn emit_enum(ctx: &mut EmitCtx<'_>, decl: &Decl, enum_decl: &crate::ast::EnumDecl) -> EmitResult<()> {
  let name = decl_name(decl);
  let underlying = crate::dispatch::type_suffix(enum_decl.underlying);
  write!(ctx, "typedef {underlying} {name};\n")?;
  for (value_name, k) in &enum_decl.values {
    ctx.write_str("static const ")?;
    ctx.write_str(&name)?;
    ctx.write_char(' ')?;
    write_enum_value(ctx, decl.name, decl.vis.needs_user_prefix(), *value_name)?;
    write!(ctx, " = {k};\n")?;
  }
  ctx.newline()
}

/// `EmitCtx` exposes writes through inherent methods (`writer.rs`), not
/// `std::fmt::Write` directly; this impl lets it also satisfy the
/// `&mut dyn Write` parameters the naming/type helpers take, so the
/// driver can pass an `EmitCtx` straight into them instead of routing
/// through a separate raw-string buffer.
impl std::fmt::Write for EmitCtx<'_> {
  fn write_str(&mut self, s: &str) -> std::fmt::Result { EmitCtx::write_str(self, s) }
}

fn emit_struct(
  header_ctx: &mut EmitCtx<'_>,
  impl_ctx: &mut EmitCtx<'_>,
  decl: &Decl,
  struct_decl: &crate::ast::StructDecl,
) -> EmitResult<()> {
  let name = decl_name(decl);
  let target = if decl.vis.contains(Visibility::PUB) { &mut *header_ctx } else { &mut *impl_ctx };
  if decl.vis.contains(Visibility::FORWARD_DECL) {
    return write!(target, "typedef struct {name} {name};\n\n")
  }
  write!(target, "typedef struct {name} {{\n")?;
  target.indent();
  for field in &struct_decl.fields {
    target.write_indent()?;
    let mut decl_text = String::new();
    write_declarator(&mut decl_text, &field.ty, &field.name.to_owned_string())?;
    target.write_str(&decl_text)?;
    if let Some(align) = field.alignment {
      write!(target, " __attribute__((aligned({align})))")?;
    }
    target.write_str(";\n")?;
  }
  target.dedent();
  target.write_str("}")?;
  if struct_decl.is_packed {
    target.write_str(" __attribute__((packed))")?;
  }
  if let Some(align) = struct_decl.alignment {
    write!(target, " __attribute__((aligned({align})))")?;
  }
  write!(target, " {name};\n\n")
}

/// A tagged union lowers to a struct: the synthesized tag enum's field
/// first, then an anonymous `union` of the payload fields (§4.8).
fn emit_union(
  header_ctx: &mut EmitCtx<'_>,
  impl_ctx: &mut EmitCtx<'_>,
  decl: &Decl,
  union_decl: &crate::ast::UnionDecl,
) -> EmitResult<()> {
  let name = decl_name(decl);
  let mut tag_name = String::new();
  write_prefixed(&mut tag_name, union_decl.tag_type.name, union_decl.tag_type.vis.needs_user_prefix())?;
  let target = if decl.vis.contains(Visibility::PUB) { &mut *header_ctx } else { &mut *impl_ctx };
  write!(target, "typedef struct {name} {{\n")?;
  target.indent();
  target.write_indent()?;
  write!(target, "{tag_name} tag;\n")?;
  target.write_indent()?;
  target.write_str("union {\n")?;
  target.indent();
  for field in &union_decl.fields {
    target.write_indent()?;
    let mut decl_text = String::new();
    write_declarator(&mut decl_text, &field.ty, &field.name.to_owned_string())?;
    target.write_str(&decl_text)?;
    target.write_str(";\n")?;
  }
  target.dedent();
  target.write_indent()?;
  // Anonymous: payload fields promote straight into the enclosing struct
  // so `(obj).field` (expr.rs::write_field) resolves without a `.payload`
  // hop (§4.8, §4.6).
  target.write_str("};\n")?;
  target.dedent();
  write!(target, "}} {name};\n\n")
}

fn emit_function(
  header_ctx: &mut EmitCtx<'_>,
  impl_ctx: &mut EmitCtx<'_>,
  decl: &Decl,
  ret: &crate::ast::Type,
  params: &[crate::ast::Param],
  body: Option<&[crate::ast::Stmt]>,
) -> EmitResult<()> {
  let name = decl_name(decl);
  let ret_text = render_type(ret);
  let is_pub = decl.vis.contains(Visibility::PUB);

  if is_pub {
    let param_types: Vec<_> = params.iter().map(|p| p.ty.clone()).collect();
    write!(header_ctx, "{ret_text} {name}")?;
    write_type_list(header_ctx, &param_types)?;
    header_ctx.write_str(";\n")?;
  }

  let Some(body) = body else { return Ok(()) };
  write!(impl_ctx, "{ret_text} {name}(")?;
  if params.is_empty() {
    impl_ctx.write_str("void")?;
  } else {
    for (i, p) in params.iter().enumerate() {
      if i > 0 { impl_ctx.write_str(", ")?; }
      let mut decl_text = String::new();
      write_declarator(&mut decl_text, &p.ty, &param_name(p))?;
      impl_ctx.write_str(&decl_text)?;
    }
  }
  impl_ctx.write_str(") {\n")?;
  impl_ctx.indent();
  for stmt in body { write_stmt(impl_ctx, stmt)?; }
  impl_ctx.dedent();
  impl_ctx.write_str("}\n\n")
}

fn emit_variable(
  header_ctx: &mut EmitCtx<'_>,
  impl_ctx: &mut EmitCtx<'_>,
  decl: &Decl,
  ty: &crate::ast::Type,
  init: Option<&crate::ast::Expr>,
) -> EmitResult<()> {
  let name = decl_name(decl);
  let is_pub = decl.vis.contains(Visibility::PUB);
  let is_extern = decl.vis.contains(Visibility::EXTERN);

  if is_pub {
    if let crate::ast::Type::Function(ret, params) = ty {
      write!(header_ctx, "extern {} {name}", render_type(ret))?;
      write_type_list(header_ctx, params)?;
      header_ctx.write_str(";\n")?;
    } else {
      header_ctx.write_str("extern ")?;
      let mut decl_text = String::new();
      write_declarator(&mut decl_text, ty, &name)?;
      header_ctx.write_str(&decl_text)?;
      header_ctx.write_str(";\n")?;
    }
  }

  // A function-typed variable always renders `extern R name(P…);` (§4.8),
  // independent of the EXTERN visibility bit, so the bit is only applied
  // here for the non-function shapes below.
  if is_extern && !matches!(ty, crate::ast::Type::Function(..)) { impl_ctx.write_str("extern ")?; }
  if decl.vis.contains(Visibility::VOLATILE) { impl_ctx.write_str("volatile ")?; }
  match ty {
    crate::ast::Type::Function(ret, params) => {
      write!(impl_ctx, "extern {} {name}", render_type(ret))?;
      write_type_list(impl_ctx, params)?;
    }
    crate::ast::Type::Pointer(pointee) if matches!(&**pointee, crate::ast::Type::Function(..)) => {
      let mut decl_text = String::new();
      write_declarator(&mut decl_text, ty, &name)?;
      impl_ctx.write_str(&decl_text)?;
    }
    _ => {
      let mut decl_text = String::new();
      write_declarator(&mut decl_text, ty, &name)?;
      impl_ctx.write_str(&decl_text)?;
    }
  }
  if let Some(init) = init {
    write!(impl_ctx, " = {}", render_expr(init))?;
  }
  impl_ctx.write_str(";\n\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ast::{BuiltinType, Decl, DeclKind, EnumDecl, Span, Type};
  use crate::symbol::intern;
  use pretty_assertions::assert_eq;
  use std::rc::Rc;

  fn span() -> Span { Span { line: 1 } }

  fn rendered_pair(decl: &Decl) -> (String, String) {
    let mut header = String::new();
    let mut imp = String::new();
    let mut hctx = EmitCtx::new(&mut header as &mut dyn std::fmt::Write, "f.tk");
    let mut ictx = EmitCtx::new(&mut imp as &mut dyn std::fmt::Write, "f.tk");
    emit_decl(&mut hctx, &mut ictx, decl).unwrap();
    (header, imp)
  }

  #[test]
  fn private_enum_goes_only_to_impl() {
    let enum_decl = Rc::new(EnumDecl {
      name: intern("Color"), vis: Visibility::empty(),
      underlying: BuiltinType::I32, values: vec![(intern("Red"), 0), (intern("Blue"), 1)],
    });
    let decl = Decl {
      name: intern("Color"), vis: Visibility::empty(), tmpid: 0, span: span(),
      kind: DeclKind::Enum(enum_decl),
    };
    let (header, imp) = rendered_pair(&decl);
    assert!(header.is_empty());
    assert!(imp.contains("typedef i32 __u_Color;"));
    assert!(imp.contains("static const __u_Color __u_Color_Red = 0;"));
    assert!(imp.contains("static const __u_Color __u_Color_Blue = 1;"));
  }

  #[test]
  fn pub_function_gets_header_prototype_and_impl_definition() {
    let decl = Decl {
      name: intern("add"), vis: Visibility::PUB, tmpid: 0, span: span(),
      kind: DeclKind::Function {
        ret: Type::builtin(BuiltinType::I32),
        params: vec![crate::ast::Param { name: intern("x"), ty: Type::builtin(BuiltinType::I32) }],
        body: Some(vec![]),
      },
    };
    let (header, imp) = rendered_pair(&decl);
    assert_eq!(header, "i32 add(i32);\n");
    assert!(imp.starts_with("i32 add(i32 __u_x) {\n"));
    assert!(imp.ends_with("}\n\n"));
  }

  #[test]
  fn private_function_is_impl_only() {
    let decl = Decl {
      name: intern("helper"), vis: Visibility::empty(), tmpid: 0, span: span(),
      kind: DeclKind::Function { ret: Type::builtin(BuiltinType::Void), params: vec![], body: Some(vec![]) },
    };
    let (header, imp) = rendered_pair(&decl);
    assert!(header.is_empty());
    assert!(imp.starts_with("void __u_helper(void) {\n"));
  }

  #[test]
  fn forward_declared_struct_emits_typedef_only() {
    let decl = Decl {
      name: intern("Opaque"), vis: Visibility::FORWARD_DECL, tmpid: 0, span: span(),
      kind: DeclKind::Struct(crate::ast::StructDecl { fields: vec![], is_packed: false, alignment: None }),
    };
    let (header, imp) = rendered_pair(&decl);
    assert!(header.is_empty());
    assert_eq!(imp, "typedef struct __u_Opaque __u_Opaque;\n\n");
  }

  #[test]
  fn tagged_union_payload_is_anonymous_and_field_access_resolves() {
    let tag_type = Rc::new(EnumDecl {
      name: intern("ShapeTag"), vis: Visibility::empty(), underlying: BuiltinType::I32,
      values: vec![(intern("Circle"), 0), (intern("Square"), 1)],
    });
    let union_decl = crate::ast::UnionDecl {
      fields: vec![
        crate::ast::Field { name: intern("radius"), ty: Type::builtin(BuiltinType::I32), alignment: None },
        crate::ast::Field { name: intern("side"), ty: Type::builtin(BuiltinType::I32), alignment: None },
      ],
      tag_type,
    };
    let decl = Decl {
      name: intern("Shape"), vis: Visibility::empty(), tmpid: 0, span: span(),
      kind: DeclKind::Union(union_decl),
    };
    let (header, imp) = rendered_pair(&decl);
    assert!(header.is_empty());
    assert!(imp.contains("union {\n"));
    assert!(imp.contains("i32 radius;\n"));
    // Anonymous: no `payload` member name, so `(obj).field` below resolves
    // without a `.payload` hop.
    assert!(!imp.contains("payload"));

    let field_access = crate::ast::Expr::Field {
      object: Box::new(crate::ast::Expr::Ident {
        symbol: intern("s"), needs_user_prefix: true, tmpid: 0, intrinsic: None,
      }),
      field: intern("radius"),
      object_is_pointer: false,
      resolved_type: Type::builtin(BuiltinType::I32),
    };
    assert_eq!(render_expr(&field_access), "(__u_s).radius");
  }
}
