//! End-to-end emitter tests, one per concrete boundary scenario in
//! spec.md §8: build a minimal AST, run [`tick_codegen::emit`], and
//! string-match the generated output.

use pretty_assertions::assert_eq;
use tick_codegen::ast::{
  BuiltinType, Decl, DeclKind, EnumDecl, Expr, Module, OpKind, Param, Span, Stmt, StmtKind,
  SwitchCase, Type, Visibility,
};
use tick_codegen::symbol::intern;
use tick_codegen::{emit, EmitOptions};

fn span() -> Span { Span { line: 1 } }

fn emit_module(module: &Module) -> (String, String) {
  let opts = EmitOptions { header_basename: "out.h".to_owned() };
  let mut header = String::new();
  let mut imp = String::new();
  emit(module, "in.tk", &opts, &mut header, &mut imp).unwrap();
  (header, imp)
}

fn ident(name: &str, needs_prefix: bool) -> Expr {
  Expr::Ident { symbol: intern(name), needs_user_prefix: needs_prefix, tmpid: 0, intrinsic: None }
}

#[test]
fn scenario_1_pointer_to_array_declaration() {
  let decl = Decl {
    name: intern("p"),
    vis: Visibility::empty(),
    tmpid: 0,
    span: span(),
    kind: DeclKind::Variable {
      ty: Type::Pointer(Box::new(Type::Array(Box::new(Type::builtin(BuiltinType::I32)), 10))),
      init: None,
    },
  };
  let (_, imp) = emit_module(&Module { decls: vec![decl] });
  assert!(imp.contains("i32 (*__u_p)[10];"));
}

#[test]
fn scenario_2_function_pointer_variable() {
  let cb_type = Type::Function(Box::new(Type::builtin(BuiltinType::I32)), vec![Type::builtin(BuiltinType::I32)]);
  let decl = Decl {
    name: intern("cb"),
    vis: Visibility::empty(),
    tmpid: 0,
    span: span(),
    kind: DeclKind::Variable { ty: Type::Pointer(Box::new(cb_type)), init: None },
  };
  let (_, imp) = emit_module(&Module { decls: vec![decl] });
  assert!(imp.contains("i32 (*__u_cb)(i32);"));
}

#[test]
fn scenario_3_and_4_checked_add_dispatch() {
  let body = vec![Stmt {
    span: span(),
    kind: StmtKind::Return(Some(Expr::Binary {
      op: OpKind::CheckedAdd,
      resolved_type: BuiltinType::I32,
      lhs: Box::new(ident("a", true)),
      rhs: Box::new(ident("b", true)),
    })),
  }];
  let decl = Decl {
    name: intern("add_i32"),
    vis: Visibility::PUB,
    tmpid: 0,
    span: span(),
    kind: DeclKind::Function {
      ret: Type::builtin(BuiltinType::I32),
      params: vec![
        Param { name: intern("a"), ty: Type::builtin(BuiltinType::I32) },
        Param { name: intern("b"), ty: Type::builtin(BuiltinType::I32) },
      ],
      body: Some(body),
    },
  };
  let (_, imp) = emit_module(&Module { decls: vec![decl] });
  assert!(imp.contains("return tick_checked_add_i32(__u_a, __u_b);"));
}

#[test]
fn scenario_5_narrowing_cast() {
  let body = vec![Stmt {
    span: span(),
    kind: StmtKind::Return(Some(Expr::Cast {
      target: Type::builtin(BuiltinType::I8),
      operand: Box::new(ident("x", true)),
      source_type: Some(BuiltinType::I32),
    })),
  }];
  let decl = Decl {
    name: intern("narrow"),
    vis: Visibility::PUB,
    tmpid: 0,
    span: span(),
    kind: DeclKind::Function {
      ret: Type::builtin(BuiltinType::I8),
      params: vec![Param { name: intern("x"), ty: Type::builtin(BuiltinType::I32) }],
      body: Some(body),
    },
  };
  let (_, imp) = emit_module(&Module { decls: vec![decl] });
  assert!(imp.contains("return tick_checked_cast_i32_i8(__u_x);"));
}

#[test]
fn scenario_6_slice_indexing() {
  let body = vec![Stmt {
    span: span(),
    kind: StmtKind::Return(Some(Expr::Index {
      object: Box::new(ident("s", true)),
      index: Box::new(ident("i", true)),
      is_slice_index: true,
      resolved_type: Type::builtin(BuiltinType::I32),
    })),
  }];
  let decl = Decl {
    name: intern("at"),
    vis: Visibility::PUB,
    tmpid: 0,
    span: span(),
    kind: DeclKind::Function {
      ret: Type::builtin(BuiltinType::I32),
      params: vec![
        Param { name: intern("s"), ty: Type::Slice(Box::new(Type::builtin(BuiltinType::I32))) },
        Param { name: intern("i"), ty: Type::builtin(BuiltinType::Usz) },
      ],
      body: Some(body),
    },
  };
  let (_, imp) = emit_module(&Module { decls: vec![decl] });
  assert!(imp.contains("return *(i32*)tick_slice_index_ptr(__u_s, __u_i, sizeof(i32));"));
}

#[test]
fn scenario_7_for_loop_lowering() {
  let init = Stmt {
    span: span(),
    kind: StmtKind::Decl(Box::new(Decl {
      name: intern("i"), vis: Visibility::empty(), tmpid: 0, span: span(),
      kind: DeclKind::Variable { ty: Type::builtin(BuiltinType::I32), init: Some(Expr::LitUInt(0)) },
    })),
  };
  let cond = ident("c", true);
  let step = Stmt { span: span(), kind: StmtKind::ExprStmt(ident("step", true)) };
  let body = Stmt { span: span(), kind: StmtKind::Block(vec![Stmt { span: span(), kind: StmtKind::ExprStmt(ident("body", true)) }]) };
  let fn_body = vec![Stmt {
    span: span(),
    kind: StmtKind::For { init: Some(Box::new(init)), cond, step: Some(Box::new(step)), body: Box::new(body) },
  }];
  let decl = Decl {
    name: intern("loop"), vis: Visibility::empty(), tmpid: 0, span: span(),
    kind: DeclKind::Function { ret: Type::builtin(BuiltinType::Void), params: vec![], body: Some(fn_body) },
  };
  let (_, imp) = emit_module(&Module { decls: vec![decl] });
  assert!(imp.contains("while (1) {"));
  assert!(imp.contains("if (!(__u_c)) break;"));
  assert!(imp.contains("__u_body;"));
  assert!(imp.contains("__u_step;"));
}

#[test]
fn scenario_8_switch_case_shares_block_and_forces_break() {
  let case = SwitchCase {
    values: vec![1, 2],
    body: Box::new(Stmt { span: span(), kind: StmtKind::Block(vec![Stmt { span: span(), kind: StmtKind::ExprStmt(ident("x", true)) }]) }),
  };
  let fn_body = vec![Stmt { span: span(), kind: StmtKind::Switch { scrutinee: ident("v", true), cases: vec![case] } }];
  let decl = Decl {
    name: intern("sw"), vis: Visibility::empty(), tmpid: 0, span: span(),
    kind: DeclKind::Function { ret: Type::builtin(BuiltinType::Void), params: vec![], body: Some(fn_body) },
  };
  let (_, imp) = emit_module(&Module { decls: vec![decl] });
  assert!(imp.contains("case 1:"));
  assert!(imp.contains("case 2:"));
  assert_eq!(imp.matches("break;").count(), 1);
}

#[test]
fn output_contract_invariants_hold() {
  let decl = Decl {
    name: intern("Color"),
    vis: Visibility::PUB,
    tmpid: 0,
    span: span(),
    kind: DeclKind::Enum(std::rc::Rc::new(EnumDecl {
      name: intern("Color"), vis: Visibility::PUB, underlying: BuiltinType::I32,
      values: vec![(intern("Red"), 0)],
    })),
  };
  let (header, imp) = emit_module(&Module { decls: vec![decl] });

  let first_code_line = header.lines().find(|l| !l.trim_start().starts_with("//")).unwrap();
  assert_eq!(first_code_line, "#pragma once");
  assert_eq!(imp.matches("#include").count(), 1);
  assert!(!header.is_empty());
  assert!(!imp.is_empty());
  assert!(header.contains("typedef i32 Color;"));
  assert!(!header.contains("__u_Color"));
}
