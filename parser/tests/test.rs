use log::info;
use parser::parse;
use parser::test_parse;

use ast::ast::{BinOp, Decl, Expr};

test_parse! {
    basics: "files/basics.cam",
    functions: "files/functions.cam",
    tuples: "files/tuples.cam",
    types: "files/types.cam",
    modules: "files/modules.cam",
    sequences: "files/sequences.cam",
}

fn single_expr(source: &str) -> std::rc::Rc<Expr> {
    let mut decls = parse(source).unwrap();
    assert_eq!(decls.len(), 1);
    match decls.remove(0) {
        Decl::SExpr(e) => e,
        other => panic!("expected a bare expression, got {}", other),
    }
}

#[test]
fn application_associates_left() {
    let e = single_expr("f g x;");
    assert_eq!(
        e,
        Expr::app(Expr::app(Expr::var("f"), Expr::var("g")), Expr::var("x"))
    );
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let e = single_expr("1 + 2 * 3;");
    assert_eq!(
        e,
        Expr::binop(
            Expr::int(1),
            BinOp::Add,
            Expr::binop(Expr::int(2), BinOp::Mul, Expr::int(3)),
        )
    );
}

#[test]
fn subtraction_associates_left() {
    let e = single_expr("10 - 3 - 2;");
    assert_eq!(
        e,
        Expr::binop(
            Expr::binop(Expr::int(10), BinOp::Sub, Expr::int(3)),
            BinOp::Sub,
            Expr::int(2),
        )
    );
}

#[test]
fn iff_is_distinguished_from_less_than() {
    let e = single_expr("a <-> b;");
    assert_eq!(e, Expr::binop(Expr::var("a"), BinOp::Iff, Expr::var("b")));
    let e = single_expr("a < b;");
    assert_eq!(e, Expr::binop(Expr::var("a"), BinOp::Lt, Expr::var("b")));
}

#[test]
fn conjunction_associates_right() {
    let e = single_expr("a && b && c;");
    assert_eq!(
        e,
        Expr::binop(
            Expr::var("a"),
            BinOp::And,
            Expr::binop(Expr::var("b"), BinOp::And, Expr::var("c")),
        )
    );
}

#[test]
fn sequence_groups_to_the_right() {
    let e = single_expr("(a; b; c);");
    assert_eq!(
        e,
        Expr::binop(
            Expr::var("a"),
            BinOp::Seq,
            Expr::binop(Expr::var("b"), BinOp::Seq, Expr::var("c")),
        )
    );
}

#[test]
fn lambda_body_extends_right() {
    let e = single_expr("fn x : Int => x + 1;");
    assert!(matches!(&*e, Expr::Lam { .. }));
    assert_eq!(e.to_string(), "fn x : Int => x + 1");
}

#[test]
fn annotation_requires_parens() {
    let e = single_expr("(3 : Int);");
    assert!(matches!(&*e, Expr::Annot(_, _)));
}

#[test]
fn keywords_are_not_identifiers() {
    assert!(parse("val if = 3;").is_err());
    assert!(parse("end;").is_err());
}

#[test]
fn unterminated_declaration_is_rejected() {
    assert!(parse("val x = 3").is_err());
    assert!(parse("val = 3;").is_err());
}

#[test]
fn comments_are_skipped() {
    let decls = parse("-- nothing here\nval x = 1; -- trailing\n").unwrap();
    assert_eq!(decls.len(), 1);
}

#[test]
fn rec_flag_round_trips() {
    let decls = parse("val rec f : Int -> Int = fn n : Int => f n;").unwrap();
    match &decls[0] {
        Decl::Val { rec, ty, .. } => {
            assert!(*rec);
            assert_eq!(ty.as_ref().unwrap().to_string(), "Int -> Int");
        }
        other => panic!("expected a val declaration, got {}", other),
    }
}

#[test]
fn modules_nest() {
    let decls = parse(
        "module Outer = struct val a = 1; module Inner = struct val b = 2; end end",
    )
    .unwrap();
    match &decls[0] {
        Decl::Module(name, body) => {
            assert_eq!(name.name(), "Outer");
            assert_eq!(body.len(), 2);
            assert!(matches!(&body[1], Decl::Module(_, inner) if inner.len() == 1));
        }
        other => panic!("expected a module, got {}", other),
    }
}
