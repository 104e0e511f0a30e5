use std::rc::Rc;

use ast::ast::Expr;
use ast::env::Env;

mod eval;

pub type ValueEnv = Env<Rc<Expr>>;

/// Reduces `expr` to weak-head normal form. Ill-typed inputs are defects:
/// an unbound identifier, an operator on the wrong literal kind or an
/// out-of-range projection panics rather than returning an error, so run
/// the type checker first.
pub fn eval(env: &ValueEnv, expr: &Rc<Expr>) -> Rc<Expr> {
    eval::eval_expr(env, expr)
}
