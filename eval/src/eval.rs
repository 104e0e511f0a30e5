use std::rc::Rc;

use log::{debug, info};

use ast::ast::{BinOp, Expr, IntType, Literal};
use ast::subst::subst;

use crate::ValueEnv;

pub(crate) fn eval_expr(env: &ValueEnv, expr: &Rc<Expr>) -> Rc<Expr> {
    match &**expr {
        Expr::Var(name) => {
            debug!("Looking up {}", name);
            let val = env
                .lookup(name)
                .unwrap_or_else(|| panic!("unbound identifier '{}' at runtime", name));
            match &*val {
                // Every reference gets its own argument accumulator.
                Expr::Builtin(b) => Rc::new(Expr::Builtin(b.fresh())),
                _ => val,
            }
        }
        Expr::Literal(_) => expr.clone(),
        // An already-captured lambda is a value; capturing produces a new
        // node and never writes to the one it was made from.
        Expr::Lam { env: Some(_), .. } => expr.clone(),
        Expr::Lam {
            var,
            ty,
            body,
            env: None,
        } => Rc::new(Expr::Lam {
            var: var.clone(),
            ty: ty.clone(),
            body: body.clone(),
            env: Some(env.clone()),
        }),
        Expr::App(l, r) => {
            let fun = eval_expr(env, l);
            let arg = eval_expr(env, r);
            match &*fun {
                Expr::Lam {
                    var,
                    body,
                    env: Some(captured),
                    ..
                } => {
                    // Call binding is substitution, outer scope comes from
                    // the captured environment.
                    info!("Applying closure over {} to {}", var, arg);
                    let applied = subst(body, var, &arg);
                    eval_expr(captured, &applied)
                }
                Expr::Builtin(b) => {
                    let applied = b.applied(arg);
                    if applied.saturated() {
                        info!("Firing builtin on {} arguments", applied.args.len());
                        let result = (applied.effect)(&applied.args);
                        eval_expr(env, &result)
                    } else {
                        Rc::new(Expr::Builtin(applied))
                    }
                }
                _ => Rc::new(Expr::App(fun, arg)),
            }
        }
        Expr::If(c, t, e) => {
            if eval_bool(env, c) {
                eval_expr(env, t)
            } else {
                eval_expr(env, e)
            }
        }
        Expr::Annot(e, _) => eval_expr(env, e),
        Expr::BinOp(l, op, r) => eval_binop(env, l, *op, r),
        Expr::Tuple(es) => Expr::tuple(es.iter().map(|e| eval_expr(env, e)).collect()),
        Expr::Proj(e, index) => {
            let v = eval_expr(env, e);
            match &*v {
                Expr::Tuple(vs) => vs[*index].clone(),
                _ => Rc::new(Expr::Proj(v, *index)),
            }
        }
        Expr::Builtin(b) => {
            if b.saturated() {
                let result = (b.effect)(&b.args);
                eval_expr(env, &result)
            } else {
                expr.clone()
            }
        }
    }
}

/// Both sides always run, there is no short-circuiting.
fn eval_binop(env: &ValueEnv, l: &Rc<Expr>, op: BinOp, r: &Rc<Expr>) -> Rc<Expr> {
    match op {
        BinOp::Add => Expr::int(eval_int(env, l) + eval_int(env, r)),
        BinOp::Sub => Expr::int(eval_int(env, l) - eval_int(env, r)),
        BinOp::Mul => Expr::int(eval_int(env, l) * eval_int(env, r)),
        BinOp::Div => Expr::int(eval_int(env, l) / eval_int(env, r)),
        BinOp::Lt => Expr::bool(eval_int(env, l) < eval_int(env, r)),
        BinOp::Le => Expr::bool(eval_int(env, l) <= eval_int(env, r)),
        BinOp::Eq => Expr::bool(eval_int(env, l) == eval_int(env, r)),
        BinOp::Ge => Expr::bool(eval_int(env, l) >= eval_int(env, r)),
        BinOp::Gt => Expr::bool(eval_int(env, l) > eval_int(env, r)),
        BinOp::Neq => Expr::bool(eval_int(env, l) != eval_int(env, r)),
        BinOp::And => {
            let lv = eval_bool(env, l);
            let rv = eval_bool(env, r);
            Expr::bool(lv && rv)
        }
        BinOp::Or => {
            let lv = eval_bool(env, l);
            let rv = eval_bool(env, r);
            Expr::bool(lv || rv)
        }
        BinOp::Iff => {
            let lv = eval_bool(env, l);
            let rv = eval_bool(env, r);
            Expr::bool(lv == rv)
        }
        BinOp::Seq => {
            eval_expr(env, l);
            eval_expr(env, r)
        }
    }
}

fn eval_int(env: &ValueEnv, e: &Rc<Expr>) -> IntType {
    match &*eval_expr(env, e) {
        Expr::Literal(Literal::Int(n)) => *n,
        v => panic!("expected an integer, got '{}'", v),
    }
}

fn eval_bool(env: &ValueEnv, e: &Rc<Expr>) -> bool {
    match &*eval_expr(env, e) {
        Expr::Literal(Literal::Bool(b)) => *b,
        v => panic!("expected a boolean, got '{}'", v),
    }
}
