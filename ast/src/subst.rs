//! Free-variable analysis and capture-avoiding substitution.

use std::collections::HashSet;
use std::rc::Rc;

use log::debug;

use crate::ast::{Builtin, Expr};
use crate::ident::Ident;

/// The set of identifiers occurring free in `expr`. A lambda removes its
/// bound variable from its body's set; a builtin contributes the free
/// variables of its accumulated arguments only.
pub fn fv(expr: &Expr) -> HashSet<Ident> {
    match expr {
        Expr::Var(name) => HashSet::from([name.clone()]),
        Expr::Literal(_) => HashSet::new(),
        Expr::App(l, r) => union(fv(l), fv(r)),
        Expr::Lam { var, body, .. } => {
            let mut set = fv(body);
            set.remove(var);
            set
        }
        Expr::If(c, t, e) => union(union(fv(c), fv(t)), fv(e)),
        Expr::Annot(e, _) => fv(e),
        Expr::BinOp(l, _, r) => union(fv(l), fv(r)),
        Expr::Tuple(parts) => parts.iter().map(|e| fv(e)).fold(HashSet::new(), union),
        Expr::Proj(e, _) => fv(e),
        Expr::Builtin(b) => b.args.iter().map(|e| fv(e)).fold(HashSet::new(), union),
    }
}

fn union(mut a: HashSet<Ident>, b: HashSet<Ident>) -> HashSet<Ident> {
    a.extend(b);
    a
}

/// Replace the free occurrences of `var` in `expr` by `replacement`,
/// renaming bound variables where they would capture a free variable of the
/// replacement.
pub fn subst(expr: &Rc<Expr>, var: &Ident, replacement: &Rc<Expr>) -> Rc<Expr> {
    match &**expr {
        Expr::Var(name) => {
            if name == var {
                replacement.clone()
            } else {
                expr.clone()
            }
        }
        Expr::Literal(_) => expr.clone(),
        Expr::App(l, r) => Rc::new(Expr::App(
            subst(l, var, replacement),
            subst(r, var, replacement),
        )),
        // The binder shadows `var`: nothing underneath it is free.
        Expr::Lam { var: bound, .. } if bound == var => expr.clone(),
        Expr::Lam {
            var: bound,
            ty,
            body,
            env,
        } => {
            let free = fv(replacement);
            if free.contains(bound) {
                let avoid = union(free, fv(body));
                let renamed = fresh_in(bound, &avoid);
                debug!("alpha-renaming {} to {}", bound, renamed);
                let body = subst(body, bound, &Rc::new(Expr::Var(renamed.clone())));
                Rc::new(Expr::Lam {
                    var: renamed,
                    ty: ty.clone(),
                    body: subst(&body, var, replacement),
                    env: env.clone(),
                })
            } else {
                Rc::new(Expr::Lam {
                    var: bound.clone(),
                    ty: ty.clone(),
                    body: subst(body, var, replacement),
                    env: env.clone(),
                })
            }
        }
        Expr::If(c, t, e) => Rc::new(Expr::If(
            subst(c, var, replacement),
            subst(t, var, replacement),
            subst(e, var, replacement),
        )),
        Expr::Annot(e, ty) => Rc::new(Expr::Annot(subst(e, var, replacement), ty.clone())),
        Expr::BinOp(l, op, r) => Rc::new(Expr::BinOp(
            subst(l, var, replacement),
            *op,
            subst(r, var, replacement),
        )),
        Expr::Tuple(parts) => Rc::new(Expr::Tuple(
            parts.iter().map(|e| subst(e, var, replacement)).collect(),
        )),
        Expr::Proj(e, index) => Rc::new(Expr::Proj(subst(e, var, replacement), *index)),
        Expr::Builtin(b) => {
            let mut dup = b.fresh();
            dup.args = b.args.iter().map(|a| subst(a, var, replacement)).collect();
            Rc::new(Expr::Builtin(dup))
        }
    }
}

/// The variant of `base` with the smallest numeric suffix that avoids every
/// name in `avoid`. The name space is unbounded, so the search terminates.
pub fn fresh_in(base: &Ident, avoid: &HashSet<Ident>) -> Ident {
    let mut n = 1;
    loop {
        let candidate = base.suffixed(n);
        if !avoid.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::{fresh_in, fv, subst};
    use crate::ast::{BinOp, Expr, Type};
    use crate::ident::Ident;

    fn x() -> Ident {
        Ident::new("x")
    }

    #[test]
    fn fv_of_literal_is_empty() {
        assert!(fv(&Expr::int(1)).is_empty());
    }

    #[test]
    fn fv_lambda_removes_bound_variable() {
        let e = Expr::lam(
            "x",
            Type::int(),
            Expr::binop(Expr::var("x"), BinOp::Add, Expr::var("y")),
        );
        let free = fv(&e);
        assert_eq!(free, HashSet::from([Ident::new("y")]));
    }

    #[test]
    fn subst_replaces_free_occurrences() {
        let e = Expr::binop(Expr::var("x"), BinOp::Add, Expr::var("x"));
        let expected = Expr::binop(Expr::int(3), BinOp::Add, Expr::int(3));
        assert_eq!(subst(&e, &x(), &Expr::int(3)), expected);
    }

    #[test]
    fn subst_is_identity_when_var_not_free() {
        let e = Expr::lam(
            "x",
            Type::int(),
            Expr::binop(Expr::var("x"), BinOp::Mul, Expr::var("y")),
        );
        assert_eq!(subst(&e, &Ident::new("z"), &Expr::int(9)), e);
    }

    #[test]
    fn subst_respects_shadowing() {
        // (fn x : Int => x) keeps its own x.
        let e = Expr::lam("x", Type::int(), Expr::var("x"));
        assert_eq!(subst(&e, &x(), &Expr::int(1)), e);
    }

    #[test]
    fn subst_avoids_capture_by_renaming() {
        // (fn y : Int => x + y)[x := y]  ==>  fn y1 : Int => y + y1
        let e = Expr::lam(
            "y",
            Type::int(),
            Expr::binop(Expr::var("x"), BinOp::Add, Expr::var("y")),
        );
        let result = subst(&e, &x(), &Expr::var("y"));
        let expected = Expr::lam(
            "y1",
            Type::int(),
            Expr::binop(Expr::var("y"), BinOp::Add, Expr::var("y1")),
        );
        assert_eq!(result, expected);
    }

    #[test]
    fn fresh_in_picks_smallest_unused_suffix() {
        let avoid = HashSet::from([Ident::new("y1"), Ident::new("y2")]);
        assert_eq!(fresh_in(&Ident::new("y"), &avoid), Ident::new("y3"));
        assert_eq!(fresh_in(&Ident::new("z"), &avoid), Ident::new("z1"));
    }

    #[test]
    fn builtin_arguments_are_substituted() {
        let plus = crate::ast::Builtin::new(
            Type::arrow(Type::int(), Type::arrow(Type::int(), Type::int())),
            2,
            Rc::new(|_: &[Rc<Expr>]| Expr::int(0)),
        );
        let partial = Rc::new(Expr::Builtin(plus.applied(Expr::var("x"))));
        assert_eq!(fv(&partial), HashSet::from([x()]));
        let filled = subst(&partial, &x(), &Expr::int(5));
        assert!(fv(&filled).is_empty());
    }
}
