use std::rc::Rc;

use log::info;

use ast::ast::{BinOp, Decl, Expr, Literal, Type};
use ast::env::Env;

use crate::error::TypeError;
use crate::normalize::{is_cyclic, normalize};

/// One environment serves both identifiers and type synonyms: value names
/// are lowercase and synonym names capitalized, so they cannot collide.
pub type TypeEnv = Env<Rc<Type>>;

pub fn type_of(env: &TypeEnv, expr: &Rc<Expr>) -> Result<Rc<Type>, TypeError> {
    match &**expr {
        Expr::Var(name) => env
            .lookup(name)
            .ok_or_else(|| TypeError::NotInScope(name.clone())),
        Expr::Literal(Literal::Int(_)) => Ok(Type::int()),
        Expr::Literal(Literal::Bool(_)) => Ok(Type::bool()),
        Expr::Literal(Literal::Str(_)) => Ok(Type::string()),
        Expr::App(l, r) => {
            let fun_ty = normalize(env, &type_of(env, l)?);
            let (dom, rng) = match &*fun_ty {
                Type::Arrow(dom, rng) => (dom.clone(), rng.clone()),
                _ => return Err(TypeError::NotArrow(fun_ty)),
            };
            check_eq(env, &dom, r)?;
            Ok(rng)
        }
        Expr::Lam { var, ty, body, .. } => {
            let inner = env.extended(var.clone(), ty.clone());
            let body_ty = type_of(&inner, body)?;
            Ok(Type::arrow(ty.clone(), body_ty))
        }
        Expr::If(c, t, e) => {
            check_eq(env, &Type::bool(), c)?;
            let t_ty = type_of(env, t)?;
            check_eq(env, &t_ty, e)?;
            Ok(t_ty)
        }
        Expr::Annot(e, ty) => {
            // The annotation itself is the result, so the synonym name the
            // programmer wrote survives.
            check_eq(env, &normalize(env, ty), e)?;
            Ok(ty.clone())
        }
        Expr::BinOp(l, op, r) => type_of_binop(env, l, *op, r),
        Expr::Tuple(es) => {
            let tys = es
                .iter()
                .map(|e| type_of(env, e))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Type::tuple(tys))
        }
        Expr::Proj(e, index) => {
            let tuple_ty = normalize(env, &type_of(env, e)?);
            match &*tuple_ty {
                Type::Tuple(parts) if *index < parts.len() => Ok(parts[*index].clone()),
                _ => Err(TypeError::CannotProject {
                    expr: e.clone(),
                    ty: tuple_ty,
                    index: *index,
                }),
            }
        }
        Expr::Builtin(b) => {
            // Walk one arrow layer per argument already accumulated; what
            // remains is the type of the partial application.
            let mut remaining = b.ty.clone();
            for arg in &b.args {
                remaining = normalize(env, &remaining);
                let (dom, rng) = match &*remaining {
                    Type::Arrow(dom, rng) => (dom.clone(), rng.clone()),
                    _ => return Err(TypeError::NotArrow(remaining)),
                };
                check_eq(env, &dom, arg)?;
                remaining = rng;
            }
            Ok(remaining)
        }
    }
}

/// Declaration-level checking. Accepted bindings go into the innermost frame
/// of `env`, which is how both the REPL top level and module bodies grow.
pub fn type_of_decl(env: &TypeEnv, decl: &Decl) -> Result<Rc<Type>, TypeError> {
    match decl {
        Decl::TypeAlias(name, ty) => {
            info!("Registering type synonym {} = {}", name, ty);
            // Expanding the definition must not come back to a name on the
            // expansion path, or normalization would never terminate.
            if is_cyclic(env, name, ty) {
                return Err(TypeError::CyclicSynonym(name.clone()));
            }
            env.insert(name.clone(), ty.clone());
            Ok(ty.clone())
        }
        Decl::Val {
            name,
            rec,
            ty: None,
            def,
        } => {
            if *rec {
                return Err(TypeError::UntypedRec(name.clone()));
            }
            let ty = type_of(env, def)?;
            env.insert(name.clone(), ty.clone());
            Ok(ty)
        }
        Decl::Val {
            name,
            rec,
            ty: Some(ty),
            def,
        } => {
            // A recursive definition sees its own name, at the annotated
            // type, while its body is checked. Only functions may recurse:
            // anything else would read its own binding while the binding is
            // still being evaluated.
            if *rec && !is_lambda(def) {
                return Err(TypeError::RecNotFunction(name.clone()));
            }
            let scope = if *rec {
                env.extended(name.clone(), ty.clone())
            } else {
                env.clone()
            };
            check_eq(&scope, &normalize(env, ty), def)?;
            env.insert(name.clone(), ty.clone());
            Ok(ty.clone())
        }
        Decl::SExpr(e) => type_of(env, e),
        Decl::Module(name, decls) => {
            info!("Checking module {}", name);
            let mut last = None;
            for decl in decls {
                last = Some(type_of_decl(env, decl)?);
            }
            Ok(last.unwrap_or_else(|| Type::tuple(vec![])))
        }
    }
}

/// Annotations are transparent, so a parenthesized annotated lambda still
/// counts as one.
fn is_lambda(def: &Rc<Expr>) -> bool {
    match &**def {
        Expr::Lam { .. } => true,
        Expr::Annot(e, _) => is_lambda(e),
        _ => false,
    }
}

/// Types `expr` and demands structural equality with `expected`.
fn check_eq(env: &TypeEnv, expected: &Rc<Type>, expr: &Rc<Expr>) -> Result<(), TypeError> {
    let actual = type_of(env, expr)?;
    if actual == *expected {
        Ok(())
    } else {
        Err(TypeError::Clash {
            expected: expected.clone(),
            actual,
            expr: expr.clone(),
        })
    }
}

fn type_of_binop(
    env: &TypeEnv,
    l: &Rc<Expr>,
    op: BinOp,
    r: &Rc<Expr>,
) -> Result<Rc<Type>, TypeError> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
            check_eq(env, &Type::int(), l)?;
            check_eq(env, &Type::int(), r)?;
            Ok(Type::int())
        }
        BinOp::Lt | BinOp::Le | BinOp::Eq | BinOp::Ge | BinOp::Gt | BinOp::Neq => {
            check_eq(env, &Type::int(), l)?;
            check_eq(env, &Type::int(), r)?;
            Ok(Type::bool())
        }
        BinOp::And | BinOp::Or | BinOp::Iff => {
            check_eq(env, &Type::bool(), l)?;
            check_eq(env, &Type::bool(), r)?;
            Ok(Type::bool())
        }
        BinOp::Seq => {
            // The left side runs for its effect, any type goes.
            type_of(env, l)?;
            type_of(env, r)
        }
    }
}
