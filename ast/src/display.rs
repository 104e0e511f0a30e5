//! Rendering at ambient precedence: each node knows the precedence of the
//! context it is printed into and parenthesizes itself when it binds looser.

use std::fmt::{Display, Formatter, Result};

use crate::ast::{Assoc, BinOp, Decl, Expr, Literal, Type};

fn open_if(f: &mut Formatter<'_>, cond: bool) -> Result {
    if cond {
        write!(f, "(")?;
    }
    Ok(())
}

fn close_if(f: &mut Formatter<'_>, cond: bool) -> Result {
    if cond {
        write!(f, ")")?;
    }
    Ok(())
}

impl Type {
    // Precedence levels: arrow 1, tuple 2, atoms above.
    fn fmt_prec(&self, f: &mut Formatter<'_>, prec: u8) -> Result {
        match self {
            Type::Named(name) => write!(f, "{}", name),
            Type::Int => write!(f, "Int"),
            Type::Bool => write!(f, "Bool"),
            Type::String => write!(f, "String"),
            Type::Arrow(dom, rng) => {
                let parens = prec > 1;
                open_if(f, parens)?;
                dom.fmt_prec(f, 2)?;
                write!(f, " -> ")?;
                rng.fmt_prec(f, 1)?;
                close_if(f, parens)
            }
            Type::Tuple(parts) => {
                let parens = prec > 2;
                open_if(f, parens)?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " * ")?;
                    }
                    part.fmt_prec(f, 3)?;
                }
                close_if(f, parens)
            }
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.fmt_prec(f, 0)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl Expr {
    // Application binds at 10, projection at 11; lambdas and conditionals
    // reach to the right and parenthesize in any tighter context.
    fn fmt_prec(&self, f: &mut Formatter<'_>, prec: u8) -> Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::App(l, r) => {
                let parens = prec > 10;
                open_if(f, parens)?;
                l.fmt_prec(f, 10)?;
                write!(f, " ")?;
                r.fmt_prec(f, 11)?;
                close_if(f, parens)
            }
            Expr::Lam { var, ty, body, .. } => {
                let parens = prec > 0;
                open_if(f, parens)?;
                write!(f, "fn {} : {} => ", var, ty)?;
                body.fmt_prec(f, 0)?;
                close_if(f, parens)
            }
            Expr::If(c, t, e) => {
                let parens = prec > 0;
                open_if(f, parens)?;
                write!(f, "if ")?;
                c.fmt_prec(f, 0)?;
                write!(f, " then ")?;
                t.fmt_prec(f, 0)?;
                write!(f, " else ")?;
                e.fmt_prec(f, 0)?;
                close_if(f, parens)
            }
            Expr::Annot(e, ty) => {
                write!(f, "(")?;
                e.fmt_prec(f, 0)?;
                write!(f, " : {})", ty)
            }
            Expr::BinOp(l, op, r) => {
                let p = op.prec();
                let (lp, rp) = match op.assoc() {
                    Assoc::Left => (p, p + 1),
                    Assoc::Right => (p + 1, p),
                    Assoc::None => (p + 1, p + 1),
                };
                // A sequence is only readable back inside parentheses.
                let parens = prec > p || *op == BinOp::Seq;
                open_if(f, parens)?;
                l.fmt_prec(f, lp)?;
                if *op == BinOp::Seq {
                    write!(f, "; ")?;
                } else {
                    write!(f, " {} ", op.symbol())?;
                }
                r.fmt_prec(f, rp)?;
                close_if(f, parens)
            }
            Expr::Tuple(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    part.fmt_prec(f, 0)?;
                }
                write!(f, ")")
            }
            Expr::Proj(e, index) => {
                e.fmt_prec(f, 11)?;
                write!(f, ".{}", index)
            }
            Expr::Builtin(_) => write!(f, "<builtin>"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.fmt_prec(f, 0)
    }
}

impl Display for Decl {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Decl::TypeAlias(name, ty) => write!(f, "type {} = {};", name, ty),
            Decl::Val { name, rec, ty, def } => {
                write!(f, "val ")?;
                if *rec {
                    write!(f, "rec ")?;
                }
                write!(f, "{}", name)?;
                if let Some(ty) = ty {
                    write!(f, " : {}", ty)?;
                }
                write!(f, " = {};", def)
            }
            Decl::SExpr(e) => write!(f, "{};", e),
            Decl::Module(name, decls) => {
                write!(f, "module {} = struct", name)?;
                for decl in decls {
                    write!(f, " {}", decl)?;
                }
                write!(f, " end")
            }
        }
    }
}
