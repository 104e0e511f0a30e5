use std::fmt;
use std::rc::Rc;

use crate::env::Env;
use crate::ident::Ident;

pub type IntType = i64;

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Named(Ident),
    Int,
    Bool,
    String,
    Arrow(Rc<Type>, Rc<Type>),
    Tuple(Vec<Rc<Type>>),
}

impl Type {
    pub fn int() -> Rc<Type> {
        Rc::new(Type::Int)
    }

    pub fn bool() -> Rc<Type> {
        Rc::new(Type::Bool)
    }

    pub fn string() -> Rc<Type> {
        Rc::new(Type::String)
    }

    pub fn named(name: impl Into<Rc<str>>) -> Rc<Type> {
        Rc::new(Type::Named(Ident::new(name)))
    }

    pub fn arrow(dom: Rc<Type>, rng: Rc<Type>) -> Rc<Type> {
        Rc::new(Type::Arrow(dom, rng))
    }

    pub fn tuple(parts: Vec<Rc<Type>>) -> Rc<Type> {
        Rc::new(Type::Tuple(parts))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(IntType),
    Bool(bool),
    Str(String),
}

#[derive(Debug, Clone)]
pub enum Decl {
    TypeAlias(Ident, Rc<Type>),
    Val {
        name: Ident,
        rec: bool,
        ty: Option<Rc<Type>>,
        def: Rc<Expr>,
    },
    SExpr(Rc<Expr>),
    Module(Ident, Vec<Decl>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Var(Ident),
    Literal(Literal),
    App(Rc<Expr>, Rc<Expr>),
    /// A lambda doubles as the closure value it evaluates to: evaluation
    /// produces a copy of the node with `env` filled in, and an
    /// already-captured lambda evaluates to itself.
    Lam {
        var: Ident,
        ty: Rc<Type>,
        body: Rc<Expr>,
        env: Option<Env<Rc<Expr>>>,
    },
    If(Rc<Expr>, Rc<Expr>, Rc<Expr>),
    Annot(Rc<Expr>, Rc<Type>),
    BinOp(Rc<Expr>, BinOp, Rc<Expr>),
    Tuple(Vec<Rc<Expr>>),
    Proj(Rc<Expr>, usize),
    Builtin(Builtin),
}

impl Expr {
    pub fn int(n: IntType) -> Rc<Expr> {
        Rc::new(Expr::Literal(Literal::Int(n)))
    }

    pub fn bool(b: bool) -> Rc<Expr> {
        Rc::new(Expr::Literal(Literal::Bool(b)))
    }

    pub fn string(s: impl Into<String>) -> Rc<Expr> {
        Rc::new(Expr::Literal(Literal::Str(s.into())))
    }

    pub fn var(name: impl Into<Rc<str>>) -> Rc<Expr> {
        Rc::new(Expr::Var(Ident::new(name)))
    }

    pub fn app(f: Rc<Expr>, arg: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::App(f, arg))
    }

    pub fn lam(var: impl Into<Rc<str>>, ty: Rc<Type>, body: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::Lam {
            var: Ident::new(var),
            ty,
            body,
            env: None,
        })
    }

    pub fn binop(l: Rc<Expr>, op: BinOp, r: Rc<Expr>) -> Rc<Expr> {
        Rc::new(Expr::BinOp(l, op, r))
    }

    pub fn tuple(parts: Vec<Rc<Expr>>) -> Rc<Expr> {
        Rc::new(Expr::Tuple(parts))
    }

    pub fn proj(e: Rc<Expr>, index: usize) -> Rc<Expr> {
        Rc::new(Expr::Proj(e, index))
    }
}

/// Equality is structural. Captured environments are ignored: a closure and
/// the lambda it was made from are the same term.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Var(a), Expr::Var(b)) => a == b,
            (Expr::Literal(a), Expr::Literal(b)) => a == b,
            (Expr::App(f1, a1), Expr::App(f2, a2)) => f1 == f2 && a1 == a2,
            (
                Expr::Lam {
                    var: v1,
                    ty: t1,
                    body: b1,
                    ..
                },
                Expr::Lam {
                    var: v2,
                    ty: t2,
                    body: b2,
                    ..
                },
            ) => v1 == v2 && t1 == t2 && b1 == b2,
            (Expr::If(c1, t1, e1), Expr::If(c2, t2, e2)) => c1 == c2 && t1 == t2 && e1 == e2,
            (Expr::Annot(e1, t1), Expr::Annot(e2, t2)) => e1 == e2 && t1 == t2,
            (Expr::BinOp(l1, o1, r1), Expr::BinOp(l2, o2, r2)) => {
                o1 == o2 && l1 == l2 && r1 == r2
            }
            (Expr::Tuple(a), Expr::Tuple(b)) => a == b,
            (Expr::Proj(e1, i1), Expr::Proj(e2, i2)) => i1 == i2 && e1 == e2,
            (Expr::Builtin(a), Expr::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

/// A native operation registered by the host: a static function type, the
/// number of arguments the effect needs, the arguments accumulated so far,
/// and the effect itself. The core knows nothing about what the effect does.
#[derive(Clone)]
pub struct Builtin {
    pub ty: Rc<Type>,
    pub arity: usize,
    pub args: Vec<Rc<Expr>>,
    pub effect: Effect,
}

pub type Effect = Rc<dyn Fn(&[Rc<Expr>]) -> Rc<Expr>>;

impl Builtin {
    pub fn new(ty: Rc<Type>, arity: usize, effect: Effect) -> Builtin {
        Builtin {
            ty,
            arity,
            args: Vec::new(),
            effect,
        }
    }

    /// Whether every argument the arity requires has been accumulated.
    pub fn saturated(&self) -> bool {
        self.args.len() == self.arity
    }

    /// A duplicate with an independent argument accumulator.
    pub fn fresh(&self) -> Builtin {
        Builtin {
            ty: self.ty.clone(),
            arity: self.arity,
            args: self.args.clone(),
            effect: self.effect.clone(),
        }
    }

    /// The builtin with one more argument accumulated.
    pub fn applied(&self, arg: Rc<Expr>) -> Builtin {
        debug_assert!(self.args.len() < self.arity);
        let mut dup = self.fresh();
        dup.args.push(arg);
        dup
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        let ours = Rc::as_ptr(&self.effect) as *const ();
        let theirs = Rc::as_ptr(&other.effect) as *const ();
        ours == theirs && self.arity == other.arity && self.args == other.args
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("ty", &self.ty)
            .field("arity", &self.arity)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
    Neq,
    And,
    Or,
    Iff,
    Seq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    None,
    Right,
}

impl BinOp {
    /// Printer precedence; higher binds tighter.
    pub fn prec(self) -> u8 {
        match self {
            BinOp::Seq => 1,
            BinOp::Iff => 2,
            BinOp::Or => 3,
            BinOp::And => 4,
            BinOp::Lt | BinOp::Le | BinOp::Eq | BinOp::Ge | BinOp::Gt | BinOp::Neq => 5,
            BinOp::Add | BinOp::Sub => 6,
            BinOp::Mul | BinOp::Div => 7,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => Assoc::Left,
            BinOp::Lt | BinOp::Le | BinOp::Eq | BinOp::Ge | BinOp::Gt | BinOp::Neq => Assoc::None,
            BinOp::And | BinOp::Or | BinOp::Iff | BinOp::Seq => Assoc::Right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Eq => "==",
            BinOp::Ge => ">=",
            BinOp::Gt => ">",
            BinOp::Neq => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Iff => "<->",
            BinOp::Seq => ";",
        }
    }
}
