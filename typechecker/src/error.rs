use std::rc::Rc;

use thiserror::Error;

use ast::ast::{Expr, Type};
use ast::ident::Ident;

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("'{0}' is not in scope")]
    NotInScope(Ident),
    #[error("expected type '{expected}' but '{expr}' has type '{actual}'")]
    Clash {
        expected: Rc<Type>,
        actual: Rc<Type>,
        expr: Rc<Expr>,
    },
    #[error("'{0}' is not a function type, it cannot be applied")]
    NotArrow(Rc<Type>),
    #[error("cannot project component {index} out of '{expr}' of type '{ty}'")]
    CannotProject {
        expr: Rc<Expr>,
        ty: Rc<Type>,
        index: usize,
    },
    #[error("recursive binding '{0}' needs a type annotation")]
    UntypedRec(Ident),
    #[error("the definition of recursive binding '{0}' must be a function")]
    RecNotFunction(Ident),
    #[error("type synonym '{0}' refers back to itself")]
    CyclicSynonym(Ident),
}
