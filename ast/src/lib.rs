//! Core data model for camlet: identifiers, types, expressions and
//! declarations, the chained scope environment, free-variable analysis and
//! capture-avoiding substitution.

pub mod ast;
pub mod display;
pub mod env;
pub mod ident;
pub mod subst;
