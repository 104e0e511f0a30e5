use std::rc::Rc;

use ast::ast::{Builtin, Effect, Expr, IntType, Literal, Type};
use ast::ident::Ident;
use eval::ValueEnv;
use typechecker::TypeEnv;

/// Registers the native builtins in both top-level environments. The
/// language has no unit type, so every effect returns `0` and `newline`
/// takes a dummy integer.
pub fn install(types: &TypeEnv, values: &ValueEnv) {
    register(
        types,
        values,
        "print_int",
        Type::arrow(Type::int(), Type::int()),
        1,
        Rc::new(|args| {
            print!("{}", int_arg(args, 0));
            Expr::int(0)
        }),
    );
    register(
        types,
        values,
        "print_string",
        Type::arrow(Type::string(), Type::int()),
        1,
        Rc::new(|args| {
            print!("{}", str_arg(args, 0));
            Expr::int(0)
        }),
    );
    register(
        types,
        values,
        "newline",
        Type::arrow(Type::int(), Type::int()),
        1,
        Rc::new(|_| {
            println!();
            Expr::int(0)
        }),
    );
}

fn register(
    types: &TypeEnv,
    values: &ValueEnv,
    name: &str,
    ty: Rc<Type>,
    arity: usize,
    effect: Effect,
) {
    types.insert(Ident::new(name), ty.clone());
    values.insert(
        Ident::new(name),
        Rc::new(Expr::Builtin(Builtin::new(ty, arity, effect))),
    );
}

fn int_arg(args: &[Rc<Expr>], i: usize) -> IntType {
    match &*args[i] {
        Expr::Literal(Literal::Int(n)) => *n,
        v => panic!("builtin expected an integer argument, got '{}'", v),
    }
}

fn str_arg(args: &[Rc<Expr>], i: usize) -> String {
    match &*args[i] {
        Expr::Literal(Literal::Str(s)) => s.clone(),
        v => panic!("builtin expected a string argument, got '{}'", v),
    }
}
