use std::io::{self, BufRead, Write};

use log::info;

use ast::ast::Decl;
use eval::{eval, ValueEnv};
use typechecker::{type_of_decl, TypeEnv};

use crate::error::ReplError;
use crate::init_env;

pub struct Repl {
    type_env: TypeEnv,
    value_env: ValueEnv,
}

impl Repl {
    pub fn new() -> Repl {
        let repl = Repl {
            type_env: TypeEnv::new(),
            value_env: ValueEnv::new(),
        };
        init_env::install(&repl.type_env, &repl.value_env);
        repl
    }

    /// Parses, checks and evaluates a whole source text. The first error
    /// stops processing; declarations accepted before it stay bound.
    pub fn load(&self, source: &str) -> Result<(), ReplError> {
        for decl in parser::parse(source)? {
            self.process(&decl)?;
        }
        Ok(())
    }

    fn process(&self, decl: &Decl) -> Result<(), ReplError> {
        match decl {
            Decl::Module(name, decls) => {
                // Module members land, one by one, in the enclosing scope.
                info!("Processing module {}", name);
                for decl in decls {
                    self.process(decl)?;
                }
            }
            Decl::TypeAlias(name, ty) => {
                type_of_decl(&self.type_env, decl)?;
                println!("type {} = {}", name, ty);
            }
            Decl::Val { name, def, .. } => {
                let ty = type_of_decl(&self.type_env, decl)?;
                let v = eval(&self.value_env, def);
                self.value_env.insert(name.clone(), v.clone());
                println!("val {} : {} = {}", name, ty, v);
            }
            Decl::SExpr(e) => {
                let ty = type_of_decl(&self.type_env, decl)?;
                let v = eval(&self.value_env, e);
                println!("- : {} = {}", ty, v);
            }
        }
        Ok(())
    }

    /// Interactive loop: keeps reading lines until the buffer looks like a
    /// complete declaration, then processes it and keeps going on errors.
    pub fn run(&self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut buffer = String::new();
        write!(stdout, "> ")?;
        stdout.flush()?;
        for line in stdin.lock().lines() {
            buffer.push_str(&line?);
            buffer.push('\n');
            if complete(&buffer) {
                if let Err(err) = self.load(&buffer) {
                    eprintln!("Error: {}", err);
                }
                buffer.clear();
            }
            write!(stdout, "{}", if buffer.is_empty() { "> " } else { "  " })?;
            stdout.flush()?;
        }
        Ok(())
    }
}

/// A buffer is complete once every `struct` has its `end` and, outside
/// modules, once a `;` shows up. Purely lexical, so a `;` inside a string
/// literal fools it; the parse error that follows is recoverable.
fn complete(input: &str) -> bool {
    let structs = input.split_whitespace().filter(|w| *w == "struct").count();
    if structs > 0 {
        let ends = input.split_whitespace().filter(|w| *w == "end").count();
        ends >= structs
    } else {
        input.contains(';')
    }
}

#[cfg(test)]
mod tests {
    use super::{complete, Repl};

    #[test]
    fn loads_a_program_end_to_end() {
        let _ = env_logger::try_init();
        let repl = Repl::new();
        repl.load(
            "val rec fact : Int -> Int = \
             fn n : Int => if n <= 1 then 1 else n * fact (n - 1); \
             fact 5;",
        )
        .unwrap();
    }

    #[test]
    fn module_members_are_visible_afterwards() {
        let repl = Repl::new();
        repl.load(
            "module Counter = struct type T = Int; val zero : T = 0; \
             val next = fn c : Int => c + 1; end \
             next (next 0); zero;",
        )
        .unwrap();
    }

    #[test]
    fn errors_leave_the_session_usable() {
        let repl = Repl::new();
        assert!(repl.load("1 + true;").is_err());
        assert!(repl.load("val x = ;").is_err());
        repl.load("val x = 2; x * x;").unwrap();
    }

    #[test]
    fn recursion_through_a_value_is_an_error_not_a_crash() {
        // The checker must turn this away; letting it through would have
        // evaluation read the binding before it exists.
        let repl = Repl::new();
        assert!(repl.load("val rec x : Int = x + 1;").is_err());
        repl.load("val x = 1; x;").unwrap();
    }

    #[test]
    fn cyclic_synonyms_are_an_error_not_a_crash() {
        let repl = Repl::new();
        assert!(repl.load("type A = B; type B = A; (3 : A);").is_err());
        repl.load("type C = Int; (3 : C);").unwrap();
    }

    #[test]
    fn builtins_are_usable_from_source() {
        let repl = Repl::new();
        repl.load("(print_string \"ok\"; newline 0);").unwrap();
        repl.load("val p = print_int; p 3;").unwrap();
    }

    #[test]
    fn input_completion_heuristic() {
        assert!(complete("val x = 1;"));
        assert!(!complete("val x ="));
        assert!(!complete("module M = struct val x = 1;"));
        assert!(complete("module M = struct val x = 1; end"));
        assert!(!complete("module M = struct module N = struct end"));
    }
}
