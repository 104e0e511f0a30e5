use std::{env, process::exit};

use crate::repl::Repl;

mod error;
mod init_env;
mod repl;

fn main() {
    env_logger::init();
    let files: Vec<String> = env::args().skip(1).collect();
    let repl = Repl::new();
    if files.is_empty() {
        if let Err(err) = repl.run() {
            eprintln!("{}", err);
            exit(-1);
        }
        return;
    }
    for path in files {
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                if let Err(err) = repl.load(&source) {
                    eprintln!("Error in {}: {}", path, err);
                    exit(-1);
                }
            }
            Err(err) => {
                eprintln!("Ran into error while trying to open {}.", path);
                eprintln!("{}", err);
                exit(-1);
            }
        }
    }
}
