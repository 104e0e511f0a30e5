use thiserror::Error;

use parser::error::ParsingError;
use typechecker::TypeError;

#[derive(Error, Debug)]
pub enum ReplError {
    #[error("{0}")]
    Parse(#[from] ParsingError),
    #[error("{0}")]
    Type(#[from] TypeError),
}
