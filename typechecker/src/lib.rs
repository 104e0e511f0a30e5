pub mod error;
pub mod normalize;
pub mod typecheck;

pub use error::TypeError;
pub use normalize::normalize;
pub use typecheck::{type_of, type_of_decl, TypeEnv};
