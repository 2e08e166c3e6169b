//! The parser/evaluator: two mutually-recursive Pratt grammars (numeric and
//! sequence expressions) sharing one [`Context`], plus the statement layer
//! built on top of them.

pub mod binding_power;
pub mod context;
pub(crate) mod errors;
pub mod literal;
pub mod sequence;
pub mod statement;

pub use context::Context;
pub use statement::program;
