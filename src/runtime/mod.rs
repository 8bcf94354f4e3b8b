//! The Quen runtime: values, environments, blocks, the evaluator, and the
//! built-in bindings.

pub mod attrs;
pub mod block;
pub mod builtins;
pub mod env;
pub mod eval;
pub mod source;
pub mod tag;
pub mod value;

pub use block::Block;
pub use builtins::{base_environment, Output};
pub use env::Env;
pub use eval::{eval, run, run_code};
pub use tag::Tag;
pub use value::{Opaque, Value};
