//! The built-in bindings.
//!
//! Everything the initial environment knows, registered one concern per
//! module. Each module exposes a `register` function; [`base_environment`]
//! folds them into the environment every program starts from. The output
//! handle is injected so embedders and tests can capture what `println`
//! writes.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::runtime::env::Env;
use crate::runtime::value::Value;

pub mod cells;
pub mod control;
pub mod core;
pub mod lists;
pub mod math;
pub mod tags;

/// Where `println` writes.
pub type Output = Rc<RefCell<dyn Write>>;

/// Build the environment all programs start from.
pub fn base_environment(out: Output) -> Env {
    let mut env = Env::new();
    core::register(&mut env, out);
    math::register(&mut env);
    lists::register(&mut env);
    cells::register(&mut env);
    control::register(&mut env);
    tags::register(&mut env);
    env
}

/// Seed a binding. Colliding builtin names are a registration bug, not a
/// runtime condition.
pub(crate) fn bind(env: &mut Env, name: &str, value: Value) {
    *env = env
        .insert(Rc::from(name), value)
        .unwrap_or_else(|_| panic!("builtin {name} bound twice"));
}

#[cfg(test)]
pub(crate) fn test_output() -> (Output, Rc<RefCell<Vec<u8>>>) {
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let out: Output = buffer.clone();
    (out, buffer)
}
