//! The evaluator.
//!
//! A depth-first walk over parse elements, threading the environment
//! left-to-right so environment-threading primitives like `=` extend the
//! caller's scope for everything that follows. Errors pick up the position
//! of the element they surfaced in, and every call boundary stacks the
//! call site on top.

use std::rc::Rc;

use im::Vector;

use crate::errors::{ErrorKind, Result};
use crate::runtime::attrs;
use crate::runtime::block::{Block, CodeBlock};
use crate::runtime::env::Env;
use crate::runtime::value::Value;
use crate::syntax::{Element, ElementKind};

/// Evaluate one element, producing the (possibly extended) environment and
/// the element's value.
pub fn eval(env: Env, element: &Element) -> Result<(Env, Value)> {
    eval_inner(env, element).map_err(|e| e.positioned(&element.pos))
}

fn eval_inner(env: Env, element: &Element) -> Result<(Env, Value)> {
    match &element.kind {
        ElementKind::Ref(name) => match env.get(name) {
            Some(value) => Ok((env, value)),
            None => Err(ErrorKind::UnknownVariable {
                name: name.to_string(),
            }
            .into()),
        },
        ElementKind::Atom(name) => {
            let value = Value::Atom(name.clone());
            Ok((env, value))
        }
        ElementKind::String(text) => Ok((env, Value::String(text.clone()))),
        ElementKind::Number(n) => Ok((env, Value::Number(n.clone()))),
        ElementKind::Unit => Ok((env, Value::Unit)),
        ElementKind::List(elements) => {
            let mut env = env;
            let mut items = Vector::new();
            for element in elements {
                let (next, value) = eval(env, element)?;
                env = next;
                items.push_back(value);
            }
            Ok((env, Value::List(items)))
        }
        ElementKind::Block(code) => {
            let block = Block::Interpreted(CodeBlock {
                env: env.clone(),
                code: code.clone(),
            });
            Ok((env, Value::Block(Rc::new(block))))
        }
        ElementKind::Call { first, args } => {
            let (env, first_value) = eval(env, first)?;
            let Value::Block(block) = &first_value else {
                return Err(ErrorKind::NotCallable {
                    actual: first_value.describe(),
                }
                .into());
            };
            let block = block.clone();

            let mut env = env;
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                let (next, value) = eval(env, arg)?;
                env = next;
                values.push(value);
            }

            block
                .call_with_env(env, &values)
                .map_err(|e| e.with_call_site(&element.pos))
        }
    }
}

/// Execute a block body: elements in order, environment threaded. A
/// non-final element whose value carries the `returner` attribute stops
/// execution; that value is yielded unchanged for a returner-aware caller
/// (the `loop` primitive, the lambda epilogue) to unwrap. The final
/// element's value is returned without the check. An empty body yields
/// unit.
pub fn run_code(env: Env, code: &[Element]) -> Result<(Env, Value)> {
    let Some((last, init)) = code.split_last() else {
        return Ok((env, Value::Unit));
    };
    let mut env = env;
    for element in init {
        let (next, value) = eval(env, element)?;
        env = next;
        if attrs::has_returner(&value) {
            return Ok((env, value));
        }
    }
    eval(env, last)
}

/// Run a top-level program block, returning the extended environment (so a
/// prelude run seeds the environment of the program after it) and the last
/// element's value.
pub fn run(env: Env, program: &[Element]) -> Result<(Env, Value)> {
    run_code(env, program)
}
