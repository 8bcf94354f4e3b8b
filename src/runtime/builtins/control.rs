//! Control flow: branching, looping, application, local error recovery.

use crate::errors::QuenError;
use crate::runtime::attrs;
use crate::runtime::block::{Block, Kind};
use crate::runtime::builtins::bind;
use crate::runtime::env::Env;
use crate::runtime::tag;
use crate::runtime::value::Value;

pub fn register(env: &mut Env) {
    bind(env, "not", Block::pure("not", &[Kind::Bool], None, |args| {
        Ok(Value::Bool(!args[0].as_bool()?))
    }));

    // if cond then [else]. Unit and false are falsy, everything else is
    // truthy. A missing else yields unit on the false branch.
    bind(env, "if", Block::pure(
        "if",
        &[Kind::Any, Kind::Block],
        Some(Kind::Block),
        |args| {
            if args.len() > 3 {
                return Err(QuenError::arity_mismatch("2 or 3", args.len()));
            }
            if args[0].is_truthy() {
                return args[1].as_block()?.call(&[]);
            }
            match args.get(2) {
                Some(alt) => alt.as_block()?.call(&[]),
                None => Ok(Value::Unit),
            }
        },
    ));

    // Calls the body until its result carries the returner attribute, then
    // yields that returner's payload.
    bind(env, "loop", Block::pure("loop", &[Kind::Block], None, |args| {
        let body = args[0].as_block()?;
        loop {
            let value = body.call(&[])?;
            if let Some(attr) = attrs::attribute(&value, tag::ATTR_RETURNER) {
                return attr.as_block()?.call(&[value]);
            }
        }
    }));

    // Apply a block to a list of arguments.
    bind(env, "call", Block::pure("call", &[Kind::Block, Kind::List], None, |args| {
        let block = args[0].as_block()?;
        let call_args: Vec<Value> = args[1].as_list()?.iter().cloned().collect();
        block.call(&call_args)
    }));

    // Run the first block; if it errors, ignore the error and run the
    // fallback. The single local recovery mechanism.
    bind(env, "default", Block::pure(
        "default",
        &[Kind::Block, Kind::Block],
        None,
        |args| {
            let attempt = args[0].as_block()?;
            let fallback = args[1].as_block()?;
            attempt.call(&[]).or_else(|_| fallback.call(&[]))
        },
    ));
}
