//! Rational arithmetic and numeric ordering.

use crate::runtime::block::{Block, Kind};
use crate::runtime::builtins::bind;
use crate::runtime::env::Env;
use crate::runtime::value::Value;

const BINARY: &[Kind] = &[Kind::Number, Kind::Number];

pub fn register(env: &mut Env) {
    bind(env, "+", Block::pure("+", BINARY, None, |args| {
        Ok(Value::Number(args[0].as_number()?.add(args[1].as_number()?)))
    }));
    bind(env, "-", Block::pure("-", BINARY, None, |args| {
        Ok(Value::Number(args[0].as_number()?.sub(args[1].as_number()?)))
    }));
    bind(env, "*", Block::pure("*", BINARY, None, |args| {
        Ok(Value::Number(args[0].as_number()?.mul(args[1].as_number()?)))
    }));
    bind(env, "/", Block::pure("/", BINARY, None, |args| {
        Ok(Value::Number(args[0].as_number()?.div(args[1].as_number()?)?))
    }));
    bind(env, "%%", Block::pure("%%", BINARY, None, |args| {
        Ok(Value::Number(
            args[0].as_number()?.modulo(args[1].as_number()?)?,
        ))
    }));
    bind(env, "neg", Block::pure("neg", &[Kind::Number], None, |args| {
        Ok(Value::Number(args[0].as_number()?.neg()))
    }));

    bind(env, "<", Block::pure("<", BINARY, None, |args| {
        Ok(Value::Bool(args[0].as_number()?.cmp(args[1].as_number()?).is_lt()))
    }));
    bind(env, "<=", Block::pure("<=", BINARY, None, |args| {
        Ok(Value::Bool(args[0].as_number()?.cmp(args[1].as_number()?).is_le()))
    }));
    bind(env, ">", Block::pure(">", BINARY, None, |args| {
        Ok(Value::Bool(args[0].as_number()?.cmp(args[1].as_number()?).is_gt()))
    }));
    bind(env, ">=", Block::pure(">=", BINARY, None, |args| {
        Ok(Value::Bool(args[0].as_number()?.cmp(args[1].as_number()?).is_ge()))
    }));
}
