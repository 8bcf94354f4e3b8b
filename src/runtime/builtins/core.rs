//! Assignment, equality, printing, and the shared constant values.

use std::rc::Rc;

use crate::errors::ErrorKind;
use crate::runtime::attrs;
use crate::runtime::block::{Block, Kind};
use crate::runtime::builtins::{bind, Output};
use crate::runtime::env::Env;
use crate::runtime::tag;
use crate::runtime::value::Value;

pub fn register(env: &mut Env, out: Output) {
    bind(env, "true", Value::Bool(true));
    bind(env, "false", Value::Bool(false));

    // The conventional attribute names, as first-class tag values.
    bind(env, "tagEq", Value::Tag(tag::ATTR_EQ));
    bind(env, "tagStringer", Value::Tag(tag::ATTR_STRINGER));
    bind(env, "tagMatcher", Value::Tag(tag::ATTR_MATCHER));
    bind(env, "tagReturner", Value::Tag(tag::ATTR_RETURNER));

    // Strict insert into the caller's scope. The name must be an atom.
    bind(env, "=", Block::with_env("=", &[Kind::Atom, Kind::Any], None, |env, args| {
        let name = args[0].as_atom()?;
        let next = env.insert(name.clone(), args[1].clone())?;
        Ok((next, Value::Unit))
    }));

    bind(env, "==", Block::pure("==", &[Kind::Any, Kind::Any], None, |args| {
        Ok(Value::Bool(attrs::equality(&args[0], &args[1])?))
    }));
    bind(env, "!=", Block::pure("!=", &[Kind::Any, Kind::Any], None, |args| {
        Ok(Value::Bool(!attrs::equality(&args[0], &args[1])?))
    }));

    let println_out = Rc::clone(&out);
    bind(env, "println", Block::pure("println", &[], Some(Kind::Any), move |args| {
        let mut handle = println_out.borrow_mut();
        let mut line = String::new();
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&attrs::string_of(arg)?);
        }
        line.push('\n');
        handle.write_all(line.as_bytes()).map_err(|err| {
            ErrorKind::Io {
                message: err.to_string(),
            }
        })?;
        Ok(Value::Unit)
    }));
}
