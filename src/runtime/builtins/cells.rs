//! The mutable cell: the only first-class mutable datum. Writes are
//! observable only through `load` and `<-`.

use crate::runtime::block::{Block, Kind};
use crate::runtime::builtins::bind;
use crate::runtime::env::Env;
use crate::runtime::value::Value;

pub fn register(env: &mut Env) {
    bind(env, "mut", Block::pure("mut", &[Kind::Any], None, |args| {
        Ok(Value::cell(args[0].clone()))
    }));

    bind(env, "load", Block::pure("load", &[Kind::Mut], None, |args| {
        let cell = args[0].as_cell()?;
        let value = cell.borrow().clone();
        Ok(value)
    }));

    bind(env, "<-", Block::pure("<-", &[Kind::Mut, Kind::Any], None, |args| {
        let cell = args[0].as_cell()?;
        *cell.borrow_mut() = args[1].clone();
        Ok(Value::Unit)
    }));
}
