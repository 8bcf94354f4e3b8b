//! List operations. All of them persistent: the argument list is never
//! touched, results share structure with it.

use im::Vector;

use crate::errors::ErrorKind;
use crate::number::Number;
use crate::runtime::block::{Block, Kind};
use crate::runtime::builtins::bind;
use crate::runtime::env::Env;
use crate::runtime::value::Value;

pub fn register(env: &mut Env) {
    bind(env, "@", Block::pure("@", &[Kind::List, Kind::Number], None, |args| {
        let list = args[0].as_list()?;
        let index = args[1].as_number()?;
        let i = index.to_usize()?;
        match list.get(i) {
            Some(value) => Ok(value.clone()),
            None => Err(ErrorKind::IndexOutOfRange {
                index: index.to_string(),
                length: list.len(),
            }
            .into()),
        }
    }));

    bind(env, "len", Block::pure("len", &[Kind::List], None, |args| {
        Ok(Value::Number(Number::from_integer(args[0].as_list()?.len() as i64)))
    }));

    bind(env, "append", Block::pure("append", &[Kind::List, Kind::Any], None, |args| {
        let mut next = args[0].as_list()?.clone();
        next.push_back(args[1].clone());
        Ok(Value::List(next))
    }));

    bind(env, "append_list", Block::pure(
        "append_list",
        &[Kind::List, Kind::List],
        None,
        |args| {
            let mut next = args[0].as_list()?.clone();
            next.append(args[1].as_list()?.clone());
            Ok(Value::List(next))
        },
    ));

    bind(env, "slice", Block::pure(
        "slice",
        &[Kind::List, Kind::Number, Kind::Number],
        None,
        |args| {
            let list = args[0].as_list()?;
            let from = args[1].as_number()?.to_usize()?;
            let to = args[2].as_number()?.to_usize()?;
            if from > list.len() {
                return Err(ErrorKind::SliceOutOfRange {
                    bound: "from",
                    value: from,
                }
                .into());
            }
            if to > list.len() {
                return Err(ErrorKind::SliceOutOfRange {
                    bound: "to",
                    value: to,
                }
                .into());
            }
            if from > to {
                return Err(ErrorKind::SliceReversed { from, to }.into());
            }
            let next: Vector<Value> = list.iter().skip(from).take(to - from).cloned().collect();
            Ok(Value::List(next))
        },
    ));
}
