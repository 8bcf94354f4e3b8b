//! Tags, attributes, opaque construction, and the block builders that the
//! user-level lambda and operator layers stand on.

use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::{ErrorKind, QuenError};
use crate::runtime::attrs;
use crate::runtime::block::{BindingBlock, Block, CodeBlock, Kind};
use crate::runtime::builtins::bind;
use crate::runtime::env::Env;
use crate::runtime::eval::run_code;
use crate::runtime::tag::Tag;
use crate::runtime::value::{Opaque, Value};

pub fn register(env: &mut Env) {
    bind(env, "newTag", Block::pure("newTag", &[Kind::Unit], None, |_| {
        Ok(Value::Tag(Tag::mint()))
    }));

    bind(env, "tag", Block::pure("tag", &[Kind::Any], None, |args| {
        Ok(Value::Tag(args[0].tag()))
    }));

    bind(env, "atom", Block::pure("atom", &[Kind::String], None, |args| {
        Ok(Value::Atom(args[0].as_string()?.clone()))
    }));

    bind(env, "attr", Block::pure("attr", &[Kind::Any, Kind::Tag], None, |args| {
        let tag = args[1].as_tag()?;
        attrs::attribute(&args[0], tag).ok_or_else(|| {
            QuenError::new(ErrorKind::AttributeMissing {
                attr: attrs::attr_name(tag).to_string(),
                value: args[0].describe(),
            })
        })
    }));

    // opaque inner tag [attrTag value]...
    bind(env, "opaque", Block::pure(
        "opaque",
        &[Kind::Any, Kind::Tag],
        Some(Kind::List),
        |args| {
            let declared = args[1].as_tag()?;
            let mut attrs_map = HashMap::new();
            for pair in &args[2..] {
                let entry = pair.as_list()?;
                if entry.len() != 2 {
                    return Err(QuenError::type_mismatch(
                        "[tag value] pair",
                        pair.describe(),
                    ));
                }
                let attr_tag = entry[0].as_tag()?;
                if attrs_map.insert(attr_tag, entry[1].clone()).is_some() {
                    return Err(ErrorKind::DuplicateAttribute.into());
                }
            }
            Ok(Value::Opaque(Rc::new(Opaque {
                tag: declared,
                inner: args[0].clone(),
                attrs: attrs_map,
            })))
        },
    ));

    // The inner value comes back only on presenting the declared tag.
    bind(env, "unopaque", Block::pure(
        "unopaque",
        &[Kind::Opaque, Kind::Tag],
        None,
        |args| {
            let opaque = args[0].as_opaque()?;
            if opaque.tag != args[1].as_tag()? {
                return Err(ErrorKind::OpaqueTagMismatch.into());
            }
            Ok(opaque.inner.clone())
        },
    ));

    bind(env, "opaqueTagEq", Block::pure(
        "opaqueTagEq",
        &[Kind::Opaque, Kind::Tag],
        None,
        |args| {
            let opaque = args[0].as_opaque()?;
            Ok(Value::Bool(opaque.tag == args[1].as_tag()?))
        },
    ));

    // argumentify before body after: compose three interpreted blocks into
    // an argument-binding block.
    bind(env, "argumentify", Block::pure(
        "argumentify",
        &[Kind::Block, Kind::Block, Kind::Block],
        None,
        |args| {
            let before = interpreted(&args[0])?;
            let body = interpreted(&args[1])?;
            let after = interpreted(&args[2])?;
            Ok(Value::Block(Rc::new(Block::Binding(BindingBlock {
                before,
                body,
                after,
            }))))
        },
    ));

    // defop sym lhs rhs block: install a two-argument operator that binds
    // the operand names into the block's captured environment.
    bind(env, "defop", Block::with_env(
        "defop",
        &[Kind::String, Kind::Atom, Kind::Atom, Kind::Block],
        None,
        |env, args| {
            let symbol = args[0].as_string()?.clone();
            let lhs = args[1].as_atom()?.clone();
            let rhs = args[2].as_atom()?.clone();
            let code = interpreted(&args[3])?;
            let operator = Block::pure(
                "operator",
                &[Kind::Any, Kind::Any],
                None,
                move |op_args| {
                    let inner = code.env.insert(lhs.clone(), op_args[0].clone())?;
                    let inner = inner.insert(rhs.clone(), op_args[1].clone())?;
                    run_code(inner, &code.code).map(|(_, v)| v)
                },
            );
            let next = env.insert(symbol, operator)?;
            Ok((next, Value::Unit))
        },
    ));
}

fn interpreted(value: &Value) -> Result<CodeBlock, QuenError> {
    match value.as_block()?.as_ref() {
        Block::Interpreted(code) => Ok(code.clone()),
        _ => Err(QuenError::type_mismatch("interpreted block", value.describe())),
    }
}
