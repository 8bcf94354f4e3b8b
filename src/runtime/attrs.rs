//! The attribute registry.
//!
//! Behaviour — equality, printing, pattern matching, cooperative early
//! return — is resolved per tag through attributes. For every built-in
//! variant the table below answers; an opaque value answers exclusively
//! from the attribute map it carries, so user code can overlay any of
//! these on top of an existing value.

use im::Vector;

use crate::errors::{ErrorKind, QuenError, Result};
use crate::runtime::block::{Block, Kind};
use crate::runtime::tag::{self, Tag};
use crate::runtime::value::Value;

/// Look up an attribute of a value. Opaques consult their own map; every
/// other variant consults the built-in table.
pub fn attribute(value: &Value, attr: Tag) -> Option<Value> {
    if let Value::Opaque(o) = value {
        return o.attrs.get(&attr).cloned();
    }
    match attr {
        tag::ATTR_EQ => Some(eq_block()),
        tag::ATTR_STRINGER => Some(stringer_block()),
        tag::ATTR_MATCHER => Some(match value {
            Value::Atom(_) => atom_matcher_block(),
            Value::List(_) => list_matcher_block(),
            _ => equality_matcher_block(),
        }),
        // No built-in value is an early-return signal.
        _ => None,
    }
}

/// Human name for an attribute tag, for error messages.
pub fn attr_name(attr: Tag) -> &'static str {
    match attr {
        tag::ATTR_EQ => "eq",
        tag::ATTR_STRINGER => "stringer",
        tag::ATTR_MATCHER => "matcher",
        tag::ATTR_RETURNER => "returner",
        _ => "requested",
    }
}

fn missing(attr: Tag, value: &Value) -> QuenError {
    ErrorKind::AttributeMissing {
        attr: attr_name(attr).to_string(),
        value: value.describe(),
    }
    .into()
}

/// Whether a value is a cooperative early-return signal.
pub fn has_returner(value: &Value) -> bool {
    attribute(value, tag::ATTR_RETURNER).is_some()
}

/// Dispatched equality: fetch the `eq` attribute of the left operand and
/// call it with both. The result must be a bool.
pub fn equality(x: &Value, y: &Value) -> Result<bool> {
    let attr = attribute(x, tag::ATTR_EQ).ok_or_else(|| missing(tag::ATTR_EQ, x))?;
    let block = attr.as_block()?;
    block.call(&[x.clone(), y.clone()])?.as_bool()
}

/// Dispatched printing: fetch the `stringer` attribute and call it. The
/// result must be a string.
pub fn string_of(value: &Value) -> Result<String> {
    let attr = attribute(value, tag::ATTR_STRINGER).ok_or_else(|| missing(tag::ATTR_STRINGER, value))?;
    let block = attr.as_block()?;
    Ok(block.call(&[value.clone()])?.as_string()?.to_string())
}

/// Dispatched matching: fetch the matcher attribute of `matcher`, call it
/// with `(matcher, candidate)`, and decode the `[bool bindings]` shape.
/// Malformed matcher output is an error, not a failed match.
pub fn run_matcher(matcher: &Value, candidate: &Value) -> Result<(bool, Vector<Value>)> {
    let attr = attribute(matcher, tag::ATTR_MATCHER).ok_or_else(|| missing(tag::ATTR_MATCHER, matcher))?;
    let block = attr.as_block()?;
    let result = block.call(&[matcher.clone(), candidate.clone()])?;
    decode_match_result(&result)
}

fn decode_match_result(result: &Value) -> Result<(bool, Vector<Value>)> {
    let malformed = || {
        QuenError::new(ErrorKind::MalformedMatcher {
            actual: result.describe(),
        })
    };
    let Value::List(items) = result else {
        return Err(malformed());
    };
    if items.len() != 2 {
        return Err(malformed());
    }
    let Value::Bool(matched) = &items[0] else {
        return Err(malformed());
    };
    let Value::List(bindings) = &items[1] else {
        return Err(malformed());
    };
    Ok((*matched, bindings.clone()))
}

pub fn match_result(matched: bool, bindings: Vector<Value>) -> Value {
    Value::List(Vector::from(vec![
        Value::Bool(matched),
        Value::List(bindings),
    ]))
}

// ---------------------------------------------------------------------------
// Built-in attribute blocks
// ---------------------------------------------------------------------------

fn eq_block() -> Value {
    Block::pure("eq", &[Kind::Any, Kind::Any], None, |args| {
        Ok(Value::Bool(builtin_eq(&args[0], &args[1])?))
    })
}

fn stringer_block() -> Value {
    Block::pure("stringer", &[Kind::Any], None, |args| {
        Ok(Value::String(builtin_string(&args[0])?.into()))
    })
}

/// An atom matches anything, binding itself to the candidate.
fn atom_matcher_block() -> Value {
    Block::pure("matcher", &[Kind::Atom, Kind::Any], None, |args| {
        let pair = Value::List(Vector::from(vec![args[0].clone(), args[1].clone()]));
        Ok(match_result(true, Vector::from(vec![pair])))
    })
}

/// A list matches a list of equal length element-wise, concatenating each
/// slot's bindings.
fn list_matcher_block() -> Value {
    Block::pure("matcher", &[Kind::List, Kind::Any], None, |args| {
        let pattern = args[0].as_list()?;
        let Value::List(candidate) = &args[1] else {
            return Ok(match_result(false, Vector::new()));
        };
        if pattern.len() != candidate.len() {
            return Ok(match_result(false, Vector::new()));
        }
        let mut bindings = Vector::new();
        for (slot, value) in pattern.iter().zip(candidate.iter()) {
            let (matched, slot_bindings) = run_matcher(slot, value)?;
            if !matched {
                return Ok(match_result(false, Vector::new()));
            }
            bindings.append(slot_bindings);
        }
        Ok(match_result(true, bindings))
    })
}

/// Every other variant matches by equality and binds nothing.
fn equality_matcher_block() -> Value {
    Block::pure("matcher", &[Kind::Any, Kind::Any], None, |args| {
        let matched = equality(&args[0], &args[1])?;
        Ok(match_result(matched, Vector::new()))
    })
}

/// Structural equality over the built-in variants. List elements recurse
/// through the dispatched `equality`, so opaque elements compare through
/// their own attributes. Cells, blocks and opaques compare by identity.
fn builtin_eq(x: &Value, y: &Value) -> Result<bool> {
    match (x, y) {
        (Value::Unit, Value::Unit) => Ok(true),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Atom(a), Value::Atom(b)) => Ok(a == b),
        (Value::Tag(a), Value::Tag(b)) => Ok(a == b),
        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (xa, xb) in a.iter().zip(b.iter()) {
                if !equality(xa, xb)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Mut(a), Value::Mut(b)) => Ok(std::rc::Rc::ptr_eq(a, b)),
        (Value::Block(a), Value::Block(b)) => Ok(std::rc::Rc::ptr_eq(a, b)),
        (Value::Opaque(a), Value::Opaque(b)) => Ok(std::rc::Rc::ptr_eq(a, b)),
        _ => Ok(false),
    }
}

/// Rendering for the built-in variants. List and cell contents recurse
/// through the dispatched `string_of`, so opaque elements render through
/// their own attributes.
fn builtin_string(value: &Value) -> Result<String> {
    match value {
        Value::Unit => Ok("()".to_string()),
        Value::Bool(true) => Ok("true".to_string()),
        Value::Bool(false) => Ok("false".to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(format!("{s:?}")),
        Value::Atom(a) => Ok(a.to_string()),
        Value::Tag(_) => Ok("tag".to_string()),
        Value::Block(_) => Ok("<block>".to_string()),
        Value::Mut(cell) => {
            let inner = cell.borrow().clone();
            Ok(format!("(mut {})", string_of(&inner)?))
        }
        Value::List(items) => {
            if items.is_empty() {
                return Ok("[]".to_string());
            }
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(string_of(item)?);
            }
            Ok(format!("[{}]", parts.join(" ")))
        }
        // Reachable only by calling the built-in stringer on an opaque
        // explicitly; opaques normally answer from their own map.
        Value::Opaque(_) => Err(missing(tag::ATTR_STRINGER, value)),
    }
}
