//! The Quen value model.
//!
//! A closed sum of built-in variants plus the user-extensible opaque
//! wrapper. Every value answers a single, immutable tag. Lists are
//! persistent; the mutable cell is the only first-class mutable datum and
//! is compared by identity. Cycles can only arise through cells; the
//! reference-counted representation leaks such cycles, which the language
//! accepts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use im::Vector;

use crate::errors::{QuenError, Result};
use crate::number::Number;
use crate::runtime::block::Block;
use crate::runtime::tag::{self, Tag};

#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Number(Number),
    String(Rc<str>),
    Atom(Rc<str>),
    List(Vector<Value>),
    Mut(Rc<RefCell<Value>>),
    Block(Rc<Block>),
    Tag(Tag),
    Opaque(Rc<Opaque>),
}

/// A value wearing its own tag and attribute set, overlaying whatever the
/// inner value would normally answer. The attribute map is built once at
/// construction and never mutated.
#[derive(Debug)]
pub struct Opaque {
    pub tag: Tag,
    pub inner: Value,
    pub attrs: HashMap<Tag, Value>,
}

impl Value {
    pub fn tag(&self) -> Tag {
        match self {
            Value::Unit => tag::UNIT,
            Value::Bool(_) => tag::BOOL,
            Value::Number(_) => tag::NUMBER,
            Value::String(_) => tag::STRING,
            Value::Atom(_) => tag::ATOM,
            Value::List(_) => tag::LIST,
            Value::Mut(_) => tag::MUT,
            Value::Block(_) => tag::BLOCK,
            Value::Tag(_) => tag::TAG,
            Value::Opaque(_) => tag::OPAQUE,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "Unit",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Atom(_) => "Atom",
            Value::List(_) => "List",
            Value::Mut(_) => "Mut",
            Value::Block(_) => "Block",
            Value::Tag(_) => "Tag",
            Value::Opaque(_) => "Opaque",
        }
    }

    /// Unit and `false` are falsy; everything else, opaques included, is
    /// truthy regardless of the wrapped value.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Unit | Value::Bool(false))
    }

    pub fn cell(v: Value) -> Value {
        Value::Mut(Rc::new(RefCell::new(v)))
    }

    /// Host-side rendering used in error messages. Never fails and never
    /// dispatches through attributes, unlike the language-level stringer.
    pub fn describe(&self) -> String {
        match self {
            Value::Unit => "()".to_string(),
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => format!("{s:?}"),
            Value::Atom(a) => a.to_string(),
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::describe).collect();
                format!("[{}]", inner.join(" "))
            }
            Value::Mut(cell) => format!("(mut {})", cell.borrow().describe()),
            Value::Block(_) => "<block>".to_string(),
            Value::Tag(_) => "tag".to_string(),
            Value::Opaque(_) => "(opaque)".to_string(),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(QuenError::type_mismatch("Bool", other.describe())),
        }
    }

    pub fn as_number(&self) -> Result<&Number> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err(QuenError::type_mismatch("Number", other.describe())),
        }
    }

    pub fn as_string(&self) -> Result<&Rc<str>> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(QuenError::type_mismatch("String", other.describe())),
        }
    }

    pub fn as_atom(&self) -> Result<&Rc<str>> {
        match self {
            Value::Atom(a) => Ok(a),
            other => Err(QuenError::type_mismatch("Atom", other.describe())),
        }
    }

    pub fn as_list(&self) -> Result<&Vector<Value>> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(QuenError::type_mismatch("List", other.describe())),
        }
    }

    pub fn as_cell(&self) -> Result<&Rc<RefCell<Value>>> {
        match self {
            Value::Mut(cell) => Ok(cell),
            other => Err(QuenError::type_mismatch("Mut", other.describe())),
        }
    }

    pub fn as_block(&self) -> Result<&Rc<Block>> {
        match self {
            Value::Block(b) => Ok(b),
            other => Err(QuenError::type_mismatch("Block", other.describe())),
        }
    }

    pub fn as_tag(&self) -> Result<Tag> {
        match self {
            Value::Tag(t) => Ok(*t),
            other => Err(QuenError::type_mismatch("Tag", other.describe())),
        }
    }

    pub fn as_opaque(&self) -> Result<&Rc<Opaque>> {
        match self {
            Value::Opaque(o) => Ok(o),
            other => Err(QuenError::type_mismatch("Opaque", other.describe())),
        }
    }
}

/// Host-level equality: structural on data variants, identity on cells,
/// blocks and opaques. The language-level `==` dispatches through the `eq`
/// attribute instead; this impl exists for host code and tests.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Mut(a), Value::Mut(b)) => Rc::ptr_eq(a, b),
            (Value::Block(a), Value::Block(b)) => Rc::ptr_eq(a, b),
            (Value::Tag(a), Value::Tag(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
