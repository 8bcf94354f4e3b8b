//! The lexical environment.
//!
//! A persistent map from atom text to values. Extending an environment
//! produces a new one sharing structure with the old, so blocks can capture
//! environments freely. Insertion is strict: a name may be introduced only
//! once per visible scope, and a collision is a recoverable error the
//! caller surfaces. Shadowing happens only by a block capturing a
//! different environment.

use std::rc::Rc;

use im::HashMap;

use crate::errors::{ErrorKind, Result};
use crate::runtime::value::Value;

#[derive(Debug, Clone, Default)]
pub struct Env {
    map: HashMap<Rc<str>, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.map.get(name).cloned()
    }

    /// Strict insert: fails if the name is already bound.
    pub fn insert(&self, name: Rc<str>, value: Value) -> Result<Env> {
        if self.map.contains_key(&*name) {
            return Err(ErrorKind::NameExists {
                name: name.to_string(),
            }
            .into());
        }
        let mut map = self.map.clone();
        map.insert(name, value);
        Ok(Env { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
