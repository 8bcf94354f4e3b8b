//! Blocks: the language's only callables.
//!
//! Three shapes share one tag and one call surface. *Interpreted* blocks
//! pair parsed code with the environment captured where the literal was
//! evaluated. *Primitive* blocks adapt host functions behind a declared
//! signature, either pure or threading the caller's environment.
//! *Binding* blocks compose three interpreted blocks (before/body/after)
//! into the argument-binding protocol that the user-level lambda layer is
//! built on.

use std::fmt;
use std::rc::Rc;

use im::Vector;

use crate::errors::{ErrorKind, QuenError, Result};
use crate::runtime::env::Env;
use crate::runtime::eval::run_code;
use crate::runtime::value::Value;
use crate::syntax::Element;

pub enum Block {
    Interpreted(CodeBlock),
    Primitive(Primitive),
    Binding(BindingBlock),
}

/// Parsed code plus the environment it closed over.
#[derive(Clone)]
pub struct CodeBlock {
    pub env: Env,
    pub code: Rc<[Element]>,
}

/// An argument-binding block. `before` computes the bindings from the raw
/// argument list, `body` runs with them installed, `after` post-processes
/// the result.
pub struct BindingBlock {
    pub before: CodeBlock,
    pub body: CodeBlock,
    pub after: CodeBlock,
}

/// A host function with its declared argument shape.
pub struct Primitive {
    pub name: &'static str,
    pub signature: Signature,
    pub run: PrimitiveRun,
}

pub enum PrimitiveRun {
    /// Transforms a value tuple to a value.
    Pure(Rc<dyn Fn(&[Value]) -> Result<Value>>),
    /// Additionally consumes and returns the caller's environment.
    WithEnv(Rc<dyn Fn(Env, &[Value]) -> Result<(Env, Value)>>),
}

/// Expected argument variants, checked before the host function runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Any,
    Unit,
    Bool,
    Number,
    String,
    Atom,
    List,
    Mut,
    Block,
    Tag,
    Opaque,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Any => "value",
            Kind::Unit => "Unit",
            Kind::Bool => "Bool",
            Kind::Number => "Number",
            Kind::String => "String",
            Kind::Atom => "Atom",
            Kind::List => "List",
            Kind::Mut => "Mut",
            Kind::Block => "Block",
            Kind::Tag => "Tag",
            Kind::Opaque => "Opaque",
        }
    }

    fn admits(&self, value: &Value) -> bool {
        match self {
            Kind::Any => true,
            Kind::Unit => matches!(value, Value::Unit),
            Kind::Bool => matches!(value, Value::Bool(_)),
            Kind::Number => matches!(value, Value::Number(_)),
            Kind::String => matches!(value, Value::String(_)),
            Kind::Atom => matches!(value, Value::Atom(_)),
            Kind::List => matches!(value, Value::List(_)),
            Kind::Mut => matches!(value, Value::Mut(_)),
            Kind::Block => matches!(value, Value::Block(_)),
            Kind::Tag => matches!(value, Value::Tag(_)),
            Kind::Opaque => matches!(value, Value::Opaque(_)),
        }
    }
}

/// A sequence of expected variants plus an optional variadic tail.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub params: &'static [Kind],
    pub rest: Option<Kind>,
}

impl Signature {
    pub fn check(&self, args: &[Value]) -> Result<()> {
        match self.rest {
            None if args.len() != self.params.len() => {
                return Err(QuenError::arity_mismatch(
                    self.params.len().to_string(),
                    args.len(),
                ));
            }
            Some(_) if args.len() < self.params.len() => {
                return Err(QuenError::arity_mismatch(
                    format!("at least {}", self.params.len()),
                    args.len(),
                ));
            }
            _ => {}
        }
        for (kind, arg) in self.params.iter().zip(args) {
            if !kind.admits(arg) {
                return Err(QuenError::type_mismatch(kind.name(), arg.describe()));
            }
        }
        if let Some(kind) = self.rest {
            for arg in &args[self.params.len()..] {
                if !kind.admits(arg) {
                    return Err(QuenError::type_mismatch(kind.name(), arg.describe()));
                }
            }
        }
        Ok(())
    }
}

impl Block {
    /// Wrap a pure host function as a block value.
    pub fn pure(
        name: &'static str,
        params: &'static [Kind],
        rest: Option<Kind>,
        f: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Value {
        Value::Block(Rc::new(Block::Primitive(Primitive {
            name,
            signature: Signature { params, rest },
            run: PrimitiveRun::Pure(Rc::new(f)),
        })))
    }

    /// Wrap an environment-threading host function as a block value.
    pub fn with_env(
        name: &'static str,
        params: &'static [Kind],
        rest: Option<Kind>,
        f: impl Fn(Env, &[Value]) -> Result<(Env, Value)> + 'static,
    ) -> Value {
        Value::Block(Rc::new(Block::Primitive(Primitive {
            name,
            signature: Signature { params, rest },
            run: PrimitiveRun::WithEnv(Rc::new(f)),
        })))
    }

    /// Call without an environment to thread. Environment-threading
    /// primitives refuse this path.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            Block::Interpreted(code) => {
                check_plain_args(args)?;
                run_code(code.env.clone(), &code.code).map(|(_, v)| v)
            }
            Block::Primitive(prim) => {
                prim.signature.check(args)?;
                match &prim.run {
                    PrimitiveRun::Pure(f) => f(args),
                    PrimitiveRun::WithEnv(_) => Err(ErrorKind::EnvRequired.into()),
                }
            }
            Block::Binding(binding) => binding.call(args),
        }
    }

    /// Uniform call surface. Pure and interpreted calls leave the caller's
    /// environment unchanged; environment-threading primitives may extend it.
    pub fn call_with_env(&self, env: Env, args: &[Value]) -> Result<(Env, Value)> {
        if let Block::Primitive(prim) = self {
            if let PrimitiveRun::WithEnv(f) = &prim.run {
                prim.signature.check(args)?;
                return f(env, args);
            }
        }
        let value = self.call(args)?;
        Ok((env, value))
    }
}

/// Interpreted blocks bind no positional arguments: a call passes nothing,
/// or a single unit meaning "give me your value".
fn check_plain_args(args: &[Value]) -> Result<()> {
    match args {
        [] => Ok(()),
        [Value::Unit] => Ok(()),
        [other] => Err(ErrorKind::BlockUnitArg {
            actual: other.describe(),
        }
        .into()),
        _ => Err(ErrorKind::BlockTooManyArgs { count: args.len() }.into()),
    }
}

impl BindingBlock {
    /// The three-stage protocol: `before` sees the raw arguments as
    /// `__args` and produces `[atom value]` pairs; `body` runs with each
    /// pair strict-inserted into its captured environment; `after` sees the
    /// body's result as `__return` and its result is the call's result.
    fn call(&self, args: &[Value]) -> Result<Value> {
        let args_list = Value::List(args.iter().cloned().collect::<Vector<Value>>());
        let before_env = self.before.env.insert(Rc::from("__args"), args_list)?;
        let (_, bindings) = run_code(before_env, &self.before.code)?;

        let mut body_env = self.body.env.clone();
        for pair in parse_bindings(&bindings)? {
            let (name, value) = pair;
            body_env = body_env.insert(name, value)?;
        }
        let (_, result) = run_code(body_env, &self.body.code)?;

        let after_env = self.after.env.insert(Rc::from("__return"), result)?;
        run_code(after_env, &self.after.code).map(|(_, v)| v)
    }
}

fn parse_bindings(bindings: &Value) -> Result<Vec<(Rc<str>, Value)>> {
    let malformed = || {
        QuenError::new(ErrorKind::MalformedBindings {
            actual: bindings.describe(),
        })
    };
    let Value::List(pairs) = bindings else {
        return Err(malformed());
    };
    let mut out = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let Value::List(entry) = pair else {
            return Err(malformed());
        };
        if entry.len() != 2 {
            return Err(malformed());
        }
        let Value::Atom(name) = &entry[0] else {
            return Err(malformed());
        };
        out.push((name.clone(), entry[1].clone()));
    }
    Ok(out)
}

// Primitive closures have no useful Debug form; render the shape only.
impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Interpreted(_) => write!(f, "<block>"),
            Block::Primitive(p) => write!(f, "<block {}>", p.name),
            Block::Binding(_) => write!(f, "<block>"),
        }
    }
}
