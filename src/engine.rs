//! The loading pipeline: source text in, environment and value out.
//!
//! Reading a file registers its lines with the line-info registry first, so
//! any error raised later renders with the offending source lines.

use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::runtime::{eval, source, Env, Value};
use crate::syntax;

/// Run source text against an environment. The path labels positions and
/// the line registry; it does not have to exist on disk.
pub fn run_source(env: Env, path: &str, text: &str) -> Result<(Env, Value)> {
    source::register(path, text.lines().map(str::to_string).collect());
    let tokens = syntax::lex(path, text)?;
    let program = syntax::parse(&tokens)?;
    eval::run(env, &program)
}

/// Read and run a program file.
pub fn run_file(env: Env, path: &Path) -> Result<(Env, Value)> {
    let text = fs::read_to_string(path)?;
    run_source(env, &path.to_string_lossy(), &text)
}
