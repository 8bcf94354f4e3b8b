//! The Quen command-line interface.
//!
//! `quen <file.qn>` runs a program. A `prelude.qn` in the working directory
//! is evaluated first to seed the environment; its absence is fine, any
//! other failure to open it is not. Exit 0 on success, exit 1 with the
//! rendered error on stderr.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::Parser;

use crate::engine;
use crate::errors::Result;
use crate::runtime::{base_environment, Env, Output};

const PRELUDE_PATH: &str = "prelude.qn";

#[derive(Debug, Parser)]
#[command(name = "quen", version, about = "The Quen language interpreter.")]
pub struct QuenArgs {
    /// The Quen script to run.
    #[arg(required = true)]
    pub file: PathBuf,
}

pub fn run() {
    let args = QuenArgs::parse();
    let out: Output = Rc::new(RefCell::new(io::stdout()));
    let env = base_environment(out);

    let result = load_prelude(env).and_then(|env| engine::run_file(env, &args.file));
    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn load_prelude(env: Env) -> Result<Env> {
    match std::fs::read_to_string(PRELUDE_PATH) {
        Ok(text) => {
            let (env, _) = engine::run_source(env, PRELUDE_PATH, &text)?;
            Ok(env)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(env),
        Err(err) => Err(err.into()),
    }
}
