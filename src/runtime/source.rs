//! The line-info registry.
//!
//! A process-wide map from file path to source lines, written once per
//! path when a file is loaded and consulted by the error renderer to show
//! the offending line under each stacked position. Re-registering a path
//! is a no-op, so test binaries may load the same source many times.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

static REGISTRY: OnceLock<Mutex<HashMap<String, Vec<String>>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<String, Vec<String>>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

pub fn register(path: &str, lines: Vec<String>) {
    let mut map = registry().lock().expect("line registry poisoned");
    map.entry(path.to_string()).or_insert(lines);
}

/// Fetch a 1-based source line of a registered file.
pub fn line(path: &str, line: u32) -> Option<String> {
    if line == 0 {
        return None;
    }
    let map = registry().lock().expect("line registry poisoned");
    map.get(path)?.get(line as usize - 1).cloned()
}
