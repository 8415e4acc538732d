//! Command implementations for the routegraph CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod inspect;
pub mod resolve;
pub mod search;

use std::path::Path;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use routegraph_core::HttpMethod;
use routegraph_store::DeclarationStore;
use serde::Serialize;

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Load a declaration store from a manifest file.
pub fn load_store(path: &Path) -> Result<DeclarationStore> {
    DeclarationStore::from_manifest_path(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))
}

/// Color an HTTP method for display.
pub fn paint_method(method: &HttpMethod) -> ColoredString {
    let label = format!("{:<7}", method.as_str());
    match method {
        HttpMethod::Get => label.green(),
        HttpMethod::Post => label.blue(),
        HttpMethod::Put | HttpMethod::Patch => label.yellow(),
        HttpMethod::Delete => label.red(),
        _ => label.normal(),
    }
    .bold()
}
