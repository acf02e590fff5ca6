//! JSON dumps of the configured source catalog
//!
//! Backs the `print-sources` and `print-source-names` subcommands so a
//! catalog edit can be checked before it is base64-encoded back into the
//! environment.

use crate::error::Result;
use crate::models::Source;

/// Print the full source catalog as indented JSON
pub fn print_sources(sources: &[Source]) -> Result<()> {
    println!("{}", render_sources(sources)?);
    Ok(())
}

/// Print the source names as indented JSON
pub fn print_source_names(sources: &[Source]) -> Result<()> {
    println!("{}", render_source_names(sources)?);
    Ok(())
}

fn render_sources(sources: &[Source]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sources)?)
}

fn render_source_names(sources: &[Source]) -> Result<String> {
    let names: Vec<&str> = sources.iter().map(|source| source.name()).collect();
    Ok(serde_json::to_string_pretty(&names)?)
}
