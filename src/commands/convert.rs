//! Convert command: extract the payload of a local Clash YAML file to
//! plain list format.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::payload::extract_payload;
use crate::writer;

pub fn run(input: &Path, output: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file {:?}", input))?;

    let rules = extract_payload(&content);
    info!("Extracted {} rules from {:?}", rules.len(), input);

    match output {
        Some(path) => {
            let mut body = rules.join("\n");
            if !body.is_empty() {
                body.push('\n');
            }
            writer::write_atomic(path, &body)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("[OK] {} rules written to {}", rules.len(), path.display());
        }
        None => {
            for rule in &rules {
                println!("{}", rule);
            }
        }
    }

    Ok(())
}
