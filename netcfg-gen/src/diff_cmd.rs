use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use netcfg_gen::pipeline::diff_config;
use netcfg_gen::registry::render_config;
use netcfg_gen::report::{render_diff, render_diff_summary};

use crate::cli::{DiffArgs, OutputFormat};
use crate::read_config;

pub fn run_diff(args: DiffArgs) -> Result<()> {
    let (previous, next) = match args.vendor {
        Some(vendor) => (
            render_config(&read_config(&args.previous)?, vendor.into()).commands,
            render_config(&read_config(&args.next)?, vendor.into()).commands,
        ),
        None => (read_commands(&args.previous)?, read_commands(&args.next)?),
    };
    let diff = diff_config(&previous, &next);

    if args.summary {
        println!("{}", render_diff_summary(&diff.lines));
        return Ok(());
    }
    match args.format {
        OutputFormat::Text => {
            println!("{}", render_diff(&diff.lines));
            println!("{}", render_diff_summary(&diff.lines));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
    }
    Ok(())
}

/// One command per line; trailing newlines do not produce empty commands.
fn read_commands(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(raw.lines().map(ToOwned::to_owned).collect())
}
