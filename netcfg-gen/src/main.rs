use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use netcfg_gen::registry::render_config;
use netcfg_gen::report::{render_commands, render_section_hints};
use netcfg_gen::schema::{default_config, section_hints, CanonicalConfig};
use netcfg_gen::settings::{load_settings_with_source, Settings};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod check_cmd;
mod cli;
mod diff_cmd;
mod pipeline_cmd;
mod profile_cmd;

use cli::{Cli, Command, InitArgs, OutputFormat, RenderArgs};

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Init(args) => run_init(args),
        Command::Render(args) => run_render(args),
        Command::Validate(args) => check_cmd::run_validate(args),
        Command::Lint(args) => check_cmd::run_lint(args),
        Command::Risk(args) => check_cmd::run_risk(args),
        Command::Diff(args) => diff_cmd::run_diff(args),
        Command::Generate(args) => pipeline_cmd::run_generate(args, &settings(cli.settings.as_deref())),
        Command::Push(args) => pipeline_cmd::run_push(args, &settings(cli.settings.as_deref())),
        Command::Profile(command) => profile_cmd::run_profile(command),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn settings(path: Option<&Path>) -> Settings {
    let (settings, source) = load_settings_with_source(path);
    debug!(?source, "settings loaded");
    settings
}

/// Read and default-fill a config JSON file.
pub(crate) fn read_config(path: &Path) -> Result<CanonicalConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    CanonicalConfig::from_json(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

fn run_init(args: InitArgs) -> Result<()> {
    if args.sections {
        println!("{}", render_section_hints(section_hints()));
    } else {
        println!("{}", serde_json::to_string_pretty(&default_config())?);
    }
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = read_config(&args.file)?;
    let result = render_config(&config, args.vendor.into());
    match args.format {
        OutputFormat::Text => println!("{}", render_commands(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
