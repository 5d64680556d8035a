use anyhow::{bail, Context, Result};
use netcfg_gen::pipeline::{PipelineService, PushPayload, PushStatus};
use netcfg_gen::report::{render_commands, render_findings, render_push};
use netcfg_gen::schema::Vendor;
use netcfg_gen::settings::Settings;
use tokio::runtime::Runtime;

use crate::cli::{GenerateArgs, OutputFormat, PushArgs};
use crate::read_config;

pub fn run_generate(args: GenerateArgs, settings: &Settings) -> Result<()> {
    let config = read_config(&args.file)?;
    let service = PipelineService::from_settings(settings);
    let result = runtime()?.block_on(service.generate_config_pipeline(&config, args.vendor.into()));

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_commands(&result.render));
            println!();
            println!("Lint");
            println!("{}", render_findings(&result.lint_findings));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

pub fn run_push(args: PushArgs, settings: &Settings) -> Result<()> {
    let config = read_config(&args.file)?;
    let vendor: Vendor = args.vendor.into();
    let service = PipelineService::from_settings(settings);
    let runtime = runtime()?;
    let generated = runtime.block_on(service.generate_config_pipeline(&config, vendor));
    let payload = PushPayload {
        device_id: args.device_id,
        vendor,
        commands: generated.render.commands,
        environment: config.environment(),
        ticket_id: args.ticket_id,
    };
    let result = runtime.block_on(service.push_config(&payload));

    match args.format {
        OutputFormat::Text => println!("{}", render_push(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    if result.status == PushStatus::Error {
        bail!("push failed");
    }
    Ok(())
}

fn runtime() -> Result<Runtime> {
    Runtime::new().context("failed to start async runtime")
}
