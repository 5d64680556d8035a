use std::fs;

use anyhow::{Context, Result};
use netcfg_gen::profile::{apply_profile, build_profile, list_profiles, load_profile_with_source, save_profile};
use netcfg_gen::report::render_profile_list;
use netcfg_gen::schema::default_config;

use crate::cli::{ProfileApplyArgs, ProfileCommand, ProfileListArgs, ProfileSaveArgs};
use crate::read_config;

pub fn run_profile(command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Save(args) => run_save(args),
        ProfileCommand::Apply(args) => run_apply(args),
        ProfileCommand::List(args) => run_list(args),
    }
}

fn run_save(args: ProfileSaveArgs) -> Result<()> {
    let config = read_config(&args.file)?;
    let environment = args.environment.map_or_else(|| config.environment(), Into::into);
    let profile = build_profile(&config, args.vendor.into(), environment, &args.name, args.include_hostname);
    let path = save_profile(&args.profiles_dir, &profile)?;
    println!("saved profile '{}' to {}", profile.name, path.display());
    Ok(())
}

fn run_apply(args: ProfileApplyArgs) -> Result<()> {
    let current = match &args.file {
        Some(path) => read_config(path)?,
        None => default_config(),
    };
    let (profile, source) = load_profile_with_source(&args.name, args.profiles_dir.as_deref())?;
    eprintln!("profile '{}' source={source}", profile.name);
    let applied = serde_json::to_string_pretty(&apply_profile(&current, &profile))?;

    match args.output {
        Some(path) => {
            fs::write(&path, applied).with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{applied}"),
    }
    Ok(())
}

fn run_list(args: ProfileListArgs) -> Result<()> {
    println!("{}", render_profile_list(&list_profiles(args.profiles_dir.as_deref())));
    Ok(())
}
