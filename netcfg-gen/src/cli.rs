use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use netcfg_gen::schema::{Environment, Vendor};

#[derive(Parser, Debug)]
#[command(name = "netcfg-gen")]
#[command(about = "Validate, risk-score, render and diff network device configs")]
pub struct Cli {
    /// Settings TOML file. Defaults to the built-in settings.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a default-filled config as JSON.
    Init(InitArgs),
    /// Render CLI commands for a config.
    Render(RenderArgs),
    /// Validate a config across all modules.
    Validate(CheckArgs),
    /// Run vendor-aware lint rules over a config.
    Lint(LintArgs),
    /// Score the deployment risk of a config.
    Risk(RiskArgs),
    /// Diff two command files, or two configs rendered for one vendor.
    Diff(DiffArgs),
    /// Render and lint through the pipeline service.
    Generate(GenerateArgs),
    /// Push rendered commands through the pipeline service.
    Push(PushArgs),
    /// Save, apply or list reusable profiles.
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Print the config section table instead of a config.
    #[arg(long)]
    pub sections: bool,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Config JSON file.
    pub file: PathBuf,
    #[arg(long, value_enum)]
    pub vendor: VendorArg,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Config JSON file.
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct LintArgs {
    /// Config JSON file.
    pub file: PathBuf,
    #[arg(long, value_enum)]
    pub vendor: VendorArg,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct RiskArgs {
    /// Config JSON file.
    pub file: PathBuf,
    /// Environment override. Defaults to the config's metadata.
    #[arg(long, value_enum)]
    pub environment: Option<EnvironmentArg>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Previous commands (one per line), or a config JSON with --vendor.
    pub previous: PathBuf,
    /// Next commands (one per line), or a config JSON with --vendor.
    pub next: PathBuf,
    /// Treat both files as configs and diff their rendered commands.
    #[arg(long, value_enum)]
    pub vendor: Option<VendorArg>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print only the change counts.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Config JSON file.
    pub file: PathBuf,
    #[arg(long, value_enum)]
    pub vendor: VendorArg,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct PushArgs {
    /// Config JSON file.
    pub file: PathBuf,
    #[arg(long, value_enum)]
    pub vendor: VendorArg,
    #[arg(long)]
    pub device_id: String,
    /// Change ticket; expected for production pushes.
    #[arg(long)]
    pub ticket_id: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Capture a profile from a config and write it to the profiles directory.
    Save(ProfileSaveArgs),
    /// Apply a named profile to a config and print the result as JSON.
    Apply(ProfileApplyArgs),
    /// List profiles from the profiles directory and the built-in set.
    List(ProfileListArgs),
}

#[derive(Parser, Debug)]
pub struct ProfileSaveArgs {
    /// Config JSON file.
    pub file: PathBuf,
    #[arg(long)]
    pub name: String,
    #[arg(long, value_enum)]
    pub vendor: VendorArg,
    /// Profile environment. Defaults to the config's metadata.
    #[arg(long, value_enum)]
    pub environment: Option<EnvironmentArg>,
    /// Keep the config hostname in the profile.
    #[arg(long)]
    pub include_hostname: bool,
    #[arg(long)]
    pub profiles_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ProfileApplyArgs {
    /// Config JSON file. A default config is used when omitted.
    pub file: Option<PathBuf>,
    #[arg(long)]
    pub name: String,
    /// Optional profiles directory searched before the built-in set.
    #[arg(long)]
    pub profiles_dir: Option<PathBuf>,
    /// Write the resulting config here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ProfileListArgs {
    #[arg(long)]
    pub profiles_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum VendorArg {
    Cisco,
    Mikrotik,
}

impl From<VendorArg> for Vendor {
    fn from(arg: VendorArg) -> Self {
        match arg {
            VendorArg::Cisco => Vendor::Cisco,
            VendorArg::Mikrotik => Vendor::Mikrotik,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum EnvironmentArg {
    Dev,
    Staging,
    Prod,
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Dev => Environment::Dev,
            EnvironmentArg::Staging => Environment::Staging,
            EnvironmentArg::Prod => Environment::Prod,
        }
    }
}
