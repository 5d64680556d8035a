//! Vendor-neutral network device configuration and CLI generation.
//!
//! A single [`CanonicalConfig`] describes one device. Seven config modules
//! each own a slice of it. A module renders its slice as Cisco IOS or
//! MikroTik RouterOS commands and reports findings and risk items for it.
//!
//! # Architecture
//!
//! ## Model
//!
//! - [`schema`]: the config IR, default-filled from partial JSON
//! - [`findings`]: validation and lint findings, risk items and levels
//! - [`render`]: per-module and merged render output
//!
//! ## Modules
//!
//! - [`modules`]: core, routing, firewall, nat, vpn, qos, monitoring
//! - [`registry`]: runs every module in fixed order
//! - [`cross_checks`]: checks that span more than one module
//!
//! ## Analysis
//!
//! - [`lint`]: vendor-aware hygiene rules
//! - [`risk`]: reduce module risk items to one level
//!
//! ## Delivery
//!
//! - [`pipeline`]: remote-first generate and push with local fallback, diff
//! - [`profile`]: reusable baselines stored as TOML
//! - [`settings`]: remote endpoint and push guard settings
//! - [`report`]: colored terminal output
//!
//! # Example
//!
//! ```ignore
//! use netcfg_gen::{render_config, validate_config, CanonicalConfig, Vendor};
//!
//! let config = CanonicalConfig::from_json(r#"{"hostname": "edge-01"}"#)?;
//! assert!(validate_config(&config).is_empty());
//! let result = render_config(&config, Vendor::Mikrotik);
//! println!("{}", result.commands.join("\n"));
//! ```
//!
//! Line diffing lives in `cmd-diff-core`; this crate only decides what the
//! lines are.

pub mod cross_checks;
pub mod findings;
pub mod lint;
pub mod modules;
pub mod pipeline;
pub mod profile;
pub mod registry;
pub mod render;
pub mod report;
pub mod risk;
pub mod schema;
pub mod settings;
pub mod utils;

pub use cmd_diff_core::diff_commands;
pub use findings::{Finding, LintFinding, RiskItem, RiskLevel, Severity, ValidationFinding};
pub use lint::lint_config;
pub use pipeline::{diff_config, PipelineResult, PipelineService, PushPayload, PushResult, PushStatus};
pub use registry::{render_config, validate_config};
pub use render::{RenderResult, RenderSection};
pub use risk::{evaluate_risk, RiskAssessment};
pub use schema::{default_config, CanonicalConfig, Environment, Vendor};
