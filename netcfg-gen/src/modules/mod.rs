//! Config modules.
//!
//! Each module owns one slice of [`CanonicalConfig`] and answers three
//! questions about it:
//!
//! 1. **validate**: which fields are missing or inconsistent
//! 2. **risk**: which settings are operationally dangerous in an environment
//! 3. **render**: which vendor CLI commands implement the slice
//!
//! Modules are pure. Nothing here returns an error; an empty slice yields an
//! empty result.
//!
//! ## Module Set
//!
//! The set is closed. [`ModuleKind::ALL`] lists every module in render order,
//! and the registry walks that array.

mod core;
mod firewall;
mod monitoring;
mod nat;
mod qos;
mod routing;
mod vpn;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::findings::{RiskItem, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{CanonicalConfig, Environment, Vendor};

pub use self::core::CoreModule;
pub use self::firewall::FirewallModule;
pub use self::monitoring::MonitoringModule;
pub use self::nat::NatModule;
pub use self::qos::QosModule;
pub use self::routing::RoutingModule;
pub use self::vpn::VpnModule;

/// Behavior shared by every config module.
pub trait ConfigModule: Sync {
    fn kind(&self) -> ModuleKind;

    /// Human-readable module title.
    fn title(&self) -> &'static str;

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding>;

    fn risk(&self, config: &CanonicalConfig, environment: Environment) -> Vec<RiskItem>;

    /// Render the module's slice for `vendor`. Same input, same output.
    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender;
}

/// Closed set of config modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Core,
    Routing,
    Firewall,
    Nat,
    Vpn,
    Qos,
    Monitoring,
}

impl ModuleKind {
    /// Every module, in render order.
    pub const ALL: [ModuleKind; 7] = [
        ModuleKind::Core,
        ModuleKind::Routing,
        ModuleKind::Firewall,
        ModuleKind::Nat,
        ModuleKind::Vpn,
        ModuleKind::Qos,
        ModuleKind::Monitoring,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Core => "core",
            ModuleKind::Routing => "routing",
            ModuleKind::Firewall => "firewall",
            ModuleKind::Nat => "nat",
            ModuleKind::Vpn => "vpn",
            ModuleKind::Qos => "qos",
            ModuleKind::Monitoring => "monitoring",
        }
    }

    /// The module implementation behind this kind.
    pub fn module(self) -> &'static dyn ConfigModule {
        match self {
            ModuleKind::Core => &CoreModule,
            ModuleKind::Routing => &RoutingModule,
            ModuleKind::Firewall => &FirewallModule,
            ModuleKind::Nat => &NatModule,
            ModuleKind::Vpn => &VpnModule,
            ModuleKind::Qos => &QosModule,
            ModuleKind::Monitoring => &MonitoringModule,
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::render::ModuleRender;
    use crate::schema::Vendor;

    /// Assert every rendered line follows the vendor's syntax.
    pub fn assert_vendor_syntax(render: &ModuleRender, vendor: Vendor) {
        for section in &render.sections {
            for line in &section.commands {
                match vendor {
                    Vendor::Mikrotik => {
                        assert!(line.starts_with('/'), "{}: {line}", section.name)
                    }
                    Vendor::Cisco => {
                        assert!(!line.starts_with('/'), "{}: {line}", section.name)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ModuleKind;
    use crate::schema::{default_config, Environment, Vendor};

    #[test]
    fn kinds_map_to_matching_modules() {
        for kind in ModuleKind::ALL {
            assert_eq!(kind.module().kind(), kind);
            assert!(!kind.module().title().is_empty());
        }
    }

    #[test]
    fn optional_modules_are_empty_on_default_config() {
        let config = default_config();
        for kind in ModuleKind::ALL.into_iter().skip(1) {
            let module = kind.module();
            for vendor in Vendor::ALL {
                let render = module.render(&config, vendor);
                assert!(render.sections.is_empty(), "{kind} {vendor}");
            }
            assert!(module.validate(&config).is_empty(), "{kind}");
            assert!(module.risk(&config, Environment::Prod).is_empty(), "{kind}");
        }
    }
}
