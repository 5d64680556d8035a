//! Canonical, vendor-neutral configuration of a single network device.
//!
//! [`CanonicalConfig`] is the intermediate representation every module reads.
//! Each struct deserializes with `#[serde(default)]`, so a partial JSON or TOML
//! document is completed from [`CanonicalConfig::default`] and callers always
//! hold a structurally complete value.
//!
//! The core never mutates a config: modules borrow it and return derived data.

mod hints;
mod network;
mod security;
mod services;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use hints::{section_hints, SectionHint};
pub use network::{
    BgpConfig, BgpNeighbor, BgpNetwork, Interface, InterfaceRole, OspfArea, OspfConfig, RipConfig,
    RoutingConfig, StaticRoute, Vlan,
};
pub use security::{
    Chain, FirewallAction, FirewallConfig, FirewallRule, IkeVersion, IpsecTunnel, L2tpServer,
    NatConfig, NatRule, NatType, Protocol, VpnConfig, WireguardPeer, WireguardTunnel,
};
pub use services::{
    AuthProtocol, NetflowConfig, PrivProtocol, QosConfig, QosQueue, ServicesConfig, SflowConfig,
    SnmpV3User, SnmpVersion, SshConfig,
};

/// Target CLI dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Cisco IOS-style CLI.
    Cisco,
    /// MikroTik RouterOS-style CLI.
    Mikrotik,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::Cisco, Vendor::Mikrotik];

    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Cisco => "cisco",
            Vendor::Mikrotik => "mikrotik",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cisco" | "ios" => Ok(Vendor::Cisco),
            "mikrotik" | "routeros" => Ok(Vendor::Mikrotik),
            other => Err(format!("unknown vendor '{other}'")),
        }
    }
}

/// Deployment tier used to scale risk severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    pub fn is_prod(self) -> bool {
        self == Environment::Prod
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form device metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub environment: Environment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// The full intermediate representation of one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalConfig {
    pub hostname: String,
    pub interfaces: Vec<Interface>,
    pub vlans: Vec<Vlan>,
    pub routing: RoutingConfig,
    pub services: ServicesConfig,
    pub firewall: FirewallConfig,
    pub nat: NatConfig,
    pub vpn: VpnConfig,
    pub qos: QosConfig,
    pub metadata: Metadata,
}

impl CanonicalConfig {
    /// Parse a config from JSON, filling missing fields from the defaults.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn environment(&self) -> Environment {
        self.metadata.environment
    }

    pub fn has_uplink(&self) -> bool {
        self.interfaces
            .iter()
            .any(|iface| iface.role == Some(InterfaceRole::Uplink))
    }
}

/// Default-filled config used as the starting point of every editing session.
pub fn default_config() -> CanonicalConfig {
    CanonicalConfig::default()
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::{default_config, CanonicalConfig, Environment, SnmpVersion, Vendor};

    #[test]
    fn defaults_match_baseline() {
        let config = default_config();
        assert!(config.hostname.is_empty());
        assert!(config.services.ssh.enabled);
        assert_eq!(config.services.ssh.version, 2);
        assert!(config.services.ssh.allow_password);
        assert!(config.firewall.enabled);
        assert!(!config.routing.ospf.enabled);
        assert_eq!(config.routing.rip.version, 2);
        assert_eq!(config.services.netflow.port, Some(2055));
        assert_eq!(config.services.netflow.version, Some(9));
        assert_eq!(config.services.sflow.port, Some(6343));
        assert_eq!(config.services.snmp_version, Some(SnmpVersion::V2c));
        assert_eq!(config.metadata.environment, Environment::Dev);
    }

    #[test]
    fn partial_json_is_default_filled() {
        let config = CanonicalConfig::from_json(
            r#"{
                "hostname": "edge-01",
                "interfaces": [{"name": "ether1", "role": "uplink"}],
                "firewall": {"rules": [{"chain": "input", "action": "accept"}]},
                "metadata": {"environment": "prod"}
            }"#,
        )
        .expect("parse");

        assert_eq!(config.hostname, "edge-01");
        assert!(config.interfaces[0].enabled);
        assert!(config.has_uplink());
        assert!(config.firewall.enabled);
        assert!(config.services.ssh.enabled);
        assert_eq!(config.firewall.rules.len(), 1);
        assert_eq!(config.environment(), Environment::Prod);
    }

    #[test]
    fn vendor_parses_aliases() {
        assert_eq!("Cisco".parse::<Vendor>(), Ok(Vendor::Cisco));
        assert_eq!("routeros".parse::<Vendor>(), Ok(Vendor::Mikrotik));
        assert!("juniper".parse::<Vendor>().is_err());
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let json = serde_json::to_string(&default_config()).expect("serialize");
        assert!(json.contains("\"static_routes\""));
        assert!(json.contains("\"allow_mgmt_from\""));
        assert!(!json.contains("staticRoutes"));
    }
}
