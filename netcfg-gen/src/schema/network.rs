use serde::{Deserialize, Serialize};

use super::default_true;
use crate::utils::mask_to_prefix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceRole {
    Uplink,
    Access,
}

/// Physical or logical port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interface {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<InterfaceRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for Interface {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            role: None,
            ip_address: None,
            subnet_mask: None,
            vlan_id: None,
            description: None,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vlan {
    pub id: u16,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticRoute {
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    pub next_hop: String,
}

impl StaticRoute {
    /// Both destination and next hop are present.
    pub fn is_complete(&self) -> bool {
        !self.destination.trim().is_empty() && !self.next_hop.trim().is_empty()
    }

    /// True when this route's destination is exactly `subnet`, written either
    /// as a CIDR or as `destination` plus a dotted or `/nn` netmask.
    pub fn covers(&self, subnet: &str) -> bool {
        let subnet = subnet.trim();
        let destination = self.destination.trim();
        if destination == subnet {
            return true;
        }
        let Some(mask) = self.netmask.as_deref().map(str::trim) else {
            return false;
        };
        if format!("{destination}/{mask}") == subnet {
            return true;
        }
        match (mask_to_prefix(Some(mask)), subnet.split_once('/')) {
            (Some(bits), Some((net, prefix))) => {
                net.trim() == destination && prefix.trim().parse::<u8>().ok() == Some(bits)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OspfArea {
    pub id: String,
    pub area: String,
    pub networks: Vec<String>,
    pub passive_interfaces: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OspfConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_id: Option<String>,
    pub areas: Vec<OspfArea>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BgpNeighbor {
    pub id: String,
    pub neighbor: String,
    pub remote_as: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BgpNetwork {
    pub id: String,
    pub network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BgpConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_as: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_id: Option<String>,
    pub neighbors: Vec<BgpNeighbor>,
    pub networks: Vec<BgpNetwork>,
}

impl BgpConfig {
    /// Local AS number; AS 0 is reserved and counts as unset.
    pub fn configured_as(&self) -> Option<u32> {
        self.local_as.filter(|asn| *asn != 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RipConfig {
    pub enabled: bool,
    pub version: u8,
    pub networks: Vec<String>,
}

impl Default for RipConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            version: 2,
            networks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub static_routes: Vec<StaticRoute>,
    pub ospf: OspfConfig,
    pub bgp: BgpConfig,
    pub rip: RipConfig,
}
