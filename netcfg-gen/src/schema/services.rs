use serde::{Deserialize, Serialize};

use super::default_true;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub version: u8,
    #[serde(default = "default_true")]
    pub allow_password: bool,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            version: 2,
            allow_password: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    V2c,
    V3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProtocol {
    Md5,
    Sha,
}

impl AuthProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthProtocol::Md5 => "md5",
            AuthProtocol::Sha => "sha",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivProtocol {
    Aes,
    Des,
}

impl PrivProtocol {
    pub fn as_str(self) -> &'static str {
        match self {
            PrivProtocol::Aes => "aes",
            PrivProtocol::Des => "des",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpV3User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_protocol: Option<AuthProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priv_protocol: Option<PrivProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priv_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetflowConfig {
    pub enabled: bool,
    pub collector: Option<String>,
    pub port: Option<u16>,
    pub version: Option<u8>,
}

impl Default for NetflowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            collector: None,
            port: Some(2055),
            version: Some(9),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SflowConfig {
    pub enabled: bool,
    pub collector: Option<String>,
    pub port: Option<u16>,
}

impl Default for SflowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            collector: None,
            port: Some(6343),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub ssh: SshConfig,
    pub ntp_servers: Vec<String>,
    pub dns_servers: Vec<String>,
    pub syslog_servers: Vec<String>,
    pub snmp_community: Option<String>,
    pub snmp_version: Option<SnmpVersion>,
    pub snmp_v3_users: Vec<SnmpV3User>,
    pub netflow: NetflowConfig,
    pub sflow: SflowConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            ssh: SshConfig::default(),
            ntp_servers: Vec::new(),
            dns_servers: Vec::new(),
            syslog_servers: Vec::new(),
            snmp_community: None,
            snmp_version: Some(SnmpVersion::V2c),
            snmp_v3_users: Vec::new(),
            netflow: NetflowConfig::default(),
            sflow: SflowConfig::default(),
        }
    }
}

impl ServicesConfig {
    /// SNMPv3 with at least one user configured.
    pub fn snmp_v3_active(&self) -> bool {
        self.snmp_version == Some(SnmpVersion::V3) && !self.snmp_v3_users.is_empty()
    }

    /// Non-blank SNMP community string.
    pub fn community(&self) -> Option<&str> {
        self.snmp_community
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosQueue {
    pub id: String,
    pub name: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QosConfig {
    pub queues: Vec<QosQueue>,
}
