//! Reusable CLI profiles.
//!
//! A profile captures the parts of a config that repeat across devices of the
//! same role: firewall baseline, services, and the VLAN and interface
//! skeleton. Addressing is left out so a profile can seed a new device.
//!
//! Profiles are TOML files. Lookup by name tries a profiles directory first,
//! then the built-in set embedded in the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{
    CanonicalConfig, Environment, FirewallConfig, Interface, InterfaceRole, ServicesConfig, Vendor, Vlan,
};

const UNNAMED: &str = "Unnamed profile";

const EMBEDDED: &[(&str, &str)] = &[
    (
        "branch-mikrotik",
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/profiles/branch-mikrotik.toml")),
    ),
    (
        "campus-cisco",
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/profiles/campus-cisco.toml")),
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliProfile {
    pub name: String,
    pub vendor: Vendor,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub base: ProfileBase,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub network: NetworkDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileBase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub firewall: FirewallConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDefaults {
    pub vlans: Vec<VlanSkeleton>,
    pub interfaces: Vec<InterfaceSkeleton>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VlanSkeleton {
    pub id: u16,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceSkeleton {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<InterfaceRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
}

impl Default for InterfaceSkeleton {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            role: None,
            vlan_id: None,
            description: None,
            enabled: true,
        }
    }
}

/// Errors returned when reading or writing profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse profile {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("profile '{0}' not found")]
    NotFound(String),
}

/// Where a profile was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileSource::Embedded => f.write_str("embedded"),
            ProfileSource::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Capture a profile from an existing config.
pub fn build_profile(
    config: &CanonicalConfig,
    vendor: Vendor,
    environment: Environment,
    name: &str,
    include_hostname: bool,
) -> CliProfile {
    let name = name.trim();
    CliProfile {
        name: if name.is_empty() { UNNAMED.to_string() } else { name.to_string() },
        vendor,
        environment,
        base: ProfileBase {
            hostname: include_hostname.then(|| config.hostname.clone()),
            firewall: config.firewall.clone(),
        },
        services: config.services.clone(),
        network: NetworkDefaults {
            vlans: config
                .vlans
                .iter()
                .map(|vlan| VlanSkeleton {
                    id: vlan.id,
                    name: vlan.name.clone(),
                })
                .collect(),
            interfaces: config
                .interfaces
                .iter()
                .map(|iface| InterfaceSkeleton {
                    id: iface.id.clone(),
                    name: iface.name.clone(),
                    role: iface.role,
                    vlan_id: iface.vlan_id,
                    description: iface.description.clone(),
                    enabled: iface.enabled,
                })
                .collect(),
        },
    }
}

/// Overlay a profile onto `current`.
///
/// VLANs and interfaces come from the profile with addressing cleared.
/// Routing, NAT, VPN, QoS and metadata are kept from `current`.
pub fn apply_profile(current: &CanonicalConfig, profile: &CliProfile) -> CanonicalConfig {
    CanonicalConfig {
        hostname: profile
            .base
            .hostname
            .clone()
            .unwrap_or_else(|| current.hostname.clone()),
        firewall: profile.base.firewall.clone(),
        services: profile.services.clone(),
        vlans: profile
            .network
            .vlans
            .iter()
            .map(|vlan| Vlan {
                id: vlan.id,
                name: vlan.name.clone(),
                subnet: None,
                gateway: None,
            })
            .collect(),
        interfaces: profile
            .network
            .interfaces
            .iter()
            .map(|iface| Interface {
                id: iface.id.clone(),
                name: iface.name.clone(),
                role: iface.role,
                ip_address: None,
                subnet_mask: None,
                vlan_id: iface.vlan_id,
                description: iface.description.clone(),
                enabled: iface.enabled,
            })
            .collect(),
        ..current.clone()
    }
}

pub fn profile_to_toml(profile: &CliProfile) -> Result<String, ProfileError> {
    Ok(toml::to_string_pretty(profile)?)
}

/// File stem for a profile name: lowercase, non-alphanumerics as `-`.
pub fn profile_slug(name: &str) -> String {
    let mut slug = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "profile".to_string()
    } else {
        slug
    }
}

/// Write a profile as `<dir>/<slug>.toml`, creating `dir` if needed.
pub fn save_profile(dir: &Path, profile: &CliProfile) -> Result<PathBuf, ProfileError> {
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
    let path = dir.join(format!("{}.toml", profile_slug(&profile.name)));
    fs::write(&path, profile_to_toml(profile)?).map_err(|source| io_error(&path, source))?;
    Ok(path)
}

fn io_error(path: &Path, source: std::io::Error) -> ProfileError {
    ProfileError::Io {
        path: path.display().to_string(),
        source,
    }
}

pub fn load_profile_file(path: &Path) -> Result<CliProfile, ProfileError> {
    let raw = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    parse_profile(&raw, path.display().to_string())
}

/// Find a profile by name or slug: `<dir>/<slug>.toml` first, then the
/// built-in set.
pub fn load_profile_with_source(
    name: &str,
    profiles_dir: Option<&Path>,
) -> Result<(CliProfile, ProfileSource), ProfileError> {
    let slug = profile_slug(name);
    if let Some(dir) = profiles_dir {
        let path = dir.join(format!("{slug}.toml"));
        if path.is_file() {
            let profile = load_profile_file(&path)?;
            return Ok((profile, ProfileSource::File(path)));
        }
    }
    let raw = EMBEDDED
        .iter()
        .find(|(key, _)| *key == slug)
        .map(|(_, raw)| *raw)
        .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
    let profile = parse_profile(raw, format!("embedded:{slug}"))?;
    Ok((profile, ProfileSource::Embedded))
}

/// Profile slugs available from `profiles_dir` and the built-in set.
/// A directory profile hides a built-in one with the same slug.
pub fn list_profiles(profiles_dir: Option<&Path>) -> Vec<(String, ProfileSource)> {
    let mut found: Vec<(String, ProfileSource)> = Vec::new();
    if let Some(entries) = profiles_dir.and_then(|dir| fs::read_dir(dir).ok()) {
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort();
        for path in files {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                found.push((stem.to_string(), ProfileSource::File(path.clone())));
            }
        }
    }
    for (slug, _) in EMBEDDED {
        if !found.iter().any(|(name, _)| name == slug) {
            found.push((slug.to_string(), ProfileSource::Embedded));
        }
    }
    found
}

fn parse_profile(raw: &str, path: String) -> Result<CliProfile, ProfileError> {
    toml::from_str(raw).map_err(|source| ProfileError::Parse { path, source })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::{
        apply_profile, build_profile, list_profiles, load_profile_with_source, profile_slug, profile_to_toml,
        save_profile, ProfileError, ProfileSource,
    };
    use crate::schema::{
        default_config, CanonicalConfig, Environment, Interface, InterfaceRole, StaticRoute, Vendor, Vlan,
    };

    fn source_config() -> CanonicalConfig {
        let mut config = default_config();
        config.hostname = "branch-07".into();
        config.vlans = vec![Vlan {
            id: 10,
            name: "users".into(),
            subnet: Some("10.7.10.0/24".into()),
            gateway: Some("10.7.10.1".into()),
        }];
        config.interfaces = vec![Interface {
            id: "i2".into(),
            name: "ether2".into(),
            role: Some(InterfaceRole::Access),
            ip_address: Some("10.7.10.2".into()),
            vlan_id: Some(10),
            ..Interface::default()
        }];
        config.services.ntp_servers = vec!["10.0.0.1".into()];
        config.firewall.allow_mgmt_from = Some("10.0.99.0/24".into());
        config
    }

    #[test]
    fn build_respects_hostname_flag_and_default_name() {
        let config = source_config();
        let with = build_profile(&config, Vendor::Mikrotik, Environment::Prod, " Branch ", true);
        assert_eq!(with.name, "Branch");
        assert_eq!(with.base.hostname.as_deref(), Some("branch-07"));
        assert_eq!(with.network.vlans[0].name, "users");

        let without = build_profile(&config, Vendor::Mikrotik, Environment::Prod, "", false);
        assert_eq!(without.name, "Unnamed profile");
        assert!(without.base.hostname.is_none());
    }

    #[test]
    fn apply_clears_addressing_and_keeps_routing() {
        let profile = build_profile(&source_config(), Vendor::Mikrotik, Environment::Dev, "branch", false);
        let mut current = default_config();
        current.hostname = "branch-08".into();
        current.routing.static_routes = vec![StaticRoute {
            destination: "0.0.0.0/0".into(),
            netmask: None,
            next_hop: "198.51.100.1".into(),
        }];

        let applied = apply_profile(&current, &profile);
        assert_eq!(applied.hostname, "branch-08");
        assert_eq!(applied.routing, current.routing);
        assert_eq!(applied.vlans[0].id, 10);
        assert!(applied.vlans[0].subnet.is_none());
        assert!(applied.vlans[0].gateway.is_none());
        assert!(applied.interfaces[0].ip_address.is_none());
        assert_eq!(applied.interfaces[0].vlan_id, Some(10));
        assert_eq!(applied.services.ntp_servers, ["10.0.0.1"]);
        assert_eq!(applied.firewall.allow_mgmt_from.as_deref(), Some("10.0.99.0/24"));
    }

    #[test]
    fn saved_profile_loads_from_directory() {
        let dir = tempdir().expect("tempdir");
        let profile = build_profile(&source_config(), Vendor::Cisco, Environment::Staging, "Branch Seven", true);
        let path = save_profile(dir.path(), &profile).expect("save");
        assert!(path.ends_with("branch-seven.toml"));

        let (loaded, source) = load_profile_with_source("Branch Seven", Some(dir.path())).expect("load");
        assert_eq!(loaded, profile);
        assert_eq!(source, ProfileSource::File(path));
    }

    #[test]
    fn directory_profile_shadows_embedded() {
        let dir = tempdir().expect("tempdir");
        let (mut embedded, source) = load_profile_with_source("campus-cisco", None).expect("embedded");
        assert_eq!(source, ProfileSource::Embedded);
        assert_eq!(embedded.vendor, Vendor::Cisco);

        embedded.environment = Environment::Dev;
        fs::write(
            dir.path().join("campus-cisco.toml"),
            profile_to_toml(&embedded).expect("toml"),
        )
        .expect("write");
        let (local, source) = load_profile_with_source("campus-cisco", Some(dir.path())).expect("local");
        assert_eq!(local.environment, Environment::Dev);
        assert!(matches!(source, ProfileSource::File(_)));

        let listed = list_profiles(Some(dir.path()));
        assert_eq!(listed.len(), 2);
        assert!(matches!(listed[0].1, ProfileSource::File(_)));
        assert_eq!(listed[1], ("branch-mikrotik".to_string(), ProfileSource::Embedded));
    }

    #[test]
    fn unknown_profile_is_not_found() {
        let err = load_profile_with_source("nope", None).expect_err("missing");
        assert!(matches!(err, ProfileError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn embedded_profiles_parse() {
        for (slug, _) in list_profiles(None) {
            let (profile, _) = load_profile_with_source(&slug, None).expect("embedded profile");
            assert!(!profile.network.interfaces.is_empty(), "{slug}");
        }
    }

    #[test]
    fn slugs_are_file_safe() {
        assert_eq!(profile_slug("Campus / Core 01"), "campus-core-01");
        assert_eq!(profile_slug("  "), "profile");
    }
}
