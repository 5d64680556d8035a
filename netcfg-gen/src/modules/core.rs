//! Identity, VLANs, interfaces, base services and the management firewall.

use std::collections::HashSet;

use crate::findings::{RiskItem, RiskLevel, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{CanonicalConfig, Environment, InterfaceRole, Vendor};
use crate::utils::{
    acl_address, cidr_range, gateway_in_subnet, mask_from_cidr, mask_to_prefix, normalize_mask,
    parse_cidr_prefix, CidrRange,
};

use super::{ConfigModule, ModuleKind};

const BRIDGE: &str = "br0";
const DEFAULT_PREFIX: u8 = 24;
const DEFAULT_MASK: &str = "255.255.255.0";

pub struct CoreModule;

impl ConfigModule for CoreModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Core
    }

    fn title(&self) -> &'static str {
        "Core configuration"
    }

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding> {
        let mut out = Vec::new();
        out.extend(hostname_findings(config));
        out.extend(duplicate_vlan_findings(config));
        out.extend(overlap_findings(config));
        out.extend(gateway_findings(config));
        out.extend(unused_vlan_findings(config));
        out.extend(dangling_vlan_findings(config));
        out
    }

    fn risk(&self, config: &CanonicalConfig, environment: Environment) -> Vec<RiskItem> {
        let prod_scaled = if environment.is_prod() {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        };
        let mut items = Vec::new();

        if config.services.ssh.allow_password {
            items.push(RiskItem::new("ssh.password", prod_scaled, "sshPassword"));
        }
        if config.services.ntp_servers.is_empty() {
            items.push(RiskItem::new("ntp.missing", RiskLevel::Low, "noNtp"));
        }
        if !config.firewall.enabled {
            items.push(RiskItem::new("firewall.disabled", prod_scaled, "firewallOff"));
        }
        items.extend(management_risk(config.firewall.allow_mgmt_from.as_deref()));
        items
    }

    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender {
        match vendor {
            Vendor::Mikrotik => render_mikrotik(config),
            Vendor::Cisco => render_cisco(config),
        }
    }
}

fn hostname_findings(config: &CanonicalConfig) -> Option<ValidationFinding> {
    config.hostname.trim().is_empty().then(|| {
        ValidationFinding::error("hostname.required", "hostname", "Hostname is required.")
            .with_suggestion("Provide a hostname before generating CLI.")
    })
}

fn duplicate_vlan_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (index, vlan) in config.vlans.iter().enumerate() {
        if !seen.insert(vlan.id) {
            out.push(
                ValidationFinding::error(
                    format!("vlans.duplicate.{}", vlan.id),
                    format!("vlans.{index}.id"),
                    format!("Duplicate VLAN ID {}.", vlan.id),
                )
                .with_suggestion("Ensure VLAN IDs are unique."),
            );
        }
    }
    out
}

/// Pairwise subnet overlap check over VLANs with a parseable subnet.
fn overlap_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    let ranges: Vec<(u16, CidrRange)> = config
        .vlans
        .iter()
        .filter_map(|vlan| Some((vlan.id, cidr_range(vlan.subnet.as_deref()?)?)))
        .collect();

    let mut out = Vec::new();
    for (i, (a_id, a)) in ranges.iter().enumerate() {
        for (b_id, b) in &ranges[i + 1..] {
            if a.overlaps(b) {
                out.push(
                    ValidationFinding::error(
                        format!("vlans.overlap.{a_id}.{b_id}"),
                        "vlans",
                        format!("VLAN subnet overlap detected between {a_id} and {b_id}."),
                    )
                    .with_suggestion("Adjust VLAN subnets to avoid overlaps."),
                );
            }
        }
    }
    out
}

fn gateway_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    config
        .vlans
        .iter()
        .enumerate()
        .filter(|(_, vlan)| {
            gateway_in_subnet(vlan.gateway.as_deref(), vlan.subnet.as_deref()) == Some(false)
        })
        .map(|(index, vlan)| {
            ValidationFinding::error(
                format!("vlans.gateway.{}", vlan.id),
                format!("vlans.{index}.gateway"),
                format!("Gateway for VLAN {} is not inside subnet.", vlan.id),
            )
            .with_suggestion("Update gateway to match subnet CIDR.")
        })
        .collect()
}

fn unused_vlan_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    config
        .vlans
        .iter()
        .filter(|vlan| !config.interfaces.iter().any(|i| i.vlan_id == Some(vlan.id)))
        .map(|vlan| {
            ValidationFinding::warn(
                format!("vlans.unused.{}", vlan.id),
                "interfaces",
                format!("VLAN {} is not attached to any interface.", vlan.id),
            )
            .with_suggestion("Assign VLAN to an access or trunk interface.")
        })
        .collect()
}

/// Interfaces pointing at a VLAN id that is not defined.
fn dangling_vlan_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    let defined: HashSet<u16> = config.vlans.iter().map(|v| v.id).collect();
    config
        .interfaces
        .iter()
        .enumerate()
        .filter_map(|(index, iface)| {
            let vlan_id = iface.vlan_id?;
            (!defined.contains(&vlan_id)).then(|| {
                ValidationFinding::warn(
                    format!("interfaces.vlan.{index}"),
                    format!("interfaces.{index}.vlan_id"),
                    format!("Interface {} references undefined VLAN {vlan_id}.", iface.name),
                )
                .with_suggestion("Define the VLAN or clear the interface VLAN.")
            })
        })
        .collect()
}

fn management_risk(allow_mgmt_from: Option<&str>) -> Option<RiskItem> {
    let mgmt = allow_mgmt_from.unwrap_or_default().trim();
    if mgmt.is_empty() {
        return Some(RiskItem::new("mgmt.missing", RiskLevel::Medium, "mgmtMissing"));
    }
    if mgmt == "0.0.0.0/0" || mgmt == "::/0" {
        return Some(RiskItem::new("mgmt.open", RiskLevel::High, "mgmtOpen"));
    }
    match parse_cidr_prefix(mgmt) {
        Some(prefix) if prefix < 24 => {
            Some(RiskItem::new("mgmt.wide", RiskLevel::High, "mgmtWide"))
        }
        _ => None,
    }
}

/// Trimmed management source, if any.
fn management_source(config: &CanonicalConfig) -> Option<&str> {
    config
        .firewall
        .allow_mgmt_from
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
}

/// Dotted mask from either a dotted mask or a `/nn` style value.
fn dotted_mask(mask: Option<&str>) -> Option<String> {
    match mask {
        Some(m) if m.contains('/') => mask_from_cidr(Some(m)),
        other => normalize_mask(other),
    }
}

fn render_mikrotik(config: &CanonicalConfig) -> ModuleRender {
    let mut base = Vec::new();
    let mut vlans = Vec::new();
    let mut interfaces = Vec::new();
    let mut services = Vec::new();
    let mut firewall = Vec::new();
    let mut rollback = Vec::new();

    if !config.hostname.is_empty() {
        base.push(format!("/system identity set name={}", config.hostname));
    }

    let has_bridge = !config.vlans.is_empty();
    if has_bridge {
        base.push(format!("/interface bridge add name={BRIDGE} vlan-filtering=yes"));
        rollback.push(format!("/interface bridge remove [find name={BRIDGE}]"));
    }

    for vlan in &config.vlans {
        let name = format!("vlan{}", vlan.id);
        vlans.push(format!(
            "/interface vlan add name={name} vlan-id={} interface={BRIDGE}",
            vlan.id
        ));
        if let Some(gateway) = vlan.gateway.as_deref().filter(|g| !g.is_empty()) {
            let prefix = mask_to_prefix(vlan.subnet.as_deref()).unwrap_or(DEFAULT_PREFIX);
            vlans.push(format!("/ip address add address={gateway}/{prefix} interface={name}"));
            rollback.push(format!("/ip address remove [find interface={name}]"));
        }
        rollback.push(format!("/interface vlan remove [find name={name}]"));
    }

    for iface in &config.interfaces {
        if let (true, Some(InterfaceRole::Access), Some(pvid)) = (has_bridge, iface.role, iface.vlan_id) {
            interfaces.push(format!(
                "/interface bridge port add bridge={BRIDGE} interface={} pvid={pvid}",
                iface.name
            ));
            rollback.push(format!("/interface bridge port remove [find interface={}]", iface.name));
        }
        if let Some(ip) = iface.ip_address.as_deref().filter(|ip| !ip.is_empty()) {
            let prefix = mask_to_prefix(iface.subnet_mask.as_deref()).unwrap_or(DEFAULT_PREFIX);
            interfaces.push(format!("/ip address add address={ip}/{prefix} interface={}", iface.name));
            rollback.push(format!("/ip address remove [find interface={}]", iface.name));
        }
    }

    let ssh_disabled = if config.services.ssh.enabled { "no" } else { "yes" };
    services.push(format!("/ip service set ssh disabled={ssh_disabled}"));
    services.push("/ip service set telnet disabled=yes".to_string());
    if !config.services.dns_servers.is_empty() {
        services.push(format!("/ip dns set servers={}", config.services.dns_servers.join(",")));
    }
    if let Some(ntp) = config.services.ntp_servers.first() {
        services.push(format!("/system ntp client set enabled=yes primary-ntp={ntp}"));
    }

    if config.firewall.enabled {
        let mgmt_match = match management_source(config) {
            Some(source) => format!("src-address={source}"),
            None => "in-interface=ether1".to_string(),
        };
        firewall.extend([
            "/ip firewall filter add chain=input connection-state=established,related action=accept".to_string(),
            "/ip firewall filter add chain=input connection-state=invalid action=drop".to_string(),
            format!("/ip firewall filter add chain=input {mgmt_match} action=accept"),
            "/ip firewall filter add chain=input action=drop".to_string(),
        ]);
    }

    let mut out = ModuleRender::empty();
    out.push_section("base", base);
    out.push_section("vlan", vlans);
    out.push_section("interfaces", interfaces);
    out.push_section("services", services);
    out.push_section("firewall", firewall);
    out.verify_commands = vec!["/interface vlan print".into(), "/ip address print".into()];
    out.rollback_commands = rollback;
    out
}

fn render_cisco(config: &CanonicalConfig) -> ModuleRender {
    let mut base = Vec::new();
    let mut vlans = Vec::new();
    let mut interfaces = Vec::new();
    let mut services = Vec::new();
    let mut firewall = Vec::new();
    let mut rollback = Vec::new();

    if !config.hostname.is_empty() {
        base.push(format!("hostname {}", config.hostname));
    }

    if config.services.ssh.enabled {
        services.extend([
            "ip ssh version 2".to_string(),
            "line vty 0 4".to_string(),
            " transport input ssh".to_string(),
        ]);
        rollback.extend(["line vty 0 4".to_string(), " transport input telnet".to_string()]);
    }
    services.push("no ip http server".to_string());
    for server in &config.services.dns_servers {
        services.push(format!("ip name-server {server}"));
    }

    for vlan in &config.vlans {
        vlans.push(format!("vlan {}", vlan.id));
        if vlan.name.is_empty() {
            vlans.push(format!(" name VLAN{}", vlan.id));
        } else {
            vlans.push(format!(" name {}", vlan.name));
        }
        if let Some(gateway) = vlan.gateway.as_deref().filter(|g| !g.is_empty()) {
            let mask = mask_from_cidr(vlan.subnet.as_deref()).unwrap_or_else(|| DEFAULT_MASK.into());
            interfaces.push(format!("interface Vlan{}", vlan.id));
            interfaces.push(format!(" ip address {gateway} {mask}"));
            interfaces.push(" no shutdown".to_string());
            rollback.push(format!("no interface Vlan{}", vlan.id));
        }
        rollback.push(format!("no vlan {}", vlan.id));
    }

    for iface in &config.interfaces {
        interfaces.push(format!("interface {}", iface.name));
        if let Some(description) = iface.description.as_deref().filter(|d| !d.is_empty()) {
            interfaces.push(format!(" description {description}"));
        }
        if let (Some(InterfaceRole::Access), Some(vlan_id)) = (iface.role, iface.vlan_id) {
            interfaces.push(" switchport mode access".to_string());
            interfaces.push(format!(" switchport access vlan {vlan_id}"));
        }
        if let Some(ip) = iface.ip_address.as_deref().filter(|ip| !ip.is_empty()) {
            let mask = dotted_mask(iface.subnet_mask.as_deref()).unwrap_or_else(|| DEFAULT_MASK.into());
            interfaces.push(format!(" ip address {ip} {mask}"));
        }
        interfaces.push(if iface.enabled { " no shutdown" } else { " shutdown" }.to_string());
    }

    if config.firewall.enabled {
        firewall.push("ip access-list extended MGMT-IN".to_string());
        let permit = format!(" permit ip {} any", acl_address(management_source(config)));
        firewall.push(permit);
        rollback.push("no ip access-list extended MGMT-IN".to_string());
    }

    let mut out = ModuleRender::empty();
    out.push_section("base", base);
    out.push_section("vlan", vlans);
    out.push_section("interfaces", interfaces);
    out.push_section("services", services);
    out.push_section("firewall", firewall);
    out.verify_commands = vec!["show vlan brief".into(), "show ip interface brief".into()];
    out.rollback_commands = rollback;
    out
}
