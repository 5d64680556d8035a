//! IPsec, WireGuard and L2TP remote access.

use crate::findings::{RiskItem, RiskLevel, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{CanonicalConfig, Environment, IkeVersion, IpsecTunnel, L2tpServer, Vendor, VpnConfig, WireguardTunnel};
use crate::utils::{acl_address, is_blank};

use super::{ConfigModule, ModuleKind};

const WIREGUARD_PORT: u16 = 51820;
const CRYPTO_MAP: &str = "NETOPS";
const VPN_ACL: &str = "NETOPS-VPN";

pub struct VpnModule;

impl ConfigModule for VpnModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Vpn
    }

    fn title(&self) -> &'static str {
        "VPN"
    }

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding> {
        let vpn = &config.vpn;
        let mut out = Vec::new();

        for (index, tunnel) in vpn.ipsec_tunnels.iter().enumerate() {
            let missing = [&tunnel.local_address, &tunnel.remote_address, &tunnel.pre_shared_key]
                .iter()
                .any(|v| v.trim().is_empty());
            if missing {
                out.push(
                    ValidationFinding::error(
                        format!("vpn.ipsec.{index}"),
                        format!("vpn.ipsec_tunnels.{index}"),
                        "IPsec tunnel requires local address, remote address, and pre-shared key.",
                    )
                    .with_suggestion("Fill required IPsec parameters."),
                );
            }
        }

        for (index, tunnel) in vpn.wireguard_tunnels.iter().enumerate() {
            if tunnel.interface_address.trim().is_empty() {
                out.push(
                    ValidationFinding::error(
                        format!("vpn.wireguard.{index}"),
                        format!("vpn.wireguard_tunnels.{index}.interface_address"),
                        "WireGuard tunnel requires interface address.",
                    )
                    .with_suggestion("Provide an interface address for WireGuard."),
                );
            }
        }

        for (index, server) in vpn.l2tp_servers.iter().enumerate() {
            if is_blank(server.pool.as_deref()) {
                out.push(
                    ValidationFinding::warn(
                        format!("vpn.l2tp.{index}.pool"),
                        format!("vpn.l2tp_servers.{index}.pool"),
                        "L2TP server has no client address pool.",
                    )
                    .with_suggestion("Provide an address range for L2TP clients."),
                );
            }
        }

        out
    }

    fn risk(&self, config: &CanonicalConfig, _environment: Environment) -> Vec<RiskItem> {
        config
            .vpn
            .ipsec_tunnels
            .iter()
            .filter(|tunnel| tunnel.pre_shared_key.trim().is_empty())
            .map(|tunnel| RiskItem::new(format!("vpn.ipsec.psk.{}", tunnel.id), RiskLevel::High, "vpnNoPsk"))
            .collect()
    }

    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender {
        match vendor {
            Vendor::Mikrotik => render_mikrotik(&config.vpn),
            Vendor::Cisco => render_cisco(&config.vpn),
        }
    }
}

fn render_mikrotik(vpn: &VpnConfig) -> ModuleRender {
    let mut commands = Vec::new();
    let mut rollback = Vec::new();
    let mut verify = vec!["/ip ipsec peer print"];

    for tunnel in &vpn.ipsec_tunnels {
        commands.extend(mikrotik_ipsec(tunnel));
        rollback.push("/ip ipsec peer remove [find]".to_string());
        rollback.push("/ip ipsec policy remove [find]".to_string());
    }
    for tunnel in &vpn.wireguard_tunnels {
        commands.extend(mikrotik_wireguard(tunnel));
        rollback.push(format!("/interface wireguard remove [find name={}]", tunnel.name));
    }
    if !vpn.wireguard_tunnels.is_empty() {
        verify.push("/interface wireguard print");
    }
    for server in &vpn.l2tp_servers {
        let (lines, undo) = mikrotik_l2tp(server);
        commands.extend(lines);
        rollback.extend(undo);
    }
    if !vpn.l2tp_servers.is_empty() {
        verify.push("/interface l2tp-server server print");
    }

    let mut out = ModuleRender::empty();
    out.push_block("vpn", commands, rollback, &verify);
    out
}

fn mikrotik_ipsec(tunnel: &IpsecTunnel) -> Vec<String> {
    let exchange = match tunnel.ike_version {
        Some(IkeVersion::V1) => "main",
        _ => "ike2",
    };
    let mut lines = vec![format!(
        "/ip ipsec peer add address={} exchange-mode={exchange} secret={}",
        tunnel.remote_address, tunnel.pre_shared_key
    )];
    if let (Some(local), Some(remote)) = (tunnel.local_subnet.as_deref(), tunnel.remote_subnet.as_deref()) {
        lines.push(format!(
            "/ip ipsec policy add src-address={local} dst-address={remote} sa-dst-address={} sa-src-address={} tunnel=yes",
            tunnel.remote_address, tunnel.local_address
        ));
    }
    lines
}

fn mikrotik_wireguard(tunnel: &WireguardTunnel) -> Vec<String> {
    let port = tunnel.listen_port.unwrap_or(WIREGUARD_PORT);
    let key = tunnel.private_key.as_deref().filter(|k| !k.is_empty()).unwrap_or("<private-key>");
    let mut lines = vec![
        format!("/interface wireguard add name={} listen-port={port} private-key={key}", tunnel.name),
        format!("/ip address add address={} interface={}", tunnel.interface_address, tunnel.name),
    ];
    for peer in &tunnel.peers {
        let mut line = format!(
            "/interface wireguard peers add interface={} public-key={} allowed-address={}",
            tunnel.name, peer.public_key, peer.allowed_ips
        );
        if let Some(endpoint) = peer.endpoint.as_deref().filter(|e| !e.is_empty()) {
            line.push_str(&format!(" endpoint-address={endpoint}"));
        }
        lines.push(line);
    }
    lines
}

fn mikrotik_l2tp(server: &L2tpServer) -> (Vec<String>, Vec<String>) {
    let pool = server.pool.as_deref().filter(|p| !p.is_empty());
    let mut lines = Vec::new();
    let mut undo = Vec::new();

    if let Some(ranges) = pool {
        lines.push(format!("/ip pool add name={}-pool ranges={ranges}", server.name));
        undo.push(format!("/ip pool remove [find name={}-pool]", server.name));
    }

    let mut profile = format!("/ppp profile add name={}", server.name);
    if let Some(local) = server.local_address.as_deref().filter(|a| !a.is_empty()) {
        profile.push_str(&format!(" local-address={local}"));
    }
    if pool.is_some() {
        profile.push_str(&format!(" remote-address={}-pool", server.name));
    }
    lines.push(profile);
    undo.push(format!("/ppp profile remove [find name={}]", server.name));

    let mut enable = format!("/interface l2tp-server server set enabled=yes default-profile={}", server.name);
    if let Some(secret) = server.pre_shared_key.as_deref().filter(|k| !k.is_empty()) {
        enable.push_str(&format!(" use-ipsec=required ipsec-secret={secret}"));
    }
    lines.push(enable);
    undo.push("/interface l2tp-server server set enabled=no".to_string());

    (lines, undo)
}

fn render_cisco(vpn: &VpnConfig) -> ModuleRender {
    let mut commands = Vec::new();
    let mut rollback = Vec::new();
    let mut verify = vec!["show crypto isakmp sa"];

    if !vpn.ipsec_tunnels.is_empty() {
        commands.push(format!("crypto ipsec transform-set {CRYPTO_MAP} esp-aes esp-sha-hmac"));
    }
    let acl_has_entries = vpn.ipsec_tunnels.iter().any(|tunnel| tunnel_subnets(tunnel).is_some());
    for (index, tunnel) in vpn.ipsec_tunnels.iter().enumerate() {
        let seq = (index + 1) * 10;
        commands.push(format!(
            "crypto isakmp key {} address {}",
            tunnel.pre_shared_key, tunnel.remote_address
        ));
        if let Some((local, remote)) = tunnel_subnets(tunnel) {
            commands.push(format!("ip access-list extended {VPN_ACL}"));
            commands.push(format!(
                " permit ip {} {}",
                acl_address(Some(local)),
                acl_address(Some(remote))
            ));
        }
        commands.extend([
            format!("crypto map {CRYPTO_MAP} {seq} ipsec-isakmp"),
            format!(" set peer {}", tunnel.remote_address),
            format!(" set transform-set {CRYPTO_MAP}"),
        ]);
        if acl_has_entries {
            commands.push(format!(" match address {VPN_ACL}"));
        }
        rollback.push(format!("no crypto map {CRYPTO_MAP} {seq}"));
        rollback.push(format!(
            "no crypto isakmp key {} address {}",
            tunnel.pre_shared_key, tunnel.remote_address
        ));
    }

    if !vpn.wireguard_tunnels.is_empty() {
        commands.push("! WireGuard not supported on Cisco IOS in this template.".to_string());
    }

    for (index, server) in vpn.l2tp_servers.iter().enumerate() {
        let (lines, undo) = cisco_l2tp(server, index + 1);
        commands.extend(lines);
        rollback.extend(undo);
    }
    if !vpn.l2tp_servers.is_empty() {
        verify.push("show vpdn");
    }

    let mut out = ModuleRender::empty();
    out.push_block("vpn", commands, rollback, &verify);
    out
}

fn tunnel_subnets(tunnel: &IpsecTunnel) -> Option<(&str, &str)> {
    let local = tunnel.local_subnet.as_deref().filter(|s| !s.trim().is_empty())?;
    let remote = tunnel.remote_subnet.as_deref().filter(|s| !s.trim().is_empty())?;
    Some((local, remote))
}

fn cisco_l2tp(server: &L2tpServer, template: usize) -> (Vec<String>, Vec<String>) {
    let pool = server.pool.as_deref().filter(|p| !p.is_empty());
    let mut lines = vec![
        "vpdn enable".to_string(),
        format!("vpdn-group {}", server.name),
        " accept-dialin".to_string(),
        "  protocol l2tp".to_string(),
        format!("  virtual-template {template}"),
        " no l2tp tunnel authentication".to_string(),
    ];
    let mut undo = vec![format!("no vpdn-group {}", server.name)];

    if let Some(range) = pool {
        lines.push(format!("ip local pool {} {}", server.name, range.replace('-', " ")));
        undo.push(format!("no ip local pool {}", server.name));
    }

    lines.push(format!("interface Virtual-Template{template}"));
    if let Some(local) = server.local_address.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!(" ip address {local} 255.255.255.255"));
    }
    if pool.is_some() {
        lines.push(format!(" peer default ip address pool {}", server.name));
    }
    undo.push(format!("no interface Virtual-Template{template}"));

    if let Some(secret) = server.pre_shared_key.as_deref().filter(|k| !k.is_empty()) {
        lines.push(format!("crypto isakmp key {secret} address 0.0.0.0"));
        undo.push(format!("no crypto isakmp key {secret} address 0.0.0.0"));
    }

    (lines, undo)
}
