//! Static routes, OSPF, BGP and RIP.
//!
//! The BGP/firewall consistency check needs both this slice and the firewall
//! slice, so it lives with the registry's cross-module checks.

use crate::findings::{RiskItem, RiskLevel, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{CanonicalConfig, Environment, RoutingConfig, Vendor};
use crate::utils::{split_cidr, wildcard_from_mask};

use super::{ConfigModule, ModuleKind};

const DEFAULT_MASK: &str = "255.255.255.0";
const OSPF_LARGE_AREAS: usize = 3;

pub struct RoutingModule;

impl ConfigModule for RoutingModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Routing
    }

    fn title(&self) -> &'static str {
        "Routing"
    }

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding> {
        let routing = &config.routing;
        let mut out = Vec::new();

        for (index, route) in routing.static_routes.iter().enumerate() {
            if !route.is_complete() {
                out.push(
                    ValidationFinding::error(
                        format!("routing.static.{index}"),
                        format!("routing.static_routes.{index}"),
                        "Static route requires destination and next hop.",
                    )
                    .with_suggestion("Provide destination and next hop for each route."),
                );
            }
        }

        if routing.ospf.enabled && routing.ospf.areas.is_empty() {
            out.push(
                ValidationFinding::error("routing.ospf.areas", "routing.ospf.areas", "OSPF enabled without any areas.")
                    .with_suggestion("Add at least one OSPF area and network."),
            );
        }

        if routing.bgp.enabled {
            if routing.bgp.configured_as().is_none() {
                out.push(
                    ValidationFinding::error("routing.bgp.localAs", "routing.bgp.local_as", "BGP enabled without local AS.")
                        .with_suggestion("Set local AS before enabling BGP."),
                );
            }
            if routing.bgp.neighbors.is_empty() {
                out.push(
                    ValidationFinding::error(
                        "routing.bgp.neighbors",
                        "routing.bgp.neighbors",
                        "BGP enabled without neighbors.",
                    )
                    .with_suggestion("Add at least one BGP neighbor."),
                );
            }
        }

        out
    }

    fn risk(&self, config: &CanonicalConfig, _environment: Environment) -> Vec<RiskItem> {
        let routing = &config.routing;
        let mut items = Vec::new();
        if routing.bgp.enabled {
            items.push(RiskItem::new("routing.bgp.enabled", RiskLevel::Medium, "bgpEnabled"));
        }
        if routing.ospf.enabled && routing.ospf.areas.len() > OSPF_LARGE_AREAS {
            items.push(RiskItem::new("routing.ospf.large", RiskLevel::Medium, "ospfLarge"));
        }
        items
    }

    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender {
        let routing = &config.routing;
        let mikrotik = vendor == Vendor::Mikrotik;
        let pick = |m: &'static str, c: &'static str| if mikrotik { m } else { c };
        let mut out = ModuleRender::empty();

        let (commands, rollback) = render_static(routing, vendor);
        out.push_block("routing-static", commands, rollback, &[pick("/ip route print", "show ip route")]);

        let (commands, rollback) = render_ospf(routing, vendor);
        out.push_block(
            "routing-ospf",
            commands,
            rollback,
            &[pick("/routing ospf neighbor print", "show ip ospf neighbor")],
        );

        let (commands, rollback) = render_bgp(routing, vendor);
        out.push_block(
            "routing-bgp",
            commands,
            rollback,
            &[pick("/routing bgp peer print", "show ip bgp summary")],
        );

        let (commands, rollback) = render_rip(routing, vendor);
        out.push_block("routing-rip", commands, rollback, &[pick("/routing rip print", "show ip rip")]);

        out
    }
}

type Block = (Vec<String>, Vec<String>);

fn render_static(routing: &RoutingConfig, vendor: Vendor) -> Block {
    let mut commands = Vec::new();
    let mut rollback = Vec::new();

    for route in routing.static_routes.iter().filter(|r| r.is_complete()) {
        let netmask = route.netmask.as_deref().filter(|m| !m.is_empty());
        match vendor {
            Vendor::Mikrotik => {
                let dst = match netmask {
                    Some(mask) => format!("{}/{mask}", route.destination),
                    None => route.destination.clone(),
                };
                commands.push(format!("/ip route add dst-address={dst} gateway={}", route.next_hop));
                rollback.push(format!("/ip route remove [find dst-address~\"{}\"]", route.destination));
            }
            Vendor::Cisco => {
                let mask = netmask.unwrap_or(DEFAULT_MASK);
                commands.push(format!("ip route {} {mask} {}", route.destination, route.next_hop));
                rollback.push(format!("no ip route {} {mask} {}", route.destination, route.next_hop));
            }
        }
    }

    (commands, rollback)
}

fn render_ospf(routing: &RoutingConfig, vendor: Vendor) -> Block {
    let ospf = &routing.ospf;
    let mut commands = Vec::new();
    let mut rollback = Vec::new();
    if !ospf.enabled {
        return (commands, rollback);
    }
    let router_id = ospf.router_id.as_deref().filter(|id| !id.is_empty());

    match vendor {
        Vendor::Mikrotik => {
            if let Some(id) = router_id {
                commands.push(format!("/routing ospf instance set [find default=yes] router-id={id}"));
            }
            for area in &ospf.areas {
                commands.push(format!("/routing ospf area add name=area-{0} area-id={0}", area.area));
                for network in &area.networks {
                    commands.push(format!(
                        "/routing ospf interface-template add networks={network} area=area-{}",
                        area.area
                    ));
                }
                rollback.push(format!("/routing ospf area remove [find area-id={}]", area.area));
            }
        }
        Vendor::Cisco => {
            commands.push("router ospf 1".to_string());
            if let Some(id) = router_id {
                commands.push(format!(" router-id {id}"));
            }
            for area in &ospf.areas {
                for network in &area.networks {
                    let (ip, wildcard) = ospf_network(network);
                    commands.push(format!(" network {ip} {wildcard} area {}", area.area));
                }
            }
            rollback.push("no router ospf 1".to_string());
        }
    }

    (commands, rollback)
}

/// `(address, wildcard)` for an OSPF network statement. A bare address gets a
/// host wildcard.
fn ospf_network(network: &str) -> (String, String) {
    split_cidr(network)
        .and_then(|(ip, mask)| Some((ip, wildcard_from_mask(&mask)?)))
        .unwrap_or_else(|| (network.trim().to_string(), "0.0.0.0".to_string()))
}

fn render_bgp(routing: &RoutingConfig, vendor: Vendor) -> Block {
    let bgp = &routing.bgp;
    let mut commands = Vec::new();
    let mut rollback = Vec::new();
    let Some(local_as) = bgp.configured_as().filter(|_| bgp.enabled) else {
        return (commands, rollback);
    };
    let router_id = bgp.router_id.as_deref().filter(|id| !id.is_empty());

    match vendor {
        Vendor::Mikrotik => {
            commands.push(format!("/routing bgp instance set default as={local_as}"));
            if let Some(id) = router_id {
                commands.push(format!("/routing bgp instance set default router-id={id}"));
            }
            for neighbor in &bgp.neighbors {
                commands.push(format!(
                    "/routing bgp peer add remote-address={} remote-as={}",
                    neighbor.neighbor, neighbor.remote_as
                ));
                rollback.push(format!("/routing bgp peer remove [find remote-address={}]", neighbor.neighbor));
            }
        }
        Vendor::Cisco => {
            commands.push(format!("router bgp {local_as}"));
            if let Some(id) = router_id {
                commands.push(format!(" bgp router-id {id}"));
            }
            for neighbor in &bgp.neighbors {
                commands.push(format!(" neighbor {} remote-as {}", neighbor.neighbor, neighbor.remote_as));
            }
            for network in &bgp.networks {
                commands.push(format!(" network {}", network.network));
            }
            rollback.push(format!("no router bgp {local_as}"));
        }
    }

    (commands, rollback)
}

fn render_rip(routing: &RoutingConfig, vendor: Vendor) -> Block {
    let rip = &routing.rip;
    let mut commands = Vec::new();
    let mut rollback = Vec::new();
    if !rip.enabled {
        return (commands, rollback);
    }

    match vendor {
        Vendor::Mikrotik => {
            commands.push("/routing rip set enabled=yes".to_string());
            for network in &rip.networks {
                commands.push(format!("/routing rip interface-template add networks={network}"));
            }
            rollback.push("/routing rip set enabled=no".to_string());
        }
        Vendor::Cisco => {
            commands.push("router rip".to_string());
            commands.push(format!(" version {}", rip.version));
            for network in &rip.networks {
                commands.push(format!(" network {network}"));
            }
            rollback.push("no router rip".to_string());
        }
    }

    (commands, rollback)
}
