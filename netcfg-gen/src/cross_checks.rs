//! Checks that span more than one config module.
//!
//! Each check is a named function over the whole config. The registry runs
//! them after the per-module validators, in the order listed in
//! [`CROSS_CHECKS`].

use crate::findings::ValidationFinding;
use crate::schema::CanonicalConfig;

/// A named cross-module check.
pub struct CrossCheck {
    pub name: &'static str,
    pub run: fn(&CanonicalConfig) -> Vec<ValidationFinding>,
}

/// Every cross-module check, in run order.
pub const CROSS_CHECKS: &[CrossCheck] = &[
    CrossCheck {
        name: "bgp_firewall",
        run: bgp_firewall_findings,
    },
    CrossCheck {
        name: "vpn_route",
        run: vpn_route_findings,
    },
    CrossCheck {
        name: "nat_interface",
        run: nat_interface_findings,
    },
];

/// BGP enabled but no firewall rule accepts TCP/179.
///
/// An empty rule list also counts as missing the rule.
pub fn bgp_firewall_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    if !config.routing.bgp.enabled {
        return Vec::new();
    }
    if config.firewall.rules.iter().any(|rule| rule.permits_bgp()) {
        return Vec::new();
    }
    vec![ValidationFinding::warn(
        "routing.bgp.firewall",
        "firewall.rules",
        "BGP enabled but firewall has no TCP/179 allow rule.",
    )
    .with_suggestion("Add firewall rule to permit BGP sessions.")]
}

/// IPsec remote subnets that no static route points at.
pub fn vpn_route_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    config
        .vpn
        .ipsec_tunnels
        .iter()
        .enumerate()
        .filter_map(|(index, tunnel)| {
            let remote = tunnel.remote_subnet.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
            let routed = config.routing.static_routes.iter().any(|route| route.covers(remote));
            (!routed).then(|| {
                ValidationFinding::warn(
                    format!("vpn.ipsec.{index}.route"),
                    format!("vpn.ipsec_tunnels.{index}.remote_subnet"),
                    "IPsec remote subnet is not present in static routes.",
                )
                .with_suggestion("Add a static route for the remote subnet.")
            })
        })
        .collect()
}

/// NAT rules whose out-interface does not exist, or that rely on an uplink
/// the config does not define.
pub fn nat_interface_findings(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    let has_uplink = config.has_uplink();
    let mut out = Vec::new();

    for (index, rule) in config.nat.rules.iter().enumerate() {
        match rule.out_interface.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
            Some(name) => {
                if !config.interfaces.iter().any(|iface| iface.name == name) {
                    out.push(
                        ValidationFinding::warn(
                            format!("nat.rule.{index}.interface"),
                            format!("nat.rules.{index}.out_interface"),
                            "NAT rule references unknown interface.",
                        )
                        .with_suggestion("Ensure NAT out-interface exists on the device."),
                    );
                }
            }
            None if !has_uplink => out.push(
                ValidationFinding::warn(
                    format!("nat.rule.{index}.uplink"),
                    format!("nat.rules.{index}.out_interface"),
                    "NAT rule has no out-interface and no uplink interface defined.",
                )
                .with_suggestion("Set NAT out-interface or define uplink interface."),
            ),
            None => {}
        }
    }
    out
}
