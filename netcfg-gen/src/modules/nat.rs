//! Source and destination NAT.

use crate::findings::{RiskItem, RiskLevel, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{CanonicalConfig, Environment, NatRule, NatType, Protocol, Vendor};
use crate::utils::{acl_address, is_blank};

use super::{ConfigModule, ModuleKind};

const NAT_ACL: &str = "NETOPS-NAT";
const DEFAULT_OUTSIDE: &str = "GigabitEthernet0/0";

pub struct NatModule;

impl ConfigModule for NatModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Nat
    }

    fn title(&self) -> &'static str {
        "NAT"
    }

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding> {
        let mut out = Vec::new();
        for (index, rule) in config.nat.rules.iter().enumerate() {
            match rule.nat_type {
                None => out.push(
                    ValidationFinding::error(
                        format!("nat.rule.{index}"),
                        format!("nat.rules.{index}.type"),
                        "NAT rule type is required.",
                    )
                    .with_suggestion("Select SNAT/DNAT/Masquerade."),
                ),
                Some(NatType::Dnat) if is_blank(rule.to_address.as_deref()) => out.push(
                    ValidationFinding::error(
                        format!("nat.rule.{index}.toAddress"),
                        format!("nat.rules.{index}.to_address"),
                        "DNAT rule requires target address.",
                    )
                    .with_suggestion("Provide translated address."),
                ),
                Some(_) => {}
            }
        }
        out
    }

    fn risk(&self, config: &CanonicalConfig, _environment: Environment) -> Vec<RiskItem> {
        config
            .nat
            .rules
            .iter()
            .filter(|rule| {
                rule.nat_type == Some(NatType::Dnat)
                    && (is_blank(rule.dst_port.as_deref()) || is_blank(rule.dst.as_deref()))
            })
            .map(|rule| RiskItem::new(format!("nat.open.{}", rule.id), RiskLevel::Medium, "natOpen"))
            .collect()
    }

    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender {
        let rules = &config.nat.rules;
        let mut out = ModuleRender::empty();
        if rules.is_empty() {
            return out;
        }

        match vendor {
            Vendor::Mikrotik => {
                let commands = rules.iter().map(mikrotik_rule).collect();
                out.push_block(
                    "nat",
                    commands,
                    vec!["/ip firewall nat remove [find]".into()],
                    &["/ip firewall nat print"],
                );
            }
            Vendor::Cisco => {
                let mut commands = Vec::new();
                let mut rollback = Vec::new();
                for rule in rules {
                    let (lines, undo) = cisco_rule(rule);
                    commands.extend(lines);
                    rollback.extend(undo);
                }
                out.push_block("nat", commands, rollback, &["show ip nat translations"]);
            }
        }
        out
    }
}

fn value(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|v| !v.is_empty())
}

fn mikrotik_rule(rule: &NatRule) -> String {
    let chain = if rule.nat_type == Some(NatType::Dnat) { "dstnat" } else { "srcnat" };
    let mut parts = vec!["/ip firewall nat add".to_string(), format!("chain={chain}")];

    let matchers = [
        ("src-address", value(rule.src.as_deref())),
        ("dst-address", value(rule.dst.as_deref())),
        ("protocol", Protocol::specific(rule.protocol)),
        ("src-port", value(rule.src_port.as_deref())),
        ("dst-port", value(rule.dst_port.as_deref())),
        ("out-interface", value(rule.out_interface.as_deref())),
    ];
    parts.extend(matchers.iter().filter_map(|(key, v)| v.map(|v| format!("{key}={v}"))));

    match rule.nat_type {
        Some(NatType::Masquerade) => parts.push("action=masquerade".to_string()),
        other => {
            let action = if other == Some(NatType::Snat) { "src-nat" } else { "dst-nat" };
            parts.push(format!("action={action}"));
            if let Some(to) = value(rule.to_address.as_deref()) {
                parts.push(format!("to-addresses={to}"));
            }
            if let Some(port) = value(rule.to_port.as_deref()) {
                parts.push(format!("to-ports={port}"));
            }
        }
    }
    if let Some(comment) = value(rule.comment.as_deref()) {
        parts.push(format!("comment={comment}"));
    }
    parts.join(" ")
}

/// Returns `(commands, rollback)` for one rule.
fn cisco_rule(rule: &NatRule) -> (Vec<String>, Vec<String>) {
    let to_address = value(rule.to_address.as_deref());
    let dst_port = value(rule.dst_port.as_deref());

    match (rule.nat_type, to_address, dst_port) {
        (Some(NatType::Dnat), Some(to), Some(port)) => {
            let protocol = if rule.protocol == Some(Protocol::Udp) { "udp" } else { "tcp" };
            let dst = value(rule.dst.as_deref()).unwrap_or("any");
            let to_port = value(rule.to_port.as_deref()).unwrap_or(port);
            let statement = format!("ip nat inside source static {protocol} {dst} {port} {to} {to_port}");
            let undo = format!("no {statement}");
            (vec![statement], vec![undo])
        }
        (Some(NatType::Snat | NatType::Masquerade), _, _) => {
            let outside = value(rule.out_interface.as_deref()).unwrap_or(DEFAULT_OUTSIDE);
            let overload = format!("ip nat inside source list {NAT_ACL} interface {outside} overload");
            (
                vec![
                    format!("ip access-list standard {NAT_ACL}"),
                    format!(" permit {}", acl_address(rule.src.as_deref())),
                    overload.clone(),
                ],
                vec![format!("no {overload}"), format!("no ip access-list standard {NAT_ACL}")],
            )
        }
        _ => (vec![format!("! NAT rule {} requires manual review", rule.id)], Vec::new()),
    }
}
