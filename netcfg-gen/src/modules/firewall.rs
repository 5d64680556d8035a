//! Filter rules beyond the management baseline.

use crate::findings::{RiskItem, RiskLevel, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{CanonicalConfig, Environment, FirewallAction, FirewallRule, Protocol, Vendor};
use crate::utils::acl_address;

use super::{ConfigModule, ModuleKind};

const ACL_NAME: &str = "NETOPS-FW";

pub struct FirewallModule;

impl ConfigModule for FirewallModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Firewall
    }

    fn title(&self) -> &'static str {
        "Firewall"
    }

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding> {
        config
            .firewall
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.chain.is_none() || rule.action.is_none())
            .map(|(index, _)| {
                ValidationFinding::error(
                    format!("firewall.rule.{index}"),
                    format!("firewall.rules.{index}"),
                    "Firewall rule missing chain or action.",
                )
                .with_suggestion("Select chain and action for each rule.")
            })
            .collect()
    }

    fn risk(&self, config: &CanonicalConfig, _environment: Environment) -> Vec<RiskItem> {
        config
            .firewall
            .rules
            .iter()
            .filter(|rule| rule.is_accept_any_any())
            .map(|rule| {
                RiskItem::new(format!("firewall.allowAny.{}", rule.id), RiskLevel::High, "firewallAllowAny")
            })
            .collect()
    }

    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender {
        let rules = ordered_rules(&config.firewall.rules);
        let mut out = ModuleRender::empty();
        if rules.is_empty() {
            return out;
        }

        match vendor {
            Vendor::Mikrotik => {
                let commands = rules.iter().filter_map(|rule| mikrotik_rule(rule)).collect();
                out.push_block(
                    "firewall-rules",
                    commands,
                    vec!["/ip firewall filter remove [find]".into()],
                    &["/ip firewall filter print"],
                );
            }
            Vendor::Cisco => {
                let entries: Vec<String> = rules.iter().flat_map(|rule| cisco_rule(rule)).collect();
                let mut commands = Vec::new();
                if !entries.is_empty() {
                    commands.push(format!("ip access-list extended {ACL_NAME}"));
                    commands.extend(entries);
                }
                out.push_block(
                    "firewall-rules",
                    commands,
                    vec![format!("no ip access-list extended {ACL_NAME}")],
                    &["show access-lists"],
                );
            }
        }
        out
    }
}

/// Rules in evaluation order: explicit `order` ascending, unordered rules last,
/// ties keep their list position.
fn ordered_rules(rules: &[FirewallRule]) -> Vec<&FirewallRule> {
    let mut ordered: Vec<&FirewallRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.order.unwrap_or(u32::MAX));
    ordered
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Rules without chain or action are skipped.
fn mikrotik_rule(rule: &FirewallRule) -> Option<String> {
    let chain = rule.chain?;
    let action = rule.action?;

    let mut parts = vec!["/ip firewall filter add".to_string(), format!("chain={}", chain.as_str())];
    if let Some(src) = non_empty(rule.src.as_deref()) {
        parts.push(format!("src-address={src}"));
    }
    if let Some(dst) = non_empty(rule.dst.as_deref()) {
        parts.push(format!("dst-address={dst}"));
    }
    if let Some(protocol) = Protocol::specific(rule.protocol) {
        parts.push(format!("protocol={protocol}"));
    }
    if let Some(port) = non_empty(rule.src_port.as_deref()) {
        parts.push(format!("src-port={port}"));
    }
    if let Some(port) = non_empty(rule.dst_port.as_deref()) {
        parts.push(format!("dst-port={port}"));
    }
    parts.push(format!("action={}", action.as_str()));
    if let Some(comment) = non_empty(rule.comment.as_deref()) {
        parts.push(format!("comment={comment}"));
    }
    Some(parts.join(" "))
}

fn cisco_rule(rule: &FirewallRule) -> Vec<String> {
    let (Some(_), Some(action)) = (rule.chain, rule.action) else {
        return Vec::new();
    };
    let verb = match action {
        FirewallAction::Accept | FirewallAction::Log => "permit",
        FirewallAction::Drop | FirewallAction::Reject => "deny",
    };
    let protocol = Protocol::specific(rule.protocol).unwrap_or("ip");
    let src = acl_address(rule.src.as_deref());
    let dst = acl_address(rule.dst.as_deref());
    let port = match non_empty(rule.dst_port.as_deref()) {
        Some(port) if matches!(protocol, "tcp" | "udp") => format!(" eq {port}"),
        _ => String::new(),
    };

    let mut lines = Vec::new();
    if let Some(comment) = non_empty(rule.comment.as_deref()) {
        lines.push(format!(" remark {comment}"));
    }
    let entry = format!(" {verb} {protocol} {src} {dst}{port}");
    if action == FirewallAction::Log {
        lines.push(entry.clone());
        lines.push(format!("{entry} log"));
    } else {
        lines.push(entry);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::FirewallModule;
    use crate::findings::RiskLevel;
    use crate::modules::test_support::assert_vendor_syntax;
    use crate::modules::ConfigModule;
    use crate::schema::{default_config, CanonicalConfig, Chain, Environment, FirewallAction, FirewallRule, Protocol, Vendor};

    fn rule(id: &str, action: FirewallAction) -> FirewallRule {
        FirewallRule {
            id: id.into(),
            chain: Some(Chain::Input),
            action: Some(action),
            ..FirewallRule::default()
        }
    }

    fn with_rules(rules: Vec<FirewallRule>) -> CanonicalConfig {
        let mut config = default_config();
        config.firewall.rules = rules;
        config
    }

    #[test]
    fn any_any_accept_is_high_risk() {
        let mut scoped = rule("ssh", FirewallAction::Accept);
        scoped.protocol = Some(Protocol::Tcp);
        scoped.dst_port = Some("22".into());
        let mut any_proto = rule("open", FirewallAction::Accept);
        any_proto.protocol = Some(Protocol::Any);
        let config = with_rules(vec![scoped, any_proto, rule("deny", FirewallAction::Drop)]);

        let items = FirewallModule.risk(&config, Environment::Dev);
        assert_eq!(items.len(), 1);
        assert!(items[0].id.starts_with("firewall.allowAny."));
        assert_eq!(items[0].id, "firewall.allowAny.open");
        assert_eq!(items[0].level, RiskLevel::High);
    }

    #[test]
    fn rule_without_action_is_reported_and_skipped() {
        let mut broken = rule("broken", FirewallAction::Accept);
        broken.action = None;
        let config = with_rules(vec![rule("ok", FirewallAction::Drop), broken]);

        let findings = FirewallModule.validate(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "firewall.rule.1");

        let render = FirewallModule.render(&config, Vendor::Mikrotik);
        assert_eq!(render.sections[0].commands, ["/ip firewall filter add chain=input action=drop"]);
    }

    #[test]
    fn cisco_log_action_duplicates_entry() {
        let mut web = rule("web", FirewallAction::Log);
        web.protocol = Some(Protocol::Tcp);
        web.src = Some("10.0.0.0/24".into());
        web.dst = Some("10.0.1.5".into());
        web.dst_port = Some("443".into());
        web.comment = Some("web".into());
        let render = FirewallModule.render(&with_rules(vec![web]), Vendor::Cisco);
        assert_vendor_syntax(&render, Vendor::Cisco);

        assert_eq!(
            render.sections[0].commands,
            [
                "ip access-list extended NETOPS-FW",
                " remark web",
                " permit tcp 10.0.0.0 0.0.0.255 host 10.0.1.5 eq 443",
                " permit tcp 10.0.0.0 0.0.0.255 host 10.0.1.5 eq 443 log",
            ]
        );
        assert_eq!(render.rollback_commands, ["no ip access-list extended NETOPS-FW"]);
    }

    #[test]
    fn mikrotik_rules_follow_order_field() {
        let mut late = rule("late", FirewallAction::Drop);
        late.order = Some(20);
        let mut early = rule("early", FirewallAction::Accept);
        early.order = Some(10);
        early.protocol = Some(Protocol::Udp);
        early.dst_port = Some("53".into());
        let render = FirewallModule.render(&with_rules(vec![late, early]), Vendor::Mikrotik);
        assert_vendor_syntax(&render, Vendor::Mikrotik);

        assert_eq!(
            render.sections[0].commands,
            [
                "/ip firewall filter add chain=input protocol=udp dst-port=53 action=accept",
                "/ip firewall filter add chain=input action=drop",
            ]
        );
        assert_eq!(render.verify_commands, ["/ip firewall filter print"]);
    }

    #[test]
    fn only_invalid_rules_render_nothing() {
        let mut chainless = rule("chainless", FirewallAction::Accept);
        chainless.chain = None;
        let config = with_rules(vec![chainless]);
        for vendor in Vendor::ALL {
            let render = FirewallModule.render(&config, vendor);
            assert!(render.is_empty(), "{vendor}");
        }
    }
}
