//! Syslog, SNMP and flow export.

use crate::findings::{RiskItem, RiskLevel, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{AuthProtocol, CanonicalConfig, Environment, PrivProtocol, ServicesConfig, SnmpVersion, Vendor};
use crate::utils::is_blank;

use super::{ConfigModule, ModuleKind};

const NETFLOW_PORT: u16 = 2055;
const NETFLOW_VERSION: u8 = 9;
const SFLOW_PORT: u16 = 6343;
const SNMP_GROUP: &str = "NETOPS";

pub struct MonitoringModule;

impl ConfigModule for MonitoringModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Monitoring
    }

    fn title(&self) -> &'static str {
        "Monitoring"
    }

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding> {
        let services = &config.services;
        let mut out = Vec::new();

        if services.snmp_version == Some(SnmpVersion::V3) && services.snmp_v3_users.is_empty() {
            out.push(
                ValidationFinding::error(
                    "monitoring.snmp.v3.users",
                    "services.snmp_v3_users",
                    "SNMP v3 enabled without any users.",
                )
                .with_suggestion("Add at least one SNMPv3 user."),
            );
        }
        if services.netflow.enabled && is_blank(services.netflow.collector.as_deref()) {
            out.push(
                ValidationFinding::error(
                    "monitoring.netflow.collector",
                    "services.netflow.collector",
                    "NetFlow enabled without collector.",
                )
                .with_suggestion("Provide a NetFlow collector address."),
            );
        }
        if services.sflow.enabled && is_blank(services.sflow.collector.as_deref()) {
            out.push(
                ValidationFinding::error(
                    "monitoring.sflow.collector",
                    "services.sflow.collector",
                    "sFlow enabled without collector.",
                )
                .with_suggestion("Provide an sFlow collector address."),
            );
        }
        out
    }

    fn risk(&self, config: &CanonicalConfig, _environment: Environment) -> Vec<RiskItem> {
        let public = config
            .services
            .community()
            .is_some_and(|c| c.eq_ignore_ascii_case("public"));
        if public {
            vec![RiskItem::new("monitoring.snmp.public", RiskLevel::Medium, "snmpPublic")]
        } else {
            Vec::new()
        }
    }

    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender {
        let (commands, rollback, verify) = match vendor {
            Vendor::Mikrotik => {
                let (c, r) = render_mikrotik(&config.services);
                (c, r, ["/snmp print", "/system logging print"])
            }
            Vendor::Cisco => {
                let (c, r) = render_cisco(&config.services);
                (c, r, ["show logging", "show snmp community"])
            }
        };
        let mut out = ModuleRender::empty();
        out.push_block("monitoring", commands, rollback, &verify);
        out
    }
}

fn collector(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|c| !c.is_empty())
}

fn render_mikrotik(services: &ServicesConfig) -> (Vec<String>, Vec<String>) {
    let mut commands = Vec::new();
    let mut rollback = Vec::new();

    if let Some(server) = services.syslog_servers.first() {
        commands.push(format!("/system logging action set remote remote={server}"));
        commands.push("/system logging add topics=info action=remote".to_string());
        rollback.push("/system logging remove [find action=remote]".to_string());
    }

    if services.snmp_v3_active() {
        commands.push("/snmp set enabled=yes".to_string());
        for user in &services.snmp_v3_users {
            commands.push(format!("/snmp community add name={} security=private", user.username));
            rollback.push(format!("/snmp community remove [find name={}]", user.username));
        }
        rollback.push("/snmp set enabled=no".to_string());
    } else if let Some(community) = services.community() {
        commands.push("/snmp set enabled=yes".to_string());
        commands.push(format!("/snmp community set [find default=yes] name={community}"));
        rollback.push("/snmp set enabled=no".to_string());
    }

    if let (true, Some(target)) = (services.netflow.enabled, collector(services.netflow.collector.as_deref())) {
        let port = services.netflow.port.unwrap_or(NETFLOW_PORT);
        commands.push("/ip traffic-flow set enabled=yes".to_string());
        commands.push(format!("/ip traffic-flow target add dst-address={target} port={port}"));
        rollback.push("/ip traffic-flow set enabled=no".to_string());
    }

    // RouterOS has no sFlow agent; sampled traffic is streamed from the sniffer.
    if let (true, Some(target)) = (services.sflow.enabled, collector(services.sflow.collector.as_deref())) {
        let port = services.sflow.port.unwrap_or(SFLOW_PORT);
        commands.push(format!("/tool sniffer set streaming-enabled=yes streaming-server={target}:{port}"));
        rollback.push("/tool sniffer set streaming-enabled=no".to_string());
    }

    (commands, rollback)
}

fn render_cisco(services: &ServicesConfig) -> (Vec<String>, Vec<String>) {
    let mut commands = Vec::new();
    let mut rollback = Vec::new();

    if !services.syslog_servers.is_empty() {
        for server in &services.syslog_servers {
            commands.push(format!("logging host {server}"));
            rollback.push(format!("no logging host {server}"));
        }
        commands.push("logging trap informational".to_string());
    }

    if services.snmp_v3_active() {
        for user in &services.snmp_v3_users {
            let auth = user.auth_protocol.unwrap_or(AuthProtocol::Sha).as_str();
            let auth_pass = user.auth_password.as_deref().filter(|p| !p.is_empty()).unwrap_or("<auth>");
            let privacy = user.priv_protocol.unwrap_or(PrivProtocol::Aes).as_str();
            let priv_pass = user.priv_password.as_deref().filter(|p| !p.is_empty()).unwrap_or("<priv>");
            commands.push(format!(
                "snmp-server user {} {SNMP_GROUP} v3 auth {auth} {auth_pass} priv {privacy} {priv_pass}",
                user.username
            ));
            rollback.push(format!("no snmp-server user {} {SNMP_GROUP} v3", user.username));
        }
    } else if let Some(community) = services.community() {
        commands.push(format!("snmp-server community {community} RO"));
        rollback.push(format!("no snmp-server community {community}"));
    }

    if let (true, Some(target)) = (services.netflow.enabled, collector(services.netflow.collector.as_deref())) {
        let port = services.netflow.port.unwrap_or(NETFLOW_PORT);
        let version = services.netflow.version.unwrap_or(NETFLOW_VERSION);
        commands.push(format!("ip flow-export destination {target} {port}"));
        commands.push(format!("ip flow-export version {version}"));
        rollback.push(format!("no ip flow-export destination {target} {port}"));
    }

    if let (true, Some(target)) = (services.sflow.enabled, collector(services.sflow.collector.as_deref())) {
        commands.push(format!("! sFlow export to {target} is not supported on Cisco IOS; use NetFlow."));
    }

    (commands, rollback)
}

#[cfg(test)]
mod tests {
    use super::MonitoringModule;
    use crate::findings::RiskLevel;
    use crate::modules::test_support::assert_vendor_syntax;
    use crate::modules::ConfigModule;
    use crate::schema::{default_config, CanonicalConfig, Environment, SnmpV3User, SnmpVersion, Vendor};

    fn monitored() -> CanonicalConfig {
        let mut config = default_config();
        config.services.syslog_servers = vec!["10.0.0.50".into(), "10.0.0.51".into()];
        config.services.snmp_community = Some("netops-ro".into());
        config.services.netflow.enabled = true;
        config.services.netflow.collector = Some("10.0.0.60".into());
        config.services.sflow.enabled = true;
        config.services.sflow.collector = Some("10.0.0.61".into());
        config
    }

    fn v3_user() -> SnmpV3User {
        SnmpV3User {
            id: "u1".into(),
            username: "nms".into(),
            auth_password: Some("authpass".into()),
            ..SnmpV3User::default()
        }
    }

    #[test]
    fn validates_snmp_users_and_collectors() {
        let mut config = default_config();
        config.services.snmp_version = Some(SnmpVersion::V3);
        config.services.netflow.enabled = true;
        config.services.sflow.enabled = true;
        config.services.sflow.collector = Some("  ".into());
        let ids: Vec<String> = MonitoringModule.validate(&config).into_iter().map(|f| f.id).collect();
        assert_eq!(
            ids,
            ["monitoring.snmp.v3.users", "monitoring.netflow.collector", "monitoring.sflow.collector"]
        );
    }

    #[test]
    fn public_community_is_medium_risk() {
        let mut config = default_config();
        config.services.snmp_community = Some("Public".into());
        let items = MonitoringModule.risk(&config, Environment::Dev);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "monitoring.snmp.public");
        assert_eq!(items[0].level, RiskLevel::Medium);
    }

    #[test]
    fn renders_mikrotik_exports() {
        let render = MonitoringModule.render(&monitored(), Vendor::Mikrotik);
        assert_vendor_syntax(&render, Vendor::Mikrotik);
        assert_eq!(
            render.sections[0].commands,
            [
                "/system logging action set remote remote=10.0.0.50",
                "/system logging add topics=info action=remote",
                "/snmp set enabled=yes",
                "/snmp community set [find default=yes] name=netops-ro",
                "/ip traffic-flow set enabled=yes",
                "/ip traffic-flow target add dst-address=10.0.0.60 port=2055",
                "/tool sniffer set streaming-enabled=yes streaming-server=10.0.0.61:6343",
            ]
        );
    }

    #[test]
    fn snmp_v3_users_take_precedence_over_community() {
        let mut config = monitored();
        config.services.snmp_version = Some(SnmpVersion::V3);
        config.services.snmp_v3_users = vec![v3_user()];
        let render = MonitoringModule.render(&config, Vendor::Cisco);
        assert_vendor_syntax(&render, Vendor::Cisco);

        let commands = &render.sections[0].commands;
        assert!(commands.contains(&"snmp-server user nms NETOPS v3 auth sha authpass priv aes <priv>".to_string()));
        assert!(commands.iter().all(|c| !c.starts_with("snmp-server community")));
        assert!(commands.contains(&"logging host 10.0.0.51".to_string()));
        assert!(commands.contains(&"ip flow-export version 9".to_string()));
        assert_eq!(render.verify_commands, ["show logging", "show snmp community"]);
    }
}
