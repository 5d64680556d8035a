//! Vendor-dispatched lint rules.
//!
//! Lint is a coarse pre-render gate, separate from module validation. Rule
//! ids are namespaced by vendor or area (`cisco.ssh.disabled`,
//! `services.ntp.missing`) rather than by field path.
//!
//! ## Rules
//!
//! | id | vendor | severity |
//! |----|--------|----------|
//! | `base.hostname.missing` | all | error |
//! | `cisco.ssh.disabled` | cisco | error |
//! | `cisco.ssh.v1` | cisco | warn |
//! | `mikrotik.ssh.disabled` | mikrotik | warn |
//! | `<vendor>.firewall.disabled` | all | warn |
//! | `services.ntp.missing` | all | warn |
//! | `services.syslog.missing` | all | info |
//! | `services.snmp.v3.users` | all | error |
//! | `nat.firewall.disabled` | all | warn |
//! | `vlans.empty` | all | info |

use tracing::debug;

use crate::findings::LintFinding;
use crate::schema::{CanonicalConfig, SnmpVersion, Vendor};

struct LintRule {
    /// `None` applies to every vendor.
    vendor: Option<Vendor>,
    check: fn(&CanonicalConfig, Vendor) -> Option<LintFinding>,
}

const RULES: &[LintRule] = &[
    LintRule {
        vendor: None,
        check: hostname_missing,
    },
    LintRule {
        vendor: Some(Vendor::Cisco),
        check: cisco_ssh_disabled,
    },
    LintRule {
        vendor: Some(Vendor::Cisco),
        check: cisco_ssh_v1,
    },
    LintRule {
        vendor: Some(Vendor::Mikrotik),
        check: mikrotik_ssh_disabled,
    },
    LintRule {
        vendor: None,
        check: firewall_disabled,
    },
    LintRule {
        vendor: None,
        check: ntp_missing,
    },
    LintRule {
        vendor: None,
        check: syslog_missing,
    },
    LintRule {
        vendor: None,
        check: snmp_v3_without_users,
    },
    LintRule {
        vendor: None,
        check: nat_without_firewall,
    },
    LintRule {
        vendor: None,
        check: vlans_empty,
    },
];

/// Run every lint rule that applies to `vendor`.
pub fn lint_config(config: &CanonicalConfig, vendor: Vendor) -> Vec<LintFinding> {
    let findings: Vec<LintFinding> = RULES
        .iter()
        .filter(|rule| rule.vendor.map_or(true, |v| v == vendor))
        .filter_map(|rule| (rule.check)(config, vendor))
        .collect();
    debug!(vendor = %vendor, count = findings.len(), "linted config");
    findings
}

fn hostname_missing(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    config.hostname.trim().is_empty().then(|| {
        LintFinding::error("base.hostname.missing", "hostname", "Hostname is not set.")
            .with_suggestion("Set a device hostname.")
    })
}

fn cisco_ssh_disabled(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    (!config.services.ssh.enabled).then(|| {
        LintFinding::error("cisco.ssh.disabled", "services.ssh.enabled", "SSH is disabled on a Cisco device.")
            .with_suggestion("Enable SSH and disable telnet for remote management.")
    })
}

fn cisco_ssh_v1(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    let ssh = &config.services.ssh;
    (ssh.enabled && ssh.version != 2).then(|| {
        LintFinding::warn("cisco.ssh.v1", "services.ssh.version", "SSH version 1 is insecure.")
            .with_suggestion("Use ip ssh version 2.")
    })
}

fn mikrotik_ssh_disabled(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    (!config.services.ssh.enabled).then(|| {
        LintFinding::warn("mikrotik.ssh.disabled", "services.ssh.enabled", "SSH service is disabled.")
            .with_suggestion("Enable the SSH service for secure management.")
    })
}

fn firewall_disabled(config: &CanonicalConfig, vendor: Vendor) -> Option<LintFinding> {
    (!config.firewall.enabled).then(|| {
        LintFinding::warn(
            format!("{vendor}.firewall.disabled"),
            "firewall.enabled",
            "Baseline firewall is disabled.",
        )
        .with_suggestion("Enable the baseline input firewall.")
    })
}

fn ntp_missing(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    config.services.ntp_servers.is_empty().then(|| {
        LintFinding::warn("services.ntp.missing", "services.ntp_servers", "No NTP servers configured.")
            .with_suggestion("Add at least one NTP server so logs have accurate timestamps.")
    })
}

fn syslog_missing(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    config.services.syslog_servers.is_empty().then(|| {
        LintFinding::info("services.syslog.missing", "services.syslog_servers", "No remote syslog server configured.")
    })
}

fn snmp_v3_without_users(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    let services = &config.services;
    (services.snmp_version == Some(SnmpVersion::V3) && services.snmp_v3_users.is_empty()).then(|| {
        LintFinding::error(
            "services.snmp.v3.users",
            "services.snmp_v3_users",
            "SNMPv3 selected but no users defined.",
        )
        .with_suggestion("Add an SNMPv3 user or switch to v2c.")
    })
}

fn nat_without_firewall(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    (!config.nat.rules.is_empty() && !config.firewall.enabled).then(|| {
        LintFinding::warn(
            "nat.firewall.disabled",
            "firewall.enabled",
            "NAT rules are configured while the firewall is disabled.",
        )
        .with_suggestion("Enable the firewall to protect translated traffic.")
    })
}

fn vlans_empty(config: &CanonicalConfig, _vendor: Vendor) -> Option<LintFinding> {
    config
        .vlans
        .is_empty()
        .then(|| LintFinding::info("vlans.empty", "vlans", "No VLANs defined."))
}

#[cfg(test)]
mod tests {
    use super::lint_config;
    use crate::findings::Severity;
    use crate::schema::{default_config, CanonicalConfig, NatRule, SnmpVersion, Vendor, Vlan};

    fn ids(config: &CanonicalConfig, vendor: Vendor) -> Vec<String> {
        lint_config(config, vendor).into_iter().map(|f| f.id).collect()
    }

    fn tidy() -> CanonicalConfig {
        let mut config = default_config();
        config.hostname = "core-01".into();
        config.services.ntp_servers = vec!["10.0.0.1".into()];
        config.services.syslog_servers = vec!["10.0.0.2".into()];
        config.vlans = vec![Vlan {
            id: 10,
            ..Vlan::default()
        }];
        config
    }

    #[test]
    fn tidy_config_is_clean_for_both_vendors() {
        for vendor in Vendor::ALL {
            assert!(ids(&tidy(), vendor).is_empty(), "{vendor}");
        }
    }

    #[test]
    fn default_config_reports_neutral_rules() {
        let found = ids(&default_config(), Vendor::Mikrotik);
        assert_eq!(
            found,
            ["base.hostname.missing", "services.ntp.missing", "services.syslog.missing", "vlans.empty"]
        );
    }

    #[test]
    fn ssh_rules_branch_by_vendor() {
        let mut config = tidy();
        config.services.ssh.enabled = false;
        assert_eq!(ids(&config, Vendor::Cisco), ["cisco.ssh.disabled"]);
        assert_eq!(ids(&config, Vendor::Mikrotik), ["mikrotik.ssh.disabled"]);

        config.services.ssh.enabled = true;
        config.services.ssh.version = 1;
        assert_eq!(ids(&config, Vendor::Cisco), ["cisco.ssh.v1"]);
        assert!(ids(&config, Vendor::Mikrotik).is_empty());
    }

    #[test]
    fn firewall_id_carries_vendor() {
        let mut config = tidy();
        config.firewall.enabled = false;
        config.nat.rules = vec![NatRule::default()];
        assert_eq!(ids(&config, Vendor::Cisco), ["cisco.firewall.disabled", "nat.firewall.disabled"]);
        assert_eq!(ids(&config, Vendor::Mikrotik), ["mikrotik.firewall.disabled", "nat.firewall.disabled"]);
    }

    #[test]
    fn snmp_v3_without_users_is_error() {
        let mut config = tidy();
        config.services.snmp_version = Some(SnmpVersion::V3);
        let findings = lint_config(&config, Vendor::Cisco);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "services.snmp.v3.users");
        assert_eq!(findings[0].severity, Severity::Error);
    }
}
