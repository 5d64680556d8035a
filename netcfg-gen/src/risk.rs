//! Reduce module risk items to one level.

use serde::{Deserialize, Serialize};

use crate::findings::{RiskItem, RiskLevel};
use crate::registry::risk_modules;
use crate::schema::{CanonicalConfig, Environment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub items: Vec<RiskItem>,
}

/// Collect risk items from every module and take the highest level.
pub fn evaluate_risk(config: &CanonicalConfig, environment: Environment) -> RiskAssessment {
    let items = risk_modules(config, environment);
    RiskAssessment {
        level: reduce_level(&items),
        items,
    }
}

/// Highest level among `items`; `LOW` when empty.
pub fn reduce_level(items: &[RiskItem]) -> RiskLevel {
    items.iter().map(|item| item.level).max().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{evaluate_risk, reduce_level};
    use crate::findings::{RiskItem, RiskLevel};
    use crate::schema::{default_config, Chain, Environment, FirewallAction, FirewallRule};

    fn item(level: RiskLevel) -> RiskItem {
        RiskItem::new(format!("test.{level}"), level, "test")
    }

    #[test]
    fn empty_is_low() {
        assert_eq!(reduce_level(&[]), RiskLevel::Low);
    }

    #[test]
    fn any_high_item_makes_level_high() {
        let bases = [
            vec![],
            vec![item(RiskLevel::Low)],
            vec![item(RiskLevel::Medium), item(RiskLevel::Low)],
            vec![item(RiskLevel::High)],
        ];
        for mut items in bases {
            items.push(item(RiskLevel::High));
            assert_eq!(reduce_level(&items), RiskLevel::High);
        }
        assert_eq!(
            reduce_level(&[item(RiskLevel::Low), item(RiskLevel::Medium)]),
            RiskLevel::Medium
        );
    }

    #[test]
    fn any_any_firewall_rule_scores_high() {
        let mut config = default_config();
        config.firewall.allow_mgmt_from = Some("10.0.99.0/24".into());
        config.services.ssh.allow_password = false;
        config.services.ntp_servers = vec!["10.0.0.1".into()];
        assert_eq!(evaluate_risk(&config, Environment::Prod).level, RiskLevel::Low);

        config.firewall.rules = vec![FirewallRule {
            id: "r1".into(),
            chain: Some(Chain::Input),
            action: Some(FirewallAction::Accept),
            ..FirewallRule::default()
        }];
        let assessment = evaluate_risk(&config, Environment::Prod);
        assert_eq!(assessment.level, RiskLevel::High);
        assert!(assessment
            .items
            .iter()
            .any(|i| i.id.starts_with("firewall.allowAny.") && i.level == RiskLevel::High));
    }
}
