//! Per-target bandwidth queues.
//!
//! MikroTik gets one simple queue per entry. Cisco gets a class-map and a
//! policing policy-map per entry; the policy still has to be attached to an
//! interface with `service-policy`.

use crate::findings::{RiskItem, RiskLevel, ValidationFinding};
use crate::render::ModuleRender;
use crate::schema::{CanonicalConfig, Environment, QosQueue, Vendor};
use crate::utils::{is_blank, parse_rate};

use super::{ConfigModule, ModuleKind};

pub struct QosModule;

impl ConfigModule for QosModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Qos
    }

    fn title(&self) -> &'static str {
        "QoS"
    }

    fn validate(&self, config: &CanonicalConfig) -> Vec<ValidationFinding> {
        let mut out = Vec::new();
        for (index, queue) in config.qos.queues.iter().enumerate() {
            if queue.name.trim().is_empty() || queue.target.trim().is_empty() {
                out.push(
                    ValidationFinding::error(
                        format!("qos.queue.{index}"),
                        format!("qos.queues.{index}"),
                        "QoS queue requires name and target.",
                    )
                    .with_suggestion("Name each queue and set the address or interface it shapes."),
                );
            }
            if is_blank(queue.max_limit.as_deref()) {
                out.push(
                    ValidationFinding::warn(
                        format!("qos.queue.{index}.maxLimit"),
                        format!("qos.queues.{index}.max_limit"),
                        "QoS queue has no max limit.",
                    )
                    .with_suggestion("Set a max limit such as 10M/10M."),
                );
            } else if queue.max_limit.as_deref().and_then(parse_rate).is_none() {
                out.push(
                    ValidationFinding::warn(
                        format!("qos.queue.{index}.maxLimit"),
                        format!("qos.queues.{index}.max_limit"),
                        "QoS queue max limit cannot be parsed as a rate.",
                    )
                    .with_suggestion("Use a rate such as 512k, 10M or 1G."),
                );
            }
        }
        out
    }

    fn risk(&self, config: &CanonicalConfig, environment: Environment) -> Vec<RiskItem> {
        if !environment.is_prod() {
            return Vec::new();
        }
        config
            .qos
            .queues
            .iter()
            .filter(|queue| is_blank(queue.max_limit.as_deref()))
            .map(|queue| RiskItem::new(format!("qos.unbounded.{}", queue.id), RiskLevel::Low, "qosUnbounded"))
            .collect()
    }

    fn render(&self, config: &CanonicalConfig, vendor: Vendor) -> ModuleRender {
        let mut commands = Vec::new();
        let mut rollback = Vec::new();
        let renderable = config
            .qos
            .queues
            .iter()
            .filter(|q| !q.name.trim().is_empty() && !q.target.trim().is_empty());

        for queue in renderable {
            let (lines, undo) = match vendor {
                Vendor::Mikrotik => mikrotik_queue(queue),
                Vendor::Cisco => cisco_queue(queue),
            };
            commands.extend(lines);
            rollback.extend(undo);
        }

        let verify = match vendor {
            Vendor::Mikrotik => "/queue simple print",
            Vendor::Cisco => "show policy-map",
        };
        let mut out = ModuleRender::empty();
        out.push_block("qos", commands, rollback, &[verify]);
        out
    }
}

fn mikrotik_queue(queue: &QosQueue) -> (Vec<String>, Vec<String>) {
    let mut line = format!("/queue simple add name={} target={}", queue.name, queue.target);
    if let Some(limit) = queue.max_limit.as_deref().filter(|l| !l.trim().is_empty()) {
        line.push_str(&format!(" max-limit={}", limit.trim()));
    }
    if let Some(priority) = queue.priority {
        line.push_str(&format!(" priority={priority}"));
    }
    if let Some(comment) = queue.comment.as_deref().filter(|c| !c.is_empty()) {
        line.push_str(&format!(" comment=\"{comment}\""));
    }
    (vec![line], vec![format!("/queue simple remove [find name={}]", queue.name)])
}

fn cisco_queue(queue: &QosQueue) -> (Vec<String>, Vec<String>) {
    let class = format!("QOS-{}", queue.name);
    let mut lines = vec![
        format!("class-map match-any {class}"),
        format!(" description target {}", queue.target),
        " match any".to_string(),
        format!("policy-map {class}"),
        format!(" class {class}"),
    ];
    match queue.max_limit.as_deref().and_then(parse_rate) {
        Some(bps) => lines.push(format!("  police {bps} conform-action transmit exceed-action drop")),
        None => lines.push(format!("! queue {} has no usable max limit", queue.name)),
    }
    if let Some(priority) = queue.priority {
        lines.push(format!("  set dscp cs{}", priority.min(7)));
    }
    (lines, vec![format!("no policy-map {class}"), format!("no class-map {class}")])
}

#[cfg(test)]
mod tests {
    use super::QosModule;
    use crate::findings::RiskLevel;
    use crate::modules::test_support::assert_vendor_syntax;
    use crate::modules::ConfigModule;
    use crate::schema::{default_config, CanonicalConfig, Environment, QosQueue, Vendor};

    fn queue(id: &str, limit: Option<&str>) -> QosQueue {
        QosQueue {
            id: id.into(),
            name: format!("q-{id}"),
            target: "10.0.10.0/24".into(),
            max_limit: limit.map(Into::into),
            priority: None,
            comment: None,
        }
    }

    fn with_queues(queues: Vec<QosQueue>) -> CanonicalConfig {
        let mut config = default_config();
        config.qos.queues = queues;
        config
    }

    #[test]
    fn validates_required_fields_and_limit() {
        let mut nameless = queue("b", Some("5M"));
        nameless.name = String::new();
        let ids: Vec<String> = QosModule
            .validate(&with_queues(vec![queue("a", None), nameless]))
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, ["qos.queue.0.maxLimit", "qos.queue.1"]);
    }

    #[test]
    fn unbounded_queue_is_low_risk_only_in_prod() {
        let config = with_queues(vec![queue("a", None), queue("b", Some("10M"))]);
        assert!(QosModule.risk(&config, Environment::Staging).is_empty());
        let items = QosModule.risk(&config, Environment::Prod);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "qos.unbounded.a");
        assert_eq!(items[0].level, RiskLevel::Low);
    }

    #[test]
    fn renders_simple_queues_on_mikrotik() {
        let mut guests = queue("g", Some("10M/20M"));
        guests.priority = Some(8);
        let render = QosModule.render(&with_queues(vec![guests]), Vendor::Mikrotik);
        assert_vendor_syntax(&render, Vendor::Mikrotik);
        assert_eq!(
            render.sections[0].commands,
            ["/queue simple add name=q-g target=10.0.10.0/24 max-limit=10M/20M priority=8"]
        );
        assert_eq!(render.rollback_commands, ["/queue simple remove [find name=q-g]"]);
    }

    #[test]
    fn renders_policers_on_cisco() {
        let render = QosModule.render(&with_queues(vec![queue("g", Some("10M")), queue("h", None)]), Vendor::Cisco);
        assert_vendor_syntax(&render, Vendor::Cisco);
        let commands = &render.sections[0].commands;
        assert_eq!(commands[0], "class-map match-any QOS-q-g");
        assert!(commands.contains(&"  police 10000000 conform-action transmit exceed-action drop".to_string()));
        assert!(commands.contains(&"! queue q-h has no usable max limit".to_string()));
        assert_eq!(render.verify_commands, ["show policy-map"]);
    }

    #[test]
    fn oversized_or_garbled_limit_warns_and_renders_comment() {
        let config = with_queues(vec![queue("big", Some("99999999999G")), queue("odd", Some("fast"))]);
        let ids: Vec<String> = QosModule.validate(&config).into_iter().map(|f| f.id).collect();
        assert_eq!(ids, ["qos.queue.0.maxLimit", "qos.queue.1.maxLimit"]);

        let render = QosModule.render(&config, Vendor::Cisco);
        let commands = &render.sections[0].commands;
        assert!(commands.contains(&"! queue q-big has no usable max limit".to_string()));
        assert!(commands.contains(&"! queue q-odd has no usable max limit".to_string()));
    }
}
