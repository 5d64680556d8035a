//! Render, lint, diff and push as one service.
//!
//! Generation and push prefer a remote config service. Any [`RemoteError`]
//! is logged and replaced by a local result through [`or_local`], so these
//! calls always return something a human can review. Diffing is always local.

mod remote;

use std::sync::Arc;

use cmd_diff_core::{diff_commands, diff_commands_detailed, format_summary, DiffLine};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::findings::LintFinding;
use crate::lint::lint_config;
use crate::registry::render_config;
use crate::render::RenderResult;
use crate::schema::{CanonicalConfig, Environment, Vendor};
use crate::settings::{PushSettings, Settings};

pub use remote::{HttpRemote, RemoteConfigService, RemoteError};

/// Rendered commands plus lint findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(flatten)]
    pub render: RenderResult,
    #[serde(default)]
    pub lint_findings: Vec<LintFinding>,
}

/// A request to apply commands to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub device_id: String,
    pub vendor: Vendor,
    pub commands: Vec<String>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushStatus {
    #[serde(alias = "success")]
    Ok,
    Partial,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushResult {
    pub status: PushStatus,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Detailed and textual diff of two command lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDiff {
    pub lines: Vec<DiffLine>,
    pub text: String,
    pub summary: String,
}

/// Replace a failed remote result with a locally computed one.
///
/// The error is logged; `local` receives it so the fallback can mention it.
pub fn or_local<T>(result: Result<T, RemoteError>, operation: &str, local: impl FnOnce(&RemoteError) -> T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            match err {
                RemoteError::NotConfigured => debug!(operation, "no remote, computing locally"),
                _ => warn!(operation, error = %err, "remote call failed, falling back to local"),
            }
            local(&err)
        }
    }
}

pub struct PipelineService {
    remote: Option<Arc<dyn RemoteConfigService>>,
    push: PushSettings,
}

impl PipelineService {
    /// A service that never contacts a remote.
    pub fn local(push: PushSettings) -> Self {
        Self { remote: None, push }
    }

    pub fn with_remote(remote: Arc<dyn RemoteConfigService>, push: PushSettings) -> Self {
        Self {
            remote: Some(remote),
            push,
        }
    }

    /// Build from settings: an HTTP remote when a base URL is configured.
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.remote.endpoint() {
            Some(url) => {
                let remote = HttpRemote::new(url, settings.remote.token());
                Self::with_remote(Arc::new(remote), settings.push.clone())
            }
            None => Self::local(settings.push.clone()),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Render and lint `config`, remotely when possible.
    pub async fn generate_config_pipeline(&self, config: &CanonicalConfig, vendor: Vendor) -> PipelineResult {
        let remote = match &self.remote {
            Some(remote) => remote.generate(config, vendor).await,
            None => Err(RemoteError::NotConfigured),
        };
        or_local(remote, "generate", |_| generate_local(config, vendor))
    }

    /// Push commands, remotely when possible. Without a remote the commands
    /// are checked locally and reported as `partial`.
    pub async fn push_config(&self, payload: &PushPayload) -> PushResult {
        if payload.commands.is_empty() {
            return PushResult {
                status: PushStatus::Error,
                details: vec!["No commands to push.".to_string()],
            };
        }
        let remote = match &self.remote {
            Some(remote) => remote.push(payload).await,
            None => Err(RemoteError::NotConfigured),
        };
        or_local(remote, "push", |err| self.push_local(payload, err))
    }

    /// Diff two command lists.
    pub fn diff_config(&self, previous: &[String], next: &[String]) -> ConfigDiff {
        diff_config(previous, next)
    }

    fn push_local(&self, payload: &PushPayload, err: &RemoteError) -> PushResult {
        let mut details = vec![
            format!("Remote push unavailable: {err}."),
            format!(
                "{} commands prepared for {} ({}); apply them manually.",
                payload.commands.len(),
                payload.device_id,
                payload.vendor
            ),
        ];
        for command in self.push.flag_dangerous(&payload.commands) {
            details.push(format!("Dangerous command requires review: {command}"));
        }
        let has_ticket = payload.ticket_id.as_deref().is_some_and(|t| !t.trim().is_empty());
        if payload.environment.is_prod() && !has_ticket {
            details.push("Production push without a ticket id; approval is required.".to_string());
        }
        PushResult {
            status: PushStatus::Partial,
            details,
        }
    }
}

/// Local render plus lint.
pub fn generate_local(config: &CanonicalConfig, vendor: Vendor) -> PipelineResult {
    PipelineResult {
        render: render_config(config, vendor),
        lint_findings: lint_config(config, vendor),
    }
}

/// Diff two command lists.
pub fn diff_config(previous: &[String], next: &[String]) -> ConfigDiff {
    let lines = diff_commands_detailed(previous, next);
    ConfigDiff {
        text: diff_commands(previous, next),
        summary: format_summary(&lines),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::{
        generate_local, or_local, PipelineResult, PipelineService, PushPayload, PushResult, PushStatus,
        RemoteConfigService, RemoteError,
    };
    use crate::schema::{default_config, CanonicalConfig, Environment, Vendor};
    use crate::settings::default_settings;

    /// Remote that either answers with fixed values or fails with a status.
    struct StubRemote {
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubRemote {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
            })
        }

        fn error() -> RemoteError {
            RemoteError::Status {
                status: 502,
                body: "bad gateway".into(),
            }
        }
    }

    #[async_trait]
    impl RemoteConfigService for StubRemote {
        async fn generate(&self, _config: &CanonicalConfig, _vendor: Vendor) -> Result<PipelineResult, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Self::error());
            }
            let mut result = PipelineResult::default();
            result.render.commands = vec!["! rendered remotely".into()];
            Ok(result)
        }

        async fn push(&self, _payload: &PushPayload) -> Result<PushResult, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Self::error());
            }
            Ok(PushResult {
                status: PushStatus::Ok,
                details: vec!["accepted".into()],
            })
        }
    }

    fn config() -> CanonicalConfig {
        let mut config = default_config();
        config.hostname = "edge-01".into();
        config
    }

    fn payload(environment: Environment, commands: &[&str]) -> PushPayload {
        PushPayload {
            device_id: "dev-1".into(),
            vendor: Vendor::Cisco,
            commands: commands.iter().map(|c| c.to_string()).collect(),
            environment,
            ticket_id: None,
        }
    }

    #[tokio::test]
    async fn remote_result_is_used_when_available() {
        let stub = StubRemote::new(false);
        let service = PipelineService::with_remote(stub.clone(), default_settings().push);
        let result = service.generate_config_pipeline(&config(), Vendor::Cisco).await;
        assert_eq!(result.render.commands, ["! rendered remotely"]);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_remote_falls_back_without_retry() {
        let stub = StubRemote::new(true);
        let service = PipelineService::with_remote(stub.clone(), default_settings().push);
        let result = service.generate_config_pipeline(&config(), Vendor::Mikrotik).await;
        assert_eq!(result, generate_local(&config(), Vendor::Mikrotik));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn offline_generate_is_local() {
        let service = PipelineService::local(default_settings().push);
        let result = service.generate_config_pipeline(&config(), Vendor::Cisco).await;
        assert!(result.render.commands.contains(&"hostname edge-01".to_string()));
        assert!(result.lint_findings.iter().any(|f| f.id == "services.ntp.missing"));
    }

    #[tokio::test]
    async fn failed_push_is_partial_with_guard_details() {
        let service = PipelineService::with_remote(StubRemote::new(true), default_settings().push);
        let result = service
            .push_config(&payload(Environment::Prod, &["hostname edge-01", "reload"]))
            .await;
        assert_eq!(result.status, PushStatus::Partial);
        assert!(result.details[0].contains("HTTP 502"));
        assert!(result.details.iter().any(|d| d.ends_with(": reload")));
        assert!(result.details.iter().any(|d| d.contains("without a ticket")));
    }

    #[tokio::test]
    async fn successful_push_passes_through() {
        let service = PipelineService::with_remote(StubRemote::new(false), default_settings().push);
        let result = service.push_config(&payload(Environment::Dev, &["hostname a"])).await;
        assert_eq!(result.status, PushStatus::Ok);
        assert_eq!(result.details, ["accepted"]);
    }

    #[tokio::test]
    async fn empty_push_is_error() {
        let service = PipelineService::local(default_settings().push);
        let result = service.push_config(&payload(Environment::Dev, &[])).await;
        assert_eq!(result.status, PushStatus::Error);
    }

    #[test]
    fn or_local_keeps_ok_values() {
        assert_eq!(or_local(Ok(1), "op", |_| 2), 1);
        assert_eq!(or_local(Err(RemoteError::NotConfigured), "op", |_| 2), 2);
    }

    #[test]
    fn diff_config_is_local_and_merged() {
        let service = PipelineService::local(default_settings().push);
        let prev: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let next: Vec<String> = ["a", "x", "c"].iter().map(|s| s.to_string()).collect();
        let diff = service.diff_config(&prev, &next);
        assert_eq!(diff.lines.len(), 3);
        assert_eq!(diff.text, "~ b → x");
        assert_eq!(diff.summary, "added=0 removed=0 changed=1 same=2");
    }

    #[test]
    fn pipeline_result_wire_shape_is_flat() {
        let json = serde_json::to_value(generate_local(&config(), Vendor::Cisco)).expect("json");
        assert!(json.get("commands").is_some());
        assert!(json.get("verify_commands").is_some());
        assert!(json.get("lint_findings").is_some());
        assert!(json.get("render").is_none());
    }
}
