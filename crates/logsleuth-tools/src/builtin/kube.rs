//! Kubernetes action tools.
//!
//! Placeholder execution: the restart reports what a rollout restart would do
//! without talking to a cluster. Wiring a real client in keeps the same tool
//! contract.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

use crate::{ToolError, generate_schema};
use logsleuth_core::{Tool, ToolResult};

pub struct RestartPodTool {
    default_namespace: String,
}

impl RestartPodTool {
    pub fn new(default_namespace: impl Into<String>) -> Self {
        Self {
            default_namespace: default_namespace.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RestartPodInput {
    /// Name of the pod to restart
    pod_name: String,
    /// Kubernetes namespace; defaults to the configured namespace
    #[serde(default)]
    namespace: Option<String>,
}

#[async_trait]
impl Tool for RestartPodTool {
    fn id(&self) -> &str {
        "restart_kubernetes_pod"
    }

    fn name(&self) -> &str {
        "Restart Kubernetes Pod"
    }

    fn description(&self) -> &str {
        "Restart a Kubernetes pod by deleting it so its controller reschedules a \
         replacement. Use for P1 issues such as OutOfMemoryError or \
         CrashLoopBackOff, and only after the operator has confirmed. \
         Inputs: pod_name and optional namespace."
    }

    fn input_schema(&self) -> Value {
        generate_schema::<RestartPodInput>()
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let input: RestartPodInput = match serde_json::from_value(args) {
            Ok(input) => input,
            Err(e) => return ToolError::InvalidArguments(e.to_string()).into(),
        };

        if input.pod_name.trim().is_empty() {
            return ToolError::InvalidArguments("pod_name must not be empty".to_string()).into();
        }

        let namespace = input
            .namespace
            .unwrap_or_else(|| self.default_namespace.clone());

        info!(pod = %input.pod_name, namespace = %namespace, "Restarting pod");

        let metadata = HashMap::from([
            ("pod_name".to_string(), Value::String(input.pod_name.clone())),
            ("namespace".to_string(), Value::String(namespace.clone())),
        ]);

        ToolResult::ok_with_metadata(
            format!(
                "Restart initiated for pod '{}' in namespace '{}'. \
                 The pod is terminating and its controller will schedule a replacement. \
                 Check pod status in a few moments to confirm recovery.",
                input.pod_name, namespace
            ),
            metadata,
        )
    }
}
