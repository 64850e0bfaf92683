use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;

use crate::actions::{error::ActionError, types::ActionKind};

/// Uniform executor contract for one action kind. Used only during the Act
/// phase; a failure is captured in the cycle record, never propagated as a
/// scheduler-fatal error.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, params: &BTreeMap<String, Value>) -> Result<Value, ActionError>;
}

/// Closed kind-to-executor mapping. `with_defaults` walks every `ActionKind`
/// through an exhaustive match, so adding a kind is a single registration
/// point and cannot be forgotten silently.
pub struct ExecutorRegistry {
    executors: BTreeMap<ActionKind, Arc<dyn ActionExecutor>>,
}

impl ExecutorRegistry {
    pub fn with_defaults() -> Self {
        let mut executors: BTreeMap<ActionKind, Arc<dyn ActionExecutor>> = BTreeMap::new();
        for kind in ActionKind::ALL {
            executors.insert(kind, default_executor(kind));
        }
        Self { executors }
    }

    /// Replaces the executor for one kind. The mapping stays total: `bind`
    /// can override a default but never remove one.
    pub fn bind(&mut self, kind: ActionKind, executor: Arc<dyn ActionExecutor>) {
        self.executors.insert(kind, executor);
    }

    pub fn resolve(&self, kind: ActionKind) -> Option<Arc<dyn ActionExecutor>> {
        self.executors.get(&kind).cloned()
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_executor(kind: ActionKind) -> Arc<dyn ActionExecutor> {
    match kind {
        ActionKind::Observe
        | ActionKind::Remember
        | ActionKind::Rest
        | ActionKind::Reflect
        | ActionKind::Connect
        | ActionKind::InquireShallow
        | ActionKind::InquireDeep
        | ActionKind::Synthesize
        | ActionKind::Brainstorm
        | ActionKind::Reprioritize
        | ActionKind::ReachOutUser
        | ActionKind::Recalibrate => Arc::new(LocalAckExecutor { kind }),
    }
}

/// Reference executor: acknowledges the action without external side effects.
/// Deployments bind real executors over the defaults they support.
pub struct LocalAckExecutor {
    pub kind: ActionKind,
}

#[async_trait]
impl ActionExecutor for LocalAckExecutor {
    async fn execute(&self, params: &BTreeMap<String, Value>) -> Result<Value, ActionError> {
        Ok(serde_json::json!({
            "kind": self.kind,
            "handled": "local",
            "param_count": params.len(),
        }))
    }
}
