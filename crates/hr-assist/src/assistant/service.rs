use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::capability::{CapabilityKind, CapabilityRequest};
use super::engine::{EngineError, EngineRequest, EngineStep, Observation, ReasoningEngine};
use crate::workforce::store::{run_blocking, StoreError, TableStore, Workforce};

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("reasoning engine did not respond within {0:?}")]
    Timeout(Duration),
    #[error("no answer after {0} capability calls")]
    StepLimit(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AssistantError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Engine(_) | Self::StepLimit(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantStep {
    pub capability: CapabilityKind,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub reply: String,
    pub steps: Vec<AssistantStep>,
}

/// Drives the engine: ask for a step, run the chosen capability, feed the result back.
pub struct HrAssistant<S> {
    workforce: Arc<Workforce<S>>,
    engine: Arc<dyn ReasoningEngine>,
    max_steps: usize,
    timeout: Duration,
}

impl<S> HrAssistant<S>
where
    S: TableStore + 'static,
{
    pub fn new(
        workforce: Arc<Workforce<S>>,
        engine: Arc<dyn ReasoningEngine>,
        max_steps: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            workforce,
            engine,
            max_steps: max_steps.max(1),
            timeout,
        }
    }

    pub fn workforce(&self) -> &Arc<Workforce<S>> {
        &self.workforce
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub async fn ask(
        &self,
        instruction: &str,
        today: NaiveDate,
    ) -> Result<AssistantReply, AssistantError> {
        let mut request = EngineRequest::new(instruction.trim());
        let mut steps = Vec::new();

        for _ in 0..self.max_steps {
            let step = tokio::time::timeout(self.timeout, self.engine.next_step(&request))
                .await
                .map_err(|_| {
                    warn!(engine = self.engine.name(), timeout = ?self.timeout, "engine timed out");
                    AssistantError::Timeout(self.timeout)
                })??;

            let call = match step {
                EngineStep::Answer(reply) => return Ok(AssistantReply { reply, steps }),
                EngineStep::Invoke(call) => call,
            };

            let capability = CapabilityRequest::parse(call.capability, &call.input);
            let output = run_blocking(&self.workforce, move |workforce| {
                capability.execute(workforce, today)
            })
            .await?;
            info!(
                engine = self.engine.name(),
                capability = call.capability.name(),
                "capability dispatched"
            );

            steps.push(AssistantStep {
                capability: call.capability,
                input: call.input.clone(),
                output: output.clone(),
            });
            request.observations.push(Observation { call, output });
        }

        Err(AssistantError::StepLimit(self.max_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::engine::CapabilityCall;
    use crate::workforce::store::MemoryTableStore;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Stalled;

    #[async_trait]
    impl ReasoningEngine for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn next_step(&self, _request: &EngineRequest) -> Result<EngineStep, EngineError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(EngineStep::Answer("late".to_string()))
        }
    }

    struct Looping;

    #[async_trait]
    impl ReasoningEngine for Looping {
        fn name(&self) -> &str {
            "looping"
        }

        async fn next_step(&self, _request: &EngineRequest) -> Result<EngineStep, EngineError> {
            Ok(EngineStep::Invoke(CapabilityCall {
                id: "loop".to_string(),
                capability: CapabilityKind::VerifyDataRemediation,
                input: String::new(),
            }))
        }
    }

    fn workforce() -> Arc<Workforce<MemoryTableStore>> {
        Arc::new(
            Workforce::open(Arc::new(MemoryTableStore::default()), StdRng::seed_from_u64(3))
                .expect("workforce opens"),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date")
    }

    #[tokio::test]
    async fn slow_engine_times_out() {
        let assistant =
            HrAssistant::new(workforce(), Arc::new(Stalled), 3, Duration::from_millis(50));
        let error = assistant.ask("anything", today()).await.expect_err("timeout");
        assert!(matches!(error, AssistantError::Timeout(_)));
        assert_eq!(error.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn runaway_engine_hits_step_limit() {
        let assistant = HrAssistant::new(workforce(), Arc::new(Looping), 2, Duration::from_secs(1));
        let error = assistant.ask("verify", today()).await.expect_err("step limit");
        assert!(matches!(error, AssistantError::StepLimit(2)));
    }
}
