use async_trait::async_trait;
use serde::Serialize;

use super::capability::{CapabilityDescriptor, CapabilityKind};

/// One capability invocation chosen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityCall {
    /// Engine-assigned call id, echoed back with the observation.
    pub id: String,
    pub capability: CapabilityKind,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub call: CapabilityCall,
    pub output: String,
}

/// Everything the engine sees when choosing its next step.
#[derive(Debug, Clone, Serialize)]
pub struct EngineRequest {
    pub instruction: String,
    pub capabilities: Vec<CapabilityDescriptor>,
    pub observations: Vec<Observation>,
}

impl EngineRequest {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            capabilities: CapabilityKind::descriptors(),
            observations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStep {
    Invoke(CapabilityCall),
    Answer(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine transport failed: {0}")]
    Transport(String),
    #[error("engine rejected the credentials")]
    Authentication,
    #[error("engine rate limit reached")]
    RateLimited,
    #[error("engine returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("engine response could not be understood: {0}")]
    MalformedResponse(String),
    #[error("engine asked for unknown capability '{0}'")]
    UnknownCapability(String),
}

/// The external think-act-observe loop, reduced to "what next?".
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn next_step(&self, request: &EngineRequest) -> Result<EngineStep, EngineError>;
}
