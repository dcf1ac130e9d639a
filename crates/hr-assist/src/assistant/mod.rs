//! Boundary between the workforce calculators and an external tool-using reasoning engine.
//!
//! The engine only chooses which capability to call next; the capability itself runs here,
//! against the shared [`Workforce`](crate::workforce::Workforce) tables.

pub mod capability;
pub mod engine;
pub mod keyword;
pub mod openai;
pub mod prompts;
pub mod router;
pub mod service;

pub use capability::{CapabilityDescriptor, CapabilityKind, CapabilityRequest};
pub use engine::{CapabilityCall, EngineError, EngineRequest, EngineStep, Observation, ReasoningEngine};
pub use keyword::KeywordEngine;
pub use openai::OpenAiCompatEngine;
pub use prompts::{preset_prompts, PresetPrompt};
pub use router::assistant_router;
pub use service::{AssistantError, AssistantReply, AssistantStep, HrAssistant};
