//! Offline engine that routes instructions by keyword. Used without an API key and in tests.

use async_trait::async_trait;

use super::capability::{contains_word, starts_word, CapabilityKind};
use super::engine::{CapabilityCall, EngineError, EngineRequest, EngineStep, ReasoningEngine};
use crate::workforce::quality::AUDIT_CLEAN_MESSAGE;

/// First match wins; more specific intents come first. Keywords match whole words; a trailing
/// `*` also accepts longer words with that stem ("onboard*" matches "onboarded").
const RULES: &[(&[&str], CapabilityKind)] = &[
    (
        &["verify", "remediation was", "check status"],
        CapabilityKind::VerifyDataRemediation,
    ),
    (
        &[
            "reset demo",
            "reset the demo",
            "reset data",
            "reset the data",
            "demo reset",
        ],
        CapabilityKind::ResetDemoData,
    ),
    (
        &["simulat*", "employees reply*", "self-service"],
        CapabilityKind::SimulateEmployeeUpdates,
    ),
    (
        &["audit*", "data quality", "missing"],
        CapabilityKind::AuditDataIntegrity,
    ),
    (
        &["send correction*", "send emails", "fix data"],
        CapabilityKind::SendCorrectionEmails,
    ),
    (
        &["draft*", "write an email", "reply to", "respond to"],
        CapabilityKind::EmailDrafter,
    ),
    (
        &["hike*", "salary", "raise*", "compensation"],
        CapabilityKind::Compensation,
    ),
    (&["onboard*"], CapabilityKind::CheckOnboardingStatus),
    (
        &["enroll*", "benefit*", "insurance", "gym"],
        CapabilityKind::EnrollBenefit,
    ),
    (&["remind*", "nudge*"], CapabilityKind::SendReminders),
    (
        &[
            "headcount",
            "attrition",
            "exit*",
            "turnover",
            "engagement",
            "performance",
        ],
        CapabilityKind::WorkforceAnalytics,
    ),
    (
        &["polic*", "leave", "reimburs*", "relocat*", "conduct", "visa"],
        CapabilityKind::Policy,
    ),
];

const FOLLOW_UP_CORRECTION: &[&str] = &["send correction*", "send emails", "correction emails"];

const FALLBACK_ANSWER: &str = "I can help with headcount and attrition analytics, HR policy questions and email drafts, salary hike modeling, onboarding status, and the data audit cycle (audit, simulate replies, verify, reset).";

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordEngine;

impl KeywordEngine {
    pub fn new() -> Self {
        Self
    }

    /// Capabilities to run, in order, for `instruction`.
    pub fn plan(&self, instruction: &str) -> Vec<CapabilityKind> {
        let lowered = instruction.to_lowercase();
        let Some(primary) = RULES
            .iter()
            .find(|(keywords, _)| mentions_any(&lowered, keywords))
            .map(|(_, kind)| *kind)
        else {
            return Vec::new();
        };

        let mut plan = vec![primary];
        if primary == CapabilityKind::AuditDataIntegrity
            && mentions_any(&lowered, FOLLOW_UP_CORRECTION)
        {
            plan.push(CapabilityKind::SendCorrectionEmails);
        }
        plan
    }
}

fn mentions_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| match keyword.strip_suffix('*') {
        Some(stem) => starts_word(lowered, stem),
        None => contains_word(lowered, keyword),
    })
}

/// Capitalized words after the first, e.g. "Is Alex Moreau onboarded?" -> "Alex Moreau".
fn person_name(instruction: &str) -> String {
    let words: Vec<&str> = instruction
        .split_whitespace()
        .skip(1)
        .map(|word| word.trim_matches(|ch: char| !ch.is_alphanumeric()))
        .filter(|word| {
            word.chars().next().map(char::is_uppercase).unwrap_or(false)
                && !matches!(*word, "I" | "Is" | "What" | "Status" | "Onboarding")
        })
        .collect();
    if words.is_empty() {
        instruction.trim().to_string()
    } else {
        words.join(" ")
    }
}

fn input_for(kind: CapabilityKind, instruction: &str) -> String {
    match kind {
        CapabilityKind::CheckOnboardingStatus => person_name(instruction),
        _ => instruction.trim().to_string(),
    }
}

#[async_trait]
impl ReasoningEngine for KeywordEngine {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn next_step(&self, request: &EngineRequest) -> Result<EngineStep, EngineError> {
        let plan = self.plan(&request.instruction);
        if plan.is_empty() {
            return Ok(EngineStep::Answer(FALLBACK_ANSWER.to_string()));
        }

        let audit_was_clean = request
            .observations
            .iter()
            .any(|observation| {
                observation.call.capability == CapabilityKind::AuditDataIntegrity
                    && observation.output == AUDIT_CLEAN_MESSAGE
            });

        match plan.get(request.observations.len()) {
            Some(kind) if !(audit_was_clean && *kind == CapabilityKind::SendCorrectionEmails) => {
                Ok(EngineStep::Invoke(CapabilityCall {
                    id: format!("call_{}", request.observations.len() + 1),
                    capability: *kind,
                    input: input_for(*kind, &request.instruction),
                }))
            }
            _ => {
                let outputs: Vec<&str> = request
                    .observations
                    .iter()
                    .map(|observation| observation.output.as_str())
                    .collect();
                Ok(EngineStep::Answer(outputs.join("\n\n")))
            }
        }
    }
}
