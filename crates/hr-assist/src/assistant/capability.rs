//! The fixed set of capabilities the reasoning engine may invoke, and their typed inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workforce::analytics::{self, Granularity};
use crate::workforce::domain::{EmployeeId, WorkforceTables};
use crate::workforce::policy;
use crate::workforce::store::{StoreError, TableStore, Workforce};

/// Percentage assumed when a compensation request names none.
pub const DEFAULT_HIKE_PERCENT: f64 = 10.0;

pub const COMPENSATION_MODELER_HINT: &str =
    "Please name an employee id, or use the compensation modeler (POST /api/v1/compensation/hike).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Compensation,
    AuditDataIntegrity,
    SimulateEmployeeUpdates,
    VerifyDataRemediation,
    ResetDemoData,
    Policy,
    EnrollBenefit,
    SendReminders,
    EmailDrafter,
    SendCorrectionEmails,
    CheckOnboardingStatus,
    WorkforceAnalytics,
}

/// Name and usage text shown to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

impl CapabilityKind {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::WorkforceAnalytics,
            Self::Policy,
            Self::Compensation,
            Self::EnrollBenefit,
            Self::EmailDrafter,
            Self::AuditDataIntegrity,
            Self::SendCorrectionEmails,
            Self::SimulateEmployeeUpdates,
            Self::VerifyDataRemediation,
            Self::CheckOnboardingStatus,
            Self::SendReminders,
            Self::ResetDemoData,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Compensation => "compensation",
            Self::AuditDataIntegrity => "audit_data_integrity",
            Self::SimulateEmployeeUpdates => "simulate_employee_updates",
            Self::VerifyDataRemediation => "verify_data_remediation",
            Self::ResetDemoData => "reset_demo_data",
            Self::Policy => "policy",
            Self::EnrollBenefit => "enroll_benefit",
            Self::SendReminders => "send_reminders",
            Self::EmailDrafter => "email_drafter",
            Self::SendCorrectionEmails => "send_correction_emails",
            Self::CheckOnboardingStatus => "check_onboarding_status",
            Self::WorkforceAnalytics => "workforce_analytics",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Compensation => "Salary hike questions. Input: free text naming the employee id and the hike percentage, e.g. 'employee 104 at 12%'.",
            Self::AuditDataIntegrity => "Checks employee records for missing emails and emergency contacts and returns a markdown report. Use for 'Audit', 'Data Quality', or 'Check missing info'.",
            Self::SimulateEmployeeUpdates => "Simulates employees replying to correction emails by filling every missing email and emergency contact. Use for 'Simulate replies'.",
            Self::VerifyDataRemediation => "Verifies whether the data gaps have been closed. Use to 'Verify success' or 'Check status' after remediation.",
            Self::ResetDemoData => "Resets the demo data: regenerates attrition and engagement and reintroduces data gaps.",
            Self::Policy => "Reads the HR policy handbook. Use for questions about relocation, reimbursement, leave, or code of conduct.",
            Self::EnrollBenefit => "Enrolls an employee in a benefit. Use for 'Enroll in gym', 'Add insurance'. Input: the benefit request.",
            Self::SendReminders => "Sends generic email reminders. Use for 'Nudge candidate', 'Send reminder'. Input: the reminder action.",
            Self::EmailDrafter => "Drafts an email to an employee based on HR policy. Use for 'Draft a reply', 'Write an email', 'Respond to request'. Input: the full request.",
            Self::SendCorrectionEmails => "Triggers the correction email campaign for records found missing by an audit. Use for 'Send emails' or 'Fix data'.",
            Self::CheckOnboardingStatus => "Checks the onboarding status of a new hire. Input: the person's name.",
            Self::WorkforceAnalytics => "Data queries over employees, attrition and engagement: headcount per department, exits per department by year or month, engagement versus performance.",
        }
    }

    pub const fn descriptor(self) -> CapabilityDescriptor {
        CapabilityDescriptor {
            name: self.name(),
            description: self.description(),
        }
    }

    pub fn descriptors() -> Vec<CapabilityDescriptor> {
        Self::ordered().into_iter().map(Self::descriptor).collect()
    }

    /// Case-insensitive lookup by name; also accepts the short aliases engines tend to emit.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let alias = match normalized.as_str() {
            "comp" | "salary" => Some(Self::Compensation),
            "ben" | "benefits" => Some(Self::EnrollBenefit),
            "analytics" => Some(Self::WorkforceAnalytics),
            "audit" => Some(Self::AuditDataIntegrity),
            _ => None,
        };
        alias.or_else(|| {
            Self::ordered()
                .into_iter()
                .find(|kind| kind.name() == normalized)
        })
    }
}

/// Which analytics view a free-text request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsQuery {
    Headcount,
    Attrition {
        department: Option<String>,
        granularity: Granularity,
    },
    Engagement,
}

impl AnalyticsQuery {
    /// `departments` are the names present in the tables; the first one mentioned wins.
    pub fn parse(text: &str, departments: &[String]) -> Self {
        let lowered = text.to_lowercase();
        let mentions = |words: &[&str]| words.iter().any(|word| lowered.contains(word));

        if mentions(&["attrition", "exit", "turnover", "terminat", "terms"]) {
            let granularity = if mentions(&["month", "yyyy-mm"]) {
                Granularity::Month
            } else {
                Granularity::Year
            };
            let department = departments
                .iter()
                .find(|name| contains_word(&lowered, &name.to_lowercase()))
                .cloned();
            Self::Attrition {
                department,
                granularity,
            }
        } else if mentions(&["engagement", "performance", "survey"]) {
            Self::Engagement
        } else {
            Self::Headcount
        }
    }
}

fn is_word_start(haystack: &str, start: usize) -> bool {
    !haystack[..start]
        .chars()
        .next_back()
        .map(char::is_alphanumeric)
        .unwrap_or(false)
}

/// `word` appears in `haystack` with no letter or digit on either side.
pub(crate) fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack.match_indices(word).any(|(start, _)| {
        let after = haystack[start + word.len()..].chars().next();
        is_word_start(haystack, start) && !after.map(char::is_alphanumeric).unwrap_or(false)
    })
}

/// Some word in `haystack` begins with `stem`.
pub(crate) fn starts_word(haystack: &str, stem: &str) -> bool {
    !stem.is_empty()
        && haystack
            .match_indices(stem)
            .any(|(start, _)| is_word_start(haystack, start))
}

/// Words that mark the preceding number as a percentage, e.g. "12 percent".
const PERCENT_WORDS: &[&str] = &["percent", "pct"];

/// Employee ids currently run from 100 to 999.
const EMPLOYEE_ID_RANGE: std::ops::RangeInclusive<u32> = 100..=999;

/// Employee candidates and hike percentage pulled out of a free-text request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompensationQuery {
    /// Every standalone integer that is not the percentage, in order of appearance.
    pub candidates: Vec<EmployeeId>,
    pub hike_percent: f64,
}

impl CompensationQuery {
    /// The first candidate present in `tables`; failing that, the first id-shaped candidate
    /// so the calculator can report it as not found.
    pub fn resolve(&self, tables: &WorkforceTables) -> Option<EmployeeId> {
        self.candidates
            .iter()
            .copied()
            .find(|id| tables.employee(*id).is_some())
            .or_else(|| {
                self.candidates
                    .iter()
                    .copied()
                    .find(|id| EMPLOYEE_ID_RANGE.contains(&id.0))
            })
    }
}

fn followed_by_percent_word(rest: &str) -> bool {
    let rest = rest.trim_start().to_ascii_lowercase();
    PERCENT_WORDS.iter().any(|word| {
        rest.strip_prefix(word)
            .map(|tail| !tail.starts_with(|ch: char| ch.is_alphanumeric()))
            .unwrap_or(false)
    })
}

/// The first number followed by `%` (or "percent") is the percentage; every other standalone
/// integer is an employee candidate.
pub fn parse_compensation_request(text: &str) -> CompensationQuery {
    let mut candidates = Vec::new();
    let mut hike_percent = None;
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut index = 0;

    while index < chars.len() {
        let (start, ch) = chars[index];
        let preceded_by_word = index > 0 && chars[index - 1].1.is_alphanumeric();
        if !ch.is_ascii_digit() || preceded_by_word {
            index += 1;
            continue;
        }

        let mut end = index;
        while end < chars.len() && (chars[end].1.is_ascii_digit() || chars[end].1 == '.') {
            end += 1;
        }
        let byte_end = chars.get(end).map(|(offset, _)| *offset).unwrap_or(text.len());
        let token = text[start..byte_end].trim_end_matches('.');
        let next = chars.get(end).map(|(_, ch)| *ch);

        if next == Some('%') || followed_by_percent_word(&text[byte_end..]) {
            if hike_percent.is_none() {
                hike_percent = token.parse::<f64>().ok();
            }
        } else if !next.map(char::is_alphanumeric).unwrap_or(false) {
            if let Ok(id) = token.parse::<u32>() {
                candidates.push(EmployeeId(id));
            }
        }
        index = end;
    }

    CompensationQuery {
        candidates,
        hike_percent: hike_percent.unwrap_or(DEFAULT_HIKE_PERCENT),
    }
}

/// A capability invocation with its input parsed into the shape the calculators need.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityRequest {
    Compensation(CompensationQuery),
    AuditDataIntegrity,
    SimulateEmployeeUpdates,
    VerifyDataRemediation,
    ResetDemoData,
    Policy,
    EnrollBenefit(String),
    SendReminders(String),
    EmailDrafter(String),
    SendCorrectionEmails(String),
    CheckOnboardingStatus(String),
    WorkforceAnalytics(String),
}

impl CapabilityRequest {
    pub fn parse(kind: CapabilityKind, input: &str) -> Self {
        let text = input.trim().to_string();
        match kind {
            CapabilityKind::Compensation => Self::Compensation(parse_compensation_request(&text)),
            CapabilityKind::AuditDataIntegrity => Self::AuditDataIntegrity,
            CapabilityKind::SimulateEmployeeUpdates => Self::SimulateEmployeeUpdates,
            CapabilityKind::VerifyDataRemediation => Self::VerifyDataRemediation,
            CapabilityKind::ResetDemoData => Self::ResetDemoData,
            CapabilityKind::Policy => Self::Policy,
            CapabilityKind::EnrollBenefit => Self::EnrollBenefit(text),
            CapabilityKind::SendReminders => Self::SendReminders(text),
            CapabilityKind::EmailDrafter => Self::EmailDrafter(text),
            CapabilityKind::SendCorrectionEmails => Self::SendCorrectionEmails(text),
            CapabilityKind::CheckOnboardingStatus => Self::CheckOnboardingStatus(text),
            CapabilityKind::WorkforceAnalytics => Self::WorkforceAnalytics(text),
        }
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::Compensation(_) => CapabilityKind::Compensation,
            Self::AuditDataIntegrity => CapabilityKind::AuditDataIntegrity,
            Self::SimulateEmployeeUpdates => CapabilityKind::SimulateEmployeeUpdates,
            Self::VerifyDataRemediation => CapabilityKind::VerifyDataRemediation,
            Self::ResetDemoData => CapabilityKind::ResetDemoData,
            Self::Policy => CapabilityKind::Policy,
            Self::EnrollBenefit(_) => CapabilityKind::EnrollBenefit,
            Self::SendReminders(_) => CapabilityKind::SendReminders,
            Self::EmailDrafter(_) => CapabilityKind::EmailDrafter,
            Self::SendCorrectionEmails(_) => CapabilityKind::SendCorrectionEmails,
            Self::CheckOnboardingStatus(_) => CapabilityKind::CheckOnboardingStatus,
            Self::WorkforceAnalytics(_) => CapabilityKind::WorkforceAnalytics,
        }
    }

    /// Run the capability against the tables and return the plain-text observation.
    pub fn execute<S>(&self, workforce: &Workforce<S>, today: NaiveDate) -> Result<String, StoreError>
    where
        S: TableStore + 'static,
    {
        debug!(capability = self.kind().name(), "executing capability");
        let output = match self {
            Self::Compensation(query) => match workforce.read(|tables| query.resolve(tables))? {
                Some(employee_id) => workforce.hike(employee_id, query.hike_percent, today)?.render(),
                None => COMPENSATION_MODELER_HINT.to_string(),
            },
            Self::AuditDataIntegrity => workforce.audit()?.render(),
            Self::SimulateEmployeeUpdates => workforce.remediate()?.render(),
            Self::VerifyDataRemediation => workforce.verify()?.render(),
            Self::ResetDemoData => workforce.reset()?.render(),
            Self::Policy => policy::read_policy(),
            Self::EnrollBenefit(request) => policy::enroll_benefit(request),
            Self::SendReminders(action) => policy::send_reminders(action),
            Self::EmailDrafter(request) => policy::draft_policy_email(request),
            Self::SendCorrectionEmails(summary) => policy::send_correction_emails(summary),
            Self::CheckOnboardingStatus(name) => workforce.read(|tables| {
                analytics::render_onboarding(&analytics::onboarding_status(&tables.onboarding, name))
            })?,
            Self::WorkforceAnalytics(text) => workforce.read(|tables| {
                match AnalyticsQuery::parse(text, &tables.departments()) {
                    AnalyticsQuery::Headcount => analytics::render_headcount(
                        &analytics::headcount_by_department(&tables.employees),
                    ),
                    AnalyticsQuery::Attrition {
                        department,
                        granularity,
                    } => analytics::attrition_trend(
                        &tables.attrition,
                        department.as_deref(),
                        granularity,
                    )
                    .render(),
                    AnalyticsQuery::Engagement => analytics::render_engagement(
                        &analytics::engagement_summary(&tables.employees, &tables.engagement),
                    ),
                }
            })?,
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workforce::generator::generate_employees;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn names_round_trip_and_aliases_resolve() {
        for kind in CapabilityKind::ordered() {
            assert_eq!(CapabilityKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CapabilityKind::from_name("Comp"), Some(CapabilityKind::Compensation));
        assert_eq!(
            CapabilityKind::from_name("Email-Drafter"),
            Some(CapabilityKind::EmailDrafter)
        );
        assert_eq!(CapabilityKind::from_name("shell"), None);
        assert_eq!(CapabilityKind::descriptors().len(), 12);
    }

    fn query(candidates: &[u32], hike_percent: f64) -> CompensationQuery {
        CompensationQuery {
            candidates: candidates.iter().copied().map(EmployeeId).collect(),
            hike_percent,
        }
    }

    #[test]
    fn compensation_text_yields_candidates_and_percent() {
        assert_eq!(
            parse_compensation_request("What does a 12% hike do for employee 104?"),
            query(&[104], 12.0)
        );
        assert_eq!(
            parse_compensation_request("raise 117 by 7.5%"),
            query(&[117], 7.5)
        );
        assert_eq!(
            parse_compensation_request("give Q3 bonus to 120"),
            query(&[120], DEFAULT_HIKE_PERCENT)
        );
        assert_eq!(
            parse_compensation_request("model a hike for Priya"),
            query(&[], DEFAULT_HIKE_PERCENT)
        );
    }

    #[test]
    fn spelled_out_percent_is_not_an_employee() {
        assert_eq!(
            parse_compensation_request("Model a 12 percent raise for employee 104"),
            query(&[104], 12.0)
        );
        assert_eq!(
            parse_compensation_request("3 pct for 118"),
            query(&[118], 3.0)
        );
        assert_eq!(
            parse_compensation_request("12 percentile rank for 104"),
            query(&[12, 104], DEFAULT_HIKE_PERCENT)
        );
    }

    #[test]
    fn resolve_prefers_an_existing_employee_over_a_year() {
        let tables = WorkforceTables {
            employees: generate_employees(&mut StdRng::seed_from_u64(1), 5),
            ..WorkforceTables::default()
        };
        let parsed = parse_compensation_request("In 2025 give 104 a 5% hike");
        assert_eq!(parsed, query(&[2025, 104], 5.0));
        assert_eq!(parsed.resolve(&tables), Some(EmployeeId(104)));

        assert_eq!(
            parse_compensation_request("In 2025 give 450 a 5% hike").resolve(&tables),
            Some(EmployeeId(450))
        );
        assert_eq!(
            parse_compensation_request("budget for 2025 is 12").resolve(&tables),
            None
        );
    }

    #[test]
    fn analytics_text_picks_view_department_and_period() {
        let departments = vec!["Engineering".to_string(), "HR".to_string(), "Sales".to_string()];
        assert_eq!(
            AnalyticsQuery::parse(
                "Analyze 'attrition.csv' for Department 'Sales'. Group by Year-Month (YYYY-MM).",
                &departments
            ),
            AnalyticsQuery::Attrition {
                department: Some("Sales".to_string()),
                granularity: Granularity::Month,
            }
        );
        assert_eq!(
            AnalyticsQuery::parse("exits in hr by year", &departments),
            AnalyticsQuery::Attrition {
                department: Some("HR".to_string()),
                granularity: Granularity::Year,
            }
        );
        assert_eq!(
            AnalyticsQuery::parse("engagement vs performance", &departments),
            AnalyticsQuery::Engagement
        );
        assert_eq!(
            AnalyticsQuery::parse("Headcount for EACH Department", &departments),
            AnalyticsQuery::Headcount
        );
    }

    #[test]
    fn parse_keeps_free_text_inputs_trimmed() {
        assert_eq!(
            CapabilityRequest::parse(CapabilityKind::CheckOnboardingStatus, "  Alex "),
            CapabilityRequest::CheckOnboardingStatus("Alex".to_string())
        );
        assert_eq!(
            CapabilityRequest::parse(CapabilityKind::AuditDataIntegrity, "anything").kind(),
            CapabilityKind::AuditDataIntegrity
        );
    }
}
