use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u32);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of `employees.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "Employee_ID")]
    pub id: EmployeeId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    /// Raw `YYYY-MM-DD` text; kept unparsed so bad values survive a round-trip.
    #[serde(rename = "Join_Date", default)]
    pub join_date: String,
    #[serde(rename = "Salary")]
    pub salary: f64,
}

impl Employee {
    pub fn has_email(&self) -> bool {
        self.email
            .as_deref()
            .map(|email| !email.is_empty())
            .unwrap_or(false)
    }

    pub fn joined_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.join_date.trim(), "%Y-%m-%d").ok()
    }

    /// Lower-cased first token of the name, used for synthesized mailbox names.
    pub fn first_name_slug(&self) -> String {
        self.name
            .split_whitespace()
            .next()
            .map(|first| first.to_lowercase())
            .filter(|first| !first.is_empty())
            .unwrap_or_else(|| "employee".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(rename = "Employee_ID")]
    pub employee_id: EmployeeId,
    #[serde(rename = "Contact_Name")]
    pub contact_name: String,
    #[serde(rename = "Relation")]
    pub relation: String,
    #[serde(rename = "Phone")]
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermType {
    Voluntary,
    Involuntary,
}

impl TermType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Voluntary => "Voluntary",
            Self::Involuntary => "Involuntary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttritionRecord {
    #[serde(rename = "Exit_ID")]
    pub exit_id: u32,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Exit_Date")]
    pub exit_date: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Term_Type")]
    pub term_type: TermType,
    #[serde(rename = "Tenure_Years")]
    pub tenure_years: u8,
    #[serde(rename = "Manager_ID")]
    pub manager_id: EmployeeId,
}

impl AttritionRecord {
    pub fn exited_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.exit_date.trim(), "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementRecord {
    #[serde(rename = "Employee_ID")]
    pub employee_id: EmployeeId,
    /// 1-10 scale.
    #[serde(rename = "Engagement_Score")]
    pub engagement_score: u8,
    /// 1-5 scale.
    #[serde(rename = "Performance_Rating")]
    pub performance_rating: u8,
    #[serde(rename = "Last_Survey_Date")]
    pub last_survey_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "Candidate_ID")]
    pub candidate_id: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Applied_Date")]
    pub applied_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingRecord {
    #[serde(rename = "Employee_Name")]
    pub employee_name: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Start_Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "Laptop_Issued")]
    pub laptop_issued: bool,
    #[serde(rename = "Documents_Submitted")]
    pub documents_submitted: bool,
    #[serde(rename = "Orientation_Complete")]
    pub orientation_complete: bool,
}

/// The flat tables backing the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Employees,
    EmergencyContacts,
    Candidates,
    Onboarding,
    Attrition,
    Engagement,
}

impl Table {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Employees,
            Self::EmergencyContacts,
            Self::Candidates,
            Self::Onboarding,
            Self::Attrition,
            Self::Engagement,
        ]
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Employees => "employees.csv",
            Self::EmergencyContacts => "emergency_contacts.csv",
            Self::Candidates => "candidates.csv",
            Self::Onboarding => "onboarding.csv",
            Self::Attrition => "attrition.csv",
            Self::Engagement => "engagement.csv",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Employees => "employee",
            Self::EmergencyContacts => "emergency contact",
            Self::Candidates => "candidate",
            Self::Onboarding => "onboarding",
            Self::Attrition => "attrition",
            Self::Engagement => "engagement",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whole-table snapshots held in memory for a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkforceTables {
    pub employees: Vec<Employee>,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub candidates: Vec<Candidate>,
    pub onboarding: Vec<OnboardingRecord>,
    pub attrition: Vec<AttritionRecord>,
    pub engagement: Vec<EngagementRecord>,
}

impl WorkforceTables {
    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    /// Distinct departments, sorted.
    pub fn departments(&self) -> Vec<String> {
        let mut departments: Vec<String> = self
            .employees
            .iter()
            .map(|employee| employee.department.clone())
            .collect();
        departments.sort();
        departments.dedup();
        departments
    }
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
