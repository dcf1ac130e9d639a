//! Canned prompts behind the dashboard buttons.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetPrompt {
    pub key: &'static str,
    pub label: &'static str,
    pub prompt: String,
}

pub const DEFAULT_DEPARTMENT: &str = "Engineering";
const DEFAULT_EMPLOYEE: &str = "the employee";

pub fn preset_prompts(employee: Option<&str>, department: Option<&str>) -> Vec<PresetPrompt> {
    let employee = employee
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_EMPLOYEE);
    let department = department
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DEPARTMENT);

    vec![
        PresetPrompt {
            key: "headcount",
            label: "Global Headcount",
            prompt: "Calculate the total Headcount for EACH Department. Output the result as a Markdown Table with columns: Department | Headcount.".to_string(),
        },
        PresetPrompt {
            key: "attrition_yoy",
            label: "Analyze Terms (Year over Year)",
            prompt: format!("Analyze attrition for Department '{department}'. Group the exits by YEAR of Exit_Date and show the count for each year as a Markdown Table."),
        },
        PresetPrompt {
            key: "attrition_monthly",
            label: "Analyze Terms (Monthly)",
            prompt: format!("Analyze attrition for Department '{department}'. Group the exits by Year-Month (YYYY-MM) of Exit_Date and show the counts as a Markdown Table sorted by date."),
        },
        PresetPrompt {
            key: "data_audit",
            label: "Run Daily Data Audit",
            prompt: "Run a data quality audit. If missing data is found, send correction emails.".to_string(),
        },
        PresetPrompt {
            key: "verify_remediation",
            label: "Verify Remediation",
            prompt: "Verify if the data remediation was successful.".to_string(),
        },
        PresetPrompt {
            key: "relocation_reply",
            label: "Draft Policy Response (Relocation)",
            prompt: format!("Draft a reply to {employee} regarding relocation to London. Explain the visa and contract rules. Display the full email text in your response."),
        },
        PresetPrompt {
            key: "dinner_reimbursement_reply",
            label: "Draft Policy Response (Client Dinner)",
            prompt: format!("Draft a reply to {employee} regarding client dinner reimbursement. Mention the no-alcohol policy. Display the full email text in your response."),
        },
    ]
}
