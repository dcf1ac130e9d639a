//! Gap detection over the employee and emergency-contact tables.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::domain::{EmergencyContact, Employee, EmployeeId};
use super::markdown::MarkdownTable;

/// Contact-missing ids listed before the remainder is summarized as a count.
pub const CONTACT_PREVIEW_LIMIT: usize = 10;

pub const AUDIT_CLEAN_MESSAGE: &str = "**Data Audit Complete:** All records are clean.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingEmail {
    pub employee_id: EmployeeId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataQualityAudit {
    pub missing_email: Vec<MissingEmail>,
    /// Ascending.
    pub missing_contact: Vec<EmployeeId>,
}

impl DataQualityAudit {
    pub fn is_clean(&self) -> bool {
        self.missing_email.is_empty() && self.missing_contact.is_empty()
    }

    pub fn render(&self) -> String {
        if self.is_clean() {
            return AUDIT_CLEAN_MESSAGE.to_string();
        }

        let mut out = String::new();
        if !self.missing_email.is_empty() {
            let mut table = MarkdownTable::new(&["Employee_ID", "Name"]);
            for gap in &self.missing_email {
                table.row([gap.employee_id.to_string(), gap.name.clone()]);
            }
            writeln!(
                out,
                "**Found {} employees with missing emails:**",
                self.missing_email.len()
            )
            .expect("write email heading");
            writeln!(out, "{}", table.render()).expect("write email table");
        }

        if !self.missing_contact.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            let preview: Vec<String> = self
                .missing_contact
                .iter()
                .take(CONTACT_PREVIEW_LIMIT)
                .map(EmployeeId::to_string)
                .collect();
            writeln!(
                out,
                "**Found {} employees missing emergency contacts:**",
                self.missing_contact.len()
            )
            .expect("write contact heading");
            write!(out, "IDs: {}", preview.join(", ")).expect("write ids");
            let remainder = self.missing_contact.len().saturating_sub(CONTACT_PREVIEW_LIMIT);
            if remainder > 0 {
                write!(out, " ...and {remainder} more (see the contact table)").expect("write contact remainder");
            }
            out.push('\n');
        }

        out.trim_end().to_string()
    }
}

pub(crate) fn missing_email(employees: &[Employee]) -> Vec<MissingEmail> {
    employees
        .iter()
        .filter(|employee| !employee.has_email())
        .map(|employee| MissingEmail {
            employee_id: employee.id,
            name: employee.name.clone(),
        })
        .collect()
}

/// Employee ids with no emergency-contact row, ascending and de-duplicated.
pub(crate) fn missing_contact(
    employees: &[Employee],
    contacts: &[EmergencyContact],
) -> Vec<EmployeeId> {
    let covered: BTreeSet<EmployeeId> = contacts.iter().map(|contact| contact.employee_id).collect();
    let all: BTreeSet<EmployeeId> = employees.iter().map(|employee| employee.id).collect();
    all.difference(&covered).copied().collect()
}

pub fn audit_data_integrity(
    employees: &[Employee],
    contacts: &[EmergencyContact],
) -> DataQualityAudit {
    DataQualityAudit {
        missing_email: missing_email(employees),
        missing_contact: missing_contact(employees, contacts),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemediationStatus {
    Complete,
    Pending {
        missing_emails: usize,
        missing_contacts: usize,
    },
}

impl RemediationStatus {
    pub fn render(&self) -> String {
        match self {
            Self::Complete => "**SUCCESS:** All data gaps closed. 100% compliant.".to_string(),
            Self::Pending {
                missing_emails,
                missing_contacts,
            } => format!(
                "**Status:** Waiting on {missing_emails} emails and {missing_contacts} contacts."
            ),
        }
    }
}

pub fn verify_data_remediation(
    employees: &[Employee],
    contacts: &[EmergencyContact],
) -> RemediationStatus {
    let missing_emails = employees
        .iter()
        .filter(|employee| !employee.has_email())
        .count();
    let missing_contacts = missing_contact(employees, contacts).len();

    if missing_emails == 0 && missing_contacts == 0 {
        RemediationStatus::Complete
    } else {
        RemediationStatus::Pending {
            missing_emails,
            missing_contacts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: u32, email: Option<&str>) -> Employee {
        Employee {
            id: EmployeeId(id),
            name: format!("Person {id}"),
            department: "Sales".to_string(),
            role: "Account Executive".to_string(),
            email: email.map(str::to_string),
            join_date: "2022-03-01".to_string(),
            salary: 70_000.0,
        }
    }

    fn contact(id: u32) -> EmergencyContact {
        EmergencyContact {
            employee_id: EmployeeId(id),
            contact_name: "Sam Reyes".to_string(),
            relation: "Parent".to_string(),
            phone: "+1-312-555-0100".to_string(),
        }
    }

    #[test]
    fn clean_tables_yield_single_message() {
        let employees = vec![employee(101, Some("a@company.com"))];
        let audit = audit_data_integrity(&employees, &[contact(101)]);
        assert!(audit.is_clean());
        assert_eq!(audit.render(), AUDIT_CLEAN_MESSAGE);
    }

    #[test]
    fn blank_and_null_emails_are_flagged() {
        let employees = vec![
            employee(101, None),
            employee(102, Some("")),
            employee(103, Some("c@company.com")),
        ];
        let contacts = vec![contact(101), contact(102), contact(103)];
        let audit = audit_data_integrity(&employees, &contacts);

        let ids: Vec<u32> = audit.missing_email.iter().map(|gap| gap.employee_id.0).collect();
        assert_eq!(ids, vec![101, 102]);
        assert!(audit.missing_contact.is_empty());
        let report = audit.render();
        assert!(report.contains("Found 2 employees with missing emails"));
        assert!(report.contains("| 102 | Person 102 |"));
        assert!(!report.contains("emergency contacts"));
    }

    #[test]
    fn contact_gaps_are_truncated_after_ten() {
        let employees: Vec<Employee> = (101..=113)
            .map(|id| employee(id, Some("x@company.com")))
            .collect();
        let audit = audit_data_integrity(&employees, &[contact(101)]);

        assert_eq!(audit.missing_contact.len(), 12);
        assert_eq!(audit.missing_contact[0], EmployeeId(102));
        let report = audit.render();
        assert!(report.contains("Found 12 employees missing emergency contacts"));
        assert!(report.contains("IDs: 102, 103, 104, 105, 106, 107, 108, 109, 110, 111 ...and 2 more"));
        assert!(!report.contains("112"));
    }

    #[test]
    fn contacts_for_unknown_employees_do_not_hide_gaps() {
        let employees = vec![employee(101, Some("a@company.com"))];
        let audit = audit_data_integrity(&employees, &[contact(999)]);
        assert_eq!(audit.missing_contact, vec![EmployeeId(101)]);
    }

    #[test]
    fn verification_reports_remaining_counts() {
        let employees = vec![employee(101, None), employee(102, Some("b@company.com"))];
        assert_eq!(
            verify_data_remediation(&employees, &[contact(101)]),
            RemediationStatus::Pending {
                missing_emails: 1,
                missing_contacts: 1
            }
        );
        let employees = vec![employee(101, Some("a@company.com"))];
        let status = verify_data_remediation(&employees, &[contact(101)]);
        assert_eq!(status, RemediationStatus::Complete);
        assert!(status.render().contains("SUCCESS"));
    }
}
