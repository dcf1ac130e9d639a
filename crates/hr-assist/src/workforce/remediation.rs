//! Simulated self-service corrections and the demo reset that undoes them.

use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt::Write as _;

use super::domain::{EmergencyContact, EmployeeId, WorkforceTables};
use super::generator;
use super::markdown::MarkdownTable;
use super::quality::missing_contact;

/// Relations assigned to synthesized emergency contacts.
pub const REMEDIATION_RELATIONS: &[&str] = &["Spouse", "Parent"];
/// Contact fixes shown in the report before the remainder is summarized.
pub const CONTACT_REPORT_LIMIT: usize = 5;
/// Share of emergency-contact rows dropped by a reset.
pub const RESET_CONTACT_DROP_RATE: f64 = 0.2;

pub const ALREADY_CLEAN_MESSAGE: &str = "**System Checked:** No missing data found.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailFix {
    pub employee_id: EmployeeId,
    pub name: String,
    pub new_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactFix {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub contact_name: String,
    pub relation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemediationReport {
    pub email_fixes: Vec<EmailFix>,
    pub contact_fixes: Vec<ContactFix>,
}

impl RemediationReport {
    pub fn is_empty(&self) -> bool {
        self.email_fixes.is_empty() && self.contact_fixes.is_empty()
    }

    pub fn render(&self) -> String {
        if self.is_empty() {
            return ALREADY_CLEAN_MESSAGE.to_string();
        }

        let mut out = String::from("**SYSTEM UPDATE SUCCESSFUL**\n");
        if !self.email_fixes.is_empty() {
            let mut table = MarkdownTable::new(&["Name", "New_Email"]);
            for fix in &self.email_fixes {
                table.row([fix.name.clone(), fix.new_email.clone()]);
            }
            write!(out, "\n{}\n", table.render()).expect("write email fixes");
        }

        if !self.contact_fixes.is_empty() {
            let mut table = MarkdownTable::new(&["Name", "New_Contact"]);
            for fix in self.contact_fixes.iter().take(CONTACT_REPORT_LIMIT) {
                table.row([
                    fix.employee_name.clone(),
                    format!("{} ({})", fix.contact_name, fix.relation),
                ]);
            }
            write!(out, "\n**Added Emergency Contacts:**\n{}\n", table.render()).expect("write contact fixes");
            let remainder = self.contact_fixes.len().saturating_sub(CONTACT_REPORT_LIMIT);
            if remainder > 0 {
                writeln!(out, "...and {remainder} more.").expect("write contact remainder");
            }
        }

        out.trim_end().to_string()
    }
}

/// Fill every missing email and emergency contact with plausible values, in place.
pub fn simulate_employee_updates<R: Rng + ?Sized>(
    tables: &mut WorkforceTables,
    rng: &mut R,
) -> RemediationReport {
    let mut report = RemediationReport::default();

    for employee in tables.employees.iter_mut().filter(|employee| !employee.has_email()) {
        let new_email = generator::company_email(&format!(
            "{}.{}",
            employee.first_name_slug(),
            rng.gen_range(100..=999)
        ));
        employee.email = Some(new_email.clone());
        report.email_fixes.push(EmailFix {
            employee_id: employee.id,
            name: employee.name.clone(),
            new_email,
        });
    }

    for employee_id in missing_contact(&tables.employees, &tables.emergency_contacts) {
        let contact_name = generator::random_person_name(rng);
        let relation = REMEDIATION_RELATIONS
            .choose(rng)
            .copied()
            .unwrap_or("Spouse")
            .to_string();
        let employee_name = tables
            .employee(employee_id)
            .map(|employee| employee.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        tables.emergency_contacts.push(EmergencyContact {
            employee_id,
            contact_name: contact_name.clone(),
            relation: relation.clone(),
            phone: generator::random_phone(rng),
        });
        report.contact_fixes.push(ContactFix {
            employee_id,
            employee_name,
            contact_name,
            relation,
        });
    }

    report
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub emails_removed: usize,
    pub contacts_dropped: usize,
    pub attrition_rows: usize,
    pub engagement_rows: usize,
}

impl ResetSummary {
    pub fn render(&self) -> String {
        format!(
            "**RESET COMPLETE:** {} emails cleared, {} emergency contacts dropped, attrition ({} rows) and engagement ({} rows) regenerated. Ready for demo.",
            self.emails_removed, self.contacts_dropped, self.attrition_rows, self.engagement_rows
        )
    }
}

/// Return the tables to a deliberately incomplete baseline.
///
/// At least one email is cleared and at least one employee is left without an emergency
/// contact whenever there are employees, so an audit right after a reset always finds gaps.
/// Contact rows are not unique per employee, so dropping rows alone may not uncover anyone.
pub fn reset_demo_data<R: Rng + ?Sized>(tables: &mut WorkforceTables, rng: &mut R) -> ResetSummary {
    tables.attrition = generator::generate_attrition(rng, &tables.departments());
    tables.engagement = generator::generate_engagement(rng, &tables.employees);

    let mut emails_removed = 0;
    for (row, employee) in tables.employees.iter_mut().enumerate() {
        if !employee.has_email() {
            employee.email = Some(generator::company_email(&format!("user{row}")));
        }
        if rng.gen_bool(generator::MISSING_EMAIL_RATE) {
            employee.email = None;
            emails_removed += 1;
        }
    }
    if emails_removed == 0 && !tables.employees.is_empty() {
        let row = rng.gen_range(0..tables.employees.len());
        tables.employees[row].email = None;
        emails_removed = 1;
    }

    let contacts = std::mem::take(&mut tables.emergency_contacts);
    let total = contacts.len();
    let drop_count = if total == 0 {
        0
    } else {
        ((total as f64 * RESET_CONTACT_DROP_RATE).round() as usize).clamp(1, total)
    };
    let mut contacts_dropped = drop_count;
    let mut kept: Vec<usize> = index::sample(rng, total, total - drop_count).into_vec();
    kept.sort_unstable();
    let mut contacts: Vec<Option<EmergencyContact>> = contacts.into_iter().map(Some).collect();
    tables.emergency_contacts = kept
        .into_iter()
        .filter_map(|position| contacts[position].take())
        .collect();

    if !tables.employees.is_empty()
        && missing_contact(&tables.employees, &tables.emergency_contacts).is_empty()
    {
        let uncovered = tables.employees[rng.gen_range(0..tables.employees.len())].id;
        let before = tables.emergency_contacts.len();
        tables
            .emergency_contacts
            .retain(|contact| contact.employee_id != uncovered);
        contacts_dropped += before - tables.emergency_contacts.len();
    }

    ResetSummary {
        emails_removed,
        contacts_dropped,
        attrition_rows: tables.attrition.len(),
        engagement_rows: tables.engagement.len(),
    }
}
