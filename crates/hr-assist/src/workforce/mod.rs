//! Flat workforce tables and the calculators that run over them.

pub mod analytics;
pub mod compensation;
pub mod csv_store;
pub mod domain;
pub mod generator;
mod markdown;
pub mod policy;
pub mod quality;
pub mod remediation;
pub mod router;
pub mod store;

use rand::Rng;

pub use compensation::{calculate_hike_impact, HikeImpact, HikeOutcome};
pub use csv_store::CsvTableStore;
pub use domain::{Employee, EmployeeId, Table, WorkforceTables};
pub use quality::{audit_data_integrity, verify_data_remediation, DataQualityAudit, RemediationStatus};
pub use remediation::{reset_demo_data, simulate_employee_updates, RemediationReport, ResetSummary};
pub use router::workforce_router;
pub use store::{run_blocking, MemoryTableStore, StoreError, TableStore, Workforce};

/// Tables touched by the remediation simulator.
pub const REMEDIATION_TABLES: [Table; 2] = [Table::Employees, Table::EmergencyContacts];
/// Tables rewritten by a demo reset.
pub const RESET_TABLES: [Table; 4] = [
    Table::Employees,
    Table::EmergencyContacts,
    Table::Attrition,
    Table::Engagement,
];

/// Generate every table from scratch, in dependency order.
pub fn synthesize_tables<R: Rng + ?Sized>(rng: &mut R) -> WorkforceTables {
    let employees = generator::generate_employees(rng, generator::EMPLOYEE_COUNT);
    let emergency_contacts = generator::generate_emergency_contacts(rng, &employees);
    let candidates = generator::generate_candidates(rng, generator::CANDIDATE_COUNT);
    let onboarding = generator::generate_onboarding(rng, &candidates);

    let mut tables = WorkforceTables {
        employees,
        emergency_contacts,
        candidates,
        onboarding,
        ..WorkforceTables::default()
    };
    tables.attrition = generator::generate_attrition(rng, &tables.departments());
    tables.engagement = generator::generate_engagement(rng, &tables.employees);
    tables
}

impl<S> Workforce<S>
where
    S: TableStore + 'static,
{
    /// Fill missing emails and contacts, flushing both tables.
    pub fn remediate(&self) -> Result<RemediationReport, StoreError> {
        let report = self.mutate(&REMEDIATION_TABLES, |tables, rng| {
            simulate_employee_updates(tables, rng)
        })?;
        tracing::info!(
            emails = report.email_fixes.len(),
            contacts = report.contact_fixes.len(),
            "employee self-service updates simulated"
        );
        Ok(report)
    }

    pub fn reset(&self) -> Result<ResetSummary, StoreError> {
        let summary = self.mutate(&RESET_TABLES, |tables, rng| reset_demo_data(tables, rng))?;
        tracing::info!(
            emails_removed = summary.emails_removed,
            contacts_dropped = summary.contacts_dropped,
            "demo data reset"
        );
        Ok(summary)
    }

    pub fn audit(&self) -> Result<DataQualityAudit, StoreError> {
        self.read(|tables| audit_data_integrity(&tables.employees, &tables.emergency_contacts))
    }

    pub fn verify(&self) -> Result<RemediationStatus, StoreError> {
        self.read(|tables| verify_data_remediation(&tables.employees, &tables.emergency_contacts))
    }

    pub fn hike(
        &self,
        employee_id: EmployeeId,
        hike_percent: f64,
        today: chrono::NaiveDate,
    ) -> Result<HikeOutcome, StoreError> {
        self.read(|tables| calculate_hike_impact(&tables.employees, employee_id, hike_percent, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn synthesized_tables_are_linked() {
        let tables = synthesize_tables(&mut StdRng::seed_from_u64(21));
        assert_eq!(tables.employees.len(), generator::EMPLOYEE_COUNT as usize);
        assert_eq!(tables.engagement.len(), tables.employees.len());
        assert!(tables
            .emergency_contacts
            .iter()
            .all(|contact| tables.employee(contact.employee_id).is_some()));
        let departments = tables.departments();
        assert!(tables
            .attrition
            .iter()
            .all(|exit| departments.contains(&exit.department)));
        assert!(tables.onboarding.len() <= tables.candidates.len());
    }

    #[test]
    fn remediate_then_verify_reports_complete() {
        let store = Arc::new(MemoryTableStore::default());
        let workforce =
            Workforce::open(store.clone(), StdRng::seed_from_u64(8)).expect("workforce opens");

        workforce.reset().expect("reset");
        assert!(!workforce.audit().expect("audit").is_clean());

        workforce.remediate().expect("remediate");
        assert_eq!(workforce.verify().expect("verify"), RemediationStatus::Complete);
        assert_eq!(
            store.flushed_tables(),
            vec![
                Table::Employees,
                Table::EmergencyContacts,
                Table::Attrition,
                Table::Engagement,
                Table::Employees,
                Table::EmergencyContacts,
            ]
        );
    }
}
