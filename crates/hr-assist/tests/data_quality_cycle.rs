use std::sync::Arc;

use hr_assist::workforce::domain::EmergencyContact;
use hr_assist::workforce::quality::AUDIT_CLEAN_MESSAGE;
use hr_assist::workforce::remediation::ALREADY_CLEAN_MESSAGE;
use hr_assist::workforce::{
    Employee, EmployeeId, MemoryTableStore, RemediationStatus, Table, Workforce, WorkforceTables,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn employee(id: u32, name: &str, email: Option<&str>) -> Employee {
    Employee {
        id: EmployeeId(id),
        name: name.to_string(),
        department: "Operations".to_string(),
        role: "Operations Analyst".to_string(),
        email: email.map(str::to_string),
        join_date: "2019-04-15".to_string(),
        salary: 68_000.0,
    }
}

fn contact(id: u32) -> EmergencyContact {
    EmergencyContact {
        employee_id: EmployeeId(id),
        contact_name: "Lena Fischer".to_string(),
        relation: "Sibling".to_string(),
        phone: "+1-206-555-0142".to_string(),
    }
}

fn open(tables: WorkforceTables, seed: u64) -> (Arc<MemoryTableStore>, Workforce<MemoryTableStore>) {
    let store = Arc::new(MemoryTableStore::new(tables));
    let workforce = Workforce::open(store.clone(), StdRng::seed_from_u64(seed)).expect("workforce opens");
    (store, workforce)
}

#[test]
fn audit_remediate_verify_closes_every_gap() {
    let tables = WorkforceTables {
        employees: vec![
            employee(101, "Farid Haddad", None),
            employee(102, "Ines Silva", Some("ines.silva@company.com")),
            employee(103, "Kira Larsen", Some("")),
            employee(104, "Noah Bennett", Some("noah.bennett@company.com")),
        ],
        emergency_contacts: vec![contact(102), contact(104)],
        ..WorkforceTables::default()
    };
    let (store, workforce) = open(tables, 77);

    let audit = workforce.audit().expect("audit");
    assert_eq!(audit.missing_email.len(), 2);
    assert_eq!(audit.missing_contact, vec![EmployeeId(101), EmployeeId(103)]);
    assert!(store.flushed_tables().is_empty());

    let pending = workforce.verify().expect("verify");
    assert_eq!(
        pending,
        RemediationStatus::Pending {
            missing_emails: 2,
            missing_contacts: 2
        }
    );

    let report = workforce.remediate().expect("remediate");
    assert_eq!(report.email_fixes.len(), 2);
    assert_eq!(report.contact_fixes.len(), 2);
    assert_eq!(
        store.flushed_tables(),
        vec![Table::Employees, Table::EmergencyContacts]
    );

    let flushed = store.last_flush().expect("tables flushed");
    let farid = flushed
        .employee(EmployeeId(101))
        .and_then(|employee| employee.email.clone())
        .expect("email filled");
    assert!(farid.starts_with("farid.") && farid.ends_with("@company.com"));

    assert_eq!(workforce.verify().expect("verify"), RemediationStatus::Complete);
    assert_eq!(workforce.audit().expect("audit").render(), AUDIT_CLEAN_MESSAGE);
}

#[test]
fn remediating_twice_reports_already_clean() {
    let tables = WorkforceTables {
        employees: vec![employee(101, "Farid Haddad", None)],
        ..WorkforceTables::default()
    };
    let (_, workforce) = open(tables, 5);

    assert!(!workforce.remediate().expect("first run").is_empty());
    let second = workforce.remediate().expect("second run");
    assert!(second.is_empty());
    assert_eq!(second.render(), ALREADY_CLEAN_MESSAGE);
}

#[test]
fn reset_then_audit_always_finds_gaps() {
    for seed in [1, 2, 3, 10, 99] {
        let store = Arc::new(MemoryTableStore::default());
        let workforce = Workforce::open(store, StdRng::seed_from_u64(seed)).expect("workforce opens");

        workforce.remediate().expect("remediate");
        assert!(workforce.audit().expect("audit").is_clean());

        let summary = workforce.reset().expect("reset");
        let audit = workforce.audit().expect("audit");
        assert!(!audit.is_clean(), "seed {seed} produced a clean reset");
        assert_eq!(audit.missing_email.len(), summary.emails_removed);
        assert!(!audit.missing_contact.is_empty());
        assert!(audit.render().contains("missing emails"));
    }
}

#[test]
fn seeded_sessions_are_reproducible() {
    let first = Workforce::open(Arc::new(MemoryTableStore::default()), StdRng::seed_from_u64(2024))
        .expect("workforce opens");
    let second = Workforce::open(Arc::new(MemoryTableStore::default()), StdRng::seed_from_u64(2024))
        .expect("workforce opens");

    first.reset().expect("reset");
    second.reset().expect("reset");
    assert_eq!(
        first.snapshot().expect("snapshot"),
        second.snapshot().expect("snapshot")
    );
}
