//! Synthetic workforce rows for first-run and reset.
//!
//! Every function takes the generator explicitly so a seeded `StdRng` reproduces the
//! same tables.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use super::domain::{
    AttritionRecord, Candidate, EmergencyContact, Employee, EmployeeId, EngagementRecord,
    OnboardingRecord, TermType,
};

pub const EMPLOYEE_COUNT: u32 = 50;
pub const FIRST_EMPLOYEE_ID: u32 = 101;
pub const CANDIDATE_COUNT: u32 = 24;
pub const MAIL_DOMAIN: &str = "company.com";

/// Share of employees generated (or reset) without an email address.
pub const MISSING_EMAIL_RATE: f64 = 0.15;
/// Share of employees generated with an emergency contact on file.
pub const CONTACT_COVERAGE_RATE: f64 = 0.8;

const EXIT_COUNT: u32 = 80;
const FIRST_EXIT_ID: u32 = 500;
const EXIT_REASONS: &[&str] = &[
    "Better Offer",
    "Relocation",
    "Higher Studies",
    "Work-Life Balance",
    "Involuntary",
];
const EXIT_MANAGERS: &[u32] = &[101, 104, 108, 110];
/// Weighted toward 3 and 4 on the 1-5 scale.
const PERFORMANCE_RATINGS: &[u8] = &[1, 2, 3, 3, 4, 4, 5];

const FIRST_NAMES: &[&str] = &[
    "Aisha", "Ben", "Carmen", "Dev", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jamal", "Kira",
    "Liam", "Maya", "Noah", "Olga", "Priya", "Quinn", "Rafael", "Sofia", "Tomas", "Uma",
    "Victor", "Wen", "Yusuf", "Zoe",
];
const LAST_NAMES: &[&str] = &[
    "Okafor", "Lindqvist", "Navarro", "Patel", "Rossi", "Haddad", "Kim", "Tanaka", "Moreau",
    "Bennett", "Ivanova", "Walsh", "Chen", "Garcia", "Novak", "Raman", "Fischer", "Silva",
    "Mensah", "Larsen",
];
const GENERATED_RELATIONS: &[&str] = &["Spouse", "Parent", "Sibling", "Partner"];
const CANDIDATE_STAGES: &[&str] = &["Applied", "Screening", "Interview", "Offer", "Hired"];

struct DepartmentProfile {
    name: &'static str,
    roles: &'static [(&'static str, u32, u32)],
}

const DEPARTMENTS: &[DepartmentProfile] = &[
    DepartmentProfile {
        name: "Engineering",
        roles: &[
            ("Software Engineer", 85_000, 140_000),
            ("Senior Engineer", 125_000, 185_000),
            ("Engineering Manager", 160_000, 210_000),
        ],
    },
    DepartmentProfile {
        name: "Sales",
        roles: &[
            ("Account Executive", 60_000, 110_000),
            ("Sales Manager", 95_000, 150_000),
        ],
    },
    DepartmentProfile {
        name: "Marketing",
        roles: &[
            ("Marketing Specialist", 55_000, 90_000),
            ("Content Strategist", 60_000, 95_000),
        ],
    },
    DepartmentProfile {
        name: "HR",
        roles: &[
            ("HR Generalist", 50_000, 80_000),
            ("HR Business Partner", 80_000, 120_000),
        ],
    },
    DepartmentProfile {
        name: "Finance",
        roles: &[
            ("Financial Analyst", 65_000, 105_000),
            ("Controller", 120_000, 170_000),
        ],
    },
    DepartmentProfile {
        name: "Operations",
        roles: &[
            ("Operations Analyst", 55_000, 90_000),
            ("Office Manager", 50_000, 75_000),
        ],
    },
];

pub fn department_names() -> Vec<&'static str> {
    DEPARTMENTS.iter().map(|profile| profile.name).collect()
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &'a [&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

fn random_date<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(1);
    start + Duration::days(rng.gen_range(0..span))
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn random_person_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

pub fn random_phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "+1-{:03}-555-{:04}",
        rng.gen_range(201..=989),
        rng.gen_range(0..=9999)
    )
}

pub fn company_email(local_part: &str) -> String {
    format!("{local_part}@{MAIL_DOMAIN}")
}

pub fn generate_employees<R: Rng + ?Sized>(rng: &mut R, count: u32) -> Vec<Employee> {
    (0..count)
        .map(|offset| {
            let first = pick(rng, FIRST_NAMES);
            let last = pick(rng, LAST_NAMES);
            let department = &DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())];
            let (role, low, high) = department.roles[rng.gen_range(0..department.roles.len())];
            let salary = (rng.gen_range(low..=high) / 500 * 500) as f64;
            let email = if rng.gen_bool(MISSING_EMAIL_RATE) {
                None
            } else {
                Some(company_email(&format!(
                    "{}.{}",
                    first.to_lowercase(),
                    last.to_lowercase()
                )))
            };

            Employee {
                id: EmployeeId(FIRST_EMPLOYEE_ID + offset),
                name: format!("{first} {last}"),
                department: department.name.to_string(),
                role: role.to_string(),
                email,
                join_date: random_date(rng, date(2015, 1, 1), date(2025, 6, 30))
                    .format("%Y-%m-%d")
                    .to_string(),
                salary,
            }
        })
        .collect()
}

pub fn generate_emergency_contacts<R: Rng + ?Sized>(
    rng: &mut R,
    employees: &[Employee],
) -> Vec<EmergencyContact> {
    employees
        .iter()
        .filter_map(|employee| {
            if !rng.gen_bool(CONTACT_COVERAGE_RATE) {
                return None;
            }
            Some(EmergencyContact {
                employee_id: employee.id,
                contact_name: random_person_name(rng),
                relation: pick(rng, GENERATED_RELATIONS).to_string(),
                phone: random_phone(rng),
            })
        })
        .collect()
}

/// Exits spread over 2024-2025 so year-over-year and monthly views both have data.
pub fn generate_attrition<R: Rng + ?Sized>(
    rng: &mut R,
    departments: &[String],
) -> Vec<AttritionRecord> {
    let fallback: Vec<String> = department_names().into_iter().map(String::from).collect();
    let departments = if departments.is_empty() {
        &fallback
    } else {
        departments
    };

    (0..EXIT_COUNT)
        .map(|offset| {
            let term_type = if rng.gen_bool(0.5) {
                TermType::Voluntary
            } else {
                TermType::Involuntary
            };
            AttritionRecord {
                exit_id: FIRST_EXIT_ID + offset,
                department: departments[rng.gen_range(0..departments.len())].clone(),
                exit_date: random_date(rng, date(2024, 1, 1), date(2025, 12, 30))
                    .format("%Y-%m-%d")
                    .to_string(),
                reason: pick(rng, EXIT_REASONS).to_string(),
                term_type,
                tenure_years: rng.gen_range(1..=8),
                manager_id: EmployeeId(EXIT_MANAGERS[rng.gen_range(0..EXIT_MANAGERS.len())]),
            }
        })
        .collect()
}

pub fn generate_engagement<R: Rng + ?Sized>(
    rng: &mut R,
    employees: &[Employee],
) -> Vec<EngagementRecord> {
    let survey_date = date(2025, 11, 1);
    employees
        .iter()
        .map(|employee| EngagementRecord {
            employee_id: employee.id,
            engagement_score: rng.gen_range(1..=10),
            performance_rating: PERFORMANCE_RATINGS
                .choose(rng)
                .copied()
                .unwrap_or(3),
            last_survey_date: survey_date,
        })
        .collect()
}

pub fn generate_candidates<R: Rng + ?Sized>(rng: &mut R, count: u32) -> Vec<Candidate> {
    (0..count)
        .map(|offset| {
            let department = &DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())];
            let (role, _, _) = department.roles[rng.gen_range(0..department.roles.len())];
            Candidate {
                candidate_id: 900 + offset,
                name: random_person_name(rng),
                role: role.to_string(),
                department: department.name.to_string(),
                stage: pick(rng, CANDIDATE_STAGES).to_string(),
                applied_date: random_date(rng, date(2025, 8, 1), date(2025, 11, 30)),
            }
        })
        .collect()
}

/// Onboarding rows for the candidates that reached the hired stage.
pub fn generate_onboarding<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[Candidate],
) -> Vec<OnboardingRecord> {
    candidates
        .iter()
        .filter(|candidate| candidate.stage == "Hired")
        .map(|candidate| OnboardingRecord {
            employee_name: candidate.name.clone(),
            role: candidate.role.clone(),
            start_date: candidate.applied_date + Duration::days(rng.gen_range(21..=45)),
            laptop_issued: rng.gen_bool(0.7),
            documents_submitted: rng.gen_bool(0.6),
            orientation_complete: rng.gen_bool(0.4),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = generate_employees(&mut StdRng::seed_from_u64(7), EMPLOYEE_COUNT);
        let second = generate_employees(&mut StdRng::seed_from_u64(7), EMPLOYEE_COUNT);
        assert_eq!(first, second);
    }

    #[test]
    fn employees_have_sequential_ids_and_positive_salaries() {
        let employees = generate_employees(&mut StdRng::seed_from_u64(11), EMPLOYEE_COUNT);
        assert_eq!(employees.len(), EMPLOYEE_COUNT as usize);
        assert_eq!(employees[0].id, EmployeeId(FIRST_EMPLOYEE_ID));
        assert!(employees.iter().all(|employee| employee.salary > 0.0));
        assert!(employees.iter().all(|employee| employee.joined_on().is_some()));
    }

    #[test]
    fn attrition_covers_both_years_and_known_managers() {
        let departments = vec!["Engineering".to_string(), "Sales".to_string()];
        let exits = generate_attrition(&mut StdRng::seed_from_u64(3), &departments);
        assert_eq!(exits.len(), EXIT_COUNT as usize);
        assert!(exits
            .iter()
            .all(|exit| departments.contains(&exit.department)));
        assert!(exits
            .iter()
            .all(|exit| EXIT_MANAGERS.contains(&exit.manager_id.0)));
        assert!(exits
            .iter()
            .filter_map(AttritionRecord::exited_on)
            .all(|day| day >= date(2024, 1, 1) && day < date(2025, 12, 30)));
    }

    #[test]
    fn engagement_scores_stay_on_scale() {
        let employees = generate_employees(&mut StdRng::seed_from_u64(5), 20);
        let engagement = generate_engagement(&mut StdRng::seed_from_u64(5), &employees);
        assert_eq!(engagement.len(), employees.len());
        assert!(engagement
            .iter()
            .all(|row| (1..=10).contains(&row.engagement_score)
                && (1..=5).contains(&row.performance_rating)));
    }
}
