//! Workforce views the chat surface asks for most: headcount, exit trends, engagement.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use super::domain::{AttritionRecord, Employee, EmployeeId, EngagementRecord, OnboardingRecord};
use super::markdown::MarkdownTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentHeadcount {
    pub department: String,
    pub headcount: usize,
}

pub fn headcount_by_department(employees: &[Employee]) -> Vec<DepartmentHeadcount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for employee in employees {
        *counts.entry(employee.department.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(department, headcount)| DepartmentHeadcount {
            department: department.to_string(),
            headcount,
        })
        .collect()
}

pub fn render_headcount(rows: &[DepartmentHeadcount]) -> String {
    let mut table = MarkdownTable::new(&["Department", "Headcount"]);
    for row in rows {
        table.row([row.department.clone(), row.headcount.to_string()]);
    }
    table.render()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Year,
    Month,
}

impl Granularity {
    const fn format(self) -> &'static str {
        match self {
            Self::Year => "%Y",
            Self::Month => "%Y-%m",
        }
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Month => "Month",
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "year" | "yearly" | "yoy" => Ok(Self::Year),
            "month" | "monthly" => Ok(Self::Month),
            other => Err(format!("unknown granularity '{other}' (expected year or month)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodCount {
    pub period: String,
    pub exits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttritionTrend {
    /// `None` covers every department.
    pub department: Option<String>,
    pub granularity: Granularity,
    pub periods: Vec<PeriodCount>,
    /// Exits whose date could not be parsed.
    pub skipped: usize,
}

impl AttritionTrend {
    pub fn total_exits(&self) -> usize {
        self.periods.iter().map(|period| period.exits).sum()
    }

    pub fn render(&self) -> String {
        let scope = self.department.as_deref().unwrap_or("all departments");
        if self.periods.is_empty() {
            return format!("No exits recorded for {scope}.");
        }

        let mut table = MarkdownTable::new(&[self.granularity.column(), "Exits"]);
        for period in &self.periods {
            table.row([period.period.clone(), period.exits.to_string()]);
        }
        let mut out = format!(
            "**Exits for {scope}:** {} total\n{}",
            self.total_exits(),
            table.render()
        );
        if self.skipped > 0 {
            out.push_str(&format!("\n{} exits skipped (unreadable exit date).", self.skipped));
        }
        out
    }
}

/// Exits per period, sorted by period. Department matching ignores ASCII case.
pub fn attrition_trend(
    attrition: &[AttritionRecord],
    department: Option<&str>,
    granularity: Granularity,
) -> AttritionTrend {
    let department = department.map(str::trim).filter(|name| !name.is_empty());
    let mut periods: BTreeMap<String, usize> = BTreeMap::new();
    let mut skipped = 0;

    for exit in attrition.iter().filter(|exit| {
        department
            .map(|name| exit.department.eq_ignore_ascii_case(name))
            .unwrap_or(true)
    }) {
        match exit.exited_on() {
            Some(day) => {
                *periods
                    .entry(day.format(granularity.format()).to_string())
                    .or_default() += 1
            }
            None => skipped += 1,
        }
    }

    AttritionTrend {
        department: department.map(str::to_string),
        granularity,
        periods: periods
            .into_iter()
            .map(|(period, exits)| PeriodCount { period, exits })
            .collect(),
        skipped,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentEngagement {
    pub department: String,
    pub surveyed: usize,
    pub average_engagement: f64,
    pub average_performance: f64,
}

/// Average engagement and performance per department over employees with a survey row.
pub fn engagement_summary(
    employees: &[Employee],
    engagement: &[EngagementRecord],
) -> Vec<DepartmentEngagement> {
    let departments: HashMap<EmployeeId, &str> = employees
        .iter()
        .map(|employee| (employee.id, employee.department.as_str()))
        .collect();

    let mut totals: BTreeMap<&str, (usize, u32, u32)> = BTreeMap::new();
    for row in engagement {
        let Some(department) = departments.get(&row.employee_id) else {
            continue;
        };
        let entry = totals.entry(department).or_default();
        entry.0 += 1;
        entry.1 += u32::from(row.engagement_score);
        entry.2 += u32::from(row.performance_rating);
    }

    totals
        .into_iter()
        .map(|(department, (surveyed, engagement, performance))| DepartmentEngagement {
            department: department.to_string(),
            surveyed,
            average_engagement: f64::from(engagement) / surveyed as f64,
            average_performance: f64::from(performance) / surveyed as f64,
        })
        .collect()
}

pub fn render_engagement(rows: &[DepartmentEngagement]) -> String {
    if rows.is_empty() {
        return "No engagement survey data on file.".to_string();
    }
    let mut table = MarkdownTable::new(&[
        "Department",
        "Surveyed",
        "Avg Engagement (1-10)",
        "Avg Performance (1-5)",
    ]);
    for row in rows {
        table.row([
            row.department.clone(),
            row.surveyed.to_string(),
            format!("{:.2}", row.average_engagement),
            format!("{:.2}", row.average_performance),
        ]);
    }
    table.render()
}

/// Case-insensitive substring lookup over onboarding names.
pub fn onboarding_status<'a>(
    onboarding: &'a [OnboardingRecord],
    name: &str,
) -> Vec<&'a OnboardingRecord> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    onboarding
        .iter()
        .filter(|record| record.employee_name.to_lowercase().contains(&needle))
        .collect()
}

pub fn render_onboarding(records: &[&OnboardingRecord]) -> String {
    if records.is_empty() {
        return "No record.".to_string();
    }
    let flag = |done: bool| if done { "Yes" } else { "No" };
    let mut table = MarkdownTable::new(&[
        "Employee_Name",
        "Role",
        "Start_Date",
        "Laptop_Issued",
        "Documents_Submitted",
        "Orientation_Complete",
    ]);
    for record in records {
        table.row([
            record.employee_name.clone(),
            record.role.clone(),
            record.start_date.to_string(),
            flag(record.laptop_issued).to_string(),
            flag(record.documents_submitted).to_string(),
            flag(record.orientation_complete).to_string(),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workforce::domain::TermType;
    use chrono::NaiveDate;

    fn exit(id: u32, department: &str, date: &str) -> AttritionRecord {
        AttritionRecord {
            exit_id: id,
            department: department.to_string(),
            exit_date: date.to_string(),
            reason: "Relocation".to_string(),
            term_type: TermType::Voluntary,
            tenure_years: 3,
            manager_id: EmployeeId(101),
        }
    }

    fn employee(id: u32, department: &str) -> Employee {
        Employee {
            id: EmployeeId(id),
            name: format!("Person {id}"),
            department: department.to_string(),
            role: "Analyst".to_string(),
            email: None,
            join_date: String::new(),
            salary: 1.0,
        }
    }

    #[test]
    fn headcount_is_sorted_by_department() {
        let employees = vec![
            employee(101, "Sales"),
            employee(102, "Engineering"),
            employee(103, "Sales"),
        ];
        let rows = headcount_by_department(&employees);
        assert_eq!(
            rows,
            vec![
                DepartmentHeadcount {
                    department: "Engineering".to_string(),
                    headcount: 1
                },
                DepartmentHeadcount {
                    department: "Sales".to_string(),
                    headcount: 2
                },
            ]
        );
        assert!(render_headcount(&rows).contains("| Sales | 2 |"));
    }

    #[test]
    fn attrition_groups_by_year_and_month() {
        let exits = vec![
            exit(500, "Sales", "2024-03-10"),
            exit(501, "sales", "2024-03-28"),
            exit(502, "Sales", "2025-01-02"),
            exit(503, "Engineering", "2025-01-05"),
            exit(504, "Sales", "unknown"),
        ];

        let yearly = attrition_trend(&exits, Some("Sales"), Granularity::Year);
        assert_eq!(
            yearly.periods,
            vec![
                PeriodCount {
                    period: "2024".to_string(),
                    exits: 2
                },
                PeriodCount {
                    period: "2025".to_string(),
                    exits: 1
                },
            ]
        );
        assert_eq!(yearly.skipped, 1);

        let monthly = attrition_trend(&exits, None, Granularity::Month);
        assert_eq!(monthly.periods[0].period, "2024-03");
        assert_eq!(monthly.periods[1].period, "2025-01");
        assert_eq!(monthly.periods[1].exits, 2);
        assert_eq!(monthly.total_exits(), 4);
        assert!(monthly.render().contains("all departments"));
    }

    #[test]
    fn granularity_parses_common_spellings() {
        assert_eq!("YoY".parse::<Granularity>(), Ok(Granularity::Year));
        assert_eq!(" monthly ".parse::<Granularity>(), Ok(Granularity::Month));
        assert!("weekly".parse::<Granularity>().is_err());
    }

    #[test]
    fn engagement_averages_per_department() {
        let employees = vec![employee(101, "Sales"), employee(102, "Sales")];
        let survey = NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid date");
        let engagement = vec![
            EngagementRecord {
                employee_id: EmployeeId(101),
                engagement_score: 8,
                performance_rating: 4,
                last_survey_date: survey,
            },
            EngagementRecord {
                employee_id: EmployeeId(102),
                engagement_score: 5,
                performance_rating: 3,
                last_survey_date: survey,
            },
            EngagementRecord {
                employee_id: EmployeeId(999),
                engagement_score: 1,
                performance_rating: 1,
                last_survey_date: survey,
            },
        ];
        let rows = engagement_summary(&employees, &engagement);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].surveyed, 2);
        assert_eq!(rows[0].average_engagement, 6.5);
        assert_eq!(rows[0].average_performance, 3.5);
    }

    #[test]
    fn onboarding_lookup_is_case_insensitive() {
        let records = vec![OnboardingRecord {
            employee_name: "Alex Moreau".to_string(),
            role: "Controller".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"),
            laptop_issued: true,
            documents_submitted: false,
            orientation_complete: false,
        }];
        let found = onboarding_status(&records, "alex");
        assert_eq!(found.len(), 1);
        assert!(render_onboarding(&found).contains("| Alex Moreau | Controller | 2025-12-01 | Yes | No | No |"));
        assert_eq!(render_onboarding(&onboarding_status(&records, "Jordan")), "No record.");
        assert!(onboarding_status(&records, "  ").is_empty());
    }
}
