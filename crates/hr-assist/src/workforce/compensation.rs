//! Salary-hike scenarios positioned against the employee's peer band.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;

use super::domain::{Employee, EmployeeId};
use super::markdown::dollars;

/// Band position above which a hike is flagged as high risk.
pub const HIGH_RISK_POSITION: f64 = 0.85;
/// Band floor as a multiple of the lowest peer salary.
pub const BAND_FLOOR_FACTOR: f64 = 0.9;
/// Band ceiling as a multiple of the highest peer salary.
pub const BAND_CEILING_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    HighRisk,
    Safe,
}

impl Advisory {
    pub fn from_position(position: f64) -> Self {
        if position > HIGH_RISK_POSITION {
            Self::HighRisk
        } else {
            Self::Safe
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::HighRisk => "**High Risk:** This hike pushes the employee to the top of the pay band. Confirm that performance justifies the deviation.",
            Self::Safe => "**Safe:** This keeps the employee within a healthy retention range.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerComparison {
    Above,
    Below,
}

impl PeerComparison {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Above => "ABOVE",
            Self::Below => "BELOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerBand {
    pub peers: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub band_min: f64,
    pub band_max: f64,
}

impl PeerBand {
    /// Band over every employee holding exactly `role`; `None` when nobody does.
    pub fn for_role(employees: &[Employee], role: &str) -> Option<Self> {
        let salaries: Vec<f64> = employees
            .iter()
            .filter(|employee| employee.role == role)
            .map(|employee| employee.salary)
            .collect();
        if salaries.is_empty() {
            return None;
        }

        let min = salaries.iter().copied().fold(f64::INFINITY, f64::min);
        let max = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = salaries.iter().sum::<f64>() / salaries.len() as f64;

        Some(Self {
            peers: salaries.len(),
            average,
            min,
            max,
            band_min: min * BAND_FLOOR_FACTOR,
            band_max: max * BAND_CEILING_FACTOR,
        })
    }

    /// Relative position of `salary` inside the band. Not clamped: values above 1.0 mean
    /// the salary sits over the ceiling. A zero-width band reports 1.0.
    pub fn position(&self, salary: f64) -> f64 {
        let width = self.band_max - self.band_min;
        if width == 0.0 {
            1.0
        } else {
            (salary - self.band_min) / width
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HikeImpact {
    pub employee_id: EmployeeId,
    pub name: String,
    pub role: String,
    /// Years since joining, one decimal; `None` when the join date is missing or invalid.
    pub tenure_years: Option<f64>,
    pub current_salary: f64,
    pub hike_percent: f64,
    pub hike_amount: f64,
    pub new_salary: f64,
    pub band: PeerBand,
    pub peer_gap: f64,
    pub comparison: PeerComparison,
    pub band_position: f64,
    pub advisory: Advisory,
}

impl HikeImpact {
    pub fn render(&self) -> String {
        let tenure = self
            .tenure_years
            .map(|years| format!("{years:.1} years"))
            .unwrap_or_else(|| "unavailable".to_string());

        let mut out = String::new();
        writeln!(out, "### Compensation Impact Report: {}", self.name).expect("write title");
        writeln!(out, "**{}** | **Tenure:** {}", self.role, tenure).expect("write tenure");
        writeln!(out).expect("write blank line");
        writeln!(out, "**1. Scenario Details**").expect("write scenario details");
        writeln!(out, "* **Current Salary:** {}", dollars(self.current_salary)).expect("write current salary");
        writeln!(
            out,
            "* **Proposed Hike:** {}% (+{})",
            self.hike_percent,
            dollars(self.hike_amount)
        )
        .expect("write proposed hike");
        writeln!(out, "* **New Salary:** {}", dollars(self.new_salary)).expect("write new salary");
        writeln!(out).expect("write blank line");
        writeln!(out, "**2. Peer Context**").expect("write peer context");
        writeln!(
            out,
            "* **Peer Average:** {} ({}, {} in role)",
            dollars(self.band.average),
            self.role,
            self.band.peers
        )
        .expect("write peer average");
        writeln!(
            out,
            "* **Comparison:** {} {} the peer average.",
            dollars(self.peer_gap),
            self.comparison.label()
        )
        .expect("write comparison");
        writeln!(out).expect("write blank line");
        writeln!(out, "**3. Pay Band Positioning**").expect("write pay band");
        writeln!(
            out,
            "* **Band:** {} - {}",
            dollars(self.band.band_min),
            dollars(self.band.band_max)
        )
        .expect("write band range");
        writeln!(
            out,
            "* **Position:** {:.1}th percentile",
            self.band_position * 100.0
        )
        .expect("write position");
        writeln!(out).expect("write blank line");
        write!(out, "**Recommendation:** {}", self.advisory.message()).expect("write recommendation");
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HikeOutcome {
    Report { impact: HikeImpact },
    NotFound { employee_id: EmployeeId },
    InvalidHikePercent { hike_percent: f64 },
}

impl HikeOutcome {
    pub fn impact(&self) -> Option<&HikeImpact> {
        match self {
            Self::Report { impact } => Some(impact),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Report { impact } => impact.render(),
            Self::NotFound { employee_id } => {
                format!("Error: employee {employee_id} not found.")
            }
            Self::InvalidHikePercent { hike_percent } => {
                format!("Error: hike percentage {hike_percent} must be between 0 and 100.")
            }
        }
    }
}

pub fn tenure_years(joined_on: Option<NaiveDate>, today: NaiveDate) -> Option<f64> {
    let days = (today - joined_on?).num_days() as f64;
    Some((days / 365.0 * 10.0).round() / 10.0)
}

/// Model a hike of `hike_percent` for `employee_id` against the role's peer band.
///
/// The id must match exactly one row; anything else is reported as not found.
pub fn calculate_hike_impact(
    employees: &[Employee],
    employee_id: EmployeeId,
    hike_percent: f64,
    today: NaiveDate,
) -> HikeOutcome {
    if !hike_percent.is_finite() || !(0.0..=100.0).contains(&hike_percent) {
        return HikeOutcome::InvalidHikePercent { hike_percent };
    }

    let mut matches = employees.iter().filter(|employee| employee.id == employee_id);
    let employee = match (matches.next(), matches.next()) {
        (Some(employee), None) => employee,
        _ => return HikeOutcome::NotFound { employee_id },
    };

    let Some(band) = PeerBand::for_role(employees, &employee.role) else {
        return HikeOutcome::NotFound { employee_id };
    };

    let current_salary = employee.salary;
    let hike_amount = current_salary * hike_percent / 100.0;
    let new_salary = current_salary + hike_amount;
    let gap = new_salary - band.average;
    let comparison = if gap > 0.0 {
        PeerComparison::Above
    } else {
        PeerComparison::Below
    };
    let band_position = band.position(new_salary);

    HikeOutcome::Report {
        impact: HikeImpact {
            employee_id,
            name: employee.name.clone(),
            role: employee.role.clone(),
            tenure_years: tenure_years(employee.joined_on(), today),
            current_salary,
            hike_percent,
            hike_amount,
            new_salary,
            peer_gap: gap.abs(),
            comparison,
            band_position,
            advisory: Advisory::from_position(band_position),
            band,
        },
    }
}
