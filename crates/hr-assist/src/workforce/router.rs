use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::analytics::{self, Granularity};
use super::compensation::HikeOutcome;
use super::domain::EmployeeId;
use super::store::{run_blocking, StoreError, TableStore, Workforce};

/// Structured payload plus the markdown the chat surface shows.
#[derive(Debug, Serialize)]
struct Rendered<T> {
    #[serde(flatten)]
    data: T,
    report: String,
}

#[derive(Debug, Serialize)]
struct DirectoryEntry {
    employee_id: EmployeeId,
    name: String,
    department: String,
    role: String,
}

#[derive(Debug, Deserialize)]
pub struct HikeRequest {
    pub employee_id: EmployeeId,
    pub hike_percent: f64,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttritionQuery {
    pub department: Option<String>,
    pub by: Option<String>,
}

/// Router exposing the workforce tables, the compensation modeler and the data-quality cycle.
pub fn workforce_router<S>(workforce: Arc<Workforce<S>>) -> Router
where
    S: TableStore + 'static,
{
    Router::new()
        .route("/api/v1/employees", get(directory_handler::<S>))
        .route("/api/v1/compensation/hike", post(hike_handler::<S>))
        .route("/api/v1/quality/audit", get(audit_handler::<S>))
        .route("/api/v1/quality/remediate", post(remediate_handler::<S>))
        .route("/api/v1/quality/verify", get(verify_handler::<S>))
        .route("/api/v1/demo/reset", post(reset_handler::<S>))
        .route("/api/v1/analytics/headcount", get(headcount_handler::<S>))
        .route("/api/v1/analytics/attrition", get(attrition_handler::<S>))
        .route("/api/v1/analytics/engagement", get(engagement_handler::<S>))
        .with_state(workforce)
}

fn store_failure(error: StoreError) -> Response {
    warn!(error = %error, "workforce table access failed");
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

fn rendered<T: Serialize>(status: StatusCode, data: T, report: String) -> Response {
    (status, Json(Rendered { data, report })).into_response()
}

pub(crate) async fn directory_handler<S>(State(workforce): State<Arc<Workforce<S>>>) -> Response
where
    S: TableStore + 'static,
{
    let directory = workforce.read(|tables| {
        tables
            .employees
            .iter()
            .map(|employee| DirectoryEntry {
                employee_id: employee.id,
                name: employee.name.clone(),
                department: employee.department.clone(),
                role: employee.role.clone(),
            })
            .collect::<Vec<_>>()
    });
    match directory {
        Ok(employees) => (StatusCode::OK, Json(json!({ "employees": employees }))).into_response(),
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn hike_handler<S>(
    State(workforce): State<Arc<Workforce<S>>>,
    Json(request): Json<HikeRequest>,
) -> Response
where
    S: TableStore + 'static,
{
    let today = request.today.unwrap_or_else(|| Local::now().date_naive());
    match workforce.hike(request.employee_id, request.hike_percent, today) {
        Ok(outcome) => {
            let status = match outcome {
                HikeOutcome::Report { .. } => StatusCode::OK,
                HikeOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
                HikeOutcome::InvalidHikePercent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let report = outcome.render();
            rendered(status, outcome, report)
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn audit_handler<S>(State(workforce): State<Arc<Workforce<S>>>) -> Response
where
    S: TableStore + 'static,
{
    match workforce.audit() {
        Ok(audit) => {
            let report = audit.render();
            rendered(StatusCode::OK, audit, report)
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn remediate_handler<S>(State(workforce): State<Arc<Workforce<S>>>) -> Response
where
    S: TableStore + 'static,
{
    match run_blocking(&workforce, |workforce| workforce.remediate()).await {
        Ok(summary) => {
            let report = summary.render();
            rendered(StatusCode::OK, summary, report)
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn verify_handler<S>(State(workforce): State<Arc<Workforce<S>>>) -> Response
where
    S: TableStore + 'static,
{
    match workforce.verify() {
        Ok(status) => {
            let report = status.render();
            rendered(StatusCode::OK, status, report)
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn reset_handler<S>(State(workforce): State<Arc<Workforce<S>>>) -> Response
where
    S: TableStore + 'static,
{
    match run_blocking(&workforce, |workforce| workforce.reset()).await {
        Ok(summary) => {
            let report = summary.render();
            rendered(StatusCode::OK, summary, report)
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn headcount_handler<S>(State(workforce): State<Arc<Workforce<S>>>) -> Response
where
    S: TableStore + 'static,
{
    match workforce.read(|tables| analytics::headcount_by_department(&tables.employees)) {
        Ok(departments) => {
            let report = analytics::render_headcount(&departments);
            let payload = json!({ "departments": departments, "report": report });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn attrition_handler<S>(
    State(workforce): State<Arc<Workforce<S>>>,
    Query(query): Query<AttritionQuery>,
) -> Response
where
    S: TableStore + 'static,
{
    let granularity = match query.by.as_deref() {
        Some(raw) => match raw.parse::<Granularity>() {
            Ok(granularity) => granularity,
            Err(message) => {
                let payload = json!({ "error": message });
                return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
            }
        },
        None => Granularity::default(),
    };

    let trend = workforce.read(|tables| {
        analytics::attrition_trend(&tables.attrition, query.department.as_deref(), granularity)
    });
    match trend {
        Ok(trend) => {
            let report = trend.render();
            rendered(StatusCode::OK, trend, report)
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn engagement_handler<S>(State(workforce): State<Arc<Workforce<S>>>) -> Response
where
    S: TableStore + 'static,
{
    let summary = workforce
        .read(|tables| analytics::engagement_summary(&tables.employees, &tables.engagement));
    match summary {
        Ok(departments) => {
            let report = analytics::render_engagement(&departments);
            let payload = json!({ "departments": departments, "report": report });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => store_failure(error),
    }
}
