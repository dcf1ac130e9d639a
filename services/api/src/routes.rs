use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use hr_assist::assistant::{assistant_router, HrAssistant};
use hr_assist::workforce::{workforce_router, TableStore, Workforce};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(
    workforce: Arc<Workforce<S>>,
    assistant: Arc<HrAssistant<S>>,
) -> axum::Router
where
    S: TableStore + 'static,
{
    workforce_router(workforce)
        .merge(assistant_router(assistant))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use hr_assist::assistant::KeywordEngine;
    use hr_assist::workforce::MemoryTableStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let workforce = Arc::new(
            Workforce::open(Arc::new(MemoryTableStore::default()), StdRng::seed_from_u64(31))
                .expect("workforce opens"),
        );
        let assistant = Arc::new(HrAssistant::new(
            workforce.clone(),
            Arc::new(KeywordEngine::new()),
            4,
            Duration::from_secs(5),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(workforce, assistant).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn workforce_and_assistant_routes_are_merged() {
        let (status, body) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = get(app(true), "/api/v1/analytics/headcount").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["departments"].as_array().map(|rows| !rows.is_empty()).unwrap_or(false));

        let (status, body) = get(app(true), "/api/v1/prompts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prompts"].as_array().map(Vec::len), Some(7));
    }
}
