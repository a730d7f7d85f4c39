use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::dataset::CategoryFilter;
use crate::drilldown::{DrillOutcome, DrillRequest, FilterInfo};
use crate::error::{BenchscopeError, Result};
use crate::interface::BenchInterface;

type Shared = Arc<BenchInterface>;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Returned when a drill-down matched nothing. Not an error.
#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
    pub filter_info: FilterInfo,
}

fn error_response(e: &BenchscopeError) -> Response {
    let status = if e.is_client_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR };
    warn!(error = %e, code = status.as_u16(), "request failed");
    (status, Json(ErrorBody { error: e.to_string() })).into_response()
}

/// Runs synchronous engine work off the async executor.
async fn blocking<T, F>(work: F) -> std::result::Result<T, Response>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            warn!(error = %e, "join error");
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: "Join error".into() })).into_response())
        }
    }
}

async fn respond<T, F>(work: F) -> Response
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    match blocking(work).await {
        Ok(value) => Json(value).into_response(),
        Err(response) => response,
    }
}

/// Unwraps a JSON request body, answering a malformed one with `{ error }`.
fn payload<T>(body: std::result::Result<Json<T>, JsonRejection>) -> std::result::Result<T, Response> {
    body.map(|Json(value)| value)
        .map_err(|rejection| error_response(&BenchscopeError::InvalidParameter(rejection.body_text())))
}

async fn load_dataset(State(iface): State<Shared>, body: String) -> Response {
    respond(move || iface.load_json(&body)).await
}

async fn insights(
    State(iface): State<Shared>,
    body: std::result::Result<Json<CategoryFilter>, JsonRejection>,
) -> Response {
    match payload(body) {
        Ok(categories) => respond(move || iface.insights(&categories)).await,
        Err(response) => response,
    }
}

async fn key_metrics(
    State(iface): State<Shared>,
    body: std::result::Result<Json<CategoryFilter>, JsonRejection>,
) -> Response {
    match payload(body) {
        Ok(categories) => respond(move || iface.key_metrics(&categories)).await,
        Err(response) => response,
    }
}

async fn drill_down(
    State(iface): State<Shared>,
    body: std::result::Result<Json<DrillRequest>, JsonRejection>,
) -> Response {
    let request = match payload(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let started = std::time::Instant::now();
    let outcome = match blocking(move || iface.drill_down(&request)).await {
        Ok(outcome) => outcome,
        Err(response) => return response,
    };
    let ms = started.elapsed().as_secs_f64() * 1000.0;
    match outcome {
        DrillOutcome::Page(page) => {
            info!(ms, total = page.total_count, page = page.page, "drill-down complete");
            Json(page).into_response()
        }
        DrillOutcome::Empty { message, filter_info } => {
            info!(ms, "drill-down matched nothing");
            Json(MessageBody { message, filter_info }).into_response()
        }
        DrillOutcome::Export(file) => {
            info!(ms, filename = %file.filename, bytes = file.bytes.len(), "drill-down exported");
            let disposition = format!("attachment; filename=\"{}\"", file.filename);
            (
                [
                    (header::CONTENT_TYPE, file.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                file.bytes,
            )
                .into_response()
        }
    }
}

async fn coverage(State(iface): State<Shared>) -> Response {
    respond(move || iface.coverage()).await
}

async fn filter_options(State(iface): State<Shared>) -> Response {
    respond(move || iface.filter_options()).await
}

async fn preview(State(iface): State<Shared>) -> Response {
    respond(move || iface.preview()).await
}

pub fn router(interface: Shared) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);
    Router::new()
        .route("/v1/dataset", post(load_dataset))
        .route("/v1/insights", post(insights))
        .route("/v1/metrics", post(key_metrics))
        .route("/v1/drilldown", post(drill_down))
        .route("/v1/coverage", get(coverage))
        .route("/v1/filters", get(filter_options))
        .route("/v1/preview", get(preview))
        .layer(cors)
        .with_state(interface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::extract::FromRequest;
    use axum::http::Request;

    use crate::settings::Settings;

    async fn json_body<T>(text: &'static str) -> std::result::Result<Json<T>, JsonRejection>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(text))
            .expect("request ok");
        Json::<T>::from_request(request, &()).await
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body ok");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn malformed_drill_request_gets_an_error_body() {
        let iface = Arc::new(BenchInterface::new(&Settings::default()));
        let response = drill_down(State(iface), json_body("{not json").await).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().is_some_and(|e| e.starts_with("Invalid request parameter")));
    }

    #[tokio::test]
    async fn mistyped_filter_gets_an_error_body() {
        let iface = Arc::new(BenchInterface::new(&Settings::default()));
        let response = insights(State(iface), json_body(r#"{"statuses": 3}"#).await).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn well_formed_request_without_a_dataset_is_a_client_error() {
        let iface = Arc::new(BenchInterface::new(&Settings::default()));
        let response = key_metrics(State(iface), json_body("{}").await).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "No data available. Please upload a file or generate sample data."
        );
    }
}
