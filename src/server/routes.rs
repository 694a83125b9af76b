//! Router and request handlers.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Datelike;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use super::{ApiError, AppState, NotificationPayload, TaskRequest};
use crate::github::Publisher;
use crate::site::{Attachments, BundleSpec, SiteBundle, repo_name, seed_from_email};
use crate::webhook::{HttpClient, Notify};

/// Largest accepted `POST /task` body; attachments arrive inline as `data:` URLs.
pub const TASK_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Builds the complete router: `GET /health` and `POST /task`.
pub fn create_router<P, N, H>(state: AppState<P, N, H>) -> Router
where
    P: Publisher + 'static,
    N: Notify + 'static,
    H: HttpClient + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/task",
            post(submit_task::<P, N, H>).layer(DefaultBodyLimit::max(TASK_BODY_LIMIT)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Generates, publishes and announces a site for one task.
///
/// Responds once the inline notification attempt has finished; a failed
/// attempt keeps retrying in the background and is reported as
/// `"notified": false`.
async fn submit_task<P, N, H>(
    State(state): State<AppState<P, N, H>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError>
where
    P: Publisher + 'static,
    N: Notify + 'static,
    H: HttpClient + 'static,
{
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))?;
    let request = TaskRequest::parse(&body, &state.settings.shared_secret)?;

    let repo = repo_name(&request.task);
    tracing::info!(task = %request.task, round = request.round, %repo, "Received task");

    let attachments = Attachments::decode(&request.attachments);
    let seed = seed_from_email(request.email.as_deref());
    let page = state
        .generator
        .generate(&request.task, &request.brief, &seed, &attachments)
        .await?;

    let bundle = SiteBundle::build(
        state.generator.renderer(),
        &BundleSpec {
            task: &request.task,
            round: request.round,
            brief: &request.brief,
            index_html: &page.html,
            source: page.source.describe(),
            owner: &state.settings.license_owner,
            year: chrono::Utc::now().year(),
        },
    )?;

    let site = state.publisher.publish(&repo, &bundle).await?;

    let payload = NotificationPayload::new(&request, &site).to_json()?;
    let dispatch = state
        .dispatcher
        .dispatch(request.evaluation_url, payload)
        .await;

    Ok(Json(json!({
        "ok": true,
        "repo": site.repo,
        "commit": site.commit_sha,
        "pages_url": site.pages_url,
        "notified": dispatch.is_delivered(),
    })))
}
