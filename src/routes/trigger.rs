use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::{error, info};

use crate::external::github::{DispatchError, REQUIRED_ENV_VARS};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(trigger_refresh).get(method_not_allowed))
}

/// POST /
///
/// Ask GitHub Actions to re-run the data refresh workflow. The dispatch is
/// synchronous here but the workflow itself runs asynchronously, hence the
/// 202 on success.
async fn trigger_refresh(State(state): State<AppState>) -> impl IntoResponse {
    let Some(config) = state.dispatcher.config() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!(
                    "Server configuration is incomplete. Required environment variables ({}) are missing.",
                    REQUIRED_ENV_VARS
                )
            })),
        )
            .into_response();
    };

    match state.dispatcher.dispatch(config).await {
        Ok(()) => {
            info!(
                "Workflow dispatch accepted for {}/{}",
                config.repo_owner, config.repo_name
            );
            (
                StatusCode::ACCEPTED,
                Json(json!({
                    "message": "Workflow triggered successfully.",
                    "details": format!(
                        "Check the 'Actions' tab in your GitHub repository '{}/{}' for progress.",
                        config.repo_owner, config.repo_name
                    )
                })),
            )
                .into_response()
        }
        Err(DispatchError::Upstream { status, body }) => {
            error!("GitHub workflow dispatch rejected with status {}", status);
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                Json(json!({
                    "error": "Failed to trigger GitHub workflow.",
                    "github_status_code": status,
                    "github_response": body
                })),
            )
                .into_response()
        }
        Err(DispatchError::Network(msg)) => {
            error!("Could not reach the GitHub API: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("An internal error occurred while contacting GitHub API: {}", msg)
                })),
            )
                .into_response()
        }
    }
}

/// GET /
///
/// The trigger is POST-only; answer with a hint instead of a bare 404.
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({
            "message": "This endpoint is for triggering a data refresh.",
            "error": "Method not allowed. Please use a POST request to trigger the workflow."
        })),
    )
}
