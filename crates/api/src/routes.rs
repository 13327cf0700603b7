//! HTTP routes and handlers.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use invoicepatch_domain::{InvoicePatchError, UpdateOutcome, UpdateRequest};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/launch", get(launch))
        .route("/connect", get(connect))
        .route("/update", post(update))
        .route("/download_pdf/{doc_number}", get(download_pdf))
        .with_state(state)
}

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>invoicepatch</title></head>
<body>
<h1>invoicepatch</h1>
<ul>
<li><a href="/launch">/launch</a> &ndash; authorize with the accounting platform</li>
<li>POST /update &ndash; apply a sparse invoice update</li>
<li>GET /download_pdf/{doc_number} &ndash; fetch an invoice PDF</li>
</ul>
</body>
</html>"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Begin the delegated-authorization flow: issue a state token and send the
/// browser to the platform's consent screen.
async fn launch(State(state): State<AppState>) -> Redirect {
    let csrf: String =
        rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();

    let url = state.auth.authorization_url(&csrf);
    *state.pending_state.lock().await = Some(csrf);

    info!("redirecting to authorization endpoint");
    Redirect::temporary(&url)
}

#[derive(Debug, Deserialize)]
struct ConnectParams {
    code: String,
    state: String,
}

/// OAuth redirect target: verify the state token, exchange the code, and
/// persist the credential.
async fn connect(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> Response {
    let expected = state.pending_state.lock().await.take();

    if expected.as_deref() != Some(params.state.as_str()) {
        warn!("authorization callback with unknown state token");
        return (
            StatusCode::BAD_REQUEST,
            Html("<h1>Authorization failed</h1><p>State mismatch; start again from /launch.</p>"),
        )
            .into_response();
    }

    match state.auth.connect(&params.code).await {
        Ok(()) => {
            info!("authorization complete, credential persisted");
            Html("<h1>Connected</h1><p>Authorization complete. You can close this window.</p>")
                .into_response()
        }
        Err(err) => {
            error!(error = %err, "authorization code exchange failed");
            (
                StatusCode::BAD_GATEWAY,
                Html("<h1>Authorization failed</h1><p>Code exchange was rejected.</p>"),
            )
                .into_response()
        }
    }
}

/// Apply a sparse update. Always answers with an [`UpdateOutcome`] body:
/// 200 on success, 400 with `{"status":"error",...}` on any failure.
async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> Response {
    match state.updater.update(&request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => {
            error!(doc_number = %request.doc_number, error = %err, "update failed");
            (StatusCode::BAD_REQUEST, Json(UpdateOutcome::from(&err))).into_response()
        }
    }
}

async fn download_pdf(
    State(state): State<AppState>,
    Path(doc_number): Path<String>,
) -> Response {
    match state.updater.download_pdf(&doc_number).await {
        Ok(bytes) => {
            let disposition = format!("attachment; filename={doc_number}.pdf");
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            error!(doc_number = %doc_number, error = %err, "pdf download failed");
            (error_status(&err), Json(UpdateOutcome::from(&err))).into_response()
        }
    }
}

/// Status mapping for the download route, where the HTTP status is the whole
/// failure signal.
fn error_status(err: &InvoicePatchError) -> StatusCode {
    match err {
        InvoicePatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        InvoicePatchError::NotFound(_) => StatusCode::NOT_FOUND,
        InvoicePatchError::Auth(_) => StatusCode::UNAUTHORIZED,
        InvoicePatchError::RemoteRejected { .. } | InvoicePatchError::Network(_) => {
            StatusCode::BAD_GATEWAY
        }
        InvoicePatchError::Config(_)
        | InvoicePatchError::Io(_)
        | InvoicePatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
