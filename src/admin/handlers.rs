//! Admin API handlers: index, build info, log-level get/set.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::admin::index::AdminIndex;
use crate::buildinfo::BuildInfo;
use crate::observability::RuntimeLogLevel;

/// State injected into admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub level: RuntimeLogLevel,
    pub build: BuildInfo,
    pub index: Arc<AdminIndex>,
}

pub async fn index_page(State(state): State<AdminState>) -> Html<String> {
    Html(state.index.render())
}

pub async fn version(State(state): State<AdminState>) -> Response {
    match serde_json::to_vec(&state.build) {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "serialize build info");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_log_level(State(state): State<AdminState>) -> String {
    tracing::debug!("getting log level");
    state.level.get().to_string()
}

#[derive(Debug, Deserialize)]
pub struct SetLevelForm {
    pub level: String,
}

pub async fn put_log_level(
    State(state): State<AdminState>,
    Form(form): Form<SetLevelForm>,
) -> Response {
    match state.level.set(&form.level) {
        Ok(level) => {
            tracing::debug!(level = %level, "log level changed");
            level.to_string().into_response()
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected log level");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
