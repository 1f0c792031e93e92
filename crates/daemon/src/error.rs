// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP boundary's error mapping (§7's "ambient addition"): translates
//! `SessionManagerError::kind()` into a status code and a small JSON body.
//! This is the only place in the daemon that knows about HTTP status codes —
//! the Session Manager and Task State Machine never do.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use foreman_engine::SessionManagerError;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

pub struct ApiError(pub SessionManagerError);

impl From<SessionManagerError> for ApiError {
    fn from(err: SessionManagerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            "invalid_state" => StatusCode::CONFLICT,
            "queued" => StatusCode::ACCEPTED,
            "spawn_failed" | "adapter_unavailable" => StatusCode::UNPROCESSABLE_ENTITY,
            "spawn_timeout" => StatusCode::GATEWAY_TIMEOUT,
            "no_session" => StatusCode::NOT_FOUND,
            "storage_error" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: kind,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
