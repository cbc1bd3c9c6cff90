// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;
use tracing::error;

use crate::utils::errors::{CrawlError, CrawlFailure};

/// 错误分类对应的HTTP状态码
pub fn status_for(error: &CrawlError) -> StatusCode {
    match error {
        CrawlError::Validation => StatusCode::BAD_REQUEST,
        CrawlError::FormNotFound => StatusCode::INTERNAL_SERVER_ERROR,
        CrawlError::InvalidCredentials
        | CrawlError::LoginRejected
        | CrawlError::SessionNotEstablished { .. } => StatusCode::UNAUTHORIZED,
        CrawlError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        CrawlError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for CrawlFailure {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        let mut body = json!({ "error": self.error.to_string() });
        if let Some(trace) = self.trace {
            body["debug"] = json!(trace);
        }
        (status, Json(body)).into_response()
    }
}

/// 未分类失败的兜底响应
///
/// 处理器内部 panic 时返回 500 和 `{error}`，不附带诊断轨迹
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    };
    error!(detail, "Request handler panicked");

    let body = json!({ "error": CrawlError::Internal("unexpected failure".to_string()).to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
