// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::models::trace::DiagnosticTrace;
use crate::engines::traits::SessionError;

/// 抓取流程错误类型
///
/// 只有会话/认证层面的失败才会上升为错误，字段提取失败只会降级为占位值
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Username and password are required")]
    Validation,

    #[error("Login form not found")]
    FormNotFound,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Login failed - still on login page")]
    LoginRejected,

    #[error("Session expired - redirected to login page")]
    SessionNotEstablished { step: &'static str },

    #[error("Upstream portal unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CrawlError {
    /// 错误分类名称，用于诊断轨迹和日志
    pub fn kind(&self) -> &'static str {
        match self {
            CrawlError::Validation => "validation",
            CrawlError::FormNotFound => "form_not_found",
            CrawlError::InvalidCredentials => "invalid_credentials",
            CrawlError::LoginRejected => "login_rejected",
            CrawlError::SessionNotEstablished { .. } => "session_not_established",
            CrawlError::UpstreamUnavailable(_) => "upstream_unavailable",
            CrawlError::Internal(_) => "internal",
        }
    }
}

impl From<SessionError> for CrawlError {
    fn from(err: SessionError) -> Self {
        if err.is_network() {
            CrawlError::UpstreamUnavailable(err.to_string())
        } else {
            CrawlError::Internal(err.to_string())
        }
    }
}

impl From<url::ParseError> for CrawlError {
    fn from(err: url::ParseError) -> Self {
        CrawlError::Internal(format!("invalid portal URL: {}", err))
    }
}

/// 抓取失败结果
///
/// 携带失败原因以及到失败为止累积的诊断轨迹
#[derive(Debug)]
pub struct CrawlFailure {
    pub error: CrawlError,
    pub trace: Option<DiagnosticTrace>,
}

impl CrawlFailure {
    pub fn new(error: CrawlError, trace: Option<DiagnosticTrace>) -> Self {
        Self { error, trace }
    }
}

impl From<CrawlError> for CrawlFailure {
    fn from(error: CrawlError) -> Self {
        Self { error, trace: None }
    }
}
