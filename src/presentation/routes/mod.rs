// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::engines::traits::SessionFactory;
use crate::presentation::errors::panic_response;
use crate::presentation::handlers::academic_record_handler;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/get-ktu-data", post(academic_record_handler::get_ktu_data))
}

/// 组装完整的应用
///
/// # 参数
///
/// * `settings` - 应用配置
/// * `sessions` - 门户会话工厂
pub fn build_app(settings: Arc<Settings>, sessions: Arc<dyn SessionFactory>) -> Router {
    routes()
        .layer(Extension(sessions))
        .layer(Extension(settings))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
