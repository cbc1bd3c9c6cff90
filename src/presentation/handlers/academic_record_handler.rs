// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{body::Bytes, extract::Extension, Json};
use std::sync::Arc;
use tracing::debug;

use crate::{
    application::{
        dto::academic_record_request::AcademicRecordRequestDto,
        usecases::fetch_academic_record::FetchAcademicRecordUseCase,
    },
    config::settings::Settings,
    domain::models::academic_record::CrawlResult,
    engines::traits::SessionFactory,
    utils::errors::CrawlFailure,
};

/// 学籍记录抓取处理器
///
/// 请求体按JSON解析；缺失、为空或无法解析的请求统一按校验失败处理
pub async fn get_ktu_data(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(sessions): Extension<Arc<dyn SessionFactory>>,
    body: Bytes,
) -> Result<Json<CrawlResult>, CrawlFailure> {
    let payload = AcademicRecordRequestDto::from_body(&body);
    debug!(body_len = body.len(), "Academic record requested");

    let result = FetchAcademicRecordUseCase::new(settings, sessions)
        .execute(payload)
        .await?;
    Ok(Json(result))
}
