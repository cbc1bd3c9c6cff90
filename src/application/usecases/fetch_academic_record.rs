// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::dto::academic_record_request::AcademicRecordRequestDto;
use crate::config::settings::Settings;
use crate::domain::models::academic_record::CrawlResult;
use crate::domain::models::credentials::Credentials;
use crate::domain::models::trace::DiagnosticTrace;
use crate::domain::services::authenticator::Authenticator;
use crate::domain::services::portal_navigator::{CollectedPages, PortalNavigator};
use crate::domain::services::result_assembler::ResultAssembler;
use crate::engines::traits::{PortalSession, SessionFactory};
use crate::utils::errors::{CrawlError, CrawlFailure};

// === Section: Use Case Definition ===

/// 学籍抓取用例
///
/// 每次执行都创建独立的会话：登录 → 导航 → 提取 → 组装。
/// 不同请求之间不共享任何 Cookie 或页面状态
pub struct FetchAcademicRecordUseCase {
    settings: Arc<Settings>,
    sessions: Arc<dyn SessionFactory>,
}

// === Section: Implementation ===

impl FetchAcademicRecordUseCase {
    pub fn new(settings: Arc<Settings>, sessions: Arc<dyn SessionFactory>) -> Self {
        Self { settings, sessions }
    }

    /// 执行一次抓取
    ///
    /// # 参数
    ///
    /// * `request_dto` - 请求DTO
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlResult)` - 抓取结果，字段缺失时以占位值出现
    /// * `Err(CrawlFailure)` - 校验、认证或会话失败，附带到失败为止的诊断轨迹
    pub async fn execute(
        &self,
        request_dto: AcademicRecordRequestDto,
    ) -> Result<CrawlResult, CrawlFailure> {
        // Reject before any network traffic
        let credentials = request_dto.into_credentials()?;

        let crawl_id = Uuid::new_v4();
        let span = info_span!("crawl", %crawl_id);
        self.crawl(crawl_id, credentials).instrument(span).await
    }

    async fn crawl(
        &self,
        crawl_id: Uuid,
        credentials: Credentials,
    ) -> Result<CrawlResult, CrawlFailure> {
        let mut trace = DiagnosticTrace::new(crawl_id);
        let include_debug = self.settings.server.include_debug;

        let session = match self.sessions.create() {
            Ok(session) => session,
            Err(e) => return Err(self.fail(e.into(), trace)),
        };

        match self.run(session.as_ref(), &credentials, &mut trace).await {
            Ok(pages) => {
                let result = ResultAssembler::new(&self.settings.portal).assemble(
                    &pages,
                    &credentials,
                    trace,
                    include_debug,
                );
                info!(semesters = result.semester_results.len(), "Crawl completed");
                Ok(result)
            }
            Err(e) => Err(self.fail(e, trace)),
        }
    }

    async fn run(
        &self,
        session: &dyn PortalSession,
        credentials: &Credentials,
        trace: &mut DiagnosticTrace,
    ) -> Result<CollectedPages, CrawlError> {
        let portal = &self.settings.portal;

        let landing_url = Authenticator::new(portal)
            .authenticate(session, credentials, trace)
            .await?
            .into_landing_url()?;

        PortalNavigator::new(portal)
            .collect_pages(session, &landing_url, trace)
            .await
    }

    fn fail(&self, error: CrawlError, mut trace: DiagnosticTrace) -> CrawlFailure {
        warn!(kind = error.kind(), error = %error, "Crawl failed");
        trace.failed(error.kind(), error.to_string());
        let trace = if self.settings.server.include_debug {
            Some(trace)
        } else {
            None
        };
        CrawlFailure::new(error, trace)
    }
}
