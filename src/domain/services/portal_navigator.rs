// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

use crate::config::settings::PortalSettings;
use crate::domain::document::{HtmlDocument, HtmlQuery, Matcher};
use crate::domain::models::trace::DiagnosticTrace;
use crate::engines::traits::PortalSession;
use crate::utils::errors::CrawlError;
use crate::utils::url_utils::resolve_url;

/// 首页上记录到诊断轨迹中的链接数
const DASHBOARD_LINK_SAMPLE: usize = 10;
/// 未发现学期链接时记录的链接样本数
const FALLBACK_LINK_SAMPLE: usize = 5;

/// 学期成绩卡链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterLink {
    pub label: String,
    pub url: Url,
}

/// 学期成绩卡页面
#[derive(Debug, Clone)]
pub struct GradeCardPage {
    pub label: String,
    pub document: HtmlDocument,
}

/// 登录后导航得到的全部页面
#[derive(Debug, Clone)]
pub struct CollectedPages {
    pub dashboard: HtmlDocument,
    pub profile: HtmlDocument,
    pub full_profile: HtmlDocument,
    pub curriculum: HtmlDocument,
    pub grade_cards: Vec<GradeCardPage>,
}

/// 门户导航器
///
/// 按固定顺序访问登录后的页面，再从成绩列表页发现并逐个抓取学期成绩卡
pub struct PortalNavigator<'a> {
    settings: &'a PortalSettings,
}

impl<'a> PortalNavigator<'a> {
    pub fn new(settings: &'a PortalSettings) -> Self {
        Self { settings }
    }

    /// 收集抽取所需的页面
    ///
    /// # 参数
    ///
    /// * `session` - 已认证的会话
    /// * `landing_url` - 登录后的落地页
    /// * `trace` - 诊断轨迹
    ///
    /// # 返回值
    ///
    /// * `Ok(CollectedPages)` - 收集到的页面
    /// * `Err(CrawlError)` - 会话失效或网络失败
    pub async fn collect_pages(
        &self,
        session: &dyn PortalSession,
        landing_url: &Url,
        trace: &mut DiagnosticTrace,
    ) -> Result<CollectedPages, CrawlError> {
        let dashboard = self.visit(session, "dashboard", landing_url, trace).await?;
        let sample: Vec<&str> = dashboard
            .find_all(&Matcher::tag("a"))
            .into_iter()
            .filter_map(|a| a.attr("href"))
            .take(DASHBOARD_LINK_SAMPLE)
            .collect();
        trace.ok("dashboard_links", format!("{:?}", sample));

        let profile_url = self.settings.page_url(&self.settings.profile_path)?;
        let profile = self.visit(session, "profile", &profile_url, trace).await?;

        let full_profile_url = self.settings.page_url(&self.settings.full_profile_path)?;
        let full_profile = self
            .visit(session, "full_profile", &full_profile_url, trace)
            .await?;

        let curriculum_url = self.settings.page_url(&self.settings.curriculum_path)?;
        let curriculum = self
            .visit(session, "curriculum", &curriculum_url, trace)
            .await?;

        let links = discover_semester_links(&curriculum, &self.settings.semester_link_marker);
        if links.is_empty() {
            let anchors = curriculum.find_all(&Matcher::tag("a"));
            let sample: Vec<&str> = anchors
                .iter()
                .filter_map(|a| a.attr("href"))
                .take(FALLBACK_LINK_SAMPLE)
                .collect();
            trace.degraded(
                "semester_links",
                format!(
                    "discovered 0 semester links; anchors={} sample={:?} tables={}",
                    anchors.len(),
                    sample,
                    curriculum.find_all(&Matcher::tag("table")).len()
                ),
            );
        } else {
            trace.ok(
                "semester_links",
                format!("discovered {} semester links", links.len()),
            );
        }
        info!(count = links.len(), "Semester links discovered");

        let mut grade_cards = Vec::with_capacity(links.len());
        for (i, link) in links.into_iter().enumerate() {
            if i > 0 {
                // Pace grade-card requests
                tokio::time::sleep(self.settings.semester_delay()).await;
            }
            let document = self.visit(session, "grade_card", &link.url, trace).await?;
            grade_cards.push(GradeCardPage {
                label: link.label,
                document,
            });
        }

        Ok(CollectedPages {
            dashboard,
            profile,
            full_profile,
            curriculum,
            grade_cards,
        })
    }

    /// 抓取一个需要登录态的页面
    ///
    /// 被重定向回登录页视为会话失效；非2xx状态只记录不中止
    async fn visit(
        &self,
        session: &dyn PortalSession,
        step: &'static str,
        url: &Url,
        trace: &mut DiagnosticTrace,
    ) -> Result<HtmlDocument, CrawlError> {
        let document = session.fetch(url).await?;
        debug!(step, url = %document.url(), status = document.status(), "Visited portal page");

        if self.settings.is_login_url(document.url()) {
            trace.failed(
                step,
                format!("requested={} bounced_to={}", url, document.url()),
            );
            return Err(CrawlError::SessionNotEstablished { step });
        }

        let notes = format!("status={} url={}", document.status(), document.url());
        if document.is_success() {
            trace.ok(step, notes);
        } else {
            trace.degraded(step, notes);
        }
        Ok(document)
    }
}

/// 从成绩列表页发现学期成绩卡链接
///
/// 按 href 中的URL片段匹配，按发现顺序返回，重复的目标只保留第一次出现
pub fn discover_semester_links(document: &dyn HtmlQuery, marker: &str) -> Vec<SemesterLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.find_all(&Matcher::tag("a").attr_contains("href", marker)) {
        let href = match anchor.attr("href") {
            Some(href) => href,
            None => continue,
        };
        let url = match resolve_url(document.url(), href) {
            Ok(url) => url,
            Err(_) => continue,
        };
        if !seen.insert(url.clone()) {
            continue;
        }

        let text = anchor.trimmed_text();
        let label = if text.is_empty() {
            format!("Semester {}", links.len() + 1)
        } else {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        };
        links.push(SemesterLink { label, url });
    }

    links
}

#[cfg(test)]
#[path = "portal_navigator_test.rs"]
mod tests;
