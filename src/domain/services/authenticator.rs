// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing::{debug, info, warn};
use url::Url;

use crate::config::settings::PortalSettings;
use crate::domain::document::{Element, HtmlDocument, HtmlQuery, Matcher};
use crate::domain::models::credentials::Credentials;
use crate::domain::models::trace::DiagnosticTrace;
use crate::engines::traits::PortalSession;
use crate::utils::errors::CrawlError;
use crate::utils::url_utils::resolve_form_action;

/// 登录结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// 登录成功，携带登录后的落地页URL
    Authenticated { landing_url: Url },
    /// 门户明确拒绝了凭据
    InvalidCredentials,
    /// 提交后仍停留在登录页
    LoginRejected { url: Url },
}

impl AuthOutcome {
    /// 将非成功结果转换为错误
    pub fn into_landing_url(self) -> Result<Url, CrawlError> {
        match self {
            AuthOutcome::Authenticated { landing_url } => Ok(landing_url),
            AuthOutcome::InvalidCredentials => Err(CrawlError::InvalidCredentials),
            AuthOutcome::LoginRejected { .. } => Err(CrawlError::LoginRejected),
        }
    }
}

/// 认证器
///
/// 加载登录页、提交登录表单并对结果分类。成功后会话的 Cookie 中携带登录令牌。
pub struct Authenticator<'a> {
    settings: &'a PortalSettings,
}

impl<'a> Authenticator<'a> {
    pub fn new(settings: &'a PortalSettings) -> Self {
        Self { settings }
    }

    /// 执行登录
    ///
    /// # 参数
    ///
    /// * `session` - 本次抓取独占的会话
    /// * `credentials` - 登录凭据
    /// * `trace` - 诊断轨迹
    ///
    /// # 返回值
    ///
    /// * `Ok(AuthOutcome)` - 登录结果分类
    /// * `Err(CrawlError)` - 登录页没有表单或网络失败
    pub async fn authenticate(
        &self,
        session: &dyn PortalSession,
        credentials: &Credentials,
        trace: &mut DiagnosticTrace,
    ) -> Result<AuthOutcome, CrawlError> {
        let login_url = self.settings.login_url()?;
        let login_page = session.fetch(&login_url).await?;
        trace.ok(
            "login_page",
            format!("status={} url={}", login_page.status(), login_page.url()),
        );

        let form = match self.locate_form(&login_page) {
            Some((form, named)) => {
                let notes = if named {
                    format!("form name={}", self.settings.login_form_name)
                } else {
                    format!(
                        "named form missing, using first form action={}",
                        form.attr("action").unwrap_or("<none>")
                    )
                };
                trace.ok("login_form", notes);
                form
            }
            None => {
                warn!(url = %login_page.url(), "Login page has no form");
                return Err(CrawlError::FormNotFound);
            }
        };

        let payload = self.build_payload(&login_page, form, credentials);
        let target = resolve_form_action(login_page.url(), form.attr("action"))?;
        let field_names: Vec<&str> = payload.iter().map(|(k, _)| k.as_str()).collect();
        debug!(target = %target, fields = ?field_names, "Submitting login form");

        let response = session.submit_form(&target, &payload).await?;
        trace.ok(
            "login_submit",
            format!(
                "post_url={} fields={:?} status={} url_after={}",
                target,
                field_names,
                response.status(),
                response.url()
            ),
        );

        let outcome = self.classify(&response);
        info!(outcome = ?outcome, "Login attempt classified");
        Ok(outcome)
    }

    /// 优先使用指定名称的表单，否则退回到页面上的第一个表单
    fn locate_form<'d>(&self, page: &'d HtmlDocument) -> Option<(&'d Element, bool)> {
        if let Some(form) = page.find(&Matcher::tag("form").attr_eq("name", &self.settings.login_form_name)) {
            return Some((form, true));
        }
        page.find(&Matcher::tag("form")).map(|form| (form, false))
    }

    /// 构造提交字段：凭据字段加上表单中其余所有具名的非提交输入框
    fn build_payload(
        &self,
        page: &HtmlDocument,
        form: &Element,
        credentials: &Credentials,
    ) -> Vec<(String, String)> {
        let mut payload = vec![
            (
                self.settings.username_field.clone(),
                credentials.username().to_string(),
            ),
            (
                self.settings.password_field.clone(),
                credentials.password().to_string(),
            ),
        ];

        for input in page.find_within(form, &Matcher::tag("input")) {
            let name = match input.attr("name").filter(|n| !n.is_empty()) {
                Some(name) => name,
                None => continue,
            };
            if input
                .attr("type")
                .map(|t| t.eq_ignore_ascii_case("submit"))
                .unwrap_or(false)
            {
                continue;
            }
            if name == self.settings.username_field || name == self.settings.password_field {
                continue;
            }

            let value = input.attr("value").unwrap_or_default().to_string();
            match payload.iter_mut().find(|(k, _)| k == name) {
                Some(existing) => existing.1 = value,
                None => payload.push((name.to_string(), value)),
            }
        }

        payload
    }

    fn classify(&self, response: &HtmlDocument) -> AuthOutcome {
        if response.body_contains(&self.settings.invalid_credentials_marker) {
            return AuthOutcome::InvalidCredentials;
        }
        if self.settings.is_login_url(response.url()) {
            return AuthOutcome::LoginRejected {
                url: response.url().clone(),
            };
        }
        AuthOutcome::Authenticated {
            landing_url: response.url().clone(),
        }
    }
}

#[cfg(test)]
#[path = "authenticator_test.rs"]
mod tests;
