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

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use std::time::Instant;
use tracing::debug;
use url::Url;

use crate::config::settings::PortalSettings;
use crate::domain::document::HtmlDocument;
use crate::engines::traits::{PortalSession, SessionError, SessionFactory};

/// 基于reqwest的门户会话
///
/// 每个会话拥有独立的客户端和 Cookie 存储
pub struct ReqwestSession {
    client: reqwest::Client,
}

impl ReqwestSession {
    /// 创建新会话
    ///
    /// # 参数
    ///
    /// * `settings` - 门户配置，决定 User-Agent、证书策略、超时和 Referer
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestSession)` - 新会话
    /// * `Err(SessionError)` - 客户端构建失败
    pub fn new(settings: &PortalSettings) -> Result<Self, SessionError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        if let Ok(login_url) = settings.login_url() {
            if let Ok(referer) = HeaderValue::from_str(login_url.as_str()) {
                headers.insert(REFERER, referer);
            }
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .cookie_store(true);

        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }

        if settings.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| SessionError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }

    async fn into_document(
        response: reqwest::Response,
        start: Instant,
    ) -> Result<HtmlDocument, SessionError> {
        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response.text().await?;

        debug!(
            url = %final_url,
            status,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Portal page received"
        );

        Ok(HtmlDocument::parse(final_url, status, body))
    }
}

#[async_trait]
impl PortalSession for ReqwestSession {
    async fn fetch(&self, url: &Url) -> Result<HtmlDocument, SessionError> {
        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        Self::into_document(response, start).await
    }

    async fn submit_form(
        &self,
        url: &Url,
        fields: &[(String, String)],
    ) -> Result<HtmlDocument, SessionError> {
        let start = Instant::now();
        let response = self.client.post(url.clone()).form(fields).send().await?;
        Self::into_document(response, start).await
    }
}

/// reqwest会话工厂
pub struct ReqwestSessionFactory {
    settings: PortalSettings,
}

impl ReqwestSessionFactory {
    pub fn new(settings: PortalSettings) -> Self {
        Self { settings }
    }
}

impl SessionFactory for ReqwestSessionFactory {
    fn create(&self) -> Result<Box<dyn PortalSession>, SessionError> {
        Ok(Box::new(ReqwestSession::new(&self.settings)?))
    }
}

#[cfg(test)]
#[path = "reqwest_session_test.rs"]
mod tests;
