// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 基于内存页面表的会话，供领域服务的单元测试使用

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

use crate::domain::document::HtmlDocument;
use crate::engines::traits::{PortalSession, SessionError};

/// 固定页面
pub struct FixturePage {
    /// 重定向后的最终URL（为空时等于请求URL）
    pub final_url: Option<Url>,
    pub status: u16,
    pub body: String,
}

impl FixturePage {
    pub fn html(body: &str) -> Self {
        Self {
            final_url: None,
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn redirected(final_url: &str, body: &str) -> Self {
        Self {
            final_url: Some(Url::parse(final_url).unwrap()),
            status: 200,
            body: body.to_string(),
        }
    }
}

#[derive(Default)]
pub struct FixtureSession {
    pages: HashMap<String, FixturePage>,
    posts: HashMap<String, FixturePage>,
    fetched: Mutex<Vec<String>>,
    submitted: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FixtureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: FixturePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn post(mut self, url: &str, page: FixturePage) -> Self {
        self.posts.insert(url.to_string(), page);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.submitted.lock().unwrap().clone()
    }

    fn respond(table: &HashMap<String, FixturePage>, url: &Url) -> HtmlDocument {
        match table.get(url.as_str()) {
            Some(page) => HtmlDocument::parse(
                page.final_url.clone().unwrap_or_else(|| url.clone()),
                page.status,
                page.body.clone(),
            ),
            None => HtmlDocument::parse(url.clone(), 404, "<html><body>Not Found</body></html>"),
        }
    }
}

#[async_trait]
impl PortalSession for FixtureSession {
    async fn fetch(&self, url: &Url) -> Result<HtmlDocument, SessionError> {
        self.fetched.lock().unwrap().push(url.to_string());
        Ok(Self::respond(&self.pages, url))
    }

    async fn submit_form(
        &self,
        url: &Url,
        fields: &[(String, String)],
    ) -> Result<HtmlDocument, SessionError> {
        self.submitted
            .lock()
            .unwrap()
            .push((url.to_string(), fields.to_vec()));
        Ok(Self::respond(&self.posts, url))
    }
}
