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
use thiserror::Error;
use url::Url;

use crate::domain::document::HtmlDocument;

/// 会话错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 客户端构建失败
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

impl SessionError {
    /// 判断是否为网络层面的失败
    pub fn is_network(&self) -> bool {
        matches!(self, SessionError::RequestFailed(_))
    }
}

/// 门户会话特质
///
/// 一个会话只属于一次抓取，持有该次抓取的 Cookie 和默认请求头
#[async_trait]
pub trait PortalSession: Send + Sync {
    /// GET 页面并跟随重定向
    async fn fetch(&self, url: &Url) -> Result<HtmlDocument, SessionError>;

    /// 以表单编码 POST 字段并跟随重定向
    async fn submit_form(
        &self,
        url: &Url,
        fields: &[(String, String)],
    ) -> Result<HtmlDocument, SessionError>;
}

/// 会话工厂特质
///
/// 每次抓取调用一次 `create`，会话之间不共享 Cookie
pub trait SessionFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn PortalSession>, SessionError>;
}
