// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use std::fmt;
use validator::Validate;

use crate::domain::models::credentials::Credentials;
use crate::utils::errors::CrawlError;

/// 学籍记录请求数据传输对象
///
/// 两个字段都允许缺省，缺省或为空时在创建任何会话之前被拒绝
#[derive(Default, Deserialize, Validate)]
pub struct AcademicRecordRequestDto {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

impl AcademicRecordRequestDto {
    /// 从请求体解析
    ///
    /// 请求体缺失或不是合法JSON时得到空的DTO，交给校验统一拒绝
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// 校验并转换为凭据
    pub fn into_credentials(self) -> Result<Credentials, CrawlError> {
        self.validate().map_err(|_| CrawlError::Validation)?;
        match (self.username, self.password) {
            (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
            _ => Err(CrawlError::Validation),
        }
    }
}

impl fmt::Debug for AcademicRecordRequestDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcademicRecordRequestDto")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
