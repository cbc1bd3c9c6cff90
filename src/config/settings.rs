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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// 应用程序配置设置
///
/// 包含服务器监听配置和目标门户的页面路径、标记字符串等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 门户配置
    pub portal: PortalSettings,
    /// 日志配置
    pub log: LogSettings,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// 默认过滤指令，`RUST_LOG` 存在时以其为准
    pub filter: String,
    /// 是否输出JSON格式日志
    pub json: bool,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 是否在响应中附带诊断轨迹
    pub include_debug: bool,
}

/// 门户配置设置
///
/// 页面路径和标记字符串都是针对线上门户经验得出的，门户改版时只需调整配置
#[derive(Debug, Clone, Deserialize)]
pub struct PortalSettings {
    /// 门户根地址
    pub base_url: String,
    /// 登录页路径
    pub login_path: String,
    /// 个人资料页路径
    pub profile_path: String,
    /// 完整资料页路径
    pub full_profile_path: String,
    /// 课程/成绩列表页路径
    pub curriculum_path: String,
    /// 登录表单的name属性
    pub login_form_name: String,
    /// 用户名字段名
    pub username_field: String,
    /// 密码字段名
    pub password_field: String,
    /// 凭据错误时页面中出现的文本
    pub invalid_credentials_marker: String,
    /// 表示仍处于登录页的URL片段
    pub login_url_marker: String,
    /// 学期成绩卡链接中的URL片段
    pub semester_link_marker: String,
    /// 成绩表格的样式类
    pub results_table_class: String,
    /// 首页上显示学生姓名的元素样式类
    pub dashboard_name_class: String,
    /// 成绩页内嵌表格所在容器的样式类
    pub content_container_class: String,
    /// 两次学期页面请求之间的间隔（毫秒）
    pub semester_delay_ms: u64,
    /// 是否接受无效证书
    pub accept_invalid_certs: bool,
    /// 请求使用的User-Agent
    pub user_agent: String,
    /// 请求超时时间（秒），未设置时使用客户端默认值
    pub request_timeout_secs: Option<u64>,
}

impl PortalSettings {
    /// 将门户内路径解析为绝对URL
    pub fn page_url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)?.join(path)
    }

    /// 登录页URL
    pub fn login_url(&self) -> Result<Url, url::ParseError> {
        self.page_url(&self.login_path)
    }

    pub fn semester_delay(&self) -> Duration {
        Duration::from_millis(self.semester_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// 判断URL是否指向登录页
    pub fn is_login_url(&self, url: &Url) -> bool {
        url.as_str()
            .to_lowercase()
            .contains(&self.login_url_marker.to_lowercase())
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `KTU_RECORD__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.include_debug", true)?
            .set_default("log.filter", "info,ktu_record=debug")?
            .set_default("log.json", false)?
            // Portal layout
            .set_default("portal.base_url", "https://app.ktu.edu.in")?
            .set_default("portal.login_path", "/login.htm")?
            .set_default("portal.profile_path", "/eu/stu/viewProfile.htm")?
            .set_default("portal.full_profile_path", "/eu/stu/studentDetailsView.htm")?
            .set_default("portal.curriculum_path", "/eu/stu/grade.htm")?
            .set_default("portal.login_form_name", "loginform")?
            .set_default("portal.username_field", "username")?
            .set_default("portal.password_field", "password")?
            // Markers
            .set_default(
                "portal.invalid_credentials_marker",
                "Invalid Username or Password",
            )?
            .set_default("portal.login_url_marker", "login")?
            .set_default("portal.semester_link_marker", "viewResult")?
            .set_default("portal.results_table_class", "table-bordered")?
            .set_default("portal.dashboard_name_class", "user-name")?
            .set_default("portal.content_container_class", "col-md-12")?
            // Client behaviour
            .set_default("portal.semester_delay_ms", 500)?
            .set_default("portal.accept_invalid_certs", true)?
            .set_default(
                "portal.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("KTU_RECORD").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
