// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 解析表单的提交目标
///
/// 绝对地址原样使用；以 `/` 开头的路径拼接到门户源站；其余路径相对于站点根目录解析。
/// 缺少 action 时提交回表单所在页面。
pub fn resolve_form_action(page_url: &Url, action: Option<&str>) -> Result<Url, ParseError> {
    let action = match action.map(str::trim).filter(|a| !a.is_empty()) {
        Some(action) => action,
        None => return Ok(page_url.clone()),
    };

    if action.starts_with("http://") || action.starts_with("https://") {
        return Url::parse(action);
    }

    if action.starts_with('/') {
        return resolve_url(page_url, action);
    }

    let mut origin = page_url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    resolve_url(&origin, action)
}
