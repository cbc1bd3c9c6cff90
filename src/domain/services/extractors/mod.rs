// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 字段提取器模块
///
/// 每个提取器都是对 `HtmlQuery` 的纯函数，先尝试主策略再尝试回退策略，
/// 找不到字段时返回占位值而不是错误
pub mod course_table;
pub mod marker;
pub mod student_details;

use serde::Serialize;
use std::fmt;

/// 命中字段的策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// 元素直接文本中包含标记
    MarkerText,
    /// 扫描容器元素的完整文本
    ContainerScan,
    /// 按样式类定位的成绩表
    StyledTable,
    /// 内容容器中的内嵌表格
    InlineTable,
    /// 资料页表格中的两列行
    ProfileTable,
    /// 自由文本中的 "标签:" 模式
    FreeText,
    /// 首页上的姓名元素
    DashboardElement,
    /// 使用提交的用户名
    Credentials,
    /// 未找到，使用占位值
    NotFound,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStrategy::MarkerText => "marker_text",
            MatchStrategy::ContainerScan => "container_scan",
            MatchStrategy::StyledTable => "styled_table",
            MatchStrategy::InlineTable => "inline_table",
            MatchStrategy::ProfileTable => "profile_table",
            MatchStrategy::FreeText => "free_text",
            MatchStrategy::DashboardElement => "dashboard_element",
            MatchStrategy::Credentials => "credentials",
            MatchStrategy::NotFound => "not_found",
        };
        f.write_str(name)
    }
}

/// 提取结果：值以及命中的策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    pub value: T,
    pub strategy: MatchStrategy,
}

impl<T> Extracted<T> {
    pub fn found(value: T, strategy: MatchStrategy) -> Self {
        Self { value, strategy }
    }

    pub fn is_found(&self) -> bool {
        self.strategy != MatchStrategy::NotFound
    }
}

impl Extracted<String> {
    pub fn unknown() -> Self {
        Self {
            value: crate::domain::models::academic_record::UNKNOWN.to_string(),
            strategy: MatchStrategy::NotFound,
        }
    }
}
