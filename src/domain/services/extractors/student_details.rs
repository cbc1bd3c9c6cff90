// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::document::{HtmlQuery, Matcher};
use crate::domain::models::academic_record::StudentDetails;
use crate::domain::services::extractors::{Extracted, MatchStrategy};

/// 自由文本回退策略考虑的块元素
const TEXT_BLOCK_TAGS: &[&str] = &["div", "p", "li", "span"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    RegisterNumber,
    Branch,
    Batch,
}

/// 表格行标签到字段的映射，按顺序匹配第一个
const TABLE_LABELS: &[(&str, Field)] = &[
    ("Name", Field::Name),
    ("Register", Field::RegisterNumber),
    ("Branch", Field::Branch),
    ("Batch", Field::Batch),
];

const TEXT_MARKERS: &[(&str, Field)] = &[
    ("Name:", Field::Name),
    ("Branch:", Field::Branch),
    ("Batch:", Field::Batch),
];

/// 学生信息提取结果，每个字段单独记录命中策略
#[derive(Debug, Clone)]
pub struct DetailsExtraction {
    pub name: Extracted<String>,
    pub register_number: Extracted<String>,
    pub branch: Extracted<String>,
    pub batch: Extracted<String>,
}

impl DetailsExtraction {
    fn empty() -> Self {
        Self {
            name: Extracted::unknown(),
            register_number: Extracted::unknown(),
            branch: Extracted::unknown(),
            batch: Extracted::unknown(),
        }
    }

    fn slot(&mut self, field: Field) -> &mut Extracted<String> {
        match field {
            Field::Name => &mut self.name,
            Field::RegisterNumber => &mut self.register_number,
            Field::Branch => &mut self.branch,
            Field::Batch => &mut self.batch,
        }
    }

    /// 只在字段仍为占位值时写入，先命中的策略优先
    fn fill(&mut self, field: Field, value: &str, strategy: MatchStrategy) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let slot = self.slot(field);
        if !slot.is_found() {
            *slot = Extracted::found(value.to_string(), strategy);
        }
    }

    pub fn fields(&self) -> [(&'static str, &Extracted<String>); 4] {
        [
            ("name", &self.name),
            ("register_number", &self.register_number),
            ("branch", &self.branch),
            ("batch", &self.batch),
        ]
    }

    pub fn into_details(self) -> StudentDetails {
        StudentDetails {
            name: self.name.value,
            register_number: self.register_number.value,
            branch: self.branch.value,
            batch: self.batch.value,
        }
    }
}

/// 学生信息的数据来源
pub struct DetailsSources<'a> {
    /// 资料页（按优先级排列）
    pub profiles: Vec<&'a dyn HtmlQuery>,
    /// 登录后的首页
    pub dashboard: Option<&'a dyn HtmlQuery>,
    /// 首页姓名元素的样式类
    pub dashboard_name_class: &'a str,
    /// 提交的用户名，作为学号的最后来源
    pub username: &'a str,
}

/// 提取学生信息
///
/// 策略顺序固定：表格扫描 → 自由文本扫描 → 首页姓名元素 → 用户名（仅学号）。
/// 后面的策略只填充仍为占位值的字段。
pub fn extract_student_details(sources: &DetailsSources<'_>) -> DetailsExtraction {
    let mut details = DetailsExtraction::empty();

    for document in &sources.profiles {
        scan_tables(*document, &mut details);
    }

    for document in &sources.profiles {
        scan_free_text(*document, &mut details);
    }

    if !details.name.is_found() {
        if let Some(dashboard) = sources.dashboard {
            if let Some(element) =
                dashboard.find(&Matcher::tag("div").class(sources.dashboard_name_class))
            {
                details.fill(Field::Name, element.trimmed_text(), MatchStrategy::DashboardElement);
            }
        }
    }

    details.fill(
        Field::RegisterNumber,
        sources.username,
        MatchStrategy::Credentials,
    );

    details
}

fn scan_tables(document: &dyn HtmlQuery, details: &mut DetailsExtraction) {
    for table in document.find_all(&Matcher::tag("table")) {
        for row in document.find_within(table, &Matcher::tag("tr")) {
            let cells = document.find_within(row, &Matcher::tag("td"));
            if cells.len() < 2 {
                continue;
            }
            let label = cells[0].trimmed_text();
            if let Some((_, field)) = TABLE_LABELS.iter().find(|(l, _)| label.contains(l)) {
                details.fill(*field, cells[1].trimmed_text(), MatchStrategy::ProfileTable);
            }
        }
    }
}

fn scan_free_text(document: &dyn HtmlQuery, details: &mut DetailsExtraction) {
    for block in document.find_all(&Matcher::tags(TEXT_BLOCK_TAGS)) {
        let text = block.text();
        for (marker, field) in TEXT_MARKERS {
            if let Some(value) = text_after_marker(text, marker) {
                details.fill(*field, value, MatchStrategy::FreeText);
            }
        }
    }
}

/// 标记之后直到第一个换行的文本
fn text_after_marker<'t>(text: &'t str, marker: &str) -> Option<&'t str> {
    if !text.contains(marker) {
        return None;
    }
    let rest = text.rsplit(marker).next()?.trim();
    rest.lines().next().map(str::trim).filter(|v| !v.is_empty())
}
