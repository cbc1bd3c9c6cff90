// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::document::{Element, HtmlQuery, Matcher};
use crate::domain::models::academic_record::{Course, SemesterResult, UNKNOWN};
use crate::domain::services::extractors::{Extracted, MatchStrategy};

/// 一行课程记录至少需要的非空单元格数
const MIN_POPULATED_CELLS: usize = 5;

/// 从成绩卡页面提取课程列表
///
/// 按样式类定位成绩表；找不到表格时返回空列表
pub fn extract_courses(document: &dyn HtmlQuery, table_class: &str) -> Extracted<Vec<Course>> {
    match document.find(&Matcher::tag("table").class(table_class)) {
        Some(table) => Extracted::found(courses_from_table(document, table), MatchStrategy::StyledTable),
        None => Extracted::found(Vec::new(), MatchStrategy::NotFound),
    }
}

/// 解析表格中表头之后的每一行
///
/// 非空单元格少于5个的行被直接跳过
pub fn courses_from_table(document: &dyn HtmlQuery, table: &Element) -> Vec<Course> {
    document
        .find_within(table, &Matcher::tag("tr"))
        .into_iter()
        .skip(1)
        .filter_map(|row| course_from_row(document, row))
        .collect()
}

fn course_from_row(document: &dyn HtmlQuery, row: &Element) -> Option<Course> {
    let cells = document.find_within(row, &Matcher::tag("td"));
    let populated = cells
        .iter()
        .filter(|c| !c.trimmed_text().is_empty())
        .count();
    if populated < MIN_POPULATED_CELLS {
        return None;
    }

    let cell = |i: usize| -> String {
        let text = cells[i].trimmed_text();
        if text.is_empty() {
            UNKNOWN.to_string()
        } else {
            text.to_string()
        }
    };

    Some(Course {
        code: cell(0),
        name: cell(1),
        credits: cell(2),
        grade: cell(3),
        result: cell(4),
    })
}

/// 在成绩列表页内容容器中查找内嵌的学期表格
///
/// 用于没有发现任何学期链接的情况。表格依次命名为 `Semester 1..n`，
/// 只保留至少解析出一门课程的表格
pub fn extract_inline_semesters(
    document: &dyn HtmlQuery,
    container_class: &str,
) -> Vec<SemesterResult> {
    let container = match document.find(&Matcher::tag("div").class(container_class)) {
        Some(container) => container,
        None => return Vec::new(),
    };

    document
        .find_within(container, &Matcher::tag("table"))
        .into_iter()
        .enumerate()
        .filter_map(|(i, table)| {
            let courses = courses_from_table(document, table);
            if courses.is_empty() {
                return None;
            }
            Some(SemesterResult {
                label: format!("Semester {}", i + 1),
                courses,
                sgpa: UNKNOWN.to_string(),
            })
        })
        .collect()
}
