// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::document::{HtmlQuery, Matcher};
use crate::domain::services::extractors::{Extracted, MatchStrategy};

pub const CGPA_MARKER: &str = "CGPA";
pub const SGPA_MARKER: &str = "SGPA";

/// 承载可见内容的容器元素，`script`、`style`、`title` 等不在其中
const CONTAINER_TAGS: &[&str] = &["div", "span", "p", "td", "th", "li", "label", "b", "strong"];

/// 提取累积绩点
pub fn extract_cgpa(document: &dyn HtmlQuery) -> Extracted<String> {
    extract_marked_value(document, CGPA_MARKER)
}

/// 提取学期绩点
pub fn extract_sgpa(document: &dyn HtmlQuery) -> Extracted<String> {
    extract_marked_value(document, SGPA_MARKER)
}

/// 按标记文本提取值
///
/// 两种策略都只看内容容器：主策略查找直接文本包含标记的容器；回退策略扫描
/// 容器的完整文本，只取最内层的匹配容器。值取最后一个冒号之后的文本，
/// 没有冒号或值中仍含标记的候选（例如表头 "CGPA"）会被跳过。
pub fn extract_marked_value(document: &dyn HtmlQuery, marker: &str) -> Extracted<String> {
    let containers = Matcher::tags(CONTAINER_TAGS);

    let direct = document.find_by_own_text(&containers, &|text| text.contains(marker));
    if let Some(value) = direct
        .iter()
        .find_map(|e| value_after_colon(e.own_text(), marker))
    {
        return Extracted::found(value, MatchStrategy::MarkerText);
    }

    let candidates: Vec<_> = document
        .find_all(&containers)
        .into_iter()
        .filter(|e| e.text().contains(marker))
        .collect();

    // Candidates are in document order, so a container's matching descendants
    // immediately follow it
    let innermost = candidates
        .iter()
        .enumerate()
        .filter(|(i, outer)| {
            candidates
                .get(i + 1)
                .map_or(true, |next| !outer.contains(next))
        })
        .map(|(_, element)| element);

    for element in innermost {
        if let Some(value) = value_after_colon(element.text(), marker) {
            return Extracted::found(value, MatchStrategy::ContainerScan);
        }
    }

    Extracted::unknown()
}

fn value_after_colon(text: &str, marker: &str) -> Option<String> {
    let (_, value) = text.trim().rsplit_once(':')?;
    let value = value.trim();
    if value.is_empty() || value.contains(marker) {
        None
    } else {
        Some(value.to_string())
    }
}
