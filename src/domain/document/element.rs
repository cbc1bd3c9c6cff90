// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::ops::Range;
use std::sync::Arc;

/// 文档中的一个元素快照
///
/// 元素按文档先序存放，`index + 1 .. end` 即为其全部后代。
/// 整个文档的文本节点按顺序拼接成一份共享缓冲区，元素只记录自己后代文本所在的区间
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) index: usize,
    pub(crate) end: usize,
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) text: Arc<str>,
    pub(crate) text_span: Range<usize>,
    pub(crate) own_text: String,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// 全部后代文本按原样拼接（保留换行）
    pub fn text(&self) -> &str {
        &self.text[self.text_span.clone()]
    }

    /// 直接子文本节点拼接的文本
    pub fn own_text(&self) -> &str {
        &self.own_text
    }

    pub fn trimmed_text(&self) -> &str {
        self.text().trim()
    }

    /// 判断 `other` 是否为本元素的后代
    pub fn contains(&self, other: &Element) -> bool {
        other.index > self.index && other.index < self.end
    }
}

#[derive(Debug, Clone)]
enum AttrTest {
    Equals(String),
    Contains(String),
    HasClass(String),
}

/// 元素匹配条件：可选的标签名加若干属性谓词
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    tags: Vec<String>,
    attrs: Vec<(String, AttrTest)>,
}

impl Matcher {
    /// 匹配任意元素
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(tag: &str) -> Self {
        Self {
            tags: vec![tag.to_ascii_lowercase()],
            attrs: Vec::new(),
        }
    }

    /// 匹配多个标签中的任意一个
    pub fn tags(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.to_ascii_lowercase()).collect(),
            attrs: Vec::new(),
        }
    }

    pub fn attr_eq(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push((name.to_string(), AttrTest::Equals(value.to_string())));
        self
    }

    pub fn attr_contains(mut self, name: &str, fragment: &str) -> Self {
        self.attrs
            .push((name.to_string(), AttrTest::Contains(fragment.to_string())));
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.attrs
            .push(("class".to_string(), AttrTest::HasClass(class.to_string())));
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        if !self.tags.is_empty() && !self.tags.iter().any(|t| t == &element.tag) {
            return false;
        }

        self.attrs.iter().all(|(name, test)| match test {
            AttrTest::Equals(value) => element.attr(name) == Some(value.as_str()),
            AttrTest::Contains(fragment) => element
                .attr(name)
                .map(|v| v.contains(fragment.as_str()))
                .unwrap_or(false),
            AttrTest::HasClass(class) => element.has_class(class),
        })
    }
}
