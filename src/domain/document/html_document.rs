// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;

use scraper::{Html, Node};
use url::Url;

use super::element::{Element, Matcher};

/// HTML 查询能力
///
/// 提取逻辑只依赖这个接口，不直接接触具体的解析器
pub trait HtmlQuery: Send + Sync {
    /// 页面最终（重定向后）的URL
    fn url(&self) -> &Url;

    /// 第一个满足条件的元素
    fn find(&self, matcher: &Matcher) -> Option<&Element>;

    /// 所有满足条件的元素，按文档顺序
    fn find_all(&self, matcher: &Matcher) -> Vec<&Element>;

    /// `scope` 的后代中满足条件的元素
    fn find_within(&self, scope: &Element, matcher: &Matcher) -> Vec<&Element>;

    /// 满足条件且直接文本满足谓词的元素
    fn find_by_own_text(
        &self,
        matcher: &Matcher,
        predicate: &dyn Fn(&str) -> bool,
    ) -> Vec<&Element>;
}

/// 一次抓取得到的页面快照
///
/// 在创建时完成解析并转换为自有的元素列表，之后不再修改，可以安全地跨 await 持有
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    url: Url,
    status: u16,
    body: String,
    elements: Vec<Element>,
}

impl HtmlDocument {
    /// 解析HTML正文
    ///
    /// # 参数
    ///
    /// * `url` - 页面最终URL
    /// * `status` - HTTP状态码
    /// * `body` - 页面正文
    pub fn parse(url: Url, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let elements = collect(&Html::parse_document(&body));

        Self {
            url,
            status,
            body,
            elements,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 原始正文中是否包含指定文本
    pub fn body_contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }
}

/// 把解析树展开为先序元素列表
///
/// 迭代遍历，嵌套深度不占用调用栈
fn collect(html: &Html) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();
    let mut text = String::new();
    // Builder state per element: (parent, text end)
    let mut links: Vec<(Option<usize>, usize)> = Vec::new();
    let mut index_of = HashMap::new();

    for node in html.root_element().descendants() {
        let parent = node.parent().and_then(|p| index_of.get(&p.id()).copied());
        match node.value() {
            Node::Element(value) => {
                let index = elements.len();
                index_of.insert(node.id(), index);
                elements.push(Element {
                    index,
                    end: index + 1,
                    tag: value.name().to_ascii_lowercase(),
                    attrs: value
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    text: Arc::from(""),
                    text_span: text.len()..text.len(),
                    own_text: String::new(),
                });
                links.push((parent, text.len()));
            }
            Node::Text(value) => {
                text.push_str(value);
                if let Some(parent) = parent {
                    elements[parent].own_text.push_str(value);
                    links[parent].1 = text.len();
                }
            }
            _ => {}
        }
    }

    // Children always follow their parent, so a reverse pass settles every subtree
    for index in (0..elements.len()).rev() {
        let (parent, text_end) = links[index];
        let end = elements[index].end;
        if let Some(parent) = parent {
            elements[parent].end = elements[parent].end.max(end);
            links[parent].1 = links[parent].1.max(text_end);
        }
    }

    let text: Arc<str> = Arc::from(text);
    for (element, (_, text_end)) in elements.iter_mut().zip(links) {
        element.text_span.end = text_end;
        element.text = Arc::clone(&text);
    }
    elements
}

impl HtmlQuery for HtmlDocument {
    fn url(&self) -> &Url {
        &self.url
    }

    fn find(&self, matcher: &Matcher) -> Option<&Element> {
        self.elements.iter().find(|e| matcher.matches(e))
    }

    fn find_all(&self, matcher: &Matcher) -> Vec<&Element> {
        self.elements.iter().filter(|e| matcher.matches(e)).collect()
    }

    fn find_within(&self, scope: &Element, matcher: &Matcher) -> Vec<&Element> {
        let start = (scope.index + 1).min(self.elements.len());
        let end = scope.end.min(self.elements.len());
        self.elements[start..end]
            .iter()
            .filter(|e| matcher.matches(e))
            .collect()
    }

    fn find_by_own_text(
        &self,
        matcher: &Matcher,
        predicate: &dyn Fn(&str) -> bool,
    ) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| matcher.matches(e) && predicate(e.own_text()))
            .collect()
    }
}
