// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTML文档模块
///
/// 提供基于谓词的HTML查询能力以及其基于 scraper 的唯一实现
pub mod element;
pub mod html_document;

pub use element::{Element, Matcher};
pub use html_document::{HtmlDocument, HtmlQuery};
