// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 文档（document）：解析后的页面及其只读查询能力
/// - 领域模型（models）：凭据、学籍记录和诊断轨迹
/// - 服务（services）：认证、导航、字段提取和结果组装
///
/// 领域层只依赖会话抽象，不关心页面是如何抓取的。
pub mod document;
pub mod models;
pub mod services;
