// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 认证器（authenticator）：提交登录表单并对结果分类
/// - 提取器（extractors）：从页面中定位各个字段
/// - 门户导航器（portal_navigator）：按顺序抓取登录后的页面
/// - 结果组装器（result_assembler）：把提取结果组装成最终记录
pub mod authenticator;
pub mod extractors;
pub mod portal_navigator;
pub mod result_assembler;
