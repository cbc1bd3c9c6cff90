// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用用例模块
///
/// 负责协调领域服务完成一次完整的学籍抓取
pub mod fetch_academic_record;
