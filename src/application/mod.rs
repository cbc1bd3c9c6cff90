// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求DTO和学籍抓取用例
/// 领域服务只通过会话抽象访问门户，用例负责组装它们
pub mod dto;
pub mod usecases;
