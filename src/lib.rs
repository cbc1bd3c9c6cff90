// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求DTO和学籍抓取用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含学籍记录模型、HTML文档查询能力以及认证、导航、提取和组装服务
pub mod domain;

/// 引擎模块
///
/// 实现基于Cookie的门户会话
pub mod engines;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和错误响应
pub mod presentation;

/// 工具模块
///
/// 提供错误类型、日志初始化和URL解析等辅助功能
pub mod utils;
