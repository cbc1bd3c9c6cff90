// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 凭据（credentials）：单次抓取使用的用户名和密码
/// - 学籍记录（academic_record）：学生信息、课程、学期成绩和最终结果
/// - 诊断轨迹（trace）：抓取过程中按顺序追加的步骤记录
pub mod academic_record;
pub mod credentials;
pub mod trace;
