// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::models::trace::DiagnosticTrace;

/// 无法定位字段时使用的占位值
pub const UNKNOWN: &str = "N/A";

/// 学生基本信息
///
/// 每个字段独立地回退到占位值，一个字段缺失不会影响其他字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentDetails {
    pub name: String,
    pub register_number: String,
    pub branch: String,
    pub batch: String,
}

impl Default for StudentDetails {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            register_number: UNKNOWN.to_string(),
            branch: UNKNOWN.to_string(),
            batch: UNKNOWN.to_string(),
        }
    }
}

/// 成绩表中的一行课程记录
///
/// 所有字段保持门户渲染的原始文本，不做数值解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: String,
    pub grade: String,
    pub result: String,
}

/// 单个学期的成绩
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterResult {
    #[serde(skip)]
    pub label: String,
    pub courses: Vec<Course>,
    pub sgpa: String,
}

/// 按发现顺序排列的学期成绩集合
///
/// 序列化为以学期标签为键的 JSON 对象
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterResults(Vec<SemesterResult>);

impl SemesterResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个学期，标签重复时附加序号以免覆盖已有学期
    pub fn push(&mut self, mut semester: SemesterResult) {
        if self.get(&semester.label).is_some() {
            let base = semester.label.clone();
            let mut n = 2;
            while self.get(&format!("{} ({})", base, n)).is_some() {
                n += 1;
            }
            semester.label = format!("{} ({})", base, n);
        }
        self.0.push(semester);
    }

    pub fn get(&self, label: &str) -> Option<&SemesterResult> {
        self.0.iter().find(|s| s.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemesterResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SemesterResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for semester in &self.0 {
            map.serialize_entry(&semester.label, semester)?;
        }
        map.end()
    }
}

/// 单次抓取的最终结果
///
/// 形状固定：缺失的字段以占位值出现而不是被省略
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub student_details: StudentDetails,
    pub cgpa: String,
    pub semester_results: SemesterResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DiagnosticTrace>,
}
