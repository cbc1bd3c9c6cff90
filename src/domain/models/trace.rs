// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 步骤结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// 步骤成功
    Ok,
    /// 步骤完成但结果降级（例如字段回退为占位值）
    Degraded,
    /// 步骤失败，流程中止
    Failed,
}

/// 诊断轨迹中的一条记录
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub step: String,
    pub outcome: StepOutcome,
    pub notes: String,
}

/// 诊断轨迹
///
/// 抓取过程中按顺序追加，不允许修改或删除已有记录。
/// 只记录步骤、URL 和字段名，绝不包含凭据内容。
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticTrace {
    crawl_id: Uuid,
    started_at: DateTime<Utc>,
    entries: Vec<TraceEntry>,
}

impl DiagnosticTrace {
    pub fn new(crawl_id: Uuid) -> Self {
        Self {
            crawl_id,
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, step: impl Into<String>, outcome: StepOutcome, notes: impl Into<String>) {
        self.entries.push(TraceEntry {
            step: step.into(),
            outcome,
            notes: notes.into(),
        });
    }

    pub fn ok(&mut self, step: impl Into<String>, notes: impl Into<String>) {
        self.record(step, StepOutcome::Ok, notes);
    }

    pub fn degraded(&mut self, step: impl Into<String>, notes: impl Into<String>) {
        self.record(step, StepOutcome::Degraded, notes);
    }

    pub fn failed(&mut self, step: impl Into<String>, notes: impl Into<String>) {
        self.record(step, StepOutcome::Failed, notes);
    }

    pub fn crawl_id(&self) -> Uuid {
        self.crawl_id
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// 查找某个步骤的首条记录
    pub fn find(&self, step: &str) -> Option<&TraceEntry> {
        self.entries.iter().find(|e| e.step == step)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
