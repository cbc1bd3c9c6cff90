// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing::debug;

use crate::config::settings::PortalSettings;
use crate::domain::document::HtmlQuery;
use crate::domain::models::academic_record::{CrawlResult, SemesterResult, SemesterResults};
use crate::domain::models::credentials::Credentials;
use crate::domain::models::trace::{DiagnosticTrace, StepOutcome};
use crate::domain::services::extractors::course_table::{extract_courses, extract_inline_semesters};
use crate::domain::services::extractors::marker::{extract_cgpa, extract_sgpa};
use crate::domain::services::extractors::student_details::{extract_student_details, DetailsSources};
use crate::domain::services::extractors::{Extracted, MatchStrategy};
use crate::domain::services::portal_navigator::CollectedPages;

/// 结果组装器
///
/// 对收集到的页面运行各个提取器，组装成最终结果。提取失败只会降级为占位值
pub struct ResultAssembler<'a> {
    settings: &'a PortalSettings,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(settings: &'a PortalSettings) -> Self {
        Self { settings }
    }

    /// 组装最终结果
    ///
    /// # 参数
    ///
    /// * `pages` - 导航得到的页面
    /// * `credentials` - 提交的凭据，用户名作为学号的最后来源
    /// * `trace` - 诊断轨迹，每个字段的命中策略都记录在其中
    /// * `include_debug` - 是否在结果中附带诊断轨迹
    pub fn assemble(
        &self,
        pages: &CollectedPages,
        credentials: &Credentials,
        mut trace: DiagnosticTrace,
        include_debug: bool,
    ) -> CrawlResult {
        let cgpa = extract_cgpa(&pages.curriculum);
        record_field(&mut trace, "extract.cgpa", &cgpa);

        let sources = DetailsSources {
            profiles: vec![
                &pages.profile as &dyn HtmlQuery,
                &pages.full_profile as &dyn HtmlQuery,
            ],
            dashboard: Some(&pages.dashboard as &dyn HtmlQuery),
            dashboard_name_class: &self.settings.dashboard_name_class,
            username: credentials.username(),
        };
        let details = extract_student_details(&sources);
        for (field, extracted) in details.fields() {
            record_field(&mut trace, &format!("extract.student_details.{}", field), extracted);
        }

        let mut semester_results = SemesterResults::new();
        if pages.grade_cards.is_empty() {
            let inline = extract_inline_semesters(&pages.curriculum, &self.settings.content_container_class);
            trace.record(
                "extract.inline_semesters",
                outcome_for(!inline.is_empty()),
                format!("strategy={} tables={}", MatchStrategy::InlineTable, inline.len()),
            );
            for semester in inline {
                semester_results.push(semester);
            }
        } else {
            for card in &pages.grade_cards {
                let courses = extract_courses(&card.document, &self.settings.results_table_class);
                let sgpa = extract_sgpa(&card.document);
                trace.record(
                    format!("extract.semester.{}", card.label),
                    outcome_for(courses.is_found() && sgpa.is_found()),
                    format!(
                        "courses={} course_strategy={} sgpa_strategy={}",
                        courses.value.len(),
                        courses.strategy,
                        sgpa.strategy
                    ),
                );
                semester_results.push(SemesterResult {
                    label: card.label.clone(),
                    courses: courses.value,
                    sgpa: sgpa.value,
                });
            }
        }
        debug!(semesters = semester_results.len(), "Result assembled");

        CrawlResult {
            student_details: details.into_details(),
            cgpa: cgpa.value,
            semester_results,
            debug_info: if include_debug { Some(trace) } else { None },
        }
    }
}

fn outcome_for(found: bool) -> StepOutcome {
    if found {
        StepOutcome::Ok
    } else {
        StepOutcome::Degraded
    }
}

/// 记录字段命中的策略；取自凭据的值不写入轨迹
fn record_field(trace: &mut DiagnosticTrace, step: &str, extracted: &Extracted<String>) {
    let notes = match extracted.strategy {
        MatchStrategy::Credentials => format!("strategy={}", extracted.strategy),
        _ => format!("strategy={} value={}", extracted.strategy, extracted.value),
    };
    trace.record(step, outcome_for(extracted.is_found()), notes);
}
