//! Rendering of the Labor Management Report.
//!
//! Layout and styling come from [`Theme`]; the data comes from
//! [`LaborReport`]. A real document backend (PDF) would implement
//! [`DocumentRenderer`] the same way the bundled text and JSON renderers do.

use crate::errors::ServiceError;
use crate::models::task::percent;
use crate::services::reports::LaborReport;
use crate::theme::Theme;

pub trait DocumentRenderer {
    /// Renders the whole document as bytes ready to be written out.
    fn render(&self, report: &LaborReport, theme: &Theme) -> Result<Vec<u8>, ServiceError>;

    /// Suggested file extension, without the dot.
    fn extension(&self) -> &'static str;
}

/// Fixed-width plain text document, paginated by `theme.rows_per_page`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

/// Structured report rows as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

fn cell(value: &str, width: usize) -> String {
    let truncated: String = if value.chars().count() > width {
        value.chars().take(width.saturating_sub(1)).chain(['~']).collect()
    } else {
        value.to_string()
    };
    format!("{truncated:<width$}")
}

fn row(values: &[String], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, width)| cell(value, *width))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

fn rule(widths: &[usize]) -> String {
    "-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1))
}

enum Line {
    Text(String),
    Blank,
}

impl TextRenderer {
    fn header(report: &LaborReport, theme: &Theme) -> Vec<String> {
        let s = &report.summary;
        vec![
            theme.brand.to_uppercase(),
            theme.report_title.clone(),
            format!("Period: {} to {}", report.from, report.to),
            format!("Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M UTC")),
            String::new(),
            format!(
                "Workers: {} ({} available)   Tasks: {} ({} completed, {}%)",
                s.total_workers,
                s.available_workers,
                s.total_tasks,
                s.completed_tasks,
                percent(s.completed_tasks, s.total_tasks)
            ),
            String::new(),
        ]
    }

    fn body(report: &LaborReport, theme: &Theme) -> Vec<Line> {
        let wc = &theme.worker_columns;
        let tc = &theme.task_columns;
        let mut lines = vec![Line::Text("WORKFORCE".into())];
        lines.push(Line::Text(row(
            &["ID", "Name", "Role", "Assigned", "Completed", "Rate"].map(String::from),
            wc,
        )));
        lines.push(Line::Text(rule(wc)));
        for worker in &report.workers {
            lines.push(Line::Text(row(
                &[
                    worker.worker_id.clone(),
                    worker.name.clone(),
                    worker.job_role.to_string(),
                    worker.assigned.to_string(),
                    worker.completed.to_string(),
                    format!("{}%", worker.completion_rate),
                ],
                wc,
            )));
        }
        lines.push(Line::Blank);
        lines.push(Line::Text("TASKS".into()));
        lines.push(Line::Text(row(
            &["ID", "Title", "Status", "Priority", "Date", "Workers"].map(String::from),
            tc,
        )));
        lines.push(Line::Text(rule(tc)));
        if report.tasks.is_empty() {
            lines.push(Line::Text("No tasks scheduled in this period.".into()));
        }
        for task in &report.tasks {
            lines.push(Line::Text(row(
                &[
                    task.task_id.clone(),
                    task.title.clone(),
                    task.status.to_string(),
                    task.priority.to_string(),
                    task.scheduled_date.to_string(),
                    task.workers.join(", "),
                ],
                tc,
            )));
        }
        lines
    }
}

impl DocumentRenderer for TextRenderer {
    fn render(&self, report: &LaborReport, theme: &Theme) -> Result<Vec<u8>, ServiceError> {
        if theme.rows_per_page == 0 {
            return Err(ServiceError::ConfigError("rows_per_page must be positive".into()));
        }
        let body = Self::body(report, theme);
        let pages: Vec<&[Line]> = body.chunks(theme.rows_per_page).collect();
        let total = pages.len();

        let mut out = Self::header(report, theme).join("\n");
        out.push('\n');
        for (index, page) in pages.iter().enumerate() {
            for line in page.iter() {
                if let Line::Text(text) = line {
                    out.push_str(text);
                }
                out.push('\n');
            }
            out.push_str(&format!(
                "\n{}  |  Report {}  |  Page {} of {}\n",
                theme.brand,
                report.report_id,
                index + 1,
                total
            ));
            if index + 1 < total {
                out.push('\x0c');
                out.push('\n');
            }
        }
        Ok(out.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

impl DocumentRenderer for JsonRenderer {
    fn render(&self, report: &LaborReport, _theme: &Theme) -> Result<Vec<u8>, ServiceError> {
        Ok(serde_json::to_vec_pretty(report)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reports::{ReportSummary, WorkerRow};
    use crate::models::JobRole;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn report(workers: usize) -> LaborReport {
        LaborReport {
            report_id: "LMR-20261019-ABC123".into(),
            generated_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
            from: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
            summary: ReportSummary {
                total_workers: workers,
                ..ReportSummary::default()
            },
            workers: (0..workers)
                .map(|i| WorkerRow {
                    worker_id: format!("W-{i:03}"),
                    name: format!("Worker number {i} with a rather long name"),
                    job_role: JobRole::Harvesting,
                    is_available: true,
                    assigned: 0,
                    completed: 0,
                    completion_rate: 0,
                })
                .collect(),
            tasks: Vec::new(),
        }
    }

    #[test]
    fn footer_carries_report_id_and_page_numbers() {
        let theme = Theme {
            rows_per_page: 6,
            ..Theme::default()
        };
        let text = String::from_utf8(TextRenderer.render(&report(8), &theme).unwrap()).unwrap();
        assert!(text.starts_with(&theme.brand.to_uppercase()));
        assert!(text.contains("Report LMR-20261019-ABC123  |  Page 1 of 3"));
        assert!(text.contains("Page 3 of 3"));
        assert!(!text.contains("Page 4 of"));
        assert!(text.contains("No tasks scheduled in this period."));
    }

    #[test]
    fn long_cells_are_truncated_to_column_width() {
        assert_eq!(cell("abcdef", 4), "abc~");
        assert_eq!(cell("ab", 4), "ab  ");
    }

    #[test]
    fn json_renderer_uses_camel_case() {
        let bytes = JsonRenderer.render(&report(1), &Theme::default()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["reportId"], "LMR-20261019-ABC123");
        assert_eq!(value["workers"][0]["jobRole"], "Harvesting");
    }
}
