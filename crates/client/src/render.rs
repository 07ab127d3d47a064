use crate::lifecycle::Settlement;
use mlreview_classifier::{CategoryKey, IssueClassifier};
use mlreview_editor::{preview, Editor, LineIndex, PreviewLine};
use mlreview_protocol::{Finding, Severity};
use serde::Serialize;

pub const ERROR_TITLE: &str = "Error";
pub const SUCCESS_TITLE: &str = "✓ Code Analysis Complete";
pub const SUCCESS_MESSAGE: &str = "No issues found! Your code looks good.";
pub const REPORT_HEADING: &str = "ML Code Analysis Results";
pub const SUGGESTION_MARKER: &str = "💡 Suggestion:";

/// Source text plus its line table, used only to decorate findings with previews.
#[derive(Debug, Clone, Copy)]
pub struct SourceLines<'a> {
    text: &'a str,
    index: &'a LineIndex,
}

impl<'a> SourceLines<'a> {
    #[must_use]
    pub const fn new(text: &'a str, index: &'a LineIndex) -> Self {
        Self { text, index }
    }

    #[must_use]
    pub fn from_editor(editor: &'a Editor) -> Self {
        Self::new(editor.text(), editor.line_index())
    }

    fn preview(&self, line: u32) -> Vec<PreviewLine> {
        preview(self.index, self.text, line as usize)
    }
}

/// Read-only presentation tree for a settled submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
    ErrorPanel { title: String, message: String },
    SuccessPanel { title: String, message: String },
    Report(Report),
}

impl Presentation {
    #[must_use]
    pub fn error_panel(message: impl Into<String>) -> Self {
        Self::ErrorPanel {
            title: ERROR_TITLE.to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success_panel() -> Self {
        Self::SuccessPanel {
            title: SUCCESS_TITLE.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub heading: String,
    pub summary: String,
    pub total: usize,
    pub sections: Vec<Section>,
}

impl Report {
    /// Section titles in display order, e.g. `"Data-Related Errors (1)"`.
    #[must_use]
    pub fn section_titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub key: CategoryKey,
    pub title: String,
    pub category_title: String,
    pub priority: u8,
    pub findings: Vec<FindingView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindingView {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_badge: Option<String>,
    pub confidence_badge: String,
    pub message: String,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preview: Vec<PreviewLine>,
}

impl FindingView {
    fn build(finding: &Finding, source: Option<SourceLines<'_>>) -> Self {
        let preview = match source {
            Some(source) if finding.has_line() => source.preview(finding.line),
            _ => Vec::new(),
        };
        Self {
            severity: finding.severity,
            line_badge: finding
                .has_line()
                .then(|| format!("Line {}", finding.line)),
            confidence_badge: format!("{}% confidence", finding.confidence_percent()),
            message: finding.message.clone(),
            suggestion: format!("{SUGGESTION_MARKER} {}", finding.suggestion),
            preview,
        }
    }
}

/// `"Found 1 issue"` / `"Found N issues"`.
#[must_use]
pub fn summary_line(total: usize) -> String {
    let noun = if total == 1 { "issue" } else { "issues" };
    format!("Found {total} {noun}")
}

/// Group `findings` by category and lay the sections out by display priority.
#[must_use]
pub fn render_report(
    findings: &[Finding],
    classifier: &IssueClassifier,
    source: Option<SourceLines<'_>>,
) -> Report {
    let classified = classifier.classify(findings);
    let sections = classified
        .sections()
        .into_iter()
        .map(|(category, bucket)| Section {
            key: category.key,
            title: format!("{} ({})", category.title, bucket.len()),
            category_title: category.title.to_string(),
            priority: category.display_priority,
            findings: bucket
                .iter()
                .map(|finding| FindingView::build(finding, source))
                .collect(),
        })
        .collect();
    let total = classified.total();
    Report {
        heading: REPORT_HEADING.to_string(),
        summary: summary_line(total),
        total,
        sections,
    }
}

/// Turn a settlement into its presentation. `source` only adds code previews.
#[must_use]
pub fn render(
    settlement: &Settlement,
    classifier: &IssueClassifier,
    source: Option<SourceLines<'_>>,
) -> Presentation {
    match settlement {
        Settlement::Success { findings } => {
            Presentation::Report(render_report(findings, classifier, source))
        }
        Settlement::EmptySuccess => Presentation::success_panel(),
        other => Presentation::error_panel(other.user_message().unwrap_or_default()),
    }
}
