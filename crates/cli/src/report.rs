use console::style;
use mlreview_classifier::Category;
use mlreview_client::{FindingView, Presentation, Report};
use mlreview_editor::PreviewLine;
use mlreview_protocol::Severity;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub previews: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { previews: true }
    }
}

pub fn render_presentation(presentation: &Presentation, options: ReportOptions) -> String {
    match presentation {
        Presentation::ErrorPanel { title, message } => {
            format!("{}\n{message}", style(title).red().bold())
        }
        Presentation::SuccessPanel { title, message } => {
            format!("{}\n{message}", style(title).green().bold())
        }
        Presentation::Report(report) => render_report(report, options),
    }
}

fn render_report(report: &Report, options: ReportOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style(&report.heading).bold().underlined()));
    out.push_str(&format!("{}\n", report.summary));
    for section in &report.sections {
        out.push('\n');
        out.push_str(&format!("{}\n", style(&section.title).cyan().bold()));
        for finding in &section.findings {
            render_finding(&mut out, finding, options);
        }
    }
    out.trim_end().to_string()
}

fn render_finding(out: &mut String, finding: &FindingView, options: ReportOptions) {
    let mut badges = vec![severity_badge(finding.severity)];
    if let Some(line) = &finding.line_badge {
        badges.push(style(line).dim().to_string());
    }
    badges.push(style(&finding.confidence_badge).dim().to_string());

    out.push_str(&format!("  {}\n", badges.join(" · ")));
    out.push_str(&format!("  {}\n", finding.message));
    out.push_str(&format!("  {}\n", finding.suggestion));
    if options.previews && !finding.preview.is_empty() {
        render_preview(out, &finding.preview);
    }
}

fn render_preview(out: &mut String, lines: &[PreviewLine]) {
    let width = lines
        .iter()
        .map(|line| line.number.to_string().len())
        .max()
        .unwrap_or(1);
    for line in lines {
        let marker = if line.focused { ">" } else { " " };
        let row = format!("    {marker} {:>width$} | {}", line.number, line.text);
        if line.focused {
            out.push_str(&format!("{}\n", style(row).yellow()));
        } else {
            out.push_str(&format!("{}\n", style(row).dim()));
        }
    }
}

fn severity_badge(severity: Severity) -> String {
    let label = format!("[{}]", severity.as_str());
    match severity {
        Severity::Error => style(label).red().bold().to_string(),
        Severity::Warning => style(label).yellow().to_string(),
        Severity::Info => style(label).cyan().to_string(),
        Severity::Success => style(label).green().to_string(),
    }
}

pub fn render_categories(categories: &[Category]) -> String {
    let mut rows: Vec<&Category> = categories.iter().collect();
    rows.sort_by_key(|c| c.display_priority);

    let mut out = String::new();
    out.push_str("priority  match  key             title\n");
    for category in rows {
        out.push_str(&format!(
            "{:<8}  {:<5}  {:<14}  {}\n",
            category.display_priority,
            category.match_order,
            category.key.as_str(),
            category.title
        ));
    }
    out.trim_end().to_string()
}
