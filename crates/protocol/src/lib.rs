use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Message used when a non-success response carries no `error` field.
pub const UNKNOWN_ERROR_FALLBACK: &str = "Unknown error";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    #[default]
    Info,
    Success,
}

impl Severity {
    /// Parse a severity label as emitted by the service.
    ///
    /// The service also reports `high`/`medium`/`low`; those fold into the four display
    /// severities. Unrecognised labels are treated as `info`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" | "high" | "critical" => Self::Error,
            "warning" | "warn" | "medium" => Self::Warning,
            "success" | "ok" => Self::Success,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or_else(Self::default, Self::parse))
    }
}

/// One issue reported by the analysis service.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Finding {
    /// 1-based source line; `0` means the finding is not tied to a line.
    #[serde(default)]
    pub line: u32,
    pub message: String,
    #[serde(default)]
    pub suggestion: String,
    /// Any label is accepted on the wire; see [`Severity::parse`].
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub severity: Severity,
    /// Probability in `[0, 1]` that the finding is correct.
    #[serde(default)]
    pub confidence: f64,
}

impl Finding {
    #[must_use]
    pub fn new(line: u32, message: impl Into<String>, severity: Severity, confidence: f64) -> Self {
        Self {
            line,
            message: message.into(),
            suggestion: String::new(),
            severity,
            confidence,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    #[must_use]
    pub const fn has_line(&self) -> bool {
        self.line > 0
    }

    /// Confidence as a whole percentage, rounded half away from zero.
    #[must_use]
    pub fn confidence_percent(&self) -> i64 {
        (self.confidence * 100.0).round() as i64
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct AnalyzeRequest {
    pub code: String,
}

impl AnalyzeRequest {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Body returned by the service for both success and failure statuses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default, JsonSchema)]
pub struct AnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Finding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    #[must_use]
    pub fn issues(issues: Vec<Finding>) -> Self {
        Self {
            issues: Some(issues),
            error: None,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            issues: None,
            error: Some(message.into()),
        }
    }

    /// The service-provided error; an empty string counts as absent.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|msg| !msg.is_empty())
    }
}

/// JSON schemas of the request and response bodies, keyed by type name.
pub fn wire_schemas() -> Result<serde_json::Value> {
    let request = serde_json::to_value(schemars::schema_for!(AnalyzeRequest))?;
    let response = serde_json::to_value(schemars::schema_for!(AnalyzeResponse))?;
    Ok(serde_json::json!({
        "AnalyzeRequest": request,
        "AnalyzeResponse": response,
    }))
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_full_finding() {
        let raw = r#"{"issues":[{"line":5,"message":"loss is nan during training","suggestion":"check inputs","severity":"error","confidence":0.9}]}"#;
        let resp: AnalyzeResponse = serde_json::from_str(raw).expect("decode");
        let issues = resp.issues.expect("issues");
        assert_eq!(
            issues[0],
            Finding::new(5, "loss is nan during training", Severity::Error, 0.9)
                .with_suggestion("check inputs")
        );
        assert!(resp.error.is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let raw = r#"{"issues":[{"message":"weights uninitialized"}]}"#;
        let resp: AnalyzeResponse = serde_json::from_str(raw).expect("decode");
        let finding = &resp.issues.expect("issues")[0];
        assert_eq!(finding.line, 0);
        assert_eq!(finding.suggestion, "");
        assert_eq!(finding.severity, Severity::Info);
        assert!(!finding.has_line());
    }

    #[test]
    fn legacy_severity_labels_fold_into_display_severities() {
        assert_eq!(Severity::parse("high"), Severity::Error);
        assert_eq!(Severity::parse("Medium"), Severity::Warning);
        assert_eq!(Severity::parse("low"), Severity::Info);
        assert_eq!(Severity::parse("success"), Severity::Success);
        assert_eq!(Severity::parse("whatever"), Severity::Info);
    }

    #[test]
    fn confidence_percent_rounds() {
        let f = Finding::new(0, "m", Severity::Info, 0.8675);
        assert_eq!(f.confidence_percent(), 87);
        let f = Finding::new(0, "m", Severity::Info, 0.125);
        assert_eq!(f.confidence_percent(), 13);
        let f = Finding::new(0, "m", Severity::Info, 1.0);
        assert_eq!(f.confidence_percent(), 100);
    }

    #[test]
    fn error_message_ignores_empty() {
        assert_eq!(AnalyzeResponse::error("").error_message(), None);
        assert_eq!(
            AnalyzeResponse::error("Invalid syntax").error_message(),
            Some("Invalid syntax")
        );
    }

    #[test]
    fn request_serializes_code_field() {
        let raw = serialize_json(&AnalyzeRequest::new("x = 1\n")).expect("json");
        assert_eq!(raw, r#"{"code":"x = 1\n"}"#);
    }

    #[test]
    fn schemas_cover_both_bodies() {
        let schemas = wire_schemas().expect("schemas");
        assert!(schemas.get("AnalyzeRequest").is_some());
        assert!(schemas.get("AnalyzeResponse").is_some());
    }

    #[test]
    fn severity_schema_accepts_any_label() {
        let schemas = wire_schemas().expect("schemas");
        let response = &schemas["AnalyzeResponse"];
        let defs = response
            .get("$defs")
            .or_else(|| response.get("definitions"))
            .expect("definitions");
        let severity = &defs["Finding"]["properties"]["severity"];
        assert!(severity.get("enum").is_none());
        assert_eq!(severity["type"], serde_json::json!(["string", "null"]));

        let raw = r#"{"issues":[{"message":"m","severity":"low"},{"message":"n","severity":null}]}"#;
        let resp: AnalyzeResponse = serde_json::from_str(raw).expect("decode");
        let issues = resp.issues.expect("issues");
        assert!(issues.iter().all(|f| f.severity == Severity::Info));
    }
}
