use crate::transport::TransportResponse;
use mlreview_protocol::{AnalyzeResponse, Finding, UNKNOWN_ERROR_FALLBACK};
use serde::Serialize;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some code to analyze";
pub const NETWORK_ERROR_MESSAGE: &str = "An error occurred while analyzing the code.";

/// Terminal outcome kinds, as exposed through [`LifecycleState::Settled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettledKind {
    Success,
    EmptySuccess,
    ServerError,
    ApplicationError,
    NetworkError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "outcome", rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Idle,
    Validating,
    Loading,
    Settled(SettledKind),
}

impl LifecycleState {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Error taxonomy of one submission. Every kind is terminal and never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty input; never reaches the network
    Validation,
    /// Transport failure or malformed body
    Network,
    /// Non-success status
    Server,
    /// Success status with a service-reported error
    Application,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "message", rename_all = "snake_case")]
pub enum ApplicationError {
    EmptyInput,
    Reported(String),
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Settlement {
    Success { findings: Vec<Finding> },
    EmptySuccess,
    ServerError { status: u16, message: String },
    ApplicationError { error: ApplicationError },
    NetworkError { detail: String },
}

impl Settlement {
    #[must_use]
    pub const fn empty_input() -> Self {
        Self::ApplicationError {
            error: ApplicationError::EmptyInput,
        }
    }

    #[must_use]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::NetworkError {
            detail: detail.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SettledKind {
        match self {
            Self::Success { .. } => SettledKind::Success,
            Self::EmptySuccess => SettledKind::EmptySuccess,
            Self::ServerError { .. } => SettledKind::ServerError,
            Self::ApplicationError { .. } => SettledKind::ApplicationError,
            Self::NetworkError { .. } => SettledKind::NetworkError,
        }
    }

    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } | Self::EmptySuccess => None,
            Self::ServerError { .. } => Some(ErrorKind::Server),
            Self::ApplicationError {
                error: ApplicationError::EmptyInput,
            } => Some(ErrorKind::Validation),
            Self::ApplicationError { .. } => Some(ErrorKind::Application),
            Self::NetworkError { .. } => Some(ErrorKind::Network),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error_kind().is_some()
    }

    /// Text shown to the user in the error panel.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } | Self::EmptySuccess => None,
            Self::ServerError { message, .. } => Some(format!("Server Error: {message}")),
            Self::ApplicationError {
                error: ApplicationError::EmptyInput,
            } => Some(EMPTY_INPUT_MESSAGE.to_string()),
            Self::ApplicationError {
                error: ApplicationError::Reported(message),
            } => Some(format!("Error: {message}")),
            Self::NetworkError { .. } => Some(NETWORK_ERROR_MESSAGE.to_string()),
        }
    }

    /// Map a received response onto a settlement.
    ///
    /// The body is decoded first; an undecodable body settles as a network error whatever the
    /// status was.
    #[must_use]
    pub fn from_response(response: &TransportResponse) -> Self {
        let decoded: AnalyzeResponse = match serde_json::from_slice(&response.body) {
            Ok(decoded) => decoded,
            Err(err) => {
                return Self::network(format!(
                    "malformed response body (status {}): {err}",
                    response.status
                ))
            }
        };

        if !response.is_success() {
            return Self::ServerError {
                status: response.status,
                message: decoded
                    .error_message()
                    .unwrap_or(UNKNOWN_ERROR_FALLBACK)
                    .to_string(),
            };
        }

        if let Some(message) = decoded.error_message() {
            return Self::ApplicationError {
                error: ApplicationError::Reported(message.to_string()),
            };
        }

        match decoded.issues {
            Some(findings) if !findings.is_empty() => Self::Success { findings },
            _ => Self::EmptySuccess,
        }
    }
}
