use crate::lifecycle::LifecycleState;
use crate::render::Presentation;
use serde::Serialize;

pub const IDLE_LABEL: &str = "Analyze Code";
pub const BUSY_LABEL: &str = "Analyzing...";
pub const LOADING_MESSAGE: &str = "Analyzing your code";

/// The submit control with its separately addressable label and busy indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub label: String,
    pub busy: bool,
    pub enabled: bool,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self::idle()
    }
}

impl SubmitControl {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            label: IDLE_LABEL.to_string(),
            busy: false,
            enabled: true,
        }
    }

    #[must_use]
    pub fn busy() -> Self {
        Self {
            label: BUSY_LABEL.to_string(),
            busy: true,
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ResultsView {
    #[default]
    Empty,
    Loading {
        message: String,
    },
    Rendered {
        presentation: Presentation,
    },
}

impl ResultsView {
    #[must_use]
    pub fn loading() -> Self {
        Self::Loading {
            message: LOADING_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub const fn presentation(&self) -> Option<&Presentation> {
        match self {
            Self::Rendered { presentation } => Some(presentation),
            _ => None,
        }
    }
}

/// Everything a surface adapter needs to draw the review screen.
///
/// Only the controller writes this; adapters take snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UiState {
    pub lifecycle: LifecycleState,
    pub submit: SubmitControl,
    pub results: ResultsView,
}

impl UiState {
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.submit.busy
    }
}
