//! # mlreview client
//!
//! Submission lifecycle for the ML code review service.
//!
//! ```text
//! submit(source)
//!     │
//!     ├─ blank ──────────────────────────────┐
//!     │                                      │
//!     └─ Loading ─> AnalysisTransport        │
//!                     │                      │
//!                     └─> Settlement ────────┴─> render() ─> UiState.results
//!                                                             │
//!                              SubmissionGuard (Drop) ────────┴─> submit control restored
//! ```
//!
//! The controller only writes [`UiState`]; surfaces observe it through [`UiObserver`] or by
//! taking snapshots.

mod config;
mod controller;
mod error;
mod lifecycle;
mod render;
mod transport;
mod ui_state;

pub use config::{ClientConfig, DEFAULT_ENDPOINT, ENDPOINT_ENV};
pub use controller::{RequestController, SubmitOutcome, UiObserver};
pub use error::{ClientError, Result};
pub use lifecycle::{
    ApplicationError, ErrorKind, LifecycleState, SettledKind, Settlement, EMPTY_INPUT_MESSAGE,
    NETWORK_ERROR_MESSAGE,
};
pub use render::{
    render, render_report, summary_line, FindingView, Presentation, Report, Section, SourceLines,
    ERROR_TITLE, REPORT_HEADING, SUCCESS_MESSAGE, SUCCESS_TITLE, SUGGESTION_MARKER,
};
pub use transport::{AnalysisTransport, HttpTransport, TransportResponse};
pub use ui_state::{ResultsView, SubmitControl, UiState, BUSY_LABEL, IDLE_LABEL, LOADING_MESSAGE};
