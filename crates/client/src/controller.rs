use crate::lifecycle::{LifecycleState, Settlement};
use crate::render::{render, SourceLines};
use crate::transport::AnalysisTransport;
use crate::ui_state::{ResultsView, SubmitControl, UiState};
use mlreview_classifier::IssueClassifier;
use mlreview_editor::LineIndex;
use mlreview_protocol::AnalyzeRequest;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receives a snapshot every time the controller changes the UI state.
pub trait UiObserver: Send + Sync {
    fn ui_changed(&self, state: &UiState);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Settled(Settlement),
    /// A request was already in flight; nothing was sent.
    Rejected,
}

impl SubmitOutcome {
    #[must_use]
    pub const fn settlement(&self) -> Option<&Settlement> {
        match self {
            Self::Settled(settlement) => Some(settlement),
            Self::Rejected => None,
        }
    }
}

/// Drives one submission at a time from validation to settlement.
pub struct RequestController<T> {
    transport: T,
    classifier: IssueClassifier,
    ui: Mutex<UiState>,
    in_flight: AtomicBool,
    observer: Option<Arc<dyn UiObserver>>,
}

impl<T: AnalysisTransport> RequestController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            classifier: IssueClassifier::standard(),
            ui: Mutex::new(UiState::default()),
            in_flight: AtomicBool::new(false),
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn UiObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn classifier(&self) -> &IssueClassifier {
        &self.classifier
    }

    pub fn ui_state(&self) -> UiState {
        self.lock_ui().clone()
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lock_ui().lifecycle
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Drop the rendered results. A pending request is left alone.
    pub fn clear_results(&self) {
        self.update(|ui| {
            if !ui.lifecycle.is_loading() {
                ui.lifecycle = LifecycleState::Idle;
                ui.results = ResultsView::Empty;
            }
        });
    }

    /// Validate `source`, send it, and settle the UI state with the rendered outcome.
    ///
    /// The submit control is always restored before this returns, and also when the future is
    /// dropped mid-request.
    pub async fn submit(&self, source: &str) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("submission rejected: a request is already in flight");
            return SubmitOutcome::Rejected;
        }
        let guard = SubmissionGuard { controller: self };

        self.update(|ui| ui.lifecycle = LifecycleState::Validating);
        if is_blank(source) {
            let settlement = Settlement::empty_input();
            self.settle(&settlement, source);
            drop(guard);
            return SubmitOutcome::Settled(settlement);
        }

        self.update(|ui| {
            ui.lifecycle = LifecycleState::Loading;
            ui.submit = SubmitControl::busy();
            ui.results = ResultsView::loading();
        });

        log::info!("submitting {} bytes for analysis", source.len());
        let request = AnalyzeRequest::new(source);
        let settlement = match self.transport.post_analyze(&request).await {
            Ok(response) => {
                log::debug!("analysis service answered with status {}", response.status);
                Settlement::from_response(&response)
            }
            Err(err) => Settlement::network(err.to_string()),
        };
        if let Settlement::NetworkError { detail } = &settlement {
            log::error!("analysis request failed: {detail}");
        }

        self.settle(&settlement, source);
        drop(guard);
        SubmitOutcome::Settled(settlement)
    }

    fn settle(&self, settlement: &Settlement, source: &str) {
        let index = LineIndex::new(source);
        let presentation = render(
            settlement,
            &self.classifier,
            Some(SourceLines::new(source, &index)),
        );
        log::debug!("settled as {:?}", settlement.kind());
        self.update(|ui| {
            ui.lifecycle = LifecycleState::Settled(settlement.kind());
            ui.results = ResultsView::Rendered { presentation };
        });
    }

    fn lock_ui(&self) -> MutexGuard<'_, UiState> {
        self.ui.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut UiState)) {
        let snapshot = {
            let mut ui = self.lock_ui();
            apply(&mut *ui);
            self.observer.as_ref().map(|_| ui.clone())
        };
        if let (Some(observer), Some(state)) = (&self.observer, snapshot) {
            observer.ui_changed(&state);
        }
    }
}

/// Whitespace-only input, counting a byte order mark as whitespace.
fn is_blank(source: &str) -> bool {
    source
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}

/// Restores the submit control and releases the in-flight flag on every exit path.
struct SubmissionGuard<'a, T: AnalysisTransport> {
    controller: &'a RequestController<T>,
}

impl<T: AnalysisTransport> Drop for SubmissionGuard<'_, T> {
    fn drop(&mut self) {
        self.controller.update(|ui| {
            ui.submit = SubmitControl::idle();
            if matches!(
                ui.lifecycle,
                LifecycleState::Loading | LifecycleState::Validating
            ) {
                ui.lifecycle = LifecycleState::Idle;
                ui.results = ResultsView::Empty;
            }
        });
        self.controller.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, Result};
    use crate::lifecycle::{SettledKind, NETWORK_ERROR_MESSAGE};
    use crate::render::Presentation;
    use crate::transport::TransportResponse;
    use crate::ui_state::{BUSY_LABEL, IDLE_LABEL};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<TransportResponse>>>,
        requests: Mutex<Vec<String>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedTransport {
        fn replying(status: u16, body: &str) -> Self {
            let transport = Self::default();
            transport.push(Ok(TransportResponse {
                status,
                body: body.as_bytes().to_vec(),
            }));
            transport
        }

        fn failing(msg: &str) -> Self {
            let transport = Self::default();
            transport.push(Err(ClientError::transport(msg)));
            transport
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn push(&self, reply: Result<TransportResponse>) {
            self.replies.lock().expect("replies").push_back(reply);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisTransport for ScriptedTransport {
        async fn post_analyze(&self, request: &AnalyzeRequest) -> Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .expect("requests")
                .push(request.code.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .expect("replies")
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::transport("no scripted reply")))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        states: Mutex<Vec<UiState>>,
    }

    impl UiObserver for RecordingObserver {
        fn ui_changed(&self, state: &UiState) {
            self.states.lock().expect("states").push(state.clone());
        }
    }

    fn presentation(controller: &RequestController<ScriptedTransport>) -> Presentation {
        controller
            .ui_state()
            .results
            .presentation()
            .cloned()
            .expect("rendered presentation")
    }

    #[tokio::test]
    async fn whitespace_input_never_reaches_the_network() {
        let controller = RequestController::new(ScriptedTransport::default());
        let outcome = controller.submit("  \n\t ").await;

        assert_eq!(outcome, SubmitOutcome::Settled(Settlement::empty_input()));
        assert_eq!(controller.transport().calls(), 0);
        assert_eq!(
            controller.lifecycle(),
            LifecycleState::Settled(SettledKind::ApplicationError)
        );
        assert_eq!(
            presentation(&controller),
            Presentation::error_panel("Please enter some code to analyze")
        );
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn byte_order_mark_counts_as_blank_input() {
        let controller = RequestController::new(ScriptedTransport::default());
        let outcome = controller.submit("\u{feff}\n ").await;

        assert_eq!(outcome, SubmitOutcome::Settled(Settlement::empty_input()));
        assert_eq!(controller.transport().calls(), 0);
        assert!(!is_blank("\u{feff}x"));
    }

    #[tokio::test]
    async fn findings_are_grouped_by_category() {
        let body = r#"{"issues":[
            {"line":5,"message":"loss is nan during training","suggestion":"scale inputs","confidence":0.9,"severity":"error"},
            {"line":0,"message":"model weights uninitialized","suggestion":"call init","confidence":0.7,"severity":"warning"}
        ]}"#;
        let controller = RequestController::new(ScriptedTransport::replying(200, body));
        let source = "a = 1\nb = 2\nc = 3\nd = 4\nloss = nan\n";
        controller.submit(source).await;

        assert_eq!(
            controller.transport().requests.lock().expect("requests").as_slice(),
            [source.to_string()]
        );
        assert_eq!(
            controller.lifecycle(),
            LifecycleState::Settled(SettledKind::Success)
        );
        let Presentation::Report(report) = presentation(&controller) else {
            panic!("expected a report");
        };
        assert_eq!(report.summary, "Found 2 issues");
        assert_eq!(
            report.section_titles(),
            vec!["Data-Related Errors (1)", "Model-Related Errors (1)"]
        );
        let focused: Vec<&str> = report.sections[0].findings[0]
            .preview
            .iter()
            .filter(|line| line.focused)
            .map(|line| line.text.as_str())
            .collect();
        assert_eq!(focused, vec!["loss = nan"]);
    }

    #[tokio::test]
    async fn server_error_shows_service_message() {
        let controller = RequestController::new(ScriptedTransport::replying(
            500,
            r#"{"error":"Invalid syntax"}"#,
        ));
        controller.submit("print(x)").await;

        assert_eq!(
            presentation(&controller),
            Presentation::error_panel("Server Error: Invalid syntax")
        );
        assert_eq!(controller.ui_state().submit, SubmitControl::idle());
    }

    #[tokio::test]
    async fn empty_issue_list_is_success_panel() {
        let controller = RequestController::new(ScriptedTransport::replying(200, r#"{"issues":[]}"#));
        controller.submit("x = 1").await;

        assert_eq!(
            controller.lifecycle(),
            LifecycleState::Settled(SettledKind::EmptySuccess)
        );
        assert_eq!(presentation(&controller), Presentation::success_panel());
    }

    #[tokio::test]
    async fn transport_failure_clears_busy_state() {
        let observer = Arc::new(RecordingObserver::default());
        let controller = RequestController::new(ScriptedTransport::failing("offline"))
            .with_observer(observer.clone());
        let outcome = controller.submit("x = 1").await;

        assert!(matches!(
            outcome.settlement(),
            Some(Settlement::NetworkError { .. })
        ));
        assert_eq!(
            presentation(&controller),
            Presentation::error_panel(NETWORK_ERROR_MESSAGE)
        );
        let ui = controller.ui_state();
        assert_eq!(ui.submit.label, IDLE_LABEL);
        assert!(!ui.submit.busy);
        assert!(ui.submit.enabled);

        let states = observer.states.lock().expect("states");
        assert!(states.iter().any(|s| s.submit.label == BUSY_LABEL
            && s.results == ResultsView::loading()));
        let last = states.last().expect("final state");
        assert_eq!(last.submit, SubmitControl::idle());
    }

    #[tokio::test]
    async fn results_render_before_busy_clears() {
        let observer = Arc::new(RecordingObserver::default());
        let controller = RequestController::new(ScriptedTransport::replying(200, r#"{"issues":[]}"#))
            .with_observer(observer.clone());
        controller.submit("x = 1").await;

        let states = observer.states.lock().expect("states");
        let rendered_at = states
            .iter()
            .position(|s| s.results.presentation().is_some())
            .expect("rendered");
        let released_at = states
            .iter()
            .rposition(|s| !s.submit.busy)
            .expect("released");
        assert!(states[rendered_at].submit.busy);
        assert!(rendered_at < released_at);
    }

    #[tokio::test]
    async fn overlapping_submit_is_rejected() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::replying(200, r#"{"issues":[]}"#).gated(gate.clone());
        let controller = Arc::new(RequestController::new(transport));

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("x = 1").await }
        });
        while controller.transport().calls() == 0 {
            tokio::task::yield_now().await;
        }

        assert!(controller.ui_state().is_busy());
        assert!(!controller.ui_state().submit.enabled);
        assert_eq!(controller.submit("y = 2").await, SubmitOutcome::Rejected);
        assert_eq!(controller.transport().calls(), 1);

        gate.notify_one();
        let outcome = first.await.expect("join");
        assert_eq!(outcome, SubmitOutcome::Settled(Settlement::EmptySuccess));
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn cancelled_submission_restores_idle_state() {
        let gate = Arc::new(Notify::new());
        let transport = ScriptedTransport::default().gated(gate);
        let controller = Arc::new(RequestController::new(transport));

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("x = 1").await }
        });
        while controller.transport().calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.lifecycle(), LifecycleState::Loading);

        pending.abort();
        assert!(pending.await.expect_err("aborted").is_cancelled());

        let ui = controller.ui_state();
        assert_eq!(ui, UiState::default());
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn clear_results_resets_to_idle() {
        let controller = RequestController::new(ScriptedTransport::replying(200, r#"{"issues":[]}"#));
        controller.submit("x = 1").await;
        controller.clear_results();
        assert_eq!(controller.ui_state(), UiState::default());
    }

    #[tokio::test]
    async fn resubmission_after_settlement_is_allowed() {
        let transport = ScriptedTransport::failing("offline");
        transport.push(Ok(TransportResponse {
            status: 200,
            body: br#"{"issues":[]}"#.to_vec(),
        }));
        let controller = RequestController::new(transport);

        controller.submit("x = 1").await;
        assert_eq!(
            controller.lifecycle(),
            LifecycleState::Settled(SettledKind::NetworkError)
        );
        controller.submit("x = 1").await;
        assert_eq!(
            controller.lifecycle(),
            LifecycleState::Settled(SettledKind::EmptySuccess)
        );
        assert_eq!(controller.transport().calls(), 2);
    }
}
