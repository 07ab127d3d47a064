use indicatif::{ProgressBar, ProgressStyle};
use mlreview_client::{ResultsView, UiObserver, UiState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

/// Projects the submit control's busy indicator onto a stderr spinner.
pub struct SpinnerSurface {
    bar: ProgressBar,
    spinning: AtomicBool,
}

impl SpinnerSurface {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        match ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            Ok(style) => bar.set_style(style),
            Err(err) => log::debug!("spinner template rejected: {err}"),
        }
        Self {
            bar,
            spinning: AtomicBool::new(false),
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning.load(Ordering::Acquire)
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }
}

fn busy_message(state: &UiState) -> String {
    match &state.results {
        ResultsView::Loading { message } => format!("{} {message}", state.submit.label),
        _ => state.submit.label.clone(),
    }
}

impl UiObserver for SpinnerSurface {
    fn ui_changed(&self, state: &UiState) {
        if state.submit.busy {
            self.bar.set_message(busy_message(state));
            if !self.spinning.swap(true, Ordering::AcqRel) {
                self.bar.enable_steady_tick(TICK);
            }
        } else if self.spinning.swap(false, Ordering::AcqRel) {
            self.bar.disable_steady_tick();
            self.bar.finish_and_clear();
        }
    }
}
