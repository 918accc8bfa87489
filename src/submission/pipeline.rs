//! Review countdown and the exactly-once submission.
//!
//! Entering review renders the answer summary, starts a one-second
//! countdown, and kicks off the remote submission on a worker thread. The
//! countdown reaches the final screen on its own schedule; the submission
//! outcome is only logged.

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{render_optional, SiteConfig, TemplateVars};
use crate::engine::{InteractionState, IntervalTimer, Screen, ScreenController};
use crate::error::TransportError;
use crate::surface::{Element, Surface, SummaryRow};

use super::record::{Answer, SubmissionRecord};
use super::transport::{GithubTarget, GithubTransport, Transport};

/// Countdown tick length.
pub const COUNTDOWN_TICK_MS: u64 = 1000;

/// Why a submission was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Submission is switched off.
    Disabled,
    /// Target or credential missing.
    NotConfigured,
    /// Another submission is still outstanding.
    InFlight,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "disabled",
            Self::NotConfigured => "not configured",
            Self::InFlight => "already sending",
        })
    }
}

/// How a submission ended.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Delivered,
    Skipped(SkipReason),
    Failed(TransportError),
}

pub struct SubmissionPipeline {
    enabled: bool,
    transport: Option<Arc<dyn Transport>>,
    countdown: IntervalTimer,
    countdown_secs: u32,
    final_title: String,
    final_body: String,
    pending: Option<Receiver<Result<(), TransportError>>>,
}

impl SubmissionPipeline {
    /// Build from configuration, wiring up the GitHub transport when the
    /// target is complete.
    pub fn new(config: &SiteConfig, vars: &TemplateVars) -> Self {
        let transport = GithubTarget::from_config(&config.github).and_then(|target| {
            match GithubTransport::new(target) {
                Ok(transport) => Some(Arc::new(transport) as Arc<dyn Transport>),
                Err(e) => {
                    tracing::warn!("Submission transport unavailable: {}", e);
                    None
                }
            }
        });

        Self {
            enabled: config.github.enabled,
            transport,
            countdown: IntervalTimer::new(COUNTDOWN_TICK_MS),
            countdown_secs: config.timing.countdown_secs,
            final_title: render_optional(config.personal.final_thanks_title.as_deref(), vars),
            final_body: render_optional(config.personal.final_thanks_body.as_deref(), vars),
            pending: None,
        }
    }

    /// Replace the transport (a custom endpoint, or a test double).
    pub fn set_transport(&mut self, transport: Option<Arc<dyn Transport>>) {
        self.transport = transport;
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_active()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Enter review: render the summary, (re)start the countdown, and
    /// submit once.
    pub fn begin_review(
        &mut self,
        now_ms: u64,
        answers: &[Answer],
        record: &SubmissionRecord,
        state: &mut InteractionState,
        screens: &mut ScreenController,
        surface: &mut dyn Surface,
    ) -> Option<SubmissionOutcome> {
        let rows: Vec<SummaryRow> = answers
            .iter()
            .map(|a| SummaryRow {
                label: a.label.clone(),
                value: a.display_value().to_string(),
            })
            .collect();
        surface.render_summary(&rows);
        surface.set_text(Element::SendStatus, "");
        surface.set_text(Element::Countdown, "");
        screens.activate(Screen::Submit, surface);

        state.countdown_remaining = self.countdown_secs;
        surface.set_text(Element::Countdown, &countdown_text(state.countdown_remaining));
        self.countdown.schedule(now_ms);

        self.submit(record, state)
    }

    /// Start a submission unless one is outstanding.
    ///
    /// Returns the outcome when it is known at once (skips and spawn
    /// failures); otherwise the result arrives through
    /// [`poll_submission`](Self::poll_submission).
    pub fn submit(
        &mut self,
        record: &SubmissionRecord,
        state: &mut InteractionState,
    ) -> Option<SubmissionOutcome> {
        if state.submission_in_flight {
            tracing::debug!("Submission already in flight, skipping");
            return Some(SubmissionOutcome::Skipped(SkipReason::InFlight));
        }

        state.submission_in_flight = true;
        let transport = match (&self.transport, self.enabled) {
            (_, false) => {
                state.submission_in_flight = false;
                return Some(report(SubmissionOutcome::Skipped(SkipReason::Disabled)));
            }
            (None, true) => {
                state.submission_in_flight = false;
                return Some(report(SubmissionOutcome::Skipped(SkipReason::NotConfigured)));
            }
            (Some(transport), true) => Arc::clone(transport),
        };

        let body = record.render();
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("serenade-submit".to_string())
            .spawn(move || {
                let _ = tx.send(transport.deliver(&body));
            });

        match spawned {
            Ok(_) => {
                tracing::debug!("Submission started");
                self.pending = Some(rx);
                None
            }
            Err(e) => {
                state.submission_in_flight = false;
                Some(report(SubmissionOutcome::Failed(TransportError::Worker(
                    e.to_string(),
                ))))
            }
        }
    }

    /// Collect a finished submission without blocking.
    pub fn poll_submission(&mut self, state: &mut InteractionState) -> Option<SubmissionOutcome> {
        let rx = self.pending.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_vanished()),
        };
        Some(self.settle(result, state))
    }

    /// Wait up to `timeout` for an outstanding submission.
    pub fn wait_for_submission(
        &mut self,
        timeout: Duration,
        state: &mut InteractionState,
    ) -> Option<SubmissionOutcome> {
        let rx = self.pending.as_ref()?;
        let result = match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Submission still outstanding after {:?}", timeout);
                return None;
            }
            Err(RecvTimeoutError::Disconnected) => Err(worker_vanished()),
        };
        Some(self.settle(result, state))
    }

    /// Run countdown ticks up to `now_ms`. Returns true when the final
    /// screen was just reached.
    pub fn tick(
        &mut self,
        now_ms: u64,
        state: &mut InteractionState,
        screens: &mut ScreenController,
        surface: &mut dyn Surface,
    ) -> bool {
        while self.countdown.fire(now_ms) {
            state.countdown_remaining = state.countdown_remaining.saturating_sub(1);
            if state.countdown_remaining == 0 {
                self.countdown.cancel();
                surface.set_text(Element::FinalTitle, &self.final_title);
                surface.set_text(Element::FinalBody, &self.final_body);
                screens.activate(Screen::Final, surface);
                return true;
            }
            surface.set_text(Element::Countdown, &countdown_text(state.countdown_remaining));
        }
        false
    }

    fn settle(
        &mut self,
        result: Result<(), TransportError>,
        state: &mut InteractionState,
    ) -> SubmissionOutcome {
        self.pending = None;
        state.submission_in_flight = false;
        report(match result {
            Ok(()) => SubmissionOutcome::Delivered,
            Err(e) => SubmissionOutcome::Failed(e),
        })
    }
}

impl fmt::Debug for SubmissionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionPipeline")
            .field("enabled", &self.enabled)
            .field("has_transport", &self.transport.is_some())
            .field("countdown", &self.countdown)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

/// Countdown caption.
pub fn countdown_text(seconds: u32) -> String {
    format!("Continuing in {}s…", seconds)
}

fn worker_vanished() -> TransportError {
    TransportError::Worker("worker exited without reporting".to_string())
}

/// Log an outcome on its way out.
fn report(outcome: SubmissionOutcome) -> SubmissionOutcome {
    match &outcome {
        SubmissionOutcome::Delivered => tracing::info!("Response submitted"),
        SubmissionOutcome::Skipped(reason) => tracing::info!("Submission skipped: {:?}", reason),
        SubmissionOutcome::Failed(e) => tracing::warn!("Submission failed: {}", e),
    }
    outcome
}
