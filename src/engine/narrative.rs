//! Timed narrative sequencer.
//!
//! Reveals an ordered list of lines one per tick. The viewer can tap to
//! jump ahead; a tap cancels the pending tick, advances once, and restarts
//! the interval from zero so taps compress the wait instead of stacking with
//! the automatic timer.
//!
//! After the last line has been shown, completion follows one reveal delay
//! later so the final line is visible before the continue affordance
//! appears.

use crate::config::TimingConfig;
use crate::surface::{Element, Surface};

use super::state::InteractionState;
use super::timer::{Deadline, IntervalTimer};

/// Lifecycle of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerPhase {
    Idle,
    Running,
    Complete,
}

/// Drives the intro screen.
#[derive(Debug, Clone)]
pub struct NarrativeSequencer {
    lines: Vec<String>,
    hint: String,
    reveal_delay_ms: u64,
    timer: IntervalTimer,
    finish: Deadline,
    phase: SequencerPhase,
}

impl NarrativeSequencer {
    /// Create an idle sequencer over already-rendered lines.
    pub fn new(lines: Vec<String>, hint: String, timing: &TimingConfig) -> Self {
        Self {
            lines,
            hint,
            reveal_delay_ms: timing.reveal_delay_ms,
            timer: IntervalTimer::new(timing.intro_step_ms),
            finish: Deadline::new(),
            phase: SequencerPhase::Idle,
        }
    }

    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SequencerPhase::Complete
    }

    /// Whether the automatic timer is running.
    pub fn timer_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Enter `Running`: show the first line at once and start the timer.
    ///
    /// Does nothing unless idle.
    pub fn start(&mut self, now_ms: u64, state: &mut InteractionState, surface: &mut dyn Surface) {
        if self.phase != SequencerPhase::Idle {
            return;
        }
        self.phase = SequencerPhase::Running;

        state.sequence_position = 0;
        state.sequence_complete = false;

        let first = self.lines.first().map(String::as_str).unwrap_or_default();
        surface.set_text(Element::IntroLine, first);
        surface.set_text(Element::IntroHint, &self.hint);
        surface.set_visible(Element::IntroContinue, false);

        // The first line is already up; the first tick shows the second.
        state.sequence_position = self.lines.len().min(1);
        self.timer.schedule(now_ms);

        tracing::debug!("Narrative started with {} lines", self.lines.len());
    }

    /// Show the next line. The single mutation point for timer and taps.
    ///
    /// No-op unless running, and no-op while completion is pending.
    pub fn advance(
        &mut self,
        now_ms: u64,
        state: &mut InteractionState,
        surface: &mut dyn Surface,
    ) {
        if self.phase != SequencerPhase::Running || self.finish.is_armed() {
            return;
        }

        // Past the end (or with no lines at all) repeat the last line.
        let line = self
            .lines
            .get(state.sequence_position)
            .or_else(|| self.lines.last());
        if let Some(line) = line {
            surface.set_text(Element::IntroLine, line);
        }

        state.sequence_position += 1;
        tracing::debug!("Narrative advanced to {}", state.sequence_position);

        if state.sequence_position >= self.lines.len() {
            self.timer.cancel();
            self.finish.arm(now_ms, self.reveal_delay_ms);
        }
    }

    /// Viewer tap: cancel the pending tick, advance, and restart the timer.
    pub fn accelerate(
        &mut self,
        now_ms: u64,
        state: &mut InteractionState,
        surface: &mut dyn Surface,
    ) {
        if self.phase != SequencerPhase::Running || self.finish.is_armed() {
            return;
        }
        self.timer.cancel();
        self.advance(now_ms, state, surface);
        if !self.finish.is_armed() {
            self.timer.schedule(now_ms);
        }
    }

    /// Process timer ticks and the completion deadline up to `now_ms`.
    pub fn tick(&mut self, now_ms: u64, state: &mut InteractionState, surface: &mut dyn Surface) {
        if self.phase != SequencerPhase::Running {
            return;
        }

        while self.timer.fire(now_ms) {
            // Arm any completion relative to when the tick was due.
            let due = self
                .timer
                .next_due()
                .map_or(now_ms, |next| next - self.timer.interval_ms());
            self.advance(due, state, surface);
        }

        if self.finish.fire(now_ms) {
            self.complete(state, surface);
        }
    }

    fn complete(&mut self, state: &mut InteractionState, surface: &mut dyn Surface) {
        self.timer.cancel();
        self.phase = SequencerPhase::Complete;
        state.sequence_complete = true;

        surface.set_visible(Element::IntroContinue, true);
        surface.set_text(Element::IntroHint, "");

        tracing::debug!("Narrative complete");
    }
}
