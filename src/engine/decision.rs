//! The binary decision prompt.
//!
//! Accept is one-shot. Decline escalates through the configured decline
//! steps, clamping on the last one, until a step with `reset` turns the
//! decline control evasive. From then on decline activations are ignored;
//! the control can no longer be reliably clicked anyway.

use crate::config::{render_optional, DeclineStep, SiteConfig, TemplateVars};
use crate::surface::{Element, Surface};

use super::audio::{Cue, CuePlayer};
use super::state::InteractionState;

/// Label of the accept control.
pub const ACCEPT_LABEL: &str = "Yes";
/// Resting label of the decline control.
pub const DECLINE_LABEL: &str = "No";

/// What a decline activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineOutcome {
    /// Suppressed: already accepted or already evasive.
    Ignored,
    /// Applied the next decline step.
    Escalated,
    /// Applied a reset step; the caller must engage evasive placement.
    TurnedEvasive,
}

/// Decision prompt logic over a [`Surface`].
#[derive(Debug, Clone)]
pub struct DecisionPrompt {
    heading: String,
    accepted_heading: String,
    accepted_message: String,
    question_image: Option<String>,
    accepted_image: Option<String>,
    evasive_image: Option<String>,
    steps: Vec<DeclineStep>,
    shown_image: Option<String>,
}

impl DecisionPrompt {
    pub fn new(config: &SiteConfig, vars: &TemplateVars) -> Self {
        let personal = &config.personal;
        Self {
            heading: render_optional(personal.question_heading.as_deref(), vars),
            accepted_heading: render_optional(personal.yes_message_head.as_deref(), vars),
            accepted_message: render_optional(personal.yes_message.as_deref(), vars),
            question_image: config.media.meme_question_gif.clone(),
            accepted_image: config.media.meme_yes_gif.clone(),
            evasive_image: config.media.final_no_gif.clone(),
            steps: personal.no_sequence.clone(),
            shown_image: None,
        }
    }

    /// The decline step applied for a given decline count (1-based),
    /// clamped to the last configured step.
    pub fn step_for(&self, decline_count: u32) -> Option<&DeclineStep> {
        let last = self.steps.len().checked_sub(1)?;
        let index = (decline_count.saturating_sub(1) as usize).min(last);
        self.steps.get(index)
    }

    /// Start a fresh prompt instance.
    pub fn mount(&mut self, state: &mut InteractionState, surface: &mut dyn Surface) {
        state.decline_count = 0;
        state.evasive_mode_active = false;

        surface.set_text(Element::QuestionHeading, &self.heading);
        if let Some(image) = self.question_image.clone() {
            self.show_image(&image, surface);
        }
        surface.set_text(Element::AcceptButton, ACCEPT_LABEL);
        surface.set_text(Element::DeclineButton, DECLINE_LABEL);
        surface.set_visible(Element::DecisionControls, true);
        surface.set_visible(Element::AcceptMessage, false);
        surface.set_visible(Element::StartWizard, false);
    }

    /// Handle a decline activation.
    pub fn decline(
        &mut self,
        state: &mut InteractionState,
        surface: &mut dyn Surface,
        audio: &mut dyn CuePlayer,
    ) -> DeclineOutcome {
        if state.accept_chosen || state.evasive_mode_active {
            return DeclineOutcome::Ignored;
        }

        if state.decline_count == 0 {
            audio.play_cue(Cue::Decline);
        }
        state.decline_count += 1;

        let Some(step) = self.step_for(state.decline_count).cloned() else {
            tracing::debug!("No decline steps configured; count {}", state.decline_count);
            return DeclineOutcome::Escalated;
        };

        if let Some(gif) = &step.gif {
            self.show_image(gif, surface);
        }
        if let Some(phrase) = &step.phrase {
            surface.set_text(Element::DeclineButton, phrase);
        }

        if step.reset {
            surface.reset_style(Element::AcceptButton);
            surface.reset_style(Element::DeclineButton);
            surface.set_text(Element::DeclineButton, DECLINE_LABEL);
            if let Some(image) = self.evasive_image.clone() {
                self.show_image(&image, surface);
            }
            state.evasive_mode_active = true;
            tracing::info!("Decline control is now evasive after {} declines", state.decline_count);
            return DeclineOutcome::TurnedEvasive;
        }

        tracing::debug!("Decline escalated to {}", state.decline_count);
        DeclineOutcome::Escalated
    }

    /// Handle an accept activation. Returns false when already accepted.
    pub fn accept(
        &mut self,
        state: &mut InteractionState,
        surface: &mut dyn Surface,
        audio: &mut dyn CuePlayer,
    ) -> bool {
        if state.accept_chosen {
            return false;
        }
        state.accept_chosen = true;
        audio.play_cue(Cue::Accept);

        if let Some(image) = self.accepted_image.clone() {
            self.show_image(&image, surface);
        }
        surface.set_visible(Element::DecisionControls, false);
        surface.set_text(Element::QuestionHeading, &self.accepted_heading);
        surface.set_text(Element::AcceptMessageText, &self.accepted_message);
        surface.set_visible(Element::AcceptMessage, true);
        surface.set_visible(Element::StartWizard, true);

        tracing::info!("Accepted after {} declines", state.decline_count);
        true
    }

    fn show_image(&mut self, source: &str, surface: &mut dyn Surface) {
        if self.shown_image.as_deref() == Some(source) {
            return;
        }
        surface.set_image(Element::QuestionImage, source);
        self.shown_image = Some(source.to_string());
    }
}
