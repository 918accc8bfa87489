//! Multi-step preference wizard.
//!
//! Each select step offers the option list configured under its key in
//! `choices`. Picking the sentinel option opens a free-text box whose text
//! becomes the step's effective answer. The date step takes a single date
//! literal. `next()` validates the current step before moving on.

use std::collections::HashMap;

use crate::config::{StepConfig, StepKind, WizardConfig};
use crate::submission::Answer;
use crate::surface::{Element, FreeTextView, OptionView, StepBody, StepView, Surface};

use super::state::InteractionState;

/// Result of [`PreferenceWizard::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardOutcome {
    /// The current step is invalid; the hint is showing.
    Blocked,
    /// Moved to the next step.
    Moved,
    /// The last step was valid; hand off to review.
    Completed,
}

#[derive(Debug, Clone)]
pub struct PreferenceWizard {
    steps: Vec<StepConfig>,
    options: HashMap<String, Vec<String>>,
    other_option: String,
    invalid_hint: String,
    index: usize,
}

impl PreferenceWizard {
    pub fn new(config: &WizardConfig, choices: &HashMap<String, Vec<String>>) -> Self {
        Self {
            steps: config.steps.clone(),
            options: choices.clone(),
            other_option: config.other_option.clone(),
            invalid_hint: config.invalid_hint.clone(),
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current(&self) -> Option<&StepConfig> {
        self.steps.get(self.index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.steps.len()
    }

    /// Percent complete for the current step.
    pub fn progress(&self) -> u8 {
        if self.steps.is_empty() {
            return 100;
        }
        let percent = 100.0 * (self.index + 1) as f64 / self.steps.len() as f64;
        percent.round() as u8
    }

    /// Options for a step key; an unknown key yields an empty list.
    pub fn options_for(&self, key: &str) -> &[String] {
        self.options.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Jump back to the first step and draw it.
    pub fn start(&mut self, state: &InteractionState, surface: &mut dyn Surface) {
        self.index = 0;
        self.render(state, surface);
    }

    /// Draw the current step.
    pub fn render(&self, state: &InteractionState, surface: &mut dyn Surface) {
        let Some(step) = self.current() else {
            return;
        };

        let body = match step.kind {
            StepKind::Date => StepBody::Date {
                value: state.date_value.clone(),
            },
            StepKind::Select => {
                let selection = state.selection(&step.key);
                let chosen = selection.and_then(|s| s.primary_value.as_deref());
                let options = self
                    .options_for(&step.key)
                    .iter()
                    .map(|label| OptionView {
                        label: label.clone(),
                        selected: chosen == Some(label.as_str()),
                    })
                    .collect();
                let free_text = (chosen == Some(self.other_option.as_str())).then(|| {
                    FreeTextView {
                        label: step
                            .other_label
                            .clone()
                            .unwrap_or_else(|| "Tell me more".to_string()),
                        value: selection.map(|s| s.free_text.clone()).unwrap_or_default(),
                    }
                });
                StepBody::Options { options, free_text }
            }
        };

        surface.set_text(Element::ChoiceSubtitle, &step.subtitle);
        surface.render_step(&StepView {
            key: step.key.clone(),
            index: self.index,
            count: self.steps.len(),
            title: step.title.clone(),
            subtitle: step.subtitle.clone(),
            progress: self.progress(),
            body,
            back_disabled: self.index == 0,
            next_label: if self.is_last() { "Review" } else { "Next" }.to_string(),
        });
    }

    /// Pick an option on the current select step.
    ///
    /// Clears any free text captured for the step. Values that are not in
    /// the step's option list are ignored.
    pub fn select(
        &mut self,
        value: &str,
        state: &mut InteractionState,
        surface: &mut dyn Surface,
    ) -> bool {
        let Some(step) = self.current() else {
            return false;
        };
        if step.kind != StepKind::Select || !self.options_for(&step.key).iter().any(|o| o == value)
        {
            return false;
        }

        let selection = state.selection_mut(&step.key);
        selection.primary_value = Some(value.to_string());
        selection.free_text.clear();
        tracing::debug!("Selected {:?} for {}", value, step.key);

        self.render(state, surface);
        true
    }

    /// Capture free text for the current select step.
    pub fn set_free_text(
        &mut self,
        text: &str,
        state: &mut InteractionState,
        surface: &mut dyn Surface,
    ) {
        let Some(step) = self.current() else {
            return;
        };
        if step.kind != StepKind::Select {
            return;
        }
        state.selection_mut(&step.key).free_text = text.to_string();
        self.render(state, surface);
    }

    /// Capture the date literal for the current date step.
    pub fn set_date(&mut self, value: &str, state: &mut InteractionState, surface: &mut dyn Surface) {
        if self.current().map(|s| s.kind) != Some(StepKind::Date) {
            return;
        }
        state.date_value = value.to_string();
        self.render(state, surface);
    }

    /// Whether the current step has a usable answer.
    pub fn is_valid(&self, state: &InteractionState) -> bool {
        let Some(step) = self.current() else {
            return false;
        };
        match step.kind {
            StepKind::Date => !state.date_value.trim().is_empty(),
            StepKind::Select => match state.selection(&step.key) {
                Some(selection) => match selection.primary_value.as_deref() {
                    Some(value) if value == self.other_option => {
                        !selection.free_text.trim().is_empty()
                    }
                    Some(_) => true,
                    None => false,
                },
                None => false,
            },
        }
    }

    /// Go back one step. No-op on the first step.
    pub fn back(&mut self, state: &InteractionState, surface: &mut dyn Surface) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.render(state, surface);
        true
    }

    /// Validate and move forward.
    pub fn next(&mut self, state: &InteractionState, surface: &mut dyn Surface) -> WizardOutcome {
        if !self.is_valid(state) {
            surface.set_text(Element::ChoiceSubtitle, &self.invalid_hint);
            tracing::debug!("Step {} is incomplete", self.index);
            return WizardOutcome::Blocked;
        }

        if self.is_last() {
            tracing::debug!("Wizard complete");
            return WizardOutcome::Completed;
        }

        self.index += 1;
        self.render(state, surface);
        WizardOutcome::Moved
    }

    /// Effective answer for every step, in order.
    pub fn answers(&self, state: &InteractionState) -> Vec<Answer> {
        self.steps
            .iter()
            .map(|step| Answer {
                label: step.display_label().to_string(),
                value: self.effective_value(step, state),
            })
            .collect()
    }

    fn effective_value(&self, step: &StepConfig, state: &InteractionState) -> Option<String> {
        match step.kind {
            StepKind::Date => {
                let date = state.date_value.trim();
                (!date.is_empty()).then(|| date.to_string())
            }
            StepKind::Select => {
                let selection = state.selection(&step.key)?;
                let primary = selection.primary_value.as_ref()?;
                if *primary != self.other_option {
                    return Some(primary.clone());
                }
                let typed = selection.free_text.trim();
                (!typed.is_empty()).then(|| typed.to_string())
            }
        }
    }
}
