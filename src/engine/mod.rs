//! The interaction engine.
//!
//! [`Engine`] owns the session state and every component of the guided
//! flow. The host feeds it [`InputEvent`]s and clock ticks from a single
//! event loop; the engine answers by writing to its [`Surface`] and asking
//! its audio sink for cues.
//!
//! Events only reach the component behind the active screen. Everything
//! else is dropped, so a stray key press on the wrong screen is harmless.
//!
//! # Example
//!
//! ```
//! use serenade::config::SiteConfig;
//! use serenade::engine::{Engine, InputEvent, Screen, SilentAudio};
//! use serenade::surface::MockSurface;
//!
//! let mut config = SiteConfig::default();
//! config.personal.intro_lines = vec!["Hi".into(), "Ready?".into()];
//!
//! let mut engine = Engine::new(config, MockSurface::new(), SilentAudio).with_seed(1);
//! engine.handle(InputEvent::PointerDown, 0);
//! engine.handle(InputEvent::IntroTap, 10);
//! engine.tick(500);
//! engine.handle(InputEvent::IntroContinue, 600);
//! assert_eq!(engine.active_screen(), Some(Screen::Question));
//! ```

pub mod audio;
pub mod decision;
pub mod evasive;
pub mod narrative;
pub mod screen;
pub mod state;
pub mod timer;
pub mod wizard;

pub use audio::{AudioController, AudioError, AudioSink, Cue, CuePlayer, MockAudio, SilentAudio};
pub use decision::{DecisionPrompt, DeclineOutcome};
pub use evasive::{place, within_flee_radius, EvasionParams, EvasiveControl};
pub use narrative::{NarrativeSequencer, SequencerPhase};
pub use screen::{Screen, ScreenController};
pub use state::{InteractionState, Selection};
pub use timer::{Deadline, IntervalTimer};
pub use wizard::{PreferenceWizard, WizardOutcome};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{render_optional, render_template, SiteConfig, TemplateVars};
use crate::submission::{SubmissionOutcome, SubmissionPipeline, SubmissionRecord, Transport};
use crate::surface::{Element, Point, Surface};

/// Footer shown on every screen.
const FOOTER_TEMPLATE: &str = "This webpage is made by {fromName} for {toName}.";

/// Title and subtitle shown when the configuration cannot be loaded.
pub const BOOT_FAILURE_TITLE: &str = "Sorry, something went wrong 😅";
pub const BOOT_FAILURE_SUBTITLE: &str = "Please refresh and try again.";

/// Input raised by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A press anywhere; starts the flow from the welcome screen.
    PointerDown,
    /// Tap on the narrative to jump ahead.
    IntroTap,
    /// The continue affordance under a finished narrative.
    IntroContinue,
    Accept,
    Decline,
    /// Pointer moved to a viewport position.
    PointerMove(Point),
    /// Pointer entered the decline control.
    DeclineHover(Point),
    /// Keyboard focus reached the decline control.
    DeclineFocus,
    /// The "continue to wizard" affordance after accepting.
    StartWizard,
    SelectOption(String),
    FreeText(String),
    DateInput(String),
    Back,
    Next,
    ToggleMute,
}

/// The guided flow, from welcome screen to thank-you.
pub struct Engine<S, A> {
    config: SiteConfig,
    surface: S,
    audio: AudioController<A>,
    state: InteractionState,
    screens: ScreenController,
    narrative: NarrativeSequencer,
    decision: DecisionPrompt,
    evasive: EvasiveControl,
    wizard: PreferenceWizard,
    submission: SubmissionPipeline,
    rng: StdRng,
    welcome_started: bool,
    last_outcome: Option<SubmissionOutcome>,
}

impl<S: Surface, A: AudioSink> Engine<S, A> {
    /// Boot the engine: draw the welcome screen and wait for the first press.
    pub fn new(config: SiteConfig, surface: S, audio: A) -> Self {
        let vars = TemplateVars::from_config(&config);

        let lines = config
            .personal
            .intro_lines
            .iter()
            .map(|line| render_template(line, &vars))
            .collect();
        let hint = render_optional(config.personal.intro_hint.as_deref(), &vars);

        let mut engine = Self {
            narrative: NarrativeSequencer::new(lines, hint, &config.timing),
            decision: DecisionPrompt::new(&config, &vars),
            evasive: EvasiveControl::default(),
            wizard: PreferenceWizard::new(&config.wizard, &config.choices),
            submission: SubmissionPipeline::new(&config, &vars),
            audio: AudioController::new(&config.media.audio, audio),
            state: InteractionState::new(),
            screens: ScreenController::default(),
            rng: StdRng::from_os_rng(),
            welcome_started: false,
            last_outcome: None,
            surface,
            config,
        };
        engine.boot(&vars);
        engine
    }

    /// Use a fixed seed for evasive placement.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the submission transport.
    pub fn with_transport(mut self, transport: Option<Arc<dyn Transport>>) -> Self {
        self.submission.set_transport(transport);
        self
    }

    fn boot(&mut self, vars: &TemplateVars) {
        let personal = &self.config.personal;
        self.surface
            .set_text(Element::Footer, &render_template(FOOTER_TEMPLATE, vars));
        self.surface.set_text(
            Element::WelcomeTitle,
            &render_optional(personal.welcome_title.as_deref(), vars),
        );
        if let Some(image) = &self.config.media.meme_welcome_gif {
            self.surface.set_image(Element::WelcomeImage, image);
        }
        self.audio.render_toggle(&mut self.surface);
        self.screens.activate(Screen::Welcome, &mut self.surface);
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn audio(&self) -> &AudioController<A> {
        &self.audio
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn wizard(&self) -> &PreferenceWizard {
        &self.wizard
    }

    pub fn active_screen(&self) -> Option<Screen> {
        self.screens.active()
    }

    /// The final screen is showing.
    pub fn is_finished(&self) -> bool {
        self.screens.is_active(Screen::Final)
    }

    /// Most recent submission outcome, once known.
    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn has_pending_submission(&self) -> bool {
        self.submission.has_pending()
    }

    /// Dispatch one input event. Returns false when the active screen
    /// ignores it.
    pub fn handle(&mut self, event: InputEvent, now_ms: u64) -> bool {
        let Some(screen) = self.screens.active() else {
            return false;
        };

        match (screen, event) {
            (_, InputEvent::ToggleMute) => {
                self.audio.toggle_mute(&mut self.surface);
                true
            }
            (Screen::Welcome, InputEvent::PointerDown) => self.start_intro(now_ms),
            (Screen::Intro, InputEvent::IntroTap) => {
                self.narrative
                    .accelerate(now_ms, &mut self.state, &mut self.surface);
                true
            }
            (Screen::Intro, InputEvent::IntroContinue) => self.show_question(),
            (Screen::Question, InputEvent::Accept) => {
                self.decision
                    .accept(&mut self.state, &mut self.surface, &mut self.audio)
            }
            (Screen::Question, InputEvent::Decline) => {
                match self
                    .decision
                    .decline(&mut self.state, &mut self.surface, &mut self.audio)
                {
                    DeclineOutcome::Ignored => false,
                    DeclineOutcome::Escalated => true,
                    DeclineOutcome::TurnedEvasive => {
                        self.evasive.engage(&mut self.surface, &mut self.rng);
                        true
                    }
                }
            }
            (Screen::Question, InputEvent::PointerMove(pointer)) => self.evasive.on_pointer_move(
                pointer,
                &self.state,
                &mut self.surface,
                &mut self.rng,
            ),
            (Screen::Question, InputEvent::DeclineHover(pointer)) => self.evasive.on_approach(
                Some(pointer),
                &self.state,
                &mut self.surface,
                &mut self.rng,
            ),
            (Screen::Question, InputEvent::DeclineFocus) => {
                self.evasive
                    .on_approach(None, &self.state, &mut self.surface, &mut self.rng)
            }
            (Screen::Question, InputEvent::StartWizard) => self.start_wizard(),
            (Screen::Choices, InputEvent::SelectOption(value)) => {
                self.wizard
                    .select(&value, &mut self.state, &mut self.surface)
            }
            (Screen::Choices, InputEvent::FreeText(text)) => {
                self.wizard
                    .set_free_text(&text, &mut self.state, &mut self.surface);
                true
            }
            (Screen::Choices, InputEvent::DateInput(value)) => {
                self.wizard
                    .set_date(&value, &mut self.state, &mut self.surface);
                true
            }
            (Screen::Choices, InputEvent::Back) => {
                self.wizard.back(&self.state, &mut self.surface)
            }
            (Screen::Choices, InputEvent::Next) => {
                match self.wizard.next(&self.state, &mut self.surface) {
                    WizardOutcome::Blocked => false,
                    WizardOutcome::Moved => true,
                    WizardOutcome::Completed => {
                        self.begin_review(now_ms);
                        true
                    }
                }
            }
            (screen, event) => {
                tracing::trace!("Ignoring {:?} on {}", event, screen);
                false
            }
        }
    }

    /// Advance timers to `now_ms` and collect a finished submission.
    pub fn tick(&mut self, now_ms: u64) {
        self.narrative
            .tick(now_ms, &mut self.state, &mut self.surface);
        self.submission
            .tick(now_ms, &mut self.state, &mut self.screens, &mut self.surface);
        if let Some(outcome) = self.submission.poll_submission(&mut self.state) {
            self.last_outcome = Some(outcome);
        }
    }

    /// Block up to `timeout` for an outstanding submission.
    pub fn settle_submission(&mut self, timeout: Duration) -> Option<&SubmissionOutcome> {
        if let Some(outcome) = self
            .submission
            .wait_for_submission(timeout, &mut self.state)
        {
            self.last_outcome = Some(outcome);
        }
        self.last_outcome.as_ref()
    }

    fn start_intro(&mut self, now_ms: u64) -> bool {
        if self.welcome_started {
            return false;
        }
        self.welcome_started = true;

        self.screens.activate(Screen::Intro, &mut self.surface);
        self.audio.start_background();
        self.narrative
            .start(now_ms, &mut self.state, &mut self.surface);
        true
    }

    fn show_question(&mut self) -> bool {
        if !self.narrative.is_complete() {
            return false;
        }
        self.screens.activate(Screen::Question, &mut self.surface);
        self.evasive.reset(&mut self.surface);
        self.decision.mount(&mut self.state, &mut self.surface);
        true
    }

    fn start_wizard(&mut self) -> bool {
        if !self.state.accept_chosen {
            return false;
        }
        self.screens.activate(Screen::Choices, &mut self.surface);
        self.wizard.start(&self.state, &mut self.surface);
        true
    }

    fn begin_review(&mut self, now_ms: u64) {
        let answers = self.wizard.answers(&self.state);
        let record =
            SubmissionRecord::from_session(&self.config, &self.state, answers.clone(), Utc::now());

        let outcome = self.submission.begin_review(
            now_ms,
            &answers,
            &record,
            &mut self.state,
            &mut self.screens,
            &mut self.surface,
        );
        if outcome.is_some() {
            self.last_outcome = outcome;
        }
    }
}

/// Replace the welcome screen with the boot failure apology.
pub fn render_boot_failure(surface: &mut dyn Surface) {
    ScreenController::default().activate(Screen::Welcome, surface);
    surface.set_text(Element::WelcomeTitle, BOOT_FAILURE_TITLE);
    surface.set_text(Element::WelcomeSubtitle, BOOT_FAILURE_SUBTITLE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MockSurface;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.personal.to_name = Some("Sam".to_string());
        config.personal.from_name = Some("Alex".to_string());
        config.personal.welcome_title = Some("Hey {toName}".to_string());
        config.personal.intro_lines = vec!["Hi {toName}".to_string(), "Ready?".to_string()];
        config.media.meme_welcome_gif = Some("wave.gif".to_string());
        config
    }

    fn engine() -> Engine<MockSurface, MockAudio> {
        Engine::new(config(), MockSurface::with_decision_layout(), MockAudio::new()).with_seed(3)
    }

    #[test]
    fn boot_renders_welcome() {
        let engine = engine();
        let surface = engine.surface();

        assert_eq!(engine.active_screen(), Some(Screen::Welcome));
        assert_eq!(
            surface.text(Element::Footer),
            Some("This webpage is made by Alex for Sam.")
        );
        assert_eq!(surface.text(Element::WelcomeTitle), Some("Hey Sam"));
        assert_eq!(surface.image(Element::WelcomeImage), Some("wave.gif"));
        assert_eq!(surface.is_visible(Element::MuteToggle), Some(false));
    }

    #[test]
    fn first_press_starts_intro_once() {
        let mut engine = engine();

        assert!(engine.handle(InputEvent::PointerDown, 0));
        assert_eq!(engine.active_screen(), Some(Screen::Intro));
        assert_eq!(engine.surface().text(Element::IntroLine), Some("Hi Sam"));

        assert!(!engine.handle(InputEvent::PointerDown, 10));
    }

    #[test]
    fn events_for_other_screens_are_ignored() {
        let mut engine = engine();

        assert!(!engine.handle(InputEvent::Accept, 0));
        assert!(!engine.handle(InputEvent::Next, 0));
        assert!(!engine.state().accept_chosen);
    }

    #[test]
    fn continue_requires_finished_narrative() {
        let mut engine = engine();
        engine.handle(InputEvent::PointerDown, 0);

        assert!(!engine.handle(InputEvent::IntroContinue, 100));
        engine.handle(InputEvent::IntroTap, 200);
        engine.tick(600);
        assert!(engine.handle(InputEvent::IntroContinue, 700));
        assert_eq!(engine.active_screen(), Some(Screen::Question));
    }

    #[test]
    fn wizard_needs_accept() {
        let mut engine = engine();
        engine.handle(InputEvent::PointerDown, 0);
        engine.handle(InputEvent::IntroTap, 1);
        engine.tick(401);
        engine.handle(InputEvent::IntroContinue, 402);

        assert!(!engine.handle(InputEvent::StartWizard, 500));
        engine.handle(InputEvent::Accept, 600);
        assert!(engine.handle(InputEvent::StartWizard, 700));
        assert_eq!(engine.active_screen(), Some(Screen::Choices));
    }

    #[test]
    fn huge_timing_values_never_fire_early() {
        let mut config = config();
        config.timing.intro_step_ms = u64::MAX;
        config.timing.reveal_delay_ms = u64::MAX;
        crate::config::validate(&config).unwrap();

        let mut engine =
            Engine::new(config, MockSurface::with_decision_layout(), MockAudio::new());
        assert!(engine.handle(InputEvent::PointerDown, 10));
        engine.handle(InputEvent::IntroTap, 20);
        engine.tick(1_000_000);

        assert_eq!(engine.surface().text(Element::IntroLine), Some("Ready?"));
        assert!(!engine.handle(InputEvent::IntroContinue, 1_000_000));
        assert_eq!(engine.active_screen(), Some(Screen::Intro));
    }

    #[test]
    fn boot_failure_replaces_welcome_text() {
        let mut surface = MockSurface::new();
        render_boot_failure(&mut surface);

        assert_eq!(surface.visible_screens(), vec![Screen::Welcome]);
        assert_eq!(surface.text(Element::WelcomeTitle), Some(BOOT_FAILURE_TITLE));
        assert_eq!(
            surface.text(Element::WelcomeSubtitle),
            Some(BOOT_FAILURE_SUBTITLE)
        );
    }
}
