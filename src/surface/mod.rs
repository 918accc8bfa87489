//! Presentation seam between the interaction engine and whatever draws it.
//!
//! The engine never owns layout. It writes text, images, and visibility
//! through the [`Surface`] trait and reads back only the geometry the
//! evasive placement needs.
//!
//! - [`MockSurface`] records every write for assertions in tests
//! - [`TerminalSurface`] renders the flow in a terminal

pub mod geometry;
pub mod mock;
pub mod terminal;

pub use geometry::{Point, Rect, Size};
pub use mock::MockSurface;
pub use terminal::{TerminalBell, TerminalSurface, POINTER_STEP};

use crate::engine::Screen;

/// Addressable elements the engine writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    WelcomeTitle,
    WelcomeSubtitle,
    WelcomeImage,
    Footer,
    MuteToggle,
    IntroLine,
    IntroHint,
    IntroContinue,
    QuestionHeading,
    QuestionImage,
    /// Container holding the accept and decline controls.
    DecisionControls,
    AcceptButton,
    DeclineButton,
    AcceptMessage,
    AcceptMessageText,
    StartWizard,
    ChoiceSubtitle,
    SendStatus,
    Countdown,
    FinalTitle,
    FinalBody,
}

impl Element {
    /// The element whose bounds contain this one, if the engine cares.
    pub fn container(&self) -> Option<Element> {
        match self {
            Self::AcceptButton | Self::DeclineButton => Some(Self::DecisionControls),
            _ => None,
        }
    }
}

/// Everything needed to draw the current wizard step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub key: String,
    pub index: usize,
    pub count: usize,
    pub title: String,
    pub subtitle: String,
    /// Percent complete, `round(100 * (index + 1) / count)`.
    pub progress: u8,
    pub body: StepBody,
    pub back_disabled: bool,
    pub next_label: String,
}

/// Input area of a wizard step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepBody {
    /// Single-select list, with a free-text box when the sentinel is chosen.
    Options {
        options: Vec<OptionView>,
        free_text: Option<FreeTextView>,
    },
    /// A single date input.
    Date { value: String },
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionView {
    pub label: String,
    pub selected: bool,
}

/// The free-text override box.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeTextView {
    pub label: String,
    pub value: String,
}

/// One line of the review summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

/// Rendering surface driven by the engine.
///
/// Implementations must tolerate repeated identical writes.
pub trait Surface {
    /// Show or hide a whole screen. An active screen is visible and exposed
    /// to assistive technology; an inactive one is hidden from both.
    fn set_screen_state(&mut self, screen: Screen, active: bool);

    /// Replace an element's text.
    fn set_text(&mut self, element: Element, text: &str);

    /// Load an image into an element.
    fn set_image(&mut self, element: Element, source: &str);

    /// Show or hide an element.
    fn set_visible(&mut self, element: Element, visible: bool);

    /// Move an element to `position`, relative to its container's top-left.
    fn set_position(&mut self, element: Element, position: Point);

    /// Clear custom size, position, and text styling from an element.
    fn reset_style(&mut self, element: Element);

    /// Toggle the evasive presentation of an element.
    fn set_evasive(&mut self, element: Element, evasive: bool);

    /// Draw a wizard step, replacing the previous one.
    fn render_step(&mut self, view: &StepView);

    /// Draw the review summary.
    fn render_summary(&mut self, rows: &[SummaryRow]);

    /// Current bounding box of an element in viewport coordinates.
    fn bounds(&self, element: Element) -> Rect;
}
