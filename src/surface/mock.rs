//! Mock surface for testing.
//!
//! `MockSurface` implements the `Surface` trait and captures every write for
//! later assertion. Element bounds are configurable so the evasive placement
//! can be exercised without a real layout engine.
//!
//! # Example
//!
//! ```
//! use serenade::surface::{Element, MockSurface, Surface};
//!
//! let mut surface = MockSurface::new();
//! surface.set_text(Element::IntroLine, "Hi");
//! assert_eq!(surface.text(Element::IntroLine), Some("Hi"));
//! ```

use std::collections::HashMap;

use crate::engine::Screen;

use super::{Element, Point, Rect, StepView, Surface, SummaryRow};

/// Visibility flags written for a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenFlags {
    pub visible: bool,
    pub aria_hidden: bool,
}

/// Mock surface implementation for testing.
#[derive(Debug, Default)]
pub struct MockSurface {
    screens: HashMap<Screen, ScreenFlags>,
    screen_writes: Vec<(Screen, bool)>,
    texts: HashMap<Element, String>,
    text_history: Vec<(Element, String)>,
    images: HashMap<Element, String>,
    image_loads: Vec<(Element, String)>,
    visibility: HashMap<Element, bool>,
    positions: HashMap<Element, Point>,
    resets: Vec<Element>,
    evasive: HashMap<Element, bool>,
    steps: Vec<StepView>,
    summaries: Vec<Vec<SummaryRow>>,
    bounds: HashMap<Element, Rect>,
}

impl MockSurface {
    /// Create an empty mock surface with zero-sized elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface with a realistic decision-prompt layout: a 600x300
    /// control container at (100, 100) holding two 100x40 buttons.
    pub fn with_decision_layout() -> Self {
        let mut surface = Self::new();
        surface.set_bounds(Element::DecisionControls, Rect::new(100.0, 100.0, 600.0, 300.0));
        surface.set_bounds(Element::AcceptButton, Rect::new(220.0, 230.0, 100.0, 40.0));
        surface.set_bounds(Element::DeclineButton, Rect::new(480.0, 230.0, 100.0, 40.0));
        surface
    }

    /// Configure the bounds reported for an element.
    pub fn set_bounds(&mut self, element: Element, rect: Rect) {
        self.bounds.insert(element, rect);
    }

    /// Flags last written for a screen.
    pub fn screen(&self, screen: Screen) -> Option<ScreenFlags> {
        self.screens.get(&screen).copied()
    }

    /// Screens currently flagged visible.
    pub fn visible_screens(&self) -> Vec<Screen> {
        let mut visible: Vec<_> = self
            .screens
            .iter()
            .filter(|(_, flags)| flags.visible)
            .map(|(screen, _)| *screen)
            .collect();
        visible.sort_by_key(|s| s.id());
        visible
    }

    /// Every screen write in order.
    pub fn screen_writes(&self) -> &[(Screen, bool)] {
        &self.screen_writes
    }

    /// Current text of an element.
    pub fn text(&self, element: Element) -> Option<&str> {
        self.texts.get(&element).map(String::as_str)
    }

    /// Every text write in order.
    pub fn text_history(&self) -> &[(Element, String)] {
        &self.text_history
    }

    /// Check if any text write contained `needle`.
    pub fn has_text(&self, needle: &str) -> bool {
        self.text_history.iter().any(|(_, t)| t.contains(needle))
    }

    /// Current image of an element.
    pub fn image(&self, element: Element) -> Option<&str> {
        self.images.get(&element).map(String::as_str)
    }

    /// Every image load in order.
    pub fn image_loads(&self) -> &[(Element, String)] {
        &self.image_loads
    }

    /// Last visibility written for an element.
    pub fn is_visible(&self, element: Element) -> Option<bool> {
        self.visibility.get(&element).copied()
    }

    /// Last position written for an element.
    pub fn position(&self, element: Element) -> Option<Point> {
        self.positions.get(&element).copied()
    }

    /// Elements whose style was reset, in order.
    pub fn resets(&self) -> &[Element] {
        &self.resets
    }

    /// Whether an element is flagged evasive.
    pub fn is_evasive(&self, element: Element) -> bool {
        self.evasive.get(&element).copied().unwrap_or(false)
    }

    /// Every rendered wizard step.
    pub fn steps(&self) -> &[StepView] {
        &self.steps
    }

    /// The most recently rendered wizard step.
    pub fn last_step(&self) -> Option<&StepView> {
        self.steps.last()
    }

    /// Every rendered summary.
    pub fn summaries(&self) -> &[Vec<SummaryRow>] {
        &self.summaries
    }

    /// Clear all captured writes, keeping configured bounds.
    pub fn clear(&mut self) {
        self.screen_writes.clear();
        self.text_history.clear();
        self.image_loads.clear();
        self.resets.clear();
        self.steps.clear();
        self.summaries.clear();
    }
}

impl Surface for MockSurface {
    fn set_screen_state(&mut self, screen: Screen, active: bool) {
        self.screens.insert(
            screen,
            ScreenFlags {
                visible: active,
                aria_hidden: !active,
            },
        );
        self.screen_writes.push((screen, active));
    }

    fn set_text(&mut self, element: Element, text: &str) {
        self.texts.insert(element, text.to_string());
        self.text_history.push((element, text.to_string()));
    }

    fn set_image(&mut self, element: Element, source: &str) {
        self.images.insert(element, source.to_string());
        self.image_loads.push((element, source.to_string()));
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        self.visibility.insert(element, visible);
    }

    fn set_position(&mut self, element: Element, position: Point) {
        self.positions.insert(element, position);

        // Keep reported bounds in sync so proximity checks see the move.
        if let Some(parent) = element.container().and_then(|c| self.bounds.get(&c).copied()) {
            let current = self.bounds.get(&element).copied().unwrap_or_default();
            self.bounds
                .insert(element, current.placed_in(parent, position));
        }
    }

    fn reset_style(&mut self, element: Element) {
        self.positions.remove(&element);
        self.resets.push(element);
    }

    fn set_evasive(&mut self, element: Element, evasive: bool) {
        self.evasive.insert(element, evasive);
    }

    fn render_step(&mut self, view: &StepView) {
        self.steps.push(view.clone());
    }

    fn render_summary(&mut self, rows: &[SummaryRow]) {
        self.summaries.push(rows.to_vec());
    }

    fn bounds(&self, element: Element) -> Rect {
        self.bounds.get(&element).copied().unwrap_or_default()
    }
}
