//! Screen controller.
//!
//! Exactly one screen is active at a time. Activating a screen writes the
//! visibility flags of every registered screen, so re-activating the current
//! screen is harmless.

use std::fmt;
use std::str::FromStr;

use crate::surface::Surface;

/// One full-viewport interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Welcome,
    Intro,
    Question,
    Choices,
    Submit,
    Final,
}

impl Screen {
    /// Every screen, in flow order.
    pub const ALL: [Screen; 6] = [
        Self::Welcome,
        Self::Intro,
        Self::Question,
        Self::Choices,
        Self::Submit,
        Self::Final,
    ];

    /// Stable identifier used by presentation layers.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Welcome => "screen-welcome",
            Self::Intro => "screen-intro",
            Self::Question => "screen-question",
            Self::Choices => "screen-choices",
            Self::Submit => "screen-submit",
            Self::Final => "screen-final",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.id() == s)
            .ok_or_else(|| format!("unknown screen: {}", s))
    }
}

/// Owns the single active screen.
#[derive(Debug, Clone)]
pub struct ScreenController {
    registered: Vec<Screen>,
    active: Option<Screen>,
}

impl Default for ScreenController {
    fn default() -> Self {
        Self::new(&Screen::ALL)
    }
}

impl ScreenController {
    /// Create a controller managing the given screens.
    pub fn new(screens: &[Screen]) -> Self {
        Self {
            registered: screens.to_vec(),
            active: None,
        }
    }

    /// The currently active screen.
    pub fn active(&self) -> Option<Screen> {
        self.active
    }

    /// Whether `screen` is the active one.
    pub fn is_active(&self, screen: Screen) -> bool {
        self.active == Some(screen)
    }

    /// Activate `screen` and deactivate every other registered screen.
    ///
    /// # Panics
    ///
    /// Panics if `screen` was not registered with this controller.
    pub fn activate(&mut self, screen: Screen, surface: &mut dyn Surface) {
        assert!(
            self.registered.contains(&screen),
            "screen {} is not registered with this controller",
            screen
        );

        for registered in &self.registered {
            surface.set_screen_state(*registered, *registered == screen);
        }

        if self.active != Some(screen) {
            tracing::info!("Screen → {}", screen);
        }
        self.active = Some(screen);
    }

    /// Activate a screen by its identifier.
    ///
    /// # Panics
    ///
    /// Panics on an unknown identifier; that is a programming error.
    pub fn activate_id(&mut self, id: &str, surface: &mut dyn Surface) {
        let screen = id
            .parse::<Screen>()
            .unwrap_or_else(|e| panic!("cannot activate screen: {}", e));
        self.activate(screen, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MockSurface;

    #[test]
    fn activate_leaves_exactly_one_visible() {
        let mut surface = MockSurface::new();
        let mut screens = ScreenController::default();

        screens.activate(Screen::Welcome, &mut surface);
        screens.activate(Screen::Question, &mut surface);

        assert_eq!(surface.visible_screens(), vec![Screen::Question]);
        assert!(surface.screen(Screen::Welcome).unwrap().aria_hidden);
        assert!(!surface.screen(Screen::Question).unwrap().aria_hidden);
        assert_eq!(screens.active(), Some(Screen::Question));
    }

    #[test]
    fn reactivating_is_idempotent() {
        let mut surface = MockSurface::new();
        let mut screens = ScreenController::default();

        screens.activate(Screen::Intro, &mut surface);
        let first = surface.visible_screens();
        screens.activate(Screen::Intro, &mut surface);

        assert_eq!(surface.visible_screens(), first);
        assert_eq!(surface.screen_writes().len(), 2 * Screen::ALL.len());
    }

    #[test]
    fn activate_by_id() {
        let mut surface = MockSurface::new();
        let mut screens = ScreenController::default();

        screens.activate_id("screen-final", &mut surface);
        assert!(screens.is_active(Screen::Final));
    }

    #[test]
    #[should_panic(expected = "unknown screen")]
    fn unknown_id_panics() {
        let mut surface = MockSurface::new();
        ScreenController::default().activate_id("screen-bogus", &mut surface);
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn unregistered_screen_panics() {
        let mut surface = MockSurface::new();
        let mut screens = ScreenController::new(&[Screen::Welcome]);
        screens.activate(Screen::Final, &mut surface);
    }

    #[test]
    fn screen_ids_round_trip() {
        for screen in Screen::ALL {
            assert_eq!(screen.id().parse::<Screen>().unwrap(), screen);
        }
    }
}
