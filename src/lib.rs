//! Serenade - a guided, screen-by-screen invitation in the terminal.
//!
//! Serenade walks one person through a welcome screen, a short timed
//! narrative, a yes/no question whose "no" button eventually runs away from
//! the pointer, a small preference wizard, and a review countdown that
//! posts the answers as a GitHub issue comment.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Site configuration loading, parsing, and validation
//! - [`engine`] - Screen flow, narrative timing, decision prompt, and wizard
//! - [`error`] - Error types and result aliases
//! - [`submission`] - Review countdown and response delivery
//! - [`surface`] - Presentation seam between the engine and a renderer
//! - [`ui`] - Prompts and terminal output for the surrounding commands
//!
//! # Example
//!
//! ```
//! use serenade::config::SiteConfig;
//! use serenade::engine::{Engine, InputEvent, Screen, SilentAudio};
//! use serenade::surface::{Element, MockSurface};
//!
//! let mut config = SiteConfig::default();
//! config.personal.to_name = Some("Sam".to_string());
//! config.personal.intro_lines = vec!["Hi {toName}".to_string()];
//! config.personal.question_heading = Some("{toName}, will you?".to_string());
//!
//! let mut engine = Engine::new(config, MockSurface::new(), SilentAudio);
//! engine.handle(InputEvent::PointerDown, 0);
//! engine.handle(InputEvent::IntroTap, 10);
//! engine.tick(500);
//! engine.handle(InputEvent::IntroContinue, 500);
//!
//! assert_eq!(engine.active_screen(), Some(Screen::Question));
//! assert_eq!(
//!     engine.surface().text(Element::QuestionHeading),
//!     Some("Sam, will you?")
//! );
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod submission;
pub mod surface;
pub mod ui;

pub use error::{Result, SerenadeError, TransportError};
