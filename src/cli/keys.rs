//! Keyboard mapping for the terminal flow.
//!
//! Keys mean different things on different screens. [`map_key`] turns one
//! key press into the action the run loop should take, given what is on
//! screen right now.

use console::Key;

use crate::engine::{InputEvent, Screen};
use crate::surface::{Element, StepBody, TerminalSurface, POINTER_STEP};

/// What the run loop should do with a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Leave the flow.
    Quit,
    /// Feed events to the engine, in order.
    Send(Vec<InputEvent>),
    /// Move the virtual pointer by a delta.
    MovePointer { dx: f64, dy: f64 },
    Ignore,
}

impl KeyAction {
    fn send(event: InputEvent) -> Self {
        Self::Send(vec![event])
    }
}

/// Map a key press on the current screen.
pub fn map_key(key: &Key, surface: &TerminalSurface) -> KeyAction {
    if *key == Key::CtrlC {
        return KeyAction::Quit;
    }

    let Some(screen) = surface.active_screen() else {
        return KeyAction::Ignore;
    };

    // Text boxes swallow printable keys, including q and m
    let typing = screen == Screen::Choices && editing_text(surface);
    if !typing {
        match key {
            Key::Char('q') | Key::Char('Q') => return KeyAction::Quit,
            Key::Char('m') | Key::Char('M') => return KeyAction::send(InputEvent::ToggleMute),
            _ => {}
        }
    }

    match screen {
        Screen::Welcome => KeyAction::send(InputEvent::PointerDown),
        Screen::Intro => match key {
            Key::Char(' ') => KeyAction::send(InputEvent::IntroTap),
            Key::Enter if surface.is_visible(Element::IntroContinue) => {
                KeyAction::send(InputEvent::IntroContinue)
            }
            Key::Enter => KeyAction::send(InputEvent::IntroTap),
            _ => KeyAction::Ignore,
        },
        Screen::Question => match key {
            Key::Char('y') | Key::Char('Y') => KeyAction::send(InputEvent::Accept),
            Key::Char('n') | Key::Char('N') => KeyAction::send(InputEvent::Decline),
            Key::Tab => KeyAction::send(InputEvent::DeclineFocus),
            Key::Enter => KeyAction::send(InputEvent::StartWizard),
            Key::ArrowLeft => KeyAction::MovePointer {
                dx: -POINTER_STEP,
                dy: 0.0,
            },
            Key::ArrowRight => KeyAction::MovePointer {
                dx: POINTER_STEP,
                dy: 0.0,
            },
            Key::ArrowUp => KeyAction::MovePointer {
                dx: 0.0,
                dy: -POINTER_STEP,
            },
            Key::ArrowDown => KeyAction::MovePointer {
                dx: 0.0,
                dy: POINTER_STEP,
            },
            _ => KeyAction::Ignore,
        },
        Screen::Choices => map_choices_key(key, surface),
        Screen::Submit => KeyAction::Ignore,
        Screen::Final => match key {
            Key::Enter | Key::Escape => KeyAction::Quit,
            _ => KeyAction::Ignore,
        },
    }
}

fn map_choices_key(key: &Key, surface: &TerminalSurface) -> KeyAction {
    match key {
        Key::Enter => return KeyAction::send(InputEvent::Next),
        Key::Escape => return KeyAction::send(InputEvent::Back),
        _ => {}
    }

    let Some(step) = surface.current_step() else {
        return KeyAction::Ignore;
    };

    match &step.body {
        StepBody::Options { options, free_text } => {
            let current = options.iter().position(|o| o.selected);
            let target = match (key, current) {
                (Key::ArrowDown, None) => Some(0),
                (Key::ArrowDown, Some(i)) => Some((i + 1).min(options.len().saturating_sub(1))),
                (Key::ArrowUp, None) => options.len().checked_sub(1),
                (Key::ArrowUp, Some(i)) => Some(i.saturating_sub(1)),
                _ => None,
            };
            if let Some(option) = target.and_then(|i| options.get(i)) {
                return KeyAction::send(InputEvent::SelectOption(option.label.clone()));
            }

            match free_text {
                Some(free_text) => edit(key, &free_text.value).map_or(KeyAction::Ignore, |text| {
                    KeyAction::send(InputEvent::FreeText(text))
                }),
                None => KeyAction::Ignore,
            }
        }
        StepBody::Date { value } => edit(key, value).map_or(KeyAction::Ignore, |text| {
            KeyAction::send(InputEvent::DateInput(text))
        }),
    }
}

/// Apply a printable key or Backspace to a text value.
fn edit(key: &Key, value: &str) -> Option<String> {
    match key {
        Key::Char(c) if !c.is_control() => {
            let mut text = value.to_string();
            text.push(*c);
            Some(text)
        }
        Key::Backspace => {
            let mut text = value.to_string();
            text.pop();
            Some(text)
        }
        _ => None,
    }
}

fn editing_text(surface: &TerminalSurface) -> bool {
    match surface.current_step().map(|step| &step.body) {
        Some(StepBody::Options { free_text, .. }) => free_text.is_some(),
        Some(StepBody::Date { .. }) => true,
        None => false,
    }
}
