//! Terminal rendering of the guided flow.
//!
//! `TerminalSurface` keeps a model of every element the engine writes and
//! redraws the whole screen from it on [`TerminalSurface::flush`]. The
//! decision prompt is drawn as a small character field backed by a virtual
//! 600x300 pixel layout, so the evasive placement runs on the same geometry
//! it would in a browser. The review countdown is an indicatif spinner.

use std::collections::{HashMap, HashSet};
use std::io;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::engine::{AudioError, AudioSink, Cue, Screen};
use crate::ui::SerenadeTheme;

use super::{Element, Point, Rect, Size, StepBody, StepView, Surface, SummaryRow};

/// Virtual bounds of the decision control container.
const FIELD: Rect = Rect::new(0.0, 0.0, 600.0, 300.0);
/// Size of both decision buttons.
const BUTTON: Size = Size::new(100.0, 40.0);
const ACCEPT_HOME: Point = Point::new(150.0, 130.0);
const DECLINE_HOME: Point = Point::new(350.0, 130.0);
/// Virtual pixels per character cell.
const CELL_WIDTH: f64 = 10.0;
const CELL_HEIGHT: f64 = 20.0;
/// Distance the virtual pointer moves per arrow key.
pub const POINTER_STEP: f64 = 20.0;

const PROGRESS_WIDTH: usize = 20;

/// Terminal-backed [`Surface`].
pub struct TerminalSurface {
    term: Term,
    theme: SerenadeTheme,
    active: Option<Screen>,
    texts: HashMap<Element, String>,
    images: HashMap<Element, String>,
    hidden: HashSet<Element>,
    positions: HashMap<Element, Point>,
    evasive: HashSet<Element>,
    step: Option<StepView>,
    summary: Vec<SummaryRow>,
    pointer: Point,
    countdown: Option<ProgressBar>,
    dirty: bool,
}

impl TerminalSurface {
    /// Surface drawing to stdout with the detected theme.
    pub fn new() -> Self {
        Self::with_theme(SerenadeTheme::detect())
    }

    pub fn with_theme(theme: SerenadeTheme) -> Self {
        Self {
            term: Term::stdout(),
            theme,
            active: None,
            texts: HashMap::new(),
            images: HashMap::new(),
            hidden: HashSet::new(),
            positions: HashMap::new(),
            evasive: HashSet::new(),
            step: None,
            summary: Vec::new(),
            pointer: FIELD.center(),
            countdown: None,
            dirty: true,
        }
    }

    /// Screen currently drawn.
    pub fn active_screen(&self) -> Option<Screen> {
        self.active
    }

    /// Last wizard step drawn.
    pub fn current_step(&self) -> Option<&StepView> {
        self.step.as_ref()
    }

    pub fn text(&self, element: Element) -> &str {
        self.texts.get(&element).map(String::as_str).unwrap_or("")
    }

    pub fn is_visible(&self, element: Element) -> bool {
        !self.hidden.contains(&element)
    }

    /// Virtual pointer position in viewport coordinates.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Move the virtual pointer, keeping it inside the decision field.
    pub fn move_pointer(&mut self, dx: f64, dy: f64) -> Point {
        let x = (self.pointer.x + dx).clamp(FIELD.left, FIELD.left + FIELD.width);
        let y = (self.pointer.y + dy).clamp(FIELD.top, FIELD.top + FIELD.height);
        self.pointer = Point::new(x, y);
        self.dirty = true;
        self.pointer
    }

    /// Whether the virtual pointer rests on `element`.
    pub fn pointer_over(&self, element: Element) -> bool {
        self.bounds(element).contains(self.pointer)
    }

    /// Redraw the terminal if anything changed since the last flush.
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let lines = self.compose(self.countdown.is_some());
        let term = &self.term;
        let draw = || -> io::Result<()> {
            term.clear_screen()?;
            for line in &lines {
                term.write_line(line)?;
            }
            Ok(())
        };
        match &self.countdown {
            Some(bar) => bar.suspend(draw)?,
            None => draw()?,
        }
        self.dirty = false;
        Ok(())
    }

    /// Stop the countdown spinner and leave the cursor below the last frame.
    pub fn finish(&mut self) {
        if let Some(bar) = self.countdown.take() {
            bar.finish_and_clear();
        }
        self.term.show_cursor().ok();
    }

    /// The full frame as text lines, countdown included.
    pub fn render_lines(&self) -> Vec<String> {
        self.compose(false)
    }

    fn compose(&self, live_countdown: bool) -> Vec<String> {
        let mut lines = Vec::new();
        match self.active {
            Some(Screen::Welcome) => self.compose_welcome(&mut lines),
            Some(Screen::Intro) => self.compose_intro(&mut lines),
            Some(Screen::Question) => self.compose_question(&mut lines),
            Some(Screen::Choices) => self.compose_choices(&mut lines),
            Some(Screen::Submit) => self.compose_submit(&mut lines, live_countdown),
            Some(Screen::Final) => self.compose_final(&mut lines),
            None => {}
        }

        lines.push(String::new());
        if self.is_visible(Element::MuteToggle) && !self.text(Element::MuteToggle).is_empty() {
            lines.push(format!(
                "{}  {}",
                self.text(Element::MuteToggle),
                self.theme.dim.apply_to("(m)")
            ));
        }
        let footer = self.text(Element::Footer);
        if !footer.is_empty() {
            lines.push(self.theme.dim.apply_to(footer).to_string());
        }
        lines
    }

    fn compose_welcome(&self, lines: &mut Vec<String>) {
        self.push_header(lines, Element::WelcomeTitle);
        self.push_text(lines, Element::WelcomeSubtitle);
        self.push_image(lines, Element::WelcomeImage);
        self.push_keys(lines, "press any key to begin  q: quit");
    }

    fn compose_intro(&self, lines: &mut Vec<String>) {
        lines.push(String::new());
        self.push_header(lines, Element::IntroLine);
        let hint = self.text(Element::IntroHint);
        if !hint.is_empty() {
            lines.push(self.theme.hint.apply_to(hint).to_string());
        }
        if self.is_visible(Element::IntroContinue) {
            self.push_keys(lines, "enter: continue");
        } else {
            self.push_keys(lines, "space: speed up");
        }
    }

    fn compose_question(&self, lines: &mut Vec<String>) {
        self.push_header(lines, Element::QuestionHeading);
        self.push_image(lines, Element::QuestionImage);

        if self.is_visible(Element::DecisionControls) {
            lines.extend(self.compose_field());
            self.push_keys(
                lines,
                "y: yes  n: no  arrows: move pointer  tab: reach for no",
            );
        }
        if self.is_visible(Element::AcceptMessage) {
            self.push_text(lines, Element::AcceptMessageText);
        }
        if self.is_visible(Element::StartWizard) {
            self.push_keys(lines, "enter: continue");
        }
    }

    /// Character rendering of the decision container.
    fn compose_field(&self) -> Vec<String> {
        let cols = (FIELD.width / CELL_WIDTH) as usize;
        let rows = (FIELD.height / CELL_HEIGHT) as usize;
        let mut grid = vec![vec![' '; cols]; rows];

        let mut labels = Vec::new();
        for element in [Element::AcceptButton, Element::DeclineButton] {
            if !self.is_visible(element) {
                continue;
            }
            let rect = self.bounds(element);
            let (col, row) = cell_of(Point::new(rect.left, rect.top + rect.height / 2.0), cols, rows);
            labels.push((element, row, col, format!("[ {} ]", self.text(element))));
        }
        for (_, row, col, label) in &labels {
            for (offset, ch) in label.chars().enumerate() {
                if let Some(cell) = grid[*row].get_mut(col + offset) {
                    *cell = ch;
                }
            }
        }
        let (pointer_col, pointer_row) = cell_of(self.pointer, cols, rows);
        grid[pointer_row][pointer_col] = '+';

        let border = format!("+{}+", "-".repeat(cols));
        let mut out = vec![self.theme.border.apply_to(&border).to_string()];
        for (index, row) in grid.iter().enumerate() {
            let mut line: String = row.iter().collect();
            for (element, label_row, _, label) in &labels {
                if *label_row != index {
                    continue;
                }
                let style = match element {
                    Element::AcceptButton => &self.theme.accept,
                    _ if self.evasive.contains(element) => &self.theme.warning,
                    _ => &self.theme.decline,
                };
                line = line.replacen(label.as_str(), &style.apply_to(label).to_string(), 1);
            }
            out.push(format!(
                "{}{}{}",
                self.theme.border.apply_to("|"),
                line,
                self.theme.border.apply_to("|")
            ));
        }
        out.push(self.theme.border.apply_to(&border).to_string());
        out
    }

    fn compose_choices(&self, lines: &mut Vec<String>) {
        let Some(step) = &self.step else {
            return;
        };

        lines.push(self.theme.format_header(&format!(
            "{}  ({}/{})",
            step.title,
            step.index + 1,
            step.count
        )));
        let filled = usize::from(step.progress) * PROGRESS_WIDTH / 100;
        lines.push(format!(
            "[{}{}] {}%",
            "#".repeat(filled),
            ".".repeat(PROGRESS_WIDTH - filled),
            step.progress
        ));
        self.push_text(lines, Element::ChoiceSubtitle);
        lines.push(String::new());

        match &step.body {
            StepBody::Options { options, free_text } => {
                for option in options {
                    if option.selected {
                        lines.push(format!("  {}", self.theme.accept.apply_to(format!("● {}", option.label))));
                    } else {
                        lines.push(format!("  ○ {}", option.label));
                    }
                }
                if let Some(free_text) = free_text {
                    lines.push(String::new());
                    lines.push(format!(
                        "  {}: {}_",
                        self.theme.key.apply_to(&free_text.label),
                        free_text.value
                    ));
                }
            }
            StepBody::Date { value } => {
                lines.push(format!(
                    "  {}: {}_",
                    self.theme.key.apply_to("Date (YYYY-MM-DD)"),
                    value
                ));
            }
        }

        let back = if step.back_disabled {
            self.theme.dim.apply_to("esc: back").to_string()
        } else {
            "esc: back".to_string()
        };
        let keys = match step.body {
            StepBody::Options { .. } => "up/down: choose",
            StepBody::Date { .. } => "type a date",
        };
        lines.push(String::new());
        lines.push(format!(
            "{}  {}  enter: {}",
            self.theme.dim.apply_to(keys),
            back,
            step.next_label
        ));
    }

    fn compose_submit(&self, lines: &mut Vec<String>, live_countdown: bool) {
        lines.push(self.theme.format_header("Here's what you picked"));
        let width = self
            .summary
            .iter()
            .map(|row| row.label.chars().count())
            .max()
            .unwrap_or(0);
        for row in &self.summary {
            let pad = width - row.label.chars().count();
            lines.push(format!(
                "  {}{}  {}",
                self.theme.key.apply_to(&row.label),
                " ".repeat(pad),
                row.value
            ));
        }
        lines.push(String::new());
        self.push_text(lines, Element::SendStatus);
        if !live_countdown {
            self.push_text(lines, Element::Countdown);
        }
    }

    fn compose_final(&self, lines: &mut Vec<String>) {
        self.push_header(lines, Element::FinalTitle);
        self.push_text(lines, Element::FinalBody);
        self.push_keys(lines, "q: quit");
    }

    fn push_header(&self, lines: &mut Vec<String>, element: Element) {
        let text = self.text(element);
        if !text.is_empty() {
            lines.push(self.theme.format_header(text));
        }
    }

    fn push_text(&self, lines: &mut Vec<String>, element: Element) {
        let text = self.text(element);
        if !text.is_empty() && self.is_visible(element) {
            lines.push(text.to_string());
        }
    }

    fn push_image(&self, lines: &mut Vec<String>, element: Element) {
        if let Some(source) = self.images.get(&element) {
            lines.push(self.theme.dim.apply_to(format!("[gif: {}]", source)).to_string());
        }
    }

    fn push_keys(&self, lines: &mut Vec<String>, keys: &str) {
        lines.push(String::new());
        lines.push(self.theme.dim.apply_to(keys).to_string());
    }

    fn home(element: Element) -> Point {
        match element {
            Element::AcceptButton => ACCEPT_HOME,
            _ => DECLINE_HOME,
        }
    }

    fn update_countdown(&mut self, text: &str) {
        if text.is_empty() || self.active != Some(Screen::Submit) {
            return;
        }
        if self.countdown.is_none() && self.term.is_term() {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::term(self.term.clone(), 15));
            bar.set_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                    .template("{spinner:.magenta} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            self.countdown = Some(bar);
        }
        if let Some(bar) = &self.countdown {
            bar.set_message(text.to_string());
        }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Character cell under a virtual point, clamped to the grid.
fn cell_of(point: Point, cols: usize, rows: usize) -> (usize, usize) {
    let col = ((point.x - FIELD.left) / CELL_WIDTH).max(0.0) as usize;
    let row = ((point.y - FIELD.top) / CELL_HEIGHT).max(0.0) as usize;
    (col.min(cols - 1), row.min(rows - 1))
}

impl Surface for TerminalSurface {
    fn set_screen_state(&mut self, screen: Screen, active: bool) {
        if active {
            if self.active != Some(screen) {
                self.dirty = true;
            }
            self.active = Some(screen);
        } else if self.active == Some(screen) {
            self.active = None;
            self.dirty = true;
        }
        if screen == Screen::Submit && !active {
            if let Some(bar) = self.countdown.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn set_text(&mut self, element: Element, text: &str) {
        if element == Element::Countdown {
            self.update_countdown(text);
        }
        if self.texts.get(&element).map(String::as_str) != Some(text) {
            self.texts.insert(element, text.to_string());
            self.dirty = true;
        }
    }

    fn set_image(&mut self, element: Element, source: &str) {
        self.images.insert(element, source.to_string());
        self.dirty = true;
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        let changed = if visible {
            self.hidden.remove(&element)
        } else {
            self.hidden.insert(element)
        };
        self.dirty |= changed;
    }

    fn set_position(&mut self, element: Element, position: Point) {
        self.positions.insert(element, position);
        self.dirty = true;
    }

    fn reset_style(&mut self, element: Element) {
        self.positions.remove(&element);
        self.evasive.remove(&element);
        self.dirty = true;
    }

    fn set_evasive(&mut self, element: Element, evasive: bool) {
        let changed = if evasive {
            self.evasive.insert(element)
        } else {
            self.evasive.remove(&element)
        };
        if !evasive {
            self.positions.remove(&element);
        }
        self.dirty |= changed;
    }

    fn render_step(&mut self, view: &StepView) {
        self.step = Some(view.clone());
        self.dirty = true;
    }

    fn render_summary(&mut self, rows: &[SummaryRow]) {
        self.summary = rows.to_vec();
        self.dirty = true;
    }

    fn bounds(&self, element: Element) -> Rect {
        match element {
            Element::DecisionControls => FIELD,
            Element::AcceptButton | Element::DeclineButton => {
                let offset = self
                    .positions
                    .get(&element)
                    .copied()
                    .unwrap_or_else(|| Self::home(element));
                Rect::new(0.0, 0.0, BUTTON.width, BUTTON.height).placed_in(FIELD, offset)
            }
            _ => Rect::default(),
        }
    }
}

/// Audio sink that rings the terminal bell for one-shot cues.
#[derive(Debug, Default)]
pub struct TerminalBell {
    muted: bool,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: Cue, _source: &str) -> Result<(), AudioError> {
        if self.muted || cue == Cue::Background {
            return Ok(());
        }
        Term::stderr()
            .write_str("\x07")
            .map_err(|e| AudioError::Unavailable(e.to_string()))
    }

    fn stop_all(&mut self) {}

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
