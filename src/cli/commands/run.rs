//! Run command implementation.
//!
//! The `serenade run` command plays the guided flow in the terminal. A
//! reader thread turns key presses into messages on a channel; this thread
//! is the single event loop that feeds keys and clock ticks to the engine
//! and redraws the surface.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use console::{Key, Term};

use crate::cli::args::RunArgs;
use crate::cli::keys::{map_key, KeyAction};
use crate::config::{load_config, resolve_credentials, ConfigSource, SiteConfig};
use crate::engine::{render_boot_failure, Engine, InputEvent};
use crate::error::Result;
use crate::submission::SubmissionOutcome;
use crate::surface::{Element, Surface, TerminalBell, TerminalSurface};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// How often the loop wakes up to advance timers without input.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// How long to wait for an outstanding submission before exiting.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// The run command implementation.
pub struct RunCommand {
    source: ConfigSource,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(source: &ConfigSource, args: RunArgs) -> Self {
        Self {
            source: source.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Load the config and apply credentials and flags.
    fn prepare_config(&self) -> Result<SiteConfig> {
        let mut config = load_config(&self.source)?;
        resolve_credentials(&mut config, |name| std::env::var(name).ok());
        if self.args.no_submit {
            config.github.enabled = false;
        }
        Ok(config)
    }

    fn boot_failure(&self, ui: &mut dyn UserInterface) -> Result<()> {
        let mut surface = TerminalSurface::new();
        render_boot_failure(&mut surface);
        surface.flush()?;
        surface.finish();
        ui.show_hint(&format!(
            "Config source: {}. Run 'serenade check' for details.",
            self.source.describe()
        ));
        Ok(())
    }

    fn report(&self, outcome: Option<&SubmissionOutcome>, ui: &mut dyn UserInterface) {
        match outcome {
            Some(SubmissionOutcome::Delivered) => ui.success("Response delivered"),
            Some(SubmissionOutcome::Skipped(reason)) => {
                ui.message(&format!("Response not sent ({})", reason))
            }
            // Delivery failures are logged by the pipeline and stay quiet here
            Some(SubmissionOutcome::Failed(_)) | None => {}
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !Term::stdout().is_term() {
            ui.error("'serenade run' needs an interactive terminal");
            return Ok(CommandResult::failure(2));
        }

        let config = match self.prepare_config() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Boot failed: {}", e);
                self.boot_failure(ui)?;
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        let mut engine = Engine::new(config, TerminalSurface::new(), TerminalBell::new());
        if let Some(seed) = self.args.seed {
            engine = engine.with_seed(seed);
        }

        let keys = spawn_key_reader()?;
        let finished = event_loop(&mut engine, &keys)?;

        if engine.has_pending_submission() {
            engine.surface_mut().set_text(Element::SendStatus, "Sending…");
            engine.surface_mut().flush()?;
            engine.settle_submission(SETTLE_TIMEOUT);
        }
        engine.surface_mut().finish();

        self.report(engine.last_outcome(), ui);
        tracing::info!(
            "Session ended ({})",
            if finished { "finished" } else { "quit early" }
        );
        Ok(CommandResult::success())
    }
}

/// Read keys on a background thread until the receiver goes away.
fn spawn_key_reader() -> Result<Receiver<Key>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("serenade-keys".to_string())
        .spawn(move || {
            let term = Term::stdout();
            loop {
                match term.read_key() {
                    Ok(key) => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Key reader stopped: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Drive the engine until the user quits. Returns whether the final screen
/// was reached.
fn event_loop(
    engine: &mut Engine<TerminalSurface, TerminalBell>,
    keys: &Receiver<Key>,
) -> Result<bool> {
    let started = Instant::now();
    let now = || u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Term::stdout().hide_cursor().ok();
    loop {
        engine.tick(now());
        engine.surface_mut().flush()?;

        let key = match keys.recv_timeout(TICK_INTERVAL) {
            Ok(key) => key,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        match map_key(&key, engine.surface()) {
            KeyAction::Quit => break,
            KeyAction::Send(events) => {
                for event in events {
                    engine.handle(event, now());
                }
            }
            KeyAction::MovePointer { dx, dy } => {
                let pointer = engine.surface_mut().move_pointer(dx, dy);
                engine.handle(InputEvent::PointerMove(pointer), now());
                if engine.surface().pointer_over(Element::DeclineButton) {
                    engine.handle(InputEvent::DeclineHover(pointer), now());
                }
            }
            KeyAction::Ignore => {}
        }
    }

    Ok(engine.is_finished())
}
