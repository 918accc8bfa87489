//! Fire-and-forget audio cues.
//!
//! The engine asks for cues; an [`AudioSink`] plays them. Sink failures are
//! logged and dropped, and never change the flow.

use std::collections::HashMap;

use thiserror::Error;

use crate::config::AudioConfig;
use crate::surface::{Element, Surface};

/// A sound the engine can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Looping background music.
    Background,
    /// Played when the accept control fires.
    Accept,
    /// Played on the first decline.
    Decline,
}

/// Failure reported by an audio sink.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("playback of {source_url} failed: {message}")]
    Playback { source_url: String, message: String },
}

/// Something that can actually make noise.
pub trait AudioSink {
    /// Start playing `source` for `cue` from the beginning.
    fn play(&mut self, cue: Cue, source: &str) -> Result<(), AudioError>;

    /// Stop and rewind every cue.
    fn stop_all(&mut self);

    /// Mute or unmute everything.
    fn set_muted(&mut self, muted: bool);
}

/// Interface components use to request cues.
pub trait CuePlayer {
    /// Stop whatever is playing and play `cue`.
    fn play_cue(&mut self, cue: Cue);

    /// Start background music unless muted or already playing.
    fn start_background(&mut self);
}

/// A sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: Cue, _source: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_all(&mut self) {}

    fn set_muted(&mut self, _muted: bool) {}
}

/// Recording sink for tests.
#[derive(Debug, Default)]
pub struct MockAudio {
    played: Vec<Cue>,
    stops: usize,
    muted: bool,
    fail: bool,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every `play` fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Cues played, in order (failed attempts included).
    pub fn played(&self) -> &[Cue] {
        &self.played
    }

    pub fn stops(&self) -> usize {
        self.stops
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl AudioSink for MockAudio {
    fn play(&mut self, cue: Cue, source: &str) -> Result<(), AudioError> {
        self.played.push(cue);
        if self.fail {
            return Err(AudioError::Playback {
                source_url: source.to_string(),
                message: "mock failure".to_string(),
            });
        }
        Ok(())
    }

    fn stop_all(&mut self) {
        self.stops += 1;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// Applies the enable flag, mute state, and cue URLs on top of a sink.
#[derive(Debug)]
pub struct AudioController<A> {
    sink: A,
    enabled: bool,
    muted: bool,
    background_playing: bool,
    sources: HashMap<Cue, String>,
}

impl<A: AudioSink> AudioController<A> {
    /// Build from configuration. Disabled audio starts muted.
    pub fn new(config: &AudioConfig, sink: A) -> Self {
        let mut sources = HashMap::new();
        for (cue, url) in [
            (Cue::Background, &config.bgm_url),
            (Cue::Accept, &config.yes_url),
            (Cue::Decline, &config.no_url),
        ] {
            if let Some(url) = url {
                sources.insert(cue, url.clone());
            }
        }

        Self {
            sink,
            enabled: config.enabled,
            muted: !config.enabled,
            background_playing: false,
            sources,
        }
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Draw the mute toggle: hidden when audio is disabled.
    pub fn render_toggle(&self, surface: &mut dyn Surface) {
        if !self.enabled {
            surface.set_visible(Element::MuteToggle, false);
            return;
        }
        surface.set_visible(Element::MuteToggle, true);
        surface.set_text(Element::MuteToggle, self.toggle_label());
    }

    /// Flip the mute state.
    pub fn toggle_mute(&mut self, surface: &mut dyn Surface) {
        if !self.enabled {
            return;
        }
        self.muted = !self.muted;
        self.sink.set_muted(self.muted);
        surface.set_text(Element::MuteToggle, self.toggle_label());
        tracing::debug!("Audio muted: {}", self.muted);
    }

    fn toggle_label(&self) -> &'static str {
        if self.muted {
            "Music: Muted"
        } else {
            "Music: Playing"
        }
    }

    fn play(&mut self, cue: Cue) -> bool {
        let Some(source) = self.sources.get(&cue) else {
            return false;
        };
        match self.sink.play(cue, source) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Ignoring audio failure for {:?}: {}", cue, e);
                false
            }
        }
    }
}

impl<A: AudioSink> CuePlayer for AudioController<A> {
    fn play_cue(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        self.sink.stop_all();
        self.background_playing = false;
        self.play(cue);
    }

    fn start_background(&mut self) {
        if !self.enabled || self.muted || self.background_playing {
            return;
        }
        self.background_playing = self.play(Cue::Background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MockSurface;

    fn enabled_config() -> AudioConfig {
        AudioConfig {
            enabled: true,
            bgm_url: Some("bgm.mp3".to_string()),
            yes_url: Some("yes.mp3".to_string()),
            no_url: Some("no.mp3".to_string()),
        }
    }

    #[test]
    fn disabled_audio_plays_nothing_and_hides_toggle() {
        let mut audio = AudioController::new(&AudioConfig::default(), MockAudio::new());
        let mut surface = MockSurface::new();

        audio.render_toggle(&mut surface);
        audio.start_background();
        audio.play_cue(Cue::Accept);

        assert!(audio.sink().played().is_empty());
        assert_eq!(surface.is_visible(Element::MuteToggle), Some(false));
    }

    #[test]
    fn cue_stops_others_first() {
        let mut audio = AudioController::new(&enabled_config(), MockAudio::new());
        audio.start_background();
        audio.play_cue(Cue::Decline);

        assert_eq!(audio.sink().played(), &[Cue::Background, Cue::Decline]);
        assert_eq!(audio.sink().stops(), 1);
    }

    #[test]
    fn background_starts_once() {
        let mut audio = AudioController::new(&enabled_config(), MockAudio::new());
        audio.start_background();
        audio.start_background();

        assert_eq!(audio.sink().played(), &[Cue::Background]);
    }

    #[test]
    fn muted_background_does_not_start() {
        let mut audio = AudioController::new(&enabled_config(), MockAudio::new());
        let mut surface = MockSurface::new();

        audio.toggle_mute(&mut surface);
        audio.start_background();

        assert!(audio.sink().played().is_empty());
        assert!(audio.sink().is_muted());
        assert_eq!(surface.text(Element::MuteToggle), Some("Music: Muted"));
    }

    #[test]
    fn toggle_label_starts_playing() {
        let audio = AudioController::new(&enabled_config(), MockAudio::new());
        let mut surface = MockSurface::new();

        audio.render_toggle(&mut surface);
        assert_eq!(surface.text(Element::MuteToggle), Some("Music: Playing"));
    }

    #[test]
    fn sink_failures_are_swallowed() {
        let mut audio = AudioController::new(&enabled_config(), MockAudio::failing());
        audio.play_cue(Cue::Accept);
        audio.start_background();

        // Failed background start may be retried.
        audio.start_background();
        assert_eq!(
            audio.sink().played(),
            &[Cue::Accept, Cue::Background, Cue::Background]
        );
    }

    #[test]
    fn missing_source_is_skipped() {
        let config = AudioConfig {
            enabled: true,
            ..Default::default()
        };
        let mut audio = AudioController::new(&config, MockAudio::new());
        audio.play_cue(Cue::Decline);

        assert!(audio.sink().played().is_empty());
    }
}
