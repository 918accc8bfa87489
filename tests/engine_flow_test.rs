//! End-to-end flows through the engine with a mock surface.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use httpmock::prelude::*;
use serenade::config::{parse_config, SiteConfig};
use serenade::engine::{Cue, Engine, InputEvent, MockAudio, Screen};
use serenade::submission::{SkipReason, SubmissionOutcome, Transport};
use serenade::surface::{Element, MockSurface};
use serenade::TransportError;

const SITE: &str = r#"{
    "personal": {
        "toName": "Sam",
        "fromName": "Alex",
        "introLines": ["Hi {toName}", "I have a question"],
        "questionHeading": "{toName}, will you be my valentine?",
        "yesMessageHead": "Yay!",
        "noSequence": [
            { "phrase": "Are you sure?", "gif": "sad.gif" },
            { "phrase": "Really sure?" },
            { "reset": true }
        ],
        "finalThanksTitle": "Thank you, {toName}!"
    },
    "media": {
        "memeQuestionGif": "ask.gif",
        "finalNoGif": "final.gif",
        "audio": {
            "enabled": true,
            "bgmUrl": "bgm.mp3",
            "yesUrl": "yes.mp3",
            "noUrl": "no.mp3"
        }
    },
    "choices": {
        "food": ["Pizza", "Something else (tell me)"],
        "flowers": ["Tulips", "Roses"],
        "sweets": ["Chocolate", "Macarons"]
    },
    "github": { "enabled": true }
}"#;

#[derive(Default)]
struct RecordingTransport {
    bodies: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn deliver(&self, record: &str) -> Result<(), TransportError> {
        self.bodies.lock().unwrap().push(record.to_string());
        Ok(())
    }
}

struct FailingTransport;

impl Transport for FailingTransport {
    fn deliver(&self, _record: &str) -> Result<(), TransportError> {
        Err(TransportError::Http {
            status: 500,
            body: "boom".to_string(),
        })
    }
}

fn site() -> SiteConfig {
    parse_config(SITE, "site.config.json").unwrap()
}

fn engine(config: SiteConfig) -> Engine<MockSurface, MockAudio> {
    Engine::new(config, MockSurface::with_decision_layout(), MockAudio::new()).with_seed(11)
}

fn reach_question(engine: &mut Engine<MockSurface, MockAudio>) {
    assert!(engine.handle(InputEvent::PointerDown, 0));
    engine.handle(InputEvent::IntroTap, 10);
    engine.tick(500);
    assert!(engine.handle(InputEvent::IntroContinue, 500));
    assert_eq!(engine.active_screen(), Some(Screen::Question));
}

fn accept_and_fill_wizard(engine: &mut Engine<MockSurface, MockAudio>, now: u64) {
    assert!(engine.handle(InputEvent::Accept, now));
    assert!(engine.handle(InputEvent::StartWizard, now));

    let steps = [
        InputEvent::SelectOption("Something else (tell me)".to_string()),
        InputEvent::FreeText("  Sushi ".to_string()),
        InputEvent::Next,
        InputEvent::SelectOption("Roses".to_string()),
        InputEvent::Next,
        InputEvent::SelectOption("Chocolate".to_string()),
        InputEvent::Next,
        InputEvent::DateInput("2026-02-14".to_string()),
        InputEvent::Next,
    ];
    for event in steps {
        assert!(engine.handle(event.clone(), now), "{:?} was ignored", event);
    }
}

#[test]
fn full_flow_with_evasive_decline() {
    let transport = Arc::new(RecordingTransport::default());
    let mut engine =
        engine(site()).with_transport(Some(Arc::clone(&transport) as Arc<dyn Transport>));

    reach_question(&mut engine);
    assert_eq!(
        engine.surface().text(Element::QuestionHeading),
        Some("Sam, will you be my valentine?")
    );

    assert!(engine.handle(InputEvent::Decline, 1000));
    assert_eq!(
        engine.surface().text(Element::DeclineButton),
        Some("Are you sure?")
    );
    assert_eq!(engine.surface().image(Element::QuestionImage), Some("sad.gif"));
    assert!(engine.handle(InputEvent::Decline, 1100));
    assert!(engine.handle(InputEvent::Decline, 1200));

    assert!(engine.state().evasive_mode_active);
    assert_eq!(engine.state().decline_count, 3);
    assert_eq!(engine.surface().text(Element::DeclineButton), Some("No"));
    assert_eq!(engine.surface().image(Element::QuestionImage), Some("final.gif"));
    assert!(engine.surface().is_evasive(Element::DeclineButton));

    // Once evasive, decline presses are swallowed and the control moves away
    assert!(!engine.handle(InputEvent::Decline, 1300));
    assert_eq!(engine.state().decline_count, 3);
    assert!(engine.handle(InputEvent::DeclineFocus, 1300));
    assert!(engine.surface().position(Element::DeclineButton).is_some());

    accept_and_fill_wizard(&mut engine, 2000);
    assert_eq!(engine.active_screen(), Some(Screen::Submit));

    let summary = engine.surface().summaries().last().unwrap();
    let pairs: Vec<(&str, &str)> = summary
        .iter()
        .map(|row| (row.label.as_str(), row.value.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Food", "Sushi"),
            ("Flowers", "Roses"),
            ("Sweet", "Chocolate"),
            ("Date", "2026-02-14"),
        ]
    );

    assert!(matches!(
        engine.settle_submission(Duration::from_secs(5)),
        Some(SubmissionOutcome::Delivered)
    ));
    let bodies = transport.bodies();
    assert_eq!(bodies.len(), 1);
    let record = &bodies[0];
    assert!(record.starts_with("New Valentine response ("));
    for line in [
        "To: Sam",
        "From: Alex",
        "No attempts: Max",
        "No evasive enabled: Yes",
        "Food: Sushi",
        "Flowers: Roses",
        "Sweet: Chocolate",
        "Date: 2026-02-14",
        "Page: —",
    ] {
        assert!(record.contains(line), "missing {:?} in\n{}", line, record);
    }

    engine.tick(6999);
    assert!(!engine.is_finished());
    engine.tick(7000);
    assert!(engine.is_finished());
    assert_eq!(
        engine.surface().text(Element::FinalTitle),
        Some("Thank you, Sam!")
    );

    assert_eq!(
        engine.audio().sink().played(),
        &[Cue::Background, Cue::Decline, Cue::Accept]
    );
}

#[test]
fn quick_accept_records_zero_attempts() {
    let transport = Arc::new(RecordingTransport::default());
    let mut engine =
        engine(site()).with_transport(Some(Arc::clone(&transport) as Arc<dyn Transport>));

    reach_question(&mut engine);
    accept_and_fill_wizard(&mut engine, 1000);
    engine.settle_submission(Duration::from_secs(5));

    let record = &transport.bodies()[0];
    assert!(record.contains("No attempts: 0"));
    assert!(record.contains("No evasive enabled: No"));
}

#[test]
fn failed_delivery_still_reaches_final_screen() {
    let mut engine = engine(site()).with_transport(Some(Arc::new(FailingTransport)));

    reach_question(&mut engine);
    accept_and_fill_wizard(&mut engine, 1000);

    assert!(matches!(
        engine.settle_submission(Duration::from_secs(5)),
        Some(SubmissionOutcome::Failed(TransportError::Http { status: 500, .. }))
    ));
    assert!(!engine.has_pending_submission());

    engine.tick(6000);
    assert!(engine.is_finished());
}

#[test]
fn disabled_submission_is_skipped() {
    let mut config = site();
    config.github.enabled = false;
    let transport = Arc::new(RecordingTransport::default());
    let mut engine =
        engine(config).with_transport(Some(Arc::clone(&transport) as Arc<dyn Transport>));

    reach_question(&mut engine);
    accept_and_fill_wizard(&mut engine, 1000);

    assert!(matches!(
        engine.last_outcome(),
        Some(SubmissionOutcome::Skipped(SkipReason::Disabled))
    ));
    assert!(transport.bodies().is_empty());
}

#[test]
fn incomplete_step_blocks_the_wizard() {
    let mut engine = engine(site());
    reach_question(&mut engine);
    engine.handle(InputEvent::Accept, 1000);
    engine.handle(InputEvent::StartWizard, 1000);

    assert!(!engine.handle(InputEvent::Next, 1000));
    engine.handle(
        InputEvent::SelectOption("Something else (tell me)".to_string()),
        1000,
    );
    assert!(!engine.handle(InputEvent::Next, 1000));
    assert_eq!(engine.wizard().index(), 0);

    engine.handle(InputEvent::SelectOption("Pizza".to_string()), 1000);
    assert!(engine.handle(InputEvent::Next, 1000));
    assert_eq!(engine.wizard().index(), 1);
}

#[test]
fn posts_to_github_issue_comments() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/alex/valentine/issues/3/comments")
            .header("authorization", "Bearer secret");
        then.status(201);
    });

    let mut config = site();
    config.github.api_base = server.base_url();
    config.github.owner = Some("alex".to_string());
    config.github.repo = Some("valentine".to_string());
    config.github.issue_number = Some(3);
    config.github.token = Some("secret".to_string());

    let mut engine = engine(config);
    reach_question(&mut engine);
    accept_and_fill_wizard(&mut engine, 1000);

    assert!(matches!(
        engine.settle_submission(Duration::from_secs(10)),
        Some(SubmissionOutcome::Delivered)
    ));
    mock.assert();
}
