use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use typetrial::app::{App, Control, Screen};
use typetrial::runtime::{ChannelEventSource, FixedTicker, Runner, TrialEvent};
use typetrial::{Corpus, Difficulty, ManualClock, MemoryHistoryStore, SessionController};

fn key(code: KeyCode) -> TrialEvent {
    TrialEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn create_app() -> App<ManualClock> {
    App::with_clock(
        SessionController::with_clock("ada", ManualClock::new()),
        Corpus::builtin().unwrap(),
        Box::new(MemoryHistoryStore::new()),
        Difficulty::Easy,
    )
}

// Drives the app the same way the binary does, without a TTY.
fn drive(app: &mut App<ManualClock>, runner: &Runner<ChannelEventSource, FixedTicker>) -> bool {
    for _ in 0..500u32 {
        match runner.step() {
            TrialEvent::Tick => {
                app.controller_mut().clock_mut().advance(0.5);
                app.on_tick();
                if app.screen() == Screen::Results {
                    return false;
                }
            }
            TrialEvent::Resize => {}
            TrialEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    return true;
                }
            }
        }
    }
    false
}

#[test]
fn headless_typing_flow_completes() {
    let mut app = create_app();
    let sentences = Corpus::builtin().unwrap().sentences[&Difficulty::Easy].clone();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Char('1'))).unwrap();
    for sentence in &sentences {
        for c in sentence.chars() {
            tx.send(key(KeyCode::Char(c))).unwrap();
        }
        tx.send(key(KeyCode::Enter)).unwrap();
    }

    let quit = drive(&mut app, &runner);

    assert!(!quit);
    assert_eq!(app.screen(), Screen::Results);
    let result = app.last_result().unwrap();
    assert_eq!(result.accuracy, 100.0);
    assert_eq!(result.difficulty, Difficulty::Easy);
    assert_eq!(app.history().len(), 1);
}

#[test]
fn headless_escape_then_quit() {
    let mut app = create_app();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(200)),
    );

    tx.send(key(KeyCode::Char('2'))).unwrap();
    for c in "Programming".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Esc)).unwrap();
    tx.send(key(KeyCode::Esc)).unwrap();

    let quit = drive(&mut app, &runner);

    assert!(quit);
    let result = app.last_result().unwrap();
    assert_eq!(result.difficulty, Difficulty::Medium);
    assert!(result.accuracy > 0.0 && result.accuracy < 100.0);
}

#[test]
fn headless_ticks_refresh_live_metrics() {
    let mut app = create_app();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(200)),
    );

    tx.send(key(KeyCode::Enter)).unwrap();
    for c in "The cat".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    for _ in 0..("The cat".len() + 1) {
        let _ = app.on_key(match runner.step() {
            TrialEvent::Key(key) => key,
            other => panic!("expected key, got {other:?}"),
        });
    }

    // channel is drained, so the next steps are ticks
    for _ in 0..4 {
        assert!(matches!(runner.step(), TrialEvent::Tick));
        app.controller_mut().clock_mut().advance(3.0);
        app.on_tick();
    }

    let live = app.live();
    assert_eq!(live.elapsed_secs, 12);
    assert_eq!(live.wpm, 10);
    assert_eq!(live.spm, 0);
}
