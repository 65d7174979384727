use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::corpus::{Corpus, Difficulty};
use crate::history::{record_result, History, HistoryStore};
use crate::result::TestResult;
use crate::session::{Advanced, LiveMetrics, SessionController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Typing,
    Results,
    History { mine_only: bool },
}

/// Whether the event loop should keep going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Screen state plus the engine, the corpus and the history it records into.
pub struct App<C: Clock = SystemClock> {
    controller: SessionController<C>,
    corpus: Corpus,
    history_store: Box<dyn HistoryStore>,
    history: History,
    screen: Screen,
    difficulty: Difficulty,
    input: String,
    live: LiveMetrics,
    status: Option<String>,
}

impl App<SystemClock> {
    pub fn new(
        user_name: impl Into<String>,
        corpus: Corpus,
        history_store: Box<dyn HistoryStore>,
        difficulty: Difficulty,
    ) -> Self {
        Self::with_clock(
            SessionController::new(user_name),
            corpus,
            history_store,
            difficulty,
        )
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(
        controller: SessionController<C>,
        corpus: Corpus,
        history_store: Box<dyn HistoryStore>,
        difficulty: Difficulty,
    ) -> Self {
        let history = History::load(history_store.as_ref());
        Self {
            controller,
            corpus,
            history_store,
            history,
            screen: Screen::Menu,
            difficulty,
            input: String::new(),
            live: LiveMetrics::IDLE,
            status: None,
        }
    }

    pub fn controller(&self) -> &SessionController<C> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SessionController<C> {
        &mut self.controller
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The selected (or last played) difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn live(&self) -> LiveMetrics {
        self.live
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn last_result(&self) -> Option<&TestResult> {
        self.controller.last_result()
    }

    /// History entries visible on the history screen.
    pub fn visible_history(&self) -> Vec<&TestResult> {
        match self.screen {
            Screen::History { mine_only: true } => self
                .history
                .for_user(self.controller.user_name())
                .collect(),
            _ => self.history.entries().iter().collect(),
        }
    }

    pub fn start_test(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        match self.controller.start(difficulty, &self.corpus) {
            Ok(()) => self.begin_typing(),
            Err(err) => self.report(err.to_string()),
        }
    }

    fn begin_typing(&mut self) {
        self.input.clear();
        self.live = LiveMetrics::IDLE;
        self.status = None;
        self.screen = Screen::Typing;
    }

    pub fn on_tick(&mut self) {
        if let Some(live) = self.controller.tick() {
            self.live = live;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.screen {
            Screen::Menu => self.on_menu_key(key),
            Screen::Typing => {
                self.on_typing_key(key);
                Control::Continue
            }
            Screen::Results => self.on_results_key(key),
            Screen::History { mine_only } => {
                self.on_history_key(key, mine_only);
                Control::Continue
            }
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.difficulty = self.step_difficulty(-1),
            KeyCode::Down | KeyCode::Char('j') => self.difficulty = self.step_difficulty(1),
            KeyCode::Enter => self.start_test(self.difficulty),
            KeyCode::Char('1') => self.start_test(Difficulty::Easy),
            KeyCode::Char('2') => self.start_test(Difficulty::Medium),
            KeyCode::Char('3') => self.start_test(Difficulty::Hard),
            KeyCode::Char('h') => self.screen = Screen::History { mine_only: true },
            KeyCode::Char('a') => self.screen = Screen::History { mine_only: false },
            _ => {}
        }
        Control::Continue
    }

    fn step_difficulty(&self, delta: isize) -> Difficulty {
        let tiers = Difficulty::ALL;
        let idx = tiers.iter().position(|d| *d == self.difficulty).unwrap_or(0) as isize;
        let next = (idx + delta).clamp(0, tiers.len() as isize - 1);
        tiers[next as usize]
    }

    fn on_typing_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => self.reset(),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.input.push(c);
                self.submit();
            }
            KeyCode::Backspace => {
                if self.input.pop().is_some() {
                    self.submit();
                }
            }
            KeyCode::Enter => self.advance(),
            KeyCode::Esc => self.finish(),
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('n') => self.screen = Screen::Menu,
            KeyCode::Char('h') => self.screen = Screen::History { mine_only: true },
            KeyCode::Char('a') => self.screen = Screen::History { mine_only: false },
            _ => {}
        }
        Control::Continue
    }

    fn on_history_key(&mut self, key: KeyEvent, mine_only: bool) {
        match key.code {
            KeyCode::Tab => {
                self.screen = Screen::History {
                    mine_only: !mine_only,
                }
            }
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => {
                self.screen = if self.last_result().is_some() {
                    Screen::Results
                } else {
                    Screen::Menu
                };
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        match self.controller.submit_input(&self.input) {
            Ok(live) => self.live = live,
            Err(err) => self.report(err.to_string()),
        }
    }

    fn advance(&mut self) {
        match self.controller.advance() {
            Ok(Advanced::Next(_)) => {
                self.input.clear();
                self.live = self.controller.tick().unwrap_or_default();
            }
            Ok(Advanced::Finished(result)) => self.complete(result),
            Err(err) => self.report(err.to_string()),
        }
    }

    pub fn finish(&mut self) {
        match self.controller.finish() {
            Ok(result) => self.complete(result),
            Err(err) => self.report(err.to_string()),
        }
    }

    fn reset(&mut self) {
        match self.controller.reset() {
            Ok(()) => self.begin_typing(),
            Err(err) => self.report(err.to_string()),
        }
    }

    fn complete(&mut self, result: TestResult) {
        self.input.clear();
        self.screen = Screen::Results;
        match record_result(self.history_store.as_ref(), result.clone()) {
            Ok(history) => self.history = history,
            Err(err) => {
                // keep the result visible in this run even if the disk is unwritable
                self.history.push(result);
                self.report(format!("could not save history: {err}"));
            }
        }
    }

    fn report(&mut self, message: String) {
        warn!(%message, screen = ?self.screen, "action failed");
        self.status = Some(message);
    }
}
