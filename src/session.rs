use chrono::Local;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::corpus::{Difficulty, SentenceProvider};
use crate::error::EngineError;
use crate::metrics::{accuracy, sentences_per_minute, words_per_minute, MIN_ELAPSED_SECS};
use crate::result::{TestResult, DEFAULT_LANGUAGE};
use crate::sequencer::SentenceSequencer;

/// Metrics refreshed on every keystroke and tick while a test is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveMetrics {
    pub wpm: u32,
    pub spm: u32,
    pub accuracy: f64,
    pub elapsed_secs: u64,
}

impl LiveMetrics {
    pub const IDLE: LiveMetrics = LiveMetrics {
        wpm: 0,
        spm: 0,
        accuracy: 100.0,
        elapsed_secs: 0,
    };
}

impl Default for LiveMetrics {
    fn default() -> Self {
        Self::IDLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Completed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
            SessionState::Completed => "completed",
        }
    }
}

/// What `advance()` did with the current sentence.
#[derive(Debug, Clone, PartialEq)]
pub enum Advanced {
    /// Moved on to the sentence at this index.
    Next(usize),
    /// That was the last sentence; the test is over.
    Finished(TestResult),
}

/// The mutable state of one test attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSession {
    sequencer: SentenceSequencer,
    typed_text: String,
    current_input: String,
    elapsed_secs: f64,
    active: bool,
}

impl TestSession {
    fn new(sequencer: SentenceSequencer) -> Self {
        Self {
            sequencer,
            typed_text: String::new(),
            current_input: String::new(),
            elapsed_secs: 0.0,
            active: false,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.sequencer.difficulty()
    }

    pub fn sentences(&self) -> &[String] {
        self.sequencer.sentences()
    }

    pub fn sequencer(&self) -> &SentenceSequencer {
        &self.sequencer
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.index()
    }

    pub fn current_sentence(&self) -> &str {
        self.sequencer.current_sentence()
    }

    pub fn reference_text(&self) -> &str {
        self.sequencer.reference_text()
    }

    /// Text committed so far by `advance()` and `finish()`.
    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    /// Uncommitted input for the current sentence.
    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn sample_clock(&mut self, clock: &impl Clock) {
        self.elapsed_secs = self.elapsed_secs.max(clock.elapsed());
    }

    fn live_metrics(&self) -> LiveMetrics {
        if !self.active || self.elapsed_secs == 0.0 {
            return LiveMetrics::IDLE;
        }

        let typed_so_far = format!("{}{}", self.typed_text, self.current_input);

        LiveMetrics {
            wpm: words_per_minute(&typed_so_far, self.elapsed_secs),
            spm: sentences_per_minute(self.current_index(), self.elapsed_secs),
            accuracy: accuracy(self.current_sentence(), &self.current_input),
            elapsed_secs: self.elapsed_secs.round() as u64,
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Active(TestSession),
    Completed {
        session: TestSession,
        result: TestResult,
    },
}

/// Drives one typing test at a time through Idle, Active and Completed.
#[derive(Debug)]
pub struct SessionController<C: Clock = SystemClock> {
    user_name: String,
    clock: C,
    phase: Phase,
}

impl SessionController<SystemClock> {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self::with_clock(user_name, SystemClock::new())
    }
}

impl<C: Clock> SessionController<C> {
    pub fn with_clock(user_name: impl Into<String>, clock: C) -> Self {
        Self {
            user_name: user_name.into(),
            clock,
            phase: Phase::Idle,
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Active(_) => SessionState::Active,
            Phase::Completed { .. } => SessionState::Completed,
        }
    }

    /// The running session, or the frozen one after completion.
    pub fn session(&self) -> Option<&TestSession> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Active(session) | Phase::Completed { session, .. } => Some(session),
        }
    }

    pub fn last_result(&self) -> Option<&TestResult> {
        match &self.phase {
            Phase::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn current_sentence(&self) -> Option<&str> {
        self.session().map(TestSession::current_sentence)
    }

    /// Uncommitted text for the current sentence; empty outside a running test.
    pub fn current_input(&self) -> &str {
        match &self.phase {
            Phase::Active(session) => session.current_input(),
            _ => "",
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Begins a new test with the sentences `provider` has for `difficulty`.
    ///
    /// The clock is armed but only starts counting on the first input.
    pub fn start(
        &mut self,
        difficulty: Difficulty,
        provider: &dyn SentenceProvider,
    ) -> Result<(), EngineError> {
        if let Phase::Active(_) = self.phase {
            return Err(EngineError::invalid_state("start", self.state().as_str()));
        }

        let sequencer = SentenceSequencer::new(difficulty, provider)?;
        debug!(
            %difficulty,
            sentences = sequencer.sentence_count(),
            "starting typing test"
        );
        self.begin(sequencer);
        Ok(())
    }

    /// Restarts the current difficulty from its first sentence.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        let sequencer = match &self.phase {
            Phase::Idle => return Err(EngineError::invalid_state("reset", "idle")),
            Phase::Active(session) | Phase::Completed { session, .. } => {
                SentenceSequencer::from_sentences(
                    session.difficulty(),
                    session.sentences().to_vec(),
                )?
            }
        };

        debug!(difficulty = %sequencer.difficulty(), "resetting typing test");
        self.begin(sequencer);
        Ok(())
    }

    fn begin(&mut self, sequencer: SentenceSequencer) {
        self.clock.stop();
        self.clock.reset();
        self.phase = Phase::Active(TestSession::new(sequencer));
    }

    /// Replaces the input for the current sentence and returns fresh live metrics.
    pub fn submit_input(&mut self, text: &str) -> Result<LiveMetrics, EngineError> {
        let state = self.state();
        let Phase::Active(session) = &mut self.phase else {
            return Err(EngineError::invalid_state("submit input", state.as_str()));
        };

        if !session.active {
            session.active = true;
            self.clock.start();
        }

        session.current_input.clear();
        session.current_input.push_str(text);
        session.sample_clock(&self.clock);

        Ok(session.live_metrics())
    }

    /// Periodic refresh for the host's timer; `None` unless a test is running.
    pub fn tick(&mut self) -> Option<LiveMetrics> {
        match &mut self.phase {
            Phase::Active(session) => {
                session.sample_clock(&self.clock);
                Some(session.live_metrics())
            }
            _ => None,
        }
    }

    /// Commits the current input and moves to the next sentence, finishing after the last.
    pub fn advance(&mut self) -> Result<Advanced, EngineError> {
        let state = self.state();
        let Phase::Active(session) = &mut self.phase else {
            return Err(EngineError::invalid_state("advance", state.as_str()));
        };

        let input = std::mem::take(&mut session.current_input);
        session.typed_text.push_str(&input);
        session.typed_text.push(' ');

        if session.sequencer.has_next() {
            session.sequencer.advance();
            debug!(index = session.current_index(), "advanced to next sentence");
            return Ok(Advanced::Next(session.current_index()));
        }

        self.finish().map(Advanced::Finished)
    }

    /// Ends the test and scores everything typed against the full reference text.
    ///
    /// Every sentence after the current one that was never attempted contributes a
    /// single blank to the typed text.
    pub fn finish(&mut self) -> Result<TestResult, EngineError> {
        let mut session = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Active(session) => session,
            other => {
                self.phase = other;
                return Err(EngineError::invalid_state("finish", self.state().as_str()));
            }
        };

        let pending = std::mem::take(&mut session.current_input);
        if !pending.trim().is_empty() {
            session.typed_text.push_str(&pending);
            session.typed_text.push(' ');
        }
        for _ in 0..session.sequencer.remaining() {
            session.typed_text.push(' ');
        }
        let trimmed_len = session.typed_text.trim_end().len();
        session.typed_text.truncate(trimmed_len);

        self.clock.stop();
        session.sample_clock(&self.clock);
        if !session.active || session.elapsed_secs == 0.0 {
            session.elapsed_secs = MIN_ELAPSED_SECS;
        }
        session.active = false;

        let elapsed = session.elapsed_secs;
        let result = TestResult {
            user_name: self.user_name.clone(),
            difficulty: session.difficulty(),
            language: DEFAULT_LANGUAGE.to_string(),
            wpm: words_per_minute(&session.typed_text, elapsed),
            spm: sentences_per_minute(session.current_index() + 1, elapsed),
            accuracy: accuracy(session.reference_text(), &session.typed_text),
            timestamp: Local::now(),
        };

        info!(
            user = %result.user_name,
            difficulty = %result.difficulty,
            wpm = result.wpm,
            spm = result.spm,
            accuracy = result.accuracy,
            elapsed_secs = elapsed,
            "typing test finished"
        );

        self.phase = Phase::Completed {
            session,
            result: result.clone(),
        };
        Ok(result)
    }
}
