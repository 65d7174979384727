// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod diff;
pub mod error;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod result;
pub mod runtime;
pub mod sequencer;
pub mod session;
pub mod ui;

pub use clock::{Clock, ManualClock, SystemClock};
pub use corpus::{Corpus, Difficulty, SentenceProvider};
pub use error::EngineError;
pub use history::{FileHistoryStore, History, HistoryStore, MemoryHistoryStore};
pub use result::TestResult;
pub use sequencer::SentenceSequencer;
pub use session::{Advanced, LiveMetrics, SessionController, SessionState, TestSession};
