use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::EngineError;
use crate::result::TestResult;

/// Maximum number of results kept; older ones are dropped first.
pub const HISTORY_CAPACITY: usize = 100;

/// Persistence for completed results, most recent first.
pub trait HistoryStore {
    fn try_load(&self) -> Result<Vec<TestResult>, EngineError>;

    fn save(&self, results: &[TestResult]) -> io::Result<()>;

    /// Like `try_load`, but unreadable data counts as an empty history.
    fn load(&self) -> Vec<TestResult> {
        self.try_load().unwrap_or_else(|err| {
            warn!(error = %err, "discarding unreadable history");
            Vec::new()
        })
    }
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_path(AppDirs::history_path())
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FileHistoryStore {
    fn try_load(&self) -> Result<Vec<TestResult>, EngineError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(EngineError::CorruptPersistedHistory(err.to_string())),
        };

        serde_json::from_slice(&bytes)
            .map_err(|err| EngineError::CorruptPersistedHistory(err.to_string()))
    }

    fn save(&self, results: &[TestResult]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(results)?;
        fs::write(&self.path, data)
    }
}

/// In-process store, for tests and hosts without a writable disk.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    results: RefCell<Vec<TestResult>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn try_load(&self) -> Result<Vec<TestResult>, EngineError> {
        Ok(self.results.borrow().clone())
    }

    fn save(&self, results: &[TestResult]) -> io::Result<()> {
        *self.results.borrow_mut() = results.to_vec();
        Ok(())
    }
}

/// Bounded, most-recent-first list of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<TestResult>,
}

impl History {
    pub fn new(mut entries: Vec<TestResult>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }

    pub fn load(store: &dyn HistoryStore) -> Self {
        Self::new(store.load())
    }

    /// Adds `result` as the newest entry, evicting the oldest past capacity.
    pub fn push(&mut self, result: TestResult) {
        self.entries.insert(0, result);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn entries(&self) -> &[TestResult] {
        &self.entries
    }

    pub fn for_user<'a>(&'a self, user_name: &'a str) -> impl Iterator<Item = &'a TestResult> {
        self.entries
            .iter()
            .filter(move |result| result.user_name == user_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Prepends `result` to the stored history and writes the capped list back.
pub fn record_result(store: &dyn HistoryStore, result: TestResult) -> io::Result<History> {
    let mut history = History::load(store);
    history.push(result);
    store.save(history.entries())?;
    Ok(history)
}

/// Writes results as pipe-delimited lines with a header row.
pub fn export<'a, W, I>(results: I, writer: W) -> csv::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a TestResult>,
{
    let mut wtr = csv::WriterBuilder::new().delimiter(b'|').from_writer(writer);

    wtr.write_record([
        "userName",
        "difficulty",
        "language",
        "wpm",
        "spm",
        "accuracy",
        "dateTime",
    ])?;

    for result in results {
        wtr.write_record([
            result.user_name.clone(),
            result.difficulty.to_string(),
            result.language.clone(),
            result.wpm.to_string(),
            result.spm.to_string(),
            format!("{:.2}", result.accuracy),
            result.formatted_timestamp(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
