use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

use typetrial::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    corpus::{Corpus, Difficulty},
    history::{export, FileHistoryStore, HistoryStore},
    logging,
    runtime::{ChannelEventSource, FixedTicker, Runner, TrialEvent},
};

const FALLBACK_USER: &str = "player";

/// sentence typing test with live wpm, spm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// name recorded with each result (defaults to config, then $USER)
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// difficulty preselected in the menu
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// json file with sentences per difficulty, replacing the built-in set
    #[clap(short = 'c', long)]
    corpus: Option<PathBuf>,

    /// history file to read and append to
    #[clap(long)]
    history_file: Option<PathBuf>,

    /// write history as pipe-delimited text to this path ("-" for stdout) and exit
    #[clap(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// write tracing output to the log file in the state directory
    #[clap(long)]
    log: bool,

    /// milliseconds between live metric refreshes
    #[clap(long)]
    tick_rate_ms: Option<u64>,
}

impl Cli {
    /// Folds command line overrides into the stored config.
    fn merge(&self, mut config: Config, env_user: Option<String>) -> Config {
        config.user_name = self
            .name
            .clone()
            .or(config.user_name)
            .or(env_user)
            .filter(|name| !name.trim().is_empty())
            .or_else(|| Some(FALLBACK_USER.to_string()));
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(path) = &self.corpus {
            config.corpus_path = Some(path.clone());
        }
        if let Some(ms) = self.tick_rate_ms {
            config.tick_rate_ms = ms;
        }
        config
    }

    fn history_store(&self) -> FileHistoryStore {
        match &self.history_file {
            Some(path) => FileHistoryStore::with_path(path),
            None => FileHistoryStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.log {
        if let Err(err) = logging::init(&AppDirs::log_path()) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store = cli.history_store();

    if let Some(path) = &cli.export {
        let results = store.try_load()?;
        if path.as_os_str() == "-" {
            export(&results, io::stdout())?;
        } else {
            export(&results, File::create(path)?)?;
        }
        info!(count = results.len(), path = %path.display(), "exported history");
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let config = cli.merge(config_store.load(), std::env::var("USER").ok());
    if let Err(err) = config_store.save(&config) {
        warn!(error = %err, "could not save config");
    }

    let corpus = match &config.corpus_path {
        Some(path) => Corpus::load(path)?,
        None => Corpus::builtin()?,
    };
    let user_name = config
        .user_name
        .clone()
        .unwrap_or_else(|| FALLBACK_USER.to_string());

    let mut app = App::new(user_name, corpus, Box::new(store), config.difficulty);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app, config.tick_rate_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        ChannelEventSource::crossterm(),
        FixedTicker::from_millis(tick_rate_ms),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            TrialEvent::Tick => app.on_tick(),
            TrialEvent::Resize => {}
            TrialEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    // a session abandoned mid-test still counts
    if app.controller().session().is_some_and(|s| s.is_active()) {
        app.finish();
    }

    Ok(())
}
