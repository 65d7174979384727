use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TrialEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait TrialEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<TrialEvent, RecvTimeoutError>;
}

/// Event source fed by an in-process channel.
///
/// The terminal reader thread and headless tests both push into one of these.
pub struct ChannelEventSource {
    rx: Receiver<TrialEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<TrialEvent>) -> Self {
        Self { rx }
    }

    /// Spawns a thread forwarding crossterm key presses and resizes.
    pub fn crossterm() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // key releases are reported on some platforms; only presses count
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    TrialEvent::Key(key)
                }
                Ok(CtEvent::Resize(_, _)) => TrialEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self::new(rx)
    }
}

impl TrialEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrialEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Cadence of live metric refreshes.
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms.max(1)))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Interleaves terminal events with ticks on a fixed schedule.
///
/// Ticks keep their cadence under continuous typing; a busy channel never starves them.
pub struct Runner<E: TrialEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Instant>,
}

impl<E: TrialEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Cell::new(Instant::now() + ticker.interval());
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Next event, or `Tick` once the tick deadline has passed.
    pub fn step(&self) -> TrialEvent {
        let now = Instant::now();
        let deadline = self.next_tick.get();
        if now >= deadline {
            return self.tick_from(now);
        }

        match self.event_source.recv_timeout(deadline - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.tick_from(Instant::now())
            }
        }
    }

    fn tick_from(&self, now: Instant) -> TrialEvent {
        self.next_tick.set(now + self.ticker.interval());
        TrialEvent::Tick
    }
}
