//! Periodic drain-and-fold of feed messages.
//!
//! The coalescer owns the [`DisplayState`] and the consumer half of the
//! latest-wins channel. On every tick it drains whatever is pending, folds
//! it into the state in arrival order and produces a fresh [`Readout`].
//! Ticks are scheduled from the moment the previous tick completed, so they
//! never overlap.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::debug;

use super::{DisplayState, LevelThresholds, Readout};
use crate::channel::Drain;
use crate::feed::ClassifiedMessage;

/// Display cadence and formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Unit suffix appended to the reading.
    pub unit: String,
    /// Time between the end of one tick and the next.
    pub refresh_interval: Duration,
    /// Delay before the first tick, giving the reader time for a first read.
    pub initial_delay: Duration,
    pub thresholds: LevelThresholds,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            unit: "dB".to_string(),
            refresh_interval: Duration::from_millis(1000),
            initial_delay: Duration::from_millis(100),
            thresholds: LevelThresholds::default(),
        }
    }
}

/// Fold messages into `state` in order.
pub fn fold<I>(state: &mut DisplayState, messages: I, at: DateTime<Local>) -> usize
where
    I: IntoIterator<Item = ClassifiedMessage>,
{
    let mut count = 0;
    for message in messages {
        state.apply(message, at);
        count += 1;
    }
    count
}

/// Drains the channel on a fixed cadence and keeps the display state.
#[derive(Debug)]
pub struct Coalescer {
    drain: Drain<ClassifiedMessage>,
    state: DisplayState,
    settings: DisplaySettings,
    readout: Readout,
    next_tick: Option<Instant>,
    ticks: u64,
}

impl Coalescer {
    /// Create a coalescer whose first tick is due `initial_delay` after `now`.
    pub fn new(drain: Drain<ClassifiedMessage>, settings: DisplaySettings, now: Instant) -> Self {
        let state = DisplayState::new();
        let readout = state.readout(&settings.unit, &settings.thresholds);
        Self {
            drain,
            state,
            next_tick: Some(now + settings.initial_delay),
            settings,
            readout,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// The readout produced by the most recent tick.
    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// When the next tick is due, or `None` once stopped.
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_tick.is_some_and(|due| now >= due)
    }

    /// Run a tick if one is due, then schedule the next one.
    pub fn poll(&mut self, now: Instant) -> Option<&Readout> {
        if !self.is_due(now) {
            return None;
        }
        self.tick(Local::now());
        self.next_tick = Some(now + self.settings.refresh_interval);
        Some(&self.readout)
    }

    /// Drain the channel, fold everything into the state and render a readout.
    pub fn tick(&mut self, at: DateTime<Local>) -> &Readout {
        let folded = fold(&mut self.state, self.drain.drain(), at);
        self.readout = self
            .state
            .readout(&self.settings.unit, &self.settings.thresholds);
        self.ticks += 1;
        if folded > 0 {
            debug!(folded, value = %self.readout.value, "display updated");
        }
        &self.readout
    }

    /// Stop scheduling ticks. Permanent.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn is_stopped(&self) -> bool {
        self.next_tick.is_none()
    }
}
