//! # dbwatch
//!
//! A terminal sound level meter for devices that print one reading per
//! line over a serial port.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  blocking worker                     render loop (main)      │
//! │  ┌───────────┐  ┌──────────────┐    ┌───────────┐  ┌──────┐ │
//! │  │ Transport │─▶│  FeedReader  │─┐  │ Coalescer │─▶│  ui  │ │
//! │  └───────────┘  │ classify_line│ │  │ (Display  │  └──────┘ │
//! │                 └──────▲───────┘ │  │   State)  │           │
//! │                        │         ▼  └─────▲─────┘           │
//! │                 cancel │   ┌─────────────┐│                 │
//! │              ┌─────────┴┐  │ latest-wins ├┘                 │
//! │              │Lifecycle │  │   channel   │                  │
//! │              └──────────┘  └─────────────┘                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`feed`]**: transports, line classification and the background
//!   [`FeedReader`]
//! - **[`channel`]**: the capacity-1 hand-off where a newer message replaces
//!   an undelivered older one
//! - **[`display`]**: [`DisplayState`], the periodic [`Coalescer`] and the
//!   [`Readout`] handed to the renderer
//! - **[`lifecycle`]**: cancellation and the process phases
//! - **[`ui`]**: terminal rendering using ratatui
//!
//! ## Usage
//!
//! ```bash
//! # Read from a serial port
//! dbwatch --port /dev/ttyUSB0 --baud 115200
//!
//! # Read lines from standard input
//! some-recorder | dbwatch --port -
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::time::Instant;
//! use dbwatch::channel::latest_wins;
//! use dbwatch::{ClassifiedMessage, Coalescer, DisplaySettings};
//!
//! let (publisher, drain) = latest_wins();
//! let mut coalescer = Coalescer::new(drain, DisplaySettings::default(), Instant::now());
//!
//! publisher.publish(ClassifiedMessage::Value(42.0));
//! let readout = coalescer.tick(chrono::Local::now());
//! assert_eq!(readout.value, "42.0 dB");
//! ```

pub mod app;
pub mod channel;
pub mod config;
pub mod display;
pub mod duration;
pub mod error;
pub mod events;
pub mod feed;
pub mod lifecycle;
pub mod logging;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{Overrides, Settings};
pub use display::{
    Coalescer, DisplaySettings, DisplayState, LevelThresholds, NoiseLevel, Readout, StatusStyle,
    StatusText,
};
pub use error::{FeedError, LifecycleError, ReadFailure};
pub use feed::{
    classify_line, ClassifiedMessage, FeedReader, LineTransport, SerialSettings, SerialTransport,
    Transport,
};
pub use lifecycle::{Lifecycle, Phase};
