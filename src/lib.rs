#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ClapperTracker`**: Counts debounced activations into sessions and maps the closing count to a preset
//! - **`TripwireTracker`**: Latches on activity and releases after sustained absence
//! - **`ModeTracker`**: Selects which of the two trackers consumes the signal
//! - **`PresetMap`**: Fixed-size activation count to preset table
//! - **`ActionEvent`**: What a tracker emits when a session closes or the tripwire changes state
//! - **`SmackController`**: Per-cycle glue reading the sensor, applying presets and reporting diagnostics
//! - **`SmackConfig`**: Configuration snapshot and its key/value store schema
//! - **`SignalSource`**, **`PresetApplier`**, **`DiagnosticSink`**: Traits to implement for your host
//! - **`TimeSource`**: Trait to implement for your timing system
//!
//! Trackers are plain state machines: call `step(signal, now)` once per polling
//! cycle. They never block, never allocate and never read a clock themselves.

pub mod time;
pub mod types;
pub mod preset_map;
pub mod clapper;
pub mod tripwire;
pub mod tracker;
pub mod config;
pub mod diagnostic;
pub mod controller;

pub use clapper::{ClapperTracker, Session};
pub use config::{ConfigError, ConfigStore, ConfigStoreMut, SettingValue, SmackConfig};
pub use controller::{PinAllocator, PresetApplier, SignalSource, SmackController, acquire_source};
pub use diagnostic::{DiagnosticLevel, DiagnosticRecord, DiagnosticSink};
pub use preset_map::{MAX_SMACKS, PresetMap, PresetMapBuilder, smack_label};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use tracker::{ModeTracker, TrackerMode};
pub use tripwire::{TripState, TripwireEntry, TripwireTracker};
pub use types::{ActionEvent, ActivationCount, PresetId, SmackError, TripwirePresets};
