//! Shared test infrastructure for smack-that integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smack_that::{
    ActionEvent, ConfigStore, ConfigStoreMut, DiagnosticRecord, DiagnosticSink, Millis, PinAllocator,
    PresetApplier, PresetId, SettingValue, SignalSource, TimeSource,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<Millis>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(Millis(0)),
        }
    }

    pub fn starting_at(ms: u32) -> Self {
        Self {
            current_time: Cell::new(Millis(ms)),
        }
    }

    /// Advance time by the given number of milliseconds (wrapping)
    pub fn advance(&self, ms: u32) {
        let current = self.current_time.get();
        self.current_time.set(Millis(current.0.wrapping_add(ms)));
    }

    pub fn set_time(&self, ms: u32) {
        self.current_time.set(Millis(ms));
    }
}

impl TimeSource<Millis> for MockTimeSource {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Signal
// ============================================================================

/// Signal whose level the test sets through a shared handle
#[derive(Clone)]
pub struct MockSignal {
    level: Rc<Cell<bool>>,
    reads: Rc<Cell<u32>>,
}

impl MockSignal {
    pub fn new() -> Self {
        Self {
            level: Rc::new(Cell::new(false)),
            reads: Rc::new(Cell::new(0)),
        }
    }

    pub fn set(&self, level: bool) {
        self.level.set(level);
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl SignalSource for MockSignal {
    fn read(&mut self) -> bool {
        self.reads.set(self.reads.get() + 1);
        self.level.get()
    }
}

/// Allocator with a fixed set of free pins, each wired to its own signal
pub struct MockPins {
    pub free: Vec<(u8, MockSignal)>,
    pub released: Vec<u8>,
}

impl MockPins {
    pub fn new(pins: &[(u8, &MockSignal)]) -> Self {
        Self {
            free: pins.iter().map(|(pin, signal)| (*pin, (*signal).clone())).collect(),
            released: Vec::new(),
        }
    }
}

impl PinAllocator for MockPins {
    type Source = MockSignal;

    fn allocate(&mut self, pin: u8) -> Option<MockSignal> {
        self.free.iter().find(|(p, _)| *p == pin).map(|(_, signal)| signal.clone())
    }

    fn release(&mut self, pin: u8, _source: MockSignal) {
        self.released.push(pin);
    }
}

// ============================================================================
// Mock Collaborators
// ============================================================================

/// Preset applier that records every call
#[derive(Default)]
pub struct RecordingApplier {
    pub applied: Vec<PresetId>,
    pub accept: bool,
    pub current: Option<PresetId>,
    pub track_current: bool,
}

impl RecordingApplier {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            ..Default::default()
        }
    }

    pub fn rejecting() -> Self {
        Self::default()
    }

    /// Reports the last applied preset as current
    pub fn tracking_current() -> Self {
        Self {
            accept: true,
            track_current: true,
            ..Default::default()
        }
    }

    pub fn applied_raw(&self) -> Vec<u8> {
        self.applied.iter().map(|p| p.get()).collect()
    }
}

impl PresetApplier for RecordingApplier {
    fn apply_preset(&mut self, preset: PresetId) -> bool {
        self.applied.push(preset);
        if self.accept && self.track_current {
            self.current = Some(preset);
        }
        self.accept
    }

    fn current_preset(&self) -> Option<PresetId> {
        self.current
    }
}

/// Diagnostic sink that stores rendered lines
#[derive(Default)]
pub struct RecordingSink {
    pub records: Vec<DiagnosticRecord>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(|r| r.render().as_str().to_owned()).collect()
    }

    pub fn non_raw(&self) -> Vec<DiagnosticRecord> {
        self.records
            .iter()
            .filter(|r| !matches!(r, DiagnosticRecord::Raw { .. }))
            .copied()
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&mut self, record: &DiagnosticRecord) {
        self.records.push(*record);
    }
}

// ============================================================================
// Mock Config Store
// ============================================================================

#[derive(Default)]
pub struct MapStore {
    pub values: BTreeMap<&'static str, SettingValue>,
}

impl ConfigStore for MapStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }
}

impl ConfigStoreMut for MapStore {
    fn set(&mut self, key: &'static str, value: SettingValue) {
        self.values.insert(key, value);
    }
}

// ============================================================================
// Signal Script Helpers
// ============================================================================

/// Builds a per-millisecond signal trace from `(start, width)` pulses.
pub fn pulse_trace(pulses: &[(u32, u32)], end: u32) -> Vec<bool> {
    let mut trace = vec![false; end as usize];
    for &(start, width) in pulses {
        for t in start..(start + width).min(end) {
            trace[t as usize] = true;
        }
    }
    trace
}

/// Feeds a trace into `step` one millisecond per sample, collecting `(time, event)` pairs.
pub fn run_trace<F>(trace: &[bool], mut step: F) -> Vec<(u32, ActionEvent)>
where
    F: FnMut(bool, Millis) -> Option<ActionEvent>,
{
    trace
        .iter()
        .enumerate()
        .filter_map(|(t, &level)| step(level, Millis(t as u32)).map(|e| (t as u32, e)))
        .collect()
}

pub fn preset(raw: u8) -> Option<PresetId> {
    PresetId::new(raw)
}
