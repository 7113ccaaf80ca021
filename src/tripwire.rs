//! Tripwire mode: a latch that trips on an edge and releases on sustained absence.

use crate::time::{TimeDuration, TimeInstant, elapsed_at_least};
use crate::types::{ActionEvent, TripwirePresets};

/// How a rising signal is allowed to trip the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TripwireEntry {
    /// Trip only if the bounce delay has passed since the previous trip.
    #[default]
    Debounced,

    /// Trip on the first active sample while untripped, with no debounce gate.
    Immediate,
}

/// Transient tripwire state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TripState<I> {
    /// Latch output.
    pub tripped: bool,

    /// Time of the most recent trip edge.
    ///
    /// Cleared once untripped and the bounce window has passed.
    pub last_active: Option<I>,

    /// Start of the current inactive stretch while tripped.
    pub inactive_since: Option<I>,
}

impl<I> TripState<I> {
    /// An untripped latch with no history.
    pub const fn new() -> Self {
        Self {
            tripped: false,
            last_active: None,
            inactive_since: None,
        }
    }
}

impl<I> Default for TripState<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tripwire tracker.
///
/// Entry is edge-triggered and fires the `tripped` preset once per trip. Exit is
/// level-triggered: the signal must stay inactive for the whole tripwire
/// timeout, and any active sample before that restarts the wait.
#[derive(Debug, Clone)]
pub struct TripwireTracker<I: TimeInstant> {
    bounce_delay: I::Duration,
    timeout: I::Duration,
    presets: TripwirePresets,
    entry: TripwireEntry,
    state: TripState<I>,
}

impl<I: TimeInstant> TripwireTracker<I> {
    /// Creates an untripped tracker with debounced entry.
    pub fn new(bounce_delay: I::Duration, timeout: I::Duration, presets: TripwirePresets) -> Self {
        Self {
            bounce_delay,
            timeout,
            presets,
            entry: TripwireEntry::Debounced,
            state: TripState::new(),
        }
    }

    /// Creates an untripped tracker from millisecond timings.
    pub fn from_millis(bounce_delay_ms: u32, timeout_ms: u32, presets: TripwirePresets) -> Self {
        Self::new(
            I::Duration::from_millis(bounce_delay_ms as u64),
            I::Duration::from_millis(timeout_ms as u64),
            presets,
        )
    }

    /// Selects the entry policy.
    pub fn with_entry(mut self, entry: TripwireEntry) -> Self {
        self.entry = entry;
        self
    }

    /// Consumes one signal sample.
    ///
    /// Returns `Some` on the cycle the latch trips or releases.
    pub fn step(&mut self, signal: bool, now: I) -> Option<ActionEvent> {
        let state = &mut self.state;

        if signal {
            if state.tripped {
                // Activity before the timeout cancels the pending release.
                state.inactive_since = None;
                return None;
            }

            let gate_open = match self.entry {
                TripwireEntry::Debounced => elapsed_at_least(now, state.last_active, self.bounce_delay),
                TripwireEntry::Immediate => true,
            };
            if !gate_open {
                return None;
            }

            state.tripped = true;
            state.last_active = Some(now);
            state.inactive_since = None;
            return Some(ActionEvent::Trip {
                tripped: true,
                preset: self.presets.tripped,
            });
        }

        if !state.tripped {
            // Past the bounce window the timestamp gates nothing.
            if elapsed_at_least(now, state.last_active, self.bounce_delay) {
                state.last_active = None;
            }
            return None;
        }

        let since = *state.inactive_since.get_or_insert(now);
        if now.duration_since(since) >= self.timeout {
            state.tripped = false;
            state.inactive_since = None;
            if elapsed_at_least(now, state.last_active, self.bounce_delay) {
                state.last_active = None;
            }
            return Some(ActionEvent::Trip {
                tripped: false,
                preset: self.presets.untripped,
            });
        }

        None
    }

    /// Releases the latch silently and forgets all timing history.
    pub fn reset(&mut self) {
        self.state = TripState::new();
    }

    /// Replaces timing and presets; the latch state is kept.
    pub fn reconfigure(&mut self, bounce_delay: I::Duration, timeout: I::Duration, presets: TripwirePresets) {
        self.bounce_delay = bounce_delay;
        self.timeout = timeout;
        self.presets = presets;
    }

    /// Returns true while the latch is tripped.
    pub fn is_tripped(&self) -> bool {
        self.state.tripped
    }

    /// Returns the current latch state.
    pub fn state(&self) -> &TripState<I> {
        &self.state
    }

    /// Returns the configured trip/untrip presets.
    pub fn presets(&self) -> TripwirePresets {
        self.presets
    }

    /// Returns the entry policy.
    pub fn entry(&self) -> TripwireEntry {
        self.entry
    }

    /// Returns the release timeout.
    pub fn timeout(&self) -> I::Duration {
        self.timeout
    }
}
