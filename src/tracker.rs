//! Mode selection between the clapper and tripwire trackers.

use crate::clapper::ClapperTracker;
use crate::config::SmackConfig;
use crate::time::{TimeDuration, TimeInstant};
use crate::tripwire::TripwireTracker;
use crate::types::ActionEvent;

/// Which tracker consumes the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackerMode {
    /// Count activations into sessions.
    Clapper,
    /// Latch on activity, release on sustained absence.
    Tripwire,
}

impl TrackerMode {
    /// Returns the mode a configuration selects.
    pub fn of(config: &SmackConfig) -> Self {
        if config.tripwire_mode {
            TrackerMode::Tripwire
        } else {
            TrackerMode::Clapper
        }
    }
}

/// The active tracker. Exactly one runs per cycle.
#[derive(Debug, Clone)]
pub enum ModeTracker<I: TimeInstant> {
    Clapper(ClapperTracker<I>),
    Tripwire(TripwireTracker<I>),
}

impl<I: TimeInstant> ModeTracker<I> {
    /// Builds a fresh tracker for the mode the configuration selects.
    pub fn from_config(config: &SmackConfig) -> Self {
        match TrackerMode::of(config) {
            TrackerMode::Clapper => ModeTracker::Clapper(ClapperTracker::from_millis(
                config.bounce_delay_ms,
                config.activation_timeout_ms,
                config.presets.clone(),
            )),
            TrackerMode::Tripwire => ModeTracker::Tripwire(
                TripwireTracker::from_millis(
                    config.bounce_delay_ms,
                    config.tripwire_timeout_ms,
                    config.tripwire_presets,
                )
                .with_entry(config.tripwire_entry),
            ),
        }
    }

    /// Returns the active mode.
    pub fn mode(&self) -> TrackerMode {
        match self {
            ModeTracker::Clapper(_) => TrackerMode::Clapper,
            ModeTracker::Tripwire(_) => TrackerMode::Tripwire,
        }
    }

    /// Routes one signal sample to the active tracker.
    #[inline]
    pub fn step(&mut self, signal: bool, now: I) -> Option<ActionEvent> {
        match self {
            ModeTracker::Clapper(tracker) => tracker.step(signal, now),
            ModeTracker::Tripwire(tracker) => tracker.step(signal, now),
        }
    }

    /// Applies a new configuration snapshot between cycles.
    ///
    /// A mode change (or a tripwire entry policy change) starts from a clean
    /// tracker; otherwise timings and presets are swapped in and the transient
    /// state is kept. Returns true if the transient state was discarded.
    pub fn reload(&mut self, config: &SmackConfig) -> bool {
        let bounce = I::Duration::from_millis(config.bounce_delay_ms as u64);
        let reconfigured = match self {
            ModeTracker::Clapper(tracker) if !config.tripwire_mode => {
                let timeout = I::Duration::from_millis(config.activation_timeout_ms as u64);
                tracker.reconfigure(bounce, timeout, config.presets.clone());
                true
            }
            ModeTracker::Tripwire(tracker) if config.tripwire_mode && tracker.entry() == config.tripwire_entry => {
                let timeout = I::Duration::from_millis(config.tripwire_timeout_ms as u64);
                tracker.reconfigure(bounce, timeout, config.tripwire_presets);
                true
            }
            _ => false,
        };

        if !reconfigured {
            *self = Self::from_config(config);
        }
        !reconfigured
    }

    /// Discards all transient state of the active tracker.
    pub fn reset(&mut self) {
        match self {
            ModeTracker::Clapper(tracker) => tracker.reset(),
            ModeTracker::Tripwire(tracker) => tracker.reset(),
        }
    }

    /// Returns the clapper tracker if it is active.
    pub fn as_clapper(&self) -> Option<&ClapperTracker<I>> {
        match self {
            ModeTracker::Clapper(tracker) => Some(tracker),
            ModeTracker::Tripwire(_) => None,
        }
    }

    /// Returns the tripwire tracker if it is active.
    pub fn as_tripwire(&self) -> Option<&TripwireTracker<I>> {
        match self {
            ModeTracker::Tripwire(tracker) => Some(tracker),
            ModeTracker::Clapper(_) => None,
        }
    }
}
