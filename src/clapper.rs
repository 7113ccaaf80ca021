//! Clapper mode: counts debounced activations into sessions.
//!
//! A session opens on the first accepted activation, collects further
//! activations spaced at least the bounce delay apart, and closes once the
//! signal has been idle for the activation timeout. The closing count is
//! looked up in a [`PresetMap`] and reported as one [`ActionEvent::Activation`].

use crate::preset_map::{MAX_SMACKS, PresetMap};
use crate::time::{TimeDuration, TimeInstant, elapsed_at_least};
use crate::types::{ActionEvent, ActivationCount};

/// Transient state of the current clapper session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session<I> {
    /// Activations accepted since the session opened.
    pub count: ActivationCount,

    /// Time of the most recent accepted activation.
    ///
    /// Cleared once no session is open and the bounce window has passed.
    pub last_active: Option<I>,

    /// True from an accepted activation until the signal drops again.
    pub was_active: bool,
}

impl<I> Session<I> {
    /// A closed session with no history.
    pub const fn new() -> Self {
        Self {
            count: 0,
            last_active: None,
            was_active: false,
        }
    }

    /// Returns true while activations are being collected.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.count > 0
    }
}

impl<I> Default for Session<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Activation tracker for clapper mode.
///
/// Call [`step`](Self::step) exactly once per polling cycle with the
/// invert-adjusted signal level and the current time.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `N` - Highest activation count that can be mapped to a preset
#[derive(Debug, Clone)]
pub struct ClapperTracker<I: TimeInstant, const N: usize = MAX_SMACKS> {
    bounce_delay: I::Duration,
    activation_timeout: I::Duration,
    presets: PresetMap<N>,
    session: Session<I>,
}

impl<I: TimeInstant, const N: usize> ClapperTracker<I, N> {
    /// Creates a tracker with an empty session.
    pub fn new(bounce_delay: I::Duration, activation_timeout: I::Duration, presets: PresetMap<N>) -> Self {
        Self {
            bounce_delay,
            activation_timeout,
            presets,
            session: Session::new(),
        }
    }

    /// Creates a tracker from millisecond timings.
    pub fn from_millis(bounce_delay_ms: u32, activation_timeout_ms: u32, presets: PresetMap<N>) -> Self {
        Self::new(
            I::Duration::from_millis(bounce_delay_ms as u64),
            I::Duration::from_millis(activation_timeout_ms as u64),
            presets,
        )
    }

    /// Consumes one signal sample.
    ///
    /// Returns `Some` only on the cycle a session closes. The session count is
    /// back at zero when this returns, whether or not a preset was mapped.
    pub fn step(&mut self, signal: bool, now: I) -> Option<ActionEvent> {
        let session = &mut self.session;

        if signal {
            if !session.was_active && elapsed_at_least(now, session.last_active, self.bounce_delay) {
                session.count = session.count.saturating_add(1);
                session.last_active = Some(now);
                session.was_active = true;
            }
            return None;
        }

        // The pulse has to end before the session can close.
        if session.was_active {
            session.was_active = false;
            return None;
        }

        let closed = if session.count > 0 && elapsed_at_least(now, session.last_active, self.activation_timeout) {
            let count = session.count;
            session.count = 0;
            Some(count)
        } else {
            None
        };

        // Past the bounce window the timestamp gates nothing.
        if session.count == 0 && elapsed_at_least(now, session.last_active, self.bounce_delay) {
            session.last_active = None;
        }

        closed.map(|count| ActionEvent::Activation {
            count,
            preset: self.presets.get(count),
        })
    }

    /// Discards the current session, including debounce history.
    pub fn reset(&mut self) {
        self.session = Session::new();
    }

    /// Replaces timing and presets; the open session is kept.
    pub fn reconfigure(&mut self, bounce_delay: I::Duration, activation_timeout: I::Duration, presets: PresetMap<N>) {
        self.bounce_delay = bounce_delay;
        self.activation_timeout = activation_timeout;
        self.presets = presets;
    }

    /// Returns the current session state.
    pub fn session(&self) -> &Session<I> {
        &self.session
    }

    /// Returns the number of activations in the open session.
    pub fn count(&self) -> ActivationCount {
        self.session.count
    }

    /// Returns the preset map.
    pub fn presets(&self) -> &PresetMap<N> {
        &self.presets
    }

    /// Returns the debounce window.
    pub fn bounce_delay(&self) -> I::Duration {
        self.bounce_delay
    }

    /// Returns the session inactivity timeout.
    pub fn activation_timeout(&self) -> I::Duration {
        self.activation_timeout
    }
}
