//! Time abstraction traits for platform-agnostic timing.
//!
//! Trackers never read a clock themselves; they are handed the current
//! [`TimeInstant`] once per cycle. [`Millis`] is the default 32-bit millisecond
//! timestamp and survives counter rollover through wrapping subtraction.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq + PartialOrd + core::fmt::Debug {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy + core::fmt::Debug {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations backed by a free-running counter must use wrapping
    /// subtraction so that a single rollover between `earlier` and `self`
    /// still yields the true elapsed time.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Millisecond duration paired with [`Millis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MillisDuration(pub u32);

impl TimeDuration for MillisDuration {
    const ZERO: Self = MillisDuration(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    /// Saturates at `u32::MAX` milliseconds (about 49.7 days).
    fn from_millis(millis: u64) -> Self {
        MillisDuration(u32::try_from(millis).unwrap_or(u32::MAX))
    }
}

/// Free-running 32-bit millisecond timestamp, like a microcontroller `millis()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl TimeInstant for Millis {
    type Duration = MillisDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        MillisDuration(self.0.wrapping_sub(earlier.0))
    }
}

/// Returns true when at least `window` has passed since `since`.
///
/// `None` means nothing has happened yet, which always satisfies the window.
#[inline]
pub(crate) fn elapsed_at_least<I: TimeInstant>(now: I, since: Option<I>, window: I::Duration) -> bool {
    match since {
        Some(earlier) => now.duration_since(earlier) >= window,
        None => true,
    }
}
