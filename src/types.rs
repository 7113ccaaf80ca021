//! Core types shared by the trackers and the controller.

use core::num::NonZeroU8;

/// Number of activations counted in one clapper session.
pub type ActivationCount = u16;

/// Identifier of a host-side preset (the action fired by a session or trip).
///
/// Stores use `0` for "no action", so a `PresetId` is never zero; absence is
/// expressed as `Option<PresetId>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresetId(NonZeroU8);

impl PresetId {
    /// Creates a preset id, returning `None` for `0` ("no action").
    #[inline]
    pub const fn new(raw: u8) -> Option<Self> {
        match NonZeroU8::new(raw) {
            Some(id) => Some(PresetId(id)),
            None => None,
        }
    }

    /// Returns the raw preset number.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Converts an optional preset back to its stored form (`0` = none).
    #[inline]
    pub fn to_raw(preset: Option<PresetId>) -> u8 {
        preset.map_or(0, PresetId::get)
    }
}

/// Discrete event produced by a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionEvent {
    /// A clapper session closed after `count` activations.
    ///
    /// `preset` is `None` when the count has no mapping (including counts
    /// beyond the preset map); such events are diagnostic only.
    Activation {
        count: ActivationCount,
        preset: Option<PresetId>,
    },

    /// The tripwire latched (`tripped = true`) or released (`tripped = false`).
    Trip {
        tripped: bool,
        preset: Option<PresetId>,
    },
}

impl ActionEvent {
    /// Returns the preset this event asks the host to apply, if any.
    #[inline]
    pub fn preset(&self) -> Option<PresetId> {
        match *self {
            ActionEvent::Activation { preset, .. } | ActionEvent::Trip { preset, .. } => preset,
        }
    }

    /// Returns a copy of this event with the preset replaced.
    #[inline]
    pub fn with_preset(self, preset: Option<PresetId>) -> Self {
        match self {
            ActionEvent::Activation { count, .. } => ActionEvent::Activation { count, preset },
            ActionEvent::Trip { tripped, .. } => ActionEvent::Trip { tripped, preset },
        }
    }
}

/// Presets applied when the tripwire latches and when it releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripwirePresets {
    /// Fired on trip-enter.
    pub tripped: Option<PresetId>,

    /// Fired on trip-exit.
    pub untripped: Option<PresetId>,
}

impl TripwirePresets {
    /// Creates a preset pair from raw store values (`0` = no action).
    pub const fn from_raw(tripped: u8, untripped: u8) -> Self {
        Self {
            tripped: PresetId::new(tripped),
            untripped: PresetId::new(untripped),
        }
    }
}

/// Preset map errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmackError {
    /// Activation count is zero or beyond the map capacity.
    CountOutOfRange { count: usize, capacity: usize },
}

impl core::fmt::Display for SmackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SmackError::CountOutOfRange { count, capacity } => {
                write!(
                    f,
                    "activation count {} is outside the preset map range 1..={}",
                    count, capacity
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SmackError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_preset() {
        assert_eq!(PresetId::new(0), None);
        assert_eq!(PresetId::new(42).map(PresetId::get), Some(42));
        assert_eq!(PresetId::to_raw(None), 0);
    }

    #[test]
    fn event_preset_accessor_covers_both_variants() {
        let p = PresetId::new(7);
        let clap = ActionEvent::Activation { count: 2, preset: p };
        let trip = ActionEvent::Trip { tripped: true, preset: None };
        assert_eq!(clap.preset(), p);
        assert_eq!(trip.preset(), None);
        assert_eq!(clap.with_preset(None).preset(), None);
    }
}
