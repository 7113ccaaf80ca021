use crate::types::{ActivationCount, PresetId, SmackError};
use heapless::Vec;

/// Number of activation counts that can carry a preset in the stored config.
pub const MAX_SMACKS: usize = 10;

const SMACK_LABELS: [&str; MAX_SMACKS] = [
    "1 Smack", "2 Smacks", "3 Smacks", "4 Smacks", "5 Smacks", "6 Smacks", "7 Smacks",
    "8 Smacks", "9 Smacks", "10 Smacks",
];

/// Returns the configuration key for the preset fired after `count` smacks.
///
/// Defined for `1..=MAX_SMACKS`; returns `None` otherwise.
pub fn smack_label(count: usize) -> Option<&'static str> {
    count
        .checked_sub(1)
        .and_then(|idx| SMACK_LABELS.get(idx).copied())
}

/// Fixed-size mapping from activation count to the preset it fires.
///
/// Counts are 1-based: slot `1` holds the preset for a single smack. Counts of
/// zero or beyond `N` never match a preset.
///
/// # Type Parameters
/// * `N` - Highest activation count that can be mapped
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresetMap<const N: usize = MAX_SMACKS> {
    presets: Vec<Option<PresetId>, N>,
}

impl<const N: usize> Default for PresetMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PresetMap<N> {
    /// Creates a map with no presets assigned.
    pub fn new() -> Self {
        let mut presets = Vec::new();
        // Cannot fail: the vector is empty and resized to its own capacity.
        let _ = presets.resize(N, None);
        Self { presets }
    }

    /// Creates a new preset map builder.
    pub fn builder() -> PresetMapBuilder<N> {
        PresetMapBuilder::new()
    }

    /// Returns the preset mapped to `count`, or `None` when unmapped or out of range.
    #[inline]
    pub fn get(&self, count: ActivationCount) -> Option<PresetId> {
        let idx = (count as usize).checked_sub(1)?;
        self.presets.get(idx).copied().flatten()
    }

    /// Assigns `preset` to `count`. `None` clears the slot.
    pub fn set(&mut self, count: usize, preset: Option<PresetId>) -> Result<(), SmackError> {
        if count == 0 || count > N {
            return Err(SmackError::CountOutOfRange {
                count,
                capacity: N,
            });
        }

        // A deserialized map may be shorter than N.
        if self.presets.len() < N {
            let _ = self.presets.resize(N, None);
        }

        self.presets[count - 1] = preset;
        Ok(())
    }

    /// Returns the highest count that can be mapped.
    #[inline]
    pub fn capacity(&self) -> usize {
        N
    }

    /// Iterates `(count, preset)` pairs for counts `1..=N`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<PresetId>)> + '_ {
        (1..=N).map(move |count| (count, self.presets.get(count - 1).copied().flatten()))
    }

    /// Returns true if no count has a preset.
    pub fn is_empty(&self) -> bool {
        self.presets.iter().all(Option::is_none)
    }
}

/// Builder for preset maps.
#[derive(Debug)]
pub struct PresetMapBuilder<const N: usize> {
    map: PresetMap<N>,
}

impl<const N: usize> PresetMapBuilder<N> {
    /// Creates a new builder with every slot empty.
    pub fn new() -> Self {
        Self {
            map: PresetMap::new(),
        }
    }

    /// Maps `count` to the raw preset number (`0` clears the slot).
    ///
    /// Returns an error if `count` is outside `1..=N`.
    pub fn preset(mut self, count: usize, preset: u8) -> Result<Self, SmackError> {
        self.map.set(count, PresetId::new(preset))?;
        Ok(self)
    }

    /// Finishes the map.
    pub fn build(self) -> PresetMap<N> {
        self.map
    }
}

impl<const N: usize> Default for PresetMapBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
