//! Configuration snapshot and its key/value store schema.
//!
//! The host owns persistence. [`SmackConfig::read_from`] pulls a snapshot out
//! of any [`ConfigStore`], falling back to defaults for missing or invalid
//! entries, and [`SmackConfig::write_to`] pushes every key back.

use crate::diagnostic::DiagnosticLevel;
use crate::preset_map::{MAX_SMACKS, PresetMap, smack_label};
use crate::tripwire::TripwireEntry;
use crate::types::{PresetId, TripwirePresets};

/// Name of the configuration section holding every key below.
pub const SECTION: &str = "Smack That Usermod";

/// Configuration keys.
pub mod keys {
    /// Master enable switch (bool).
    pub const ENABLE: &str = "Enable";
    /// Clapper session inactivity timeout in milliseconds.
    pub const ACTIVATION_TIMEOUT: &str = "Smack Timeout (ms)";
    /// Debounce interval in milliseconds.
    pub const BOUNCE_DELAY: &str = "Bounce Delay (ms)";
    /// Diagnostic verbosity (0, 1, 2 or 99).
    pub const DIAGNOSTIC_LEVEL: &str = "Serial Output Level (0-2)";
    /// Sensor pin, `-1` for none.
    pub const PIN: &str = "Pin";
    /// Treat a low raw level as active (bool).
    pub const INVERT: &str = "Invert";
    /// Select the tripwire tracker (bool).
    pub const TRIPWIRE_MODE: &str = "Use Tripwire Mode";
    /// Tripwire release timeout in milliseconds.
    pub const TRIPWIRE_TIMEOUT: &str = "Tripwire Timeout (ms)";
    /// Preset applied when the tripwire latches, `0` for none.
    pub const TRIPPED_PRESET: &str = "Tripped Preset";
    /// Preset applied when the tripwire releases, `0` for none.
    pub const UNTRIPPED_PRESET: &str = "Untripped Preset";
}

/// Default clapper session inactivity timeout.
pub const DEFAULT_ACTIVATION_TIMEOUT_MS: u32 = 250;
/// Default debounce interval.
pub const DEFAULT_BOUNCE_DELAY_MS: u32 = 150;
/// Default tripwire release timeout (one minute).
pub const DEFAULT_TRIPWIRE_TIMEOUT_MS: u32 = 60_000;

/// A single stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingValue {
    /// Boolean setting.
    Bool(bool),
    /// Integer setting.
    Int(i32),
}

/// Read access to the host configuration section.
pub trait ConfigStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<SettingValue>;
}

/// Write access to the host configuration section.
pub trait ConfigStoreMut {
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &'static str, value: SettingValue);
}

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The stored value has the wrong type for its key.
    WrongType { key: &'static str },

    /// The stored integer does not fit the key's range.
    OutOfRange { key: &'static str, value: i32 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::WrongType { key } => {
                write!(f, "config key \"{}\" has the wrong type", key)
            }
            ConfigError::OutOfRange { key, value } => {
                write!(f, "config key \"{}\" value {} is out of range", key, value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Read-only configuration snapshot for one sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmackConfig {
    /// Master switch. A disabled controller never reads its signal.
    pub enabled: bool,

    /// Idle time after the last activation that closes a clapper session.
    pub activation_timeout_ms: u32,

    /// Minimum spacing between accepted activations.
    pub bounce_delay_ms: u32,

    /// Diagnostic verbosity.
    pub diagnostic_level: DiagnosticLevel,

    /// Sensor pin, `None` if unassigned.
    pub pin: Option<u8>,

    /// Treat a low raw level as active.
    pub invert: bool,

    /// Preset fired per session count.
    pub presets: PresetMap<MAX_SMACKS>,

    /// Use the tripwire tracker instead of the clapper tracker.
    pub tripwire_mode: bool,

    /// Sustained inactivity that releases the tripwire.
    pub tripwire_timeout_ms: u32,

    /// Presets fired on trip and release.
    pub tripwire_presets: TripwirePresets,

    /// Entry policy of the tripwire. Not part of the stored schema.
    pub tripwire_entry: TripwireEntry,
}

impl Default for SmackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            activation_timeout_ms: DEFAULT_ACTIVATION_TIMEOUT_MS,
            bounce_delay_ms: DEFAULT_BOUNCE_DELAY_MS,
            diagnostic_level: DiagnosticLevel::Off,
            pin: None,
            invert: false,
            presets: PresetMap::new(),
            tripwire_mode: false,
            tripwire_timeout_ms: DEFAULT_TRIPWIRE_TIMEOUT_MS,
            tripwire_presets: TripwirePresets::default(),
            tripwire_entry: TripwireEntry::Debounced,
        }
    }
}

impl SmackConfig {
    /// Sets the master enable switch.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the clapper session inactivity timeout.
    pub fn with_activation_timeout_ms(mut self, ms: u32) -> Self {
        self.activation_timeout_ms = ms;
        self
    }

    /// Sets the debounce interval.
    pub fn with_bounce_delay_ms(mut self, ms: u32) -> Self {
        self.bounce_delay_ms = ms;
        self
    }

    /// Sets the diagnostic verbosity.
    pub fn with_diagnostic_level(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostic_level = level;
        self
    }

    /// Sets the sensor pin (`None` leaves the sensor unassigned).
    pub fn with_pin(mut self, pin: Option<u8>) -> Self {
        self.pin = pin;
        self
    }

    /// Sets whether a low raw level counts as active.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Sets the count-to-preset map.
    pub fn with_presets(mut self, presets: PresetMap<MAX_SMACKS>) -> Self {
        self.presets = presets;
        self
    }

    /// Switches to tripwire mode with the given release timeout and presets.
    pub fn with_tripwire(mut self, timeout_ms: u32, presets: TripwirePresets) -> Self {
        self.tripwire_mode = true;
        self.tripwire_timeout_ms = timeout_ms;
        self.tripwire_presets = presets;
        self
    }

    /// Sets the tripwire entry policy.
    pub fn with_tripwire_entry(mut self, entry: TripwireEntry) -> Self {
        self.tripwire_entry = entry;
        self
    }

    /// Reads a snapshot, substituting defaults for missing or invalid keys.
    ///
    /// Returns the snapshot and whether every key was present and valid.
    pub fn read_from<S: ConfigStore + ?Sized>(store: &S) -> (Self, bool) {
        let mut reader = Reader::new(store);
        let config = Self::read_with(&mut reader);
        (config, reader.complete)
    }

    /// Reads a snapshot, failing on the first invalid key.
    ///
    /// Missing keys still take their defaults.
    pub fn try_read_from<S: ConfigStore + ?Sized>(store: &S) -> Result<Self, ConfigError> {
        let mut reader = Reader::new(store);
        let config = Self::read_with(&mut reader);
        match reader.error {
            Some(e) => Err(e),
            None => Ok(config),
        }
    }

    fn read_with<S: ConfigStore + ?Sized>(reader: &mut Reader<'_, S>) -> Self {
        let defaults = Self::default();
        let byte = u8::MAX as i32;

        let enabled = reader.bool(keys::ENABLE, defaults.enabled);
        let activation_timeout_ms = reader.millis(keys::ACTIVATION_TIMEOUT, defaults.activation_timeout_ms);
        let bounce_delay_ms = reader.millis(keys::BOUNCE_DELAY, defaults.bounce_delay_ms);
        let diagnostic_level = DiagnosticLevel::from_raw(reader.int(keys::DIAGNOSTIC_LEVEL, 0, byte, 0) as u8);
        let pin = match reader.int(keys::PIN, -1, byte, -1) {
            -1 => None,
            p => Some(p as u8),
        };
        let invert = reader.bool(keys::INVERT, defaults.invert);

        let mut presets = PresetMap::new();
        for count in 1..=MAX_SMACKS {
            let Some(key) = smack_label(count) else { continue };
            let raw = reader.int(key, 0, byte, 0) as u8;
            // count is within 1..=MAX_SMACKS
            let _ = presets.set(count, PresetId::new(raw));
        }

        let tripwire_mode = reader.bool(keys::TRIPWIRE_MODE, defaults.tripwire_mode);
        let tripwire_timeout_ms = reader.millis(keys::TRIPWIRE_TIMEOUT, defaults.tripwire_timeout_ms);
        let tripped = reader.int(keys::TRIPPED_PRESET, 0, byte, 0) as u8;
        let untripped = reader.int(keys::UNTRIPPED_PRESET, 0, byte, 0) as u8;

        Self {
            enabled,
            activation_timeout_ms,
            bounce_delay_ms,
            diagnostic_level,
            pin,
            invert,
            presets,
            tripwire_mode,
            tripwire_timeout_ms,
            tripwire_presets: TripwirePresets::from_raw(tripped, untripped),
            tripwire_entry: defaults.tripwire_entry,
        }
    }

    /// Writes every key of the schema.
    pub fn write_to<S: ConfigStoreMut + ?Sized>(&self, store: &mut S) {
        store.set(keys::ENABLE, SettingValue::Bool(self.enabled));
        store.set(keys::ACTIVATION_TIMEOUT, SettingValue::Int(clamp_ms(self.activation_timeout_ms)));
        store.set(keys::BOUNCE_DELAY, SettingValue::Int(clamp_ms(self.bounce_delay_ms)));
        store.set(
            keys::DIAGNOSTIC_LEVEL,
            SettingValue::Int(self.diagnostic_level.to_raw() as i32),
        );
        store.set(keys::PIN, SettingValue::Int(self.pin.map_or(-1, i32::from)));
        store.set(keys::INVERT, SettingValue::Bool(self.invert));

        for (count, preset) in self.presets.iter() {
            if let Some(key) = smack_label(count) {
                store.set(key, SettingValue::Int(PresetId::to_raw(preset) as i32));
            }
        }

        store.set(keys::TRIPWIRE_MODE, SettingValue::Bool(self.tripwire_mode));
        store.set(keys::TRIPWIRE_TIMEOUT, SettingValue::Int(clamp_ms(self.tripwire_timeout_ms)));
        store.set(
            keys::TRIPPED_PRESET,
            SettingValue::Int(PresetId::to_raw(self.tripwire_presets.tripped) as i32),
        );
        store.set(
            keys::UNTRIPPED_PRESET,
            SettingValue::Int(PresetId::to_raw(self.tripwire_presets.untripped) as i32),
        );
    }
}

/// Tracks completeness and the first error while reading a store.
struct Reader<'a, S: ?Sized> {
    store: &'a S,
    complete: bool,
    error: Option<ConfigError>,
}

impl<'a, S: ConfigStore + ?Sized> Reader<'a, S> {
    fn new(store: &'a S) -> Self {
        Self {
            store,
            complete: true,
            error: None,
        }
    }

    fn fail(&mut self, error: ConfigError) {
        self.complete = false;
        self.error.get_or_insert(error);
    }

    fn bool(&mut self, key: &'static str, default: bool) -> bool {
        match self.store.get(key) {
            Some(SettingValue::Bool(v)) => v,
            Some(SettingValue::Int(_)) => {
                self.fail(ConfigError::WrongType { key });
                default
            }
            None => {
                self.complete = false;
                default
            }
        }
    }

    fn int(&mut self, key: &'static str, min: i32, max: i32, default: i32) -> i32 {
        match self.store.get(key) {
            Some(SettingValue::Int(v)) if (min..=max).contains(&v) => v,
            Some(SettingValue::Int(value)) => {
                self.fail(ConfigError::OutOfRange { key, value });
                default
            }
            Some(SettingValue::Bool(_)) => {
                self.fail(ConfigError::WrongType { key });
                default
            }
            None => {
                self.complete = false;
                default
            }
        }
    }

    fn millis(&mut self, key: &'static str, default: u32) -> u32 {
        self.int(key, 0, i32::MAX, clamp_ms(default)) as u32
    }
}

fn clamp_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}
