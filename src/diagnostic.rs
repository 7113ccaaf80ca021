//! Diagnostic reporting for closed sessions and trip transitions.
//!
//! The core decides *whether* and *what* to report; a [`DiagnosticSink`]
//! decides how it leaves the device (serial, log, test buffer).

use core::fmt::{self, Write};

use crate::types::{ActionEvent, ActivationCount, PresetId};

/// Capacity of a rendered diagnostic line.
pub const RECORD_LEN: usize = 64;

/// Diagnostic verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticLevel {
    /// Nothing is reported.
    #[default]
    Off,

    /// Only events that applied a preset.
    Applied,

    /// Every closed session and trip transition.
    Verbose,

    /// Everything `Verbose` reports plus the raw signal level every cycle.
    RawFeed,
}

impl DiagnosticLevel {
    /// Maps a stored level: `0`, `1`, `2`, `99`. Other non-zero values are `Verbose`.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => DiagnosticLevel::Off,
            1 => DiagnosticLevel::Applied,
            99 => DiagnosticLevel::RawFeed,
            _ => DiagnosticLevel::Verbose,
        }
    }

    /// Returns the stored form of this level.
    pub const fn to_raw(self) -> u8 {
        match self {
            DiagnosticLevel::Off => 0,
            DiagnosticLevel::Applied => 1,
            DiagnosticLevel::Verbose => 2,
            DiagnosticLevel::RawFeed => 99,
        }
    }

    /// Returns true if an event should be reported at this level.
    #[inline]
    pub fn reports(self, applied: bool) -> bool {
        match self {
            DiagnosticLevel::Off => false,
            DiagnosticLevel::Applied => applied,
            DiagnosticLevel::Verbose | DiagnosticLevel::RawFeed => true,
        }
    }

    /// Returns true if the raw signal should be echoed every cycle.
    #[inline]
    pub fn echoes_raw(self) -> bool {
        self == DiagnosticLevel::RawFeed
    }
}

/// A structured diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiagnosticRecord {
    /// A clapper session closed. `action` is set only if a preset was applied.
    Activation {
        count: ActivationCount,
        action: Option<PresetId>,
    },

    /// The tripwire changed state. `action` is set only if a preset was applied.
    Trip {
        tripped: bool,
        action: Option<PresetId>,
    },

    /// Raw (pre-inversion) signal level for one cycle.
    Raw { level: bool },
}

impl DiagnosticRecord {
    /// Builds the record for an event, reporting `action` as the applied preset.
    pub fn for_event(event: &ActionEvent, action: Option<PresetId>) -> Self {
        match *event {
            ActionEvent::Activation { count, .. } => DiagnosticRecord::Activation { count, action },
            ActionEvent::Trip { tripped, .. } => DiagnosticRecord::Trip { tripped, action },
        }
    }

    /// Renders the record as a single-line JSON object.
    pub fn render(&self) -> heapless::String<RECORD_LEN> {
        let mut line = heapless::String::new();
        // Longest record is well under RECORD_LEN.
        let _ = write!(line, "{}", self);
        line
    }
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            DiagnosticRecord::Activation { count, action } => {
                write!(f, "{{\"event\":\"activation\",\"count\":{}", count)?;
                action
            }
            DiagnosticRecord::Trip { tripped, action } => {
                write!(f, "{{\"event\":\"trip\",\"tripped\":{}", tripped)?;
                action
            }
            DiagnosticRecord::Raw { level } => {
                return write!(f, "{{\"event\":\"raw\",\"level\":{}}}", u8::from(*level));
            }
        };

        if let Some(preset) = action {
            write!(f, ",\"action\":{}", preset.get())?;
        }
        f.write_char('}')
    }
}

/// Receiver of diagnostic records.
pub trait DiagnosticSink {
    /// Delivers one record. Must not block.
    fn emit(&mut self, record: &DiagnosticRecord);
}

/// Discards every record.
impl DiagnosticSink for () {
    fn emit(&mut self, _record: &DiagnosticRecord) {}
}
