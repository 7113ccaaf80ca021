//! Per-cycle glue between the host, the signal and the active tracker.
//!
//! Provides [`SmackController`], which reads the sensor once per polling cycle,
//! feeds the active tracker, applies presets and reports diagnostics. Also
//! defines the collaborator traits the host implements.

use crate::config::SmackConfig;
use crate::diagnostic::{DiagnosticRecord, DiagnosticSink};
use crate::time::{TimeInstant, TimeSource};
use crate::tracker::{ModeTracker, TrackerMode};
use crate::types::{ActionEvent, PresetId};

/// Trait for abstracting the sensor input.
pub trait SignalSource {
    /// Returns the raw (not yet inverted) signal level. Must not block.
    fn read(&mut self) -> bool;
}

/// Trait for acquiring a sensor input from a pin number.
pub trait PinAllocator {
    /// The input handed out for an allocated pin.
    type Source: SignalSource;

    /// Claims `pin` as an input, or returns `None` if it is reserved or invalid.
    fn allocate(&mut self, pin: u8) -> Option<Self::Source>;

    /// Hands a previously allocated pin back. The default just drops the input.
    fn release(&mut self, pin: u8, source: Self::Source) {
        let _ = (pin, source);
    }
}

/// Trait for the host side that applies presets.
pub trait PresetApplier {
    /// Applies `preset`. Returns false if the host rejected it.
    fn apply_preset(&mut self, preset: PresetId) -> bool;

    /// Returns the preset currently shown by the host, if known.
    ///
    /// Trip transitions whose preset is already current are not re-applied.
    fn current_preset(&self) -> Option<PresetId> {
        None
    }
}

/// Claims the configured pin, if any.
pub fn acquire_source<A: PinAllocator>(allocator: &mut A, pin: Option<u8>) -> Option<A::Source> {
    allocator.allocate(pin?)
}

/// Drives one sensor through the configured tracker.
///
/// A controller without a signal source stays disabled for its whole life
/// (until [`set_source`](Self::set_source) provides one) and never reads.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - Signal source type
/// * `P` - Preset applier type
/// * `D` - Diagnostic sink type
/// * `T` - Time source implementation type
pub struct SmackController<'t, I, S, P, D, T>
where
    I: TimeInstant,
    S: SignalSource,
    P: PresetApplier,
    D: DiagnosticSink,
    T: TimeSource<I>,
{
    source: Option<S>,
    applier: P,
    diagnostics: D,
    time_source: &'t T,
    config: SmackConfig,
    tracker: ModeTracker<I>,
}

impl<'t, I, S, P, D, T> SmackController<'t, I, S, P, D, T>
where
    I: TimeInstant,
    S: SignalSource,
    P: PresetApplier,
    D: DiagnosticSink,
    T: TimeSource<I>,
{
    /// Creates a controller with fresh tracker state.
    ///
    /// Pass `None` for `source` when the sensor pin could not be acquired.
    pub fn new(config: SmackConfig, source: Option<S>, applier: P, diagnostics: D, time_source: &'t T) -> Self {
        if source.is_none() && config.enabled {
            #[cfg(feature = "defmt")]
            defmt::warn!("smack sensor unavailable (pin {:?}), sensor disabled", config.pin);
        }

        Self {
            tracker: ModeTracker::from_config(&config),
            source,
            applier,
            diagnostics,
            time_source,
            config,
        }
    }

    /// Creates a controller, claiming the configured pin through `allocator`.
    pub fn with_allocator<A>(config: SmackConfig, allocator: &mut A, applier: P, diagnostics: D, time_source: &'t T) -> Self
    where
        A: PinAllocator<Source = S>,
    {
        let source = acquire_source(allocator, config.pin);
        Self::new(config, source, applier, diagnostics, time_source)
    }

    /// Runs one polling cycle.
    ///
    /// Reads the signal, steps the active tracker, applies the event's preset
    /// and reports diagnostics. Returns the event the tracker emitted, if any.
    pub fn service(&mut self) -> Option<ActionEvent> {
        if !self.config.enabled {
            return None;
        }
        let source = self.source.as_mut()?;

        let raw = source.read();
        let now = self.time_source.now();
        let level = self.config.diagnostic_level;

        if level.echoes_raw() {
            self.diagnostics.emit(&DiagnosticRecord::Raw { level: raw });
        }

        let event = self.tracker.step(raw != self.config.invert, now)?;
        let applied = self.dispatch(&event);

        if level.reports(applied.is_some()) {
            self.diagnostics.emit(&DiagnosticRecord::for_event(&event, applied));
        }

        Some(event)
    }

    /// Applies the event's preset. Returns it only if the host accepted it.
    fn dispatch(&mut self, event: &ActionEvent) -> Option<PresetId> {
        let preset = event.preset()?;

        if matches!(event, ActionEvent::Trip { .. }) && self.applier.current_preset() == Some(preset) {
            return None;
        }

        if self.applier.apply_preset(preset) {
            Some(preset)
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("preset {} rejected by host", preset.get());
            None
        }
    }

    /// Replaces the configuration snapshot between cycles.
    ///
    /// If the configured pin changed, the old input is released and the new
    /// pin is claimed through `allocator`; when that fails the controller stays
    /// disabled until a later reload or [`set_source`](Self::set_source). A pin
    /// change, a mode switch and disabling all discard tracker state.
    pub fn reload<A>(&mut self, config: SmackConfig, allocator: &mut A)
    where
        A: PinAllocator<Source = S>,
    {
        if config.pin != self.config.pin {
            if let (Some(old_pin), Some(old_source)) = (self.config.pin, self.source.take()) {
                allocator.release(old_pin, old_source);
            }
            self.source = acquire_source(allocator, config.pin);
            self.tracker = ModeTracker::from_config(&config);

            if self.source.is_none() && config.enabled {
                #[cfg(feature = "defmt")]
                defmt::warn!("smack sensor unavailable (pin {:?}), sensor disabled", config.pin);
            }
        } else {
            self.tracker.reload(&config);
        }

        if !config.enabled {
            self.tracker.reset();
        }
        self.config = config;
    }

    /// Enables or disables the controller.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.tracker.reset();
        }
        self.config.enabled = enabled;
    }

    /// Swaps the signal source, returning the previous one.
    ///
    /// Tracker state is discarded because the new source has no shared history.
    pub fn set_source(&mut self, source: Option<S>) -> Option<S> {
        self.tracker.reset();
        core::mem::replace(&mut self.source, source)
    }

    /// Returns true if the controller reads its signal on `service`.
    pub fn is_active(&self) -> bool {
        self.config.enabled && self.source.is_some()
    }

    /// Returns true if no signal source could be acquired.
    pub fn is_source_missing(&self) -> bool {
        self.source.is_none()
    }

    /// Returns the active tracker mode.
    pub fn mode(&self) -> TrackerMode {
        self.tracker.mode()
    }

    /// Returns the active tracker.
    pub fn tracker(&self) -> &ModeTracker<I> {
        &self.tracker
    }

    /// Returns the configuration snapshot in use.
    pub fn config(&self) -> &SmackConfig {
        &self.config
    }

    /// Returns the preset applier.
    pub fn applier(&self) -> &P {
        &self.applier
    }

    /// Returns the preset applier mutably.
    pub fn applier_mut(&mut self) -> &mut P {
        &mut self.applier
    }

    /// Returns the diagnostic sink.
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Returns the diagnostic sink mutably.
    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }
}
