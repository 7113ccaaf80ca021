//! Integration tests for SmackConfig and its store schema

mod common;
use common::*;

use smack_that::config::{
    DEFAULT_ACTIVATION_TIMEOUT_MS, DEFAULT_BOUNCE_DELAY_MS, DEFAULT_TRIPWIRE_TIMEOUT_MS, SECTION, keys,
};
use smack_that::{
    ConfigError, DiagnosticLevel, MAX_SMACKS, PresetMap, SettingValue, SmackConfig, TripwirePresets, smack_label,
};

#[test]
fn defaults_match_schema() {
    let config = SmackConfig::default();
    assert!(config.enabled);
    assert_eq!(config.activation_timeout_ms, 250);
    assert_eq!(config.bounce_delay_ms, 150);
    assert_eq!(config.tripwire_timeout_ms, 60_000);
    assert_eq!(config.diagnostic_level, DiagnosticLevel::Off);
    assert_eq!(config.pin, None);
    assert!(!config.invert);
    assert!(!config.tripwire_mode);
    assert!(config.presets.is_empty());
    assert_eq!(config.tripwire_presets, TripwirePresets::default());
    assert_eq!(SECTION, "Smack That Usermod");
}

#[test]
fn default_constants_back_the_default_config() {
    let config = SmackConfig::default();
    assert_eq!(config.activation_timeout_ms, DEFAULT_ACTIVATION_TIMEOUT_MS);
    assert_eq!(config.bounce_delay_ms, DEFAULT_BOUNCE_DELAY_MS);
    assert_eq!(config.tripwire_timeout_ms, DEFAULT_TRIPWIRE_TIMEOUT_MS);

    let built = SmackConfig::default()
        .with_activation_timeout_ms(400)
        .with_bounce_delay_ms(80)
        .with_tripwire(5_000, TripwirePresets::default());
    assert_eq!(built.activation_timeout_ms, 400);
    assert_eq!(built.bounce_delay_ms, 80);
    assert!(built.tripwire_mode);
    assert_eq!(built.tripwire_timeout_ms, 5_000);
}

#[test]
fn empty_store_yields_defaults_and_reports_incomplete() {
    let (config, complete) = SmackConfig::read_from(&MapStore::default());
    assert_eq!(config, SmackConfig::default());
    assert!(!complete);
}

#[test]
fn written_config_reads_back_complete() {
    let presets = PresetMap::<MAX_SMACKS>::builder()
        .preset(1, 4)
        .unwrap()
        .preset(10, 200)
        .unwrap()
        .build();
    let config = SmackConfig::default()
        .with_activation_timeout_ms(400)
        .with_bounce_delay_ms(80)
        .with_diagnostic_level(DiagnosticLevel::RawFeed)
        .with_pin(Some(13))
        .with_invert(true)
        .with_presets(presets)
        .with_tripwire(30_000, TripwirePresets::from_raw(5, 6));

    let mut store = MapStore::default();
    config.write_to(&mut store);
    let (read, complete) = SmackConfig::read_from(&store);

    assert!(complete);
    assert_eq!(read, config);
}

#[test]
fn preset_keys_use_smack_labels() {
    let presets = PresetMap::<MAX_SMACKS>::builder().preset(1, 4).unwrap().preset(3, 9).unwrap().build();
    let mut store = MapStore::default();
    SmackConfig::default().with_presets(presets).write_to(&mut store);

    assert_eq!(store.values.get("1 Smack"), Some(&SettingValue::Int(4)));
    assert_eq!(store.values.get("2 Smacks"), Some(&SettingValue::Int(0)));
    assert_eq!(store.values.get("3 Smacks"), Some(&SettingValue::Int(9)));
    assert_eq!(store.values.get(keys::PIN), Some(&SettingValue::Int(-1)));
    for count in 1..=MAX_SMACKS {
        assert!(store.values.contains_key(smack_label(count).unwrap()));
    }
    assert_eq!(store.values.len(), 10 + MAX_SMACKS);
}

#[test]
fn invalid_values_fall_back_to_defaults() {
    let mut store = MapStore::default();
    SmackConfig::default().write_to(&mut store);
    store.values.insert(keys::BOUNCE_DELAY, SettingValue::Int(-5));
    store.values.insert(keys::ENABLE, SettingValue::Int(1));
    store.values.insert("2 Smacks", SettingValue::Int(300));

    let (config, complete) = SmackConfig::read_from(&store);

    assert!(!complete);
    assert_eq!(config.bounce_delay_ms, 150);
    assert!(config.enabled);
    assert_eq!(config.presets.get(2), None);
}

#[test]
fn strict_read_reports_first_error() {
    let mut store = MapStore::default();
    store.values.insert(keys::ENABLE, SettingValue::Int(1));
    store.values.insert(keys::PIN, SettingValue::Int(-2));

    assert_eq!(
        SmackConfig::try_read_from(&store),
        Err(ConfigError::WrongType { key: keys::ENABLE })
    );

    store.values.remove(keys::ENABLE);
    assert_eq!(
        SmackConfig::try_read_from(&store),
        Err(ConfigError::OutOfRange { key: keys::PIN, value: -2 })
    );
}

#[test]
fn strict_read_accepts_missing_keys() {
    let mut store = MapStore::default();
    store.values.insert(keys::TRIPWIRE_MODE, SettingValue::Bool(true));

    let config = SmackConfig::try_read_from(&store).unwrap();
    assert!(config.tripwire_mode);
    assert_eq!(config.tripwire_timeout_ms, 60_000);
}

#[test]
fn unknown_diagnostic_levels_are_verbose() {
    let mut store = MapStore::default();
    store.values.insert(keys::DIAGNOSTIC_LEVEL, SettingValue::Int(5));
    let (config, _) = SmackConfig::read_from(&store);
    assert_eq!(config.diagnostic_level, DiagnosticLevel::Verbose);
}

#[test]
fn error_messages_format_correctly_for_display() {
    let wrong = ConfigError::WrongType { key: keys::INVERT };
    let range = ConfigError::OutOfRange { key: keys::PIN, value: 999 };
    assert_eq!(wrong.to_string(), "config key \"Invert\" has the wrong type");
    assert_eq!(range.to_string(), "config key \"Pin\" value 999 is out of range");
}
