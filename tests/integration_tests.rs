//! Integration tests for the Keywheel application.
//!
//! Tests verify interactions between different modules
//! and check that application components work together as expected.

use keywheel::config::AppConfig;
use keywheel::keys;
use keywheel::recorder::ComboRecorder;
use keywheel::state::{AppState, ComboSide};
use std::fs;
use std::path::PathBuf;

/// Returns a unique temporary file path for test isolation.
fn get_test_file_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "keywheel_integration_test_{}_{}.toml",
        name,
        std::process::id()
    ));
    path
}

/// Removes a test file if it exists.
fn cleanup_test_file(path: &PathBuf) {
    let _ = fs::remove_file(path);
}

/// Tests configuration save and load cycle preserves data.
#[test]
fn test_config_round_trip() {
    let path = get_test_file_path("round_trip");

    let config = AppConfig {
        show_tray_icon: false,
        show_notifications: true,
        dark_mode: false,
        scroll_up_keys: vec!["LCtrl".to_string(), "A".to_string()],
        scroll_down_keys: vec![],
        scroll_speed: 7,
    };

    config.save_to_file(&path).expect("Failed to save config");
    let loaded_config = AppConfig::load_from_file(&path).expect("Failed to load config");

    assert_eq!(config.show_tray_icon, loaded_config.show_tray_icon);
    assert_eq!(config.show_notifications, loaded_config.show_notifications);
    assert_eq!(config.dark_mode, loaded_config.dark_mode);
    assert_eq!(config.scroll_up_keys, loaded_config.scroll_up_keys);
    assert_eq!(config.scroll_down_keys, loaded_config.scroll_down_keys);
    assert_eq!(config.scroll_speed, loaded_config.scroll_speed);

    cleanup_test_file(&path);
}

/// Tests that a missing config file is created with defaults.
#[test]
fn test_load_or_create_writes_defaults() {
    let path = get_test_file_path("create_default");
    cleanup_test_file(&path);

    let config = AppConfig::load_or_create(&path).expect("Failed to create default config");

    assert!(path.exists());
    assert_eq!(config.scroll_up_keys, vec!["ScrollLock".to_string()]);
    assert_eq!(config.scroll_down_keys, vec!["Pause".to_string()]);
    assert_eq!(config.scroll_speed, 3);

    // A second load reads the file that was just written
    let reloaded = AppConfig::load_or_create(&path).expect("Failed to reload config");
    assert_eq!(reloaded.scroll_speed, config.scroll_speed);

    cleanup_test_file(&path);
}

/// Tests that an out-of-range speed in the file is a load error, not clamped.
#[test]
fn test_config_rejects_out_of_range_speed() {
    let path = get_test_file_path("bad_speed");

    let config = AppConfig {
        scroll_speed: 42,
        ..Default::default()
    };
    config.save_to_file(&path).expect("Failed to save config");

    assert!(AppConfig::load_from_file(&path).is_err());

    cleanup_test_file(&path);
}

/// Tests that malformed TOML is a load error.
#[test]
fn test_config_rejects_malformed_toml() {
    let path = get_test_file_path("malformed");

    fs::write(&path, "show_tray_icon = maybe\n").expect("Failed to write file");
    assert!(AppConfig::load_from_file(&path).is_err());

    cleanup_test_file(&path);
}

/// Tests the full path from config key names to runtime combo state.
#[test]
fn test_config_names_reach_app_state() {
    let config = AppConfig {
        scroll_up_keys: vec!["Ctrl".to_string(), "PageUp".to_string()],
        scroll_down_keys: vec!["Ctrl".to_string(), "PageDown".to_string()],
        scroll_speed: 5,
        ..Default::default()
    };

    let state = AppState::new(&config).expect("Valid config must initialize state");

    assert_eq!(state.combo_keys(ComboSide::Up), vec![0x11, 0x21]);
    assert_eq!(state.combo_keys(ComboSide::Down), vec![0x11, 0x22]);
    assert_eq!(state.scroll_speed(), 5);
}

/// Tests that an unknown key name in config fails state initialization.
#[test]
fn test_config_unknown_key_name_fails_state_init() {
    let config = AppConfig {
        scroll_down_keys: vec!["TURBO".to_string()],
        ..Default::default()
    };
    assert!(AppState::new(&config).is_err());
}

/// Tests a recorded combo flowing into the shared state.
#[test]
fn test_recorder_commit_updates_state() {
    let state = AppState::new(&AppConfig::default()).expect("default config");
    let mut recorder = ComboRecorder::new();

    recorder.start(ComboSide::Up);
    recorder.observe_key_down(0xA2); // LCtrl
    recorder.observe_key_down(0x21); // PageUp

    let (side, combo) = recorder.commit().expect("recording was active");
    state.set_combo(side, combo);

    assert_eq!(state.combo_keys(ComboSide::Up), vec![0xA2, 0x21]);
    assert_eq!(
        keys::join_display_names(&state.combo_keys(ComboSide::Up)),
        "LCtrl + PageUp"
    );
}

/// Tests that an empty commit disables the direction and blocks activation
/// only when both sides end up empty.
#[test]
fn test_empty_commits_disable_and_gate_activation() {
    let state = AppState::new(&AppConfig::default()).expect("default config");
    let mut recorder = ComboRecorder::new();

    recorder.start(ComboSide::Up);
    let (side, combo) = recorder.commit().expect("recording was active");
    assert!(combo.is_empty());
    state.set_combo(side, combo);
    assert!(state.validate_activation().is_ok()); // down side still set

    recorder.start(ComboSide::Down);
    let (side, combo) = recorder.commit().expect("recording was active");
    state.set_combo(side, combo);
    assert!(state.validate_activation().is_err());
}
