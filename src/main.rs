// Hide console window in release mode
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod gui;
mod keyboard;
mod keys;
mod recorder;
mod signal;
mod state;
mod tray;

use std::sync::Arc;
use std::thread;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use windows::Win32::Media::timeBeginPeriod;

use config::AppConfig;
use gui::{KeywheelGui, show_error};
use state::AppState;
use tray::TrayIcon;

fn main() -> Result<()> {
    // Request 1ms timer resolution for responsive input handling
    unsafe { timeBeginPeriod(1) };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keywheel=info")),
        )
        .init();

    signal::set_console_ctrl_handler()?;

    // Load config or create default if not exists
    let config = match AppConfig::load_or_create("Config.toml") {
        Ok(cfg) => cfg,
        Err(e) => {
            let error_msg = format!("Failed to load configuration: {}", e);
            return show_error(&error_msg);
        }
    };

    let app_state = Arc::new(match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            let error_msg = format!("Failed to initialize application state: {}", e);
            return show_error(&error_msg);
        }
    });

    if let Err(_existing) = state::set_global_state(app_state.clone()) {
        // Single set in main, so this cannot happen; continue with the GUI
        tracing::warn!("global state was already initialized");
    }

    // Start tray icon if enabled
    if app_state.show_tray_icon() {
        let tray_state = app_state.clone();
        thread::spawn(move || match TrayIcon::new(tray_state.should_exit.clone()) {
            Ok(mut tray) => {
                let _ = tray.run_message_loop();
            }
            Err(e) => {
                tracing::warn!("failed to create tray icon: {e:#}");
            }
        });
    }

    tracing::info!("keywheel started");

    let result = KeywheelGui::run(app_state.clone(), config);

    // All exit paths release the hook; this covers GUI teardown too
    app_state.exit();
    result
}
