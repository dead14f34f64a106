//! GUI module for application interface components.
//!
//! Provides the graphical user interface using the `egui` framework: the
//! main window, the startup error dialog, and utility functions.

mod error_dialog;
mod main_window;
mod utils;

use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui;

use crate::config::AppConfig;
use crate::recorder::ComboRecorder;
use crate::state::AppState;

pub use error_dialog::show_error;

/// Main GUI application structure.
pub struct KeywheelGui {
    /// Shared application state
    app_state: Arc<AppState>,
    /// Combo recording state machine
    recorder: ComboRecorder,
    /// Keys seen down during the previous capture frame, for edge detection
    capture_prev_pressed: HashSet<u32>,
    /// Close confirmation dialog visibility
    show_close_dialog: bool,
    /// Whether the next close request should actually close the window
    allow_close: bool,
    /// Transient status line shown under the controls
    status_message: Option<String>,
    /// Current theme mode
    dark_mode: bool,
    /// Cached dark theme visuals
    cached_dark_visuals: egui::Visuals,
    /// Cached light theme visuals
    cached_light_visuals: egui::Visuals,
}

impl KeywheelGui {
    /// Creates a new GUI instance with the given state and configuration.
    pub fn new(app_state: Arc<AppState>, config: &AppConfig) -> Self {
        Self {
            app_state,
            recorder: ComboRecorder::new(),
            capture_prev_pressed: HashSet::new(),
            show_close_dialog: false,
            allow_close: false,
            status_message: None,
            dark_mode: config.dark_mode,
            cached_dark_visuals: Self::create_dark_visuals(),
            cached_light_visuals: Self::create_light_visuals(),
        }
    }

    /// Creates dark theme visuals configuration.
    fn create_dark_visuals() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(8);
        visuals.widgets.open.corner_radius = egui::CornerRadius::same(10);

        visuals.window_fill = egui::Color32::from_rgb(24, 26, 32);
        visuals.panel_fill = egui::Color32::from_rgb(28, 30, 38);
        visuals.faint_bg_color = egui::Color32::from_rgb(34, 36, 44);
        visuals.extreme_bg_color = egui::Color32::from_rgb(40, 42, 52);

        visuals
    }

    /// Creates light theme visuals configuration.
    fn create_light_visuals() -> egui::Visuals {
        let mut visuals = egui::Visuals::light();

        visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.active.corner_radius = egui::CornerRadius::same(10);
        visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(8);
        visuals.widgets.open.corner_radius = egui::CornerRadius::same(10);

        visuals.window_fill = egui::Color32::from_rgb(244, 244, 248);
        visuals.panel_fill = egui::Color32::from_rgb(240, 240, 246);
        visuals.faint_bg_color = egui::Color32::from_rgb(232, 232, 240);
        visuals.extreme_bg_color = egui::Color32::from_rgb(226, 226, 236);

        visuals
    }

    /// Launches the GUI application.
    ///
    /// # Errors
    ///
    /// Returns an error if the GUI framework fails to initialize or run.
    pub fn run(app_state: Arc<AppState>, config: AppConfig) -> anyhow::Result<()> {
        let icon = utils::create_icon();

        let viewport = egui::ViewportBuilder::default()
            .with_inner_size([460.0, 420.0])
            .with_min_inner_size([460.0, 420.0])
            .with_resizable(true)
            .with_title("Keywheel - Keyboard Scroll Emulator")
            .with_icon(icon);

        let options = eframe::NativeOptions {
            viewport,
            ..Default::default()
        };

        eframe::run_native(
            "Keywheel",
            options,
            Box::new(move |_cc| Ok(Box::new(KeywheelGui::new(app_state, &config)))),
        )
        .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))
    }
}
