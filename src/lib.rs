//! Core modules for the Keywheel keyboard scroll emulator.
//!
//! This library exposes internal modules for testing purposes.
//! It is not intended for external use as a library.

pub mod config;
pub mod keys;
pub mod recorder;
pub mod state;

// Re-export types for test modules
pub use config::AppConfig;
pub use recorder::{ComboRecorder, RecorderState};
pub use state::{AppState, ComboSide};
