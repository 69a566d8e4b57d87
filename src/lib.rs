//! hwsubmit - log a classroom screen in to the grading portal and submit
//! homework images from the terminal.
//!
//! The portal client in [`portal`] is usable on its own; the rest of the
//! crate is the TUI around it.

// Core modules
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod keymap;
pub mod portal;
pub mod screens;
pub mod state;
pub mod styles;
pub mod tasks;
pub mod tui;
pub mod utils;
pub mod widgets;

// Re-exports for convenience
pub use config::Config;
pub use portal::{PortalClient, PortalError};
pub use state::{Session, ViewState};
pub use tasks::{TaskOutcome, TaskRunner};

// Keymap re-exports (used by Config and for external API)
pub use keymap::{Action, KeyBinding, Keymap, KeymapPreset};
