//! Exray Application
//!
//! The native application shell providing windowing, input translation,
//! and presentation of the canvas.

mod app;
mod config;
mod event_handler;
mod frame_clock;
mod shortcuts;

pub use app::App;
pub use config::{AppConfig, ConfigError, CONFIG_ENV};
pub use frame_clock::FrameClock;
pub use shortcuts::{Shortcut, ShortcutRegistry};
