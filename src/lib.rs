//! Themekeeper — a persisted light/dark/system appearance preference.
//!
//! The crate keeps exactly one typed preference: the user's [`ThemeChoice`].
//! A [`PreferenceStore`] persists it under the `app_theme` key, and a
//! [`ThemeController`] holds the session's selection, notifies observers,
//! and writes changes through to the store.
//!
//! # Quick start
//!
//! ```no_run
//! use themekeeper::{ThemeChoice, ThemeController};
//!
//! let mut controller = ThemeController::open_default(None).unwrap();
//! controller.subscribe(|choice| println!("theme is now {choice}"));
//! controller.change_theme(ThemeChoice::Dark);
//! ```

pub mod ambient;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod screens;
pub mod store;
#[cfg(test)]
pub mod testsupport;
pub mod theme;

pub use controller::{SharedThemeController, SubscriptionId, ThemeController};
pub use store::{MemoryStore, PreferenceStore, SettingsFileStore};
pub use theme::{Appearance, ThemeChoice};
