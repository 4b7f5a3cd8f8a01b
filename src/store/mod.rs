//! Durable storage for the single `app_theme` preference.
//!
//! Reads never fail: a missing or unrecognized value resolves to
//! [`ThemeChoice::System`]. Writes are fire-and-forget; implementations that
//! can fail log the failure instead of returning it.

use std::sync::{Arc, Mutex, PoisonError};

use crate::theme::ThemeChoice;

mod file;

pub use file::SettingsFileStore;

/// Settings key that holds the theme identifier.
pub const THEME_KEY: &str = "app_theme";

/// Read/write access to the persisted theme preference.
pub trait PreferenceStore: Send + Sync {
    /// Load the persisted choice, defaulting to `System`.
    fn load(&self) -> ThemeChoice;
    /// Persist `choice` under [`THEME_KEY`].
    fn save(&self, choice: ThemeChoice);
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Arc<S> {
    fn load(&self) -> ThemeChoice {
        (**self).load()
    }

    fn save(&self, choice: ThemeChoice) {
        (**self).save(choice)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn load(&self) -> ThemeChoice {
        (**self).load()
    }

    fn save(&self, choice: ThemeChoice) {
        (**self).save(choice)
    }
}

/// Decode a raw stored value, absorbing absence and corruption into `System`.
pub fn decode_stored(raw: Option<&str>) -> ThemeChoice {
    let Some(raw) = raw else {
        return ThemeChoice::System;
    };
    ThemeChoice::from_identifier(raw).unwrap_or_else(|| {
        tracing::warn!(key = THEME_KEY, value = raw, "preference corrupt; using system");
        ThemeChoice::System
    })
}

/// In-process store holding the raw string value.
///
/// Nothing survives the process; useful as a scratch substrate and for
/// seeding arbitrary raw values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Empty store; `load` returns `System`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an arbitrary raw value.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw value under the key, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove the stored value.
    pub fn clear(&self) {
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> ThemeChoice {
        let raw = self.raw.lock().unwrap_or_else(PoisonError::into_inner);
        decode_stored(raw.as_deref())
    }

    fn save(&self, choice: ThemeChoice) {
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(choice.as_str().to_string());
    }
}
