//! Platform ambient light/dark detection.
//!
//! Ambient appearance is only read at render time to annotate `system`; it is
//! never persisted.

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

use crate::theme::Appearance;

/// Source of the platform's current light/dark setting.
pub trait AmbientSource {
    fn current(&self) -> Appearance;
}

/// Queries the operating system on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformAmbient;

impl AmbientSource for PlatformAmbient {
    fn current(&self) -> Appearance {
        let appearance = match detect_os_theme() {
            OsThemeMode::Dark => Appearance::Dark,
            OsThemeMode::Light => Appearance::Light,
        };
        tracing::debug!(?appearance, "detected platform appearance");
        appearance
    }
}

/// A fixed appearance acts as its own source.
impl AmbientSource for Appearance {
    fn current(&self) -> Appearance {
        *self
    }
}
