//! Read-only theme screens: the home summary and the settings picker.
//!
//! Screens are plain data built from the controller's current selection.
//! Rendering returns text so callers decide where it goes.

use crossterm::style::{Color, Stylize};

use crate::ambient::AmbientSource;
use crate::controller::ThemeController;
use crate::store::PreferenceStore;
use crate::theme::{Appearance, ThemeChoice};

const GLYPH_SELECTED: &str = "✓";
const GLYPH_SELECTED_PLAIN: &str = "*";
const COLOR_LABEL: Color = Color::DarkGrey;
const COLOR_VALUE: Color = Color::Cyan;
const COLOR_SELECTED: Color = Color::Green;

/// Capitalized name, annotated with the ambient mode when the choice is `system`.
pub fn theme_display_name(choice: ThemeChoice, ambient: Option<Appearance>) -> String {
    match (choice, ambient) {
        (ThemeChoice::System, Some(mode)) => format!("{} ({})", choice.display_name(), mode.label()),
        _ => choice.display_name().to_string(),
    }
}

/// Home summary: "Current Theme: <name>".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeScreen {
    pub choice: ThemeChoice,
    /// Appearance actually applied.
    pub effective: Appearance,
    pub display_name: String,
}

impl HomeScreen {
    /// Build from the controller; the ambient source is queried only for `system`.
    pub fn new<S: PreferenceStore>(
        controller: &ThemeController<S>,
        ambient: &dyn AmbientSource,
    ) -> Self {
        let choice = controller.selected_theme();
        let (effective, annotation) = match choice.appearance() {
            Some(fixed) => (fixed, None),
            None => {
                let current = ambient.current();
                (current, Some(current))
            }
        };
        Self {
            choice,
            effective,
            display_name: theme_display_name(choice, annotation),
        }
    }

    pub fn render(&self, color: bool) -> String {
        if color {
            format!(
                "{} {}\n{} {}\n",
                "Current Theme:".with(COLOR_LABEL).bold(),
                self.display_name.as_str().with(COLOR_VALUE).bold(),
                "Appearance:".with(COLOR_LABEL),
                self.effective.label(),
            )
        } else {
            format!(
                "Current Theme: {}\nAppearance: {}\n",
                self.display_name,
                self.effective.label()
            )
        }
    }
}

/// One row of the settings picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRow {
    pub choice: ThemeChoice,
    pub label: &'static str,
    pub selected: bool,
}

/// Settings picker listing every choice with a checkmark on the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsScreen {
    pub rows: Vec<SettingsRow>,
}

impl SettingsScreen {
    pub fn new(selected: ThemeChoice) -> Self {
        let rows = ThemeChoice::ALL
            .into_iter()
            .map(|choice| SettingsRow {
                choice,
                label: choice.display_name(),
                selected: choice == selected,
            })
            .collect();
        Self { rows }
    }

    /// Apply a tap on the row at `index` (0-based).
    ///
    /// Returns whether the controller accepted a change.
    pub fn tap<S: PreferenceStore>(
        &mut self,
        controller: &mut ThemeController<S>,
        index: usize,
    ) -> Result<bool, String> {
        let choice = self
            .rows
            .get(index)
            .map(|row| row.choice)
            .ok_or_else(|| format!("no theme row at index {index}"))?;
        let changed = controller.change_theme(choice);
        *self = Self::new(controller.selected_theme());
        Ok(changed)
    }

    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        if color {
            out.push_str(&format!("{}\n", "Theme".with(COLOR_LABEL).bold()));
        } else {
            out.push_str("Theme\n");
        }
        for (idx, row) in self.rows.iter().enumerate() {
            let line = match (row.selected, color) {
                (true, true) => format!(
                    "  {}. {} {}",
                    idx + 1,
                    row.label.bold(),
                    GLYPH_SELECTED.with(COLOR_SELECTED)
                ),
                (true, false) => format!("  {}. {} {GLYPH_SELECTED_PLAIN}", idx + 1, row.label),
                (false, _) => format!("  {}. {}", idx + 1, row.label),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Resolve a picker selector as either a 1-based index or a theme name.
pub fn resolve_theme_selector(selector: &str) -> Result<ThemeChoice, String> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err("Usage: set <name|index>".to_string());
    }

    if let Ok(index) = trimmed.parse::<usize>() {
        let count = ThemeChoice::ALL.len();
        if index == 0 || index > count {
            return Err(format!("Theme index out of range: {index}. Choose 1-{count}."));
        }
        return Ok(ThemeChoice::ALL[index - 1]);
    }

    trimmed.parse::<ThemeChoice>().map_err(|err| err.to_string())
}
