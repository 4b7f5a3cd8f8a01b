//! `show`, `list`, and `set` command helpers.

use std::path::Path;

use themekeeper::ambient::AmbientSource;
use themekeeper::render::RenderSink;
use themekeeper::screens::{resolve_theme_selector, HomeScreen, SettingsScreen};
use themekeeper::{PreferenceStore, ThemeController};

/// Render the home screen for the current selection.
pub(crate) fn show_home<S: PreferenceStore>(
    controller: &ThemeController<S>,
    ambient: &dyn AmbientSource,
    color: bool,
) -> String {
    HomeScreen::new(controller, ambient).render(color)
}

/// Render the settings picker for the current selection.
pub(crate) fn show_list<S: PreferenceStore>(controller: &ThemeController<S>, color: bool) -> String {
    SettingsScreen::new(controller.selected_theme()).render(color)
}

/// Handle `set <name|index>`: switch, then confirm persistence.
///
/// Returns an error message for selectors that do not name a theme.
pub(crate) fn handle_set<S: PreferenceStore>(
    renderer: &dyn RenderSink,
    controller: &mut ThemeController<S>,
    location: Option<&Path>,
    selector: &str,
) -> Result<(), String> {
    let selected = resolve_theme_selector(selector)?;

    if !controller.change_theme(selected) {
        renderer.section(&format!("theme already {selected}"));
        return Ok(());
    }

    if controller.store().load() != selected {
        renderer.warn(&format!(
            "theme switched to `{selected}`, but persistence failed"
        ));
        return Ok(());
    }

    renderer.section(&format!("switched theme: {selected}"));
    if let Some(path) = location {
        renderer.field("saved_to", &path.display().to_string());
    }
    Ok(())
}
