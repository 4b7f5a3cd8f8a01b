//! Status-line rendering for the CLI.
//!
//! Screens go to stdout; status, warnings, and errors go to stderr through
//! a [`RenderSink`] so command handlers can be tested with a mock sink.

use crossterm::style::{Color, Stylize};

const INDENT: &str = "  ";
const GLYPH_SECTION_BULLET: &str = "•";
const LABEL_WARNING: &str = "warning:";
const LABEL_ERROR: &str = "error:";

const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
const COLOR_SECTION_TITLE: Color = Color::Cyan;
const COLOR_FIELD_KEY: Color = Color::DarkGrey;
const COLOR_FIELD_VALUE: Color = Color::White;
const COLOR_WARNING: Color = Color::Yellow;
const COLOR_ERROR: Color = Color::Red;

/// Injectable status output used by command handlers.
pub trait RenderSink: Send + Sync {
    /// Render a titled section line.
    fn section(&self, title: &str);
    /// Render one key/value field row.
    fn field(&self, key: &str, value: &str);
    /// Render a warning line.
    fn warn(&self, msg: &str);
    /// Render an error line.
    fn error(&self, msg: &str);
}

/// Terminal renderer writing to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    fn section_line(&self, title: &str) -> String {
        if self.color {
            format!(
                "{} {}",
                GLYPH_SECTION_BULLET.with(COLOR_SECTION_BULLET),
                title.with(COLOR_SECTION_TITLE).bold()
            )
        } else {
            title.to_string()
        }
    }

    fn field_line(&self, key: &str, value: &str) -> String {
        if self.color {
            format!(
                "{INDENT}{} {}",
                format!("{key}:").with(COLOR_FIELD_KEY),
                value.with(COLOR_FIELD_VALUE),
            )
        } else {
            format!("{INDENT}{key}: {value}")
        }
    }

    fn warn_line(&self, msg: &str) -> String {
        if self.color {
            format!("{} {msg}", LABEL_WARNING.with(COLOR_WARNING).bold())
        } else {
            format!("{LABEL_WARNING} {msg}")
        }
    }

    fn error_line(&self, msg: &str) -> String {
        if self.color {
            format!("{} {msg}", LABEL_ERROR.with(COLOR_ERROR).bold())
        } else {
            format!("{LABEL_ERROR} {msg}")
        }
    }
}

impl RenderSink for Renderer {
    fn section(&self, title: &str) {
        eprintln!("{}", self.section_line(title));
    }

    fn field(&self, key: &str, value: &str) {
        eprintln!("{}", self.field_line(key, value));
    }

    fn warn(&self, msg: &str) {
        eprintln!("{}", self.warn_line(msg));
    }

    fn error(&self, msg: &str) {
        eprintln!("{}", self.error_line(msg));
    }
}
