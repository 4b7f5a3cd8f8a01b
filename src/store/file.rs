//! TOML settings-file store.
//!
//! The preference lives as a top-level `app_theme = "<id>"` entry. Writes only
//! touch that one line so unrelated keys, tables, and comments survive.

use std::path::{Path, PathBuf};

use crate::config::resolve_settings_path;
use crate::error::{ConfigError, StoreError};
use crate::theme::ThemeChoice;

use super::{decode_stored, PreferenceStore, THEME_KEY};

/// Theme preference persisted in a TOML settings file.
#[derive(Debug, Clone)]
pub struct SettingsFileStore {
    path: PathBuf,
}

impl SettingsFileStore {
    /// Store backed by the file at `path`; the file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the resolved default settings location.
    pub fn open_default(path_override: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self::new(resolve_settings_path(path_override)?))
    }

    /// Path of the backing settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw `app_theme` string.
    ///
    /// `Ok(None)` covers a missing file or key. Non-string values are
    /// reported as invalid.
    pub fn read_raw(&self) -> Result<Option<String>, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let table: toml::Table = toml::from_str(&text)?;
        match table.get(THEME_KEY) {
            None => Ok(None),
            Some(toml::Value::String(raw)) => Ok(Some(raw.clone())),
            Some(other) => Err(ConfigError::Invalid(format!(
                "{THEME_KEY} must be a string, found {}",
                other.type_str()
            ))),
        }
    }

    /// Persist `choice` and return the written path.
    pub fn try_save(&self, choice: ThemeChoice) -> Result<PathBuf, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let existing = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let updated = upsert_theme_key(&existing, choice.as_str());
        verify_upsert(&self.path, &updated, choice)?;
        std::fs::write(&self.path, updated)?;
        Ok(self.path.clone())
    }
}

impl PreferenceStore for SettingsFileStore {
    fn load(&self) -> ThemeChoice {
        match self.read_raw() {
            Ok(raw) => {
                let choice = decode_stored(raw.as_deref());
                tracing::debug!(path = %self.path.display(), %choice, "loaded theme preference");
                choice
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "preference corrupt; using system"
                );
                ThemeChoice::System
            }
        }
    }

    fn save(&self, choice: ThemeChoice) {
        match self.try_save(choice) {
            Ok(path) => {
                tracing::debug!(path = %path.display(), %choice, "saved theme preference");
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to persist theme preference"
                );
            }
        }
    }
}

/// Upsert the top-level `app_theme` entry while preserving unrelated content.
///
/// Top-level keys must precede the first table header, so a new entry goes
/// right before it. An existing entry is replaced across every line its value
/// spans.
fn upsert_theme_key(input: &str, value: &str) -> String {
    let entry = format!("{THEME_KEY} = \"{value}\"");
    let mut lines = input.lines().map(str::to_string).collect::<Vec<_>>();

    let mut state = ScanState::default();
    let mut first_table = lines.len();
    let mut pending: Option<usize> = None;
    let mut existing: Option<(usize, usize)> = None;
    for (idx, line) in lines.iter().enumerate() {
        if state.is_neutral() {
            if line.trim_start().starts_with('[') {
                first_table = idx;
                break;
            }
            if existing.is_none() && is_assignment_key(line, THEME_KEY) {
                pending = Some(idx);
            }
        }
        state.scan_line(line);
        if state.is_neutral() {
            if let Some(start) = pending.take() {
                existing = Some((start, idx));
            }
        }
    }

    if let Some((start, end)) = existing {
        lines.drain(start..=end);
        lines.insert(start, entry);
        return ensure_trailing_newline(lines.join("\n"));
    }

    if first_table < lines.len() {
        lines.insert(first_table, String::new());
    }
    lines.insert(first_table, entry);
    ensure_trailing_newline(lines.join("\n"))
}

/// Reject an edit that would leave the file unparsable or without the value.
fn verify_upsert(path: &Path, updated: &str, choice: ThemeChoice) -> Result<(), StoreError> {
    let table: toml::Table = toml::from_str(updated).map_err(|e| {
        StoreError::Invalid(format!(
            "refusing to write `{}`: settings would not parse: {e}",
            path.display()
        ))
    })?;
    match table.get(THEME_KEY).and_then(toml::Value::as_str) {
        Some(stored) if stored == choice.as_str() => Ok(()),
        _ => Err(StoreError::Invalid(format!(
            "refusing to write `{}`: {THEME_KEY} would not hold `{choice}`",
            path.display()
        ))),
    }
}

/// Multi-line string currently open at a line boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenString {
    Basic,
    Literal,
}

/// Lexical state carried across lines: open brackets/braces and strings.
#[derive(Debug, Default)]
struct ScanState {
    depth: usize,
    string: Option<OpenString>,
}

impl ScanState {
    /// True when the next line starts a fresh top-level statement.
    fn is_neutral(&self) -> bool {
        self.depth == 0 && self.string.is_none()
    }

    fn scan_line(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match self.string {
                Some(OpenString::Basic) => {
                    if bytes[i] == b'\\' {
                        i += 2;
                        continue;
                    }
                    if bytes[i..].starts_with(b"\"\"\"") {
                        self.string = None;
                        i += 3;
                        continue;
                    }
                    i += 1;
                }
                Some(OpenString::Literal) => {
                    if bytes[i..].starts_with(b"'''") {
                        self.string = None;
                        i += 3;
                        continue;
                    }
                    i += 1;
                }
                None => match bytes[i] {
                    b'#' => return,
                    b'"' if bytes[i..].starts_with(b"\"\"\"") => {
                        self.string = Some(OpenString::Basic);
                        i += 3;
                    }
                    b'\'' if bytes[i..].starts_with(b"'''") => {
                        self.string = Some(OpenString::Literal);
                        i += 3;
                    }
                    b'"' => i = skip_basic_string(bytes, i + 1),
                    b'\'' => i = skip_literal_string(bytes, i + 1),
                    b'[' | b'{' => {
                        self.depth += 1;
                        i += 1;
                    }
                    b']' | b'}' => {
                        self.depth = self.depth.saturating_sub(1);
                        i += 1;
                    }
                    _ => i += 1,
                },
            }
        }
    }
}

/// Index just past the closing quote of a single-line basic string.
fn skip_basic_string(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    i
}

/// Index just past the closing quote of a single-line literal string.
fn skip_literal_string(bytes: &[u8], i: usize) -> usize {
    bytes[i..]
        .iter()
        .position(|b| *b == b'\'')
        .map_or(bytes.len(), |offset| i + offset + 1)
}

/// Return true when `line` assigns a value to `key`, bare or quoted
/// (`key = ...`, `"key" = ...`, `'key' = ...`).
fn is_assignment_key(line: &str, key: &str) -> bool {
    let Some((lhs, _)) = line.split_once('=') else {
        return false;
    };
    let lhs = lhs.trim();
    let unquoted = lhs
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| lhs.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')))
        .unwrap_or(lhs);
    unquoted == key
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn inserts_key_into_empty_file() {
        assert_eq!(upsert_theme_key("", "light"), "app_theme = \"light\"\n");
    }

    #[test]
    fn inserts_key_before_first_table() {
        let input = "# settings\n[window]\nwidth = 800\n";
        let out = upsert_theme_key(input, "dark");
        assert_eq!(
            out,
            "# settings\napp_theme = \"dark\"\n\n[window]\nwidth = 800\n"
        );
    }

    #[test]
    fn replaces_existing_top_level_key() {
        let input = "font = \"mono\"\napp_theme = \"dark\"\n[window]\napp_theme = \"x\"\n";
        let out = upsert_theme_key(input, "light");
        assert_eq!(
            out,
            "font = \"mono\"\napp_theme = \"light\"\n[window]\napp_theme = \"x\"\n"
        );
    }

    #[test]
    fn ignores_keys_sharing_a_prefix() {
        let input = "app_theme_extra = 1\n";
        let out = upsert_theme_key(input, "system");
        assert_eq!(out, "app_theme_extra = 1\napp_theme = \"system\"\n");
    }

    #[test]
    fn array_continuation_lines_are_not_headers() {
        let input = "matrix = [\n  [1, 2],\n  [3, 4],\n]\n[window]\nwidth = 800\n";
        let out = upsert_theme_key(input, "dark");
        assert_eq!(
            out,
            "matrix = [\n  [1, 2],\n  [3, 4],\n]\napp_theme = \"dark\"\n\n[window]\nwidth = 800\n"
        );
    }

    #[test]
    fn replaces_quoted_key_spellings() {
        for input in ["\"app_theme\" = \"light\"\n", "'app_theme' = \"light\"\n"] {
            assert_eq!(upsert_theme_key(input, "dark"), "app_theme = \"dark\"\n", "input={input:?}");
        }
    }

    #[test]
    fn replaces_multi_line_value_entirely() {
        let input = "app_theme = \"\"\"\nlight\"\"\"\nfont = \"mono\"\n";
        let out = upsert_theme_key(input, "dark");
        assert_eq!(out, "app_theme = \"dark\"\nfont = \"mono\"\n");
    }

    #[test]
    fn header_lookalikes_inside_strings_are_skipped() {
        let input = "banner = \"\"\"\n[not a table]\n\"\"\"\nlabel = 'x [y' # [z]\n[real]\n";
        let out = upsert_theme_key(input, "light");
        assert_eq!(
            out,
            "banner = \"\"\"\n[not a table]\n\"\"\"\nlabel = 'x [y' # [z]\napp_theme = \"light\"\n\n[real]\n"
        );
    }

    #[test]
    fn is_assignment_key_matches_bare_and_quoted() {
        assert!(is_assignment_key("app_theme = \"dark\"", THEME_KEY));
        assert!(is_assignment_key("  \"app_theme\"=\"dark\"", THEME_KEY));
        assert!(is_assignment_key("'app_theme' = 'dark'", THEME_KEY));
        assert!(!is_assignment_key("app_theme_extra = 1", THEME_KEY));
        assert!(!is_assignment_key("app_theme.mode = 1", THEME_KEY));
        assert!(!is_assignment_key("# app_theme", THEME_KEY));
    }

    #[test]
    fn round_trips_real_world_settings_shapes() {
        let dir = TestTempDir::new("file-store-shapes");
        let cases = [
            ("nested-array.toml", "matrix = [\n  [1, 2],\n]\n"),
            ("quoted-key.toml", "\"app_theme\" = \"light\"\n"),
            ("literal-key.toml", "'app_theme' = \"light\"\n"),
            ("inline-table.toml", "point = { x = 1, y = [2, 3] }\n[window]\nwidth = 1\n"),
            (
                "array-of-tables.toml",
                "name = \"demo\"\n\n[[plugins]]\nid = \"a\"\n\n[[plugins]]\nid = \"b\"\n",
            ),
            (
                "multi-line-inline.toml",
                "colors = [\n  { name = \"bg\" },\n  { name = \"fg\" },\n]\n",
            ),
        ];
        for (name, content) in cases {
            let path = dir.write_text(name, content);
            let before: toml::Table = toml::from_str(content).expect("fixture is valid toml");
            let store = SettingsFileStore::new(&path);
            for choice in [ThemeChoice::Dark, ThemeChoice::Light, ThemeChoice::System] {
                store.try_save(choice).unwrap_or_else(|e| panic!("{name}: {e}"));
                assert_eq!(store.load(), choice, "file={name}");
            }

            let text = std::fs::read_to_string(&path).expect("read back");
            let mut after: toml::Table = toml::from_str(&text).expect("still valid toml");
            let mut before = before;
            before.remove(THEME_KEY);
            after.remove(THEME_KEY);
            assert_eq!(after, before, "file={name}");
        }
    }

    #[test]
    fn refuses_to_write_over_unparsable_settings() {
        let dir = TestTempDir::new("file-store-refuse");
        let content = "app_theme = [unclosed\n";
        let path = dir.write_text("settings.toml", content);
        let store = SettingsFileStore::new(&path);

        let err = store.try_save(ThemeChoice::Dark).expect_err("must refuse");
        assert!(matches!(err, StoreError::Invalid(_)), "got: {err}");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), content);
    }

    #[test]
    fn refuses_edit_that_conflicts_with_dotted_table() {
        let dir = TestTempDir::new("file-store-dotted");
        let content = "app_theme.mode = \"dark\"\n";
        let path = dir.write_text("settings.toml", content);
        let err = SettingsFileStore::new(&path)
            .try_save(ThemeChoice::Light)
            .expect_err("must refuse");
        assert!(err.to_string().starts_with("invalid store: refusing to write"), "got: {err}");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), content);
    }

    #[test]
    fn round_trips_every_choice_through_the_file() {
        let dir = TestTempDir::new("file-store");
        let store = SettingsFileStore::new(dir.child("nested/settings.toml"));
        for choice in ThemeChoice::ALL {
            store.save(choice);
            assert_eq!(store.load(), choice);
        }
    }

    #[test]
    fn missing_file_loads_system() {
        let dir = TestTempDir::new("file-store-missing");
        let store = SettingsFileStore::new(dir.child("settings.toml"));
        assert_eq!(store.read_raw().expect("read"), None);
        assert_eq!(store.load(), ThemeChoice::System);
    }

    #[test]
    fn corrupt_contents_load_system() {
        let dir = TestTempDir::new("file-store-corrupt");
        for (name, content) in [
            ("purple.toml", "app_theme = \"purple\"\n"),
            ("empty.toml", "app_theme = \"\"\n"),
            ("number.toml", "app_theme = 3\n"),
            ("broken.toml", "app_theme = [unclosed\n"),
            ("nested.toml", "[window]\napp_theme = \"dark\"\n"),
        ] {
            let path = dir.write_text(name, content);
            let store = SettingsFileStore::new(path);
            assert_eq!(store.load(), ThemeChoice::System, "file={name}");
        }
    }

    #[test]
    fn save_preserves_unrelated_settings() {
        let dir = TestTempDir::new("file-store-preserve");
        let path = dir.write_text("settings.toml", "font = \"mono\"\n\n[window]\nwidth = 800\n");
        let store = SettingsFileStore::new(&path);
        let written = store.try_save(ThemeChoice::Dark).expect("save");
        assert_eq!(written, path);

        let text = std::fs::read_to_string(&path).expect("read back");
        let table: toml::Table = toml::from_str(&text).expect("valid toml");
        assert_eq!(table["font"].as_str(), Some("mono"));
        assert_eq!(table["window"]["width"].as_integer(), Some(800));
        assert_eq!(table["app_theme"].as_str(), Some("dark"));
    }

    #[test]
    fn try_save_reports_unwritable_location() {
        let dir = TestTempDir::new("file-store-unwritable");
        let blocker = dir.write_text("blocker", "not a directory");
        let store = SettingsFileStore::new(blocker.join("settings.toml"));
        assert!(store.try_save(ThemeChoice::Light).is_err());
        // `save` swallows the failure.
        store.save(ThemeChoice::Light);
        assert_eq!(store.load(), ThemeChoice::System);
    }

    #[cfg(feature = "fuzz-tests")]
    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn key() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9_]{0,8}".prop_filter("reserved key", |k| k != THEME_KEY)
        }

        fn leaf() -> impl Strategy<Value = toml::Value> {
            prop_oneof![
                any::<i64>().prop_map(toml::Value::Integer),
                any::<bool>().prop_map(toml::Value::Boolean),
                "[ -~]{0,12}".prop_map(toml::Value::String),
                proptest::collection::vec(any::<i32>().prop_map(i64::from), 0..4).prop_map(|xs| {
                    toml::Value::Array(xs.into_iter().map(toml::Value::Integer).collect())
                }),
            ]
        }

        fn value() -> impl Strategy<Value = toml::Value> {
            prop_oneof![
                leaf(),
                proptest::collection::vec(leaf(), 0..4).prop_map(toml::Value::Array),
                proptest::collection::btree_map(key(), leaf(), 0..4).prop_map(|entries| {
                    toml::Value::Table(entries.into_iter().collect())
                }),
            ]
        }

        fn document() -> impl Strategy<Value = toml::Table> {
            proptest::collection::btree_map(key(), value(), 0..6)
                .prop_map(|entries| entries.into_iter().collect())
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn save_then_load_round_trips_and_keeps_other_keys(
                doc in document(),
                pretty in any::<bool>(),
                idx in 0usize..3,
            ) {
                let text = if pretty {
                    toml::to_string_pretty(&doc).expect("serialize")
                } else {
                    toml::to_string(&doc).expect("serialize")
                };
                let choice = ThemeChoice::ALL[idx];
                let dir = TestTempDir::new("file-store-prop");
                let path = dir.write_text("settings.toml", &text);
                let store = SettingsFileStore::new(&path);

                prop_assert!(store.try_save(choice).is_ok(), "doc:\n{}", text);
                prop_assert_eq!(store.load(), choice);

                let written = std::fs::read_to_string(&path).expect("read back");
                let mut after: toml::Table = toml::from_str(&written).expect("valid toml");
                after.remove(THEME_KEY);
                prop_assert_eq!(after, doc);
            }
        }
    }
}
