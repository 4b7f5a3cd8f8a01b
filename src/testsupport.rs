//! Shared test fixtures for store and controller test modules.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::store::PreferenceStore;
use crate::theme::ThemeChoice;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "themekeeper-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Store spy that counts loads and records every save.
#[derive(Debug, Default)]
pub struct SpyStore {
    value: Mutex<Option<ThemeChoice>>,
    saved: Mutex<Vec<ThemeChoice>>,
    loads: AtomicUsize,
}

impl SpyStore {
    /// Spy whose first `load` returns `choice`.
    pub fn seeded(choice: ThemeChoice) -> Self {
        Self {
            value: Mutex::new(Some(choice)),
            ..Self::default()
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    /// Every value passed to `save`, in order.
    pub fn saved(&self) -> Vec<ThemeChoice> {
        self.saved.lock().unwrap().clone()
    }
}

impl PreferenceStore for SpyStore {
    fn load(&self) -> ThemeChoice {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.value.lock().unwrap().unwrap_or_default()
    }

    fn save(&self, choice: ThemeChoice) {
        *self.value.lock().unwrap() = Some(choice);
        self.saved.lock().unwrap().push(choice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert!(file.starts_with(fixture.path()));
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[test]
    fn spy_store_defaults_to_system_and_records_saves() {
        let spy = SpyStore::default();
        assert_eq!(spy.load(), ThemeChoice::System);
        spy.save(ThemeChoice::Dark);
        assert_eq!(spy.load(), ThemeChoice::Dark);
        assert_eq!(spy.loads(), 2);
        assert_eq!(spy.saved(), vec![ThemeChoice::Dark]);
    }
}
