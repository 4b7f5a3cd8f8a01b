//! Session view-model for the active theme.
//!
//! `ThemeController` is the single source of truth for the selected theme
//! during a session. It loads the persisted choice once at construction,
//! writes every accepted change through to its store, then notifies
//! observers. Re-selecting the active choice is a no-op.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::ConfigError;
use crate::store::{PreferenceStore, SettingsFileStore};
use crate::theme::ThemeChoice;

type Observer = Arc<dyn Fn(ThemeChoice) + Send + Sync>;

/// Handle returned by [`ThemeController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Theme view-model with write-through persistence.
pub struct ThemeController<S: PreferenceStore = SettingsFileStore> {
    selected: ThemeChoice,
    store: S,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    cell: watch::Sender<ThemeChoice>,
}

impl ThemeController<SettingsFileStore> {
    /// Controller over the settings file at the resolved default location.
    pub fn open_default(path_override: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self::new(SettingsFileStore::open_default(path_override)?))
    }
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Build a controller, loading the persisted choice exactly once.
    pub fn new(store: S) -> Self {
        let selected = store.load();
        tracing::debug!(%selected, "theme controller initialized");
        let (cell, _) = watch::channel(selected);
        Self {
            selected,
            store,
            observers: Vec::new(),
            next_subscription: 0,
            cell,
        }
    }

    /// Currently active choice.
    pub fn selected_theme(&self) -> ThemeChoice {
        self.selected
    }

    /// Switch to `new`, persisting the change and then notifying observers.
    ///
    /// Returns `false` without side effects when `new` is already active.
    pub fn change_theme(&mut self, new: ThemeChoice) -> bool {
        if !self.commit(new) {
            return false;
        }
        for (_, observer) in &self.observers {
            observer(new);
        }
        true
    }

    /// Update memory, persist, and publish to the watch cell.
    ///
    /// Callback observers are left to the caller.
    fn commit(&mut self, new: ThemeChoice) -> bool {
        if self.selected == new {
            return false;
        }
        let previous = std::mem::replace(&mut self.selected, new);
        tracing::info!(from = %previous, to = %new, "theme changed");
        self.store.save(new);
        self.cell.send_replace(new);
        true
    }

    fn observers(&self) -> Vec<Observer> {
        self.observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    /// Register a callback invoked synchronously after each accepted change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(ThemeChoice) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Arc::new(observer)));
        id
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Observable cell holding the current choice.
    ///
    /// The receiver is marked changed only by accepted changes.
    pub fn watch(&self) -> watch::Receiver<ThemeChoice> {
        self.cell.subscribe()
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: PreferenceStore + fmt::Debug> fmt::Debug for ThemeController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("selected", &self.selected)
            .field("store", &self.store)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Thread-safe handle that serializes all access behind one mutex.
///
/// Clones share the same controller. Callback observers run after the lock
/// is released, so they may read the handle again.
pub struct SharedThemeController<S: PreferenceStore = SettingsFileStore> {
    inner: Arc<Mutex<ThemeController<S>>>,
}

impl<S: PreferenceStore> Clone for SharedThemeController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: PreferenceStore> SharedThemeController<S> {
    pub fn new(controller: ThemeController<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn selected_theme(&self) -> ThemeChoice {
        self.lock().selected_theme()
    }

    pub fn change_theme(&self, new: ThemeChoice) -> bool {
        let observers = {
            let mut controller = self.lock();
            if !controller.commit(new) {
                return false;
            }
            controller.observers()
        };
        for observer in observers {
            observer(new);
        }
        true
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(ThemeChoice) + Send + Sync + 'static,
    {
        self.lock().subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().unsubscribe(id)
    }

    pub fn watch(&self) -> watch::Receiver<ThemeChoice> {
        self.lock().watch()
    }

    fn lock(&self) -> MutexGuard<'_, ThemeController<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: PreferenceStore> From<ThemeController<S>> for SharedThemeController<S> {
    fn from(controller: ThemeController<S>) -> Self {
        Self::new(controller)
    }
}
