//! Widget preference service.
//!
//! # Responsibility
//! - Provide typed read/write access to theme, pin state and window bounds.
//!
//! # Invariants
//! - Every preference is read and written independently under its own key.
//! - Unreadable values fall back to defaults; write failures are logged.
//! - Window bounds never go below the minimum widget size.

use crate::model::preferences::{Preferences, Theme, WindowBounds};
use crate::store::{SettingsStore, SettingsStoreExt};
use log::info;

pub const THEME_KEY: &str = "theme";
pub const ALWAYS_ON_TOP_KEY: &str = "alwaysOnTop";
pub const WINDOW_BOUNDS_KEY: &str = "windowBounds";

/// Preference facade over a settings store.
pub struct PreferencesService<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> PreferencesService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn theme(&self) -> Theme {
        self.store.get(THEME_KEY, Theme::default())
    }

    /// Stores `theme`; returns whether the write landed.
    pub fn set_theme(&self, theme: Theme) -> bool {
        let persisted = self.store.set(THEME_KEY, &theme);
        info!(
            "event=theme_set module=preferences status={} theme={}",
            status(persisted),
            theme.as_str()
        );
        persisted
    }

    /// Switches between dark and light and returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    pub fn always_on_top(&self) -> bool {
        self.store.get(ALWAYS_ON_TOP_KEY, true)
    }

    /// Stores the pin state; returns whether the write landed.
    pub fn set_always_on_top(&self, enabled: bool) -> bool {
        let persisted = self.store.set(ALWAYS_ON_TOP_KEY, &enabled);
        info!(
            "event=always_on_top_set module=preferences status={} enabled={}",
            status(persisted),
            enabled
        );
        persisted
    }

    /// Flips the pin state and returns the new value.
    pub fn toggle_always_on_top(&self) -> bool {
        let next = !self.always_on_top();
        self.set_always_on_top(next);
        next
    }

    /// Stored window bounds, raised to the minimum size if needed.
    pub fn window_bounds(&self) -> WindowBounds {
        self.store
            .get(WINDOW_BOUNDS_KEY, WindowBounds::default())
            .clamped()
    }

    /// Stores `bounds` (clamped) and returns what was stored.
    pub fn save_window_bounds(&self, bounds: WindowBounds) -> WindowBounds {
        let bounds = bounds.clamped();
        let persisted = self.store.set(WINDOW_BOUNDS_KEY, &bounds);
        info!(
            "event=window_bounds_save module=preferences status={} width={} height={} x={} y={}",
            status(persisted),
            bounds.width,
            bounds.height,
            bounds.x,
            bounds.y
        );
        bounds
    }

    /// Reads every preference.
    pub fn snapshot(&self) -> Preferences {
        Preferences {
            theme: self.theme(),
            always_on_top: self.always_on_top(),
            window_bounds: self.window_bounds(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn status(persisted: bool) -> &'static str {
    if persisted {
        "ok"
    } else {
        "error"
    }
}
