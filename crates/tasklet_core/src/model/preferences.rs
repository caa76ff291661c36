//! Typed widget preferences.
//!
//! Each preference is stored under its own key and read independently.

use serde::{Deserialize, Serialize};

/// Smallest window width the widget can be resized to.
pub const MIN_WINDOW_WIDTH: u32 = 280;
/// Smallest window height the widget can be resized to.
pub const MIN_WINDOW_HEIGHT: u32 = 400;

/// Color scheme of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Returns the other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parses `dark` / `light`, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Window position and size in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self {
            width: 320,
            height: 480,
            x: 100,
            y: 100,
        }
    }
}

impl WindowBounds {
    /// Returns these bounds with size raised to the widget minimum.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(MIN_WINDOW_WIDTH),
            height: self.height.max(MIN_WINDOW_HEIGHT),
            ..self
        }
    }
}

/// Full preference set as seen at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub always_on_top: bool,
    pub window_bounds: WindowBounds,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            always_on_top: true,
            window_bounds: WindowBounds::default(),
        }
    }
}
