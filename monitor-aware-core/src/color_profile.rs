//! Tracking the color profile of the monitor a window sits on.

use std::sync::Mutex;

use crate::event::ColorProfileChanged;
use crate::lock;
use crate::window::WindowHandle;

/// Resolves the color-profile identifier (an ICC profile path) of the monitor a window mostly
/// overlaps.
pub trait ColorProfileSource: Send + Sync {
    /// Returns `None` if the profile cannot be resolved.
    fn color_profile_id(&self, window: WindowHandle) -> Option<String>;
}

/// Remembers the last known profile and reports when it changes.
///
/// Identifiers are compared case-insensitively since they are Windows file paths.
#[derive(Debug, Default)]
pub struct ColorProfileTracker {
    current: Mutex<String>,
}

impl ColorProfileTracker {
    pub fn new(initial: Option<String>) -> Self {
        Self { current: Mutex::new(initial.unwrap_or_default()) }
    }

    /// The last known profile, empty if none has been resolved yet.
    pub fn current(&self) -> String {
        lock(&self.current).clone()
    }

    /// Re-resolves the profile and returns the change, if there is one.
    ///
    /// A failed resolution keeps the last known value and reports nothing.
    pub fn recheck(
        &self,
        source: &dyn ColorProfileSource,
        window: WindowHandle,
    ) -> Option<ColorProfileChanged> {
        let new = source.color_profile_id(window)?;
        let mut current = lock(&self.current);
        if eq_ignore_case(&current, &new) {
            return None;
        }

        let old = std::mem::replace(&mut *current, new.clone());
        tracing::debug!(old = %old, new = %new, "color profile changed");
        Some(ColorProfileChanged { old, new })
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}
