//! Platform-independent per-monitor DPI handling.
//!
//! This crate contains the state machine that decides when a window reacts to a change of the
//! monitor DPI, together with the traits a platform backend implements to feed it. It does not
//! talk to the OS itself: DPI lookups, window geometry and color profiles are reached through
//! [`DpiProbe`], [`WindowGeometryPort`] and [`ColorProfileSource`].
//!
//! The entry point is [`WindowHandler`], which a host attaches to a live window and then feeds
//! the window's notifications in the order the OS delivered them.

use std::sync::{Mutex, MutexGuard, PoisonError};

// Must come first so `os_error!` is visible to the other modules.
pub mod error;

pub mod arbiter;
pub mod attributes;
pub mod color_profile;
pub mod event;
pub mod geometry;
pub mod handler;
pub mod notification;
pub mod platform;
pub mod probe;
pub mod scale;
pub mod tap;
pub mod window;

pub use dpi;

pub use crate::arbiter::{DpiChangeArbiter, PendingChange, TransitionStatus};
pub use crate::attributes::{HandlerAttributes, ScaleMode};
pub use crate::color_profile::{ColorProfileSource, ColorProfileTracker};
pub use crate::error::{AttachError, OsError};
pub use crate::event::{ChromeEvent, ColorProfileChanged, DpiChanged, Observers, SubscriptionId};
pub use crate::geometry::WindowGeometryPort;
pub use crate::handler::WindowHandler;
pub use crate::notification::{Notification, ResizeKind};
pub use crate::platform::PlatformPorts;
pub use crate::probe::{DpiProbe, SystemContext};
pub use crate::tap::{ChromeEventTap, NotificationTap};
pub use crate::window::WindowHandle;

/// Locks a mutex, recovering the data if another thread panicked while holding it.
///
/// Notification handling runs inside the OS window procedure, where a panic must not be turned
/// into a second one.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
