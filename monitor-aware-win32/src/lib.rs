//! Win32 backend for `monitor-aware`.
//!
//! Provides [`Win32Platform`], the implementation of the platform ports on top of the Win32 API,
//! and [`SubclassedWindow`], which hooks a [`WindowHandler`](monitor_aware_core::WindowHandler)
//! into an existing window's message stream.
//!
//! Functions that only exist on newer Windows versions (`GetDpiForMonitor`,
//! `SetProcessDpiAwarenessContext`, ...) are loaded at runtime, so the crate still works on
//! versions without per-monitor DPI support; handlers then stay inert.
#![cfg(target_os = "windows")]

#[macro_use]
mod util;
mod color_profile;
mod dpi;
mod platform;
mod subclass;

pub use crate::dpi::{become_dpi_aware, is_per_monitor_aware, system_context, system_dpi};
pub use crate::platform::Win32Platform;
pub use crate::subclass::SubclassedWindow;
