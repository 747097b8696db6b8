//! Per-monitor DPI handling for native windows.
//!
//! When a window is dragged across monitors with different pixel densities, Windows notifies it
//! with `WM_DPICHANGED` and expects the application to rescale. Doing that naively makes the
//! window jump back and forth across the monitor boundary, or rescale for a monitor it only
//! passed over. This crate decides *when* to commit such a change and applies the matching window
//! geometry, then tells the application through [`DpiChanged`] events.
//!
//! # Attaching a handler
//!
//! On Windows, opt into per-monitor DPI before creating any window and then attach a handler to
//! each window:
//!
//! ```no_run
//! # #[cfg(windows)] {
//! # fn window() -> monitor_aware::WindowHandle { unimplemented!() }
//! use monitor_aware::platform::windows::{become_dpi_aware, SubclassedWindow};
//! use monitor_aware::HandlerAttributes;
//!
//! become_dpi_aware();
//! // ... create the window ...
//! let subclassed = SubclassedWindow::attach(window(), HandlerAttributes::default())?;
//! subclassed.handler().on_dpi_changed(|event| {
//!     println!("rescale content by {:?}", event.scale_factor);
//! });
//! # }
//! # Ok::<(), monitor_aware::AttachError>(())
//! ```
//!
//! Hosts that run their own window procedure can instead create a [`WindowHandler`] with their
//! own [`PlatformPorts`] and forward messages to [`WindowHandler::handle_message`].
//!
//! # Cargo Features
//!
//! - `serde`: Enables serialization/deserialization of the value types (DPI, geometry, events and
//!   attributes) through [serde](https://crates.io/crates/serde).
//! - `mint`: Enables mint (math interoperability standard types) conversions for [`dpi`] types.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use dpi;
pub use monitor_aware_core::*;

pub mod platform;
