//! Querying the DPI of monitors.

use dpi::{MonitorDpi, Position, WindowGeometry};

use crate::error::OsError;
use crate::window::WindowHandle;

/// Resolves the DPI of the monitor that a window, rectangle or point belongs to.
///
/// Implementations resolve to the *nearest* monitor, so a rectangle that lies off every screen
/// still has a DPI. Failures are reported as [`OsError`] and the arbiter falls back to the system
/// DPI from [`SystemContext`].
pub trait DpiProbe: Send + Sync {
    /// The DPI of the monitor the window mostly overlaps.
    fn dpi_for_window(&self, window: WindowHandle) -> Result<MonitorDpi, OsError>;

    /// The DPI of the monitor a rectangle would mostly overlap.
    fn dpi_for_rect(&self, rect: WindowGeometry) -> Result<MonitorDpi, OsError>;

    /// The DPI of the monitor containing a point.
    fn dpi_for_point(&self, point: Position) -> Result<MonitorDpi, OsError>;

    /// The system DPI (the DPI of the primary monitor at logon).
    fn system_dpi(&self) -> MonitorDpi;

    /// Whether the current process receives per-monitor DPI notifications.
    fn is_per_monitor_aware(&self) -> bool;
}

/// Process-wide DPI facts, resolved once.
///
/// The system DPI cannot change while a process runs (a sign-out is required), so this value is
/// computed a single time and passed by reference to every handler.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemContext {
    pub system_dpi: MonitorDpi,
    pub per_monitor_aware: bool,
}

impl SystemContext {
    pub fn new(system_dpi: MonitorDpi, per_monitor_aware: bool) -> Self {
        Self { system_dpi, per_monitor_aware }
    }

    /// Reads the system facts from a probe.
    pub fn detect(probe: &dyn DpiProbe) -> Self {
        let context = Self::new(probe.system_dpi(), probe.is_per_monitor_aware());
        tracing::debug!(
            system_dpi = context.system_dpi.pixels_per_inch_x(),
            per_monitor_aware = context.per_monitor_aware,
            "resolved system DPI context"
        );
        context
    }
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new(MonitorDpi::IDENTITY, true)
    }
}

/// Wraps a probe so that every failure degrades to the system DPI.
pub(crate) struct FallbackProbe<'a> {
    pub(crate) probe: &'a dyn DpiProbe,
    pub(crate) context: &'a SystemContext,
}

impl FallbackProbe<'_> {
    pub(crate) fn dpi_for_window(&self, window: WindowHandle) -> MonitorDpi {
        self.probe.dpi_for_window(window).unwrap_or_else(|error| {
            tracing::warn!("failed to resolve window DPI, using system DPI: {error}");
            self.context.system_dpi
        })
    }
}
