//! The per-window entry point.

use std::fmt;
use std::sync::{Arc, Mutex};

use dpi::{MonitorDpi, ScaleFactor, WindowGeometry};

use crate::arbiter::{DpiChangeArbiter, PendingChange, TransitionStatus};
use crate::attributes::{HandlerAttributes, ScaleMode};
use crate::error::AttachError;
use crate::event::{ColorProfileChanged, DpiChanged, SubscriptionId};
use crate::lock;
use crate::notification::Notification;
use crate::platform::PlatformPorts;
use crate::probe::SystemContext;
use crate::tap::NotificationTap;
use crate::window::WindowHandle;

/// Handles the DPI of one window for its whole lifetime.
///
/// Create it with [`WindowHandler::attach`] once the native window exists, forward the window's
/// notifications to [`WindowHandler::handle_message`] (or
/// [`WindowHandler::handle_notification`]) and drop it, or call [`WindowHandler::detach`], when
/// the window is destroyed.
///
/// ```no_run
/// # use monitor_aware_core::{
/// #     HandlerAttributes, PlatformPorts, SystemContext, WindowHandle, WindowHandler,
/// # };
/// # fn ports() -> PlatformPorts { unimplemented!() }
/// let window = WindowHandle::from_raw(0x1234)?;
/// let context = SystemContext::default();
/// let handler = WindowHandler::attach(window, ports(), &context, HandlerAttributes::default())?;
/// handler.on_dpi_changed(|event| println!("now at {:?}", event.new_dpi));
/// # Ok::<(), monitor_aware_core::AttachError>(())
/// ```
pub struct WindowHandler {
    arbiter: DpiChangeArbiter,
    taps: Mutex<Vec<Arc<dyn NotificationTap>>>,
}

impl WindowHandler {
    pub fn attach(
        window: WindowHandle,
        ports: PlatformPorts,
        context: &SystemContext,
        attributes: HandlerAttributes,
    ) -> Result<Self, AttachError> {
        let arbiter = DpiChangeArbiter::new(window, ports, context, attributes)?;
        Ok(Self { arbiter, taps: Mutex::new(Vec::new()) })
    }

    /// Releases the handler. Subscribers are dropped without further events.
    pub fn detach(self) {
        tracing::debug!(window = ?self.arbiter.window(), "detached window handler");
    }

    /// Decodes and handles a raw window message.
    ///
    /// `suggested` is the rectangle carried by `WM_DPICHANGED`, ignored for other messages.
    /// Returns `true` if the message was handled and the default window procedure must not see
    /// it. Unrelated messages return `false`.
    pub fn handle_message(
        &self,
        msg: u32,
        wparam: usize,
        suggested: Option<WindowGeometry>,
    ) -> bool {
        match Notification::from_raw(msg, wparam, suggested) {
            Some(notification) => self.handle_notification(&notification),
            None => false,
        }
    }

    /// Handles a decoded notification. See [`WindowHandler::handle_message`].
    pub fn handle_notification(&self, notification: &Notification) -> bool {
        let taps = lock(&self.taps).clone();
        for tap in &taps {
            tap.notify(self.arbiter.window(), notification);
        }

        self.arbiter.handle_notification(notification)
    }

    pub fn add_tap(&self, tap: Arc<dyn NotificationTap>) {
        lock(&self.taps).push(tap);
    }

    /// Subscribes to committed DPI changes.
    pub fn on_dpi_changed(
        &self,
        callback: impl Fn(&DpiChanged) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.arbiter.dpi_changed_events().subscribe(callback)
    }

    /// Subscribes to color profile changes.
    pub fn on_color_profile_changed(
        &self,
        callback: impl Fn(&ColorProfileChanged) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.arbiter.color_profile_events().subscribe(callback)
    }

    /// Removes a subscription made with either `on_*` method.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.arbiter.dpi_changed_events().unsubscribe(id)
            || self.arbiter.color_profile_events().unsubscribe(id)
    }

    pub fn arbiter(&self) -> &DpiChangeArbiter {
        &self.arbiter
    }

    pub fn window(&self) -> WindowHandle {
        self.arbiter.window()
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.arbiter.attributes().scale_mode
    }

    pub fn initial_dpi(&self) -> MonitorDpi {
        self.arbiter.initial_dpi()
    }

    pub fn monitor_dpi(&self) -> MonitorDpi {
        self.arbiter.monitor_dpi()
    }

    pub fn window_dpi(&self) -> MonitorDpi {
        self.arbiter.window_dpi()
    }

    pub fn scale_factor(&self) -> ScaleFactor {
        self.arbiter.scale_factor()
    }

    pub fn status(&self) -> TransitionStatus {
        self.arbiter.status()
    }

    pub fn pending_change(&self) -> Option<PendingChange> {
        self.arbiter.pending_change()
    }

    pub fn color_profile_id(&self) -> String {
        self.arbiter.color_profile_id()
    }
}

impl fmt::Debug for WindowHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowHandler")
            .field("arbiter", &self.arbiter)
            .field("taps", &lock(&self.taps).len())
            .finish()
    }
}
