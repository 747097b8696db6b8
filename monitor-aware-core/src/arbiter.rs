//! The per-window DPI change state machine.
//!
//! Windows sends `WM_DPICHANGED` as soon as the larger part of a window crosses onto a monitor
//! with a different DPI. While the user is dragging, that is often the wrong moment to rescale:
//! the window may only be passing over the monitor, and rescaling can itself move the window back
//! across the boundary. The arbiter therefore records every DPI change as a [`PendingChange`] and
//! decides separately *when* to commit it:
//!
//! - When the window is stationary, the change is committed immediately.
//! - During a move, the change is committed only once the window's rectangle, at the new size,
//!   actually resolves to the target DPI. When the move ends, the last recorded DPI is tried once
//!   more (the "last stand"), so a drag that crossed monitors always ends up correctly scaled.
//! - During a resize, the OS already delivers the final geometry through `WM_SIZE`, so the change
//!   is committed without touching the window rectangle.
//!
//! Only one thread commits at a time. Committing resizes the window, which makes Windows send
//! `WM_MOVE`/`WM_SIZE` (and sometimes another `WM_DPICHANGED`) synchronously, before the commit
//! returns. Such re-entrant calls find the commit token taken, leave their change in the pending
//! slot and return; the committing loop drains the slot before it gives up the token.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use bitflags::bitflags;
use dpi::{MonitorDpi, Position, ScaleFactor, Size, WindowGeometry};

use crate::attributes::{HandlerAttributes, ScaleMode};
use crate::color_profile::ColorProfileTracker;
use crate::error::AttachError;
use crate::event::{ColorProfileChanged, DpiChanged, Observers};
use crate::lock;
use crate::notification::{Notification, ResizeKind};
use crate::platform::PlatformPorts;
use crate::probe::{FallbackProbe, SystemContext};
use crate::scale;
use crate::window::WindowHandle;

/// What kind of user-driven change is underway.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionStatus {
    /// The window stands still.
    #[default]
    Idle,
    /// The window's location is being changed.
    LocationChanging,
    /// The window's size is being changed.
    SizeChanging,
}

/// A DPI change waiting to be committed.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingChange {
    pub target_dpi: MonitorDpi,
    /// The outer size to give the window. `None` leaves the size alone.
    pub size: Option<Size>,
    /// Where to put the window. `None` keeps its current location.
    pub position: Option<Position>,
}

bitflags! {
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
    struct GestureFlags: u8 {
        /// Between `WM_ENTERSIZEMOVE` and `WM_EXITSIZEMOVE`.
        const IN_SIZE_MOVE = 1 << 0;
        /// A DPI change arrived since the gesture started.
        const DPI_CHANGED  = 1 << 1;
    }
}

#[derive(Debug)]
struct ArbiterState {
    status: TransitionStatus,
    flags: GestureFlags,
    location_count: u32,
    size_count: u32,
    /// The window size that DPI-driven sizes are derived from during a gesture.
    base_size: Option<Size>,
    monitor_dpi: MonitorDpi,
    window_dpi: MonitorDpi,
    scale_factor: ScaleFactor,
    last_rect: Option<WindowGeometry>,
}

impl ArbiterState {
    fn set_status(&mut self, status: TransitionStatus) {
        if self.status != status {
            tracing::trace!(from = ?self.status, to = ?status, "transition status changed");
            self.status = status;
        }
    }
}

/// Single-entry mailbox for the change to commit next.
///
/// `submissions` counts every [`PendingSlot::submit`]; a committer compares it before and after
/// releasing the commit token to detect a change it has not seen.
#[derive(Debug, Default)]
struct PendingSlot {
    change: Mutex<Option<PendingChange>>,
    submissions: AtomicUsize,
}

impl PendingSlot {
    /// Stores a change, replacing whatever was queued.
    fn submit(&self, change: PendingChange) {
        if let Some(superseded) = lock(&self.change).replace(change) {
            tracing::debug!(?superseded, "pending DPI change superseded");
        }
        self.submissions.fetch_add(1, Ordering::AcqRel);
    }

    fn take(&self) -> Option<PendingChange> {
        lock(&self.change).take()
    }

    /// Puts back a change that could not be committed yet.
    ///
    /// If a newer change was queued in the meantime, that one is returned for testing and the
    /// deferred one is dropped.
    fn requeue(&self, deferred: PendingChange) -> Option<PendingChange> {
        let mut slot = lock(&self.change);
        match slot.take() {
            Some(newer) => Some(newer),
            None => {
                *slot = Some(deferred);
                None
            },
        }
    }

    fn peek(&self) -> Option<PendingChange> {
        *lock(&self.change)
    }

    fn submissions(&self) -> usize {
        self.submissions.load(Ordering::Acquire)
    }
}

/// Decides when a window's DPI change is committed.
///
/// Feed it every notification with [`DpiChangeArbiter::handle_notification`], in the order the OS
/// generated them.
pub struct DpiChangeArbiter {
    window: WindowHandle,
    context: SystemContext,
    attributes: HandlerAttributes,
    initial_dpi: MonitorDpi,
    ports: PlatformPorts,
    state: Mutex<ArbiterState>,
    pending: PendingSlot,
    committing: AtomicBool,
    color_profile: ColorProfileTracker,
    dpi_changed: Observers<DpiChanged>,
    color_profile_changed: Observers<ColorProfileChanged>,
}

impl DpiChangeArbiter {
    /// Creates the arbiter for a live window.
    ///
    /// Fails with [`AttachError::NotRealized`] if the window does not exist at the OS level.
    pub fn new(
        window: WindowHandle,
        ports: PlatformPorts,
        context: &SystemContext,
        attributes: HandlerAttributes,
    ) -> Result<Self, AttachError> {
        if !ports.geometry.is_realized(window) {
            return Err(AttachError::NotRealized);
        }

        let initial_dpi = if context.per_monitor_aware {
            FallbackProbe { probe: ports.probe.as_ref(), context }.dpi_for_window(window)
        } else {
            context.system_dpi
        };

        let color_profile = if attributes.track_color_profile {
            ColorProfileTracker::new(ports.color_profile.color_profile_id(window))
        } else {
            ColorProfileTracker::default()
        };

        tracing::debug!(
            ?window,
            dpi = initial_dpi.pixels_per_inch_x(),
            per_monitor_aware = context.per_monitor_aware,
            scale_mode = ?attributes.scale_mode,
            "attached DPI change arbiter"
        );

        Ok(Self {
            window,
            context: *context,
            attributes,
            initial_dpi,
            ports,
            state: Mutex::new(ArbiterState {
                status: TransitionStatus::Idle,
                flags: GestureFlags::empty(),
                location_count: 0,
                size_count: 0,
                base_size: None,
                monitor_dpi: initial_dpi,
                window_dpi: initial_dpi,
                scale_factor: ScaleFactor::IDENTITY,
                last_rect: None,
            }),
            pending: PendingSlot::default(),
            committing: AtomicBool::new(false),
            color_profile,
            dpi_changed: Observers::new(),
            color_profile_changed: Observers::new(),
        })
    }

    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn system_context(&self) -> &SystemContext {
        &self.context
    }

    pub fn attributes(&self) -> &HandlerAttributes {
        &self.attributes
    }

    /// The DPI of the window when the arbiter was created.
    pub fn initial_dpi(&self) -> MonitorDpi {
        self.initial_dpi
    }

    /// The DPI of the monitor the OS last reported for the window.
    pub fn monitor_dpi(&self) -> MonitorDpi {
        lock(&self.state).monitor_dpi
    }

    /// The DPI the window's content is currently rendered at.
    pub fn window_dpi(&self) -> MonitorDpi {
        lock(&self.state).window_dpi
    }

    pub fn scale_factor(&self) -> ScaleFactor {
        lock(&self.state).scale_factor
    }

    pub fn status(&self) -> TransitionStatus {
        lock(&self.state).status
    }

    pub fn is_in_size_move(&self) -> bool {
        lock(&self.state).flags.contains(GestureFlags::IN_SIZE_MOVE)
    }

    /// The change waiting to be committed, if any.
    pub fn pending_change(&self) -> Option<PendingChange> {
        self.pending.peek()
    }

    /// The last known color profile of the monitor under the window.
    pub fn color_profile_id(&self) -> String {
        self.color_profile.current()
    }

    pub fn dpi_changed_events(&self) -> &Observers<DpiChanged> {
        &self.dpi_changed
    }

    pub fn color_profile_events(&self) -> &Observers<ColorProfileChanged> {
        &self.color_profile_changed
    }

    /// Whether the process opted out of per-monitor DPI, in which case the arbiter only mirrors
    /// the system DPI.
    fn is_inert(&self) -> bool {
        !self.context.per_monitor_aware
    }

    fn forbears(&self) -> bool {
        self.attributes.scale_mode == ScaleMode::Forbear
    }

    /// Processes one notification.
    ///
    /// Returns `true` if the OS's default handling must be suppressed, which is the case for every
    /// `WM_DPICHANGED` the arbiter takes care of.
    pub fn handle_notification(&self, notification: &Notification) -> bool {
        tracing::trace!(window = ?self.window, ?notification, "received notification");

        match *notification {
            Notification::EnterSizeMove => self.on_enter_size_move(),
            Notification::ExitSizeMove => self.on_exit_size_move(),
            Notification::Moved => self.on_moved(),
            Notification::Resized(ResizeKind::Restored) => self.on_resized(),
            Notification::DpiChanged { dpi, suggested } => {
                return self.on_dpi_changed(dpi, suggested);
            },
            Notification::Resized(_)
            | Notification::Activated(_)
            | Notification::ColorizationChanged => {},
        }

        false
    }

    fn on_enter_size_move(&self) {
        if self.is_inert() || self.forbears() {
            return;
        }

        let base_size = self.read_rect().map(|rect| rect.size());

        let mut state = lock(&self.state);
        state.flags = GestureFlags::IN_SIZE_MOVE;
        state.base_size = base_size;
        state.location_count = 0;
        state.size_count = 0;
    }

    fn on_moved(&self) {
        let attempt = {
            let mut state = lock(&self.state);
            if !state.flags.contains(GestureFlags::IN_SIZE_MOVE) {
                return;
            }

            state.location_count += 1;
            if state.location_count > state.size_count {
                state.set_status(TransitionStatus::LocationChanging);
            }

            self.attributes.scale_mode == ScaleMode::InvokeWhileMoving
        };

        if attempt {
            self.attempt_commit(TransitionStatus::LocationChanging);
        }
    }

    fn on_resized(&self) {
        let mut state = lock(&self.state);
        if !state.flags.contains(GestureFlags::IN_SIZE_MOVE) {
            return;
        }

        state.size_count += 1;
        if state.size_count >= state.location_count {
            state.set_status(TransitionStatus::SizeChanging);
        }
        // The DPI side of a resize is handled when the paired WM_DPICHANGED arrives.
    }

    fn on_dpi_changed(&self, new_dpi: MonitorDpi, suggested: Option<WindowGeometry>) -> bool {
        if self.is_inert() {
            return false;
        }

        let status = {
            let mut state = lock(&self.state);
            if self.forbears() {
                state.monitor_dpi = new_dpi;
                state.window_dpi = new_dpi;
                return false;
            }

            if state.monitor_dpi == new_dpi {
                tracing::trace!("monitor DPI unchanged, ignoring");
                return true;
            }

            let old_dpi = state.monitor_dpi;
            state.monitor_dpi = new_dpi;
            tracing::debug!(
                old = old_dpi.pixels_per_inch_x(),
                new = new_dpi.pixels_per_inch_x(),
                status = ?state.status,
                "monitor DPI changed"
            );

            let in_gesture = state.flags.contains(GestureFlags::IN_SIZE_MOVE);
            if in_gesture {
                state.flags.insert(GestureFlags::DPI_CHANGED);
            }

            let (size, position) = match state.status {
                TransitionStatus::Idle | TransitionStatus::LocationChanging => {
                    match state.base_size {
                        Some(base) if in_gesture => {
                            let size = scale::target_size(base, old_dpi, new_dpi);
                            state.base_size = Some(size);
                            (Some(size), None)
                        },
                        // No baseline: the OS-suggested rectangle is authoritative.
                        _ => {
                            let size = suggested.map(|rect| rect.size());
                            if in_gesture {
                                state.base_size = size;
                                (size, None)
                            } else {
                                (size, suggested.map(|rect| rect.position()))
                            }
                        },
                    }
                },
                TransitionStatus::SizeChanging => (None, None),
            };

            self.pending.submit(PendingChange { target_dpi: new_dpi, size, position });
            state.status
        };

        match status {
            TransitionStatus::Idle => self.attempt_commit(TransitionStatus::Idle),
            // Committed on the next move or when the move ends.
            TransitionStatus::LocationChanging => {},
            TransitionStatus::SizeChanging => self.attempt_commit(TransitionStatus::SizeChanging),
        }

        true
    }

    fn on_exit_size_move(&self) {
        let last_stand = {
            let mut state = lock(&self.state);
            let mut last_stand = None;

            if state.flags.contains(GestureFlags::IN_SIZE_MOVE) {
                if state.flags.contains(GestureFlags::DPI_CHANGED)
                    && state.status == TransitionStatus::LocationChanging
                    && state.window_dpi != state.monitor_dpi
                {
                    last_stand = state.base_size.map(|size| PendingChange {
                        target_dpi: state.monitor_dpi,
                        size: Some(size),
                        position: None,
                    });
                }

                state.flags = GestureFlags::empty();
                state.base_size = None;
                state.set_status(TransitionStatus::Idle);
            }

            last_stand
        };

        if let Some(change) = last_stand {
            tracing::debug!(?change, "move ended with an uncommitted DPI change");
            self.pending.submit(change);
            self.attempt_commit(TransitionStatus::LocationChanging);
        }

        if self.attributes.track_color_profile {
            if let Some(change) =
                self.color_profile.recheck(self.ports.color_profile.as_ref(), self.window)
            {
                self.color_profile_changed.emit(&change);
            }
        }
    }

    /// Commits queued changes until the slot is empty or only holds a change that cannot be
    /// committed yet.
    fn attempt_commit(&self, policy: TransitionStatus) {
        loop {
            if self
                .committing
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                tracing::trace!("commit in progress, leaving change queued");
                return;
            }

            let observed = self.drain(policy);
            self.committing.store(false, Ordering::Release);

            // Something submitted after the last drain found the token still taken.
            if self.pending.submissions() == observed {
                return;
            }
        }
    }

    /// Runs the commit loop while holding the commit token. Returns the submission count that
    /// the final look at the slot reflects.
    fn drain(&self, policy: TransitionStatus) -> usize {
        let mut observed = self.pending.submissions();
        let mut next = self.pending.take();

        while let Some(change) = next {
            if change.target_dpi == lock(&self.state).window_dpi {
                tracing::trace!(?change, "window already rendered at target DPI, dropping");
                observed = self.pending.submissions();
                next = self.pending.take();
                continue;
            }

            let Some(test_rect) = self.test_rect(&change) else {
                observed = self.pending.submissions();
                next = self.pending.requeue(change);
                continue;
            };

            let changes_now = match policy {
                TransitionStatus::Idle | TransitionStatus::SizeChanging => true,
                // An unresolvable rectangle never counts as a match.
                TransitionStatus::LocationChanging => {
                    match self.ports.probe.dpi_for_rect(test_rect) {
                        Ok(resolved) if resolved == change.target_dpi => true,
                        Ok(resolved) => {
                            tracing::debug!(
                                target = change.target_dpi.pixels_per_inch_x(),
                                resolved = resolved.pixels_per_inch_x(),
                                "window not over target monitor yet, deferring"
                            );
                            false
                        },
                        Err(error) => {
                            tracing::warn!(
                                "failed to resolve DPI for {test_rect:?}, deferring: {error}"
                            );
                            false
                        },
                    }
                },
            };

            if changes_now {
                self.commit(&change, test_rect);
                observed = self.pending.submissions();
                next = self.pending.take();
            } else {
                observed = self.pending.submissions();
                next = self.pending.requeue(change);
            }
        }

        observed
    }

    /// The rectangle the window would have after committing `change`.
    fn test_rect(&self, change: &PendingChange) -> Option<WindowGeometry> {
        let live = match self.read_rect() {
            Some(rect) => rect,
            None => {
                let cached = lock(&self.state).last_rect;
                if cached.is_none() {
                    tracing::warn!("no window rectangle available, keeping DPI change queued");
                }
                cached?
            },
        };

        Some(WindowGeometry::from_parts(
            change.position.unwrap_or(live.position()),
            change.size.unwrap_or(live.size()),
        ))
    }

    fn read_rect(&self) -> Option<WindowGeometry> {
        match self.ports.geometry.rect(self.window) {
            Ok(rect) => {
                lock(&self.state).last_rect = Some(rect);
                Some(rect)
            },
            Err(error) => {
                tracing::warn!("failed to read window rectangle: {error}");
                None
            },
        }
    }

    fn commit(&self, change: &PendingChange, rect: WindowGeometry) {
        // The window DPI is updated first so that notifications generated by the geometry writes
        // below already observe the new value.
        let (old_dpi, scale_factor) = {
            let mut state = lock(&self.state);
            let old_dpi = state.window_dpi;
            state.window_dpi = change.target_dpi;
            state.scale_factor = scale::scale_factor(self.initial_dpi, change.target_dpi);
            (old_dpi, state.scale_factor)
        };

        if change.size.is_some() || change.position.is_some() {
            // Two calls: a single SetWindowPos does not reliably apply both the new location and
            // the new size when the window crosses monitors.
            let geometry = self.ports.geometry.as_ref();
            let written = geometry
                .set_position(self.window, rect.position())
                .and_then(|()| geometry.set_size(self.window, rect.size()));
            if let Err(error) = written {
                tracing::warn!("failed to apply window geometry for new DPI: {error}");
            }
        }

        tracing::debug!(
            old = old_dpi.pixels_per_inch_x(),
            new = change.target_dpi.pixels_per_inch_x(),
            ?rect,
            "committed DPI change"
        );

        self.dpi_changed.emit(&DpiChanged { old_dpi, new_dpi: change.target_dpi, scale_factor });
    }
}

impl std::fmt::Debug for DpiChangeArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DpiChangeArbiter")
            .field("window", &self.window)
            .field("initial_dpi", &self.initial_dpi)
            .field("state", &*lock(&self.state))
            .field("pending", &self.pending.peek())
            .finish_non_exhaustive()
    }
}
