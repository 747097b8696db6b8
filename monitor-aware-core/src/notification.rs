//! Window-manager notifications consumed by the handler.
//!
//! The host forwards messages verbatim and in OS order. [`Notification::from_raw`] decodes the
//! handful of Win32 messages the arbiter cares about; everything else decodes to `None` and should
//! go to the default window procedure untouched.

use dpi::{MonitorDpi, WindowGeometry};

/// Raw Win32 message identifiers understood by [`Notification::from_raw`].
pub mod message {
    pub const WM_MOVE: u32 = 0x0003;
    pub const WM_SIZE: u32 = 0x0005;
    pub const WM_ACTIVATE: u32 = 0x0006;
    pub const WM_ENTERSIZEMOVE: u32 = 0x0231;
    pub const WM_EXITSIZEMOVE: u32 = 0x0232;
    pub const WM_DPICHANGED: u32 = 0x02E0;
    pub const WM_DWMCOLORIZATIONCOLORCHANGED: u32 = 0x0320;

    pub const SIZE_RESTORED: u32 = 0;
    pub const SIZE_MINIMIZED: u32 = 1;
    pub const SIZE_MAXIMIZED: u32 = 2;
    pub const SIZE_MAXSHOW: u32 = 3;
    pub const SIZE_MAXHIDE: u32 = 4;

    pub const WA_INACTIVE: u32 = 0;
    pub const WA_ACTIVE: u32 = 1;
    pub const WA_CLICKACTIVE: u32 = 2;
}

/// The kind of resize reported by `WM_SIZE`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResizeKind {
    /// An ordinary resize of a restored window. Only this kind takes part in DPI arbitration.
    Restored,
    Minimized,
    Maximized,
    /// Another window was restored to its former size.
    MaxShow,
    /// Another window was maximized.
    MaxHide,
}

impl ResizeKind {
    pub fn from_raw(kind: u32) -> Option<Self> {
        match kind {
            message::SIZE_RESTORED => Some(ResizeKind::Restored),
            message::SIZE_MINIMIZED => Some(ResizeKind::Minimized),
            message::SIZE_MAXIMIZED => Some(ResizeKind::Maximized),
            message::SIZE_MAXSHOW => Some(ResizeKind::MaxShow),
            message::SIZE_MAXHIDE => Some(ResizeKind::MaxHide),
            _ => None,
        }
    }
}

/// A decoded window-manager notification.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    /// The window entered an interactive move or resize loop (`WM_ENTERSIZEMOVE`).
    EnterSizeMove,
    /// The interactive move or resize loop ended (`WM_EXITSIZEMOVE`).
    ExitSizeMove,
    /// The window's location changed (`WM_MOVE`).
    Moved,
    /// The window's size changed (`WM_SIZE`).
    Resized(ResizeKind),
    /// The DPI of the monitor under the window changed (`WM_DPICHANGED`).
    ///
    /// `suggested` is the rectangle the OS proposes for the new DPI, if the host could read it.
    DpiChanged { dpi: MonitorDpi, suggested: Option<WindowGeometry> },
    /// The window was activated or deactivated (`WM_ACTIVATE`).
    Activated(bool),
    /// The DWM colorization color changed (`WM_DWMCOLORIZATIONCOLORCHANGED`).
    ColorizationChanged,
}

impl Notification {
    /// Decodes a raw window message.
    ///
    /// `suggested` must be the `RECT` pointed to by `lparam` for `WM_DPICHANGED`; it is ignored for
    /// every other message. Returns `None` for messages the handler does not track, and for a
    /// `WM_DPICHANGED` carrying a zero DPI.
    pub fn from_raw(msg: u32, wparam: usize, suggested: Option<WindowGeometry>) -> Option<Self> {
        match msg {
            message::WM_ENTERSIZEMOVE => Some(Notification::EnterSizeMove),
            message::WM_EXITSIZEMOVE => Some(Notification::ExitSizeMove),
            message::WM_MOVE => Some(Notification::Moved),
            message::WM_SIZE => ResizeKind::from_raw(wparam as u32).map(Notification::Resized),
            message::WM_DPICHANGED => {
                let dpi_x = loword(wparam as u32) as u32;
                let dpi_y = hiword(wparam as u32) as u32;
                MonitorDpi::from_dpi(dpi_x, dpi_y)
                    .map(|dpi| Notification::DpiChanged { dpi, suggested })
            },
            message::WM_ACTIVATE => match loword(wparam as u32) as u32 {
                message::WA_ACTIVE | message::WA_CLICKACTIVE => Some(Notification::Activated(true)),
                message::WA_INACTIVE => Some(Notification::Activated(false)),
                _ => None,
            },
            message::WM_DWMCOLORIZATIONCOLORCHANGED => Some(Notification::ColorizationChanged),
            _ => None,
        }
    }
}

#[inline(always)]
pub(crate) const fn loword(x: u32) -> u16 {
    (x & 0xffff) as u16
}

#[inline(always)]
pub(crate) const fn hiword(x: u32) -> u16 {
    ((x >> 16) & 0xffff) as u16
}
