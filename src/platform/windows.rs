//! The Win32 backend.

use rwh_06::{HandleError, HasWindowHandle};

pub use monitor_aware_win32::*;

use crate::{AttachError, HandlerAttributes, WindowHandle};

/// Attaches a handler to any window that exposes a raw Win32 handle.
///
/// Fails with [`AttachError::NotRealized`] if the window has no native handle yet.
pub fn attach_window(
    window: &impl HasWindowHandle,
    attributes: HandlerAttributes,
) -> Result<SubclassedWindow, AttachError> {
    let handle = window.window_handle().map_err(|err| match err {
        HandleError::Unavailable => AttachError::NotRealized,
        _ => AttachError::UnsupportedHandle,
    })?;
    SubclassedWindow::attach(WindowHandle::try_from(handle.as_raw())?, attributes)
}
