//! Feeding a window's messages to a [`WindowHandler`] by subclassing it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use monitor_aware_core::{
    AttachError, HandlerAttributes, PlatformPorts, WindowHandle, WindowHandler,
};
use windows_sys::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows_sys::Win32::UI::Shell::{
    DefSubclassProc, GetWindowSubclass, RemoveWindowSubclass, SetWindowSubclass,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{WM_DPICHANGED, WM_NCDESTROY};

use crate::dpi::system_context;
use crate::platform::{Win32Platform, hwnd};
use crate::util::rect_to_geometry;

const WINDOW_SUBCLASS_ID: usize = 0x4d41_4450;

struct SubclassInput {
    handler: Arc<WindowHandler>,
    installed: Arc<AtomicBool>,
}

/// A [`WindowHandler`] hooked into a window's message stream.
///
/// Dropping this value, or calling [`SubclassedWindow::detach`], unhooks the handler. Both must
/// happen on the thread that created the window. When the window is destroyed first, the hook
/// removes itself and the handler simply stops receiving messages.
pub struct SubclassedWindow {
    window: WindowHandle,
    handler: Arc<WindowHandler>,
    installed: Arc<AtomicBool>,
}

impl SubclassedWindow {
    /// Attaches a handler to a live window, using the Win32 platform ports.
    ///
    /// Call [`become_dpi_aware`](crate::become_dpi_aware) before creating the window; otherwise
    /// the handler stays inert and only mirrors the system DPI.
    pub fn attach(
        window: WindowHandle,
        attributes: HandlerAttributes,
    ) -> Result<Self, AttachError> {
        let ports = PlatformPorts::from_platform(Arc::new(Win32Platform::new()));
        let handler = Arc::new(WindowHandler::attach(window, ports, system_context(), attributes)?);
        let installed = Arc::new(AtomicBool::new(true));

        let input = Box::into_raw(Box::new(SubclassInput {
            handler: handler.clone(),
            installed: installed.clone(),
        }));
        let subclass_result = unsafe {
            SetWindowSubclass(
                hwnd(window),
                Some(window_subclass_proc),
                WINDOW_SUBCLASS_ID,
                input as usize,
            )
        };
        if subclass_result == false.into() {
            drop(unsafe { Box::from_raw(input) });
            return Err(monitor_aware_core::os_error!(std::io::Error::last_os_error()).into());
        }

        tracing::debug!(?window, "subclassed window");
        Ok(Self { window, handler, installed })
    }

    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn handler(&self) -> &Arc<WindowHandler> {
        &self.handler
    }

    /// Whether the hook is still in place.
    pub fn is_attached(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    /// Unhooks the handler from the window.
    pub fn detach(self) {}
}

impl Drop for SubclassedWindow {
    fn drop(&mut self) {
        if !self.installed.load(Ordering::Acquire) {
            return;
        }

        unsafe {
            let hwnd = hwnd(self.window);
            let mut ref_data = 0;
            let found = GetWindowSubclass(
                hwnd,
                Some(window_subclass_proc),
                WINDOW_SUBCLASS_ID,
                &mut ref_data,
            );
            if found == false.into() {
                tracing::warn!(window = ?self.window, "window subclass not found");
                return;
            }

            // Fails when called from another thread; the input is leaked rather than freed while
            // the window procedure may still use it.
            if RemoveWindowSubclass(hwnd, Some(window_subclass_proc), WINDOW_SUBCLASS_ID)
                == false.into()
            {
                tracing::warn!(window = ?self.window, "failed to remove window subclass");
                return;
            }

            let input = Box::from_raw(ref_data as *mut SubclassInput);
            input.installed.store(false, Ordering::Release);
        }

        tracing::debug!(window = ?self.window, "removed window subclass");
    }
}

// Returning 0 tells the Win32 API that the message has been processed.
unsafe extern "system" fn window_subclass_proc(
    window: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _: usize,
    subclass_input_ptr: usize,
) -> LRESULT {
    let input = unsafe { &*(subclass_input_ptr as *const SubclassInput) };

    match msg {
        WM_NCDESTROY => {
            unsafe {
                RemoveWindowSubclass(window, Some(window_subclass_proc), WINDOW_SUBCLASS_ID);
                let input = Box::from_raw(subclass_input_ptr as *mut SubclassInput);
                input.installed.store(false, Ordering::Release);
            }
            unsafe { DefSubclassProc(window, msg, wparam, lparam) }
        },
        WM_DPICHANGED => {
            // The suggested rectangle is in the new DPI's physical pixels.
            let suggested = unsafe { (lparam as *const RECT).as_ref() }.map(rect_to_geometry);
            if input.handler.handle_message(msg, wparam, suggested) {
                0
            } else {
                unsafe { DefSubclassProc(window, msg, wparam, lparam) }
            }
        },
        _ => {
            input.handler.handle_message(msg, wparam, None);
            unsafe { DefSubclassProc(window, msg, wparam, lparam) }
        },
    }
}
