use std::io;

use dpi::{MonitorDpi, Position, Size, WindowGeometry};
use monitor_aware_core::{
    ColorProfileSource, DpiProbe, OsError, WindowGeometryPort, WindowHandle, os_error,
};
use windows_sys::Win32::Foundation::{HWND, POINT};
use windows_sys::Win32::Graphics::Gdi::{
    MONITOR_DEFAULTTONEAREST, MonitorFromPoint, MonitorFromRect, MonitorFromWindow,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    IsWindow, SET_WINDOW_POS_FLAGS, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    SetWindowPos,
};

use crate::color_profile::color_profile_path;
use crate::dpi::{monitor_dpi, system_context};
use crate::util::{geometry_to_rect, rect_to_geometry, win_to_err, window_rect};

pub(crate) fn hwnd(window: WindowHandle) -> HWND {
    window.into_raw() as HWND
}

/// The Win32 implementation of every platform port.
///
/// Stateless; one value can serve all windows of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

impl Win32Platform {
    pub fn new() -> Self {
        Win32Platform
    }

    fn set_window_pos(
        window: WindowHandle,
        geometry: WindowGeometry,
        flags: SET_WINDOW_POS_FLAGS,
    ) -> Result<(), OsError> {
        let (left, top, right, bottom) = geometry.to_edges();
        win_to_err(unsafe {
            SetWindowPos(
                hwnd(window),
                std::ptr::null_mut(),
                left,
                top,
                right - left,
                bottom - top,
                flags | SWP_NOZORDER | SWP_NOACTIVATE,
            )
        })
        .map_err(|err| os_error!(err))
    }
}

impl DpiProbe for Win32Platform {
    fn dpi_for_window(&self, window: WindowHandle) -> Result<MonitorDpi, OsError> {
        monitor_dpi(unsafe { MonitorFromWindow(hwnd(window), MONITOR_DEFAULTTONEAREST) })
    }

    fn dpi_for_rect(&self, rect: WindowGeometry) -> Result<MonitorDpi, OsError> {
        let rect = geometry_to_rect(rect);
        monitor_dpi(unsafe { MonitorFromRect(&rect, MONITOR_DEFAULTTONEAREST) })
    }

    fn dpi_for_point(&self, point: Position) -> Result<MonitorDpi, OsError> {
        let point = POINT { x: point.x.round() as i32, y: point.y.round() as i32 };
        monitor_dpi(unsafe { MonitorFromPoint(point, MONITOR_DEFAULTTONEAREST) })
    }

    fn system_dpi(&self) -> MonitorDpi {
        system_context().system_dpi
    }

    fn is_per_monitor_aware(&self) -> bool {
        system_context().per_monitor_aware
    }
}

impl WindowGeometryPort for Win32Platform {
    fn is_realized(&self, window: WindowHandle) -> bool {
        unsafe { IsWindow(hwnd(window)) != false.into() }
    }

    fn rect(&self, window: WindowHandle) -> Result<WindowGeometry, OsError> {
        window_rect(hwnd(window)).map(|rect| rect_to_geometry(&rect)).map_err(|err| os_error!(err))
    }

    fn set_position(&self, window: WindowHandle, position: Position) -> Result<(), OsError> {
        let geometry = WindowGeometry::from_parts(position, Size::default());
        Self::set_window_pos(window, geometry, SWP_NOSIZE)
    }

    fn set_size(&self, window: WindowHandle, size: Size) -> Result<(), OsError> {
        if size.is_empty() {
            return Err(os_error!(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to resize window to {size:?}")
            )));
        }
        let geometry = WindowGeometry::from_parts(Position::default(), size);
        Self::set_window_pos(window, geometry, SWP_NOMOVE)
    }
}

impl ColorProfileSource for Win32Platform {
    fn color_profile_id(&self, window: WindowHandle) -> Option<String> {
        color_profile_path(hwnd(window))
    }
}
