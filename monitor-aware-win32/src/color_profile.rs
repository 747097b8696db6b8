use std::{mem, ptr};

use windows_sys::Win32::Foundation::{ERROR_INSUFFICIENT_BUFFER, GetLastError, HWND, MAX_PATH};
use windows_sys::Win32::Graphics::Gdi::{
    CreateDCW, DeleteDC, GetMonitorInfoW, MONITORINFO, MONITORINFOEXW, MONITOR_DEFAULTTONEAREST,
    MonitorFromWindow,
};
use windows_sys::Win32::UI::ColorSystem::GetICMProfileW;

use crate::util::decode_wide;

// Long paths are possible, but nothing beyond this is a sane profile path.
const MAX_PROFILE_PATH: u32 = 32 * 1024;

/// The path of the ICC profile assigned to the monitor the window mostly overlaps.
pub(crate) fn color_profile_path(hwnd: HWND) -> Option<String> {
    unsafe {
        let hmonitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
        if hmonitor.is_null() {
            return None;
        }

        let mut info: MONITORINFOEXW = mem::zeroed();
        info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
        if GetMonitorInfoW(hmonitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO)
            == false.into()
        {
            tracing::warn!("`GetMonitorInfoW` failed: {}", std::io::Error::last_os_error());
            return None;
        }

        let device = info.szDevice.as_ptr();
        let hdc = CreateDCW(device, device, ptr::null(), ptr::null());
        if hdc.is_null() {
            tracing::warn!("`CreateDCW` failed for monitor {}", decode_wide(&info.szDevice));
            return None;
        }

        let mut len = MAX_PATH;
        let path = loop {
            let mut buffer = vec![0u16; len as usize];
            if GetICMProfileW(hdc, &mut len, buffer.as_mut_ptr()) != false.into() {
                break Some(decode_wide(&buffer));
            }

            // On a short buffer `len` now holds the required size.
            if GetLastError() != ERROR_INSUFFICIENT_BUFFER
                || len as usize <= buffer.len()
                || len > MAX_PROFILE_PATH
            {
                break None;
            }
        };

        DeleteDC(hdc);
        path
    }
}
