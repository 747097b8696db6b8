#![allow(non_snake_case)]

use std::ptr;
use std::sync::{Once, OnceLock};

use dpi::{BASE_DPI, MonitorDpi};
use monitor_aware_core::{OsError, SystemContext};
use windows_sys::Win32::Foundation::S_OK;
use windows_sys::Win32::Graphics::Gdi::{
    GetDC, GetDeviceCaps, HMONITOR, LOGPIXELSX, LOGPIXELSY, ReleaseDC,
};
use windows_sys::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    DPI_AWARENESS_PER_MONITOR_AWARE, MDT_EFFECTIVE_DPI, PROCESS_PER_MONITOR_DPI_AWARE,
};

use crate::util::{
    GET_AWARENESS_FROM_DPI_AWARENESS_CONTEXT, GET_DPI_FOR_MONITOR, GET_PROCESS_DPI_AWARENESS,
    GET_THREAD_DPI_AWARENESS_CONTEXT, SET_PROCESS_DPI_AWARE, SET_PROCESS_DPI_AWARENESS,
    SET_PROCESS_DPI_AWARENESS_CONTEXT,
};

/// Opts the process into the highest DPI awareness the OS offers.
///
/// Must run before the first window is created. Has no effect if the awareness was already set,
/// for example through the application manifest.
pub fn become_dpi_aware() {
    static ENABLE_DPI_AWARENESS: Once = Once::new();
    ENABLE_DPI_AWARENESS.call_once(|| {
        unsafe {
            if let Some(SetProcessDpiAwarenessContext) = *SET_PROCESS_DPI_AWARENESS_CONTEXT {
                // We are on Windows 10 Anniversary Update (1607) or later.
                if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2)
                    == false.into()
                {
                    // V2 only works with Windows 10 Creators Update (1703). Try using the older
                    // V1 if we can't set V2.
                    SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE);
                }
            } else if let Some(SetProcessDpiAwareness) = *SET_PROCESS_DPI_AWARENESS {
                // We are on Windows 8.1 or later.
                SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE);
            } else if let Some(SetProcessDPIAware) = *SET_PROCESS_DPI_AWARE {
                // We are on Vista or later. Per-monitor DPI does not exist here.
                SetProcessDPIAware();
            }
        }
    });
}

/// Whether the calling thread receives `WM_DPICHANGED`.
pub fn is_per_monitor_aware() -> bool {
    unsafe {
        if let (Some(GetThreadDpiAwarenessContext), Some(GetAwarenessFromDpiAwarenessContext)) =
            (*GET_THREAD_DPI_AWARENESS_CONTEXT, *GET_AWARENESS_FROM_DPI_AWARENESS_CONTEXT)
        {
            // V2 also reports `DPI_AWARENESS_PER_MONITOR_AWARE`.
            GetAwarenessFromDpiAwarenessContext(GetThreadDpiAwarenessContext())
                == DPI_AWARENESS_PER_MONITOR_AWARE
        } else if let Some(GetProcessDpiAwareness) = *GET_PROCESS_DPI_AWARENESS {
            let mut awareness = 0;
            GetProcessDpiAwareness(ptr::null_mut(), &mut awareness) == S_OK
                && awareness == PROCESS_PER_MONITOR_DPI_AWARE
        } else {
            false
        }
    }
}

/// The effective DPI of a monitor.
pub(crate) fn monitor_dpi(hmonitor: HMONITOR) -> Result<MonitorDpi, OsError> {
    if hmonitor.is_null() {
        return Err(monitor_aware_core::os_error!("no monitor found"));
    }

    let Some(GetDpiForMonitor) = *GET_DPI_FOR_MONITOR else {
        return Err(monitor_aware_core::os_error!("GetDpiForMonitor is not available"));
    };

    let mut dpi_x = 0;
    let mut dpi_y = 0;
    let result = unsafe { GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) };
    if result != S_OK {
        return Err(monitor_aware_core::os_error!(format!(
            "GetDpiForMonitor failed with {result:#x}"
        )));
    }

    MonitorDpi::from_dpi(dpi_x, dpi_y)
        .ok_or_else(|| monitor_aware_core::os_error!("GetDpiForMonitor returned a zero DPI"))
}

/// The system DPI, read from the screen device context.
pub fn system_dpi() -> MonitorDpi {
    unsafe {
        let hdc = GetDC(ptr::null_mut());
        if hdc.is_null() {
            tracing::warn!("`GetDC` returned null, assuming {BASE_DPI} DPI");
            return MonitorDpi::IDENTITY;
        }

        let dpi_x = GetDeviceCaps(hdc, LOGPIXELSX as _);
        let dpi_y = GetDeviceCaps(hdc, LOGPIXELSY as _);
        ReleaseDC(ptr::null_mut(), hdc);

        MonitorDpi::from_dpi(dpi_x.max(0) as u32, dpi_y.max(0) as u32)
            .unwrap_or(MonitorDpi::IDENTITY)
    }
}

/// The process-wide DPI facts.
///
/// Resolved on first use and never refreshed: the system DPI only changes across a sign-out.
/// Call [`become_dpi_aware`] before this, or the process will be seen as DPI unaware.
pub fn system_context() -> &'static SystemContext {
    static CONTEXT: OnceLock<SystemContext> = OnceLock::new();
    CONTEXT.get_or_init(|| {
        let context = SystemContext::new(system_dpi(), is_per_monitor_aware());
        tracing::debug!(
            system_dpi = context.system_dpi.pixels_per_inch_x(),
            per_monitor_aware = context.per_monitor_aware,
            "resolved system DPI context"
        );
        context
    })
}
