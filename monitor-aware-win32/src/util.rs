use std::ffi::c_void;
use std::sync::LazyLock;
use std::{io, mem};

use dpi::WindowGeometry;
use windows_sys::Win32::Foundation::{BOOL, HANDLE, HWND, RECT};
use windows_sys::Win32::Graphics::Gdi::HMONITOR;
use windows_sys::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryA};
use windows_sys::Win32::UI::HiDpi::{
    DPI_AWARENESS, DPI_AWARENESS_CONTEXT, MONITOR_DPI_TYPE, PROCESS_DPI_AWARENESS,
};
use windows_sys::Win32::UI::WindowsAndMessaging::GetWindowRect;
use windows_sys::core::HRESULT;

pub(crate) fn win_to_err(result: BOOL) -> Result<(), io::Error> {
    if result != false.into() { Ok(()) } else { Err(io::Error::last_os_error()) }
}

/// The outer rectangle of a window, in physical pixels.
pub(crate) fn window_rect(hwnd: HWND) -> Result<RECT, io::Error> {
    let mut rect = unsafe { mem::zeroed() };
    win_to_err(unsafe { GetWindowRect(hwnd, &mut rect) })?;
    Ok(rect)
}

pub(crate) fn rect_to_geometry(rect: &RECT) -> WindowGeometry {
    WindowGeometry::from_edges(rect.left, rect.top, rect.right, rect.bottom)
}

pub(crate) fn geometry_to_rect(geometry: WindowGeometry) -> RECT {
    let (left, top, right, bottom) = geometry.to_edges();
    RECT { left, top, right, bottom }
}

/// Decodes a nul-terminated UTF-16 buffer, dropping everything after the first nul.
pub(crate) fn decode_wide(mut wide_c_string: &[u16]) -> String {
    if let Some(null_pos) = wide_c_string.iter().position(|c| *c == 0) {
        wide_c_string = &wide_c_string[..null_pos];
    }

    String::from_utf16_lossy(wide_c_string)
}

// Helper function to dynamically load function pointer as some functions
// may not be available on all Windows versions we support.
//
// `library` and `function` must be zero-terminated.
pub(super) fn get_function_impl(library: &str, function: &str) -> Option<*const c_void> {
    assert_eq!(library.chars().last(), Some('\0'));
    assert_eq!(function.chars().last(), Some('\0'));

    // Library names we will use are ASCII so we can use the A version to avoid string conversion.
    let module = unsafe { LoadLibraryA(library.as_ptr()) };
    if module.is_null() {
        return None;
    }

    unsafe { GetProcAddress(module, function.as_ptr()) }.map(|function_ptr| function_ptr as _)
}

macro_rules! get_function {
    ($lib:expr, $func:ident) => {
        crate::util::get_function_impl(concat!($lib, '\0'), concat!(stringify!($func), '\0'))
            .map(|f| unsafe { std::mem::transmute::<*const _, $func>(f) })
    };
}

pub type SetProcessDPIAware = unsafe extern "system" fn() -> BOOL;
pub type SetProcessDpiAwareness =
    unsafe extern "system" fn(value: PROCESS_DPI_AWARENESS) -> HRESULT;
pub type SetProcessDpiAwarenessContext =
    unsafe extern "system" fn(value: DPI_AWARENESS_CONTEXT) -> BOOL;
pub type GetProcessDpiAwareness =
    unsafe extern "system" fn(process: HANDLE, value: *mut PROCESS_DPI_AWARENESS) -> HRESULT;
pub type GetThreadDpiAwarenessContext = unsafe extern "system" fn() -> DPI_AWARENESS_CONTEXT;
pub type GetAwarenessFromDpiAwarenessContext =
    unsafe extern "system" fn(value: DPI_AWARENESS_CONTEXT) -> DPI_AWARENESS;
pub type GetDpiForMonitor = unsafe extern "system" fn(
    hmonitor: HMONITOR,
    dpi_type: MONITOR_DPI_TYPE,
    dpi_x: *mut u32,
    dpi_y: *mut u32,
) -> HRESULT;

pub(crate) static GET_DPI_FOR_MONITOR: LazyLock<Option<GetDpiForMonitor>> =
    LazyLock::new(|| get_function!("shcore.dll", GetDpiForMonitor));
pub(crate) static GET_PROCESS_DPI_AWARENESS: LazyLock<Option<GetProcessDpiAwareness>> =
    LazyLock::new(|| get_function!("shcore.dll", GetProcessDpiAwareness));
pub(crate) static GET_THREAD_DPI_AWARENESS_CONTEXT: LazyLock<
    Option<GetThreadDpiAwarenessContext>,
> = LazyLock::new(|| get_function!("user32.dll", GetThreadDpiAwarenessContext));
pub(crate) static GET_AWARENESS_FROM_DPI_AWARENESS_CONTEXT: LazyLock<
    Option<GetAwarenessFromDpiAwarenessContext>,
> = LazyLock::new(|| get_function!("user32.dll", GetAwarenessFromDpiAwarenessContext));
pub(crate) static SET_PROCESS_DPI_AWARENESS_CONTEXT: LazyLock<
    Option<SetProcessDpiAwarenessContext>,
> = LazyLock::new(|| get_function!("user32.dll", SetProcessDpiAwarenessContext));
pub(crate) static SET_PROCESS_DPI_AWARENESS: LazyLock<Option<SetProcessDpiAwareness>> =
    LazyLock::new(|| get_function!("shcore.dll", SetProcessDpiAwareness));
pub(crate) static SET_PROCESS_DPI_AWARE: LazyLock<Option<SetProcessDPIAware>> =
    LazyLock::new(|| get_function!("user32.dll", SetProcessDPIAware));
