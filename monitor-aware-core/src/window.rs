//! Identification of the native window a handler is attached to.

use std::fmt;
use std::num::NonZeroIsize;

use crate::error::AttachError;

/// Opaque native window handle (an `HWND` on Windows).
///
/// The handle is never dereferenced by the core crate; it is only passed back to the platform
/// ports. Null handles cannot be represented.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(NonZeroIsize);

impl WindowHandle {
    /// Wraps a raw handle value, rejecting null.
    pub fn from_raw(raw: isize) -> Result<Self, AttachError> {
        NonZeroIsize::new(raw).map(Self).ok_or(AttachError::NullHandle)
    }

    pub const fn new(raw: NonZeroIsize) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> isize {
        self.0.get()
    }
}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowHandle({:#x})", self.0.get())
    }
}

impl TryFrom<rwh_06::RawWindowHandle> for WindowHandle {
    type Error = AttachError;

    fn try_from(handle: rwh_06::RawWindowHandle) -> Result<Self, Self::Error> {
        match handle {
            rwh_06::RawWindowHandle::Win32(handle) => Ok(Self(handle.hwnd)),
            _ => Err(AttachError::UnsupportedHandle),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroIsize;

    use super::*;

    #[test]
    fn null_handle_is_rejected() {
        assert!(matches!(WindowHandle::from_raw(0), Err(AttachError::NullHandle)));
        assert_eq!(WindowHandle::from_raw(0x1234).unwrap().into_raw(), 0x1234);
        assert_eq!(format!("{:?}", WindowHandle::from_raw(255).unwrap()), "WindowHandle(0xff)");
    }

    #[test]
    fn raw_window_handle_conversion() {
        let hwnd = NonZeroIsize::new(42).unwrap();
        let raw = rwh_06::RawWindowHandle::Win32(rwh_06::Win32WindowHandle::new(hwnd));
        assert_eq!(WindowHandle::try_from(raw).unwrap(), WindowHandle::new(hwnd));

        let raw = rwh_06::RawWindowHandle::Web(rwh_06::WebWindowHandle::new(1));
        assert!(matches!(WindowHandle::try_from(raw), Err(AttachError::UnsupportedHandle)));
    }
}
