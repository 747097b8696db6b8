//! Common error types.
//!
//! Only attaching a handler to a window can fail from the caller's point of view. Everything that
//! goes wrong while notifications are being processed is reported as an [`OsError`] by the
//! platform ports and then logged and absorbed by the arbiter, since that code runs inside an OS
//! callback.

use std::sync::Arc;
use std::{error, fmt};

/// The OS cannot perform the operation.
///
/// Probe failures (no monitor under a rectangle, `GetDpiForMonitor` missing) and geometry write
/// failures (`SetWindowPos` refusing) are both reported through this type.
#[derive(Debug, Clone)]
pub struct OsError {
    line: u32,
    file: &'static str,
    error: Arc<dyn error::Error + Send + Sync>,
}

impl OsError {
    #[doc(hidden)]
    pub fn new(
        line: u32,
        file: &'static str,
        error: impl Into<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self { line, file, error: Arc::from(error.into()) }
    }
}

/// Create [`OsError`] with the line and file of the call site.
#[macro_export]
macro_rules! os_error {
    ($error:expr) => {{ $crate::error::OsError::new(line!(), file!(), $error) }};
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.pad(&format!("os error at {}:{}: {}", self.file, self.line, self.error))
    }
}

impl error::Error for OsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

/// A handler could not be attached to a window.
#[derive(Debug, Clone)]
pub enum AttachError {
    /// The window handle is null.
    NullHandle,
    /// The handle does not refer to a window that exists at the OS level yet.
    NotRealized,
    /// The raw window handle belongs to a platform this crate does not manage.
    UnsupportedHandle,
    /// The OS refused an operation needed to attach.
    Os(OsError),
}

impl From<OsError> for AttachError {
    fn from(value: OsError) -> Self {
        Self::Os(value)
    }
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AttachError::NullHandle => f.pad("cannot attach to a null window handle"),
            AttachError::NotRealized => f.pad("target window has not been created yet"),
            AttachError::UnsupportedHandle => f.pad("only Win32 window handles are supported"),
            AttachError::Os(e) => e.fmt(f),
        }
    }
}

impl error::Error for AttachError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            AttachError::Os(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::redundant_clone)]

    use std::error::Error;
    use std::io;

    use super::*;

    // Eat attributes for testing
    #[test]
    fn ensure_fmt_does_not_panic() {
        let os = os_error!(io::Error::other("GetWindowRect failed"));
        let _ = format!("{:?}, {}", os, os.clone());
        let _ = format!("{:?}, {}", AttachError::NotRealized, AttachError::NullHandle.clone());
        let _ = format!("{}", AttachError::UnsupportedHandle);
    }

    #[test]
    fn os_error_keeps_location_and_source() {
        let os = os_error!("no monitor");
        let message = os.to_string();
        assert!(message.starts_with("os error at "));
        assert!(message.contains("error.rs"));
        assert!(message.ends_with("no monitor"));
        assert_eq!(os.source().map(|e| e.to_string()), Some("no monitor".to_owned()));

        let attach = AttachError::from(os);
        assert!(attach.source().is_some());
        assert!(AttachError::NotRealized.source().is_none());
    }
}
