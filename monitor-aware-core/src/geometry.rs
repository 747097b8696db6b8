//! Reading and writing a window's outer rectangle.

use dpi::{Position, Size, WindowGeometry};

use crate::error::OsError;
use crate::window::WindowHandle;

/// Gets and sets a window's screen rectangle.
///
/// Setting the rectangle synchronously generates `WM_MOVE`/`WM_SIZE` on Windows, so
/// implementations may re-enter the handler before they return.
pub trait WindowGeometryPort: Send + Sync {
    /// Whether the handle refers to a window that exists at the OS level.
    fn is_realized(&self, window: WindowHandle) -> bool;

    fn rect(&self, window: WindowHandle) -> Result<WindowGeometry, OsError>;

    /// Moves the window without resizing it.
    fn set_position(&self, window: WindowHandle, position: Position) -> Result<(), OsError>;

    /// Resizes the window without moving it.
    fn set_size(&self, window: WindowHandle, size: Size) -> Result<(), OsError>;
}
