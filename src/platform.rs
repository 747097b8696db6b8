//! Platform backends.
//!
//! Only the module for the platform you're compiling to will be available.

#[cfg(windows_platform)]
pub mod windows;
