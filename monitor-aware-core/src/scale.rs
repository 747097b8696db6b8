//! Computing how far window content must be scaled.

use dpi::{MonitorDpi, ScaleFactor, Size};

/// The scale factor for content laid out at `initial_dpi` and now rendered at `window_dpi`.
///
/// Returns exactly [`ScaleFactor::IDENTITY`] when the two are equal, so that callers can switch
/// to an identity transform instead of a computed one.
pub fn scale_factor(initial_dpi: MonitorDpi, window_dpi: MonitorDpi) -> ScaleFactor {
    if window_dpi == initial_dpi {
        return ScaleFactor::IDENTITY;
    }
    ScaleFactor::between(initial_dpi, window_dpi)
}

/// The size a window should take at `new_dpi` given its size at `old_dpi`.
pub fn target_size(size: Size, old_dpi: MonitorDpi, new_dpi: MonitorDpi) -> Size {
    size.rescale(old_dpi, new_dpi)
}
