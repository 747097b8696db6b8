//! Configuration of a window handler.

/// How a handler reacts when the window is dragged onto a monitor with a different DPI.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleMode {
    /// Do not rescale. The DPI is still tracked, but geometry and content are left to the host's
    /// default handling.
    Forbear,
    /// Rescale as soon as the moving window is actually over the new monitor.
    #[default]
    InvokeWhileMoving,
    /// Rescale once, when the drag ends.
    ResolveAfterMoved,
}

/// Attributes used when attaching a handler to a window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerAttributes {
    pub scale_mode: ScaleMode,
    pub track_color_profile: bool,
}

impl Default for HandlerAttributes {
    #[inline]
    fn default() -> HandlerAttributes {
        HandlerAttributes { scale_mode: ScaleMode::default(), track_color_profile: true }
    }
}

impl HandlerAttributes {
    /// Sets the scaling mode.
    ///
    /// The default is [`ScaleMode::InvokeWhileMoving`].
    #[inline]
    pub fn with_scale_mode(mut self, scale_mode: ScaleMode) -> Self {
        self.scale_mode = scale_mode;
        self
    }

    /// Sets whether the color profile of the monitor under the window is tracked.
    ///
    /// The default is `true`.
    #[inline]
    pub fn with_color_profile_tracking(mut self, track_color_profile: bool) -> Self {
        self.track_color_profile = track_color_profile;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let attributes = HandlerAttributes::default();
        assert_eq!(attributes.scale_mode, ScaleMode::InvokeWhileMoving);
        assert!(attributes.track_color_profile);
    }

    #[test]
    fn builder_overrides() {
        let attributes = HandlerAttributes::default()
            .with_scale_mode(ScaleMode::ResolveAfterMoved)
            .with_color_profile_tracking(false);
        assert_eq!(attributes, HandlerAttributes {
            scale_mode: ScaleMode::ResolveAfterMoved,
            track_color_profile: false,
        });
    }
}
