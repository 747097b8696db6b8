//! The set of platform collaborators a handler talks to.

use std::fmt;
use std::sync::Arc;

use crate::color_profile::ColorProfileSource;
use crate::geometry::WindowGeometryPort;
use crate::probe::DpiProbe;

/// Shared references to the DPI probe, the geometry port and the color-profile source.
#[derive(Clone)]
pub struct PlatformPorts {
    pub probe: Arc<dyn DpiProbe>,
    pub geometry: Arc<dyn WindowGeometryPort>,
    pub color_profile: Arc<dyn ColorProfileSource>,
}

impl PlatformPorts {
    pub fn new(
        probe: Arc<dyn DpiProbe>,
        geometry: Arc<dyn WindowGeometryPort>,
        color_profile: Arc<dyn ColorProfileSource>,
    ) -> Self {
        Self { probe, geometry, color_profile }
    }

    /// Uses one value for all three roles.
    pub fn from_platform<P>(platform: Arc<P>) -> Self
    where
        P: DpiProbe + WindowGeometryPort + ColorProfileSource + 'static,
    {
        Self { probe: platform.clone(), geometry: platform.clone(), color_profile: platform }
    }
}

impl fmt::Debug for PlatformPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformPorts").finish_non_exhaustive()
    }
}
