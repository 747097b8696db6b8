#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

use monitor_aware::dpi::{MonitorDpi, Position, Size, WindowGeometry};
use monitor_aware::{
    ColorProfileSource, DpiChanged, DpiProbe, HandlerAttributes, OsError, PlatformPorts,
    SystemContext, WindowGeometryPort, WindowHandle, WindowHandler, os_error,
};

pub const WINDOW: isize = 0x00c0_ffee;

pub fn window() -> WindowHandle {
    WindowHandle::from_raw(WINDOW).unwrap()
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GeometryWrite {
    Position(Position),
    Size(Size),
}

type Hook = Arc<dyn Fn() + Send + Sync>;

/// A desktop of side-by-side monitors and one window on it.
///
/// Each monitor spans from its left edge to the next monitor's left edge. Rectangles resolve to
/// the monitor containing their center.
pub struct ScriptedPlatform {
    monitors: Vec<(f64, MonitorDpi)>,
    system_dpi: MonitorDpi,
    per_monitor_aware: bool,
    realized: AtomicBool,
    rect: Mutex<WindowGeometry>,
    fail_rect: AtomicBool,
    fail_probe: AtomicBool,
    fail_writes: AtomicBool,
    writes: Mutex<Vec<GeometryWrite>>,
    writing: AtomicBool,
    write_delay: Mutex<Option<Duration>>,
    after_write: Mutex<Option<Hook>>,
    color_profile: Mutex<Option<String>>,
    profile_queries: AtomicUsize,
}

impl ScriptedPlatform {
    /// Two 1920 pixel wide monitors: the left one at 96 DPI, the right one at `right`.
    pub fn two_monitors(right: MonitorDpi) -> Self {
        Self::with_monitors(&[(0.0, MonitorDpi::IDENTITY), (1920.0, right)])
    }

    pub fn with_monitors(monitors: &[(f64, MonitorDpi)]) -> Self {
        Self {
            monitors: monitors.to_vec(),
            system_dpi: MonitorDpi::IDENTITY,
            per_monitor_aware: true,
            realized: AtomicBool::new(true),
            rect: Mutex::new(WindowGeometry::new(100.0, 100.0, 800.0, 600.0)),
            fail_rect: AtomicBool::new(false),
            fail_probe: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes: Mutex::new(Vec::new()),
            writing: AtomicBool::new(false),
            write_delay: Mutex::new(None),
            after_write: Mutex::new(None),
            color_profile: Mutex::new(None),
            profile_queries: AtomicUsize::new(0),
        }
    }

    pub fn unaware(mut self) -> Self {
        self.per_monitor_aware = false;
        self
    }

    pub fn context(&self) -> SystemContext {
        SystemContext::detect(self)
    }

    pub fn dpi_at(&self, x: f64) -> MonitorDpi {
        self.monitors
            .iter()
            .rev()
            .find(|(left, _)| x >= *left)
            .or(self.monitors.first())
            .map(|(_, dpi)| *dpi)
            .unwrap()
    }

    pub fn set_rect(&self, rect: WindowGeometry) {
        *self.rect.lock().unwrap() = rect;
    }

    pub fn move_to(&self, x: f64, y: f64) {
        let mut rect = self.rect.lock().unwrap();
        *rect = rect.with_position(Position::new(x, y));
    }

    pub fn current_rect(&self) -> WindowGeometry {
        *self.rect.lock().unwrap()
    }

    pub fn set_realized(&self, realized: bool) {
        self.realized.store(realized, Ordering::SeqCst);
    }

    pub fn fail_rect(&self, fail: bool) {
        self.fail_rect.store(fail, Ordering::SeqCst);
    }

    /// Makes rectangle DPI lookups fail, like `MonitorFromRect` on an unreachable monitor.
    pub fn fail_probe(&self, fail: bool) {
        self.fail_probe.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }

    /// Runs `hook` after every successful size write, like the OS sending messages from inside
    /// `SetWindowPos`.
    pub fn after_write(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.after_write.lock().unwrap() = Some(Arc::new(hook));
    }

    pub fn writes(&self) -> Vec<GeometryWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn set_color_profile(&self, id: Option<&str>) {
        *self.color_profile.lock().unwrap() = id.map(str::to_owned);
    }

    pub fn profile_queries(&self) -> usize {
        self.profile_queries.load(Ordering::SeqCst)
    }

    fn write(&self, write: GeometryWrite) -> Result<(), OsError> {
        assert!(!self.writing.swap(true, Ordering::SeqCst), "concurrent geometry writes");

        if let Some(delay) = *self.write_delay.lock().unwrap() {
            thread::sleep(delay);
        }

        let result = if self.fail_writes.load(Ordering::SeqCst) {
            Err(os_error!("SetWindowPos failed"))
        } else {
            let mut rect = self.rect.lock().unwrap();
            *rect = match write {
                GeometryWrite::Position(position) => rect.with_position(position),
                GeometryWrite::Size(size) => rect.with_size(size),
            };
            self.writes.lock().unwrap().push(write);
            Ok(())
        };

        self.writing.store(false, Ordering::SeqCst);

        if result.is_ok() && matches!(write, GeometryWrite::Size(_)) {
            let hook = self.after_write.lock().unwrap().clone();
            if let Some(hook) = hook {
                hook();
            }
        }

        result
    }
}

impl DpiProbe for ScriptedPlatform {
    fn dpi_for_window(&self, _: WindowHandle) -> Result<MonitorDpi, OsError> {
        Ok(self.dpi_at(self.current_rect().center().x))
    }

    fn dpi_for_rect(&self, rect: WindowGeometry) -> Result<MonitorDpi, OsError> {
        if self.fail_probe.load(Ordering::SeqCst) {
            return Err(os_error!("MonitorFromRect failed"));
        }
        Ok(self.dpi_at(rect.center().x))
    }

    fn dpi_for_point(&self, point: Position) -> Result<MonitorDpi, OsError> {
        Ok(self.dpi_at(point.x))
    }

    fn system_dpi(&self) -> MonitorDpi {
        self.system_dpi
    }

    fn is_per_monitor_aware(&self) -> bool {
        self.per_monitor_aware
    }
}

impl WindowGeometryPort for ScriptedPlatform {
    fn is_realized(&self, _: WindowHandle) -> bool {
        self.realized.load(Ordering::SeqCst)
    }

    fn rect(&self, _: WindowHandle) -> Result<WindowGeometry, OsError> {
        if self.fail_rect.load(Ordering::SeqCst) {
            return Err(os_error!("GetWindowRect failed"));
        }
        Ok(self.current_rect())
    }

    fn set_position(&self, _: WindowHandle, position: Position) -> Result<(), OsError> {
        self.write(GeometryWrite::Position(position))
    }

    fn set_size(&self, _: WindowHandle, size: Size) -> Result<(), OsError> {
        self.write(GeometryWrite::Size(size))
    }
}

impl ColorProfileSource for ScriptedPlatform {
    fn color_profile_id(&self, _: WindowHandle) -> Option<String> {
        self.profile_queries.fetch_add(1, Ordering::SeqCst);
        self.color_profile.lock().unwrap().clone()
    }
}

pub fn attach(
    platform: &Arc<ScriptedPlatform>,
    attributes: HandlerAttributes,
) -> Arc<WindowHandler> {
    init_logging();
    let ports = PlatformPorts::from_platform(platform.clone());
    Arc::new(WindowHandler::attach(window(), ports, &platform.context(), attributes).unwrap())
}

/// Records every committed DPI change.
pub fn record_dpi_changes(handler: &WindowHandler) -> Arc<Mutex<Vec<DpiChanged>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    handler.on_dpi_changed(move |event| sink.lock().unwrap().push(*event));
    events
}

pub fn weak(handler: &Arc<WindowHandler>) -> Weak<WindowHandler> {
    Arc::downgrade(handler)
}
