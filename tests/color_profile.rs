use std::sync::{Arc, Mutex};

use monitor_aware::dpi::MonitorDpi;
use monitor_aware::{ColorProfileChanged, HandlerAttributes, Notification, WindowHandler};

mod common;

use common::{ScriptedPlatform, attach};

fn record_profile_changes(handler: &WindowHandler) -> Arc<Mutex<Vec<ColorProfileChanged>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    handler.on_color_profile_changed(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

fn drag(handler: &WindowHandler) {
    handler.handle_notification(&Notification::EnterSizeMove);
    handler.handle_notification(&Notification::Moved);
    handler.handle_notification(&Notification::ExitSizeMove);
}

#[test]
fn profile_change_is_reported_once_after_drag() {
    let platform = Arc::new(ScriptedPlatform::two_monitors(MonitorDpi::uniform(1.25)));
    platform.set_color_profile(Some("sRGB"));
    let handler = attach(&platform, HandlerAttributes::default());
    let events = record_profile_changes(&handler);
    assert_eq!(handler.color_profile_id(), "sRGB");

    platform.set_color_profile(Some("AdobeRGB"));
    drag(&handler);
    assert_eq!(*events.lock().unwrap(), vec![ColorProfileChanged {
        old: "sRGB".to_owned(),
        new: "AdobeRGB".to_owned(),
    }]);

    drag(&handler);
    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(handler.color_profile_id(), "AdobeRGB");
}

#[test]
fn profile_comparison_ignores_case() {
    let platform = Arc::new(ScriptedPlatform::two_monitors(MonitorDpi::uniform(1.25)));
    platform.set_color_profile(Some(r"C:\Windows\System32\spool\drivers\color\sRGB.icm"));
    let handler = attach(&platform, HandlerAttributes::default());
    let events = record_profile_changes(&handler);

    platform.set_color_profile(Some(r"c:\windows\system32\spool\drivers\color\SRGB.ICM"));
    drag(&handler);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn unresolvable_profile_keeps_last_known_value() {
    let platform = Arc::new(ScriptedPlatform::two_monitors(MonitorDpi::uniform(1.25)));
    platform.set_color_profile(Some("sRGB"));
    let handler = attach(&platform, HandlerAttributes::default());
    let events = record_profile_changes(&handler);

    platform.set_color_profile(None);
    drag(&handler);
    assert!(events.lock().unwrap().is_empty());
    assert_eq!(handler.color_profile_id(), "sRGB");
}

#[test]
fn tracking_can_be_disabled() {
    let platform = Arc::new(ScriptedPlatform::two_monitors(MonitorDpi::uniform(1.25)));
    platform.set_color_profile(Some("sRGB"));
    let handler =
        attach(&platform, HandlerAttributes::default().with_color_profile_tracking(false));
    let events = record_profile_changes(&handler);

    platform.set_color_profile(Some("AdobeRGB"));
    drag(&handler);
    assert!(events.lock().unwrap().is_empty());
    assert_eq!(platform.profile_queries(), 0);
}

#[test]
fn profile_is_rechecked_after_dpi_commit() {
    let platform = Arc::new(ScriptedPlatform::two_monitors(MonitorDpi::uniform(1.25)));
    platform.set_color_profile(Some("sRGB"));
    let handler = attach(&platform, HandlerAttributes::default());
    let events = record_profile_changes(&handler);

    handler.handle_notification(&Notification::EnterSizeMove);
    platform.move_to(2000.0, 100.0);
    handler.handle_notification(&Notification::Moved);
    handler.handle_notification(&Notification::DpiChanged {
        dpi: MonitorDpi::uniform(1.25),
        suggested: Some(platform.current_rect()),
    });
    platform.set_color_profile(Some("Display P3"));
    handler.handle_notification(&Notification::ExitSizeMove);

    assert_eq!(handler.window_dpi(), MonitorDpi::uniform(1.25));
    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(events.lock().unwrap()[0].new, "Display P3");
}
