//! Extra observers of the notification stream.
//!
//! A tap sees every notification a [`WindowHandler`](crate::WindowHandler) receives, before the
//! arbiter does, and cannot influence how it is handled.

use crate::event::{ChromeEvent, Observers};
use crate::notification::Notification;
use crate::window::WindowHandle;

pub trait NotificationTap: Send + Sync {
    fn notify(&self, window: WindowHandle, notification: &Notification);
}

/// Raises [`ChromeEvent`]s for window activation and DWM colorization changes.
#[derive(Debug, Default)]
pub struct ChromeEventTap {
    events: Observers<ChromeEvent>,
}

impl ChromeEventTap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &Observers<ChromeEvent> {
        &self.events
    }
}

impl NotificationTap for ChromeEventTap {
    fn notify(&self, window: WindowHandle, notification: &Notification) {
        let event = match *notification {
            Notification::Activated(active) => ChromeEvent::ActivationChanged(active),
            Notification::ColorizationChanged => ChromeEvent::ColorizationChanged,
            _ => return,
        };

        tracing::trace!(?window, ?event, "chrome event");
        self.events.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::notification::ResizeKind;

    #[test]
    fn maps_chrome_notifications() {
        let tap = ChromeEventTap::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = seen.clone();
            tap.events().subscribe(move |event| seen.lock().unwrap().push(*event));
        }

        let window = WindowHandle::from_raw(0x10).unwrap();
        tap.notify(window, &Notification::Activated(true));
        tap.notify(window, &Notification::Resized(ResizeKind::Restored));
        tap.notify(window, &Notification::ColorizationChanged);
        tap.notify(window, &Notification::Activated(false));

        assert_eq!(*seen.lock().unwrap(), vec![
            ChromeEvent::ActivationChanged(true),
            ChromeEvent::ColorizationChanged,
            ChromeEvent::ActivationChanged(false),
        ]);
    }
}
