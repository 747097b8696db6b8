//! Events raised by a window handler, and the subscriber lists that deliver them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dpi::{MonitorDpi, ScaleFactor};

use crate::lock;

/// The DPI the window's content is rendered at has changed.
///
/// This fires when a change is *committed*, which can be later than the moment the monitor under
/// the window changed (see [`crate::arbiter`]). By the time it fires the window has already been
/// moved and resized for the new DPI.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DpiChanged {
    pub old_dpi: MonitorDpi,
    pub new_dpi: MonitorDpi,
    /// The factor to apply to the content, relative to the DPI at attach time.
    pub scale_factor: ScaleFactor,
}

/// The color profile of the monitor under the window has changed.
///
/// Only raised once an interactive move or resize has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorProfileChanged {
    pub old: String,
    pub new: String,
}

/// Window chrome notifications, raised by [`crate::tap::ChromeEventTap`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChromeEvent {
    ActivationChanged(bool),
    ColorizationChanged,
}

/// Identifies a subscription so it can be removed again.
///
/// Ids are unique within the process, across all [`Observers`] lists.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A list of callbacks for one kind of event.
///
/// Callbacks run on the thread that emits, after the internal lock has been released, so a
/// callback may subscribe, unsubscribe, or feed further notifications into the handler.
pub struct Observers<E> {
    callbacks: Mutex<Vec<(SubscriptionId, Callback<E>)>>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self { callbacks: Mutex::new(Vec::new()) }
    }

    pub fn subscribe(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        lock(&self.callbacks).push((id, Arc::new(callback)));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = lock(&self.callbacks);
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        lock(&self.callbacks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn emit(&self, event: &E) {
        let callbacks: Vec<Callback<E>> =
            lock(&self.callbacks).iter().map(|(_, callback)| callback.clone()).collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("len", &self.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn emit_reaches_every_subscriber() {
        let observers = Observers::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let total = total.clone();
            observers.subscribe(move |value| {
                total.fetch_add(*value as usize, Ordering::SeqCst);
            });
        }

        observers.emit(&2);
        assert_eq!(total.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let observers = Observers::<()>::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let id = {
            let calls = calls.clone();
            observers.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        assert!(observers.is_empty());
        observers.emit(&());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn ids_are_unique_across_lists() {
        let first = Observers::<()>::new();
        let second = Observers::<u8>::new();
        let a = first.subscribe(|_| {});
        let b = second.subscribe(|_| {});
        assert_ne!(a, b);
        assert!(!second.unsubscribe(a));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn callback_may_subscribe_while_emitting() {
        let observers = Arc::new(Observers::<()>::new());
        let inner = observers.clone();
        observers.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        observers.emit(&());
        assert_eq!(observers.len(), 2);
    }
}
