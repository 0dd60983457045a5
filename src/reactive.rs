//! Shared mutable mappings with change notification.
//!
//! An [`Observable`] wraps a mapping that carries a revision counter. All
//! writes go through [`Observable::update`]; once the closure returns and the
//! write lock is released, every subscriber runs synchronously if the revision
//! moved. A batch of edits inside one `update` therefore notifies once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock, RwLockReadGuard};

use crate::colormaps::{Colormap, OpacityMap, TextureColormap};

/// A value with a counter that every mutation bumps.
pub trait Versioned {
    fn revision(&self) -> u64;
}

impl Versioned for Colormap {
    fn revision(&self) -> u64 {
        TextureColormap::revision(self)
    }
}

impl Versioned for OpacityMap {
    fn revision(&self) -> u64 {
        OpacityMap::revision(self)
    }
}

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_id: AtomicU64,
}

/// A shared handle to a versioned value.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

/// A non-owning handle, used by subscribers so they never keep their source alive.
pub struct WeakObservable<T> {
    inner: Weak<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T: Versioned + Send + Sync + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Apply one logical edit, then notify subscribers if anything changed.
    pub fn update<R>(&self, edit: impl FnOnce(&mut T) -> R) -> R {
        let (result, changed) = {
            let mut value = self.inner.value.write();
            let before = value.revision();
            let result = edit(&mut value);
            (result, value.revision() != before)
        };
        if changed {
            self.notify();
        }
        result
    }

    /// Run every subscriber now.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Call `listener` after every effective update until the subscription is dropped.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));

        let inner = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.listeners.lock().retain(|(other, _)| *other != id);
                }
            })),
        }
    }
}

impl<T> Observable<T> {
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.value.read()
    }

    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether both handles refer to the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl<T> WeakObservable<T> {
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.inner.upgrade().map(|inner| Observable { inner })
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter {
        value: i32,
        revision: u64,
    }

    impl Versioned for Counter {
        fn revision(&self) -> u64 {
            self.revision
        }
    }

    impl Counter {
        fn set(&mut self, value: i32) {
            if value != self.value {
                self.value = value;
                self.revision += 1;
            }
        }
    }

    fn counter() -> Observable<Counter> {
        Observable::new(Counter {
            value: 0,
            revision: 0,
        })
    }

    #[test]
    fn test_batched_update_notifies_once() {
        let observable = counter();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let _sub = observable.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        observable.update(|c| {
            c.set(1);
            c.set(2);
            c.set(3);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(observable.read().value, 3);
    }

    #[test]
    fn test_no_op_update_is_silent() {
        let observable = counter();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let _sub = observable.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        observable.update(|c| c.set(0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_can_read_value() {
        let observable = counter();
        let weak = observable.downgrade();
        let last = Arc::new(AtomicUsize::new(0));
        let out = Arc::clone(&last);
        let _sub = observable.subscribe(move || {
            if let Some(observable) = weak.upgrade() {
                out.store(observable.read().value as usize, Ordering::SeqCst);
            }
        });
        observable.update(|c| c.set(7));
        assert_eq!(last.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let observable = counter();
        let sub = observable.subscribe(|| {});
        let other = observable.subscribe(|| {});
        assert_eq!(observable.listener_count(), 2);
        drop(sub);
        assert_eq!(observable.listener_count(), 1);
        other.cancel();
        assert_eq!(observable.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_source() {
        let observable = counter();
        let sub = observable.subscribe(|| {});
        let weak = observable.downgrade();
        drop(observable);
        assert!(weak.upgrade().is_none());
        drop(sub);
    }
}
