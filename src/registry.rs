//! Per-observable observer registry and the notification protocol.
//!
//! A [`Registry`] is bound to one observable through a [`Weak`] reference and
//! keeps an ordered list of [`Observer`] registrations. The observable brackets
//! every mutation of a property with [`Registry::will_change`] and
//! [`Registry::did_change`]; the registry captures old and new values and calls
//! each matching observer back, in registration order.
//!
//! # Examples
//!
//! ```
//! use kvo_registry::{Observer, ObservingOptions, Registry};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct Object {
//!     value: Cell<i32>,
//! }
//!
//! let object = Rc::new(Object { value: Cell::new(0) });
//! let registry = Registry::for_observable(&object);
//!
//! let seen = Rc::new(Cell::new(None));
//! let sink = Rc::clone(&seen);
//! let observer = Observer::new(
//!     "value",
//!     ObservingOptions::NEW,
//!     (),
//!     |o: &Object| o.value.get(),
//!     move |_o, _old, new, _key, _ctx| sink.set(new.copied()),
//! );
//! registry.add_observer(&observer);
//!
//! registry.will_change("value")?;
//! object.value.set(2);
//! registry.did_change("value")?;
//!
//! assert_eq!(seen.get(), Some(2));
//! # Ok::<(), kvo_registry::KvoError>(())
//! ```
//!
//! # Thread safety
//!
//! The registry is built on `Rc` and `RefCell` and is therefore neither `Send`
//! nor `Sync`. Callers that need cross-thread notifications must serialize
//! access themselves.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{KvoError, KvoEvent, Observer};

/// Type alias for the user-supplied trace callback.
///
/// The callback receives every [`KvoEvent`] the registry emits.
pub type TraceCallback = dyn Fn(&KvoEvent<'_>);

/// The set of observers registered against one observable.
///
/// Entries are kept in insertion order. Adding the same observer twice creates
/// two independent entries; [`Registry::remove_observer`] removes all of them.
/// Dropping the registry releases every remaining entry.
pub struct Registry<O, V, C = ()> {
    observable: Weak<O>,
    observers: RefCell<Vec<Rc<Observer<O, V, C>>>>,
    trace: RefCell<Option<Rc<TraceCallback>>>,
    // Keys whose getters or callbacks are currently running, innermost last.
    dispatching: RefCell<Vec<Box<str>>>,
}

/// Marks a key as being dispatched until dropped.
struct DispatchGuard<'a> {
    dispatching: &'a RefCell<Vec<Box<str>>>,
}

impl<'a> DispatchGuard<'a> {
    /// # Panics
    ///
    /// Panics if `key` is already being dispatched.
    fn enter(dispatching: &'a RefCell<Vec<Box<str>>>, key: &str) -> Self {
        let reentered = dispatching.borrow().iter().any(|k| **k == *key);
        if reentered {
            panic!("re-entrant notification for key `{key}` during its own dispatch");
        }
        dispatching.borrow_mut().push(key.into());
        Self { dispatching }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.dispatching.borrow_mut().pop();
    }
}

impl<O, V, C> Registry<O, V, C> {
    /// Creates an empty registry bound to `observable`.
    ///
    /// Takes a [`Weak`] so an observable can embed its own registry, typically
    /// through [`Rc::new_cyclic`].
    pub fn new(observable: Weak<O>) -> Self {
        Self {
            observable,
            observers: RefCell::new(Vec::new()),
            trace: RefCell::new(None),
            dispatching: RefCell::new(Vec::new()),
        }
    }

    /// Creates an empty registry bound to an observable that is already
    /// reference counted.
    pub fn for_observable(observable: &Rc<O>) -> Self {
        Self::new(Rc::downgrade(observable))
    }

    /// The bound observable, if it is still alive.
    pub fn observable(&self) -> Option<Rc<O>> {
        self.observable.upgrade()
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Sets a tracing callback invoked for every registry operation.
    ///
    /// Replaces any previously set callback.
    pub fn set_trace_callback(&self, callback: impl Fn(&KvoEvent<'_>) + 'static) {
        *self.trace.borrow_mut() = Some(Rc::new(callback));
    }

    /// Clears the tracing callback. Logging through `tracing` is unaffected.
    pub fn clear_trace_callback(&self) {
        *self.trace.borrow_mut() = None;
    }

    fn emit_event(&self, event: &KvoEvent<'_>) {
        tracing::trace!(target: "kvo_registry", "{event}");

        // Clone out so the callback may replace itself.
        let callback = self.trace.borrow().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Registrations
    // ---------------------------------------------------------------------------------------------

    /// Appends a registration for `observer` at the tail of the list.
    ///
    /// The registry takes its own strong reference. Registering the same
    /// observer again adds an independent entry.
    pub fn add_observer(&self, observer: &Rc<Observer<O, V, C>>) {
        let registrations = {
            let mut observers = self.observers.borrow_mut();
            observers.push(Rc::clone(observer));
            observers.len()
        };

        self.emit_event(&KvoEvent::AddObserver {
            key: observer.key(),
            registrations,
        });
    }

    /// Removes every registration of `observer`, matched by identity.
    ///
    /// Returns how many entries were removed. An observer that is not
    /// registered is ignored.
    pub fn remove_observer(&self, observer: &Rc<Observer<O, V, C>>) -> usize {
        // Dropped after the borrow ends so observer destructors never run
        // while the list is mutably borrowed.
        let removed = {
            let mut observers = self.observers.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) = observers
                .drain(..)
                .partition(|entry| Rc::ptr_eq(entry, observer));
            *observers = kept;
            removed
        };

        self.emit_event(&KvoEvent::RemoveObserver {
            key: observer.key(),
            removed: removed.len(),
        });

        removed.len()
    }

    /// Removes every registration and returns how many references were released.
    pub fn remove_all_observers(&self) -> usize {
        let released = std::mem::take(&mut *self.observers.borrow_mut());
        let count = released.len();
        drop(released);

        tracing::debug!(target: "kvo_registry", released = count, "registry torn down");
        self.emit_event(&KvoEvent::Teardown { released: count });

        count
    }

    /// Whether `observer` has at least one registration.
    pub fn contains_observer(&self, observer: &Rc<Observer<O, V, C>>) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|entry| Rc::ptr_eq(entry, observer))
    }

    /// Number of registrations, counting duplicates.
    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }

    // ---------------------------------------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------------------------------------

    /// Snapshot of the registrations watching `key`, in registration order.
    fn matching(&self, key: &str) -> Vec<Rc<Observer<O, V, C>>> {
        self.observers
            .borrow()
            .iter()
            .filter(|entry| entry.matches(key))
            .cloned()
            .collect()
    }

    fn upgrade_for(&self, key: &str) -> Result<Rc<O>, KvoError> {
        self.observable.upgrade().ok_or_else(|| {
            tracing::warn!(target: "kvo_registry", key, "observable released before notification");
            KvoError::ObservableReleased {
                key: key.to_string(),
            }
        })
    }

    /// Announces that the property `key` is about to change.
    ///
    /// Every matching observer created with `OLD` reads and caches the current
    /// value. Keys with no matching observer are ignored.
    ///
    /// Registrations added or removed by a getter take effect from the next
    /// notification.
    ///
    /// # Errors
    ///
    /// [`KvoError::ObservableReleased`] if matching observers exist but the
    /// observable has been dropped. No getter runs in that case.
    ///
    /// # Panics
    ///
    /// Panics if called for a key whose getters or callbacks are already
    /// running on this registry (from inside that dispatch). Other keys may be
    /// notified re-entrantly.
    pub fn will_change(&self, key: &str) -> Result<(), KvoError> {
        let matching = self.matching(key);
        let mut captured = 0;

        if !matching.is_empty() {
            let observable = self.upgrade_for(key)?;
            let _guard = DispatchGuard::enter(&self.dispatching, key);
            for observer in &matching {
                if observer.capture_old(&observable) {
                    captured += 1;
                }
            }
        }

        self.emit_event(&KvoEvent::WillChange { key, captured });
        Ok(())
    }

    /// Announces that the property `key` has changed.
    ///
    /// Every matching observer created with `NEW` reads and caches the current
    /// value; then each matching observer is called back exactly once, in
    /// registration order. Unrequested values are delivered as `None`.
    ///
    /// A `did_change` without a preceding `will_change` delivers whatever old
    /// value was cached last (or `None` if none was ever captured).
    ///
    /// Callbacks may add or remove registrations; the change applies from the
    /// next notification.
    ///
    /// # Errors
    ///
    /// [`KvoError::ObservableReleased`] if matching observers exist but the
    /// observable has been dropped. No callback runs in that case.
    ///
    /// # Panics
    ///
    /// Panics if called for a key whose getters or callbacks are already
    /// running on this registry (from inside that dispatch), whatever the
    /// observers' options. Other keys may be notified re-entrantly.
    pub fn did_change(&self, key: &str) -> Result<(), KvoError> {
        let matching = self.matching(key);

        if !matching.is_empty() {
            let observable = self.upgrade_for(key)?;
            let _guard = DispatchGuard::enter(&self.dispatching, key);
            for observer in &matching {
                observer.deliver(&observable);
            }
        }

        self.emit_event(&KvoEvent::DidChange {
            key,
            notified: matching.len(),
        });
        Ok(())
    }

    /// Brackets `mutate` with [`will_change`](Self::will_change) and
    /// [`did_change`](Self::did_change) for `key`, returning its result.
    ///
    /// `mutate` does not run if `will_change` fails.
    pub fn change_value_for_key<R>(
        &self,
        key: &str,
        mutate: impl FnOnce() -> R,
    ) -> Result<R, KvoError> {
        self.will_change(key)?;
        let result = mutate();
        self.did_change(key)?;
        Ok(result)
    }
}

impl<O, V, C> Drop for Registry<O, V, C> {
    fn drop(&mut self) {
        if !self.observers.get_mut().is_empty() {
            self.remove_all_observers();
        }
    }
}

impl<O, V, C> fmt::Debug for Registry<O, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self
            .observers
            .borrow()
            .iter()
            .map(|entry| entry.key().to_string())
            .collect();
        f.debug_struct("Registry")
            .field("observable_alive", &(self.observable.strong_count() > 0))
            .field("observers", &keys)
            .field("traced", &self.trace.borrow().is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
