//! Subscription descriptors.
//!
//! An [`Observer`] bundles everything needed to watch one property: the key,
//! the [`ObservingOptions`], an opaque context, a getter and a callback. It is
//! handed out as an `Rc` so the same descriptor can be shared between the
//! caller and any number of registry entries.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ObservingOptions;

/// Reads the current value of the observed property from the observable.
pub type Getter<O, V> = dyn Fn(&O) -> V;

/// Invoked on change with `(observable, old, new, key, context)`.
///
/// `old` is `None` unless the observer was created with
/// [`ObservingOptions::OLD`]; `new` is `None` unless it was created with
/// [`ObservingOptions::NEW`].
pub type Callback<O, V, C> = dyn Fn(&O, Option<&V>, Option<&V>, &str, &C);

/// A single key-value subscription.
///
/// Everything except the two value slots is fixed at construction. To change
/// the key, options or functions, create a new observer.
pub struct Observer<O, V, C = ()> {
    key: Box<str>,
    options: ObservingOptions,
    context: C,
    getter: Box<Getter<O, V>>,
    callback: Box<Callback<O, V, C>>,
    // Only meaningful between `will_change` and the matching `did_change`.
    // Never reset, so an unpaired `did_change` sees the previous capture.
    old_value: RefCell<Option<V>>,
    new_value: RefCell<Option<V>>,
}

impl<O, V, C> Observer<O, V, C> {
    /// Creates an observer with a single live reference.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kvo_registry::{Observer, ObservingOptions};
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// struct Counter {
    ///     count: Cell<u32>,
    /// }
    ///
    /// let observer = Observer::new(
    ///     "count",
    ///     ObservingOptions::NEW,
    ///     (),
    ///     |counter: &Counter| counter.count.get(),
    ///     |_counter, _old, new, key, _context| println!("{key} -> {new:?}"),
    /// );
    /// assert_eq!(observer.key(), "count");
    /// assert_eq!(Rc::strong_count(&observer), 1);
    /// ```
    pub fn new<G, F>(
        key: impl Into<Box<str>>,
        options: ObservingOptions,
        context: C,
        getter: G,
        callback: F,
    ) -> Rc<Self>
    where
        G: Fn(&O) -> V + 'static,
        F: Fn(&O, Option<&V>, Option<&V>, &str, &C) + 'static,
    {
        Rc::new(Self {
            key: key.into(),
            options,
            context,
            getter: Box::new(getter),
            callback: Box::new(callback),
            old_value: RefCell::new(None),
            new_value: RefCell::new(None),
        })
    }

    /// The observed property name.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn options(&self) -> ObservingOptions {
        self.options
    }

    /// The caller-supplied context, passed through untouched to the callback.
    pub fn context(&self) -> &C {
        &self.context
    }

    pub(crate) fn matches(&self, key: &str) -> bool {
        *self.key == *key
    }

    /// Stores the pre-change value when `OLD` is requested.
    ///
    /// Returns whether a value was captured.
    pub(crate) fn capture_old(&self, observable: &O) -> bool {
        if !self.options.wants_old() {
            return false;
        }
        let value = (self.getter)(observable);
        *self.old_value.borrow_mut() = Some(value);
        true
    }

    /// Stores the post-change value when `NEW` is requested, then invokes the
    /// callback with the slots selected by the options.
    ///
    /// The registry refuses re-entrant notification of this observer's key
    /// while the callback runs, so the slots are never borrowed twice.
    pub(crate) fn deliver(&self, observable: &O) {
        if self.options.wants_new() {
            let value = (self.getter)(observable);
            *self.new_value.borrow_mut() = Some(value);
        }

        let old_slot = self.old_value.borrow();
        let new_slot = self.new_value.borrow();
        let old = if self.options.wants_old() {
            old_slot.as_ref()
        } else {
            None
        };
        let new = if self.options.wants_new() {
            new_slot.as_ref()
        } else {
            None
        };

        (self.callback)(observable, old, new, &self.key, &self.context);
    }
}

impl<O, V, C: fmt::Debug> fmt::Debug for Observer<O, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("key", &self.key)
            .field("options", &self.options)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
