//! Trait for observables that embed their own registry.
//!
//! This module provides the `KeyValueObserving` trait with default
//! implementations for observer management and change bracketing. Implementors
//! only supply the accessor to their [`Registry`].

use std::rc::Rc;

use crate::{KvoError, Observer, Registry};

/// Shorthand for the observer type accepted by a [`KeyValueObserving`] type.
pub type ObserverFor<T> =
    Observer<T, <T as KeyValueObserving>::Value, <T as KeyValueObserving>::Context>;

/// An object that supports key-value observing.
///
/// The implementor owns a [`Registry`] bound to itself (usually built inside
/// [`Rc::new_cyclic`]) and must bracket every property mutation with
/// [`will_change_value_for_key`](Self::will_change_value_for_key) and
/// [`did_change_value_for_key`](Self::did_change_value_for_key), using the same
/// key for both. [`change_value_for_key`](Self::change_value_for_key) and the
/// [`kvo_setter!`](crate::kvo_setter) macro do both in one call.
///
/// # Examples
///
/// ```rust
/// use kvo_registry::{KeyValueObserving, Observer, ObservingOptions, Registry};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Counter {
///     count: Cell<u32>,
///     kvo: Registry<Counter, u32>,
/// }
///
/// impl KeyValueObserving for Counter {
///     type Value = u32;
///     type Context = ();
///
///     fn kvo(&self) -> &Registry<Self, u32> {
///         &self.kvo
///     }
/// }
///
/// let counter = Rc::new_cyclic(|me| Counter {
///     count: Cell::new(0),
///     kvo: Registry::new(me.clone()),
/// });
///
/// let last = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&last);
/// counter.add_observer(&Observer::new(
///     "count",
///     ObservingOptions::NEW,
///     (),
///     |c: &Counter| c.count.get(),
///     move |_c, _old, new, _key, _ctx| sink.set(*new.unwrap()),
/// ));
///
/// counter.change_value_for_key("count", || counter.count.set(3))?;
/// assert_eq!(last.get(), 3);
/// # Ok::<(), kvo_registry::KvoError>(())
/// ```
pub trait KeyValueObserving: Sized {
    /// Type returned by the getters of this object's observers.
    type Value;

    /// Opaque context type carried by this object's observers.
    type Context;

    /// Access the registry bound to this object.
    fn kvo(&self) -> &Registry<Self, Self::Value, Self::Context>;

    /// Register `observer` on this object. See [`Registry::add_observer`].
    fn add_observer(&self, observer: &Rc<ObserverFor<Self>>) {
        self.kvo().add_observer(observer);
    }

    /// Remove every registration of `observer`. See [`Registry::remove_observer`].
    fn remove_observer(&self, observer: &Rc<ObserverFor<Self>>) -> usize {
        self.kvo().remove_observer(observer)
    }

    /// Must be called before the property `key` is mutated.
    fn will_change_value_for_key(&self, key: &str) -> Result<(), KvoError> {
        self.kvo().will_change(key)
    }

    /// Must be called right after the property `key` was mutated.
    fn did_change_value_for_key(&self, key: &str) -> Result<(), KvoError> {
        self.kvo().did_change(key)
    }

    /// Runs `mutate` between the will/did notifications for `key`.
    fn change_value_for_key<R>(
        &self,
        key: &str,
        mutate: impl FnOnce() -> R,
    ) -> Result<R, KvoError> {
        self.kvo().change_value_for_key(key, mutate)
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{KeyValueObserving, ObserverFor};
    use crate::{ObservingOptions, Registry};

    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Gauge {
        level: Cell<u8>,
        kvo: Registry<Gauge, u8, &'static str>,
    }

    impl KeyValueObserving for Gauge {
        type Value = u8;
        type Context = &'static str;

        fn kvo(&self) -> &Registry<Self, u8, &'static str> {
            &self.kvo
        }
    }

    impl Gauge {
        fn new() -> Rc<Self> {
            Rc::new_cyclic(|me| Gauge {
                level: Cell::new(0),
                kvo: Registry::new(me.clone()),
            })
        }

        fn set_level(&self, level: u8) {
            self.will_change_value_for_key("level").unwrap();
            self.level.set(level);
            self.did_change_value_for_key("level").unwrap();
        }
    }

    fn level_observer(log: &Rc<RefCell<Vec<String>>>) -> Rc<ObserverFor<Gauge>> {
        let sink = Rc::clone(log);
        ObserverFor::<Gauge>::new(
            "level",
            ObservingOptions::OLD | ObservingOptions::NEW,
            "gauge",
            |g: &Gauge| g.level.get(),
            move |_g, old, new, key, ctx| {
                sink.borrow_mut().push(format!("{ctx}:{key}:{old:?}->{new:?}"))
            },
        )
    }

    #[test]
    fn test_embedded_registry_round() {
        let gauge = Gauge::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let observer = level_observer(&log);

        gauge.add_observer(&observer);
        gauge.set_level(4);
        gauge.set_level(9);

        assert_eq!(
            *log.borrow(),
            vec![
                "gauge:level:Some(0)->Some(4)",
                "gauge:level:Some(4)->Some(9)"
            ]
        );
    }

    #[test]
    fn test_remove_through_trait() {
        let gauge = Gauge::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let observer = level_observer(&log);

        gauge.add_observer(&observer);
        assert_eq!(gauge.remove_observer(&observer), 1);
        gauge.set_level(1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_change_value_for_key_returns_result() {
        let gauge = Gauge::new();
        let previous = gauge
            .change_value_for_key("level", || gauge.level.replace(7))
            .unwrap();
        assert_eq!(previous, 0);
        assert_eq!(gauge.level.get(), 7);
    }

    #[test]
    fn test_dropping_observable_releases_observers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let observer = level_observer(&log);
        {
            let gauge = Gauge::new();
            gauge.add_observer(&observer);
            assert_eq!(Rc::strong_count(&observer), 2);
        }
        assert_eq!(Rc::strong_count(&observer), 1);
    }
}
