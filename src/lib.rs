//! # KVO Registry
//!
//! Key-value observing for Rust objects: register interest in a named property
//! of an observable and get a synchronous callback with its old and new value
//! whenever it changes.
//!
//! The observable owns a [`Registry`] and brackets every mutation with
//! [`Registry::will_change`] and [`Registry::did_change`]. Each registered
//! [`Observer`] whose key matches captures the values requested by its
//! [`ObservingOptions`] and is called back in registration order.
//!
//! ## Quick Start
//!
//! ```rust
//! use kvo_registry::{kvo_setter, KeyValueObserving, Observer, ObservingOptions, Registry};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct Object {
//!     value: Cell<i32>,
//!     kvo: Registry<Object, i32, &'static str>,
//! }
//!
//! impl KeyValueObserving for Object {
//!     type Value = i32;
//!     type Context = &'static str;
//!
//!     fn kvo(&self) -> &Registry<Self, i32, &'static str> {
//!         &self.kvo
//!     }
//! }
//!
//! impl Object {
//!     kvo_setter! {
//!         pub fn set_value(value: i32) => "value";
//!     }
//! }
//!
//! let object = Rc::new_cyclic(|me| Object {
//!     value: Cell::new(0),
//!     kvo: Registry::new(me.clone()),
//! });
//!
//! let observer = Observer::new(
//!     "value",
//!     ObservingOptions::OLD | ObservingOptions::NEW,
//!     "main",
//!     |o: &Object| o.value.get(),
//!     |_object, old, new, key, context| {
//!         println!("{context}: {key} changed from {old:?} to {new:?}");
//!     },
//! );
//!
//! object.add_observer(&observer);
//! object.set_value(2)?; // main: value changed from Some(0) to Some(2)
//! object.remove_observer(&observer);
//! # Ok::<(), kvo_registry::KvoError>(())
//! ```
//!
//! ## Features
//!
//! - **Synchronous**: callbacks run inline on the mutating thread
//! - **Shared observers**: one [`Observer`] can be registered many times, on many registries
//! - **Typed values**: getters return a caller-chosen value type, often an enum of properties
//! - **Tracing support**: per-registry trace callback plus `tracing` logs
//!
//! ## Main Types
//!
//! - [`Observer`] - One subscription: key, options, context, getter and callback
//! - [`Registry`] - The observers registered on one observable, and the notification protocol
//! - [`KeyValueObserving`] - Trait for observables embedding a registry
//! - [`kvo_setter!`] - Generates bracketing setters
//! - [`KvoEvent`] - Events delivered to the trace callback

#[macro_use]
mod macros;
mod observer;
mod options;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;

pub use observer::{Callback, Getter, Observer};
pub use options::ObservingOptions;
pub use registry::{Registry, TraceCallback};
pub use registry_error::KvoError;
pub use registry_event::KvoEvent;
pub use registry_trait::{KeyValueObserving, ObserverFor};
