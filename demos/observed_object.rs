//! Observed object demo.
//!
//! An object with a `value` and a `header` property, watched by two observers
//! on `value` (told apart by context) and one on `header`.
//!
//! Run with `RUST_LOG=kvo_registry=trace cargo run --example observed_object`
//! to see the registry's own log records.

use kvo_registry::{kvo_setter, KeyValueObserving, KvoError, Observer, ObservingOptions, Registry};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
enum Property {
    Value(i32),
    Header(String),
}

#[derive(Debug, Clone, Copy)]
enum Context {
    Main,
    Other,
}

struct Object {
    value: Cell<i32>,
    header: RefCell<String>,
    kvo: Registry<Object, Property, Option<Context>>,
}

impl KeyValueObserving for Object {
    type Value = Property;
    type Context = Option<Context>;

    fn kvo(&self) -> &Registry<Self, Property, Option<Context>> {
        &self.kvo
    }
}

impl Object {
    fn new() -> Rc<Self> {
        Rc::new_cyclic(|me| Object {
            value: Cell::new(0),
            header: RefCell::new("default_header".to_string()),
            kvo: Registry::new(me.clone()),
        })
    }

    kvo_setter! {
        fn set_value(value: i32) => "value";
        fn set_header(header: String) => "header";
    }
}

fn observe(
    object: &Object,
    old: Option<&Property>,
    new: Option<&Property>,
    key: &str,
    context: &Option<Context>,
) {
    match context {
        Some(Context::Main) => {
            println!("Observed.1.1 {object:p}, old = {old:?}, new = {new:?}, key = {key:?}, context = main")
        }
        Some(Context::Other) => {
            println!("Observed.1.2 {object:p}, old = {old:?}, new = {new:?}, key = {key:?}, context = other")
        }
        None => println!("Observed.2 {object:p}, old = {old:?}, new = {new:?}, key = {key:?}"),
    }
}

fn main() -> Result<(), KvoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let value_observer = Observer::new(
        "value",
        ObservingOptions::NEW,
        Some(Context::Main),
        |o: &Object| Property::Value(o.value.get()),
        observe,
    );
    let value_observer_other_context = Observer::new(
        "value",
        ObservingOptions::NEW,
        Some(Context::Other),
        |o: &Object| Property::Value(o.value.get()),
        observe,
    );
    let header_observer = Observer::new(
        "header",
        ObservingOptions::OLD | ObservingOptions::NEW,
        None,
        |o: &Object| Property::Header(o.header.borrow().clone()),
        observe,
    );

    let object = Object::new();
    object.add_observer(&value_observer);
    object.add_observer(&value_observer_other_context);
    object.add_observer(&header_observer);

    object.set_value(2)?;
    object.set_header("new_header".to_string())?;

    object.remove_observer(&value_observer);
    object.remove_observer(&value_observer_other_context);
    object.remove_observer(&header_observer);

    // Nobody is listening any more.
    object.set_value(3)?;

    Ok(())
}
