//! Macros for observable types.

/// Generates change-bracketing setters for an observable type.
///
/// Each generated setter stores its argument into the field of the same name
/// (a `Cell` or `RefCell`, anything with a `replace` method) between
/// `will_change_value_for_key` and `did_change_value_for_key` for the given
/// key. The enclosing type must implement
/// [`KeyValueObserving`](crate::KeyValueObserving).
///
/// # Examples
///
/// ```rust
/// use kvo_registry::{
///     kvo_setter, KeyValueObserving, KvoError, Observer, ObservingOptions, Registry,
/// };
/// use std::cell::{Cell, RefCell};
/// use std::rc::Rc;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Prop {
///     Width(u32),
///     Title(String),
/// }
///
/// struct Window {
///     width: Cell<u32>,
///     title: RefCell<String>,
///     kvo: Registry<Window, Prop>,
/// }
///
/// impl KeyValueObserving for Window {
///     type Value = Prop;
///     type Context = ();
///
///     fn kvo(&self) -> &Registry<Self, Prop> {
///         &self.kvo
///     }
/// }
///
/// impl Window {
///     kvo_setter! {
///         /// Resize the window.
///         pub fn set_width(width: u32) => "width";
///         pub fn set_title(title: String) => "title";
///     }
/// }
///
/// let window = Rc::new_cyclic(|me| Window {
///     width: Cell::new(80),
///     title: RefCell::new(String::new()),
///     kvo: Registry::new(me.clone()),
/// });
///
/// let seen = Rc::new(RefCell::new(None));
/// let sink = Rc::clone(&seen);
/// window.add_observer(&Observer::new(
///     "title",
///     ObservingOptions::NEW,
///     (),
///     |w: &Window| Prop::Title(w.title.borrow().clone()),
///     move |_w, _old, new, _key, _ctx| *sink.borrow_mut() = new.cloned(),
/// ));
///
/// window.set_width(120)?;
/// window.set_title("editor".to_string())?;
/// assert_eq!(*seen.borrow(), Some(Prop::Title("editor".to_string())));
/// # Ok::<(), KvoError>(())
/// ```
#[macro_export]
macro_rules! kvo_setter {
    ($($(#[$meta:meta])* $vis:vis fn $setter:ident($field:ident: $ty:ty) => $key:expr;)+) => {
        $(
            $(#[$meta])*
            $vis fn $setter(&self, $field: $ty) -> ::std::result::Result<(), $crate::KvoError> {
                $crate::KeyValueObserving::change_value_for_key(self, $key, || {
                    self.$field.replace($field);
                })
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::{KeyValueObserving, KvoError, Observer, ObservingOptions, Registry};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Point {
        x: Cell<i64>,
        y: Cell<i64>,
        kvo: Registry<Point, i64>,
    }

    impl KeyValueObserving for Point {
        type Value = i64;
        type Context = ();

        fn kvo(&self) -> &Registry<Self, i64> {
            &self.kvo
        }
    }

    impl Point {
        kvo_setter! {
            fn set_x(x: i64) => "x";
            fn set_y(y: i64) => "y";
        }
    }

    fn point() -> Rc<Point> {
        Rc::new_cyclic(|me| Point {
            x: Cell::new(0),
            y: Cell::new(0),
            kvo: Registry::new(me.clone()),
        })
    }

    #[test]
    fn test_kvo_setter_brackets_mutation() -> Result<(), KvoError> {
        let point = point();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        point.add_observer(&Observer::new(
            "x",
            ObservingOptions::OLD | ObservingOptions::NEW,
            (),
            |p: &Point| p.x.get(),
            move |_p, old, new, _key, _ctx| {
                sink.borrow_mut().push((old.copied(), new.copied()))
            },
        ));

        point.set_x(3)?;
        point.set_y(8)?;
        point.set_x(-1)?;

        assert_eq!(point.y.get(), 8);
        assert_eq!(*seen.borrow(), vec![(Some(0), Some(3)), (Some(3), Some(-1))]);
        Ok(())
    }

    #[test]
    fn test_kvo_setter_without_observers() -> Result<(), KvoError> {
        let point = point();
        point.set_y(5)?;
        assert_eq!(point.y.get(), 5);
        Ok(())
    }
}
