/// Events emitted by a [`Registry`](crate::Registry) during operations.
///
/// These events are passed to the trace callback set via
/// [`Registry::set_trace_callback`](crate::Registry::set_trace_callback) and are
/// also logged through `tracing` at `TRACE` level.
///
/// # Examples
///
/// ```rust
/// use kvo_registry::KvoEvent;
///
/// let event = KvoEvent::DidChange { key: "value", notified: 2 };
/// assert_eq!(event.to_string(), "did_change { key: value, notified: 2 }");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvoEvent<'a> {
    /// An observer was appended to the registry.
    AddObserver {
        /// Key the observer watches.
        key: &'a str,
        /// Number of entries in the registry after the addition.
        registrations: usize,
    },

    /// A removal by identity was performed.
    RemoveObserver {
        /// Key the observer watches.
        key: &'a str,
        /// How many entries were removed (zero when the observer was absent).
        removed: usize,
    },

    /// Old values were captured ahead of a mutation.
    WillChange {
        key: &'a str,
        /// Observers with a matching key and `OLD` set.
        captured: usize,
    },

    /// Callbacks were dispatched after a mutation.
    DidChange {
        key: &'a str,
        /// Observers with a matching key (each one was called back).
        notified: usize,
    },

    /// The registry dropped all of its remaining entries.
    Teardown {
        /// Number of observer references released.
        released: usize,
    },
}

impl std::fmt::Display for KvoEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvoEvent::AddObserver { key, registrations } => {
                write!(f, "add_observer {{ key: {key}, registrations: {registrations} }}")
            }
            KvoEvent::RemoveObserver { key, removed } => {
                write!(f, "remove_observer {{ key: {key}, removed: {removed} }}")
            }
            KvoEvent::WillChange { key, captured } => {
                write!(f, "will_change {{ key: {key}, captured: {captured} }}")
            }
            KvoEvent::DidChange { key, notified } => {
                write!(f, "did_change {{ key: {key}, notified: {notified} }}")
            }
            KvoEvent::Teardown { released } => write!(f, "teardown {{ released: {released} }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kvo_event_display() {
        let event = KvoEvent::AddObserver {
            key: "value",
            registrations: 1,
        };
        assert_eq!(
            event.to_string(),
            "add_observer { key: value, registrations: 1 }"
        );

        let event = KvoEvent::RemoveObserver {
            key: "header",
            removed: 0,
        };
        assert_eq!(event.to_string(), "remove_observer { key: header, removed: 0 }");

        let event = KvoEvent::WillChange {
            key: "value",
            captured: 3,
        };
        assert_eq!(event.to_string(), "will_change { key: value, captured: 3 }");

        let event = KvoEvent::Teardown { released: 2 };
        assert_eq!(event.to_string(), "teardown { released: 2 }");
    }

    #[test]
    fn test_kvo_event_copy() {
        let event = KvoEvent::DidChange {
            key: "value",
            notified: 1,
        };
        let copied = event;
        assert_eq!(event, copied);
        assert_eq!(format!("{:?}", event), format!("{:?}", copied));
    }
}
