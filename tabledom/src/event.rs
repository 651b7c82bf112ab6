//! Event subscription primitives.
//!
//! The document does not store closures. Subscribing hands back a
//! [`HandlerId`]; the subscriber keeps its own map from handler to behaviour and
//! asks the document which handlers lie on an event's bubble path. Handler ids
//! die with their element, so replacing a subtree drops its subscriptions.

use std::fmt;

/// Events an element can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
}

/// Opaque token returned by [`Document::listen`](crate::Document::listen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__handler_{}", self.0)
    }
}

/// Whether an event keeps bubbling after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

impl Propagation {
    pub fn is_stopped(self) -> bool {
        self == Propagation::Stop
    }
}
