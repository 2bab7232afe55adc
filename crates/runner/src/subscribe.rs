// SPDX-License-Identifier: MIT

//! Subscriber registry for runner notifications.
//!
//! Callbacks are invoked synchronously, in registration order, at the
//! point the underlying state change occurred. A subscriber added after
//! an event has fired never sees it retroactively.

use tether_core::RunnerEvent;

/// Handle returned by `subscribe`; pass to `unsubscribe` to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(pub(crate) u64);

type Callback = Box<dyn Fn(&RunnerEvent) + Send>;

#[derive(Default)]
pub(crate) struct Registry {
    next_id: u64,
    subscribers: Vec<(u64, Callback)>,
}

impl Registry {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, callback));
        SubscriptionId(id)
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id.0);
    }

    /// Deliver an event to all subscribers in registration order.
    pub(crate) fn emit(&self, event: &RunnerEvent) {
        for (_, callback) in &self.subscribers {
            callback(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tether_core::ProcessStatus;

    #[test]
    fn emits_in_registration_order() {
        let mut registry = Registry::default();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.add(Box::new(move |_| order.lock().push(tag)));
        }

        registry.emit(&RunnerEvent::StatusChange { status: ProcessStatus::Running });
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn removed_subscriber_is_not_invoked() {
        let mut registry = Registry::default();
        let count = Arc::new(AtomicUsize::new(0));

        let count2 = Arc::clone(&count);
        let id = registry.add(Box::new(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        }));
        registry.emit(&RunnerEvent::StatusChange { status: ProcessStatus::Running });
        assert_eq!(count.load(Ordering::SeqCst), 1);

        registry.remove(id);
        assert_eq!(registry.len(), 0);
        registry.emit(&RunnerEvent::StatusChange { status: ProcessStatus::Stopped });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_unknown_id_is_harmless() {
        let mut registry = Registry::default();
        registry.remove(SubscriptionId(99));
        assert_eq!(registry.len(), 0);
    }
}
