//! Deferred change notification
//!
//! The tree only queues [`ChangeEvent`]s. Once per frame the context calls
//! [`ChangeBus::dispatch`], which moves every queued event into the inbox of
//! each subscriber whose prefix matches. Subscribers drain their inbox when they
//! run. Anything they change while handling events is queued on the tree again
//! and delivered by the next dispatch.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::node::{ChangeEvent, ConfigTree, PATH_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Subscription {
    prefix: String,
    inbox: Vec<ChangeEvent>,
}

impl Subscription {
    /// `hud.player` matches `hud.player` and `hud.player.x`, not `hud.players`
    fn matches(&self, path: &str) -> bool {
        if self.prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(PATH_SEPARATOR),
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct ChangeBus {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every change at or below `prefix` (empty = everything)
    pub fn subscribe(&mut self, prefix: &str) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(
            id,
            Subscription {
                prefix: prefix.to_string(),
                inbox: Vec::new(),
            },
        );
        debug!(id = id.0, prefix = %prefix, "change subscription added");
        id
    }

    /// Returns false if the id was unknown (already removed)
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.remove(&id).is_some();
        if removed {
            debug!(id = id.0, "change subscription removed");
        }
        removed
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    /// Route the tree's queued events. Returns how many events were taken.
    pub fn dispatch(&mut self, tree: &mut ConfigTree) -> usize {
        let events = tree.take_changes();
        for event in &events {
            for subscription in self.subscriptions.values_mut() {
                if subscription.matches(&event.path) {
                    subscription.inbox.push(event.clone());
                }
            }
        }
        if !events.is_empty() {
            trace!(count = events.len(), "dispatched config changes");
        }
        events.len()
    }

    /// Take the pending events for one subscriber, oldest first
    pub fn drain(&mut self, id: SubscriptionId) -> Vec<ChangeEvent> {
        self.subscriptions
            .get_mut(&id)
            .map(|s| std::mem::take(&mut s.inbox))
            .unwrap_or_default()
    }
}
