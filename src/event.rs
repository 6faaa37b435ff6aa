//! Status-change notifications.
//!
//! Observers register a handler for the status they care about and get
//! called synchronously, inside the transition that reaches it, with a
//! snapshot of the timer's lifecycle epochs.

use crate::timing::TimerPhase;
use serde::Serialize;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Identifies a single observer registration.
    pub struct SubscriptionKey;
}

/// Snapshot of a timer's lifecycle epochs, delivered with every
/// status-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerData {
    /// Wall-clock milliseconds since the Unix epoch, captured when the timer
    /// first started. `None` until then.
    pub start_epoch: Option<u64>,
    /// Wall-clock milliseconds since the Unix epoch, captured when the timer
    /// stopped. `None` until then.
    pub end_epoch: Option<u64>,
}

/// A status-change handler.
pub type Handler = Box<dyn FnMut(&TimerData) + Send + Sync>;

struct Subscription {
    phase: TimerPhase,
    handler: Handler,
}

/// Observer registry of a single timer.
///
/// Handlers run in subscription order. The slot map hands out stable keys
/// that survive other handlers being removed; the separate order list exists
/// because slot maps don't iterate in insertion order once slots get reused.
#[derive(Default)]
pub struct Notifier {
    subscriptions: SlotMap<SubscriptionKey, Subscription>,
    order: Vec<SubscriptionKey>,
}

impl Notifier {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers `handler` for transitions into `phase`.
    pub fn subscribe(&mut self, phase: TimerPhase, handler: Handler) -> SubscriptionKey {
        let key = self.subscriptions.insert(Subscription { phase, handler });
        self.order.push(key);
        key
    }

    /// Removes a registration. Returns whether the key was still live.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        let removed = self.subscriptions.remove(key).is_some();
        if removed {
            self.order.retain(|k| *k != key);
        }
        removed
    }

    pub(crate) fn emit(&mut self, phase: TimerPhase, data: &TimerData) {
        for key in &self.order {
            if let Some(subscription) = self.subscriptions.get_mut(*key) {
                if subscription.phase == phase {
                    (subscription.handler)(data);
                }
            }
        }
    }
}
