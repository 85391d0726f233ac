use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::sync::{Arc, Mutex};

/// Process-wide notification stream announcing each settled call.
///
/// Every subscriber receives the method name of every call that reached the
/// network and settled. Observers use it for cross-cutting work such as
/// refreshing session state after any RPC. Clones share one subscriber list.
#[derive(Clone, Default)]
pub struct RpcCompletionEvents {
    subscribers: Arc<Mutex<Vec<UnboundedSender<String>>>>,
}

impl RpcCompletionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer. Dropping the receiver unsubscribes it.
    pub fn subscribe(&self) -> UnboundedReceiver<String> {
        let (tx, rx) = unbounded();

        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(tx),
            Err(poisoned) => poisoned.into_inner().push(tx),
        }

        rx
    }

    /// Announces that `method` settled, pruning observers that went away.
    pub fn publish(&self, method: &str) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        subscribers.retain(|tx| tx.unbounded_send(method.to_string()).is_ok());

        tracing::trace!(method, observers = subscribers.len(), "Published method completion");
    }

    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
