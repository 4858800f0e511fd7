use std::cell::{Cell, RefCell};

use crate::event::{CanvasEvent, EventHandler};

/// Handle returned by [`EventBus::subscribe`], used to detach an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fans canvas events out to observers, in subscription order.
///
/// Handlers run synchronously on the engine's thread, right after the
/// history change they describe.
pub struct EventBus {
    handlers: RefCell<Vec<(SubscriptionId, Box<dyn EventHandler>)>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        log::debug!("Observer {} subscribed", id.0);
        id
    }

    /// Detach an observer. Returns false if `id` was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        before != handlers.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn emit(&self, event: CanvasEvent) {
        let mut handlers = self.handlers.borrow_mut();
        log::trace!("{:?} -> {} observer(s)", event, handlers.len());
        for (_, handler) in handlers.iter_mut() {
            handler.handle_event(&event);
        }
    }
}
