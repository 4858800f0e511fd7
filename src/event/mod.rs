mod bus;
mod events;

pub use bus::{EventBus, SubscriptionId};
pub use events::{CanvasEvent, HistoryStatus};

/// Receives canvas events on the engine thread
pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &CanvasEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&CanvasEvent) + Send,
{
    fn handle_event(&mut self, event: &CanvasEvent) {
        (*self)(event)
    }
}
