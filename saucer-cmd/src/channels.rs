use crate::args::{DispatchFn, GetStateFn};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;

/// Wrap a channel sender as a dispatch function. Payloads crossing the
/// channel must be `Send + 'static`; sends after the receiver is gone are
/// dropped.
pub fn channel_dispatch<A: Send + 'static>(sender: UnboundedSender<A>) -> DispatchFn<A> {
    Arc::new(move |action| {
        if sender.send(action).is_err() {
            tracing::debug!(target: "saucer-cmd::Action", "dispatch after receiver closed");
        }
    })
}

/// Expose the latest value of a watch channel as a state reader.
pub fn state_reader<S: Clone + Send + Sync + 'static>(state: watch::Receiver<S>) -> GetStateFn<S> {
    Arc::new(move || state.borrow().clone())
}

/// Dispatch function paired with the receiver owned by the host loop.
pub struct DispatchChannels<A> {
    pub dispatch: DispatchFn<A>,
    pub action_rx: UnboundedReceiver<A>,
}

impl<A: Send + 'static> DispatchChannels<A> {
    /// Allocate a channel and return its dispatch function plus receiver.
    pub fn new() -> Self {
        let (action_tx, action_rx) = unbounded_channel();
        Self {
            dispatch: channel_dispatch(action_tx),
            action_rx,
        }
    }
}

impl<A: Send + 'static> Default for DispatchChannels<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatched_actions_arrive_in_order() {
        let DispatchChannels {
            dispatch,
            mut action_rx,
        } = DispatchChannels::<u32>::new();

        dispatch(1);
        dispatch(2);

        assert_eq!(action_rx.try_recv().ok(), Some(1));
        assert_eq!(action_rx.try_recv().ok(), Some(2));
        assert!(action_rx.try_recv().is_err());
    }

    #[test]
    fn dispatch_after_close_is_dropped() {
        let DispatchChannels {
            dispatch,
            action_rx,
        } = DispatchChannels::<u32>::new();
        drop(action_rx);

        dispatch(1);
    }

    #[test]
    fn state_reader_sees_latest_value() {
        let (tx, rx) = watch::channel(1);
        let get_state = state_reader(rx);

        assert_eq!(get_state(), 1);
        tx.send(5).unwrap();
        assert_eq!(get_state(), 5);
    }
}
