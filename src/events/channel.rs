use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Handle returned by `subscribe`; hand it back to stop receiving events.
pub struct Unsubscriber<T: std::fmt::Debug> {
    channel: Channel<T>,
    id: SubscriptionId,
}

impl<T: std::fmt::Debug> Unsubscriber<T> {
    pub fn unsubscribe(self) -> bool {
        self.channel.unsubscribe(self.id)
    }
}

/// Single-threaded pub/sub. Listeners are called in subscription order.
pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<RefCell<BTreeMap<SubscriptionId, Callback<T>>>>,
    next_id: Rc<Cell<SubscriptionId>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: std::fmt::Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(BTreeMap::new())),
            next_id: Rc::new(Cell::new(0)),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(callback));
        Unsubscriber {
            channel: self.clone(),
            id,
        }
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    fn emit(&self, data: T) {
        // snapshot, so listeners may subscribe or unsubscribe while being notified
        let listeners: Vec<Callback<T>> = self.listeners.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", listeners.len(), data);
        for listener in listeners {
            listener(&data);
        }
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: T) {
        self.channel.emit(data);
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }
}
