//! Observable state container
//!
//! A [`Store`] holds one value and notifies subscribers whenever it
//! changes. Controllers own their stores and hand out clones; a clone
//! shares the same value.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug)]
pub struct Store<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Store<T> {
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Read the value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Modify the value in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Receiver that observes every later change
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone> Store<T> {
    /// Clone of the current value
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }
}
