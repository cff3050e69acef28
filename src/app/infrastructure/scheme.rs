use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::app::domain::ResolvedTheme;

pub type SchemeListener = Rc<dyn Fn(ResolvedTheme)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// The OS "prefers dark" signal.
pub trait SystemSchemeSource {
    /// `None` when the environment has no colour-scheme signal at all.
    fn prefers_dark(&self) -> Option<bool>;

    /// Register for change notifications. `None` means live updates are
    /// not available and the listener was dropped.
    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId>;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Listener bookkeeping shared by the push-based sources.
#[derive(Default)]
pub(crate) struct ListenerSet {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, SchemeListener)>>,
}

impl ListenerSet {
    pub fn add(&self, listener: SchemeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub fn remove(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn notify(&self, scheme: ResolvedTheme) {
        // Snapshot first: a listener may unsubscribe while being called.
        let listeners: Vec<SchemeListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(scheme);
        }
    }
}

/// A scheme source driven by the host, e.g. a toolkit's appearance
/// callback, or a test.
#[derive(Default)]
pub struct ManualSchemeSource {
    prefers_dark: Cell<Option<bool>>,
    listeners: ListenerSet,
}

impl ManualSchemeSource {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            prefers_dark: Cell::new(Some(prefers_dark)),
            listeners: ListenerSet::default(),
        }
    }

    /// Record a new OS value and notify every subscriber.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.prefers_dark.set(Some(prefers_dark));
        self.listeners.notify(ResolvedTheme::from_prefers_dark(prefers_dark));
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl SystemSchemeSource for ManualSchemeSource {
    fn prefers_dark(&self) -> Option<bool> {
        self.prefers_dark.get()
    }

    fn subscribe(&self, listener: SchemeListener) -> Option<SubscriptionId> {
        Some(self.listeners.add(listener))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}

/// No colour-scheme signal, e.g. a headless session.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSchemeSource;

impl SystemSchemeSource for DetachedSchemeSource {
    fn prefers_dark(&self) -> Option<bool> {
        None
    }

    fn subscribe(&self, _listener: SchemeListener) -> Option<SubscriptionId> {
        None
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}
