//! Input routing - key-event subscriptions with activity predicates.
//!
//! Every subscribed handler receives every decoded event; the router never
//! filters on the focus registry's behalf. A subscription may carry an
//! activity predicate (typically "my widget opted in AND currently holds
//! focus") that gates its callback, while handlers subscribed without one
//! (a global quit-key listener, say) run unconditionally.
//!
//! Dispatch tolerates re-entrant subscribe/unsubscribe: a handler that
//! tears its widget down mid-event neither panics nor leaves a stale
//! handler behind.

use std::cell::RefCell;
use std::rc::Rc;

use super::keyboard::KeyEvent;

/// Identifies a subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

struct Entry {
    id: HandlerId,
    active: Option<Box<dyn Fn() -> bool>>,
    handler: Box<dyn FnMut(&KeyEvent)>,
}

/// Registry of input handlers for one render session.
pub struct InputRouter {
    entries: Vec<Entry>,
    pending_remove: Vec<HandlerId>,
    dispatching: bool,
    next_id: u64,
}

impl InputRouter {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            pending_remove: Vec::new(),
            dispatching: false,
            next_id: 0,
        }
    }

    /// Subscribe an unconditional handler.
    pub fn subscribe(&mut self, handler: impl FnMut(&KeyEvent) + 'static) -> HandlerId {
        self.push_entry(None, Box::new(handler))
    }

    /// Subscribe a handler gated by an activity predicate.
    ///
    /// The predicate is evaluated per event, immediately before the
    /// callback would run.
    pub fn subscribe_when(
        &mut self,
        active: impl Fn() -> bool + 'static,
        handler: impl FnMut(&KeyEvent) + 'static,
    ) -> HandlerId {
        self.push_entry(Some(Box::new(active)), Box::new(handler))
    }

    fn push_entry(
        &mut self,
        active: Option<Box<dyn Fn() -> bool>>,
        handler: Box<dyn FnMut(&KeyEvent)>,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            active,
            handler,
        });
        id
    }

    /// Remove a subscription. Safe to call from inside a handler.
    pub fn unsubscribe(&mut self, id: HandlerId) {
        self.entries.retain(|entry| entry.id != id);
        if self.dispatching {
            self.pending_remove.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver one event to every handler.
    ///
    /// Takes the shared router so handlers are free to subscribe and
    /// unsubscribe through their own clone of it while running.
    pub fn dispatch(router: &Rc<RefCell<InputRouter>>, event: &KeyEvent) {
        let mut running = {
            let mut r = router.borrow_mut();
            r.dispatching = true;
            std::mem::take(&mut r.entries)
        };

        for entry in running.iter_mut() {
            let removed = router.borrow().pending_remove.contains(&entry.id);
            if removed {
                continue;
            }
            let active = entry.active.as_ref().map_or(true, |pred| pred());
            if active {
                (entry.handler)(event);
            }
        }

        let mut r = router.borrow_mut();
        let added = std::mem::replace(&mut r.entries, running);
        let pending = std::mem::take(&mut r.pending_remove);
        r.entries.retain(|entry| !pending.contains(&entry.id));
        r.entries.extend(added);
        r.dispatching = false;
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
