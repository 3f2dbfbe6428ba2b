//! Focus registry - ordered focusable targets with cyclic navigation.
//!
//! Session-scoped (one registry per render session, handed to widgets as
//! part of the session context, never ambient global state). Tokens are
//! opaque identities appended in registration order; at most one is
//! current at a time.
//!
//! Repair rule when the current token is unregistered: current moves to
//! whatever token slid into the vacated index (wrapping to the first slot
//! when the last one was vacated), or clears when the registry empties.

/// Opaque identity for one focusable widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusToken(u64);

/// Ordered registry of focus tokens plus the current pointer.
pub struct FocusRegistry {
    order: Vec<FocusToken>,
    current: Option<FocusToken>,
    next_id: u64,
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            current: None,
            next_id: 0,
        }
    }

    /// Register a new focusable target, appending it to the cycle order.
    ///
    /// Registering into an empty registry makes the new token current.
    pub fn register(&mut self) -> FocusToken {
        let token = FocusToken(self.next_id);
        self.next_id += 1;
        let was_empty = self.order.is_empty();
        self.order.push(token);
        if was_empty {
            self.current = Some(token);
        }
        token
    }

    /// Remove a target, repairing the current pointer if needed.
    pub fn unregister(&mut self, token: FocusToken) {
        let Some(index) = self.order.iter().position(|&t| t == token) else {
            return;
        };
        self.order.remove(index);
        if self.current == Some(token) {
            self.current = if self.order.is_empty() {
                None
            } else if index < self.order.len() {
                // The next token slid into the vacated slot.
                Some(self.order[index])
            } else {
                // The last slot was vacated; wrap to the front.
                Some(self.order[0])
            };
        }
    }

    /// Focus a specific token.
    ///
    /// Silently ignored when the token is no longer registered: races
    /// between unregister and focus are expected during teardown.
    pub fn focus(&mut self, token: FocusToken) {
        if self.order.contains(&token) {
            self.current = Some(token);
        }
    }

    /// Move focus forward with wraparound. No-op on an empty registry.
    pub fn focus_next(&mut self) {
        if self.order.is_empty() {
            return;
        }
        let next = match self.current_index() {
            Some(index) => (index + 1) % self.order.len(),
            None => 0,
        };
        self.current = Some(self.order[next]);
    }

    /// Move focus backward with wraparound. No-op on an empty registry.
    pub fn focus_previous(&mut self) {
        if self.order.is_empty() {
            return;
        }
        let prev = match self.current_index() {
            Some(0) | None => self.order.len() - 1,
            Some(index) => index - 1,
        };
        self.current = Some(self.order[prev]);
    }

    /// The currently focused token, if any.
    pub fn current(&self) -> Option<FocusToken> {
        self.current
    }

    /// Whether `token` is the current focus.
    pub fn is_focused(&self, token: FocusToken) -> bool {
        self.current == Some(token)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current?;
        self.order.iter().position(|&t| t == current)
    }
}

impl Default for FocusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
