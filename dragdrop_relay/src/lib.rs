// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragdrop Relay: a deterministic, `no_std` publish/subscribe value for UI actors.
//!
//! ## Overview
//!
//! A [`Relay`] maps event keys to an ordered list of handlers.
//! Stateful components own a relay as a field and expose it; they do not inherit from it.
//! Handlers receive a shared reference to the event payload; any extra context is captured by the closure.
//!
//! ## Ordering
//!
//! Handlers registered for one key fire in registration order.
//! [`Relay::trigger`] is synchronous: every handler has returned before it does.
//!
//! ## Re-entrancy
//!
//! `trigger` snapshots the handlers for the key and releases its internal borrow before calling any of them.
//! A handler may therefore bind, unbind, or trigger on the same relay while a dispatch is in flight:
//!
//! - a handler unbound earlier in the same dispatch is not invoked;
//! - a handler bound during a dispatch first runs on the next trigger;
//! - no other handler is skipped or invoked twice.
//!
//! ## Minimal example
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use dragdrop_relay::Relay;
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Key { Ping }
//!
//! let relay: Relay<Key, u32> = Relay::new();
//! let seen = Rc::new(Cell::new(0));
//! let s = seen.clone();
//! let id = relay.bind(Key::Ping, move |v: &u32| s.set(s.get() + *v));
//!
//! assert_eq!(relay.trigger(Key::Ping, &5), 1);
//! assert!(relay.unbind(Key::Ping, id));
//! assert_eq!(relay.trigger(Key::Ping, &5), 0);
//! assert_eq!(seen.get(), 5);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

/// Identifier for a bound handler.
///
/// Returned by [`Relay::bind`] and used to unbind that exact handler later.
/// Identifiers are unique within one relay and are never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct HandlerId(u64);

/// A shared event handler.
pub type Handler<A> = Rc<dyn Fn(&A)>;

struct Entry<K, A> {
    id: HandlerId,
    key: K,
    handler: Handler<A>,
}

/// Publish/subscribe relay keyed by `K` carrying payloads of type `A`.
pub struct Relay<K, A> {
    entries: RefCell<Vec<Entry<K, A>>>,
    next_id: Cell<u64>,
}

impl<K, A> Default for Relay<K, A> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }
}

impl<K: core::fmt::Debug, A> core::fmt::Debug for Relay<K, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let entries = self.entries.borrow();
        f.debug_struct("Relay")
            .field("handlers", &entries.len())
            .field(
                "keys",
                &entries.iter().map(|e| &e.key).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq, A> Relay<K, A> {
    /// Create an empty relay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `key`, returning its identifier.
    pub fn bind(&self, key: K, handler: impl Fn(&A) + 'static) -> HandlerId {
        self.bind_shared(key, Rc::new(handler))
    }

    /// Bind an already shared handler to `key`.
    ///
    /// The same handler may be bound under several keys; each binding gets its own identifier.
    pub fn bind_shared(&self, key: K, handler: Handler<A>) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push(Entry { id, key, handler });
        id
    }

    /// Unbind the handler `id` from `key`.
    ///
    /// Returns `false` if no such binding exists (including when `id` was bound under another key).
    pub fn unbind(&self, key: K, id: HandlerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.key == key));
        entries.len() != before
    }

    /// Unbind every handler registered for `key`.
    pub fn unbind_key(&self, key: K) {
        self.entries.borrow_mut().retain(|e| e.key != key);
    }

    /// Unbind every handler.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Returns true if `id` is still bound (under any key).
    pub fn is_bound(&self, id: HandlerId) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    /// Number of handlers currently bound to `key`.
    pub fn handler_count(&self, key: K) -> usize {
        self.entries.borrow().iter().filter(|e| e.key == key).count()
    }

    /// Invoke every handler bound to `key` with `args`, in registration order.
    ///
    /// Returns the number of handlers actually invoked.
    pub fn trigger(&self, key: K, args: &A) -> usize {
        let snapshot: Vec<(HandlerId, Handler<A>)> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.key == key)
            .map(|e| (e.id, Rc::clone(&e.handler)))
            .collect();
        let mut invoked = 0;
        for (id, handler) in snapshot {
            // Skip handlers unbound by an earlier handler of this dispatch.
            if !self.is_bound(id) {
                continue;
            }
            handler(args);
            invoked += 1;
        }
        invoked
    }
}
