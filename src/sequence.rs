//! Request Sequencing
//!
//! Concurrent fetches against the same view state resolve last-issued-wins:
//! every fetch takes a [`Ticket`] before it starts, and its result is only
//! applied if no newer ticket was issued for that slot in the meantime.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifies one issued request for a [`LatestSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Sequence number of this ticket.
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Why a resolution was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// A newer request was issued after this one.
    Stale {
        /// The rejected ticket
        ticket: Ticket,
        /// The latest issued ticket
        latest: Ticket,
    },

    /// The slot was closed (its view was torn down).
    Closed,
}

#[derive(Debug)]
struct SlotState<T> {
    issued: u64,
    applied: Option<u64>,
    closed: bool,
    value: T,
}

/// A view-state slot that only accepts the latest issued request's result.
#[derive(Debug)]
pub struct LatestSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> LatestSlot<T> {
    /// Slot holding `initial` until the first accepted resolution.
    pub fn new(initial: T) -> Self {
        Self {
            state: Mutex::new(SlotState {
                issued: 0,
                applied: None,
                closed: false,
                value: initial,
            }),
        }
    }

    /// Issue a ticket for a request about to start.
    pub fn issue(&self) -> Ticket {
        let mut state = self.lock();

        state.issued += 1;

        Ticket(state.issued)
    }

    /// Apply `value` if `ticket` is still the latest issued ticket.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected::Stale`] if a newer ticket exists, or
    /// [`Rejected::Closed`] after [`LatestSlot::close`].
    pub fn resolve(&self, ticket: Ticket, value: T) -> Result<(), Rejected> {
        let mut state = self.lock();

        if state.closed {
            return Err(Rejected::Closed);
        }

        if ticket.0 != state.issued {
            return Err(Rejected::Stale {
                ticket,
                latest: Ticket(state.issued),
            });
        }

        state.value = value;
        state.applied = Some(ticket.0);

        Ok(())
    }

    /// Whether `ticket` is still the latest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        let state = self.lock();

        !state.closed && state.issued == ticket.0
    }

    /// Ticket of the last applied resolution.
    pub fn applied(&self) -> Option<Ticket> {
        self.lock().applied.map(Ticket)
    }

    /// Stop accepting resolutions.
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// Whether the slot was closed.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Read the current value.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().value)
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> LatestSlot<T> {
    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }
}

impl<T: Default> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
