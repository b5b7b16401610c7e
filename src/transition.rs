//! One owned timer per animated transition.
//!
//! Controllers never sleep. Entering a transient state arms the slot and hands the host a
//! [`Pending`] to schedule; the host reports back with the ticket when the delay elapses.
//! Arming again replaces the previous ticket, so a timer that fires late for a superseded
//! transition is recognised and ignored.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the host has to schedule the pending transition"]
pub struct Pending {
    pub ticket: Ticket,
    pub after: Duration,
}

#[derive(Debug, Default)]
pub struct TransitionSlot {
    issued: u64,
    armed: Option<Ticket>,
}

impl TransitionSlot {
    pub fn arm(&mut self, after: Duration) -> Pending {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.armed = Some(ticket);
        Pending { ticket, after }
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Consumes the armed ticket if `ticket` is it.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.armed == Some(ticket) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}
