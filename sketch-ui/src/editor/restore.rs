// Deferred snapshot restores.
// Undo moves the history cursor right away; painting the snapshot back waits until the host
// drives the queue. Only the newest request is ever kept, so rapid undos supersede each other.

use sketch_core::Snapshot;
use tracing::{debug, trace};

/// Identifies one scheduled restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RestoreTicket(pub u64);

#[derive(Debug, Clone)]
pub struct RestoreJob {
    pub ticket: RestoreTicket,
    pub snapshot: Snapshot,
}

#[derive(Debug, Default)]
pub struct RestoreQueue {
    next_ticket: u64,
    pending: Option<RestoreJob>,
}

impl RestoreQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `snapshot`, replacing whatever was pending.
    pub fn schedule(&mut self, snapshot: Snapshot) -> RestoreTicket {
        let ticket = RestoreTicket(self.next_ticket);
        self.next_ticket += 1;

        if let Some(old) = self.pending.replace(RestoreJob { ticket, snapshot }) {
            debug!(
                superseded = old.ticket.0,
                by = ticket.0,
                "Pending restore superseded"
            );
        } else {
            trace!(ticket = ticket.0, "Restore scheduled");
        }
        ticket
    }

    /// Hand the pending job to whoever will paint it.
    pub fn take(&mut self) -> Option<RestoreJob> {
        self.pending.take()
    }

    pub fn cancel(&mut self) -> Option<RestoreTicket> {
        let cancelled = self.pending.take().map(|job| job.ticket);
        if let Some(ticket) = cancelled {
            debug!(ticket = ticket.0, "Restore cancelled");
        }
        cancelled
    }

    pub fn pending(&self) -> Option<RestoreTicket> {
        self.pending.as_ref().map(|job| job.ticket)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
