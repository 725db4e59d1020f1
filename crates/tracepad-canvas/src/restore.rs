//! Single-slot register for pending snapshot restores.
//!
//! Decoding a snapshot happens off the session lock. While it runs, the
//! register holds the one restore that is allowed to land. A newer undo
//! replaces the slot, so the older decode is discarded when it finishes.

use tiny_skia::Pixmap;
use tracepad_core::AssetError;

use crate::surface::Snapshot;

/// A restore waiting for its snapshot to be decoded.
#[derive(Debug, Clone)]
pub struct RestoreTicket {
    generation: u64,
    snapshot: Snapshot,
}

impl RestoreTicket {
    /// Identifies this restore in the register.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Decodes the snapshot. Safe to call without holding the session.
    pub fn decode(&self) -> Result<Pixmap, AssetError> {
        self.snapshot.decode()
    }
}

/// Result of finishing a restore.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The surface now shows the restored snapshot.
    Applied,
    /// A newer restore, or a settle before a mutation, took the slot first.
    Superseded,
    /// Undo was at the history floor.
    NothingToUndo,
    /// Decoding or applying failed; the surface was left unchanged.
    Failed { reason: String },
}

/// Holds at most one pending restore.
#[derive(Debug, Default)]
pub struct RestoreRegister {
    last_generation: u64,
    pending: Option<RestoreTicket>,
}

impl RestoreRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `snapshot` the pending restore, replacing any older one.
    pub fn schedule(&mut self, snapshot: Snapshot) -> RestoreTicket {
        self.last_generation += 1;
        let ticket = RestoreTicket {
            generation: self.last_generation,
            snapshot,
        };
        if let Some(stale) = self.pending.replace(ticket.clone()) {
            tracing::debug!(
                stale = stale.generation,
                current = ticket.generation,
                "Pending restore superseded"
            );
        }
        ticket
    }

    /// Removes and returns the pending restore if it is still `generation`.
    pub fn take_if_current(&mut self, generation: u64) -> Option<RestoreTicket> {
        match &self.pending {
            Some(ticket) if ticket.generation == generation => self.pending.take(),
            _ => None,
        }
    }

    /// Removes and returns whatever restore is pending.
    pub fn take_pending(&mut self) -> Option<RestoreTicket> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
