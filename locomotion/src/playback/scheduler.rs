//! Single-slot cancellable tick scheduling.
//!
//! At most one tick is pending at any time. Scheduling a new tick cancels the
//! previous one first, and every tick carries a sequence number so a callback
//! that raced past its cancellation can tell it is stale.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

struct PendingTick {
    sequence: u64,
    cancellation: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the one pending playback tick.
///
/// Must be used from within a tokio runtime; ticks are spawned tasks that
/// sleep for the requested delay.
#[derive(Default)]
pub struct TickScheduler {
    pending: Option<PendingTick>,
    sequence: u64,
}

impl std::fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickScheduler")
            .field("pending", &self.pending.as_ref().map(|p| p.sequence))
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl TickScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `on_tick` to run after `delay`, replacing any pending tick.
    ///
    /// The callback receives the tick's sequence number, which it should pass
    /// to [`take_if_current`](Self::take_if_current) before acting.
    pub fn schedule<F>(&mut self, delay: Duration, on_tick: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();

        let sequence = self.sequence;
        let cancellation = CancellationToken::new();
        let token = cancellation.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => on_tick(sequence),
            }
        });

        trace!(sequence, delay_ms = delay.as_millis() as u64, "Tick scheduled");
        self.pending = Some(PendingTick {
            sequence,
            cancellation,
            handle,
        });
        sequence
    }

    /// Cancel the pending tick, if any.
    ///
    /// Always advances the sequence so a tick already past its sleep is
    /// recognised as stale.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancellation.cancel();
            trace!(sequence = pending.sequence, "Tick cancelled");
        }
        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Claim a fired tick.
    ///
    /// Returns true and clears the slot if `sequence` is the pending tick;
    /// false for cancelled or superseded ticks.
    pub fn take_if_current(&mut self, sequence: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.sequence == sequence => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a tick is pending.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
