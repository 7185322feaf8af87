//! Envelope dispatch.
//!
//! The dispatcher is the single consumer of a connection's envelope stream.
//! Handlers run one at a time, in arrival order, to completion. The only
//! await point is waiting for the next envelope, so closing never interrupts
//! a handler halfway through a mutation.

use crate::{ClientError, Registry};
use futures_util::{Stream, StreamExt};
use std::sync::Arc;
use tanglefeed_core::Envelope;
use tokio::sync::watch;

/// Dispatcher lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No connection yet.
    Idle,
    /// Consuming the stream.
    Active,
    /// Stream ended, failed or was closed. Terminal.
    Closed,
}

/// What happened to one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler took it.
    Delivered,
    /// Nobody is registered for the tag.
    Unroutable,
    /// The handler rejected the payload.
    Rejected,
    /// The dispatcher is not active.
    Dropped,
}

/// Why [`Dispatcher::run`] returned.
///
/// The first reason is kept; running a closed dispatcher again reports it
/// unchanged.
#[derive(Debug, Clone)]
pub enum CloseReason {
    /// The transport ended the stream.
    EndOfStream,
    /// [`CloseHandle::close`] or [`Dispatcher::close`] was called.
    Requested,
    /// The transport failed.
    Transport(Arc<ClientError>),
}

/// Per-session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: u64,
    pub unroutable: u64,
    pub rejected: u64,
    pub malformed: u64,
}

/// Closes a dispatcher from outside its task.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CloseHandle {
    /// Request close. A running dispatcher stops before the next envelope.
    pub fn close(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Routes envelopes to the handlers in its [`Registry`].
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
    state: DispatcherState,
    stats: DispatchStats,
    close_tx: Arc<watch::Sender<bool>>,
    close_rx: watch::Receiver<bool>,
    close_reason: Option<CloseReason>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        let (close_tx, close_rx) = watch::channel(false);
        Self {
            registry,
            state: DispatcherState::Idle,
            stats: DispatchStats::default(),
            close_tx: Arc::new(close_tx),
            close_rx,
            close_reason: None,
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Why the first [`run`](Self::run) ended, once one has.
    pub fn close_reason(&self) -> Option<&CloseReason> {
        self.close_reason.as_ref()
    }

    /// The registry, for registering handlers between dispatches.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            tx: Arc::clone(&self.close_tx),
        }
    }

    /// Move from `Idle` to `Active`. Has no effect in any other state.
    pub fn start(&mut self) {
        if self.state == DispatcherState::Idle {
            tracing::debug!("dispatcher active");
            self.state = DispatcherState::Active;
        }
    }

    /// Move to `Closed`. No handler runs after this.
    pub fn close(&mut self) {
        self.close_tx.send_replace(true);
        self.sync_close();
    }

    fn sync_close(&mut self) {
        if *self.close_rx.borrow() && self.state != DispatcherState::Closed {
            tracing::debug!(?self.stats, "dispatcher closed");
            self.state = DispatcherState::Closed;
        }
    }

    /// Route one envelope to its handler.
    ///
    /// Unknown tags and undecodable payloads are counted and skipped; neither
    /// affects later envelopes.
    pub fn dispatch(&mut self, envelope: Envelope) -> Dispatch {
        self.sync_close();
        if self.state != DispatcherState::Active {
            return Dispatch::Dropped;
        }

        let Some(handler) = self.registry.lookup(envelope.tag) else {
            tracing::trace!(tag = %envelope.tag, "no handler, dropping envelope");
            self.stats.unroutable += 1;
            return Dispatch::Unroutable;
        };

        match handler(envelope.payload.as_slice()) {
            Ok(()) => {
                self.stats.delivered += 1;
                Dispatch::Delivered
            }
            Err(e) => {
                tracing::warn!(
                    tag = %envelope.tag,
                    len = envelope.payload_len(),
                    error = %e,
                    "dropping undecodable payload"
                );
                self.stats.rejected += 1;
                Dispatch::Rejected
            }
        }
    }

    /// Consume `envelopes` until it ends, fails, or the dispatcher is closed.
    ///
    /// Malformed frames are logged and skipped. Any other stream error closes
    /// the dispatcher and is returned in the [`CloseReason`].
    pub async fn run<S>(&mut self, envelopes: S) -> CloseReason
    where
        S: Stream<Item = Result<Envelope, ClientError>>,
    {
        let mut envelopes = std::pin::pin!(envelopes);
        self.start();

        let reason = loop {
            self.sync_close();
            if self.state == DispatcherState::Closed {
                break self.close_reason.clone().unwrap_or(CloseReason::Requested);
            }

            let mut close_rx = self.close_rx.clone();
            let next = tokio::select! {
                biased;
                _ = close_rx.changed() => {
                    self.sync_close();
                    break CloseReason::Requested;
                }
                next = envelopes.next() => next,
            };

            match next {
                Some(Ok(envelope)) => {
                    self.dispatch(envelope);
                }
                Some(Err(e)) if !e.is_fatal() => {
                    tracing::warn!(error = %e, "skipping malformed frame");
                    self.stats.malformed += 1;
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "transport failed");
                    break CloseReason::Transport(Arc::new(e));
                }
                None => break CloseReason::EndOfStream,
            }
        };

        let reason = self.close_reason.get_or_insert(reason).clone();
        self.close();
        tracing::info!(?reason, ?self.stats, "dispatch finished");
        reason
    }
}
