//! Asynchronous driver that serializes session events and talks to the backend.
//!
//! The driver owns the [`EditSession`] and a [`RemoteCollectionSource`]. Events
//! arrive over a Tokio channel and are processed one at a time; remote requests
//! produced by a transition are dispatched before the next event is read. Every
//! processed event publishes a fresh state snapshot on a watch channel.

use std::sync::Arc;

use sequencer_types::SequenceRecord;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::errors::SessionError;
use crate::remote::{RemoteCollectionSource, RemoteError, RemoteRequest};
use crate::session::{EditSession, EditSessionState, SessionAction};

/// Input to the driver loop.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A user action.
    Action(SessionAction),
    /// A collection pushed by the backend.
    RemotePush(Vec<SequenceRecord>),
    /// Pull the current collection from the source.
    Sync,
    /// Stop the loop and hand the session back.
    Shutdown,
}

pub struct SessionDriver {
    session: EditSession,
    source: Arc<dyn RemoteCollectionSource>,
    state_tx: watch::Sender<EditSessionState>,
}

impl SessionDriver {
    /// Creates a driver and the receiver on which it publishes state snapshots.
    pub fn new(session: EditSession, source: Arc<dyn RemoteCollectionSource>) -> (Self, watch::Receiver<EditSessionState>) {
        let (state_tx, state_rx) = watch::channel(session.snapshot());
        (
            Self {
                session,
                source,
                state_tx,
            },
            state_rx,
        )
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn into_session(self) -> EditSession {
        self.session
    }

    /// Fetches the source's collection and feeds it to the session.
    pub async fn sync(&mut self) -> Result<(), RemoteError> {
        let collection = self.source.collection().await?;
        debug!(records = collection.len(), "received collection");
        self.session.on_remote_collection(collection);
        self.publish();
        Ok(())
    }

    /// Processes a single event.
    ///
    /// Only a rejected apply is reported; remote failures are logged and left to
    /// the next reconciliation pass.
    pub async fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let outcome = match event {
            SessionEvent::Action(action) => match self.session.perform(action) {
                Ok(requests) => {
                    self.dispatch(requests).await;
                    Ok(())
                }
                Err(error) => Err(error),
            },
            SessionEvent::RemotePush(collection) => {
                self.session.on_remote_collection(collection);
                Ok(())
            }
            SessionEvent::Sync => {
                if let Err(error) = self.sync().await {
                    warn!(error = %error, "failed to fetch collection");
                }
                Ok(())
            }
            SessionEvent::Shutdown => Ok(()),
        };
        self.publish();
        outcome
    }

    /// Runs until [`SessionEvent::Shutdown`] or until every sender is dropped,
    /// then returns the session.
    pub async fn run(mut self, mut events: UnboundedReceiver<SessionEvent>) -> EditSession {
        while let Some(event) = events.recv().await {
            if matches!(event, SessionEvent::Shutdown) {
                debug!("session driver shutting down");
                break;
            }
            if let Err(error) = self.handle(event).await {
                warn!(error = %error, field = %error.field(), "action rejected");
            }
        }
        self.session
    }

    async fn dispatch(&mut self, requests: Vec<RemoteRequest>) {
        for request in requests {
            match request {
                RemoteRequest::Upsert(record) => {
                    let id = record.id.clone();
                    if let Err(error) = self.source.upsert(record).await {
                        warn!(id = %id, error = %error, "failed to upsert sequence");
                    }
                }
                RemoteRequest::Delete(id) => {
                    if let Err(error) = self.source.delete(&id).await {
                        warn!(id = %id, error = %error, "failed to delete sequence");
                    }
                }
                RemoteRequest::Refresh => {
                    if let Err(error) = self.refresh().await {
                        warn!(error = %error, "failed to refresh collection");
                    }
                }
            }
        }
    }

    async fn refresh(&mut self) -> Result<(), RemoteError> {
        self.source.refresh().await?;
        self.sync().await
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.session.snapshot());
    }
}
