//! Live subscriptions.
//!
//! A collection subscription pushes the whole matching set on every change;
//! a point subscription pushes the single document (or `None` once it is
//! deleted). The current state is pushed once immediately on subscribe.
//! Dropping the [`Subscription`] unsubscribes.

use crate::Document;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEvent {
    /// Every document currently matching a collection subscription
    Collection(Vec<Document>),

    /// The watched document, `None` once it no longer exists
    Document(Option<Document>),
}

impl SubscriptionEvent {
    /// The documents carried by this event
    pub fn documents(&self) -> Vec<&Document> {
        match self {
            SubscriptionEvent::Collection(docs) => docs.iter().collect(),
            SubscriptionEvent::Document(doc) => doc.iter().collect(),
        }
    }
}

type Unsubscribe = Box<dyn FnOnce() + Send>;

pub struct Subscription {
    id: u64,
    events: UnboundedReceiverStream<SubscriptionEvent>,
    unsubscribe: Option<Unsubscribe>,
}

impl Subscription {
    pub fn new(
        id: u64,
        receiver: mpsc::UnboundedReceiver<SubscriptionEvent>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            id,
            events: UnboundedReceiverStream::new(receiver),
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next pushed change
    pub async fn recv(&mut self) -> Option<SubscriptionEvent> {
        self.events.next().await
    }

    /// Take an already delivered change without waiting
    pub fn try_recv(&mut self) -> Option<SubscriptionEvent> {
        self.events.as_mut().try_recv().ok()
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Stream for Subscription {
    type Item = SubscriptionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.events).poll_next(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
