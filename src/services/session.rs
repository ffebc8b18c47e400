// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session holder: the currently signed-in identity, if any.
//!
//! The holder is passed explicitly to whatever needs the viewer identity.
//! The auth service publishes sign-in and sign-out through it, and
//! subscribers observe every change until they drop their subscription.

use crate::models::Identity;
use std::sync::Arc;
use tokio::sync::watch;

/// Observable identity value.
#[derive(Clone)]
pub struct SessionHolder {
    tx: Arc<watch::Sender<Option<Identity>>>,
}

impl Default for SessionHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHolder {
    /// A session with nobody signed in.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// A session that starts out signed in as `identity`.
    pub fn signed_in(identity: Identity) -> Self {
        let session = Self::new();
        session.set(Some(identity));
        session
    }

    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the identity and notify subscribers.
    pub fn set(&self, identity: Option<Identity>) {
        let uid = identity.as_ref().map(|i| i.uid.clone());
        self.tx.send_replace(identity);
        tracing::debug!(uid = ?uid, "Session identity changed");
    }

    /// Reset to signed out.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Start observing identity changes. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Handle returned by [`SessionHolder::subscribe`].
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Identity>>,
}

impl SessionSubscription {
    /// Identity as of the last observed change.
    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change and return the new identity.
    ///
    /// Returns `None` once the holder itself is gone.
    pub async fn changed(&mut self) -> Option<Option<Identity>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Stop observing.
    pub fn unsubscribe(self) {}
}
