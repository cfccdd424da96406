//! Session boundary for the external identity collaborator.
//!
//! The rest of the system is session-agnostic: the parser and generation
//! client never see identity. Surfaces that gate persistence reads/writes
//! hold a [`SessionHub`] (or resolve a [`UserId`] from the environment)
//! and subscribe to changes through a scoped handle that releases itself
//! on drop, whatever the exit path.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_stream::Stream;
use tokio_stream::wrappers::WatchStream;
use uuid::Uuid;

/// Environment variable holding the acting user's id.
pub const USER_ENV: &str = "TRAILHEAD_USER_ID";

/// Identity of an authenticated user, as issued by the external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Resolve the acting user from the environment, if set and well-formed.
pub fn user_from_env() -> Option<UserId> {
    let raw = std::env::var(USER_ENV).ok()?;
    Uuid::parse_str(raw.trim()).ok().map(UserId)
}

/// Holder of the current (nullable) session identity.
///
/// Sign-in state changes are broadcast to every live [`SessionEvents`]
/// subscriber. Subscribers may outlive the hub or drop before it; neither
/// direction leaks or dangles.
#[derive(Debug)]
pub struct SessionHub {
    tx: watch::Sender<Option<UserId>>,
}

impl SessionHub {
    /// A hub with no signed-in user.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// The current identity, if any.
    pub fn current(&self) -> Option<UserId> {
        *self.tx.borrow()
    }

    /// Record a sign-in and notify subscribers.
    pub fn sign_in(&self, user: UserId) {
        self.tx.send_replace(Some(user));
    }

    /// Record a sign-out and notify subscribers.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// Acquire a scoped subscription to session changes.
    ///
    /// The stream yields the state at subscription time, then every
    /// subsequent change, and ends when the hub is dropped. Dropping the
    /// handle unsubscribes; nothing is retained on either side.
    pub fn subscribe(&self) -> SessionEvents {
        SessionEvents {
            inner: WatchStream::new(self.tx.subscribe()),
        }
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A scoped subscription to session changes.
pub struct SessionEvents {
    inner: WatchStream<Option<UserId>>,
}

impl Stream for SessionEvents {
    type Item = Option<UserId>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEvents").finish_non_exhaustive()
    }
}
