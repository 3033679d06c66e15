//! Reference-counted provider sessions
//!
//! Some providers keep exactly one session per client (INWX stores it in
//! the HTTP cookie jar). Concurrent `present` / `cleanup` calls on one
//! client then share that session:
//!
//! ```text
//! acquire: holders 0 → 1  ──► remote login
//!          holders n → n+1    (reuse)
//! release: holders n → n-1    (keep)
//!          holders 1 → 0  ──► remote logout
//! ```
//!
//! The state lock is held across the remote login and logout, so a caller
//! arriving while the last holder is logging out waits and then opens a
//! fresh session.

use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::LoginInfo;

#[derive(Debug, Default)]
struct SessionState {
    holders: usize,
    info: Option<LoginInfo>,
}

/// One provider session shared by all concurrent holders
#[derive(Debug, Default)]
pub struct SharedSession {
    state: Mutex<SessionState>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the session, opening it with `open` if nobody holds it
    ///
    /// A failing `open` leaves the session closed and the holder count
    /// unchanged.
    pub async fn acquire<F, Fut>(&self, open: F) -> Result<LoginInfo>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<LoginInfo>>,
    {
        let mut state = self.state.lock().await;

        if state.holders == 0 {
            state.info = Some(open().await?);
            debug!("Provider session opened");
        }
        state.holders += 1;

        Ok(state.info.clone().unwrap_or_default())
    }

    /// Leave the session, closing it with `close` if this was the last holder
    ///
    /// The holder is released even when `close` fails.
    pub async fn release<F, Fut>(&self, close: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut state = self.state.lock().await;

        match state.holders {
            0 => Err(Error::auth("no open session to release")),
            1 => {
                state.holders = 0;
                state.info = None;
                debug!("Last holder left, closing provider session");
                close().await
            }
            _ => {
                state.holders -= 1;
                Ok(())
            }
        }
    }

    /// Number of callers currently holding the session
    pub async fn holders(&self) -> usize {
        self.state.lock().await.holders
    }
}
