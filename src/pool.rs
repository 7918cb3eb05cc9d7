use std::{collections::VecDeque, sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

use crate::error::{Result, SpotifyError};

/// Upper bound of requests a single pooled session is sized for.
pub const SESSION_REQUEST_CEILING: usize = 500;

/// One pooled HTTP session.
///
/// `reqwest::Client` is reference counted internally, so handing out clones
/// shares the same connection pool. Clones also share `slots`, which caps the
/// requests in flight on this session at the pool's `request_limit`.
#[derive(Debug, Clone)]
pub struct PooledSession {
    pub index: usize,
    pub client: Client,
    slots: Arc<Semaphore>,
}

impl PooledSession {
    /// Waits for a free connection slot on this session.
    ///
    /// The slot is released when the returned permit is dropped.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Configuration`] if the pool was closed while waiting.
    pub async fn acquire_slot(&self) -> Result<OwnedSemaphorePermit> {
        self.slots.clone().acquire_owned().await.map_err(|_| {
            SpotifyError::Configuration("The connection pool was closed".to_string())
        })
    }

    /// Connection slots currently free on this session.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }
}

/// A ring of HTTP sessions sized to an overall request budget and served
/// round-robin.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    sessions: VecDeque<PooledSession>,
    request_limit: usize,
    timeout: Option<Duration>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions needed for `request_limit` concurrent requests.
    pub fn sessions_for(request_limit: usize) -> usize {
        request_limit.div_ceil(SESSION_REQUEST_CEILING)
    }

    /// Replaces the pool with `ceil(request_limit / 500)` fresh sessions.
    ///
    /// Any previous sessions are closed first.
    ///
    /// # Arguments
    ///
    /// * `timeout_secs` - Total time allowed per request; `0` means no limit
    /// * `request_limit` - Overall request budget. Each session runs at most
    ///   this many requests at once and keeps as many idle connections.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::Transport`] if the HTTP client cannot be built (TLS
    /// backend initialisation).
    pub fn create(&mut self, timeout_secs: u64, request_limit: usize) -> Result<()> {
        if !self.sessions.is_empty() {
            self.close();
        }

        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
        let count = Self::sessions_for(request_limit);

        let mut sessions = VecDeque::with_capacity(count);
        for index in 0..count {
            let mut builder = Client::builder().pool_max_idle_per_host(request_limit);
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder.build().map_err(SpotifyError::Transport)?;
            sessions.push_back(PooledSession {
                index,
                client,
                slots: Arc::new(Semaphore::new(request_limit)),
            });
        }

        self.sessions = sessions;
        self.request_limit = request_limit;
        self.timeout = timeout;

        info!(
            sessions = count,
            request_limit, timeout_secs, "connection pool created"
        );
        Ok(())
    }

    /// Drops every session. Safe to call on an empty pool.
    ///
    /// Requests still waiting for a connection slot fail; requests already in
    /// flight finish on their own clone of the session.
    pub fn close(&mut self) {
        if self.sessions.is_empty() {
            return;
        }

        let closed = self.sessions.len();
        for session in &self.sessions {
            session.slots.close();
        }
        self.sessions.clear();
        self.timeout = None;
        info!(sessions = closed, "connection pool closed");
    }

    /// Rotates the ring by one and returns its new head.
    pub fn acquire_next(&mut self) -> Option<PooledSession> {
        if self.sessions.is_empty() {
            return None;
        }

        self.sessions.rotate_right(1);
        let session = self.sessions.front().cloned();
        if let Some(s) = &session {
            debug!(session = s.index, "acquired pooled session");
        }
        session
    }

    /// Index of the session at the front of the ring. Once anything was
    /// acquired this is the session handed out last.
    pub fn head(&self) -> Option<usize> {
        self.sessions.front().map(|s| s.index)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn request_limit(&self) -> usize {
        self.request_limit
    }

    /// Per-request timeout, `None` when unlimited or the pool is closed.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
