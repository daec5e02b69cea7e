//! Per-session screening state.
//!
//! Each session owns its raw job description, current requirements and the
//! result set of its most recent run. Sessions are selected with the
//! `x-session-id` request header; requests without it share `default`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::screening::requirements::JobRequirements;
use crate::screening::scorer::ScoredResult;

pub const SESSION_HEADER: &str = "x-session-id";
pub const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone)]
pub struct Session {
    pub job_description: Option<String>,
    pub requirements: Option<JobRequirements>,
    /// Ranked results of the latest run, replaced wholesale on each run.
    pub results: Vec<ScoredResult>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            job_description: None,
            requirements: None,
            results: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against a snapshot of the session; unknown ids read as empty.
    pub async fn read<T>(&self, id: &str, f: impl FnOnce(&Session) -> T) -> T {
        let sessions = self.inner.read().await;
        match sessions.get(id) {
            Some(session) => f(session),
            None => f(&Session::default()),
        }
    }

    /// Mutates the session, creating it on first use.
    pub async fn update<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut sessions = self.inner.write().await;
        let session = sessions.entry(id.to_string()).or_default();
        let out = f(&mut *session);
        session.updated_at = Utc::now();
        out
    }
}

/// Session id taken from the `x-session-id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SESSION);
        Ok(SessionId(id.to_string()))
    }
}
