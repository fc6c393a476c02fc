//! Correlation identifier carried by each request and its detached work.
//!
//! The trace middleware assigns a [`TraceId`] per request and runs the
//! handler inside [`TraceId::scope`]. Follow, unfollow and account deletion
//! finish on spawned tasks, which do not inherit task-locals, so those
//! spawns go through [`TraceId::spawn_in_scope`] to keep error payloads and
//! log lines tied to the originating request.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Identifier echoed in the `trace-id` header and in error bodies.
///
/// # Examples
/// ```
/// use social_backend::TraceId;
///
/// let id: TraceId = "6f1d4c1e-93a5-4a53-9d51-0f1b6f6b1a2c".parse().expect("uuid");
/// assert_eq!(id.to_string(), "6f1d4c1e-93a5-4a53-9d51-0f1b6f6b1a2c");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Spawn `task`, carrying over the caller's identifier when one is set.
    pub fn spawn_in_scope<Fut>(task: Fut) -> JoinHandle<Fut::Output>
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        match Self::current() {
            Some(trace_id) => tokio::spawn(Self::scope(trace_id, task)),
            None => tokio::spawn(task),
        }
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
