use futures::future::{join_all, BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Failures that escape interpretation.
#[derive(Debug, Error)]
pub enum CmdError {
    /// A `Run` function failed and no fail action creator was configured.
    #[error("run `{name}` failed with no fail action creator: {payload}")]
    Unhandled {
        name: &'static str,
        payload: Value,
        /// Batch siblings that were already running when the failure
        /// happened.
        started: Started,
    },
}

impl CmdError {
    pub(crate) fn unhandled(name: &'static str, payload: Value) -> Self {
        CmdError::Unhandled {
            name,
            payload,
            started: Started::default(),
        }
    }

    pub fn payload(&self) -> &Value {
        match self {
            CmdError::Unhandled { payload, .. } => payload,
        }
    }

    /// Detach the work that was in flight when this error was raised. Await
    /// the result to let it settle; the actions it produces are discarded.
    pub fn take_started(&mut self) -> Started {
        match self {
            CmdError::Unhandled { started, .. } => std::mem::take(started),
        }
    }

    pub(crate) fn keep_running<T: 'static, F>(&mut self, pending: impl IntoIterator<Item = F>)
    where
        F: Future<Output = T> + Send + 'static,
    {
        match self {
            CmdError::Unhandled { started, .. } => {
                started.0.extend(pending.into_iter().map(|p| p.map(drop).boxed()))
            }
        }
    }
}

/// Effects that were already started when a sibling failed synchronously.
#[derive(Default)]
pub struct Started(Vec<BoxFuture<'static, ()>>);

impl Started {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drive every started effect to completion.
    pub async fn settle(self) {
        join_all(self.0).await;
    }
}

impl fmt::Debug for Started {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Started({})", self.0.len())
    }
}
