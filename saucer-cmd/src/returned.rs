use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Asynchronous result of a `Run` function. `Err` carries the rejection payload.
pub struct Deferred(BoxFuture<'static, Result<Value, Value>>);

impl Deferred {
    pub fn new(fut: impl Future<Output = Result<Value, Value>> + Send + 'static) -> Self {
        Deferred(fut.boxed())
    }

    /// Already-settled success.
    pub fn resolved(value: impl Into<Value>) -> Self {
        Deferred::new(futures::future::ready(Ok(value.into())))
    }

    /// Already-settled failure.
    pub fn rejected(reason: impl Into<Value>) -> Self {
        Deferred::new(futures::future::ready(Err(reason.into())))
    }
}

impl Future for Deferred {
    type Output = Result<Value, Value>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().0.poll_unpin(cx)
    }
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// What a `Run` function handed back: a plain value or a deferred one.
#[derive(Debug)]
pub enum Returned {
    Value(Value),
    Deferred(Deferred),
}

impl Returned {
    pub fn value(value: impl Into<Value>) -> Self {
        Returned::Value(value.into())
    }

    /// A function that returns nothing.
    pub fn unit() -> Self {
        Returned::Value(Value::Null)
    }

    pub fn deferred(fut: impl Future<Output = Result<Value, Value>> + Send + 'static) -> Self {
        Returned::Deferred(Deferred::new(fut))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Returned::Deferred(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Returned::Value(v) => Some(v),
            Returned::Deferred(_) => None,
        }
    }

    pub fn into_deferred(self) -> Option<Deferred> {
        match self {
            Returned::Deferred(d) => Some(d),
            Returned::Value(_) => None,
        }
    }
}

impl From<Value> for Returned {
    fn from(value: Value) -> Self {
        Returned::Value(value)
    }
}

impl From<Deferred> for Returned {
    fn from(deferred: Deferred) -> Self {
        Returned::Deferred(deferred)
    }
}
