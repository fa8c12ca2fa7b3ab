use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Live dispatch function supplied by the host store.
pub type DispatchFn<A> = Arc<dyn Fn(A) + Send + Sync>;

/// Live state reader supplied by the host store.
pub type GetStateFn<S> = Arc<dyn Fn() -> S + Send + Sync>;

/// Marker placed in a `Run` argument list; replaced by the live state reader
/// when the command is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GetState;

/// Marker placed in a `Run` argument list; replaced by the live dispatch
/// function when the command is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatch;

/// Positional argument of a `Run` command, as declared.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Arg {
    Value(Value),
    GetState,
    Dispatch,
}

impl Arg {
    pub fn value(value: impl Into<Value>) -> Self {
        Arg::Value(value.into())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<GetState> for Arg {
    fn from(_: GetState) -> Self {
        Arg::GetState
    }
}

impl From<Dispatch> for Arg {
    fn from(_: Dispatch) -> Self {
        Arg::Dispatch
    }
}

/// Argument after marker substitution, as seen by the `Run` function.
pub enum ResolvedArg<A, S> {
    Value(Value),
    GetState(GetStateFn<S>),
    Dispatch(DispatchFn<A>),
}

impl<A, S> Clone for ResolvedArg<A, S> {
    fn clone(&self) -> Self {
        match self {
            ResolvedArg::Value(v) => ResolvedArg::Value(v.clone()),
            ResolvedArg::GetState(g) => ResolvedArg::GetState(Arc::clone(g)),
            ResolvedArg::Dispatch(d) => ResolvedArg::Dispatch(Arc::clone(d)),
        }
    }
}

impl<A, S> std::fmt::Debug for ResolvedArg<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedArg::Value(v) => write!(f, "Value({v})"),
            ResolvedArg::GetState(_) => f.write_str("GetState(<fn>)"),
            ResolvedArg::Dispatch(_) => f.write_str("Dispatch(<fn>)"),
        }
    }
}

/// Ordered arguments handed to a `Run` function.
pub struct Args<A, S>(Vec<ResolvedArg<A, S>>);

impl<A, S> Args<A, S> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResolvedArg<A, S>> {
        self.0.get(index)
    }

    /// Plain value at `index`, if that position holds one.
    pub fn value(&self, index: usize) -> Option<&Value> {
        match self.0.get(index) {
            Some(ResolvedArg::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// State reader injected at `index`, if that position held `GetState`.
    pub fn get_state(&self, index: usize) -> Option<&GetStateFn<S>> {
        match self.0.get(index) {
            Some(ResolvedArg::GetState(g)) => Some(g),
            _ => None,
        }
    }

    /// Dispatch function injected at `index`, if that position held `Dispatch`.
    pub fn dispatch(&self, index: usize) -> Option<&DispatchFn<A>> {
        match self.0.get(index) {
            Some(ResolvedArg::Dispatch(d)) => Some(d),
            _ => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedArg<A, S>> {
        self.0.iter()
    }
}

impl<A: 'static, S: 'static> Args<A, S> {
    /// Rewrap injected dispatch functions so a function written against the
    /// inner action type `B` can dispatch into a host that speaks `A`.
    pub(crate) fn map_dispatch<B: 'static>(
        self,
        lift: &Arc<dyn Fn(B) -> A + Send + Sync>,
    ) -> Args<B, S> {
        Args(
            self.0
                .into_iter()
                .map(|arg| match arg {
                    ResolvedArg::Value(v) => ResolvedArg::Value(v),
                    ResolvedArg::GetState(g) => ResolvedArg::GetState(g),
                    ResolvedArg::Dispatch(d) => {
                        let lift = Arc::clone(lift);
                        ResolvedArg::Dispatch(Arc::new(move |b: B| d(lift(b))))
                    }
                })
                .collect(),
        )
    }
}

impl<A, S> std::fmt::Debug for Args<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Substitute the live `dispatch`/`get_state` for marker arguments.
pub(crate) fn resolve<A, S>(
    args: Vec<Arg>,
    dispatch: &DispatchFn<A>,
    get_state: &GetStateFn<S>,
) -> Args<A, S> {
    Args(
        args.into_iter()
            .map(|arg| match arg {
                Arg::Value(v) => ResolvedArg::Value(v),
                Arg::GetState => ResolvedArg::GetState(Arc::clone(get_state)),
                Arg::Dispatch => ResolvedArg::Dispatch(Arc::clone(dispatch)),
            })
            .collect(),
    )
}
