use crate::args::{self, DispatchFn, GetStateFn};
use crate::cmd::{Cmd, MapCmd, Run};
use crate::error::CmdError;
use crate::returned::Returned;
use futures::future::{self, join_all, BoxFuture, FutureExt, TryFutureExt};

/// Actions still being produced by an interpreted command. The output is the
/// ordered list the host should dispatch.
pub type Pending<A> = BoxFuture<'static, Result<Vec<A>, CmdError>>;

/// Execute `cmd` against the live `dispatch`/`get_state`.
///
/// * `Err` - a `Run` function failed synchronously with nothing to route the
///   failure to; nothing after it in the tree was started. Batch siblings
///   that were already running travel in the error; see
///   [`CmdError::take_started`].
/// * `Ok(None)` - nothing to await and nothing to dispatch.
/// * `Ok(Some(pending))` - resolves to the actions to dispatch, in order.
///
/// The interpreter never calls `dispatch` itself; it only hands it to `Run`
/// functions that asked for it.
pub fn interpret<A, S>(
    cmd: Cmd<A, S>,
    dispatch: &DispatchFn<A>,
    get_state: &GetStateFn<S>,
) -> Result<Option<Pending<A>>, CmdError>
where
    A: Send + 'static,
    S: 'static,
{
    match cmd {
        Cmd::None => Ok(None),
        Cmd::Action(action) => Ok(Some(future::ok(vec![action]).boxed())),
        Cmd::Run(run) => interpret_run(run, dispatch, get_state),
        Cmd::Batch(cmds) => interpret_batch(cmds, dispatch, get_state),
        Cmd::Sequence(cmds) => interpret_sequence(cmds, dispatch, get_state),
        Cmd::Map(map) => interpret_map(map, dispatch, get_state),
    }
}

fn interpret_run<A, S>(
    run: Run<A, S>,
    dispatch: &DispatchFn<A>,
    get_state: &GetStateFn<S>,
) -> Result<Option<Pending<A>>, CmdError>
where
    A: Send + 'static,
    S: 'static,
{
    let Run {
        func,
        name,
        args,
        success_action_creator: on_success,
        fail_action_creator: on_fail,
        force_sync,
    } = run;

    tracing::trace!(target: "saucer-cmd::Run", "Run({})", name);
    let returned = match func(args::resolve(args, dispatch, get_state)) {
        Ok(returned) => returned,
        Err(payload) => {
            let Some(on_fail) = on_fail else {
                return Err(CmdError::unhandled(name, payload));
            };
            tracing::debug!(target: "saucer-cmd::Run", "Run({}) failed: {}", name, payload);
            return Ok(Some(future::ok(vec![on_fail(payload)]).boxed()));
        }
    };

    // force_sync only reroutes the success path, so it needs a success creator
    // to mean anything; otherwise the deferred value is awaited as usual.
    let force_sync = force_sync && on_success.is_some();
    match returned {
        Returned::Deferred(deferred) if !force_sync => Ok(Some(
            async move {
                let action = match deferred.await {
                    Ok(value) => on_success.map(|creator| creator(Returned::Value(value))),
                    Err(reason) => {
                        tracing::debug!(
                            target: "saucer-cmd::Run",
                            "Run({}) rejected: {}",
                            name,
                            reason
                        );
                        on_fail.map(|creator| creator(reason))
                    }
                };
                Ok::<_, CmdError>(action.into_iter().collect())
            }
            .boxed(),
        )),
        returned => Ok(on_success.map(|creator| future::ok(vec![creator(returned)]).boxed())),
    }
}

fn interpret_batch<A, S>(
    cmds: Vec<Cmd<A, S>>,
    dispatch: &DispatchFn<A>,
    get_state: &GetStateFn<S>,
) -> Result<Option<Pending<A>>, CmdError>
where
    A: Send + 'static,
    S: 'static,
{
    let mut pending = Vec::with_capacity(cmds.len());
    for cmd in cmds {
        match interpret(cmd, dispatch, get_state) {
            Ok(Some(p)) => pending.push(p),
            Ok(None) => {}
            Err(mut error) => {
                error.keep_running(pending);
                return Err(error);
            }
        }
    }
    if pending.is_empty() {
        return Ok(None);
    }

    Ok(Some(
        async move {
            let mut actions = Vec::new();
            for result in join_all(pending).await {
                actions.extend(result?);
            }
            Ok::<_, CmdError>(actions)
        }
        .boxed(),
    ))
}

fn interpret_sequence<A, S>(
    cmds: Vec<Cmd<A, S>>,
    dispatch: &DispatchFn<A>,
    get_state: &GetStateFn<S>,
) -> Result<Option<Pending<A>>, CmdError>
where
    A: Send + 'static,
    S: 'static,
{
    let mut remaining = cmds.into_iter();

    // Children that produce nothing settle on the spot and need no barrier.
    let first = loop {
        let Some(cmd) = remaining.next() else {
            return Ok(None);
        };
        if let Some(p) = interpret(cmd, dispatch, get_state)? {
            break p;
        }
    };

    let dispatch = dispatch.clone();
    let get_state = get_state.clone();
    Ok(Some(
        async move {
            let mut actions = first.await?;
            for cmd in remaining {
                if let Some(p) = interpret(cmd, &dispatch, &get_state)? {
                    actions.extend(p.await?);
                }
            }
            Ok::<_, CmdError>(actions)
        }
        .boxed(),
    ))
}

fn interpret_map<A, S>(
    map: MapCmd<A, S>,
    dispatch: &DispatchFn<A>,
    get_state: &GetStateFn<S>,
) -> Result<Option<Pending<A>>, CmdError>
where
    A: Send + 'static,
    S: 'static,
{
    let MapCmd { cmd, tagger, args } = map;
    let Some(inner) = interpret(*cmd, dispatch, get_state)? else {
        return Ok(None);
    };

    Ok(Some(
        inner
            .map_ok(move |actions| {
                actions
                    .into_iter()
                    .map(|action| tagger(args.as_slice(), action))
                    .collect::<Vec<_>>()
            })
            .boxed(),
    ))
}
