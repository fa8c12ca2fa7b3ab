use crate::Observation;
use std::fmt::Debug;
use std::sync::Arc;

/// Observer function type
pub type ObserverFn<A> = Arc<dyn Fn(&Observation<'_, A>) + Send + Sync>;

/// No-op observer
pub fn no_op_observer<A: 'static>() -> ObserverFn<A> {
    Arc::new(|_observation: &Observation<'_, A>| {})
}

/// Tracing observer - logs to tracing crate
pub fn tracing_observer<A: Debug + 'static>() -> ObserverFn<A> {
    Arc::new(move |observation: &Observation<'_, A>| match observation {
        Observation::Effect { kind, .. } => {
            tracing::debug!(target: "saucer-cmd::Cmd", "Cmd({})", kind);
        }
        Observation::Dispatch { data, .. } => {
            tracing::info!(target: "saucer-cmd::Action", "Action({:?})", data);
        }
        Observation::Failure { error, .. } => {
            tracing::warn!(target: "saucer-cmd::Failure", "Failure({})", error);
        }
    })
}

/// Filter observer - include/exclude types
pub fn filter_observer<A: 'static>(
    wrapped: ObserverFn<A>,
    include_effects: bool,
    include_dispatches: bool,
    include_failures: bool,
) -> ObserverFn<A> {
    Arc::new(move |observation: &Observation<'_, A>| {
        let should_pass = match observation {
            Observation::Effect { .. } => include_effects,
            Observation::Dispatch { .. } => include_dispatches,
            Observation::Failure { .. } => include_failures,
        };

        if should_pass {
            wrapped(observation);
        }
    })
}

/// Filter observer with custom predicate
pub fn filter_with<A, F>(wrapped: ObserverFn<A>, predicate: F) -> ObserverFn<A>
where
    A: 'static,
    F: Fn(&Observation<'_, A>) -> bool + Send + Sync + 'static,
{
    Arc::new(move |observation: &Observation<'_, A>| {
        if predicate(observation) {
            wrapped(observation);
        }
    })
}

/// Tee observer - call multiple observers
pub fn tee_observer<A: 'static>(observers: Vec<ObserverFn<A>>) -> ObserverFn<A> {
    Arc::new(move |observation: &Observation<'_, A>| {
        for observer in &observers {
            observer(observation);
        }
    })
}
