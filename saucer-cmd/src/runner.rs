use crate::args::{DispatchFn, GetStateFn};
use crate::cmd::Cmd;
use crate::error::CmdError;
use crate::interpret::{interpret, Pending};
use crate::observer::{no_op_observer, ObserverFn};
use crate::Observation;
use std::time::SystemTime;

/// Host-side driver: interprets commands against a live store and dispatches
/// whatever they resolve to.
pub struct CmdRunner<A, S> {
    dispatch: DispatchFn<A>,
    get_state: GetStateFn<S>,
    observer: ObserverFn<A>,
}

impl<A, S> CmdRunner<A, S>
where
    A: Send + 'static,
    S: 'static,
{
    pub fn new(dispatch: DispatchFn<A>, get_state: GetStateFn<S>) -> Self {
        Self {
            dispatch,
            get_state,
            observer: no_op_observer(),
        }
    }

    pub fn with_observer(mut self, observer: ObserverFn<A>) -> Self {
        self.observer = observer;
        self
    }

    /// Interpret without dispatching; the caller owns the resolved actions.
    pub fn interpret(&self, cmd: Cmd<A, S>) -> Result<Option<Pending<A>>, CmdError> {
        (self.observer)(&Observation::Effect {
            ts: SystemTime::now(),
            kind: cmd.kind(),
        });
        interpret(cmd, &self.dispatch, &self.get_state).inspect_err(|error| self.report(error))
    }

    /// Interpret `cmd`, wait for it to settle, then dispatch every resolved
    /// action in order. Returns how many actions were dispatched.
    ///
    /// On a synchronous failure the siblings that were already started are
    /// still awaited before the error is returned.
    pub async fn run(&self, cmd: Cmd<A, S>) -> Result<usize, CmdError> {
        let pending = match self.interpret(cmd) {
            Ok(Some(pending)) => pending,
            Ok(None) => return Ok(0),
            Err(mut error) => {
                error.take_started().settle().await;
                return Err(error);
            }
        };
        let actions = pending.await.inspect_err(|error| self.report(error))?;

        let count = actions.len();
        for action in actions {
            (self.observer)(&Observation::Dispatch {
                ts: SystemTime::now(),
                data: &action,
            });
            (self.dispatch)(action);
        }
        Ok(count)
    }

    fn report(&self, error: &CmdError) {
        (self.observer)(&Observation::Failure {
            ts: SystemTime::now(),
            error,
        });
    }
}
