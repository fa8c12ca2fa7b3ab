use crate::cmd::CmdKind;
use crate::error::CmdError;
use std::time::SystemTime;

/// Observation variants emitted by [`CmdRunner`](crate::CmdRunner)
///
/// Borrows the action and error so observers can inspect them before the
/// host dispatches. No trait bounds are imposed here; helpers add whatever
/// bounds they need.
pub enum Observation<'a, A> {
    Effect {
        ts: SystemTime,
        kind: CmdKind,
    },
    Dispatch {
        ts: SystemTime,
        data: &'a A,
    },
    Failure {
        ts: SystemTime,
        error: &'a CmdError,
    },
}
