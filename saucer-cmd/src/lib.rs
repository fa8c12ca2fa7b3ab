//! saucer-cmd: commands as data, and the interpreter that runs them.
//!
//! A [`Cmd`] describes a side effect without performing it, so update
//! functions stay pure. [`interpret`] executes a command tree against the
//! host's live `dispatch` and `get_state` and yields either nothing or a
//! future of the actions the host should dispatch, in order.
//!
//! ```ignore
//! let cmd = Cmd::batch([
//!     Cmd::run_with(fetch_user, RunOptions::new().arg(42).on_success(Msg::UserLoaded)),
//!     Cmd::action(Msg::Loading),
//! ]);
//! if let Some(pending) = interpret(cmd, &dispatch, &get_state)? {
//!     for action in pending.await? {
//!         dispatch(action);
//!     }
//! }
//! ```

mod args;
mod channels;
mod cmd;
mod error;
mod interpret;
mod observation;
mod observer;
mod returned;
mod runner;

pub use args::{Arg, Args, Dispatch, DispatchFn, GetState, GetStateFn, ResolvedArg};
pub use channels::{channel_dispatch, state_reader, DispatchChannels};
pub use cmd::{
    is_cmd, Cmd, CmdKind, FailFn, MapCmd, Run, RunFn, RunOptions, SuccessFn, TaggerFn, CMD_TAG,
};
pub use error::{CmdError, Started};
pub use interpret::{interpret, Pending};
pub use observation::Observation;
pub use observer::{
    filter_observer, filter_with, no_op_observer, tee_observer, tracing_observer, ObserverFn,
};
pub use returned::{Deferred, Returned};
pub use runner::CmdRunner;
