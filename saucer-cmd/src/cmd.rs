use crate::args::{Arg, Args};
use crate::returned::Returned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// Key carrying the variant tag in a serialized command.
pub const CMD_TAG: &str = "$cmd";

/// Function executed by a `Run` command. `Err` is a synchronous failure.
pub type RunFn<A, S> = Arc<dyn Fn(Args<A, S>) -> Result<Returned, Value> + Send + Sync>;
pub type SuccessFn<A> = Arc<dyn Fn(Returned) -> A + Send + Sync>;
pub type FailFn<A> = Arc<dyn Fn(Value) -> A + Send + Sync>;
/// Tagger applied by a `Map` command: `tagger(args, action)`.
pub type TaggerFn<A> = Arc<dyn Fn(&[Value], A) -> A + Send + Sync>;

type Lift<A, B> = Arc<dyn Fn(A) -> B + Send + Sync>;

/// Declarative description of a side effect. Nothing runs until the command
/// is handed to [`interpret`](crate::interpret).
pub enum Cmd<A, S> {
    None,
    Action(A),
    Run(Run<A, S>),
    Batch(Vec<Cmd<A, S>>),
    Sequence(Vec<Cmd<A, S>>),
    Map(MapCmd<A, S>),
}

/// Discriminant of a [`Cmd`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CmdKind {
    None,
    Action,
    Run,
    Batch,
    Sequence,
    Map,
}

impl CmdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmdKind::None => "NONE",
            CmdKind::Action => "ACTION",
            CmdKind::Run => "RUN",
            CmdKind::Batch => "BATCH",
            CmdKind::Sequence => "SEQUENCE",
            CmdKind::Map => "MAP",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NONE" => Some(CmdKind::None),
            "ACTION" => Some(CmdKind::Action),
            "RUN" => Some(CmdKind::Run),
            "BATCH" => Some(CmdKind::Batch),
            "SEQUENCE" => Some(CmdKind::Sequence),
            "MAP" => Some(CmdKind::Map),
            _ => None,
        }
    }
}

impl std::fmt::Display for CmdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Function call plus the options that route its outcome to actions.
pub struct Run<A, S> {
    pub func: RunFn<A, S>,
    /// Type name of the function, for logs and serialization.
    pub name: &'static str,
    pub args: Vec<Arg>,
    pub success_action_creator: Option<SuccessFn<A>>,
    pub fail_action_creator: Option<FailFn<A>>,
    /// Hand the raw return value to the success creator without awaiting it.
    pub force_sync: bool,
}

pub struct MapCmd<A, S> {
    pub cmd: Box<Cmd<A, S>>,
    pub tagger: TaggerFn<A>,
    pub args: Vec<Value>,
}

/// Options for [`Cmd::run_with`].
pub struct RunOptions<A> {
    pub args: Vec<Arg>,
    pub success_action_creator: Option<SuccessFn<A>>,
    pub fail_action_creator: Option<FailFn<A>>,
    pub force_sync: bool,
}

impl<A> Default for RunOptions<A> {
    fn default() -> Self {
        RunOptions {
            args: Vec::new(),
            success_action_creator: None,
            fail_action_creator: None,
            force_sync: false,
        }
    }
}

impl<A> RunOptions<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn args(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(Arg::Value(value.into()));
        self
    }

    pub fn get_state_arg(mut self) -> Self {
        self.args.push(Arg::GetState);
        self
    }

    pub fn dispatch_arg(mut self) -> Self {
        self.args.push(Arg::Dispatch);
        self
    }

    pub fn on_success(mut self, creator: impl Fn(Returned) -> A + Send + Sync + 'static) -> Self {
        self.success_action_creator = Some(Arc::new(creator));
        self
    }

    pub fn on_fail(mut self, creator: impl Fn(Value) -> A + Send + Sync + 'static) -> Self {
        self.fail_action_creator = Some(Arc::new(creator));
        self
    }

    pub fn force_sync(mut self) -> Self {
        self.force_sync = true;
        self
    }
}

impl<A, S> Cmd<A, S> {
    /// No-op command - produces no effects
    pub fn none() -> Self {
        Cmd::None
    }

    /// Resolve to a known action without running anything.
    pub fn action(action: A) -> Self {
        Cmd::Action(action)
    }

    /// Call `func` with no arguments and no outcome routing.
    pub fn run<F>(func: F) -> Self
    where
        F: Fn(Args<A, S>) -> Result<Returned, Value> + Send + Sync + 'static,
    {
        Self::run_with(func, RunOptions::default())
    }

    pub fn run_with<F>(func: F, options: RunOptions<A>) -> Self
    where
        F: Fn(Args<A, S>) -> Result<Returned, Value> + Send + Sync + 'static,
    {
        let RunOptions {
            args,
            success_action_creator,
            fail_action_creator,
            force_sync,
        } = options;
        Cmd::Run(Run {
            func: Arc::new(func),
            name: std::any::type_name::<F>(),
            args,
            success_action_creator,
            fail_action_creator,
            force_sync,
        })
    }

    /// Run commands concurrently; actions come back in declaration order.
    pub fn batch(cmds: impl IntoIterator<Item = Cmd<A, S>>) -> Self {
        Cmd::Batch(cmds.into_iter().collect())
    }

    /// Run commands one after another, each settling before the next starts.
    pub fn sequence(cmds: impl IntoIterator<Item = Cmd<A, S>>) -> Self {
        Cmd::Sequence(cmds.into_iter().collect())
    }

    /// Pass every action produced by `cmd` through `tagger`.
    pub fn map(cmd: Cmd<A, S>, tagger: impl Fn(A) -> A + Send + Sync + 'static) -> Self {
        Cmd::Map(MapCmd {
            cmd: Box::new(cmd),
            tagger: Arc::new(move |_args: &[Value], action: A| tagger(action)),
            args: Vec::new(),
        })
    }

    /// Like [`Cmd::map`], with leading arguments handed to the tagger.
    pub fn map_with(
        cmd: Cmd<A, S>,
        tagger: impl Fn(&[Value], A) -> A + Send + Sync + 'static,
        args: impl IntoIterator<Item = Value>,
    ) -> Self {
        Cmd::Map(MapCmd {
            cmd: Box::new(cmd),
            tagger: Arc::new(tagger),
            args: args.into_iter().collect(),
        })
    }

    pub fn kind(&self) -> CmdKind {
        match self {
            Cmd::None => CmdKind::None,
            Cmd::Action(_) => CmdKind::Action,
            Cmd::Run(_) => CmdKind::Run,
            Cmd::Batch(_) => CmdKind::Batch,
            Cmd::Sequence(_) => CmdKind::Sequence,
            Cmd::Map(_) => CmdKind::Map,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }
}

impl<A: 'static, S: 'static> Cmd<A, S> {
    /// Convert the actions this command produces into another action type,
    /// typically to embed a child component's commands in its parent.
    pub fn lift<B: 'static>(self, f: impl Fn(A) -> B + Send + Sync + 'static) -> Cmd<B, S> {
        self.lift_with(Arc::new(f))
    }

    fn lift_with<B: 'static>(self, f: Lift<A, B>) -> Cmd<B, S> {
        match self {
            Cmd::None => Cmd::None,
            Cmd::Action(action) => Cmd::Action(f(action)),
            Cmd::Run(run) => Cmd::Run(run.lift(f)),
            Cmd::Batch(cmds) => Cmd::Batch(
                cmds.into_iter()
                    .map(|cmd| cmd.lift_with(Arc::clone(&f)))
                    .collect(),
            ),
            Cmd::Sequence(cmds) => Cmd::Sequence(
                cmds.into_iter()
                    .map(|cmd| cmd.lift_with(Arc::clone(&f)))
                    .collect(),
            ),
            Cmd::Map(MapCmd { cmd, tagger, args }) => {
                (*cmd).lift_with(Arc::new(move |action: A| f(tagger(args.as_slice(), action))))
            }
        }
    }
}

impl<A: 'static, S: 'static> Run<A, S> {
    fn lift<B: 'static>(self, f: Lift<A, B>) -> Run<B, S> {
        let func = self.func;
        let unlift = Arc::clone(&f);
        Run {
            func: Arc::new(move |args: Args<B, S>| func(args.map_dispatch(&unlift))),
            name: self.name,
            args: self.args,
            success_action_creator: self.success_action_creator.map(|creator| {
                let f = Arc::clone(&f);
                Arc::new(move |returned: Returned| f(creator(returned))) as SuccessFn<B>
            }),
            fail_action_creator: self.fail_action_creator.map(|creator| {
                let f = Arc::clone(&f);
                Arc::new(move |payload: Value| f(creator(payload))) as FailFn<B>
            }),
            force_sync: self.force_sync,
        }
    }
}

impl<A, S> Default for Cmd<A, S> {
    fn default() -> Self {
        Self::none()
    }
}

impl<A: Clone, S> Clone for Cmd<A, S> {
    fn clone(&self) -> Self {
        match self {
            Cmd::None => Cmd::None,
            Cmd::Action(action) => Cmd::Action(action.clone()),
            Cmd::Run(run) => Cmd::Run(run.clone()),
            Cmd::Batch(cmds) => Cmd::Batch(cmds.clone()),
            Cmd::Sequence(cmds) => Cmd::Sequence(cmds.clone()),
            Cmd::Map(map) => Cmd::Map(MapCmd {
                cmd: map.cmd.clone(),
                tagger: Arc::clone(&map.tagger),
                args: map.args.clone(),
            }),
        }
    }
}

impl<A, S> Clone for Run<A, S> {
    fn clone(&self) -> Self {
        Run {
            func: Arc::clone(&self.func),
            name: self.name,
            args: self.args.clone(),
            success_action_creator: self.success_action_creator.clone(),
            fail_action_creator: self.fail_action_creator.clone(),
            force_sync: self.force_sync,
        }
    }
}

impl<A: std::fmt::Debug, S> std::fmt::Debug for Cmd<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cmd::None => f.write_str("Cmd::None"),
            Cmd::Action(action) => f.debug_tuple("Cmd::Action").field(action).finish(),
            Cmd::Run(run) => f
                .debug_struct("Cmd::Run")
                .field("func", &run.name)
                .field("args", &run.args)
                .field("success", &run.success_action_creator.is_some())
                .field("fail", &run.fail_action_creator.is_some())
                .field("force_sync", &run.force_sync)
                .finish(),
            Cmd::Batch(cmds) => f.debug_tuple("Cmd::Batch").field(cmds).finish(),
            Cmd::Sequence(cmds) => f.debug_tuple("Cmd::Sequence").field(cmds).finish(),
            Cmd::Map(map) => f
                .debug_struct("Cmd::Map")
                .field("cmd", &map.cmd)
                .field("args", &map.args)
                .finish(),
        }
    }
}

impl<A: Serialize, S> Serialize for Cmd<A, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(CMD_TAG, self.kind().as_str())?;
        match self {
            Cmd::None => {}
            Cmd::Action(action) => map.serialize_entry("action", action)?,
            Cmd::Run(run) => {
                map.serialize_entry("func", run.name)?;
                map.serialize_entry("args", &run.args)?;
                map.serialize_entry("success", &run.success_action_creator.is_some())?;
                map.serialize_entry("fail", &run.fail_action_creator.is_some())?;
                map.serialize_entry("force_sync", &run.force_sync)?;
            }
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => map.serialize_entry("cmds", cmds)?,
            Cmd::Map(inner) => {
                map.serialize_entry("cmd", &*inner.cmd)?;
                map.serialize_entry("args", &inner.args)?;
            }
        }
        map.end()
    }
}

/// True iff `value` is a serialized command: an object whose tag names a
/// known command kind. Plain data never matches by shape alone.
pub fn is_cmd(value: &Value) -> bool {
    value
        .get(CMD_TAG)
        .and_then(Value::as_str)
        .and_then(CmdKind::from_tag)
        .is_some()
}
