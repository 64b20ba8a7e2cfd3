use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::ControllerStorage;
use tokio::sync::{broadcast, mpsc, oneshot};
use typed_builder::TypedBuilder;
use zip_cc::prelude::*;
use zip_core::submodule;
use zip_core::wrapping_counter::WrappingCounter;
use zip_logging::{LogInfo, Loglevel};
use zip_udp::packet::Packet;
use zip_udp::prelude::ZipBinding;

pub(crate) mod awaited;
mod storage;

submodule!(actor);
submodule!(command_machine);
submodule!(handle);

pub use awaited::Predicate;

use awaited::AwaitedCC;

pub(crate) type LogSender = mpsc::Sender<(LogInfo, Loglevel)>;
pub type LogReceiver = mpsc::Receiver<(LogInfo, Loglevel)>;

type ControllerInputSender = mpsc::Sender<ControllerInput>;
type ControllerInputReceiver = mpsc::Receiver<ControllerInput>;

/// Recognized options at controller startup
#[derive(Debug, Clone, TypedBuilder)]
pub struct ControllerOptions {
    /// How often a send is repeated after a nack or timeout
    #[builder(default = 2)]
    pub default_retries: u8,
    /// How long to wait for the gateway to acknowledge a send
    #[builder(default = Duration::from_millis(2000))]
    pub send_timeout: Duration,
    /// How long a GET-style command waits for its report after the ack
    #[builder(default = Duration::from_millis(10000))]
    pub report_timeout: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The caller-facing handle to a running controller actor. Cheap to clone;
/// all clones talk to the same actor.
#[derive(Clone)]
pub struct Controller {
    input_tx: ControllerInputSender,
    event_tx: broadcast::Sender<ControllerEvent>,
    pub(crate) storage: Arc<ControllerStorage>,
}

/// The coordinator: owns the transport, the sequence number space, the
/// network mode and every in-flight command. Runs as a single task.
pub struct ControllerActor<B: ZipBinding> {
    binding: B,

    // Channels to interact with this actor
    log_tx: LogSender,
    input_rx: ControllerInputReceiver,
    event_tx: broadcast::Sender<ControllerEvent>,

    /// Storage shared between this actor and its API handles
    storage: Arc<ControllerStorage>,
    options: ControllerOptions,

    seq_gen: WrappingCounter<u8>,
    /// In-flight commands, keyed by their envelope sequence number
    active: HashMap<u8, ActiveCommand>,
    /// The sequence number of the currently running mode-changing command
    mode_changing_seq: Option<u8>,
    /// Reports awaited outside of a command cycle
    awaited_ccs: Vec<AwaitedCC>,
    shutting_down: bool,
}

/// The actor's outward-facing channels: logs to drain and the event stream
pub struct ControllerAdapter {
    pub logs: LogReceiver,
    pub events: broadcast::Receiver<ControllerEvent>,
}

pub(crate) enum ControllerInput {
    /// Run one command through its send/ack/retry/queue cycle
    ExecCommand {
        command: CC,
        /// The addressed node, if any. Only used to attribute log output;
        /// the gateway owns the actual routing.
        node_id: Option<zip_core::prelude::NodeId>,
        callback: oneshot::Sender<Result<CommandOutcome>>,
    },
    /// Wait for a command matching the given predicate
    AwaitCC {
        predicate: Predicate<CC>,
        timeout: Option<Duration>,
        callback: oneshot::Sender<Result<CC>>,
    },
    /// The caller finished configuring a freshly included node
    ConfigurationDone,
    /// Cancel everything and stop the actor
    Shutdown,
}

/// Pushed to subscribers for everything the coordinator does not consume
/// itself
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// An inbound packet no in-flight command claimed
    Unsolicited(Packet),
    ModeChanged(zip_core::prelude::NetworkMode),
}

/// The first answer a caller gets for an executed command
#[derive(Debug)]
pub enum CommandOutcome {
    Done(CommandResult),
    /// The target node sleeps; the gateway queued the command. The final
    /// result arrives through the contained handle once the node wakes up.
    Queued(QueuedRef),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// The gateway acknowledged the command
    Acknowledged,
    /// The expected report arrived
    Report(CC),
}

/// Handle to a command that is parked in the gateway's mailbox
#[derive(Debug)]
pub struct QueuedRef {
    pub(crate) rx: oneshot::Receiver<Result<CommandResult>>,
}

impl QueuedRef {
    /// Waits for the queued command to be delivered (or abandoned)
    pub async fn try_await(self) -> Result<CommandResult> {
        self.rx.await.map_err(|_| crate::error::Error::Cancelled)?
    }
}

/// One in-flight command and everything needed to drive it
pub(crate) struct ActiveCommand {
    command: CC,
    node_id: Option<zip_core::prelude::NodeId>,
    machine: ZipCommandMachine,
    retries_left: u8,
    timeout: Option<Instant>,
    callback: CommandCallback,
    /// The report that completed the command, if one arrived
    report: Option<CC>,
}

pub(crate) enum CommandCallback {
    /// The caller still waits for the first outcome
    Initial(oneshot::Sender<Result<CommandOutcome>>),
    /// The caller was told the command is queued and holds a [QueuedRef]
    Queued(oneshot::Sender<Result<CommandResult>>),
    Gone,
}

impl CommandCallback {
    fn take(&mut self) -> CommandCallback {
        std::mem::replace(self, CommandCallback::Gone)
    }
}

impl<B: ZipBinding> ControllerActor<B> {
    pub fn new(
        binding: B,
        options: ControllerOptions,
    ) -> (Controller, ControllerActor<B>, ControllerAdapter) {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (log_tx, log_rx) = mpsc::channel(256);
        let (event_tx, event_rx) = broadcast::channel(64);

        let storage = Arc::new(ControllerStorage::new());

        let controller = Controller {
            input_tx,
            event_tx: event_tx.clone(),
            storage: storage.clone(),
        };

        let adapter = ControllerAdapter {
            logs: log_rx,
            events: event_rx,
        };

        let actor = ControllerActor {
            binding,
            log_tx,
            input_rx,
            event_tx,
            storage,
            options,
            seq_gen: WrappingCounter::new(),
            active: HashMap::new(),
            mode_changing_seq: None,
            awaited_ccs: Vec::new(),
            shutting_down: false,
        };

        (controller, actor, adapter)
    }
}
