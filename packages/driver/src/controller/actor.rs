use super::{
    ActiveCommand, AwaitedCC, CommandCallback, CommandOutcome, CommandResult, Controller,
    ControllerActor, ControllerEvent, ControllerInput, QueuedRef, ZipCommandMachine,
    ZipCommandMachineCondition, ZipCommandMachineEffect, ZipCommandMachineInput,
    ZipCommandMachineState, ZipCommandResult,
};
use crate::error::{Error, Result};
use std::time::Instant;
use tokio::sync::oneshot;
use zip_cc::prelude::*;
use zip_core::prelude::*;
use zip_core::state_machine::{StateMachine, StateMachineTransition};
use zip_core::util::MaybeSleep;
use zip_logging::{
    loggers::{controller::ControllerLogger, driver::DriverLogger, node::NodeLogger},
    Direction, LocalImmutableLogger, LogInfo, Loglevel,
};
use zip_udp::frame::{KeepAlive, ZipFrame};
use zip_udp::packet::Packet;
use zip_udp::prelude::ZipBinding;

impl<B: ZipBinding> ControllerActor<B> {
    /// Runs the coordinator until shutdown or transport loss. All sequence
    /// number allocation, admission and mode transitions happen inside this
    /// task, which makes them atomic with respect to each other.
    pub async fn run(mut self) {
        self.set_mode(NetworkMode::Idle);
        self.driver_log().info(|| "controller ready".to_string());

        while !self.shutting_down {
            let sleep_duration = self
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()));
            let maybe_sleep = MaybeSleep::new(sleep_duration);

            tokio::select! {
                biased;

                // Inbound datagrams come first so acks are not starved
                frame = self.binding.read() => {
                    match frame {
                        Some(frame) => self.handle_frame(frame).await,
                        None => {
                            self.handle_transport_closed();
                            break;
                        }
                    }
                }

                input = self.input_rx.recv() => {
                    match input {
                        Some(input) => self.handle_input(input).await,
                        // All handles are gone, nobody can talk to us anymore
                        None => break,
                    }
                }

                _ = maybe_sleep => {
                    self.handle_timeouts().await;
                }
            }
        }

        self.driver_log()
            .info(|| "controller shutting down".to_string());
    }

    pub(crate) fn driver_log(&self) -> DriverLogger<'_> {
        DriverLogger::new(self)
    }

    pub(crate) fn controller_log(&self) -> ControllerLogger<'_> {
        ControllerLogger::new(self)
    }

    pub(crate) fn node_log(&self, node_id: NodeId) -> NodeLogger<'_> {
        NodeLogger::new(self, node_id)
    }

    async fn handle_input(&mut self, input: ControllerInput) {
        match input {
            ControllerInput::ExecCommand {
                command,
                node_id,
                callback,
            } => {
                self.admit_command(command, node_id, callback).await;
            }

            ControllerInput::AwaitCC {
                predicate,
                timeout,
                callback,
            } => {
                self.awaited_ccs.push(AwaitedCC {
                    predicate,
                    timeout: timeout.map(|t| Instant::now() + t),
                    callback,
                });
            }

            ControllerInput::ConfigurationDone => {
                if self.storage.network_mode() == NetworkMode::ConfiguringNewNode {
                    self.set_mode(NetworkMode::Idle);
                }
            }

            ControllerInput::Shutdown => {
                self.fail_all(Error::Cancelled);
                self.storage.set_network_mode(NetworkMode::NotReady);
                self.shutting_down = true;
            }
        }
    }

    /// Gates a command on the current network mode, allocates its sequence
    /// number and starts its state machine. Admission and the mode change are
    /// atomic because both happen here, inside the actor.
    async fn admit_command(
        &mut self,
        command: CC,
        node_id: Option<NodeId>,
        callback: oneshot::Sender<Result<CommandOutcome>>,
    ) {
        let mode = self.storage.network_mode();
        if mode == NetworkMode::NotReady {
            let _ = callback.send(Err(Error::NotReady));
            return;
        }
        if !command.pre_states().contains(&mode) {
            let _ = callback.send(Err(Error::NetworkBusy));
            return;
        }

        let exec_state = command.exec_state();
        // Only one mode-changing operation may run at a time
        if exec_state.is_some() && self.mode_changing_seq.is_some() {
            let _ = callback.send(Err(Error::NetworkBusy));
            return;
        }

        let Some(seq) = self.allocate_seq() else {
            let _ = callback.send(Err(Error::NetworkBusy));
            return;
        };
        let command = command.with_seq_no(seq);

        if let Some(exec_state) = exec_state {
            self.mode_changing_seq = Some(seq);
            self.set_mode(exec_state);
        }

        self.active.insert(
            seq,
            ActiveCommand {
                command,
                node_id,
                machine: ZipCommandMachine::new(),
                retries_left: self.options.default_retries,
                timeout: None,
                callback: CommandCallback::Initial(callback),
                report: None,
            },
        );
        self.advance_machine(seq, ZipCommandMachineInput::Start).await;
    }

    /// Hands out the next sequence number that no in-flight command owns
    fn allocate_seq(&mut self) -> Option<u8> {
        for _ in 0..=u8::MAX as usize {
            let seq = self.seq_gen.increment();
            if !self.active.contains_key(&seq) {
                return Some(seq);
            }
        }
        None
    }

    async fn handle_frame(&mut self, frame: ZipFrame) {
        match frame {
            ZipFrame::Garbage(data) => {
                self.driver_log()
                    .warn(|| format!("discarded {} bytes of undecodable data", data.len()));
            }

            ZipFrame::KeepAlive(keep_alive) => {
                if keep_alive.ping
                    && (self.binding.write(ZipFrame::KeepAlive(KeepAlive::pong())).await).is_err()
                {
                    self.handle_transport_closed();
                }
            }

            ZipFrame::Packet(raw) => {
                let ctx = CCParsingContext::default();
                let packet = match Packet::from_raw(raw, &ctx) {
                    Ok(packet) => packet,
                    Err(e) => {
                        // Malformed bodies are logged and dropped; an
                        // in-flight command just keeps waiting
                        self.driver_log()
                            .error(|| format!("failed to decode packet: {}", e));
                        return;
                    }
                };
                self.controller_log().command(&packet, Direction::Inbound);

                // The gateway expects its data packets to be acknowledged
                if packet.flags.ack_request {
                    let ack = Packet::ack(packet.seq_number);
                    self.controller_log().command(&ack, Direction::Outbound);
                    if (self.binding.write(ZipFrame::Packet(ack.as_raw())).await).is_err() {
                        self.handle_transport_closed();
                        return;
                    }
                }

                self.route_packet(packet).await;
            }
        }
    }

    /// Routes an inbound packet: ack/nack envelopes go to the command owning
    /// the sequence number, report bodies to the first command or awaiter that
    /// recognizes them, everything else to the subscribers.
    async fn route_packet(&mut self, packet: Packet) {
        if (packet.is_ack_response() || packet.is_nack_response())
            && self.active.contains_key(&packet.seq_number)
        {
            if let Some(input) = classify_response(&packet) {
                self.advance_machine(packet.seq_number, input).await;
            }
            return;
        }

        if let Some(CcOrRaw::CC(cc)) = &packet.command {
            if let Some(seq) = self.find_report_owner(cc) {
                if let Some(active) = self.active.get_mut(&seq) {
                    active.report = Some(cc.clone());
                }
                self.advance_machine(seq, ZipCommandMachineInput::Report).await;
                return;
            }

            if let Some(index) = self.awaited_ccs.iter().position(|a| a.matches(cc)) {
                let awaited = self.awaited_ccs.swap_remove(index);
                let _ = awaited.callback.send(Ok(cc.clone()));
                return;
            }
        }

        // No in-flight command claimed the packet
        let _ = self.event_tx.send(ControllerEvent::Unsolicited(packet));
    }

    fn find_report_owner(&self, cc: &CC) -> Option<u8> {
        self.active
            .iter()
            .filter(|(_, active)| !active.machine.done())
            .find(|(_, active)| active.command.expects_report() && active.command.test_report(cc))
            .map(|(seq, _)| *seq)
    }

    /// Feeds one input into a command's state machine, executes the resulting
    /// effect and processes the new state
    async fn advance_machine(&mut self, seq: u8, input: ZipCommandMachineInput) {
        let mode = self.storage.network_mode();

        let (effect, outbound) = {
            let Some(active) = self.active.get_mut(&seq) else {
                return;
            };
            if active.machine.done() {
                return;
            }

            let expects_report = active.command.expects_report();
            let may_queue = mode != NetworkMode::ConfiguringNewNode;
            let has_retries = active.retries_left > 0;

            let Some(transition) = active.machine.next(input.clone(), |cond| match cond {
                ZipCommandMachineCondition::ExpectsReport => expects_report,
                ZipCommandMachineCondition::MayQueue => may_queue,
                ZipCommandMachineCondition::HasRetries => has_retries,
            }) else {
                // Not a recognized input in this state: keep waiting
                return;
            };

            let effect = transition.effect();
            active.machine.transition(transition.new_state());

            // A re-send after a nack or timeout consumes one retry
            if matches!(
                input,
                ZipCommandMachineInput::Nack | ZipCommandMachineInput::Timeout
            ) && effect == Some(ZipCommandMachineEffect::SendFrame)
            {
                active.retries_left -= 1;
            }

            let outbound = match effect {
                Some(ZipCommandMachineEffect::SendFrame) => {
                    Some((Packet::request(seq, active.command.clone()), active.node_id))
                }
                _ => None,
            };
            (effect, outbound)
        };

        match effect {
            Some(ZipCommandMachineEffect::SendFrame) => {
                if let Some((packet, node_id)) = outbound {
                    match node_id {
                        Some(node_id) => self.node_log(node_id).command(&packet, Direction::Outbound),
                        None => self.controller_log().command(&packet, Direction::Outbound),
                    }
                    if (self.binding.write(ZipFrame::Packet(packet.as_raw())).await).is_err() {
                        self.handle_transport_closed();
                        return;
                    }
                }
            }
            Some(ZipCommandMachineEffect::NotifyQueued) => {
                if let Some(active) = self.active.get_mut(&seq) {
                    let (tx, rx) = oneshot::channel();
                    if let CommandCallback::Initial(callback) = active.callback.take() {
                        let _ = callback.send(Ok(CommandOutcome::Queued(QueuedRef { rx })));
                    }
                    active.callback = CommandCallback::Queued(tx);
                }
            }
            None => {}
        }

        let new_state = match self.active.get_mut(&seq) {
            Some(active) => {
                match active.machine.state() {
                    ZipCommandMachineState::WaitForAck => {
                        active.timeout = Some(Instant::now() + self.options.send_timeout);
                    }
                    ZipCommandMachineState::WaitForReport => {
                        // Network management operations wait for user
                        // interaction (a button press on the joining device);
                        // they end through their status report or an explicit
                        // stop, not a timer
                        active.timeout = match active.command.exec_state() {
                            Some(_) => None,
                            None => Some(Instant::now() + self.options.report_timeout),
                        };
                    }
                    // A queued command waits for the node to wake up, however
                    // long that takes
                    ZipCommandMachineState::Queued => {
                        active.timeout = None;
                    }
                    _ => {}
                }
                active.machine.state().clone()
            }
            None => return,
        };

        if let ZipCommandMachineState::Done(result) = new_state {
            self.complete_command(seq, result);
        }
    }

    /// Delivers the result to the caller, releases the sequence number and
    /// restores the network mode if this was the mode-changing command
    fn complete_command(&mut self, seq: u8, result: ZipCommandResult) {
        let Some(mut active) = self.active.remove(&seq) else {
            return;
        };

        let outcome: Result<CommandResult> = match result {
            ZipCommandResult::Success => Ok(match active.report.take() {
                Some(report) => CommandResult::Report(report),
                None => CommandResult::Acknowledged,
            }),
            ZipCommandResult::NackResponse => Err(Error::NackResponse),
            ZipCommandResult::QueueFull => Err(Error::QueueFull),
            ZipCommandResult::OptionError => Err(Error::OptionError),
            ZipCommandResult::Timeout => Err(Error::Timeout),
        };

        if self.mode_changing_seq == Some(seq) {
            self.mode_changing_seq = None;
            // A successful inclusion leaves the coordinator configuring the
            // new node until the caller signals it is done
            let next_mode = match (&active.command, &outcome) {
                (
                    CC::NetworkManagementInclusionCCNodeAdd(_),
                    Ok(CommandResult::Report(CC::NetworkManagementInclusionCCNodeAddStatus(
                        status,
                    ))),
                ) if status.status == MaybeKnown::Known(NodeAddStatusKind::Done) => {
                    NetworkMode::ConfiguringNewNode
                }
                _ => NetworkMode::Idle,
            };
            self.set_mode(next_mode);
        }

        match active.callback.take() {
            CommandCallback::Initial(callback) => {
                let _ = callback.send(outcome.map(CommandOutcome::Done));
            }
            CommandCallback::Queued(callback) => {
                let _ = callback.send(outcome);
            }
            CommandCallback::Gone => {}
        }
    }

    async fn handle_timeouts(&mut self) {
        let now = Instant::now();

        let expired: Vec<u8> = self
            .active
            .iter()
            .filter(|(_, active)| active.timeout.map(|t| t <= now).unwrap_or(false))
            .map(|(seq, _)| *seq)
            .collect();
        for seq in expired {
            if let Some(active) = self.active.get_mut(&seq) {
                active.timeout = None;
            }
            self.advance_machine(seq, ZipCommandMachineInput::Timeout).await;
        }

        let mut index = 0;
        while index < self.awaited_ccs.len() {
            if self.awaited_ccs[index]
                .timeout
                .map(|t| t <= now)
                .unwrap_or(false)
            {
                let awaited = self.awaited_ccs.swap_remove(index);
                let _ = awaited.callback.send(Err(Error::Timeout));
            } else {
                index += 1;
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        let command_deadline = self
            .active
            .values()
            .filter_map(|active| active.timeout)
            .min();
        let awaited_deadline = self.awaited_ccs.iter().filter_map(|a| a.timeout).min();
        match (command_deadline, awaited_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    /// A dead socket fails every in-flight command and takes the coordinator
    /// out of service
    fn handle_transport_closed(&mut self) {
        self.driver_log()
            .error(|| "transport to the gateway is gone".to_string());
        self.set_mode(NetworkMode::NotReady);
        self.fail_all(Error::TransportClosed);
        self.shutting_down = true;
    }

    fn fail_all(&mut self, error: Error) {
        self.mode_changing_seq = None;
        for (_, mut active) in self.active.drain() {
            match active.callback.take() {
                CommandCallback::Initial(callback) => {
                    let _ = callback.send(Err(error.clone()));
                }
                CommandCallback::Queued(callback) => {
                    let _ = callback.send(Err(error.clone()));
                }
                CommandCallback::Gone => {}
            }
        }
        for awaited in self.awaited_ccs.drain(..) {
            let _ = awaited.callback.send(Err(error.clone()));
        }
    }

    fn set_mode(&mut self, mode: NetworkMode) {
        self.storage.set_network_mode(mode);
        let _ = self.event_tx.send(ControllerEvent::ModeChanged(mode));
    }
}

fn classify_response(packet: &Packet) -> Option<ZipCommandMachineInput> {
    if packet.is_ack_response() {
        Some(ZipCommandMachineInput::Ack)
    } else if packet.sleeping_delay() {
        Some(ZipCommandMachineInput::SleepingDelay)
    } else if packet.is_queue_full() {
        Some(ZipCommandMachineInput::NackQueueFull)
    } else if packet.is_option_error() {
        Some(ZipCommandMachineInput::NackOptionError)
    } else if packet.is_nack_response() {
        Some(ZipCommandMachineInput::Nack)
    } else {
        None
    }
}

impl<B: ZipBinding> LocalImmutableLogger for ControllerActor<B> {
    fn log(&self, log: LogInfo, level: Loglevel) {
        // Logging must never block or kill the actor; drop entries when the
        // consumer is too slow
        let _ = self.log_tx.try_send((log, level));
    }
}

impl Controller {
    pub(crate) async fn exec_input(&self, input: ControllerInput) -> Result<()> {
        self.input_tx
            .send(input)
            .await
            .map_err(|_| Error::NotReady)
    }
}
