//! End-to-end tests for the controller actor over a scripted in-memory
//! transport.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use zip_cc::prelude::*;
use zip_core::prelude::*;
use zip_driver::{
    CommandOutcome, CommandResult, Controller, ControllerActor, ControllerEvent,
    ControllerOptions, Error,
};
use zip_udp::frame::ZipFrame;
use zip_udp::packet::{Packet, PacketFlags};
use zip_udp::prelude::ZipBinding;

/// A transport whose both ends are driven by the test
struct ScriptedBinding {
    out_tx: mpsc::UnboundedSender<ZipFrame>,
    in_rx: mpsc::UnboundedReceiver<ZipFrame>,
}

impl ZipBinding for ScriptedBinding {
    async fn write(&mut self, frame: ZipFrame) -> zip_udp::error::Result<()> {
        self.out_tx
            .send(frame)
            .map_err(|_| zip_udp::error::Error::SocketClosed)
    }

    async fn read(&mut self) -> Option<ZipFrame> {
        self.in_rx.recv().await
    }
}

struct Harness {
    controller: Controller,
    outbound: mpsc::UnboundedReceiver<ZipFrame>,
    inbound: mpsc::UnboundedSender<ZipFrame>,
}

impl Harness {
    fn start(options: ControllerOptions) -> Self {
        let (out_tx, outbound) = mpsc::unbounded_channel();
        let (inbound, in_rx) = mpsc::unbounded_channel();
        let binding = ScriptedBinding { out_tx, in_rx };
        let (controller, actor, _adapter) = ControllerActor::new(binding, options);
        tokio::spawn(actor.run());

        Self {
            controller,
            outbound,
            inbound,
        }
    }

    async fn next_outbound_packet(&mut self) -> Packet {
        let frame = timeout(Duration::from_secs(2), self.outbound.recv())
            .await
            .expect("timed out waiting for an outbound frame")
            .expect("outbound channel closed");
        match frame {
            ZipFrame::Packet(raw) => {
                Packet::from_raw(raw, &CCParsingContext::default()).expect("outbound must decode")
            }
            other => panic!("expected a packet, got {:?}", other),
        }
    }

    fn inject(&self, packet: Packet) {
        self.inbound
            .send(ZipFrame::Packet(packet.as_raw()))
            .expect("actor is gone");
    }

    fn inject_flags(&self, seq_number: u8, flags: PacketFlags) {
        self.inject(Packet {
            seq_number,
            flags,
            source_endpoint: 0,
            dest_endpoint: 0,
            command: None,
        });
    }
}

fn nack() -> PacketFlags {
    PacketFlags {
        nack_response: true,
        ..PacketFlags::default()
    }
}

fn nack_waiting() -> PacketFlags {
    PacketFlags {
        nack_response: true,
        nack_waiting: true,
        ..PacketFlags::default()
    }
}

fn node(id: u8) -> NodeId {
    NodeId::new(id).unwrap()
}

#[tokio::test]
async fn ack_completes_a_set_command() {
    let mut h = Harness::start(ControllerOptions::default());

    let controller = h.controller.clone();
    let exec = tokio::spawn(async move {
        controller
            .send_command(
                node(5),
                BasicCCSet::builder().target_value(BinarySet::On).build(),
            )
            .await
    });

    let packet = h.next_outbound_packet().await;
    assert!(packet.flags.ack_request);
    assert_eq!(
        packet.command,
        Some(CcOrRaw::CC(
            BasicCCSet::builder().target_value(BinarySet::On).build().into()
        ))
    );

    h.inject(Packet::ack(packet.seq_number));

    let result = exec.await.unwrap().unwrap();
    assert_eq!(result, CommandResult::Acknowledged);
}

#[tokio::test]
async fn three_nacks_issue_three_sends_then_fail() {
    let mut h = Harness::start(ControllerOptions::default());

    let controller = h.controller.clone();
    let exec = tokio::spawn(async move {
        controller
            .send_command(
                node(5),
                BasicCCSet::builder().target_value(BinarySet::Off).build(),
            )
            .await
    });

    let mut seq = None;
    for _ in 0..3 {
        let packet = h.next_outbound_packet().await;
        // Every re-send reuses the same sequence number
        match seq {
            None => seq = Some(packet.seq_number),
            Some(seq) => assert_eq!(packet.seq_number, seq),
        }
        h.inject_flags(packet.seq_number, nack());
    }

    let result = exec.await.unwrap();
    assert_eq!(result, Err(Error::NackResponse));

    // No fourth send
    assert!(
        timeout(Duration::from_millis(200), h.outbound.recv())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn sleeping_node_parks_the_command_until_delivery() {
    let mut h = Harness::start(ControllerOptions::default());

    let controller = h.controller.clone();
    let exec = tokio::spawn(async move {
        controller
            .exec_node_command(
                node(7),
                BasicCCSet::builder().target_value(BinarySet::On).build(),
            )
            .await
    });

    let packet = h.next_outbound_packet().await;
    h.inject_flags(packet.seq_number, nack_waiting());

    let queued = match exec.await.unwrap().unwrap() {
        CommandOutcome::Queued(queued) => queued,
        other => panic!("expected a queued outcome, got {:?}", other),
    };

    // The node wakes up, the gateway delivers and acks the original send
    h.inject(Packet::ack(packet.seq_number));
    let result = queued.try_await().await.unwrap();
    assert_eq!(result, CommandResult::Acknowledged);
}

#[tokio::test]
async fn get_command_resolves_with_its_report() {
    let mut h = Harness::start(ControllerOptions::default());

    let controller = h.controller.clone();
    let exec = tokio::spawn(async move {
        controller
            .send_command(node(5), BinarySwitchCCGet::default())
            .await
    });

    let packet = h.next_outbound_packet().await;
    h.inject(Packet::ack(packet.seq_number));

    // The report arrives in a fresh envelope with its own sequence number
    let report: CC = BinarySwitchCCReport::builder()
        .current_value(BinaryReport::On)
        .build()
        .into();
    h.inject(Packet::request(0x99, report.clone()));

    // The gateway's report packet gets acknowledged
    let ack = h.next_outbound_packet().await;
    assert!(ack.flags.ack_response);
    assert_eq!(ack.seq_number, 0x99);

    let result = exec.await.unwrap().unwrap();
    assert_eq!(result, CommandResult::Report(report));
}

#[tokio::test]
async fn concurrent_commands_get_distinct_sequence_numbers() {
    let mut h = Harness::start(ControllerOptions::default());

    let mut execs = Vec::new();
    for _ in 0..3 {
        let controller = h.controller.clone();
        execs.push(tokio::spawn(async move {
            controller
                .exec_node_command(node(5), BinarySwitchCCGet::default())
                .await
        }));
    }

    let mut seqs = Vec::new();
    for _ in 0..3 {
        let packet = h.next_outbound_packet().await;
        seqs.push(packet.seq_number);
        h.inject(Packet::ack(packet.seq_number));
    }
    seqs.sort_unstable();
    seqs.dedup();
    assert_eq!(seqs.len(), 3, "sequence numbers must be pairwise distinct");

    // Resolve all three so nothing lingers
    for _ in 0..3 {
        h.inject(Packet::request(
            0x90,
            CC::from(
                BinarySwitchCCReport::builder()
                    .current_value(BinaryReport::Off)
                    .build(),
            ),
        ));
        let _ack = h.next_outbound_packet().await;
    }
    for exec in execs {
        assert!(exec.await.unwrap().is_ok());
    }
}

#[tokio::test]
async fn mode_changing_commands_are_gated() {
    let mut h = Harness::start(ControllerOptions::default());

    // Start an exclusion and leave it running
    let controller = h.controller.clone();
    let exclusion = tokio::spawn(async move { controller.exclude_node().await });
    let packet = h.next_outbound_packet().await;
    h.inject(Packet::ack(packet.seq_number));

    // Give the actor a moment to process the ack
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.controller.network_mode(), NetworkMode::ExcludingNode);

    // A second network management operation is refused
    assert_eq!(
        h.controller.include_node().await.unwrap_err(),
        Error::NetworkBusy
    );

    // Ordinary device traffic is refused outside idle/configuring
    assert_eq!(
        h.controller
            .send_command(node(5), BinarySwitchCCGet::default())
            .await
            .unwrap_err(),
        Error::NetworkBusy
    );

    // Finish the exclusion: node 9 left the network
    let status: CC = NetworkManagementInclusionCCNodeRemoveStatus::builder()
        .seq_no(packet.seq_number)
        .status(NodeRemoveStatusKind::Done)
        .node_id(Some(node(9)))
        .build()
        .into();
    h.inject(Packet::request(0x77, status));
    let _ack = h.next_outbound_packet().await;

    let status = exclusion.await.unwrap().unwrap();
    assert_eq!(status.node_id, Some(node(9)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.controller.network_mode(), NetworkMode::Idle);
}

#[tokio::test]
async fn successful_inclusion_walks_the_mode_machine() {
    let mut h = Harness::start(ControllerOptions::default());

    let controller = h.controller.clone();
    let inclusion = tokio::spawn(async move { controller.include_node().await });

    let packet = h.next_outbound_packet().await;
    match &packet.command {
        Some(CcOrRaw::CC(CC::NetworkManagementInclusionCCNodeAdd(add))) => {
            assert_eq!(add.seq_no, packet.seq_number);
        }
        other => panic!("expected a node add, got {:?}", other),
    }
    h.inject(Packet::ack(packet.seq_number));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.controller.network_mode(), NetworkMode::IncludingNode);

    let status: CC = NetworkManagementInclusionCCNodeAddStatus::builder()
        .seq_no(packet.seq_number)
        .status(NodeAddStatusKind::Done)
        .node_id(Some(node(6)))
        .listening(true)
        .command_classes(vec![CommandClassId::Known(CommandClasses::BinarySwitch)])
        .build()
        .into();
    h.inject(Packet::request(0x55, status));
    let _ack = h.next_outbound_packet().await;

    let status = inclusion.await.unwrap().unwrap();
    assert_eq!(status.node_id, Some(node(6)));
    assert_eq!(status.status, MaybeKnown::Known(NodeAddStatusKind::Done));

    // The coordinator stays in the configuration mode until told otherwise
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        h.controller.network_mode(),
        NetworkMode::ConfiguringNewNode
    );

    // Device traffic is allowed while configuring
    let controller = h.controller.clone();
    let get = tokio::spawn(async move {
        controller
            .exec_node_command(node(6), BinarySwitchCCGet::default())
            .await
    });
    let get_packet = h.next_outbound_packet().await;
    h.inject(Packet::ack(get_packet.seq_number));
    h.inject(Packet::request(
        0x56,
        CC::from(
            BinarySwitchCCReport::builder()
                .current_value(BinaryReport::On)
                .build(),
        ),
    ));
    let _ack = h.next_outbound_packet().await;
    assert!(get.await.unwrap().is_ok());

    h.controller.configuration_done().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.controller.network_mode(), NetworkMode::Idle);
}

#[tokio::test]
async fn unsolicited_reports_reach_subscribers() {
    let mut h = Harness::start(ControllerOptions::default());
    let mut events = h.controller.subscribe();

    let report: CC = BasicCCReport::builder()
        .current_value(BinaryReport::On)
        .build()
        .into();
    h.inject(Packet::request(0x33, report.clone()));

    // The gateway's packet is acked even though nobody asked for the report
    let ack = h.next_outbound_packet().await;
    assert!(ack.flags.ack_response);

    loop {
        match timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("event channel closed")
        {
            ControllerEvent::Unsolicited(packet) => {
                assert_eq!(packet.command, Some(CcOrRaw::CC(report)));
                break;
            }
            ControllerEvent::ModeChanged(_) => continue,
        }
    }
}

#[tokio::test]
async fn transport_loss_fails_pending_commands() {
    let mut h = Harness::start(ControllerOptions::default());

    let controller = h.controller.clone();
    let exec = tokio::spawn(async move {
        controller
            .send_command(node(5), BinarySwitchCCGet::default())
            .await
    });

    // Keep the command in flight, then kill the transport
    let packet = h.next_outbound_packet().await;
    h.inject(Packet::ack(packet.seq_number));
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(h.inbound);

    let result = exec.await.unwrap();
    assert_eq!(result, Err(Error::TransportClosed));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.controller.network_mode(), NetworkMode::NotReady);
}

#[tokio::test]
async fn timeouts_retry_and_then_fail() {
    let mut h = Harness::start(
        ControllerOptions::builder()
            .default_retries(1)
            .send_timeout(Duration::from_millis(100))
            .build(),
    );

    let controller = h.controller.clone();
    let exec = tokio::spawn(async move {
        controller
            .send_command(
                node(5),
                BasicCCSet::builder().target_value(BinarySet::On).build(),
            )
            .await
    });

    // Initial send plus one timed-out retry
    let first = h.next_outbound_packet().await;
    let second = h.next_outbound_packet().await;
    assert_eq!(first.seq_number, second.seq_number);

    let result = exec.await.unwrap();
    assert_eq!(result, Err(Error::Timeout));
}
