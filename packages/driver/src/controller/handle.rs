use super::{
    awaited::Predicate, CommandOutcome, CommandResult, Controller, ControllerEvent,
    ControllerInput,
};
use crate::error::{Error, Result};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use zip_cc::prelude::*;
use zip_core::prelude::*;

macro_rules! expect_report {
    ($outcome:expr, $report:ident) => {
        match $outcome {
            CommandOutcome::Done(CommandResult::Report(CC::$report(report))) => Ok(report),
            _ => Err(Error::Internal),
        }
    };
}

impl Controller {
    /// The coordinator's current mode
    pub fn network_mode(&self) -> NetworkMode {
        self.storage.network_mode()
    }

    /// Subscribes to everything the coordinator does not consume itself:
    /// unsolicited reports, notifications and mode changes
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.event_tx.subscribe()
    }

    async fn exec_with(&self, node_id: Option<NodeId>, command: CC) -> Result<CommandOutcome> {
        let (callback, rx) = oneshot::channel();
        self.exec_input(ControllerInput::ExecCommand {
            command,
            node_id,
            callback,
        })
        .await?;
        rx.await.map_err(|_| Error::Cancelled)?
    }

    /// Runs any command through the full send/ack/retry/queue cycle
    pub async fn exec_command(&self, command: impl Into<CC>) -> Result<CommandOutcome> {
        self.exec_with(None, command.into()).await
    }

    /// Runs a command addressed to a node. A queued outcome means the node
    /// sleeps and the gateway parked the command in its mailbox.
    pub async fn exec_node_command(
        &self,
        node_id: NodeId,
        command: impl Into<CC>,
    ) -> Result<CommandOutcome> {
        self.exec_with(Some(node_id), command.into()).await
    }

    /// Like [Controller::exec_node_command], but waits through the mailbox
    /// delay of a sleeping node instead of returning a queued handle
    pub async fn send_command(
        &self,
        node_id: NodeId,
        command: impl Into<CC>,
    ) -> Result<CommandResult> {
        match self.exec_node_command(node_id, command).await? {
            CommandOutcome::Done(result) => Ok(result),
            CommandOutcome::Queued(queued) => queued.try_await().await,
        }
    }

    /// Waits for any command matching the given predicate, e.g. the key and
    /// DSK prompts the gateway pushes during an S2 inclusion
    pub async fn await_cc(
        &self,
        predicate: Predicate<CC>,
        timeout: Option<Duration>,
    ) -> Result<CC> {
        let (callback, rx) = oneshot::channel();
        self.exec_input(ControllerInput::AwaitCC {
            predicate,
            timeout,
            callback,
        })
        .await?;
        rx.await.map_err(|_| Error::Cancelled)?
    }

    /// Fetches the list of nodes in the network
    pub async fn get_node_list(&self) -> Result<NetworkManagementProxyCCNodeListReport> {
        let outcome = self
            .exec_command(NetworkManagementProxyCCNodeListGet::builder().seq_no(0).build())
            .await?;
        expect_report!(outcome, NetworkManagementProxyCCNodeListReport)
    }

    /// Fetches the gateway's cached node information frame for one node
    pub async fn get_node_info(
        &self,
        node_id: NodeId,
    ) -> Result<NetworkManagementProxyCCNodeInfoCachedReport> {
        let outcome = self
            .exec_command(
                NetworkManagementProxyCCNodeInfoCachedGet::builder()
                    .seq_no(0)
                    .node_id(node_id)
                    .build(),
            )
            .await?;
        expect_report!(outcome, NetworkManagementProxyCCNodeInfoCachedReport)
    }

    /// Puts the gateway into inclusion mode and waits for a node to join.
    /// On success the coordinator stays in the configuring-new-node mode
    /// until [Controller::configuration_done] is called.
    pub async fn include_node(&self) -> Result<NetworkManagementInclusionCCNodeAddStatus> {
        let outcome = self
            .exec_command(NetworkManagementInclusionCCNodeAdd::builder().seq_no(0).build())
            .await?;
        expect_report!(outcome, NetworkManagementInclusionCCNodeAddStatus)
    }

    /// Aborts a running inclusion
    pub async fn stop_inclusion(&self) -> Result<()> {
        self.exec_command(
            NetworkManagementInclusionCCNodeAdd::builder()
                .seq_no(0)
                .mode(NodeAddMode::Stop)
                .build(),
        )
        .await?;
        Ok(())
    }

    /// Puts the gateway into exclusion mode and waits for a node to leave
    pub async fn exclude_node(&self) -> Result<NetworkManagementInclusionCCNodeRemoveStatus> {
        let outcome = self
            .exec_command(NetworkManagementInclusionCCNodeRemove::builder().seq_no(0).build())
            .await?;
        expect_report!(outcome, NetworkManagementInclusionCCNodeRemoveStatus)
    }

    /// Aborts a running exclusion
    pub async fn stop_exclusion(&self) -> Result<()> {
        self.exec_command(
            NetworkManagementInclusionCCNodeRemove::builder()
                .seq_no(0)
                .mode(NodeRemoveMode::Stop)
                .build(),
        )
        .await?;
        Ok(())
    }

    /// Signals that the freshly included node is fully configured, returning
    /// the coordinator to idle
    pub async fn configuration_done(&self) -> Result<()> {
        self.exec_input(ControllerInput::ConfigurationDone).await
    }

    /// Grants (or denies) the S2 keys a joining node requested
    pub async fn grant_s2_keys(&self, keys: Vec<SecurityKey>, grant_csa: bool) -> Result<()> {
        self.exec_command(
            NetworkManagementInclusionCCNodeAddKeysSet::builder()
                .seq_no(0)
                .grant_csa(grant_csa)
                .granted_keys(keys)
                .build(),
        )
        .await?;
        Ok(())
    }

    /// Provides the user-entered DSK digits during an S2 inclusion
    pub async fn set_s2_dsk(&self, input_length: u8, dsk_input: Dsk) -> Result<()> {
        self.exec_command(
            NetworkManagementInclusionCCNodeAddDskSet::builder()
                .seq_no(0)
                .input_length(input_length)
                .dsk_input(dsk_input)
                .build(),
        )
        .await?;
        Ok(())
    }

    /// Puts this controller into learn mode so another controller can include
    /// it into its network
    pub async fn enable_learn_mode(
        &self,
    ) -> Result<NetworkManagementBasicCCLearnModeSetStatus> {
        let outcome = self
            .exec_command(NetworkManagementBasicCCLearnModeSet::builder().seq_no(0).build())
            .await?;
        expect_report!(outcome, NetworkManagementBasicCCLearnModeSetStatus)
    }

    /// Resets the gateway to factory defaults
    pub async fn set_default(&self) -> Result<NetworkManagementBasicCCDefaultSetComplete> {
        let outcome = self
            .exec_command(NetworkManagementBasicCCDefaultSet::builder().seq_no(0).build())
            .await?;
        expect_report!(outcome, NetworkManagementBasicCCDefaultSetComplete)
    }

    /// Cancels all in-flight commands and stops the actor
    pub async fn shutdown(&self) -> Result<()> {
        self.exec_input(ControllerInput::Shutdown).await
    }
}
