use zip_core::state_machine;
use zip_core::state_machine::StateMachine;

/// How a command's send/ack/retry/queue cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipCommandResult {
    Success,
    NackResponse,
    QueueFull,
    OptionError,
    Timeout,
}

// The per-command state machine. One instance exists per in-flight command;
// the controller actor feeds it classified packets and the expiry of the
// send timeout, executes its effects and reads the terminal result.
//
// The uniform cycle: a send is answered by an ack (done, or wait for the
// report for GET-style commands), a nack (retry while retries remain, then
// fail), or a nack+waiting (park as queued when the target node sleeps,
// unless a freshly included node is being configured). A timeout counts as
// a nack for retry purposes.
state_machine! { ZipCommandMachine {
    State = {
        Initial,
        WaitForAck,
        WaitForReport,
        Queued,
        Done(ZipCommandResult),
    },
    Input = {
        Start,
        Ack,
        Nack,
        NackQueueFull,
        NackOptionError,
        SleepingDelay,
        Report,
        Timeout,
    },
    Effect = {
        SendFrame,
        NotifyQueued,
    },
    Condition = {
        ExpectsReport,
        MayQueue,
        HasRetries,
    },
    Transitions = [
        [Initial => [
            [Start => ! SendFrame => WaitForAck],
        ]],
        [WaitForAck => [
            [Ack if ExpectsReport => WaitForReport],
            [Ack => Done(ZipCommandResult::Success)],
            [Nack if HasRetries => ! SendFrame => WaitForAck],
            [Nack => Done(ZipCommandResult::NackResponse)],
            [NackQueueFull => Done(ZipCommandResult::QueueFull)],
            [NackOptionError => Done(ZipCommandResult::OptionError)],
            [SleepingDelay if MayQueue => ! NotifyQueued => Queued],
            [SleepingDelay => WaitForAck],
            // Some gateways deliver the report before (or instead of) the ack
            [Report if ExpectsReport => Done(ZipCommandResult::Success)],
            [Timeout if HasRetries => ! SendFrame => WaitForAck],
            [Timeout => Done(ZipCommandResult::Timeout)],
        ]],
        [WaitForReport => [
            [Report => Done(ZipCommandResult::Success)],
            [Timeout if HasRetries => ! SendFrame => WaitForAck],
            [Timeout => Done(ZipCommandResult::Timeout)],
        ]],
        [Queued => [
            [Ack if ExpectsReport => WaitForReport],
            [Ack => Done(ZipCommandResult::Success)],
            [Report => Done(ZipCommandResult::Success)],
            [Nack => Done(ZipCommandResult::NackResponse)],
            [NackQueueFull => Done(ZipCommandResult::QueueFull)],
        ]],
    ],
    Delays = [],
    Initial = Initial,
    Final = Done(_)
} }

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::state_machine::StateMachine;

    fn advance(
        machine: &mut ZipCommandMachine,
        input: ZipCommandMachineInput,
        expects_report: bool,
        may_queue: bool,
        has_retries: bool,
    ) -> Option<ZipCommandMachineEffect> {
        use zip_core::state_machine::StateMachineTransition;
        let transition = machine.next(input, |cond| match cond {
            ZipCommandMachineCondition::ExpectsReport => expects_report,
            ZipCommandMachineCondition::MayQueue => may_queue,
            ZipCommandMachineCondition::HasRetries => has_retries,
        })?;
        let effect = transition.effect();
        machine.transition(transition.new_state());
        effect
    }

    #[test]
    fn test_ack_completes_simple_command() {
        let mut machine = ZipCommandMachine::default();
        assert_eq!(
            advance(&mut machine, ZipCommandMachineInput::Start, false, true, true),
            Some(ZipCommandMachineEffect::SendFrame)
        );
        advance(&mut machine, ZipCommandMachineInput::Ack, false, true, true);
        assert_eq!(
            machine.state(),
            &ZipCommandMachineState::Done(ZipCommandResult::Success)
        );
    }

    #[test]
    fn test_nack_retries_until_exhausted() {
        let mut machine = ZipCommandMachine::default();
        let mut retries = 2u8;
        let mut sends = 0u8;

        if advance(&mut machine, ZipCommandMachineInput::Start, false, true, retries > 0)
            == Some(ZipCommandMachineEffect::SendFrame)
        {
            sends += 1;
        }

        // Three nacks: two re-sends, then a terminal failure
        for _ in 0..3 {
            let effect = advance(
                &mut machine,
                ZipCommandMachineInput::Nack,
                false,
                true,
                retries > 0,
            );
            if effect == Some(ZipCommandMachineEffect::SendFrame) {
                retries -= 1;
                sends += 1;
            }
        }

        assert_eq!(sends, 3);
        assert_eq!(
            machine.state(),
            &ZipCommandMachineState::Done(ZipCommandResult::NackResponse)
        );
    }

    #[test]
    fn test_sleeping_delay_queues_outside_configuration() {
        let mut machine = ZipCommandMachine::default();
        advance(&mut machine, ZipCommandMachineInput::Start, false, true, true);
        let effect = advance(
            &mut machine,
            ZipCommandMachineInput::SleepingDelay,
            false,
            true,
            true,
        );
        assert_eq!(effect, Some(ZipCommandMachineEffect::NotifyQueued));
        assert_eq!(machine.state(), &ZipCommandMachineState::Queued);

        // The gateway acks the original send once the node woke up
        advance(&mut machine, ZipCommandMachineInput::Ack, false, true, true);
        assert_eq!(
            machine.state(),
            &ZipCommandMachineState::Done(ZipCommandResult::Success)
        );
    }

    #[test]
    fn test_sleeping_delay_is_ignored_while_configuring() {
        let mut machine = ZipCommandMachine::default();
        advance(&mut machine, ZipCommandMachineInput::Start, false, false, true);
        let effect = advance(
            &mut machine,
            ZipCommandMachineInput::SleepingDelay,
            false,
            false,
            true,
        );
        assert_eq!(effect, None);
        assert_eq!(machine.state(), &ZipCommandMachineState::WaitForAck);
    }

    #[test]
    fn test_timeout_counts_as_nack() {
        let mut machine = ZipCommandMachine::default();
        advance(&mut machine, ZipCommandMachineInput::Start, false, true, false);
        advance(&mut machine, ZipCommandMachineInput::Timeout, false, true, false);
        assert_eq!(
            machine.state(),
            &ZipCommandMachineState::Done(ZipCommandResult::Timeout)
        );
    }

    #[test]
    fn test_get_command_waits_for_report() {
        let mut machine = ZipCommandMachine::default();
        advance(&mut machine, ZipCommandMachineInput::Start, true, true, true);
        advance(&mut machine, ZipCommandMachineInput::Ack, true, true, true);
        assert_eq!(machine.state(), &ZipCommandMachineState::WaitForReport);
        advance(&mut machine, ZipCommandMachineInput::Report, true, true, true);
        assert_eq!(
            machine.state(),
            &ZipCommandMachineState::Done(ZipCommandResult::Success)
        );
    }
}
