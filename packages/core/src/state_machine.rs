#[macro_use]
mod macros;

mod traits;
pub use traits::*;

#[cfg(test)]
mod test {
    use super::StateMachine;
    use std::time::Duration;

    state_machine! { FSM {
        State = {
            Initial,
            WaitingForResponse,
            WaitingForCallback,
            Done(u8),
        },
        Input = {
            Sent,
            Response,
            Callback,
        },
        Effect = {
            Send,
        },
        Condition = {
            ExpectsCallback,
        },
        Transitions = [
            [Initial => [
                [Sent => ! Send => WaitingForResponse]
            ]],
            [WaitingForResponse => [
                [Response if ExpectsCallback => WaitingForCallback],
                [Response => Done(0)],
            ]],
            [WaitingForCallback => [
                [Callback => Done(1)],
            ]],
        ],
        Delays = [
            [WaitingForResponse => [
                [Duration::from_millis(1000) => ! Send => Done(2)]
            ]],
        ],
        Initial = Initial,
        Final = Done(_)
    } }

    #[test]
    fn test_fsm() {
        let mut fsm = FSM::default();

        // Start the state machine
        let transition = fsm.next(FSMInput::Sent, |_| true);
        assert!(transition.is_some());
        let transition = transition.unwrap();
        assert_eq!(transition.effect, Some(FSMEffect::Send));
        fsm.transition(transition.new_state);
        assert_eq!(fsm.state(), &FSMState::WaitingForResponse);
        assert_eq!(fsm.delays().map(|d| d.len()), Some(1));

        // Send an unexpected input
        let transition = fsm.next(FSMInput::Callback, |_| true);
        assert!(transition.is_none());
        assert_eq!(fsm.state(), &FSMState::WaitingForResponse);

        // Send the expected input
        let transition = fsm.next(FSMInput::Response, |_| true);
        assert!(transition.is_some());
        let transition = transition.unwrap();
        fsm.transition(transition.new_state);
        assert_eq!(fsm.state(), &FSMState::WaitingForCallback);

        // Send the expected input
        let transition = fsm.next(FSMInput::Callback, |_| true);
        assert!(transition.is_some());
        let transition = transition.unwrap();
        fsm.transition(transition.new_state);
        assert_eq!(fsm.state(), &FSMState::Done(1));

        assert!(fsm.done());
    }

    #[test]
    fn test_fsm_condition() {
        let mut fsm = FSM::default();

        let transition = fsm.next(FSMInput::Sent, |_| false).unwrap();
        fsm.transition(transition.new_state);

        // Without the callback condition, the response finishes the machine
        let transition = fsm.next(FSMInput::Response, |_| false).unwrap();
        fsm.transition(transition.new_state);
        assert_eq!(fsm.state(), &FSMState::Done(0));
    }
}
