use portsync_core::cond::{
    CondOp, CondState, WakeClass, cond_transition, spurious_wakeup_policy,
};
use portsync_core::status::Verdict;

#[derive(Clone, Copy)]
struct Case {
    state: CondState,
    op: CondOp,
    waiters: u32,
    expected_state: CondState,
    expected_verdict: Verdict,
    expected_blocks: bool,
    expected_wakes: WakeClass,
}

fn state_name(state: CondState) -> &'static str {
    match state {
        CondState::Uninitialized => "Uninitialized",
        CondState::Idle => "Idle",
        CondState::HasWaiters => "HasWaiters",
        CondState::Destroyed => "Destroyed",
    }
}

fn op_name(op: CondOp) -> &'static str {
    match op {
        CondOp::Init => "Init",
        CondOp::Wait => "Wait",
        CondOp::TimedWait => "TimedWait",
        CondOp::Signal => "Signal",
        CondOp::Broadcast => "Broadcast",
        CondOp::Destroy => "Destroy",
    }
}

fn matrix_cases() -> Vec<Case> {
    vec![
        Case {
            state: CondState::Uninitialized,
            op: CondOp::Init,
            waiters: 0,
            expected_state: CondState::Idle,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Uninitialized,
            op: CondOp::Wait,
            waiters: 0,
            expected_state: CondState::Uninitialized,
            expected_verdict: Verdict::Undefined,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Idle,
            op: CondOp::Wait,
            waiters: 0,
            expected_state: CondState::HasWaiters,
            expected_verdict: Verdict::Success,
            expected_blocks: true,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Idle,
            op: CondOp::TimedWait,
            waiters: 0,
            expected_state: CondState::HasWaiters,
            expected_verdict: Verdict::Success,
            expected_blocks: true,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Idle,
            op: CondOp::Signal,
            waiters: 0,
            expected_state: CondState::Idle,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Idle,
            op: CondOp::Broadcast,
            waiters: 0,
            expected_state: CondState::Idle,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Idle,
            op: CondOp::Destroy,
            waiters: 0,
            expected_state: CondState::Destroyed,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::HasWaiters,
            op: CondOp::Wait,
            waiters: 2,
            expected_state: CondState::HasWaiters,
            expected_verdict: Verdict::Success,
            expected_blocks: true,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::HasWaiters,
            op: CondOp::Signal,
            waiters: 1,
            expected_state: CondState::Idle,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::One,
        },
        Case {
            state: CondState::HasWaiters,
            op: CondOp::Signal,
            waiters: 4,
            expected_state: CondState::HasWaiters,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::One,
        },
        Case {
            state: CondState::HasWaiters,
            op: CondOp::Broadcast,
            waiters: 4,
            expected_state: CondState::Idle,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::All,
        },
        Case {
            state: CondState::HasWaiters,
            op: CondOp::Destroy,
            waiters: 1,
            expected_state: CondState::HasWaiters,
            expected_verdict: Verdict::Undefined,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Destroyed,
            op: CondOp::Init,
            waiters: 0,
            expected_state: CondState::Idle,
            expected_verdict: Verdict::Success,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
        Case {
            state: CondState::Destroyed,
            op: CondOp::Signal,
            waiters: 0,
            expected_state: CondState::Destroyed,
            expected_verdict: Verdict::Undefined,
            expected_blocks: false,
            expected_wakes: WakeClass::None,
        },
    ]
}

#[test]
fn cond_contract_matrix_holds() {
    for case in matrix_cases() {
        let label = format!(
            "{}/{} waiters={}",
            state_name(case.state),
            op_name(case.op),
            case.waiters
        );
        let out = cond_transition(case.state, case.op, case.waiters);
        assert_eq!(out.next, case.expected_state, "next mismatch: {label}");
        assert_eq!(out.verdict, case.expected_verdict, "verdict mismatch: {label}");
        assert_eq!(out.blocks, case.expected_blocks, "blocks mismatch: {label}");
        assert_eq!(out.wakes, case.expected_wakes, "wakes mismatch: {label}");
    }
}

#[test]
fn every_defined_transition_maps_to_a_flat_code() {
    for case in matrix_cases() {
        let out = cond_transition(case.state, case.op, case.waiters);
        match out.verdict {
            Verdict::Success => assert_eq!(out.verdict.code(), Some(0)),
            Verdict::Failure => assert_eq!(out.verdict.code(), Some(1)),
            Verdict::Undefined => assert_eq!(out.verdict.code(), None),
        }
    }
}

#[test]
fn policy_text_is_stable() {
    // The predicate-loop requirement is part of the public contract.
    assert!(spurious_wakeup_policy().contains("loop"));
}
