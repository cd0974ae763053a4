//! Executable conformance scenarios.
//!
//! Each scenario drives the shim through its flat parity surface and
//! returns `Ok(detail)` when every check holds or `Err(detail)` naming
//! the first violated check. Scenarios are self-contained and bound
//! every wait with a generous guard deadline so a regression shows up
//! as a failure, not a hang.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use portsync_core::deadline::{MIN_WAIT_MS, Timespec, wait_budget_ms};
use portsync_core::status::OK;
use portsync_shim::{ShimCond, ShimMutex, api, wall_clock_now};

/// Tunables shared by all scenarios.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioConfig {
    /// Worker threads for contention scenarios.
    pub threads: usize,
    /// Iterations per worker (lock churn, detach cycles).
    pub iterations: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            iterations: 200,
        }
    }
}

/// A scenario body.
pub type ScenarioFn = fn(&ScenarioConfig) -> Result<String, String>;

/// Registered scenarios, in execution order.
pub const SCENARIOS: &[(&str, ScenarioFn)] = &[
    ("exclusive-hold", exclusive_hold),
    ("signal-handoff", signal_handoff),
    ("signal-drain", signal_drain),
    ("broadcast-release", broadcast_release),
    ("timeout-window", timeout_window),
    ("past-deadline", past_deadline),
    ("detach-churn", detach_churn),
];

/// Look up a scenario by name.
#[must_use]
pub fn find(name: &str) -> Option<ScenarioFn> {
    SCENARIOS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, body)| *body)
}

fn guard_deadline() -> Timespec {
    Timespec::after_ms(wall_clock_now(), 10_000)
}

fn poll_until(predicate: impl Fn() -> bool, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if predicate() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    predicate()
}

/// At most one thread between lock and unlock, across every
/// (thread, iteration) pair.
fn exclusive_hold(config: &ScenarioConfig) -> Result<String, String> {
    let mutex = ShimMutex::new();
    let in_critical = AtomicUsize::new(0);
    let overlap = AtomicBool::new(false);
    let total = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..config.threads {
            s.spawn(|| {
                for _ in 0..config.iterations {
                    api::mutex_lock(Some(&mutex));
                    if in_critical.fetch_add(1, Ordering::SeqCst) != 0 {
                        overlap.store(true, Ordering::SeqCst);
                    }
                    total.fetch_add(1, Ordering::SeqCst);
                    in_critical.fetch_sub(1, Ordering::SeqCst);
                    api::mutex_unlock(Some(&mutex));
                }
            });
        }
    });

    if overlap.load(Ordering::SeqCst) {
        return Err("two threads were inside the critical section".into());
    }
    let expected = config.threads * config.iterations;
    let got = total.load(Ordering::SeqCst);
    if got != expected {
        return Err(format!("expected {expected} guarded increments, got {got}"));
    }
    Ok(format!("{expected} guarded increments, no overlap"))
}

/// A waits on C under M; B mutates shared state and signals; A wakes
/// holding M and observes the mutation exactly once.
fn signal_handoff(_config: &ScenarioConfig) -> Result<String, String> {
    let mutex = ShimMutex::new();
    let cond = ShimCond::new();
    let state = AtomicUsize::new(0);
    let observed = AtomicUsize::new(0);
    let held_on_wake = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            api::mutex_lock(Some(&mutex));
            let deadline = guard_deadline();
            while state.load(Ordering::SeqCst) == 0 {
                if api::cond_timedwait(Some(&cond), Some(&mutex), Some(deadline)) != OK {
                    break;
                }
            }
            held_on_wake.store(mutex.is_locked(), Ordering::SeqCst);
            observed.store(state.load(Ordering::SeqCst), Ordering::SeqCst);
            api::mutex_unlock(Some(&mutex));
        });

        if !poll_until(|| cond.has_waiters(), Duration::from_secs(5)) {
            return Err("waiter never parked".to_string());
        }
        api::mutex_lock(Some(&mutex));
        state.fetch_add(1, Ordering::SeqCst);
        api::cond_signal(Some(&cond));
        api::mutex_unlock(Some(&mutex));
        Ok(())
    })?;

    if !held_on_wake.load(Ordering::SeqCst) {
        return Err("wait returned without holding the mutex".into());
    }
    match observed.load(Ordering::SeqCst) {
        1 => Ok("state mutated exactly once, handoff observed".into()),
        n => Err(format!("waiter observed state {n}, expected 1")),
    }
}

/// One signal per waiter drains all of them; no signal wakes more than
/// one thread.
fn signal_drain(config: &ScenarioConfig) -> Result<String, String> {
    let waiters = config.threads.max(2);
    let mutex = ShimMutex::new();
    let cond = ShimCond::new();
    let parked = AtomicUsize::new(0);
    let tokens = AtomicUsize::new(0);
    let drained = AtomicUsize::new(0);

    let result = thread::scope(|s| {
        for _ in 0..waiters {
            s.spawn(|| {
                api::mutex_lock(Some(&mutex));
                parked.fetch_add(1, Ordering::SeqCst);
                let deadline = guard_deadline();
                loop {
                    if tokens.load(Ordering::SeqCst) > 0 {
                        tokens.fetch_sub(1, Ordering::SeqCst);
                        drained.fetch_add(1, Ordering::SeqCst);
                        break;
                    }
                    if api::cond_timedwait(Some(&cond), Some(&mutex), Some(deadline)) != OK {
                        break;
                    }
                }
                api::mutex_unlock(Some(&mutex));
            });
        }

        let assembled = poll_until(
            || {
                api::mutex_lock(Some(&mutex));
                let all_in = parked.load(Ordering::SeqCst) == waiters;
                api::mutex_unlock(Some(&mutex));
                all_in
            },
            Duration::from_secs(5),
        );
        if !assembled {
            return Err("waiters never assembled".to_string());
        }

        for round in 0..waiters {
            api::mutex_lock(Some(&mutex));
            tokens.fetch_add(1, Ordering::SeqCst);
            let woken = cond.signal();
            api::mutex_unlock(Some(&mutex));
            if woken > 1 {
                return Err(format!("signal released {woken} waiters in round {round}"));
            }
            if !poll_until(|| tokens.load(Ordering::SeqCst) == 0, Duration::from_secs(5)) {
                return Err(format!("token from round {round} never consumed"));
            }
        }
        Ok(())
    });
    result?;

    let got = drained.load(Ordering::SeqCst);
    if got != waiters {
        return Err(format!("{got} of {waiters} waiters drained"));
    }
    Ok(format!("{waiters} waiters drained by {waiters} signals"))
}

/// A single broadcast releases every waiter present at call time.
fn broadcast_release(config: &ScenarioConfig) -> Result<String, String> {
    let waiters = config.threads.max(2);
    let mutex = ShimMutex::new();
    let cond = ShimCond::new();
    let parked = AtomicUsize::new(0);
    let go = AtomicBool::new(false);
    let released = AtomicUsize::new(0);

    let result = thread::scope(|s| {
        for _ in 0..waiters {
            s.spawn(|| {
                api::mutex_lock(Some(&mutex));
                parked.fetch_add(1, Ordering::SeqCst);
                let deadline = guard_deadline();
                while !go.load(Ordering::SeqCst) {
                    if api::cond_timedwait(Some(&cond), Some(&mutex), Some(deadline)) != OK {
                        break;
                    }
                }
                if go.load(Ordering::SeqCst) {
                    released.fetch_add(1, Ordering::SeqCst);
                }
                api::mutex_unlock(Some(&mutex));
            });
        }

        let assembled = poll_until(
            || {
                api::mutex_lock(Some(&mutex));
                let all_in = parked.load(Ordering::SeqCst) == waiters;
                api::mutex_unlock(Some(&mutex));
                all_in
            },
            Duration::from_secs(5),
        );
        if !assembled {
            return Err("waiters never assembled".to_string());
        }

        api::mutex_lock(Some(&mutex));
        go.store(true, Ordering::SeqCst);
        api::cond_broadcast(Some(&cond));
        api::mutex_unlock(Some(&mutex));
        Ok(())
    });
    result?;

    let got = released.load(Ordering::SeqCst);
    if got != waiters {
        return Err(format!("broadcast released {got} of {waiters} waiters"));
    }
    Ok(format!("broadcast released all {waiters} waiters"))
}

/// An unsignaled 50 ms timed wait reports a timeout inside the
/// tolerance window. The budget is computed against whole wall-clock
/// seconds, so the upper bound allows ~1s of slack.
fn timeout_window(_config: &ScenarioConfig) -> Result<String, String> {
    let mutex = ShimMutex::new();
    let cond = ShimCond::new();

    api::mutex_lock(Some(&mutex));
    let deadline = Timespec::after_ms(wall_clock_now(), 50);
    let start = Instant::now();
    let code = api::cond_timedwait(Some(&cond), Some(&mutex), Some(deadline));
    let elapsed = start.elapsed();
    let still_held = mutex.is_locked();
    api::mutex_unlock(Some(&mutex));

    if code == OK {
        return Err("unsignaled timed wait reported success".into());
    }
    if !still_held {
        return Err("timed wait returned without holding the mutex".into());
    }
    if elapsed < Duration::from_millis(45) {
        return Err(format!("woke early after {elapsed:?}"));
    }
    if elapsed >= Duration::from_secs(2) {
        return Err(format!("wait overshot to {elapsed:?}"));
    }
    Ok(format!("timed out after {elapsed:?}"))
}

/// A deadline already in the past converts to the minimal positive
/// budget and the wait returns promptly.
fn past_deadline(_config: &ScenarioConfig) -> Result<String, String> {
    let stale = Timespec::new(1, 0);
    let budget = wait_budget_ms(Some(stale), wall_clock_now().tv_sec);
    if budget != Some(MIN_WAIT_MS) {
        return Err(format!("stale deadline converted to {budget:?}"));
    }

    let mutex = ShimMutex::new();
    let cond = ShimCond::new();
    api::mutex_lock(Some(&mutex));
    let start = Instant::now();
    let code = api::cond_timedwait(Some(&cond), Some(&mutex), Some(stale));
    let elapsed = start.elapsed();
    api::mutex_unlock(Some(&mutex));

    if code == OK {
        return Err("stale deadline reported success".into());
    }
    if elapsed >= Duration::from_secs(1) {
        return Err(format!("stale deadline blocked for {elapsed:?}"));
    }
    Ok(format!("clamped to {MIN_WAIT_MS} ms, returned after {elapsed:?}"))
}

static CHURN_COMPLETED: AtomicUsize = AtomicUsize::new(0);

fn churn_body(arg: usize) -> usize {
    CHURN_COMPLETED.fetch_add(1, Ordering::SeqCst);
    arg
}

/// Create/detach cycles neither block on detach nor lose completions.
fn detach_churn(config: &ScenarioConfig) -> Result<String, String> {
    let cycles = config.iterations.max(1);
    let before = CHURN_COMPLETED.load(Ordering::SeqCst);

    for cycle in 0..cycles {
        let id = portsync_shim::thread::spawn(churn_body, cycle)
            .map_err(|err| format!("spawn failed in cycle {cycle}: {err}"))?;
        let start = Instant::now();
        if api::thread_detach(id) != OK {
            return Err(format!("detach reported failure in cycle {cycle}"));
        }
        if start.elapsed() >= Duration::from_secs(1) {
            return Err(format!("detach blocked in cycle {cycle}"));
        }
    }

    let target = before + cycles;
    if !poll_until(
        || CHURN_COMPLETED.load(Ordering::SeqCst) >= target,
        Duration::from_secs(30),
    ) {
        let done = CHURN_COMPLETED.load(Ordering::SeqCst) - before;
        return Err(format!("only {done} of {cycles} detached threads completed"));
    }
    Ok(format!("{cycles} create/detach cycles completed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_finds_every_scenario_by_name() {
        for (name, _) in SCENARIOS {
            assert!(find(name).is_some(), "missing {name}");
        }
        assert!(find("no-such-scenario").is_none());
    }

    #[test]
    fn quick_scenarios_pass_with_a_small_config() {
        let config = ScenarioConfig {
            threads: 2,
            iterations: 8,
        };
        for name in ["exclusive-hold", "past-deadline", "detach-churn"] {
            let body = find(name).unwrap();
            assert!(body(&config).is_ok(), "{name} failed");
        }
    }
}
