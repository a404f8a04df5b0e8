//! Circuit breaker over a rolling outcome window.
//!
//! States: CLOSED → OPEN → HALF_OPEN → CLOSED. While OPEN, calls are
//! refused without touching the network; after the cool-down one trial
//! call is admitted (HALF_OPEN), and its outcome decides whether the
//! circuit closes again or re-opens.
//!
//! All state is owned here and synchronized behind a mutex; callers
//! interact only through [`CircuitBreaker::try_acquire`] and the
//! `record_*` methods.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// The three breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

/// Tunable parameters for the breaker.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Number of most recent call outcomes considered.
    pub window_size: usize,
    /// Failure fraction of the window capacity that trips the circuit.
    /// With the default 0.5, half a window of failures opens it.
    pub failure_threshold: f64,
    /// How long the circuit stays OPEN before admitting a trial call.
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 8,
            failure_threshold: 0.5,
            cooldown: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    /// Rolling window of outcomes, `true` = success.
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    /// Whether the single HALF_OPEN trial call is currently in flight.
    trial_in_flight: bool,
}

/// A circuit breaker for one named operation.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                window: VecDeque::new(),
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    /// Current state, transitioning OPEN → HALF_OPEN if the cool-down
    /// has elapsed.
    pub fn state(&self) -> BreakerState {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        self.maybe_half_open(&mut inner);
        inner.state
    }

    /// Ask permission for one call.
    ///
    /// Returns `false` when the circuit is OPEN (still cooling down) or
    /// a HALF_OPEN trial is already in flight; the caller must then
    /// short-circuit to its fallback without attempting the network.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        self.maybe_half_open(&mut inner);
        match inner.state {
            BreakerState::Closed => true,
            BreakerState::Open => false,
            BreakerState::HalfOpen => {
                if inner.trial_in_flight {
                    false
                } else {
                    inner.trial_in_flight = true;
                    true
                }
            }
        }
    }

    /// Record a successful call.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        match inner.state {
            BreakerState::HalfOpen => {
                tracing::info!("Circuit breaker trial succeeded, closing circuit");
                inner.state = BreakerState::Closed;
                inner.window.clear();
                inner.opened_at = None;
                inner.trial_in_flight = false;
            }
            BreakerState::Closed => {
                Self::push_outcome(&mut inner, self.config.window_size, true);
            }
            BreakerState::Open => {}
        }
    }

    /// Record a failed call, possibly tripping the circuit.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        match inner.state {
            BreakerState::HalfOpen => {
                tracing::warn!("Circuit breaker trial failed, re-opening circuit");
                inner.state = BreakerState::Open;
                inner.opened_at = Some(Instant::now());
                inner.trial_in_flight = false;
            }
            BreakerState::Closed => {
                Self::push_outcome(&mut inner, self.config.window_size, false);
                let failures = inner.window.iter().filter(|ok| !**ok).count();
                let rate = failures as f64 / self.config.window_size as f64;
                if rate >= self.config.failure_threshold {
                    tracing::warn!(
                        failures,
                        window = self.config.window_size,
                        "Failure rate crossed threshold, opening circuit"
                    );
                    inner.state = BreakerState::Open;
                    inner.opened_at = Some(Instant::now());
                }
            }
            BreakerState::Open => {}
        }
    }

    fn push_outcome(inner: &mut BreakerInner, window_size: usize, ok: bool) {
        if inner.window.len() == window_size {
            inner.window.pop_front();
        }
        inner.window.push_back(ok);
    }

    fn maybe_half_open(&self, inner: &mut BreakerInner) {
        if inner.state == BreakerState::Open {
            let cooled = inner
                .opened_at
                .is_some_and(|at| at.elapsed() >= self.config.cooldown);
            if cooled {
                tracing::info!("Circuit breaker cool-down elapsed, admitting trial call");
                inner.state = BreakerState::HalfOpen;
                inner.trial_in_flight = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(window_size: usize, cooldown: Duration) -> CircuitBreaker {
        CircuitBreaker::new(BreakerConfig {
            window_size,
            failure_threshold: 0.5,
            cooldown,
        })
    }

    #[test]
    fn two_failures_in_four_call_window_trip_the_circuit() {
        let cb = breaker(4, Duration::from_secs(60));
        assert!(cb.try_acquire());
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::Closed);

        assert!(cb.try_acquire());
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::Open);

        // Short-circuit while open.
        assert!(!cb.try_acquire());
    }

    #[test]
    fn successes_never_trip() {
        let cb = breaker(4, Duration::from_secs(60));
        for _ in 0..10 {
            assert!(cb.try_acquire());
            cb.record_success();
        }
        assert_eq!(cb.state(), BreakerState::Closed);
    }

    #[test]
    fn below_threshold_stays_closed() {
        let cb = breaker(4, Duration::from_secs(60));
        cb.record_success();
        cb.record_success();
        cb.record_success();
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::Closed);
        assert!(cb.try_acquire());
    }

    #[test]
    fn old_outcomes_roll_out_of_the_window() {
        let cb = breaker(4, Duration::from_secs(60));
        cb.record_failure();
        // Three successes push the failure toward the window edge...
        cb.record_success();
        cb.record_success();
        cb.record_success();
        // ...and a fourth evicts it, so one new failure is 1/4 again.
        cb.record_success();
        cb.record_failure();
        assert_eq!(cb.state(), BreakerState::Closed);
    }

    #[test]
    fn half_open_trial_success_closes() {
        let cb = breaker(4, Duration::ZERO);
        cb.record_failure();
        cb.record_failure();
        // Zero cool-down: next acquire is the half-open trial.
        assert_eq!(cb.state(), BreakerState::HalfOpen);
        assert!(cb.try_acquire());
        // Only one trial at a time.
        assert!(!cb.try_acquire());
        cb.record_success();
        assert_eq!(cb.state(), BreakerState::Closed);
        assert!(cb.try_acquire());
    }

    #[test]
    fn half_open_trial_failure_reopens() {
        let cb = breaker(4, Duration::from_millis(10));
        cb.record_failure();
        cb.record_failure();
        std::thread::sleep(Duration::from_millis(20));
        assert!(cb.try_acquire());
        cb.record_failure();
        assert!(!cb.try_acquire());
    }
}
