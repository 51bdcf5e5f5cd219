//! Reorder gate — the latch guarding the ranking collaborator.
//!
//! The gate arms once the navigation history is long enough, permits at
//! most one in-flight request, and settles permanently after a validated
//! order is applied or the attempt budget is spent. Callers must perform
//! `try_arm` and the request dispatch inside one synchronous critical
//! section so two qualifying events cannot both arm it.

use serde::Serialize;

/// State of the reorder gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// No request in flight; a qualifying history append may arm the gate.
    Idle,
    /// Exactly one request is outstanding.
    InFlight,
    /// Terminal: a valid order was applied, or the budget is exhausted.
    Settled,
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::InFlight => "in_flight",
            Self::Settled => "settled",
        };
        write!(f, "{s}")
    }
}

/// One-shot reorder controller with a bounded retry budget.
#[derive(Debug)]
pub struct ReorderGate {
    state: GateState,
    attempts: u32,
    min_history: usize,
    max_attempts: u32,
}

impl ReorderGate {
    pub fn new(min_history: usize, max_attempts: u32) -> Self {
        Self {
            state: GateState::Idle,
            attempts: 0,
            min_history,
            max_attempts,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Arm the gate if the history has crossed the threshold and no request
    /// is in flight or settled. Returns `true` when the caller now owns the
    /// single outstanding request slot.
    pub fn try_arm(&mut self, history_len: usize) -> bool {
        if self.state != GateState::Idle {
            return false;
        }
        if history_len < self.min_history {
            return false;
        }
        if self.attempts >= self.max_attempts {
            self.state = GateState::Settled;
            return false;
        }
        self.state = GateState::InFlight;
        self.attempts += 1;
        true
    }

    /// A validated order was applied. Terminal: no further requests this
    /// page view.
    pub fn settle(&mut self) {
        self.state = GateState::Settled;
    }

    /// The attempt failed (transport, schema, or validation). Returns to
    /// `Idle` while the attempt budget lasts, so the next qualifying
    /// history append may retry; settles once the budget is spent.
    pub fn reset_after_failure(&mut self) {
        if self.attempts >= self.max_attempts {
            self.state = GateState::Settled;
        } else {
            self.state = GateState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_arm_below_threshold() {
        let mut gate = ReorderGate::new(2, 2);
        assert!(!gate.try_arm(0));
        assert!(!gate.try_arm(1));
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.attempts(), 0);
    }

    #[test]
    fn arms_once_at_threshold() {
        let mut gate = ReorderGate::new(2, 2);
        assert!(gate.try_arm(2));
        assert_eq!(gate.state(), GateState::InFlight);
    }

    #[test]
    fn single_flight_while_in_flight() {
        let mut gate = ReorderGate::new(2, 2);
        assert!(gate.try_arm(2));
        assert!(!gate.try_arm(3));
        assert!(!gate.try_arm(4));
        assert_eq!(gate.attempts(), 1);
    }

    #[test]
    fn settled_gate_never_rearms() {
        let mut gate = ReorderGate::new(2, 2);
        assert!(gate.try_arm(2));
        gate.settle();
        assert!(!gate.try_arm(4));
        assert_eq!(gate.state(), GateState::Settled);
    }

    #[test]
    fn failure_allows_exactly_one_retry() {
        let mut gate = ReorderGate::new(2, 2);
        assert!(gate.try_arm(2));
        gate.reset_after_failure();
        assert_eq!(gate.state(), GateState::Idle);

        assert!(gate.try_arm(3));
        gate.reset_after_failure();
        assert_eq!(gate.state(), GateState::Settled);

        assert!(!gate.try_arm(4));
        assert_eq!(gate.attempts(), 2);
    }

    #[test]
    fn zero_budget_settles_on_first_arm() {
        let mut gate = ReorderGate::new(2, 0);
        assert!(!gate.try_arm(2));
        assert_eq!(gate.state(), GateState::Settled);
    }

    #[test]
    fn terminal_state() {
        assert!(GateState::Settled.is_terminal());
        assert!(!GateState::Idle.is_terminal());
        assert!(!GateState::InFlight.is_terminal());
    }
}
