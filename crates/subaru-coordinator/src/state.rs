//! Refresh-cycle state machine
//!
//! Enforces valid transitions for one config entry's refresh loop:
//!
//! ```text
//! Idle → Fetching → Updated → Fetching (next cycle)
//!                 ↘ Failed  → Fetching (next cycle)
//!                 ↘ Idle    (cancelled during teardown)
//! ```
//!
//! Fetching is never terminal: a cycle always resolves to Updated or
//! Failed, and teardown resolves a cancelled cycle back to Idle.

use thiserror::Error;

/// Error when an invalid refresh-state transition is attempted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid refresh transition from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: RefreshState,
    pub to: RefreshState,
}

/// Refresh-cycle state for one config entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshState {
    /// No cycle has run yet, or the entry was torn down mid-cycle
    #[default]
    Idle,
    /// A cycle is in flight
    Fetching,
    /// The last cycle refreshed every vehicle
    Updated,
    /// The last cycle left at least one vehicle stale
    Failed,
}

impl RefreshState {
    /// Attempt a transition to a new state.
    ///
    /// Returns the new state if valid, or an error describing the
    /// rejected transition.
    pub fn try_transition(self, to: RefreshState) -> Result<RefreshState, InvalidTransition> {
        use RefreshState::*;

        let valid = matches!(
            (self, to),
            (Idle, Fetching)
                | (Fetching, Updated)
                | (Fetching, Failed)
                | (Fetching, Idle)
                | (Updated, Fetching)
                | (Failed, Fetching)
        );

        if valid {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition_to(self, to: RefreshState) -> bool {
        self.try_transition(to).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RefreshState::*;

    #[test]
    fn test_idle_starts_a_cycle() {
        assert_eq!(Idle.try_transition(Fetching), Ok(Fetching));
    }

    #[test]
    fn test_cycle_resolves_to_updated_or_failed() {
        assert!(Fetching.can_transition_to(Updated));
        assert!(Fetching.can_transition_to(Failed));
    }

    #[test]
    fn test_cancellation_resolves_to_idle() {
        assert_eq!(Fetching.try_transition(Idle), Ok(Idle));
    }

    #[test]
    fn test_next_cycle_from_either_outcome() {
        assert!(Updated.can_transition_to(Fetching));
        assert!(Failed.can_transition_to(Fetching));
    }

    #[test]
    fn test_no_concurrent_cycles() {
        assert!(!Fetching.can_transition_to(Fetching));
    }

    #[test]
    fn test_outcomes_cannot_skip_fetching() {
        assert!(!Idle.can_transition_to(Updated));
        assert!(!Idle.can_transition_to(Failed));
        assert!(!Updated.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Updated));
        assert!(!Updated.can_transition_to(Idle));
    }

    #[test]
    fn test_full_cycle_path() {
        let state = Idle;
        let state = state.try_transition(Fetching).unwrap();
        let state = state.try_transition(Failed).unwrap();
        let state = state.try_transition(Fetching).unwrap();
        let state = state.try_transition(Updated).unwrap();
        assert_eq!(state, Updated);
    }

    #[test]
    fn test_error_reports_both_states() {
        let err = Updated.try_transition(Idle).unwrap_err();
        assert_eq!(err.from, Updated);
        assert_eq!(err.to, Idle);
    }
}
