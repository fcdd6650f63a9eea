//! Settlement lifecycle phases.
//!
//! A cell moves through exactly one transition in its lifetime:
//! **UNDETERMINED → SUCCEEDED** or **UNDETERMINED → FAILED**.
//!
//! Both settled phases are terminal. Once a cell leaves UNDETERMINED it
//! never returns and never switches to the other settled phase.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three phases of a settlement cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlePhase {
    /// No settlement handle has been called yet. Observers wait.
    Undetermined,
    /// The success handle won; the cell holds a success value.
    Succeeded,
    /// The failure handle won; the cell holds a failure value.
    Failed,
}

impl fmt::Display for SettlePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undetermined => write!(f, "UNDETERMINED"),
            Self::Succeeded => write!(f, "SUCCEEDED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

impl SettlePhase {
    /// Whether the phase is terminal (the cell has been settled).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Undetermined)
    }

    /// Whether a transition into `target` is legal from this phase.
    ///
    /// Only `UNDETERMINED → SUCCEEDED` and `UNDETERMINED → FAILED` are
    /// allowed; every other pair is rejected.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Undetermined, Self::Succeeded) | (Self::Undetermined, Self::Failed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display() {
        assert_eq!(format!("{}", SettlePhase::Undetermined), "UNDETERMINED");
        assert_eq!(format!("{}", SettlePhase::Succeeded), "SUCCEEDED");
        assert_eq!(format!("{}", SettlePhase::Failed), "FAILED");
    }

    #[test]
    fn terminal_phases() {
        assert!(!SettlePhase::Undetermined.is_terminal());
        assert!(SettlePhase::Succeeded.is_terminal());
        assert!(SettlePhase::Failed.is_terminal());
    }

    #[test]
    fn legal_transitions() {
        assert!(SettlePhase::Undetermined.can_transition_to(SettlePhase::Succeeded));
        assert!(SettlePhase::Undetermined.can_transition_to(SettlePhase::Failed));
    }

    #[test]
    fn settled_phases_are_sinks() {
        for from in [SettlePhase::Succeeded, SettlePhase::Failed] {
            for to in [
                SettlePhase::Undetermined,
                SettlePhase::Succeeded,
                SettlePhase::Failed,
            ] {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }

    #[test]
    fn undetermined_is_not_a_target() {
        assert!(!SettlePhase::Undetermined.can_transition_to(SettlePhase::Undetermined));
    }

    #[test]
    fn phase_serde_roundtrip() {
        let phase = SettlePhase::Succeeded;
        let json = serde_json::to_string(&phase).unwrap();
        let back: SettlePhase = serde_json::from_str(&json).unwrap();
        assert_eq!(phase, back);
    }
}
