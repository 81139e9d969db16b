use thiserror::Error;
use tracing::debug;

use crate::automaton::{Automaton, Kind, Model, StateId};

/// Identifies one operand of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The first operand.
    Left,
    /// The second operand.
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Abstracts the precondition violations that algorithms report before doing any work. These are
/// recoverable, the automaton that caused them is never modified.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum StructuralError {
    /// The automaton has no initial state.
    #[error("automaton has no initial state")]
    MissingInitialState,
    /// The automaton has no final states.
    #[error("automaton has no final states")]
    MissingFinalStates,
    /// A DFA was required but the automaton has an ε-transition or several successors on one symbol.
    #[error("automaton is not deterministic, it is {0:?}")]
    NotDeterministic(Kind),
    /// A state id was used that does not belong to the automaton.
    #[error("automaton has no state with id {0}")]
    UnknownState(StateId),
    /// The automaton (or a transition payload) is of the wrong model.
    #[error("expected a {expected:?} automaton but got {found:?}")]
    ModelMismatch {
        /// The model that was required.
        expected: Model,
        /// The model that was encountered.
        found: Model,
    },
    /// The automaton has transitions or several states but not a single input symbol.
    #[error("alphabet is empty")]
    EmptyAlphabet,
    /// One operand of a binary operation violates a precondition.
    #[error("{side} operand is malformed: {source}")]
    Operand {
        /// Which operand failed.
        side: Side,
        /// What is wrong with it.
        source: Box<StructuralError>,
    },
}

impl StructuralError {
    /// Attributes `self` to the given operand of a binary operation.
    pub fn on(self, side: Side) -> Self {
        StructuralError::Operand {
            side,
            source: Box::new(self),
        }
    }
}

/// Ensures that the automaton has an initial state and returns its id.
pub fn require_initial_state(automaton: &Automaton) -> Result<StateId, StructuralError> {
    automaton.initial().ok_or_else(|| {
        debug!("validation failed, no initial state");
        StructuralError::MissingInitialState
    })
}

/// Ensures that the automaton has at least one final state.
pub fn require_final_states(automaton: &Automaton) -> Result<(), StructuralError> {
    if automaton.final_states().next().is_none() {
        debug!("validation failed, no final states");
        return Err(StructuralError::MissingFinalStates);
    }
    Ok(())
}

/// Ensures that the automaton is of the given model.
pub fn require_model(automaton: &Automaton, expected: Model) -> Result<(), StructuralError> {
    if automaton.model() != expected {
        return Err(StructuralError::ModelMismatch {
            expected,
            found: automaton.model(),
        });
    }
    Ok(())
}

/// Ensures that the automaton is a DFA. The kind is recomputed from the transitions, so this fails
/// if some state has an ε-transition or several transitions on the same symbol.
pub fn require_deterministic(automaton: &Automaton) -> Result<(), StructuralError> {
    require_model(automaton, Model::Finite)?;
    match automaton.kind() {
        Kind::Dfa => Ok(()),
        kind => {
            debug!("validation failed, automaton is {kind:?}");
            Err(StructuralError::NotDeterministic(kind))
        }
    }
}

/// Runs the checks that every binary operation on finite automata demands of both operands:
/// a finite model, an initial state and at least one final state.
pub(crate) fn require_operands(left: &Automaton, right: &Automaton) -> Result<(), StructuralError> {
    for (side, operand) in [(Side::Left, left), (Side::Right, right)] {
        require_model(operand, Model::Finite).map_err(|e| e.on(side))?;
        require_initial_state(operand).map_err(|e| e.on(side))?;
        require_final_states(operand).map_err(|e| e.on(side))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::validation::{require_deterministic, require_final_states, require_initial_state};

    use super::require_operands;

    #[test_log::test]
    fn guards_report_distinct_errors() {
        let mut dfa = library::dfa_ending_in_01();
        assert_eq!(require_initial_state(&dfa), Ok(0));
        assert_eq!(require_final_states(&dfa), Ok(()));
        assert_eq!(require_deterministic(&dfa), Ok(()));

        dfa.clear_initial();
        assert_eq!(
            require_initial_state(&dfa),
            Err(StructuralError::MissingInitialState)
        );

        let no_finals = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 0)])
            .into_automaton(0);
        assert_eq!(
            require_final_states(&no_finals),
            Err(StructuralError::MissingFinalStates)
        );
    }

    #[test_log::test]
    fn determinism_is_recomputed() {
        assert_eq!(
            require_deterministic(&library::nfa_third_last_is_a()),
            Err(StructuralError::NotDeterministic(Kind::Nfa))
        );
        assert_eq!(
            require_deterministic(&library::enfa_a_star_b_star()),
            Err(StructuralError::NotDeterministic(Kind::EpsilonNfa))
        );
        assert!(matches!(
            require_deterministic(&library::pda_an_bn()),
            Err(StructuralError::ModelMismatch { .. })
        ));
    }

    #[test_log::test]
    fn operand_errors_name_the_side() {
        let good = library::dfa_ending_in_01();
        let bad = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 0)])
            .into_automaton(0);
        let err = require_operands(&good, &bad).unwrap_err();
        assert_eq!(err, StructuralError::MissingFinalStates.on(Side::Right));
        assert_eq!(
            err.to_string(),
            "right operand is malformed: automaton has no final states"
        );
    }
}
