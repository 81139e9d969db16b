use tracing::debug;

use crate::{
    automaton::Automaton,
    validation::{require_initial_state, require_operands, StructuralError},
};

/// Builds an ε-NFA for the union of the languages of `left` and `right`: a fresh initial state is
/// connected by ε-transitions to the former initial states of both operands. Both operands need an
/// initial state and at least one final state.
pub fn union(left: &Automaton, right: &Automaton) -> Result<Automaton, StructuralError> {
    require_operands(left, right)?;

    let mut result = Automaton::new(left.model());
    let initial = result.add_state();
    result.set_initial(initial)?;

    for operand in [left, right] {
        let former_initial = require_initial_state(operand)?;
        let mapping = result.absorb(operand.clone())?;
        let entry = mapping[&former_initial];
        if let Some(state) = result.state_mut(entry) {
            state.set_initial_flag(false);
        }
        result.add_epsilon(initial, entry)?;
    }
    result.renumber();
    debug!(
        "union of {} and {} states has {} states",
        left.size(),
        right.size(),
        result.size()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn union_accepts_either() {
        let left = library::dfa_ending_in_01();
        let right = library::nfa_third_last_is_a();
        let union = union(&left, &right).unwrap();
        assert_eq!(union.size(), left.size() + right.size() + 1);
        assert_eq!(union.initial(), Some(0));
        for word in words_up_to(&['0', '1', 'a', 'b'], 4) {
            assert_eq!(
                union.accepts(&word),
                left.accepts(&word) || right.accepts(&word),
                "{word}"
            );
        }
    }

    #[test_log::test]
    fn union_with_itself() {
        let dfa = library::dfa_ending_in_01();
        let union = union(&dfa, &dfa).unwrap();
        let ids: std::collections::BTreeSet<StateId> = union.state_ids().collect();
        assert_eq!(ids.len(), 7);
        assert!(union.accepts("101"));
    }
}
