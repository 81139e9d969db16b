use tracing::debug;

use crate::{
    automaton::{Automaton, StateId},
    validation::{require_initial_state, require_operands, StructuralError},
};

/// Builds an ε-NFA for the concatenation of the languages of `left` and `right`. The final states
/// of `left` lose their finality and are connected by ε-transitions to the former initial state of
/// `right`, which in turn stops being initial. Both operands need an initial state and at least one
/// final state.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let ab = AutomatonBuilder::finite()
///     .with_edges([(0, 'a', 1), (1, 'b', 2)])
///     .with_final([2])
///     .into_automaton(0);
/// let twice = concatenation(&ab, &ab).unwrap();
/// assert!(twice.accepts("abab"));
/// assert!(!twice.accepts("ab"));
/// ```
pub fn concatenation(left: &Automaton, right: &Automaton) -> Result<Automaton, StructuralError> {
    require_operands(left, right)?;

    let mut result = left.clone();
    let right = right.clone();

    let former_finals: Vec<StateId> = result.final_states().collect();
    for q in &former_finals {
        result.set_final(*q, false)?;
    }

    let right_initial = require_initial_state(&right)?;
    let mapping = result.absorb(right)?;
    let bridge = mapping[&right_initial];
    if let Some(state) = result.state_mut(bridge) {
        state.set_initial_flag(false);
    }

    for q in former_finals {
        result.add_epsilon(q, bridge)?;
    }
    result.renumber();
    debug!(
        "concatenation of {} and {} states has {} states",
        left.size(),
        mapping.len(),
        result.size()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn concatenation_splits_words() {
        let left = library::dfa_ending_in_01();
        let right = library::enfa_a_star_b_star();
        let concat = concatenation(&left, &right).unwrap();
        assert_eq!(concat.size(), left.size() + right.size());
        assert_eq!(concat.kind(), Kind::EpsilonNfa);
        assert_eq!(concat.states().iter().filter(|q| q.is_initial()).count(), 1);

        for word in words_up_to(&['0', '1', 'a', 'b'], 5) {
            let chars: Vec<char> = word.chars().collect();
            let expected = (0..=chars.len()).any(|split| {
                let u: String = chars[..split].iter().collect();
                let v: String = chars[split..].iter().collect();
                left.accepts(&u) && right.accepts(&v)
            });
            assert_eq!(concat.accepts(&word), expected, "{word}");
        }
    }

    #[test_log::test]
    fn operands_are_untouched() {
        let left = library::dfa_ending_in_01();
        let right = library::dfa_ending_in_01();
        let before = left.clone();
        let _ = concatenation(&left, &right).unwrap();
        assert_eq!(left, before);
        assert_eq!(right, before);
    }

    #[test_log::test]
    fn operands_need_final_states() {
        let no_finals = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 0)])
            .into_automaton(0);
        assert_eq!(
            concatenation(&no_finals, &library::dfa_ending_in_01()),
            Err(StructuralError::MissingFinalStates.on(Side::Left))
        );
    }
}
