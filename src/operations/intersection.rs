use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    automaton::{Automaton, Model},
    determinization::determinize,
    reduction::reduce,
    validation::{require_deterministic, require_operands, Side, StructuralError},
};

use super::{complement_over, union};

/// Computes a DFA for the intersection of the languages of two DFAs through De Morgan's law,
/// `A ∩ B = ¬(¬A ∪ ¬B)`. Both complements are taken over the joint alphabet, their union is
/// determinized and complemented again. Finally, inaccessible and useless states are removed and
/// the result is renumbered.
///
/// Both operands have to be DFAs with an initial state and at least one final state. If neither
/// operand has a transition, the only word either can read is ε, and the result is a single
/// initial state which is final if both operands accept ε.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let even_zeros_odd_ones = library::dfa_even_zeros_odd_ones();
/// let ending_in_01 = library::dfa_ending_in_01();
/// let both = intersection(&even_zeros_odd_ones, &ending_in_01).unwrap();
/// assert!(both.accepts("0001"));
/// assert!(!both.accepts("01"));
/// ```
pub fn intersection(left: &Automaton, right: &Automaton) -> Result<Automaton, StructuralError> {
    require_operands(left, right)?;
    require_deterministic(left).map_err(|e| e.on(Side::Left))?;
    require_deterministic(right).map_err(|e| e.on(Side::Right))?;

    let alphabet: BTreeSet<char> = left.alphabet().union(&right.alphabet()).copied().collect();
    if alphabet.is_empty() {
        return epsilon_intersection(left, right);
    }

    let not_left = complement_over(left, &alphabet)?;
    let not_right = complement_over(right, &alphabet)?;
    let either = determinize(&union_of_complements(&not_left, &not_right)?)?;
    let neither = complement_over(&either, &alphabet)?;

    let mut result = reduce(&neither)?.into_owned();
    result.renumber();
    debug!(
        "intersection of {} and {} states has {} states",
        left.size(),
        right.size(),
        result.size()
    );
    Ok(result)
}

fn epsilon_intersection(
    left: &Automaton,
    right: &Automaton,
) -> Result<Automaton, StructuralError> {
    let mut result = Automaton::new(Model::Finite);
    let q = result.add_state();
    result.set_initial(q)?;
    result.set_final(q, left.accepts("") && right.accepts(""))?;
    debug!("operands share no symbols, intersection is decided on ε alone");
    Ok(result)
}

/// The complement of a DFA may lack final states (if the DFA accepts everything), in which case it
/// contributes nothing to the union.
fn union_of_complements(
    not_left: &Automaton,
    not_right: &Automaton,
) -> Result<Automaton, StructuralError> {
    let has_final = |a: &Automaton| a.final_states().next().is_some();
    match (has_final(not_left), has_final(not_right)) {
        (true, true) => union(not_left, not_right),
        (true, false) => Ok(not_left.clone()),
        (false, true) => Ok(not_right.clone()),
        (false, false) => Ok(not_left.clone()),
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn assert_intersection(left: &Automaton, right: &Automaton, length: usize) -> Automaton {
        let result = intersection(left, right).unwrap();
        assert_eq!(result.kind(), Kind::Dfa);
        let alphabet: Vec<char> = left.alphabet().union(&right.alphabet()).copied().collect();
        for word in words_up_to(&alphabet, length) {
            assert_eq!(
                result.accepts(&word),
                left.accepts(&word) && right.accepts(&word),
                "{word}"
            );
        }
        result
    }

    #[test_log::test]
    fn intersection_of_library_dfas() {
        let result = assert_intersection(
            &library::dfa_even_zeros_odd_ones(),
            &library::dfa_ending_in_01(),
            7,
        );
        assert_eq!(result.initial(), Some(0));
        // pairs of states of a 4 and a 3 state DFA plus the initial subset
        assert!(result.size() <= 13);
    }

    #[test_log::test]
    fn intersection_with_foreign_symbols() {
        let ab = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 1), (1, 'b', 1)])
            .with_final([1])
            .into_automaton(0);
        let ending_in_01 = library::dfa_ending_in_01();
        let result = assert_intersection(&ab, &ending_in_01, 5);
        assert!(!result.accepts("ab"));
        assert!(!result.accepts("01"));
    }

    #[test_log::test]
    fn intersection_with_universal_language() {
        let everything = AutomatonBuilder::finite()
            .with_edges([(0, "01", 0)])
            .with_final([0])
            .into_automaton(0);
        let result = assert_intersection(&everything, &library::dfa_ending_in_01(), 6);
        assert!(result.accepts("1101"));
    }

    #[test_log::test]
    fn intersection_requires_dfas() {
        assert_eq!(
            intersection(&library::dfa_ending_in_01(), &library::nfa_third_last_is_a()),
            Err(StructuralError::NotDeterministic(Kind::Nfa).on(Side::Right))
        );
    }

    #[test_log::test]
    fn intersection_over_empty_alphabet() {
        let two_states = AutomatonBuilder::finite().with_states(2);
        let final_second = two_states.clone().with_final([1]).into_automaton(0);
        let final_first = two_states.with_final([0]).into_automaton(0);

        let result = intersection(&final_second, &final_first).unwrap();
        assert_eq!(result.size(), 1);
        assert_eq!(result.initial(), Some(0));
        assert_eq!(result.kind(), Kind::Dfa);
        assert!(!result.accepts(""));

        let result = intersection(&final_first, &final_first).unwrap();
        assert_eq!(result.size(), 1);
        assert!(result.accepts(""));
    }

    #[cfg(feature = "random")]
    #[test_log::test]
    fn random_intersections() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..15 {
            let left = crate::random::generate_random_dfa(&mut rng, 2, 4);
            let right = crate::random::generate_random_dfa(&mut rng, 2, 4);
            assert_intersection(&left, &right, 6);
        }
    }
}
