use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    automaton::Automaton,
    validation::{require_deterministic, require_initial_state, StructuralError},
};

/// Returns a copy of `dfa` whose transition function is total over `alphabet`, which is extended
/// by the alphabet of `dfa` itself. Missing transitions lead to a fresh non-final sink state, which
/// is only added if something is missing.
pub fn totalize(dfa: &Automaton, alphabet: &BTreeSet<char>) -> Result<Automaton, StructuralError> {
    require_deterministic(dfa)?;
    let alphabet: BTreeSet<char> = alphabet.union(&dfa.alphabet()).copied().collect();
    let mut total = dfa.clone();
    total.totalize(&alphabet);
    Ok(total)
}

/// Computes the complement of `dfa` with respect to its own alphabet: the transition function is
/// made total and the finality of every state is flipped.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let dfa = library::dfa_ending_in_01();
/// let complement = complement(&dfa).unwrap();
/// assert!(complement.accepts("10"));
/// assert!(!complement.accepts("101"));
/// ```
pub fn complement(dfa: &Automaton) -> Result<Automaton, StructuralError> {
    complement_over(dfa, &BTreeSet::new())
}

/// Computes the complement of `dfa` with respect to the union of its alphabet and `alphabet`.
/// Words that contain symbols from `alphabet` that `dfa` does not know are accepted by the result.
pub fn complement_over(
    dfa: &Automaton,
    alphabet: &BTreeSet<char>,
) -> Result<Automaton, StructuralError> {
    require_deterministic(dfa)?;
    require_initial_state(dfa)?;

    let mut complement = totalize(dfa, alphabet)?;
    let ids: Vec<_> = complement.state_ids().collect();
    for q in ids {
        let accepting = complement.is_final(q);
        complement.set_final(q, !accepting)?;
    }
    complement.renumber();
    debug!(
        "complemented automaton with {} states into {} states",
        dfa.size(),
        complement.size()
    );
    Ok(complement)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::prelude::*;

    #[test_log::test]
    fn complement_flips_membership() {
        let dfa = library::dfa_ending_in_01();
        let complement = complement(&dfa).unwrap();
        assert_eq!(complement.size(), dfa.size());
        for word in words_up_to(&['0', '1'], 6) {
            assert_ne!(dfa.accepts(&word), complement.accepts(&word), "{word}");
        }
    }

    #[test_log::test]
    fn complement_of_partial_dfa_adds_sink() {
        let dfa = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 1), (1, 'b', 1)])
            .with_final([1])
            .into_automaton(0);
        let complement = complement(&dfa).unwrap();
        assert_eq!(complement.size(), 3);
        assert!(complement.accepts(""));
        assert!(complement.accepts("ba"));
        assert!(!complement.accepts("abb"));
        // the operand is still partial
        assert_eq!(dfa.size(), 2);
    }

    #[test_log::test]
    fn complement_over_larger_alphabet() {
        let dfa = library::dfa_ending_in_01();
        let complement = complement_over(&dfa, &BTreeSet::from(['2'])).unwrap();
        assert!(complement.accepts("012"));
        assert!(complement.accepts("2"));
        assert!(!complement.accepts("01"));
        assert!(complement.accepts("201"));
    }

    #[test_log::test]
    fn totalize_is_pure() {
        let dfa = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 0)])
            .with_final([0])
            .into_automaton(0);
        let total = totalize(&dfa, &BTreeSet::from(['b'])).unwrap();
        assert_eq!(total.size(), 2);
        assert_eq!(dfa.size(), 1);
        assert!(total.accepts("aa"));
        assert!(!total.accepts("ab"));
    }

    #[test_log::test]
    fn complement_requires_dfa() {
        assert_eq!(
            complement(&library::enfa_a_star_b_star()),
            Err(StructuralError::NotDeterministic(Kind::EpsilonNfa))
        );
    }
}
