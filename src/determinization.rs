use std::collections::{BTreeMap, BTreeSet, VecDeque};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, Letter, Model, StateId, TransitionKind},
    math::Map,
    validation::{require_initial_state, require_model, StructuralError},
};

/// A set of states of the input automaton which forms a single state of the subset construction.
type Subset = BTreeSet<StateId>;

/// Converts a finite automaton (possibly with ε-transitions) into an equivalent DFA using the
/// subset construction.
///
/// The initial subset is the ε-closure of the initial state. Subsets are discovered breadth-first
/// and numbered in the order in which they are first seen, so the initial subset receives id `0`.
/// A subset is final iff it contains a final state. The result is total: the empty subset becomes
/// a non-final dead state (labelled `∅`) whenever some subset has no successor on a symbol.
/// Each resulting state is labelled with the labels of the states it consists of.
///
/// Fails if the automaton has no initial state, is not a finite automaton, or has an empty
/// alphabet while not being trivial (a single state without transitions).
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let nfa = library::nfa_third_last_is_a();
/// let dfa = determinize(&nfa).unwrap();
/// assert_eq!(dfa.kind(), Kind::Dfa);
/// assert_eq!(dfa.size(), 8);
/// assert!(dfa.accepts("abb"));
/// ```
pub fn determinize(automaton: &Automaton) -> Result<Automaton, StructuralError> {
    require_model(automaton, Model::Finite)?;
    let initial = require_initial_state(automaton)?;

    let alphabet = automaton.alphabet();
    let trivial = automaton.size() == 1 && automaton.transitions().is_empty();
    if alphabet.is_empty() && !trivial {
        return Err(StructuralError::EmptyAlphabet);
    }

    let delta = automaton.delta();
    let start = delta.epsilon_closure([initial]);

    let mut ids: Map<Subset, StateId> = Map::default();
    let mut subsets: Vec<Subset> = vec![];
    let mut edges: Vec<(StateId, char, StateId)> = vec![];
    let mut queue: VecDeque<StateId> = VecDeque::new();

    let mut discover = |subset: Subset, subsets: &mut Vec<Subset>, queue: &mut VecDeque<StateId>| {
        *ids.entry(subset.clone()).or_insert_with(|| {
            let id = subsets.len() as StateId;
            trace!("discovered subset {id} = {subset:?}");
            subsets.push(subset);
            queue.push_back(id);
            id
        })
    };

    discover(start, &mut subsets, &mut queue);
    while let Some(source) = queue.pop_front() {
        for &symbol in &alphabet {
            let target = delta.epsilon_closure(delta.step(&subsets[source as usize], symbol));
            let target = discover(target, &mut subsets, &mut queue);
            edges.push((source, symbol, target));
        }
    }
    debug!(
        "subset construction produced {} states from {}",
        subsets.len(),
        automaton.size()
    );

    let mut dfa = Automaton::new(Model::Finite);
    for subset in &subsets {
        let q = dfa.add_state();
        let label = subset_label(automaton, subset);
        let accepting = subset.iter().any(|p| automaton.is_final(*p));
        let state = dfa
            .state_mut(q)
            .expect("state was added right before");
        state.set_label(Some(label));
        state.set_final(accepting);
    }
    dfa.set_initial(0)?;

    // one transition per pair of subsets, carrying all symbols that lead from one to the other
    let mut grouped: BTreeMap<(StateId, StateId), BTreeSet<Letter>> = BTreeMap::new();
    for (source, symbol, target) in edges {
        grouped
            .entry((source, target))
            .or_default()
            .insert(Letter::Symbol(symbol));
    }
    for ((source, target), letters) in grouped {
        dfa.add_transition(source, TransitionKind::Finite(letters), target)?;
    }
    Ok(dfa)
}

/// Joins the labels (custom ones where present) of the states in `subset`.
fn subset_label(automaton: &Automaton, subset: &Subset) -> String {
    if subset.is_empty() {
        return "∅".to_string();
    }
    format!(
        "{{{}}}",
        automaton
            .states()
            .iter()
            .filter(|q| subset.contains(&q.id()))
            .map(|q| q.display_label())
            .join(",")
    )
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn assert_total_and_deterministic(dfa: &Automaton) {
        let alphabet = dfa.alphabet();
        for q in dfa.state_ids() {
            for a in &alphabet {
                assert_eq!(
                    dfa.delta().get(q, &Letter::Symbol(*a)).map(|t| t.len()),
                    Some(1),
                    "state {q} on {a}"
                );
            }
        }
        assert_eq!(dfa.kind(), Kind::Dfa);
    }

    #[test_log::test]
    fn determinize_nfa() {
        let nfa = library::nfa_third_last_is_a();
        let dfa = determinize(&nfa).unwrap();
        assert_total_and_deterministic(&dfa);
        assert_eq!(dfa.initial(), Some(0));
        assert_eq!(dfa.state(0).and_then(State::label), Some("{q0}"));
        for word in words_up_to(&['a', 'b'], 6) {
            assert_eq!(nfa.accepts(&word), dfa.accepts(&word), "{word}");
        }
        // the input is untouched
        assert_eq!(nfa.kind(), Kind::Nfa);
    }

    #[test_log::test]
    fn determinize_epsilon_nfa() {
        let enfa = library::enfa_a_star_b_star();
        let dfa = determinize(&enfa).unwrap();
        assert_total_and_deterministic(&dfa);
        assert!(dfa.is_final(0));
        // {q0,q1}, {q1} and the dead state
        assert_eq!(dfa.size(), 3);
        assert!(dfa.states().iter().any(|q| q.label() == Some("∅")));
        for word in words_up_to(&['a', 'b'], 5) {
            assert_eq!(enfa.accepts(&word), dfa.accepts(&word), "{word}");
        }
    }

    #[test_log::test]
    fn determinize_is_stable() {
        let first = determinize(&library::nfa_third_last_is_a()).unwrap();
        let second = determinize(&library::nfa_third_last_is_a()).unwrap();
        assert_eq!(first, second);
    }

    #[test_log::test]
    fn empty_alphabet() {
        let single = AutomatonBuilder::finite().with_final([0]).into_automaton(0);
        let dfa = determinize(&single).unwrap();
        assert_eq!(dfa.size(), 1);
        assert!(dfa.accepts(""));

        let only_epsilon = AutomatonBuilder::finite()
            .with_edges([(0, "", 1)])
            .with_final([1])
            .into_automaton(0);
        assert_eq!(
            determinize(&only_epsilon),
            Err(StructuralError::EmptyAlphabet)
        );
    }

    #[test_log::test]
    fn rejects_machines() {
        assert!(matches!(
            determinize(&library::pda_an_bn()),
            Err(StructuralError::ModelMismatch { .. })
        ));
    }
}
