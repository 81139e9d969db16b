use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use tracing::{debug, trace, warn};

use crate::{
    automaton::{Automaton, Letter, Model, StateId, TransitionKind},
    math::{Map, Partition, Set},
    reduction::{reduce, Outcome},
    validation::{
        require_deterministic, require_final_states, require_initial_state, StructuralError,
    },
};

/// A pair of positions in a DFA, `None` stands for the implicit dead state of a partial DFA.
type Pair = (Option<StateId>, Option<StateId>);

/// Minimizes a DFA with the Myhill-Nerode table filling algorithm.
///
/// Before filling the table, inaccessible and useless states are removed. That pre-pass is only
/// used if it actually removes states, otherwise the input itself is processed. Starting from all
/// unordered pairs of distinct states, pairs are eliminated if
/// 1. exactly one of the two states is final,
/// 2. the two states reach states of different finality on some symbol,
/// 3. some word of length at most `n - 2` is accepted from one state but not from the other, where
///    `n` is the number of states (counting the implicit dead state of a partial DFA).
///
/// The surviving pairs are equivalent and are united into classes. Each class collapses into a
/// single state that is final if any member is, initial if the initial state is a member and
/// labelled with the labels of all members. The result is renumbered, with the initial state
/// receiving number 0.
///
/// If no pair survives and the pre-pass removed nothing, the input is already minimal and is
/// returned as [`Outcome::Unchanged`].
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let dfa = library::dfa_length_at_least_two();
/// let minimal = minimize(&dfa).unwrap();
/// assert_eq!(minimal.size(), 3);
/// assert!(minimize(&minimal).unwrap().is_unchanged());
/// ```
pub fn minimize(dfa: &Automaton) -> Result<Outcome<'_>, StructuralError> {
    require_deterministic(dfa)?;
    require_initial_state(dfa)?;
    require_final_states(dfa)?;

    let reduced = reduce(dfa)?;
    let pruned = reduced.size() < dfa.size();
    let working: &Automaton = if pruned { reduced.automaton() } else { dfa };

    let alphabet = working.alphabet();
    let delta = working.delta();
    let successor =
        |q: StateId, symbol: char| delta.successor(q, Letter::Symbol(symbol));
    let accepting = |q: Option<StateId>| q.is_some_and(|q| working.is_final(q));

    let total = working
        .state_ids()
        .cartesian_product(alphabet.iter())
        .all(|(q, a)| successor(q, *a).is_some());
    let n = working.size() + usize::from(!total);
    let bound = n.saturating_sub(2);

    let mut pairs: Vec<(StateId, StateId)> = working.state_ids().tuple_combinations().collect();
    trace!("table filling starts with {} pairs", pairs.len());

    pairs.retain(|&(p, q)| working.is_final(p) == working.is_final(q));
    trace!("{} pairs remain after separating final states", pairs.len());

    pairs.retain(|&(p, q)| {
        alphabet
            .iter()
            .all(|a| accepting(successor(p, *a)) == accepting(successor(q, *a)))
    });
    trace!("{} pairs remain after one-step refinement", pairs.len());

    pairs.retain(|&(p, q)| match distinguishing_word(working, p, q, bound) {
        Some(word) => {
            trace!("{p} and {q} are distinguished by {word:?}");
            false
        }
        None => true,
    });
    debug!(
        "{} equivalent pairs among {} states (bound {bound})",
        pairs.len(),
        working.size()
    );

    if pairs.is_empty() {
        if !pruned {
            return Ok(Outcome::Unchanged(dfa));
        }
        let mut result = working.clone();
        result.renumber();
        return Ok(Outcome::Transformed(result));
    }

    let classes = Partition::from_pairs(pairs);
    Ok(Outcome::Transformed(collapse(working, &classes)))
}

/// Builds the quotient of `dfa` with respect to `classes`. States that are not in any class are
/// carried over one-to-one.
fn collapse(dfa: &Automaton, classes: &Partition<StateId>) -> Automaton {
    let mut minimized = Automaton::new(Model::Finite);
    let mut mapping: Map<StateId, StateId> = Map::default();

    for q in dfa.states() {
        if mapping.contains_key(&q.id()) {
            continue;
        }
        let new = minimized.add_state();
        let state = minimized
            .state_mut(new)
            .expect("state was added right before");
        match classes.class_of(&q.id()) {
            Some(class) => {
                let members = dfa
                    .states()
                    .iter()
                    .filter(|p| class.contains(&p.id()))
                    .collect_vec();
                state.set_label(Some(members.iter().map(|p| p.display_label()).join("")));
                state.set_final(members.iter().any(|p| p.is_final()));
                for p in &members {
                    mapping.insert(p.id(), new);
                }
                if members.iter().any(|p| p.is_initial()) {
                    minimized
                        .set_initial(new)
                        .expect("state was added right before");
                }
            }
            None => {
                state.set_label(q.label());
                state.set_final(q.is_final());
                mapping.insert(q.id(), new);
                if q.is_initial() {
                    minimized
                        .set_initial(new)
                        .expect("state was added right before");
                }
            }
        }
    }

    let mut grouped: BTreeMap<(StateId, StateId), BTreeSet<Letter>> = BTreeMap::new();
    for t in dfa.transitions() {
        let (Some(origin), Some(target)) = (mapping.get(&t.origin()), mapping.get(&t.target()))
        else {
            warn!("skipping transition between unmapped states {t:?}");
            continue;
        };
        if let TransitionKind::Finite(letters) = t.kind() {
            grouped
                .entry((*origin, *target))
                .or_default()
                .extend(letters.iter().copied());
        }
    }
    for ((origin, target), letters) in grouped {
        minimized
            .add_transition(origin, TransitionKind::Finite(letters), target)
            .expect("both endpoints were added above");
    }

    minimized.renumber();
    debug!(
        "collapsed {} states into {}",
        dfa.size(),
        minimized.size()
    );
    minimized
}

/// Searches for a word of length at most `bound` that is accepted from one of the two given
/// states but not from the other, using each state as a custom start state. Words are explored by
/// increasing length, so the returned word is a shortest one. Running into a missing transition
/// counts as rejection.
///
/// Returns `None` if the two states agree on all words up to the bound (in particular if they are
/// the same state).
pub fn distinguishing_word(
    dfa: &Automaton,
    p: StateId,
    q: StateId,
    bound: usize,
) -> Option<Vec<char>> {
    if p == q {
        return None;
    }
    let alphabet = dfa.alphabet();
    let delta = dfa.delta();
    let accepting = |q: Option<StateId>| q.is_some_and(|q| dfa.is_final(q));
    let step = |q: Option<StateId>, symbol: char| {
        q.and_then(|q| delta.successor(q, Letter::Symbol(symbol)))
    };

    let start: Pair = (Some(p), Some(q));
    let mut seen: Set<Pair> = Set::from_iter([start]);
    let mut frontier: Vec<(Vec<char>, Pair)> = vec![(vec![], start)];

    for length in 0..=bound {
        if let Some((word, _)) = frontier
            .iter()
            .find(|(_, (l, r))| accepting(*l) != accepting(*r))
        {
            return Some(word.clone());
        }
        if length == bound {
            break;
        }

        let mut next = vec![];
        for (word, (l, r)) in &frontier {
            for &symbol in &alphabet {
                let successor = (step(*l, symbol), step(*r, symbol));
                // both stuck, no extension can tell them apart
                if successor == (None, None) || !seen.insert(successor) {
                    continue;
                }
                let mut extended = word.clone();
                extended.push(symbol);
                next.push((extended, successor));
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    None
}
