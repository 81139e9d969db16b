use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::math::Map;

use super::{Automaton, HeadMove, Letter, StackAction, StateId, TransitionKind};

/// Lookup structure which maps each state to its outgoing transitions, grouped by a key that
/// depends on the model of the automaton. Keys and values are kept in ordered collections so that
/// every algorithm iterating over the index behaves deterministically.
///
/// An index is always built in one pass over the transition list and never patched, whenever
/// the transitions change a new index has to be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<K: Ord, V: Ord> {
    edges: Map<StateId, BTreeMap<K, BTreeSet<V>>>,
}

/// The delta index of a finite automaton: `(state, letter) → targets`.
pub type FiniteDelta = Delta<Letter, StateId>;
/// The delta index of a pushdown automaton: `(state, (input, stack top)) → (action, target)`.
pub type PushdownDelta = Delta<(Letter, char), (StackAction, StateId)>;
/// The delta index of a Turing machine: `(state, read symbol) → (written symbol, move, target)`.
pub type TuringDelta = Delta<char, (char, HeadMove, StateId)>;

impl<K: Ord, V: Ord> Default for Delta<K, V> {
    fn default() -> Self {
        Self {
            edges: Map::default(),
        }
    }
}

impl<K: Ord + Copy, V: Ord + Copy> Delta<K, V> {
    fn insert(&mut self, origin: StateId, key: K, value: V) {
        self.edges
            .entry(origin)
            .or_default()
            .entry(key)
            .or_default()
            .insert(value);
    }

    /// Returns everything that is reachable from `state` under `key`.
    pub fn get(&self, state: StateId, key: &K) -> Option<&BTreeSet<V>> {
        self.edges.get(&state).and_then(|by_key| by_key.get(key))
    }

    /// Iterates over all keys and their values leaving `state`, ordered by key.
    pub fn edges_from(&self, state: StateId) -> impl Iterator<Item = (&K, &BTreeSet<V>)> + '_ {
        self.edges.get(&state).into_iter().flat_map(|m| m.iter())
    }

    /// Returns true if some state has more than one value for the same key.
    pub fn has_conflicts(&self) -> bool {
        self.edges
            .values()
            .any(|by_key| by_key.values().any(|values| values.len() > 1))
    }
}

impl FiniteDelta {
    /// Builds the index of a finite automaton. Transitions of other models are ignored.
    pub fn build(automaton: &Automaton) -> Self {
        let mut delta = Self::default();
        for t in automaton.transitions() {
            if let TransitionKind::Finite(letters) = t.kind() {
                for letter in letters {
                    delta.insert(t.origin(), *letter, t.target());
                }
            }
        }
        delta
    }

    /// Returns the unique successor of `state` on `letter`, or `None` if there is none.
    /// If multiple successors exist, the smallest one is returned.
    pub fn successor(&self, state: StateId, letter: Letter) -> Option<StateId> {
        self.get(state, &letter)
            .and_then(|targets| targets.iter().next().copied())
    }

    /// Computes the ε-closure of the given set of states, i.e. all states that can be reached
    /// from them using only ε-transitions.
    pub fn epsilon_closure<I: IntoIterator<Item = StateId>>(&self, states: I) -> BTreeSet<StateId> {
        let mut closure = BTreeSet::new();
        let mut queue: VecDeque<StateId> = states.into_iter().collect();
        while let Some(q) = queue.pop_front() {
            if !closure.insert(q) {
                continue;
            }
            if let Some(targets) = self.get(q, &Letter::Epsilon) {
                queue.extend(targets.iter().filter(|p| !closure.contains(p)));
            }
        }
        closure
    }

    /// Computes the set of states that can be reached from `states` by reading `symbol`, without
    /// taking the ε-closure of the result.
    pub fn step<'a, I>(&self, states: I, symbol: char) -> BTreeSet<StateId>
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        states
            .into_iter()
            .filter_map(|q| self.get(*q, &Letter::Symbol(symbol)))
            .flatten()
            .copied()
            .collect()
    }
}

impl PushdownDelta {
    /// Builds the index of a pushdown automaton. Transitions of other models are ignored.
    pub fn build(automaton: &Automaton) -> Self {
        let mut delta = Self::default();
        for t in automaton.transitions() {
            if let TransitionKind::Pushdown(op) = t.kind() {
                delta.insert(t.origin(), (op.input, op.top), (op.action, t.target()));
            }
        }
        delta
    }
}

impl TuringDelta {
    /// Builds the index of a Turing machine. Transitions of other models are ignored.
    pub fn build(automaton: &Automaton) -> Self {
        let mut delta = Self::default();
        for t in automaton.transitions() {
            if let TransitionKind::Turing(op) = t.kind() {
                delta.insert(t.origin(), op.read, (op.write, op.movement, t.target()));
            }
        }
        delta
    }
}

/// The underlying graph of an automaton, which forgets the payload of transitions. It stores
/// successors as well as predecessors and is used for reachability questions.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    forward: Map<StateId, BTreeSet<StateId>>,
    backward: Map<StateId, BTreeSet<StateId>>,
}

impl Graph {
    /// Builds the graph in one pass over the transitions.
    pub fn build(automaton: &Automaton) -> Self {
        let mut graph = Self::default();
        for t in automaton.transitions() {
            graph
                .forward
                .entry(t.origin())
                .or_default()
                .insert(t.target());
            graph
                .backward
                .entry(t.target())
                .or_default()
                .insert(t.origin());
        }
        graph
    }

    /// All states with an edge from `state`.
    pub fn successors(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.forward.get(&state).into_iter().flatten().copied()
    }

    /// All states with an edge to `state`.
    pub fn predecessors(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.backward.get(&state).into_iter().flatten().copied()
    }

    /// Breadth-first search along successors, returns the states in the order of discovery.
    pub fn reachable_from<I: IntoIterator<Item = StateId>>(&self, origins: I) -> Vec<StateId> {
        Self::search(origins, |q| self.successors(q).collect())
    }

    /// Breadth-first search along predecessors, returns the states in the order of discovery.
    pub fn co_reachable_from<I: IntoIterator<Item = StateId>>(&self, origins: I) -> Vec<StateId> {
        Self::search(origins, |q| self.predecessors(q).collect())
    }

    fn search<I, F>(origins: I, next: F) -> Vec<StateId>
    where
        I: IntoIterator<Item = StateId>,
        F: Fn(StateId) -> Vec<StateId>,
    {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<StateId> = origins.into_iter().collect();
        while let Some(q) = queue.pop_front() {
            if !seen.insert(q) {
                continue;
            }
            order.push(q);
            queue.extend(next(q).into_iter().filter(|p| !seen.contains(p)));
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::prelude::*;

    #[test_log::test]
    fn finite_delta_groups_by_letter() {
        let nfa = library::nfa_third_last_is_a();
        let delta = nfa.delta();
        assert_eq!(
            delta.get(0, &Letter::Symbol('a')),
            Some(&BTreeSet::from([0, 1]))
        );
        assert_eq!(delta.successor(0, Letter::Symbol('b')), Some(0));
        assert!(delta.has_conflicts());
        assert!(!library::dfa_ending_in_01().delta().has_conflicts());
    }

    #[test_log::test]
    fn epsilon_closure_follows_chains() {
        let enfa = AutomatonBuilder::finite()
            .with_edges([(0, "", 1), (1, "", 2), (2, "a", 3), (3, "", 0)])
            .with_final([3])
            .into_automaton(0);
        let delta = enfa.delta();
        assert_eq!(delta.epsilon_closure([0]), BTreeSet::from([0, 1, 2]));
        assert_eq!(delta.epsilon_closure([3]), BTreeSet::from([0, 1, 2, 3]));
        assert_eq!(delta.step(&delta.epsilon_closure([0]), 'a'), BTreeSet::from([3]));
    }

    #[test_log::test]
    fn graph_reachability() {
        let dfa = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 1), (1, 'a', 1), (2, 'a', 0)])
            .with_final([1])
            .into_automaton(0);
        let graph = Graph::build(&dfa);
        assert_eq!(graph.reachable_from([0]), vec![0, 1]);
        assert_eq!(graph.co_reachable_from([1]), vec![1, 0, 2]);
    }
}
