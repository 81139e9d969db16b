use crate::validation::StructuralError;

use super::{Automaton, Model, StateId, TransitionKind};

/// Helper struct for the construction of automata. It stores a list of edges, the final states and
/// optional custom labels. States are created implicitly: building an automaton whose largest
/// mentioned id is `n` yields the states `0..=n` in increasing order.
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over the alphabet `['a', 'b']` which accepts all
/// words that end with `b`. State 0 should be initial and state 1 final.
/// ```
/// use automata_kernel::prelude::*;
///
/// let dfa = AutomatonBuilder::finite()
///     .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 0), (1, 'b', 1)])
///     .with_final([1])
///     .into_automaton(0); // 0 is the initial state
/// assert!(dfa.accepts("aab"));
/// assert!(!dfa.accepts("ba"));
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    model: Model,
    edges: Vec<(StateId, TransitionKind, StateId)>,
    accepting: Vec<StateId>,
    labels: Vec<(StateId, String)>,
    states: Option<StateId>,
}

impl AutomatonBuilder {
    fn new(model: Model) -> Self {
        Self {
            model,
            edges: vec![],
            accepting: vec![],
            labels: vec![],
            states: None,
        }
    }

    /// Creates a builder for a finite automaton.
    pub fn finite() -> Self {
        Self::new(Model::Finite)
    }

    /// Creates a builder for a pushdown automaton.
    pub fn pushdown() -> Self {
        Self::new(Model::Pushdown)
    }

    /// Creates a builder for a Turing machine.
    pub fn turing() -> Self {
        Self::new(Model::Turing)
    }

    /// Adds edges given as `(origin, payload, target)`. For finite automata the payload can be a
    /// `char`, a [`super::Letter`] or a `&str` whose characters form the label (the empty string
    /// means ε).
    pub fn with_edges<K, I>(mut self, edges: I) -> Self
    where
        K: Into<TransitionKind>,
        I: IntoIterator<Item = (StateId, K, StateId)>,
    {
        self.edges.extend(
            edges
                .into_iter()
                .map(|(origin, kind, target)| (origin, kind.into(), target)),
        );
        self
    }

    /// Marks the given states as final.
    pub fn with_final<I: IntoIterator<Item = StateId>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Assigns custom labels to states.
    pub fn with_labels<S, I>(mut self, labels: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (StateId, S)>,
    {
        self.labels
            .extend(labels.into_iter().map(|(q, label)| (q, label.into())));
        self
    }

    /// Ensures that at least `count` states are created, even if some of them are not mentioned
    /// by any edge.
    pub fn with_states(mut self, count: StateId) -> Self {
        self.states = Some(count);
        self
    }

    /// Builds the automaton with `initial` as its initial state.
    ///
    /// Fails with [`StructuralError::UnknownState`] if a state is mentioned with the id
    /// `StateId::MAX`, since the number of states would not fit into a `StateId`.
    pub fn build(self, initial: StateId) -> Result<Automaton, StructuralError> {
        let largest = self
            .edges
            .iter()
            .flat_map(|(p, _, q)| [*p, *q])
            .chain(self.accepting.iter().copied())
            .chain(self.labels.iter().map(|(q, _)| *q))
            .chain(std::iter::once(initial))
            .max()
            .unwrap_or(initial);
        let mentioned = largest
            .checked_add(1)
            .ok_or(StructuralError::UnknownState(largest))?;
        let count = self.states.map_or(mentioned, |n| n.max(mentioned));

        let mut automaton = Automaton::new(self.model);
        for _ in 0..count {
            automaton.add_state();
        }
        automaton.set_initial(initial)?;
        for q in self.accepting {
            automaton.set_final(q, true)?;
        }
        for (q, label) in self.labels {
            automaton
                .state_mut(q)
                .ok_or(StructuralError::UnknownState(q))?
                .set_label(Some(label));
        }
        for (origin, kind, target) in self.edges {
            automaton.add_transition(origin, kind, target)?;
        }
        Ok(automaton)
    }

    /// Builds the automaton with `initial` as its initial state.
    ///
    /// # Panics
    /// If an edge does not fit the model of the builder or a state id is `StateId::MAX`.
    pub fn into_automaton(self, initial: StateId) -> Automaton {
        self.build(initial)
            .expect("builder was given an invalid edge or state id")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn builder_creates_states_up_to_largest_id() {
        let nfa = AutomatonBuilder::finite()
            .with_edges([(0, "ab", 3)])
            .with_labels([(1, "lonely")])
            .into_automaton(0);
        assert_eq!(nfa.size(), 4);
        assert_eq!(nfa.state(1).and_then(State::label), Some("lonely"));
        assert_eq!(nfa.state(2).map(State::display_label), Some("q2"));
        assert!(!nfa.accepts_from(0, ""));

        let padded = AutomatonBuilder::finite().with_states(5).into_automaton(0);
        assert_eq!(padded.size(), 5);
        assert!(padded.transitions().is_empty());
    }

    #[test_log::test]
    fn builder_rejects_mismatched_payload() {
        let result = AutomatonBuilder::pushdown()
            .with_edges([(0, 'a', 1)])
            .build(0);
        assert_eq!(
            result.err(),
            Some(StructuralError::ModelMismatch {
                expected: Model::Pushdown,
                found: Model::Finite
            })
        );
    }

    #[test_log::test]
    fn builder_rejects_largest_state_id() {
        let result = AutomatonBuilder::finite()
            .with_edges([(0, 'a', StateId::MAX)])
            .build(0);
        assert_eq!(result.err(), Some(StructuralError::UnknownState(StateId::MAX)));
    }
}
