use bit_set::BitSet;
use tracing::{debug, trace, warn};

use crate::{
    automaton::{Automaton, Graph, StateId},
    validation::{require_initial_state, StructuralError},
};

/// The result of an algorithm that may detect that its input is already in the desired shape.
/// In that case the input is handed back as [`Outcome::Unchanged`] instead of a copy, so callers
/// must not assume that they always receive a fresh automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// Nothing had to be changed, this is the automaton that was passed in.
    Unchanged(&'a Automaton),
    /// A new automaton was produced.
    Transformed(Automaton),
}

impl<'a> Outcome<'a> {
    /// Returns true if the input was returned as is.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Outcome::Unchanged(_))
    }

    /// Returns a reference to the resulting automaton.
    pub fn automaton(&self) -> &Automaton {
        match self {
            Outcome::Unchanged(automaton) => automaton,
            Outcome::Transformed(automaton) => automaton,
        }
    }

    /// Turns `self` into an owned automaton, cloning the input if it was unchanged.
    pub fn into_owned(self) -> Automaton {
        match self {
            Outcome::Unchanged(automaton) => automaton.clone(),
            Outcome::Transformed(automaton) => automaton,
        }
    }
}

impl std::ops::Deref for Outcome<'_> {
    type Target = Automaton;

    fn deref(&self) -> &Self::Target {
        self.automaton()
    }
}

/// Removes all states that are inaccessible (cannot be reached from the initial state) or useless
/// (cannot reach a final state). The initial state is always kept, as are the transitions between
/// kept states. The state order is preserved and no state is renumbered. The recognized language
/// does not change.
///
/// If no state has to be removed, the input is returned as [`Outcome::Unchanged`]. The same happens
/// if the reduction would leave an automaton that had final states without any, in that case
/// nothing is reduced at all.
///
/// Works on the underlying graph and therefore applies to every model of automaton.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let nfa = AutomatonBuilder::finite()
///     .with_edges([(0, 'a', 1), (0, 'b', 2), (3, 'a', 1)])
///     .with_final([1])
///     .into_automaton(0);
/// let reduced = reduce(&nfa).unwrap();
/// assert_eq!(reduced.size(), 2);
/// assert!(reduce(&reduced).unwrap().is_unchanged());
/// ```
pub fn reduce(automaton: &Automaton) -> Result<Outcome<'_>, StructuralError> {
    let initial = require_initial_state(automaton)?;
    let graph = Graph::build(automaton);

    let position = |id: StateId| {
        automaton
            .position(id)
            .expect("graph only contains states of the automaton")
    };

    let accessible: BitSet = graph
        .reachable_from([initial])
        .into_iter()
        .map(position)
        .collect();
    let useful: BitSet = graph
        .co_reachable_from(automaton.final_states())
        .into_iter()
        .map(position)
        .collect();
    trace!(
        "{} accessible and {} useful states out of {}",
        accessible.len(),
        useful.len(),
        automaton.size()
    );

    let mut keep = accessible;
    keep.intersect_with(&useful);
    keep.insert(position(initial));

    if keep.len() == automaton.size() {
        debug!("every state is accessible and useful");
        return Ok(Outcome::Unchanged(automaton));
    }

    let had_final = automaton.final_states().next().is_some();
    let keeps_final = automaton
        .final_states()
        .any(|q| keep.contains(position(q)));
    if had_final && !keeps_final {
        warn!("no final state is accessible, refusing to remove all final states");
        return Ok(Outcome::Unchanged(automaton));
    }

    let mut reduced = automaton.clone();
    reduced.retain_states(|q| keep.contains(position(q.id())));
    debug!(
        "reduced automaton from {} to {} states",
        automaton.size(),
        reduced.size()
    );
    Ok(Outcome::Transformed(reduced))
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::word::words_up_to;

    fn with_junk() -> Automaton {
        // 3 is inaccessible, 4 is accessible but useless
        AutomatonBuilder::finite()
            .with_edges([
                (0, 'a', 1),
                (1, 'b', 2),
                (2, 'a', 2),
                (3, 'a', 2),
                (0, 'b', 4),
                (4, 'a', 4),
            ])
            .with_final([2])
            .into_automaton(0)
    }

    #[test_log::test]
    fn removes_inaccessible_and_useless_states() {
        let nfa = with_junk();
        let reduced = reduce(&nfa).unwrap();
        assert!(!reduced.is_unchanged());
        assert_eq!(reduced.state_ids().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(reduced.transitions().len(), 3);
        for word in words_up_to(&['a', 'b'], 5) {
            assert_eq!(nfa.accepts(&word), reduced.accepts(&word), "{word}");
        }
        // the input is untouched
        assert_eq!(nfa.size(), 5);
    }

    #[test_log::test]
    fn reduction_is_idempotent() {
        let nfa = with_junk();
        let once = reduce(&nfa).unwrap().into_owned();
        let twice = reduce(&once).unwrap();
        assert!(twice.is_unchanged());
        assert_eq!(twice.size(), once.size());
    }

    #[test_log::test]
    fn initial_state_survives() {
        // the initial state cannot reach the final state
        let nfa = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 0), (1, 'a', 2)])
            .with_final([2])
            .into_automaton(0);
        let outcome = reduce(&nfa).unwrap();
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.final_states().count(), 1);

        let without_final = AutomatonBuilder::finite()
            .with_edges([(0, 'a', 1)])
            .into_automaton(0);
        let outcome = reduce(&without_final).unwrap();
        assert_eq!(outcome.size(), 1);
        assert_eq!(outcome.initial(), Some(0));
    }

    #[test_log::test]
    fn reduction_applies_to_machines() {
        let mut tm = library::dtm_unary_increment();
        let orphan = tm.add_state();
        let reduced = reduce(&tm).unwrap();
        assert!(!reduced.contains(orphan));
        assert!(reduced.accepts("11"));
    }

    #[test_log::test]
    fn requires_initial_state() {
        let mut nfa = with_junk();
        nfa.clear_initial();
        assert_eq!(reduce(&nfa), Err(StructuralError::MissingInitialState));
    }
}
