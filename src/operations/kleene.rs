use tracing::debug;

use crate::{
    automaton::{Automaton, Model, StateId},
    validation::{require_initial_state, require_model, StructuralError},
};

/// Builds an ε-NFA for the Kleene star of the language of `automaton`. A fresh initial state, which
/// is also final so that the empty word is always accepted, is connected by an ε-transition to the
/// former initial state. Every final state receives an ε-transition back to the fresh initial
/// state.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let ab = AutomatonBuilder::finite()
///     .with_edges([(0, 'a', 1), (1, 'b', 2)])
///     .with_final([2])
///     .into_automaton(0);
/// let star = kleene_star(&ab).unwrap();
/// assert!(star.accepts(""));
/// assert!(star.accepts("ababab"));
/// assert!(!star.accepts("aba"));
/// ```
pub fn kleene_star(automaton: &Automaton) -> Result<Automaton, StructuralError> {
    require_model(automaton, Model::Finite)?;
    let former_initial = require_initial_state(automaton)?;

    let mut result = automaton.clone();
    let finals: Vec<StateId> = result.final_states().collect();

    let initial = result.add_state();
    result.set_initial(initial)?;
    result.set_final(initial, true)?;
    result.add_epsilon(initial, former_initial)?;
    for q in finals {
        result.add_epsilon(q, initial)?;
    }
    result.renumber();
    debug!("kleene star has {} states", result.size());
    Ok(result)
}
