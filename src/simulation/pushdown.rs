//! Configuration trees of pushdown automata.

use std::fmt::Display;

use tracing::debug;

use crate::{
    automaton::{Automaton, Letter, Model, PushdownDelta, StackAction, StateId},
    show::Show,
    validation::{require_initial_state, require_model, StructuralError},
};

use super::{
    tree::{ConfigurationTree, Machine},
    PushdownAcceptance, SimulationConfig,
};

/// An instantaneous description of a pushdown automaton: the current state, the input that is yet
/// to be read and the stack, whose last element is the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushdownConfiguration {
    state: StateId,
    remaining: Vec<char>,
    stack: Vec<char>,
}

impl PushdownConfiguration {
    /// The current state.
    pub fn state(&self) -> StateId {
        self.state
    }

    /// The unread suffix of the input.
    pub fn remaining(&self) -> String {
        self.remaining.iter().collect()
    }

    /// The stack from bottom to top.
    pub fn stack(&self) -> &[char] {
        &self.stack
    }

    /// The symbol on top of the stack, if any.
    pub fn top(&self) -> Option<char> {
        self.stack.last().copied()
    }
}

impl Display for PushdownConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(q{}, {}, {})",
            self.state,
            self.remaining.show(),
            self.stack.iter().rev().copied().collect::<Vec<_>>().show()
        )
    }
}

struct Pushdown<'a> {
    automaton: &'a Automaton,
    delta: PushdownDelta,
    acceptance: PushdownAcceptance,
    bottom: char,
}

impl Pushdown<'_> {
    fn apply(
        configuration: &PushdownConfiguration,
        consumes: bool,
        action: StackAction,
        target: StateId,
    ) -> PushdownConfiguration {
        let mut next = configuration.clone();
        next.state = target;
        if consumes {
            next.remaining.remove(0);
        }
        match action {
            StackAction::Push(symbol) => next.stack.push(symbol),
            StackAction::Pop => {
                next.stack.pop();
            }
            StackAction::NoOp => {}
        }
        next
    }
}

impl Machine for Pushdown<'_> {
    type Configuration = PushdownConfiguration;

    fn successors(&self, configuration: &PushdownConfiguration) -> Vec<PushdownConfiguration> {
        let Some(top) = configuration.top() else {
            return vec![];
        };
        let next = configuration.remaining.first().copied();

        let mut successors = vec![];
        for ((input, required), targets) in self.delta.edges_from(configuration.state) {
            if *required != top {
                continue;
            }
            let consumes = match input {
                Letter::Epsilon => false,
                Letter::Symbol(symbol) if Some(*symbol) == next => true,
                Letter::Symbol(_) => continue,
            };
            successors.extend(
                targets
                    .iter()
                    .map(|(action, target)| Self::apply(configuration, consumes, *action, *target)),
            );
        }
        successors
    }

    fn accepts(&self, configuration: &PushdownConfiguration) -> bool {
        if !configuration.remaining.is_empty() {
            return false;
        }
        match self.acceptance {
            PushdownAcceptance::FinalState => self.automaton.is_final(configuration.state),
            PushdownAcceptance::EmptyStack => {
                configuration.stack.is_empty() || configuration.stack == [self.bottom]
            }
        }
    }

    fn accepts_halted(&self, _: &PushdownConfiguration) -> bool {
        false
    }
}

/// Explores all computations of a pushdown automaton on `input`. The initial configuration holds
/// the initial state, the whole input and a stack that contains only the bottom symbol of the
/// `config`. A transition applies if its input letter is ε or the next input symbol and its
/// required stack symbol is on top of the stack.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
/// use automata_kernel::simulation::pushdown;
///
/// let pda = library::pda_an_bn();
/// let tree = pushdown::explore(&pda, "aabb", &SimulationConfig::default()).unwrap();
/// assert!(tree.accepts());
/// let computation = tree.computation(tree.accepting().next().unwrap());
/// assert_eq!(computation[0].remaining(), "aabb");
/// ```
pub fn explore(
    automaton: &Automaton,
    input: &str,
    config: &SimulationConfig,
) -> Result<ConfigurationTree<PushdownConfiguration>, StructuralError> {
    require_model(automaton, Model::Pushdown)?;
    let initial = require_initial_state(automaton)?;

    let machine = Pushdown {
        automaton,
        delta: automaton.pushdown_delta(),
        acceptance: config.pushdown_acceptance(),
        bottom: config.bottom(),
    };
    let root = PushdownConfiguration {
        state: initial,
        remaining: input.chars().collect(),
        stack: vec![config.bottom()],
    };
    debug!("exploring pushdown automaton on {input:?}");
    Ok(ConfigurationTree::explore(&machine, root, config))
}

#[cfg(test)]
mod tests {
    use super::explore;
    use crate::prelude::*;

    #[test_log::test]
    fn an_bn_by_final_state() {
        let pda = library::pda_an_bn();
        for word in words_up_to(&['a', 'b'], 8) {
            let n = word.len() / 2;
            let expected = n > 0 && word == format!("{}{}", "a".repeat(n), "b".repeat(n));
            assert_eq!(pda.accepts(&word), expected, "{word}");
        }
    }

    #[test_log::test]
    fn accepting_computation_is_reported() {
        let pda = library::pda_an_bn();
        let tree = explore(&pda, "ab", &SimulationConfig::default()).unwrap();
        let accepting: Vec<_> = tree.accepting().collect();
        assert_eq!(accepting.len(), 1);
        let computation = tree.computation(accepting[0]);
        assert_eq!(computation.first().unwrap().stack(), &['Z']);
        let last = computation.last().unwrap();
        assert!(pda.is_final(last.state()));
        assert_eq!(last.remaining(), "");
        assert_eq!(last.stack(), &['Z']);
    }

    #[test_log::test]
    fn even_palindromes_by_empty_stack() {
        let pda = library::pda_even_palindromes();
        let config =
            SimulationConfig::default().with_pushdown_acceptance(PushdownAcceptance::EmptyStack);
        for word in words_up_to(&['a', 'b'], 6) {
            let reversed: String = word.chars().rev().collect();
            let expected = word.len() % 2 == 0 && word == reversed;
            let tree = explore(&pda, &word, &config).unwrap();
            assert_eq!(tree.accepts(), expected, "{word}");
        }
    }

    #[test_log::test]
    fn empty_stack_blocks() {
        let pda = AutomatonBuilder::pushdown()
            .with_edges([
                (0, PushdownOperation::pop('a', 'Z'), 0),
                (0, PushdownOperation::noop('b', 'Z'), 1),
            ])
            .with_final([0, 1])
            .into_automaton(0);
        // the stack is empty after reading a, so nothing applies anymore
        assert!(pda.accepts("a"));
        assert!(!pda.accepts("aa"));
        assert!(!pda.accepts("ab"));
        assert!(pda.accepts("b"));
    }

    #[test_log::test]
    fn epsilon_loops_are_bounded() {
        let pda = AutomatonBuilder::pushdown()
            .with_edges([
                (0, PushdownOperation::push(Letter::Epsilon, 'Z', 'Z'), 0),
                (0, PushdownOperation::noop('a', 'Z'), 1),
            ])
            .into_automaton(0);
        let config = SimulationConfig::default().with_step_limit(20);
        let tree = explore(&pda, "a", &config).unwrap();
        assert!(!tree.accepts());
        assert!(tree.is_truncated());
        assert!(!pda.accepts("a"));
    }

    #[test_log::test]
    fn explore_requires_pushdown_model() {
        assert_eq!(
            explore(&library::dfa_ending_in_01(), "01", &SimulationConfig::default()).err(),
            Some(StructuralError::ModelMismatch {
                expected: Model::Pushdown,
                found: Model::Finite,
            })
        );
    }
}
