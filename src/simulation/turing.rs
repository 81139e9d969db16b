//! Configuration trees of Turing machines, together with the [`Tape`] they operate on.

use std::{collections::VecDeque, fmt::Display};

use tracing::debug;

use crate::{
    automaton::{Automaton, HeadMove, Model, StateId, TuringDelta},
    validation::{require_initial_state, require_model, StructuralError},
};

use super::{
    tree::{ConfigurationTree, Machine},
    SimulationConfig, TuringAcceptance,
};

/// A tape that is unbounded in both directions. Only the cells that were visited are stored,
/// moving the head past either end grows the tape by a blank cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tape {
    cells: VecDeque<char>,
    head: usize,
    blank: char,
}

impl Tape {
    /// Creates a tape holding `input` with the head on its first symbol. The tape of the empty
    /// input consists of a single blank.
    pub fn new(input: &str, blank: char) -> Self {
        let mut cells: VecDeque<char> = input.chars().collect();
        if cells.is_empty() {
            cells.push_back(blank);
        }
        Self {
            cells,
            head: 0,
            blank,
        }
    }

    /// The symbol under the head.
    pub fn read(&self) -> char {
        self.cells.get(self.head).copied().unwrap_or(self.blank)
    }

    /// Overwrites the cell under the head.
    pub fn write(&mut self, symbol: char) {
        if let Some(cell) = self.cells.get_mut(self.head) {
            *cell = symbol;
        }
    }

    /// Moves the head by one cell, extending the tape with a blank if necessary.
    pub fn shift(&mut self, movement: HeadMove) {
        match movement {
            HeadMove::Left if self.head == 0 => self.cells.push_front(self.blank),
            HeadMove::Left => self.head -= 1,
            HeadMove::Right => {
                self.head += 1;
                if self.head == self.cells.len() {
                    self.cells.push_back(self.blank);
                }
            }
        }
    }

    /// Position of the head among the stored cells.
    pub fn head(&self) -> usize {
        self.head
    }

    /// The stored cells, including blanks that were visited.
    pub fn cells(&self) -> impl Iterator<Item = char> + '_ {
        self.cells.iter().copied()
    }

    /// The written part of the tape, i.e. the cells without leading and trailing blanks.
    pub fn contents(&self) -> String {
        let blank = self.blank;
        self.cells
            .iter()
            .collect::<String>()
            .trim_matches(blank)
            .to_string()
    }
}

impl Display for Tape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, symbol) in self.cells.iter().enumerate() {
            if i == self.head {
                write!(f, "[{symbol}]")?;
            } else {
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

/// An instantaneous description of a Turing machine, consisting of the current state and the tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TuringConfiguration {
    state: StateId,
    tape: Tape,
}

impl TuringConfiguration {
    /// The current state.
    pub fn state(&self) -> StateId {
        self.state
    }

    /// The tape together with the head position.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }
}

impl Display for TuringConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(q{}, {})", self.state, self.tape)
    }
}

struct Turing<'a> {
    automaton: &'a Automaton,
    delta: TuringDelta,
    acceptance: TuringAcceptance,
}

impl Machine for Turing<'_> {
    type Configuration = TuringConfiguration;

    fn successors(&self, configuration: &TuringConfiguration) -> Vec<TuringConfiguration> {
        let read = configuration.tape.read();
        self.delta
            .get(configuration.state, &read)
            .into_iter()
            .flatten()
            .map(|(write, movement, target)| {
                let mut tape = configuration.tape.clone();
                tape.write(*write);
                tape.shift(*movement);
                TuringConfiguration {
                    state: *target,
                    tape,
                }
            })
            .collect()
    }

    fn accepts(&self, configuration: &TuringConfiguration) -> bool {
        self.acceptance == TuringAcceptance::FinalState
            && self.automaton.is_final(configuration.state)
    }

    fn accepts_halted(&self, configuration: &TuringConfiguration) -> bool {
        self.automaton.is_final(configuration.state)
    }
}

/// Explores all computations of a Turing machine on `input`. The tape initially holds the input
/// with the head on its first symbol. Whether a configuration is accepting depends on the
/// [`TuringAcceptance`] of the `config`. A machine that does not halt is cut off by the step limit,
/// the corresponding branch is truncated and does not accept.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
/// use automata_kernel::simulation::turing;
///
/// let tm = library::dtm_unary_increment();
/// let tree = turing::explore(&tm, "111", &SimulationConfig::default()).unwrap();
/// let accepting = tree.accepting().next().unwrap();
/// let result = tree.node(accepting).unwrap().configuration();
/// assert_eq!(result.tape().contents(), "1111");
/// ```
pub fn explore(
    automaton: &Automaton,
    input: &str,
    config: &SimulationConfig,
) -> Result<ConfigurationTree<TuringConfiguration>, StructuralError> {
    require_model(automaton, Model::Turing)?;
    let initial = require_initial_state(automaton)?;

    let machine = Turing {
        automaton,
        delta: automaton.turing_delta(),
        acceptance: config.turing_acceptance(),
    };
    let root = TuringConfiguration {
        state: initial,
        tape: Tape::new(input, config.blank()),
    };
    debug!("exploring turing machine on {input:?}");
    Ok(ConfigurationTree::explore(&machine, root, config))
}

#[cfg(test)]
mod tests {
    use super::{explore, Tape};
    use crate::prelude::*;

    #[test_log::test]
    fn tape_grows_in_both_directions() {
        let mut tape = Tape::new("ab", '_');
        assert_eq!(tape.read(), 'a');
        tape.shift(HeadMove::Left);
        assert_eq!(tape.read(), '_');
        assert_eq!(tape.head(), 0);
        tape.write('x');
        tape.shift(HeadMove::Right);
        tape.shift(HeadMove::Right);
        tape.shift(HeadMove::Right);
        assert_eq!(tape.read(), '_');
        assert_eq!(tape.cells().collect::<String>(), "xab_");
        assert_eq!(tape.contents(), "xab");
        assert_eq!(tape.to_string(), "xab[_]");

        let empty = Tape::new("", '_');
        assert_eq!(empty.read(), '_');
        assert_eq!(empty.contents(), "");
    }

    #[test_log::test]
    fn unary_increment() {
        let tm = library::dtm_unary_increment();
        for n in 0..6 {
            let input = "1".repeat(n);
            let tree = explore(&tm, &input, &SimulationConfig::default()).unwrap();
            assert!(tree.accepts(), "{input}");
            assert!(!tree.is_truncated());
            let accepting: Vec<_> = tree.accepting().collect();
            assert_eq!(accepting.len(), 1);
            let computation = tree.computation(accepting[0]);
            assert_eq!(computation.len(), n + 2);
            let last = computation.last().unwrap();
            assert_eq!(last.tape().contents(), "1".repeat(n + 1));
        }
    }

    #[test_log::test]
    fn looping_machine_is_truncated() {
        let tm = library::dtm_infinite_loop_final_state();
        let config = SimulationConfig::default().with_step_limit(25);
        let tree = explore(&tm, "", &config).unwrap();
        assert!(!tree.accepts());
        assert!(tree.is_truncated());
        assert_eq!(tree.len(), 26);
        assert!(!tm.accepts(""));

        // entering the final state suffices under the final state policy
        let config = config.with_turing_acceptance(TuringAcceptance::FinalState);
        let tree = explore(&tm, "", &config).unwrap();
        assert!(tree.accepts());
        assert_eq!(tree.len(), 2);
    }

    #[test_log::test]
    fn halting_in_non_final_state_rejects() {
        let tm = AutomatonBuilder::turing()
            .with_edges([(0, TuringOperation::new('a', 'b', HeadMove::Right), 1)])
            .with_final([2])
            .into_automaton(0);
        let tree = explore(&tm, "a", &SimulationConfig::default()).unwrap();
        assert!(!tree.accepts());
        assert_eq!(tree.with_status(NodeStatus::Rejected).count(), 1);
        assert!(!tm.accepts("a"));
    }

    #[test_log::test]
    fn nondeterministic_branches_are_kept() {
        let tm = AutomatonBuilder::turing()
            .with_edges([
                (0, TuringOperation::new('a', 'a', HeadMove::Right), 0),
                (0, TuringOperation::new('a', 'x', HeadMove::Right), 1),
                (1, TuringOperation::new('_', '_', HeadMove::Left), 2),
            ])
            .with_final([2])
            .into_automaton(0);
        let tree = explore(&tm, "aa", &SimulationConfig::default()).unwrap();
        let accepting: Vec<_> = tree.accepting().collect();
        assert_eq!(accepting.len(), 1);
        let result = tree.node(accepting[0]).unwrap().configuration();
        assert_eq!(result.tape().contents(), "ax");
        assert_eq!(tree.with_status(NodeStatus::Rejected).count(), 2);
    }
}
